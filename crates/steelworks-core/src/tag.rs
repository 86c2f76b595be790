//! Item-family tags.
//!
//! A tag is a named group of interchangeable item kinds. The host owns the
//! classification; recipes only see the member list handed back at freeze
//! time.

use crate::id::ItemKind;
use std::collections::BTreeMap;

/// Host-provided item classification service.
pub trait TagResolver {
    /// Member item kinds of `tag`, or `None` if the tag is unknown.
    fn resolve_tag(&self, tag: &str) -> Option<Vec<ItemKind>>;
}

/// Resolver that knows no tags. Use when no recipe references one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTags;

impl TagResolver for NoTags {
    fn resolve_tag(&self, _tag: &str) -> Option<Vec<ItemKind>> {
        None
    }
}

/// A static tag table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTable {
    tags: BTreeMap<String, Vec<ItemKind>>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item` to `tag`, creating the tag if needed. Duplicates are ignored.
    pub fn insert(&mut self, tag: &str, item: ItemKind) {
        let members = self.tags.entry(tag.to_string()).or_default();
        if !members.contains(&item) {
            members.push(item);
        }
    }

    /// Declare a tag with no members yet.
    pub fn declare(&mut self, tag: &str) {
        self.tags.entry(tag.to_string()).or_default();
    }

    pub fn members(&self, tag: &str) -> Option<&[ItemKind]> {
        self.tags.get(tag).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagResolver for TagTable {
    fn resolve_tag(&self, tag: &str) -> Option<Vec<ItemKind>> {
        self.tags.get(tag).cloned()
    }
}
