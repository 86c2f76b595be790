//! Additive slots and the rules that decide which items fill them.

use crate::id::ItemKind;
use crate::item::ItemBatch;
use crate::rng::RandomSource;
use crate::tag::TagResolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// The three catalytic inputs of a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditiveSlot {
    Oxidizer,
    Reducer,
    Purifier,
}

impl AdditiveSlot {
    pub const ALL: [AdditiveSlot; 3] = [
        AdditiveSlot::Oxidizer,
        AdditiveSlot::Reducer,
        AdditiveSlot::Purifier,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AdditiveSlot::Oxidizer => "oxidizer",
            AdditiveSlot::Reducer => "reducer",
            AdditiveSlot::Purifier => "purifier",
        }
    }
}

impl fmt::Display for AdditiveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown additive slot: {0}")]
pub struct UnknownSlot(pub String);

impl FromStr for AdditiveSlot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdditiveSlot::ALL
            .into_iter()
            .find(|slot| slot.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSlot(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Item matchers
// ---------------------------------------------------------------------------

/// Which item kinds an additive rule accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemMatcher {
    /// Exactly one item kind.
    Item(ItemKind),
    /// Any of a literal list of item kinds.
    Items(Vec<ItemKind>),
    /// Any member of a named item family. `members` is filled in when the
    /// registry is frozen; an unresolved tag matches nothing.
    Tag {
        name: String,
        #[serde(default)]
        members: Vec<ItemKind>,
    },
}

impl ItemMatcher {
    pub fn tag(name: &str) -> Self {
        ItemMatcher::Tag {
            name: name.to_string(),
            members: Vec::new(),
        }
    }

    pub fn accepts(&self, kind: ItemKind) -> bool {
        match self {
            ItemMatcher::Item(item) => *item == kind,
            ItemMatcher::Items(items) => items.contains(&kind),
            ItemMatcher::Tag { members, .. } => members.contains(&kind),
        }
    }

    /// Tag name, if this matcher is a tag.
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            ItemMatcher::Tag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Replace tag members with the resolver's answer. Returns `false` if the
    /// resolver does not know the tag. Non-tag matchers are left untouched.
    pub fn resolve(&mut self, resolver: &impl TagResolver) -> bool {
        match self {
            ItemMatcher::Tag { name, members } => match resolver.resolve_tag(name) {
                Some(resolved) => {
                    *members = resolved;
                    true
                }
                None => false,
            },
            _ => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Match rules
// ---------------------------------------------------------------------------

/// One acceptable additive family plus the percent chance it is consumed per
/// conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    pub matcher: ItemMatcher,
    /// Percent in `0..=100`. Checked when the recipe is registered.
    pub consume_chance: i32,
}

impl MatchRule {
    pub fn new(matcher: ItemMatcher, consume_chance: i32) -> Self {
        Self {
            matcher,
            consume_chance,
        }
    }

    pub fn item(kind: ItemKind, consume_chance: i32) -> Self {
        Self::new(ItemMatcher::Item(kind), consume_chance)
    }

    pub fn tag(name: &str, consume_chance: i32) -> Self {
        Self::new(ItemMatcher::tag(name), consume_chance)
    }

    /// Pure predicate on the batch's kind. Count is ignored.
    pub fn matches(&self, batch: &ItemBatch) -> bool {
        self.matcher.accepts(batch.kind())
    }

    /// Whether this rule ever consumes items.
    pub fn consumes(&self) -> bool {
        self.consume_chance > 0
    }

    /// Roll once for consumption. Chances at or beyond the 0/100 bounds are
    /// decided without drawing.
    pub fn roll_consumed(&self, rng: &mut impl RandomSource) -> bool {
        if self.consume_chance <= 0 {
            return false;
        }
        if self.consume_chance >= 100 {
            return true;
        }
        (rng.percent() as i32) < self.consume_chance
    }

    pub(crate) fn chance_in_range(&self) -> bool {
        (0..=100).contains(&self.consume_chance)
    }
}
