//! Name tables mapping data-file names to the host's item and fluid ids.

use crate::loader::{DataLoadError, check_duplicate, resolve_name};
use crate::schema::CatalogData;
use std::collections::HashMap;
use std::path::Path;
use steelworks_core::id::{FluidKind, ItemKind};
use steelworks_core::tag::{TagResolver, TagTable};

/// Item and fluid names plus item-family tags.
///
/// Hosts usually pre-register their own ids with [`Catalog::insert_item`] and
/// [`Catalog::insert_fluid`]; names added from data files get the next free id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<String, ItemKind>,
    fluids: HashMap<String, FluidKind>,
    tags: TagTable,
    // One past the highest id in use; `u64` so a host id of `u32::MAX` fits.
    next_item: u64,
    next_fluid: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item name under a host-chosen id.
    pub fn insert_item(&mut self, name: &str, kind: ItemKind) {
        self.items.insert(name.to_string(), kind);
        self.next_item = self.next_item.max(u64::from(kind.0) + 1);
    }

    /// Register a fluid name under a host-chosen id.
    pub fn insert_fluid(&mut self, name: &str, kind: FluidKind) {
        self.fluids.insert(name.to_string(), kind);
        self.next_fluid = self.next_fluid.max(u64::from(kind.0) + 1);
    }

    /// Register an item name with the next free id.
    pub fn register_item(&mut self, name: &str) -> Result<ItemKind, DataLoadError> {
        let kind = ItemKind(next_id(self.next_item, name, "item")?);
        self.insert_item(name, kind);
        Ok(kind)
    }

    /// Register a fluid name with the next free id.
    pub fn register_fluid(&mut self, name: &str) -> Result<FluidKind, DataLoadError> {
        let kind = FluidKind(next_id(self.next_fluid, name, "fluid")?);
        self.insert_fluid(name, kind);
        Ok(kind)
    }

    pub fn tag_item(&mut self, tag: &str, item: ItemKind) {
        self.tags.insert(tag, item);
    }

    pub fn item(&self, name: &str) -> Option<ItemKind> {
        self.items.get(name).copied()
    }

    pub fn fluid(&self, name: &str) -> Option<FluidKind> {
        self.fluids.get(name).copied()
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    pub(crate) fn resolve_item(&self, name: &str, file: &Path) -> Result<ItemKind, DataLoadError> {
        resolve_name(&self.items, name, file, "item").copied()
    }

    pub(crate) fn resolve_fluid(&self, name: &str, file: &Path) -> Result<FluidKind, DataLoadError> {
        resolve_name(&self.fluids, name, file, "fluid").copied()
    }

    /// Merge names from a catalog data file. Names must be new.
    pub fn extend(&mut self, data: CatalogData, file: &Path) -> Result<(), DataLoadError> {
        for name in &data.items {
            check_duplicate(&self.items, name, file)?;
            self.register_item(name)?;
        }
        for name in &data.fluids {
            check_duplicate(&self.fluids, name, file)?;
            self.register_fluid(name)?;
        }
        for tag in &data.tags {
            self.tags.declare(&tag.name);
            for item in &tag.items {
                let kind = self.resolve_item(item, file)?;
                self.tags.insert(&tag.name, kind);
            }
        }
        log::debug!(
            "catalog now holds {} items, {} fluids, {} tags",
            self.items.len(),
            self.fluids.len(),
            self.tags.len()
        );
        Ok(())
    }
}

fn next_id(next: u64, name: &str, kind: &'static str) -> Result<u32, DataLoadError> {
    u32::try_from(next).map_err(|_| DataLoadError::IdsExhausted {
        name: name.to_string(),
        kind,
    })
}

impl TagResolver for Catalog {
    fn resolve_tag(&self, tag: &str) -> Option<Vec<ItemKind>> {
        self.tags.resolve_tag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TagData;

    #[test]
    fn register_continues_after_host_ids() {
        let mut catalog = Catalog::new();
        catalog.insert_item("redstone", ItemKind(40));
        let sugar = catalog.register_item("sugar").unwrap();
        assert_eq!(sugar, ItemKind(41));
        assert_eq!(catalog.item("redstone"), Some(ItemKind(40)));
        assert_eq!(catalog.register_fluid("slag").unwrap(), FluidKind(0));
    }

    #[test]
    fn max_host_id_exhausts_registration() {
        let mut catalog = Catalog::new();
        catalog.insert_item("host_max", ItemKind(u32::MAX));
        catalog.insert_fluid("host_max", FluidKind(u32::MAX));

        let err = catalog.register_item("sugar").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::IdsExhausted { ref name, kind: "item" } if name == "sugar"
        ));
        assert!(matches!(
            catalog.register_fluid("slag"),
            Err(DataLoadError::IdsExhausted { kind: "fluid", .. })
        ));
        assert_eq!(catalog.item("sugar"), None);
        assert_eq!(catalog.item("host_max"), Some(ItemKind(u32::MAX)));
    }

    #[test]
    fn last_id_can_still_be_registered() {
        let mut catalog = Catalog::new();
        catalog.insert_item("almost", ItemKind(u32::MAX - 1));
        assert_eq!(catalog.register_item("last").unwrap(), ItemKind(u32::MAX));
        assert!(catalog.register_item("one_more").is_err());
    }

    #[test]
    fn extend_resolves_tag_members() {
        let mut catalog = Catalog::new();
        catalog
            .extend(
                CatalogData {
                    items: vec!["redstone".into(), "glowstone".into()],
                    fluids: vec!["slag".into()],
                    tags: vec![TagData {
                        name: "dustGlowing".into(),
                        items: vec!["redstone".into(), "glowstone".into()],
                    }],
                },
                Path::new("catalog.ron"),
            )
            .unwrap();
        assert_eq!(
            catalog.resolve_tag("dustGlowing"),
            Some(vec![ItemKind(0), ItemKind(1)])
        );
        assert_eq!(catalog.fluid("slag"), Some(FluidKind(0)));
    }

    #[test]
    fn extend_rejects_duplicate_item() {
        let mut catalog = Catalog::new();
        catalog.register_item("sugar").unwrap();
        let err = catalog
            .extend(
                CatalogData {
                    items: vec!["sugar".into()],
                    ..CatalogData::default()
                },
                Path::new("catalog.ron"),
            )
            .unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateName { ref name, .. } if name == "sugar"));
    }

    #[test]
    fn extend_rejects_unknown_tag_member() {
        let mut catalog = Catalog::new();
        let err = catalog
            .extend(
                CatalogData {
                    tags: vec![TagData {
                        name: "dustGlowing".into(),
                        items: vec!["glowstone".into()],
                    }],
                    ..CatalogData::default()
                },
                Path::new("catalog.ron"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::UnresolvedRef { expected_kind: "item", .. }
        ));
    }
}
