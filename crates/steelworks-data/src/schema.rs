//! Serde data file structs for mix content.
//!
//! These define the on-disk format for the name catalog and mix recipes.
//! They are deserialized from RON, JSON, or TOML and then resolved into core
//! types by [`crate::mixes`].

use serde::Deserialize;

// ===========================================================================
// Catalog
// ===========================================================================

/// Item, fluid and tag names known to the data files. Ids are assigned in
/// listing order after any names the host already registered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub fluids: Vec<String>,
    #[serde(default)]
    pub tags: Vec<TagData>,
}

/// An item-family tag and the item names it groups.
#[derive(Debug, Clone, Deserialize)]
pub struct TagData {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

// ===========================================================================
// Mixes
// ===========================================================================

/// A mix recipe definition.
#[derive(Debug, Clone, Deserialize)]
pub struct MixData {
    pub name: String,
    pub input: FluidData,
    pub output: OutputData,
    #[serde(default)]
    pub min_temperature: i32,
    #[serde(default)]
    pub oxidizers: Vec<AdditiveData>,
    #[serde(default)]
    pub reducers: Vec<AdditiveData>,
    #[serde(default)]
    pub purifiers: Vec<AdditiveData>,
}

/// A fluid name and volume.
#[derive(Debug, Clone, Deserialize)]
pub struct FluidData {
    pub fluid: String,
    pub amount: u32,
}

/// Output of one conversion. Either a fixed `amount`, or a `by_temperature`
/// table; exactly one must be given.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputData {
    pub fluid: String,
    #[serde(default)]
    pub amount: Option<u32>,
    #[serde(default)]
    pub by_temperature: Vec<TemperatureStepData>,
}

/// One row of a heat-dependent output table.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TemperatureStepData {
    pub min_temperature: i32,
    pub amount: u32,
}

/// One acceptable additive. Exactly one of `item`, `items` or `tag` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct AdditiveData {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<String>>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Percent chance the additive is consumed per conversion.
    pub consume: i32,
}
