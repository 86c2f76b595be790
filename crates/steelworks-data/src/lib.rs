//! Data-driven mix recipe loading.
//!
//! Reads a catalog of item/fluid names and a list of mix recipes from RON,
//! TOML or JSON files, resolves names through a [`Catalog`], and produces a
//! frozen [`steelworks_core::registry::RecipeRegistry`].

pub mod catalog;
pub mod loader;
pub mod mixes;
pub mod schema;

pub use catalog::Catalog;
pub use loader::{DataLoadError, Format};
pub use mixes::{LoadedMixes, load_mix_data, load_mixes_str};
