//! Loading pipeline: reads the catalog and mix files, resolves names, and
//! builds a frozen recipe registry.
//!
//! A data directory holds:
//!
//! - `catalog.{ron,toml,json}` (optional) -- item/fluid names and tags.
//! - `mixes.{ron,toml,json}` (required) -- mix recipes, in priority order.

use crate::catalog::Catalog;
use crate::loader::{
    DataLoadError, Format, deserialize_file, deserialize_list, deserialize_list_str,
    find_data_file, require_data_file,
};
use crate::schema::{AdditiveData, CatalogData, MixData, OutputData};
use std::path::Path;
use steelworks_core::additive::{AdditiveSlot, ItemMatcher, MatchRule};
use steelworks_core::fluid::FluidAmount;
use steelworks_core::recipe::{MixRecipeBuilder, OutputRule, TemperatureStep};
use steelworks_core::registry::{RecipeError, RecipeRegistry, RecipeRegistryBuilder};

pub const CATALOG_FILE: &str = "catalog";
pub const MIXES_FILE: &str = "mixes";

/// Everything loaded from a data directory.
#[derive(Debug)]
pub struct LoadedMixes {
    pub catalog: Catalog,
    pub registry: RecipeRegistry,
}

/// Load a data directory on top of the host's `catalog`.
pub fn load_mix_data(dir: &Path, mut catalog: Catalog) -> Result<LoadedMixes, DataLoadError> {
    if let Some(path) = find_data_file(dir, CATALOG_FILE)? {
        let data: CatalogData = deserialize_file(&path)?;
        catalog.extend(data, &path)?;
    }

    let path = require_data_file(dir, MIXES_FILE)?;
    let mixes: Vec<MixData> = deserialize_list(&path, MIXES_FILE)?;
    let registry = build_registry(&mixes, &catalog, &path)?;
    log::info!(
        "loaded {} mix recipes from {}",
        registry.len(),
        path.display()
    );

    Ok(LoadedMixes { catalog, registry })
}

/// Load mixes from an in-memory string. TOML content keeps the list under
/// a top-level `mixes` key.
pub fn load_mixes_str(
    content: &str,
    format: Format,
    catalog: &Catalog,
) -> Result<RecipeRegistry, DataLoadError> {
    let file = Path::new("<inline>");
    let mixes: Vec<MixData> = deserialize_list_str(content, format, MIXES_FILE, file)?;
    build_registry(&mixes, catalog, file)
}

/// Resolve and register every mix in order, then freeze.
pub fn build_registry(
    mixes: &[MixData],
    catalog: &Catalog,
    file: &Path,
) -> Result<RecipeRegistry, DataLoadError> {
    let recipe_err = |source: RecipeError| DataLoadError::Recipe {
        file: file.to_path_buf(),
        source,
    };

    let mut builder = RecipeRegistryBuilder::new();
    for mix in mixes {
        let recipe = resolve_mix(mix, catalog, file)?;
        builder.register(recipe).map_err(recipe_err)?;
    }
    builder.build(catalog).map_err(recipe_err)
}

fn resolve_mix(mix: &MixData, catalog: &Catalog, file: &Path) -> Result<MixRecipeBuilder, DataLoadError> {
    let input = FluidAmount::new(
        catalog.resolve_fluid(&mix.input.fluid, file)?,
        mix.input.amount,
    );
    let output = resolve_output(&mix.name, &mix.output, catalog, file)?;

    let mut recipe =
        MixRecipeBuilder::new(&mix.name, input, output).min_temperature(mix.min_temperature);
    for (slot, additives) in [
        (AdditiveSlot::Oxidizer, &mix.oxidizers),
        (AdditiveSlot::Reducer, &mix.reducers),
        (AdditiveSlot::Purifier, &mix.purifiers),
    ] {
        for additive in additives {
            let rule = resolve_additive(&mix.name, slot, additive, catalog, file)?;
            recipe.add_additive(slot, rule);
        }
    }
    Ok(recipe)
}

fn resolve_output(
    recipe: &str,
    output: &OutputData,
    catalog: &Catalog,
    file: &Path,
) -> Result<OutputRule, DataLoadError> {
    let fluid = catalog.resolve_fluid(&output.fluid, file)?;
    match (output.amount, output.by_temperature.is_empty()) {
        (Some(volume), true) => Ok(OutputRule::PerConversion { fluid, volume }),
        (None, false) => Ok(OutputRule::ByTemperature {
            fluid,
            steps: output
                .by_temperature
                .iter()
                .map(|step| TemperatureStep {
                    min_temperature: step.min_temperature,
                    volume: step.amount,
                })
                .collect(),
        }),
        _ => Err(DataLoadError::Parse {
            file: file.to_path_buf(),
            detail: format!(
                "recipe '{recipe}': output needs exactly one of 'amount' or 'by_temperature'"
            ),
        }),
    }
}

fn resolve_additive(
    recipe: &str,
    slot: AdditiveSlot,
    additive: &AdditiveData,
    catalog: &Catalog,
    file: &Path,
) -> Result<MatchRule, DataLoadError> {
    let matcher = match (&additive.item, &additive.items, &additive.tag) {
        (Some(item), None, None) => ItemMatcher::Item(catalog.resolve_item(item, file)?),
        (None, Some(items), None) => ItemMatcher::Items(
            items
                .iter()
                .map(|item| catalog.resolve_item(item, file))
                .collect::<Result<_, _>>()?,
        ),
        (None, None, Some(tag)) => ItemMatcher::tag(tag),
        _ => {
            return Err(DataLoadError::Parse {
                file: file.to_path_buf(),
                detail: format!(
                    "recipe '{recipe}': each {slot} needs exactly one of 'item', 'items' or 'tag'"
                ),
            });
        }
    };
    Ok(MatchRule::new(matcher, additive.consume))
}
