use crate::additive::AdditiveSlot;
use crate::fluid::FluidAmount;
use crate::id::{FluidKind, ItemKind, RecipeId};
use crate::item::ItemBatch;
use crate::recipe::{MixRecipe, MixRecipeBuilder};
use crate::tag::TagResolver;
use std::collections::HashMap;

/// Builder for constructing an immutable [`RecipeRegistry`].
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct RecipeRegistryBuilder {
    recipes: Vec<MixRecipeBuilder>,
    name_to_id: HashMap<String, RecipeId>,
}

impl RecipeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register a recipe. Validated immediately; registration order
    /// is match priority.
    pub fn register(&mut self, recipe: MixRecipeBuilder) -> Result<RecipeId, RecipeError> {
        if self.name_to_id.contains_key(recipe.name()) {
            return Err(RecipeError::DuplicateName(recipe.name().to_string()));
        }
        recipe.validate()?;

        let id = RecipeId(self.recipes.len() as u32);
        log::debug!("registered mix recipe '{}' as {id:?}", recipe.name());
        self.name_to_id.insert(recipe.name().to_string(), id);
        self.recipes.push(recipe);
        Ok(id)
    }

    /// Phase 2: Mutate an existing recipe by name, e.g. to append additives
    /// contributed by another mod. Revalidated after the change.
    pub fn mutate_recipe<F>(&mut self, name: &str, f: F) -> Result<(), RecipeError>
    where
        F: FnOnce(&mut MixRecipeBuilder),
    {
        let id = self
            .name_to_id
            .get(name)
            .ok_or_else(|| RecipeError::NotFound(name.to_string()))?;
        let recipe = &mut self.recipes[id.0 as usize];
        let before = recipe.clone();
        f(recipe);
        if let Err(err) = recipe.validate() {
            *recipe = before;
            return Err(err);
        }
        Ok(())
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.name_to_id.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Phase 3: Resolve tags and build the immutable registry.
    pub fn build(self, tags: &impl TagResolver) -> Result<RecipeRegistry, RecipeError> {
        let recipes = self
            .recipes
            .into_iter()
            .map(|recipe| recipe.freeze(tags))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("mix registry frozen with {} recipes", recipes.len());
        Ok(RecipeRegistry {
            recipes,
            name_to_id: self.name_to_id,
        })
    }
}

/// Immutable, ordered set of mix recipes. Frozen after build(). Thread-safe
/// to share.
#[derive(Debug, Default)]
pub struct RecipeRegistry {
    recipes: Vec<MixRecipe>,
    name_to_id: HashMap<String, RecipeId>,
}

impl RecipeRegistry {
    /// First recipe, in registration order, whose identity check passes.
    pub fn find_match(
        &self,
        fluid: &FluidAmount,
        oxidizer: &ItemBatch,
        reducer: &ItemBatch,
        purifier: &ItemBatch,
    ) -> Option<(RecipeId, &MixRecipe)> {
        self.iter()
            .find(|(_, recipe)| recipe.matches(fluid, oxidizer, reducer, purifier))
    }

    /// Like [`RecipeRegistry::find_match`] but only considers recipes
    /// producing `output`.
    pub fn find_match_for_output(
        &self,
        fluid: &FluidAmount,
        oxidizer: &ItemBatch,
        reducer: &ItemBatch,
        purifier: &ItemBatch,
        output: FluidKind,
    ) -> Option<(RecipeId, &MixRecipe)> {
        self.iter().find(|(_, recipe)| {
            recipe.output_rule().fluid() == output
                && recipe.matches(fluid, oxidizer, reducer, purifier)
        })
    }

    /// Recipes accepting `item` in `slot`, for recipe viewers.
    pub fn recipes_using(
        &self,
        slot: AdditiveSlot,
        item: ItemKind,
    ) -> impl Iterator<Item = (RecipeId, &MixRecipe)> {
        self.iter().filter(move |(_, recipe)| {
            recipe
                .rules(slot)
                .iter()
                .any(|rule| rule.matcher.accepts(item))
        })
    }

    pub fn get(&self, id: RecipeId) -> Option<&MixRecipe> {
        self.recipes.get(id.0 as usize)
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.name_to_id.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecipeId, &MixRecipe)> {
        self.recipes
            .iter()
            .enumerate()
            .map(|(i, recipe)| (RecipeId(i as u32), recipe))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Malformed recipe definitions, reported at load time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe '{recipe}': {slot} consume chance {chance} is outside 0..=100")]
    InvalidChance {
        recipe: String,
        slot: AdditiveSlot,
        chance: i32,
    },
    #[error("recipe '{recipe}' has no {slot} rules")]
    NoAdditives { recipe: String, slot: AdditiveSlot },
    #[error("recipe '{recipe}' has a {slot} rule with an empty item list")]
    EmptyMatcher { recipe: String, slot: AdditiveSlot },
    #[error("recipe '{0}' uses zero input fluid per conversion")]
    ZeroInputVolume(String),
    #[error("recipe '{0}' produces zero output fluid")]
    ZeroOutputVolume(String),
    #[error("recipe '{recipe}' references unknown tag '{tag}'")]
    UnknownTag { recipe: String, tag: String },
    #[error("duplicate recipe name: {0}")]
    DuplicateName(String),
    #[error("not found: {0}")]
    NotFound(String),
}
