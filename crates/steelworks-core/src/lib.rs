//! Steelworks Core -- additive mixing for heated vessels.
//!
//! A mix converts an input fluid into an output fluid while three catalytic
//! additives (oxidizer, reducer, purifier) are consumed by chance. This crate
//! holds the recipe model and the per-tick engine; the host game supplies
//! fluids, item batches, temperatures and item-family tags.
//!
//! # Recipe Lifecycle
//!
//! Recipes are built, registered, then frozen. Nothing changes afterwards:
//!
//! ```rust,ignore
//! let mut builder = RecipeRegistryBuilder::new();
//! builder.register(
//!     MixRecipeBuilder::new("steel", FluidAmount::new(slag, 1), output)
//!         .min_temperature(1000)
//!         .oxidizer_item(sugar, 50)
//!         .reducer_tag("dustRedstone", 100)
//!         .purifier_item(sand, 0),
//! )?;
//! let engine = MixEngine::new(builder.build(&tags)?);
//! let outcome = engine.step(&mut vessel, &mut rng);
//! ```
//!
//! # Key Types
//!
//! - [`additive::MatchRule`] -- Item predicate plus percent consumption chance.
//! - [`recipe::MixRecipe`] -- Identity check (`matches`), applicability check
//!   (`can_mix`), output computation and additive consumption.
//! - [`registry::RecipeRegistry`] -- Ordered, immutable recipe list; first
//!   match wins.
//! - [`engine::MixEngine`] -- Runs one mixing operation per vessel per tick.
//! - [`rng::SimRng`] -- Deterministic SplitMix64 source for consumption rolls.

pub mod additive;
pub mod engine;
pub mod fluid;
pub mod id;
pub mod item;
pub mod recipe;
pub mod registry;
pub mod rng;
pub mod tag;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
