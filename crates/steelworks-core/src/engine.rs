//! Per-tick mixing for heated vessels.
//!
//! Each call to [`MixEngine::step`] runs one mixing operation:
//!
//! 1. **Match** -- reuse the vessel's cached recipe if it still matches,
//!    otherwise scan the registry in priority order.
//! 2. **Check** -- temperature, fluid, additive presence, output space.
//! 3. **Apply** -- drain the converted input, fill the output tank, then roll
//!    additive consumption exactly once.

use crate::additive::AdditiveSlot;
use crate::fluid::{FluidAmount, FluidTank};
use crate::id::{FluidKind, RecipeId};
use crate::item::ItemBatch;
use crate::recipe::{MixRecipe, StallReason};
use crate::registry::RecipeRegistry;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vessel
// ---------------------------------------------------------------------------

/// Host-owned snapshot of a heated container. Borrowed mutably for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vessel {
    /// Fluid waiting to be mixed.
    pub input: Option<FluidAmount>,
    /// Mixed products.
    pub output: FluidTank,
    pub oxidizer: Option<ItemBatch>,
    pub reducer: Option<ItemBatch>,
    pub purifier: Option<ItemBatch>,
    pub temperature: i32,
    /// Recipe that matched last step. Maintained by the engine.
    #[serde(default)]
    pub cached_recipe: Option<RecipeId>,
    /// Only run recipes producing this fluid.
    #[serde(default)]
    pub output_filter: Option<FluidKind>,
}

impl Vessel {
    pub fn new(output_capacity: u32) -> Self {
        Self {
            output: FluidTank::new(output_capacity),
            ..Self::default()
        }
    }

    pub fn additive(&self, slot: AdditiveSlot) -> Option<&ItemBatch> {
        match slot {
            AdditiveSlot::Oxidizer => self.oxidizer.as_ref(),
            AdditiveSlot::Reducer => self.reducer.as_ref(),
            AdditiveSlot::Purifier => self.purifier.as_ref(),
        }
    }

    pub fn set_additive(&mut self, slot: AdditiveSlot, batch: Option<ItemBatch>) {
        let target = match slot {
            AdditiveSlot::Oxidizer => &mut self.oxidizer,
            AdditiveSlot::Reducer => &mut self.reducer,
            AdditiveSlot::Purifier => &mut self.purifier,
        };
        *target = batch;
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What a completed mixing operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixReport {
    pub recipe: RecipeId,
    pub conversions: u32,
    /// Input fluid drained from the vessel.
    pub consumed: FluidAmount,
    /// Output fluid added to the vessel's tank.
    pub produced: FluidAmount,
    /// Additive items used up, per slot (oxidizer, reducer, purifier).
    pub additives_used: [u32; 3],
}

/// Result of one engine step. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixOutcome {
    /// No recipe matches the vessel contents.
    Idle,
    /// A recipe matches but cannot run yet.
    Stalled { recipe: RecipeId, reason: StallReason },
    Mixed(MixReport),
}

impl MixOutcome {
    pub fn is_mixed(&self) -> bool {
        matches!(self, MixOutcome::Mixed(_))
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Applies mix recipes from a frozen registry to vessels.
#[derive(Debug)]
pub struct MixEngine {
    registry: RecipeRegistry,
}

impl MixEngine {
    pub fn new(registry: RecipeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RecipeRegistry {
        &self.registry
    }

    /// Find the recipe for the vessel's current contents, preferring the
    /// cached one.
    pub fn resolve(&self, vessel: &Vessel) -> Option<(RecipeId, &MixRecipe)> {
        let fluid = vessel.input.as_ref()?;
        let oxidizer = vessel.oxidizer.as_ref()?;
        let reducer = vessel.reducer.as_ref()?;
        let purifier = vessel.purifier.as_ref()?;

        let accepts = |recipe: &MixRecipe| {
            vessel
                .output_filter
                .is_none_or(|filter| recipe.output_rule().fluid() == filter)
        };

        if let Some(id) = vessel.cached_recipe {
            if let Some(recipe) = self.registry.get(id) {
                if accepts(recipe) && recipe.matches(fluid, oxidizer, reducer, purifier) {
                    return Some((id, recipe));
                }
            }
        }

        match vessel.output_filter {
            Some(filter) => {
                self.registry
                    .find_match_for_output(fluid, oxidizer, reducer, purifier, filter)
            }
            None => self.registry.find_match(fluid, oxidizer, reducer, purifier),
        }
    }

    /// Run one mixing operation on `vessel`.
    pub fn step(&self, vessel: &mut Vessel, rng: &mut impl RandomSource) -> MixOutcome {
        let Some((id, recipe)) = self.resolve(vessel) else {
            vessel.cached_recipe = None;
            log::trace!("vessel idle: no matching mix recipe");
            return MixOutcome::Idle;
        };
        vessel.cached_recipe = Some(id);

        // `resolve` only succeeds when every slot is filled.
        let (Some(fluid), Some(oxidizer), Some(reducer), Some(purifier)) = (
            vessel.input,
            vessel.oxidizer.as_mut(),
            vessel.reducer.as_mut(),
            vessel.purifier.as_mut(),
        ) else {
            return MixOutcome::Idle;
        };

        if let Err(reason) = recipe.check(&fluid, oxidizer, reducer, purifier, vessel.temperature) {
            log::trace!("mix '{}' stalled: {reason:?}", recipe.name());
            return MixOutcome::Stalled { recipe: id, reason };
        }

        let mut conversions = recipe.conversions(&fluid, oxidizer, reducer, purifier);
        let per_conversion = recipe
            .output_rule()
            .volume_per_conversion(vessel.temperature);
        if per_conversion > 0 {
            conversions = conversions.min(vessel.output.space() / per_conversion);
        }
        if conversions == 0 {
            log::trace!("mix '{}' stalled: output full", recipe.name());
            return MixOutcome::Stalled {
                recipe: id,
                reason: StallReason::OutputFull,
            };
        }

        let consumed = fluid.with_volume(conversions * recipe.input().volume);
        let produced = recipe.get_output(&consumed, vessel.temperature);

        let before = [oxidizer.count, reducer.count, purifier.count];
        recipe.update_additives(
            &consumed,
            oxidizer,
            reducer,
            purifier,
            vessel.temperature,
            rng,
        );
        let additives_used = [
            before[0] - oxidizer.count,
            before[1] - reducer.count,
            before[2] - purifier.count,
        ];

        vessel.input = Some(fluid.drained(consumed.volume));
        // Conversions were capped by free space, so nothing overflows.
        let _ = vessel.output.fill(produced);

        log::trace!(
            "mix '{}' ran {conversions} conversions: {consumed:?} -> {produced:?}",
            recipe.name()
        );
        MixOutcome::Mixed(MixReport {
            recipe: id,
            conversions,
            consumed,
            produced,
            additives_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn empty_vessel_is_idle() {
        let engine = steel_engine();
        let mut vessel = Vessel::new(100);
        let mut rng = CountingRng::new(1);
        assert_eq!(engine.step(&mut vessel, &mut rng), MixOutcome::Idle);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn missing_slot_is_idle() {
        let engine = steel_engine();
        let mut vessel = steel_vessel(1200);
        vessel.set_additive(AdditiveSlot::Purifier, None);
        assert_eq!(
            engine.step(&mut vessel, &mut CountingRng::new(1)),
            MixOutcome::Idle
        );
    }

    #[test]
    fn cold_vessel_stalls_without_mutation() {
        let engine = steel_engine();
        let mut vessel = steel_vessel(999);
        let before = vessel.clone();
        let outcome = engine.step(&mut vessel, &mut CountingRng::new(1));
        assert_eq!(
            outcome,
            MixOutcome::Stalled {
                recipe: RecipeId(0),
                reason: StallReason::BelowTemperature
            }
        );
        assert_eq!(vessel.input, before.input);
        assert_eq!(vessel.oxidizer, before.oxidizer);
        assert_eq!(vessel.reducer, before.reducer);
        assert_eq!(vessel.purifier, before.purifier);
        assert_eq!(vessel.cached_recipe, Some(RecipeId(0)));
    }

    #[test]
    fn hot_vessel_mixes() {
        let engine = steel_engine();
        let mut vessel = steel_vessel(1200);
        let MixOutcome::Mixed(report) = engine.step(&mut vessel, &mut seeded_rng()) else {
            panic!("expected a mix");
        };
        assert_eq!(report.conversions, 3);
        assert_eq!(report.consumed, FluidAmount::new(slag(), 3));
        assert_eq!(report.produced, FluidAmount::new(steel(), 3));
        assert_eq!(report.additives_used[1], 3);
        assert_eq!(report.additives_used[2], 0);
        assert_eq!(vessel.input, Some(FluidAmount::new(slag(), 7)));
        assert_eq!(vessel.output.volume_of(steel()), 3);
        assert_eq!(vessel.reducer.as_ref().map(|b| b.count), Some(0));
        assert_eq!(vessel.purifier.as_ref().map(|b| b.count), Some(2));
    }

    #[test]
    fn second_step_stalls_once_reducer_is_spent() {
        let engine = steel_engine();
        let mut vessel = steel_vessel(1200);
        let mut rng = seeded_rng();
        assert!(engine.step(&mut vessel, &mut rng).is_mixed());
        assert_eq!(
            engine.step(&mut vessel, &mut rng),
            MixOutcome::Stalled {
                recipe: RecipeId(0),
                reason: StallReason::MissingAdditive(AdditiveSlot::Reducer)
            }
        );
    }

    #[test]
    fn full_output_tank_stalls() {
        let engine = steel_engine();
        let mut vessel = steel_vessel(1200);
        vessel.output = FluidTank::new(0);
        let outcome = engine.step(&mut vessel, &mut seeded_rng());
        assert_eq!(
            outcome,
            MixOutcome::Stalled {
                recipe: RecipeId(0),
                reason: StallReason::OutputFull
            }
        );
        assert_eq!(vessel.reducer.as_ref().map(|b| b.count), Some(3));
    }

    #[test]
    fn output_space_caps_conversions() {
        let engine = steel_engine();
        let mut vessel = steel_vessel(1200);
        vessel.output = FluidTank::new(2);
        let MixOutcome::Mixed(report) = engine.step(&mut vessel, &mut seeded_rng()) else {
            panic!("expected a mix");
        };
        assert_eq!(report.conversions, 2);
        assert_eq!(vessel.reducer.as_ref().map(|b| b.count), Some(1));
        assert_eq!(vessel.output.space(), 0);
    }

    #[test]
    fn stale_cache_is_replaced() {
        let engine = steel_engine();
        let mut vessel = steel_vessel(1200);
        vessel.cached_recipe = Some(RecipeId(42));
        assert!(engine.step(&mut vessel, &mut seeded_rng()).is_mixed());
        assert_eq!(vessel.cached_recipe, Some(RecipeId(0)));
    }

    #[test]
    fn output_filter_blocks_other_recipes() {
        let engine = steel_engine();
        let mut vessel = steel_vessel(1200);
        vessel.output_filter = Some(pig_iron());
        assert_eq!(
            engine.step(&mut vessel, &mut seeded_rng()),
            MixOutcome::Idle
        );
        assert_eq!(vessel.cached_recipe, None);
    }
}
