//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::engine::{MixEngine, Vessel};
use crate::fluid::FluidAmount;
use crate::id::{FluidKind, ItemKind};
use crate::item::ItemBatch;
use crate::recipe::{MixRecipeBuilder, OutputRule};
use crate::registry::RecipeRegistryBuilder;
use crate::rng::{RandomSource, SimRng};
use crate::tag::NoTags;

// ===========================================================================
// Fluids
// ===========================================================================

pub fn slag() -> FluidKind {
    FluidKind(0)
}
pub fn steel() -> FluidKind {
    FluidKind(1)
}
pub fn pig_iron() -> FluidKind {
    FluidKind(2)
}

// ===========================================================================
// Additive items
// ===========================================================================

pub fn dust_a() -> ItemKind {
    ItemKind(0)
}
pub fn dust_b() -> ItemKind {
    ItemKind(1)
}
pub fn dust_c() -> ItemKind {
    ItemKind(2)
}
pub fn dust_d() -> ItemKind {
    ItemKind(3)
}

pub fn batch(kind: ItemKind, count: u32) -> ItemBatch {
    ItemBatch::new(kind, count)
}

// ===========================================================================
// Recipes
// ===========================================================================

/// slag -> steel, 1:1, at 1000 degrees or hotter. Oxidizer dust_a (50%),
/// reducer dust_b (100%), purifier dust_c (0%).
pub fn steel_mix() -> MixRecipeBuilder {
    MixRecipeBuilder::new(
        "steel",
        FluidAmount::new(slag(), 1),
        OutputRule::PerConversion {
            fluid: steel(),
            volume: 1,
        },
    )
    .min_temperature(1000)
    .oxidizer_item(dust_a(), 50)
    .reducer_item(dust_b(), 100)
    .purifier_item(dust_c(), 0)
}

/// An engine whose registry holds only [`steel_mix`].
pub fn steel_engine() -> MixEngine {
    let mut builder = RecipeRegistryBuilder::new();
    builder
        .register(steel_mix())
        .expect("steel mix is valid");
    MixEngine::new(builder.build(&NoTags).expect("no tags to resolve"))
}

/// 10 slag, 5 oxidizer, 3 reducer, 2 purifier, roomy output tank.
pub fn steel_vessel(temperature: i32) -> Vessel {
    let mut vessel = Vessel::new(1000);
    vessel.input = Some(FluidAmount::new(slag(), 10));
    vessel.oxidizer = Some(batch(dust_a(), 5));
    vessel.reducer = Some(batch(dust_b(), 3));
    vessel.purifier = Some(batch(dust_c(), 2));
    vessel.temperature = temperature;
    vessel
}

// ===========================================================================
// Randomness
// ===========================================================================

pub fn seeded_rng() -> SimRng {
    SimRng::new(42)
}

/// Wraps [`SimRng`] and counts how many values were drawn.
#[derive(Debug, Clone)]
pub struct CountingRng {
    inner: SimRng,
    draws: u64,
}

impl CountingRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: SimRng::new(seed),
            draws: 0,
        }
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RandomSource for CountingRng {
    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.inner.next_u64()
    }
}
