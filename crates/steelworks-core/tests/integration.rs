//! End-to-end mixing scenarios through the public API.

use steelworks_core::additive::AdditiveSlot;
use steelworks_core::engine::{MixEngine, MixOutcome};
use steelworks_core::fluid::FluidAmount;
use steelworks_core::recipe::{MixRecipeBuilder, OutputRule, StallReason};
use steelworks_core::registry::RecipeRegistryBuilder;
use steelworks_core::rng::SimRng;
use steelworks_core::tag::TagTable;
use steelworks_core::test_utils::*;

// ===========================================================================
// Recipe contract
// ===========================================================================

#[test]
fn slag_mix_end_to_end() {
    let engine = steel_engine();
    let (id, recipe) = engine
        .registry()
        .find_match(
            &FluidAmount::new(slag(), 10),
            &batch(dust_a(), 5),
            &batch(dust_b(), 3),
            &batch(dust_c(), 2),
        )
        .expect("steel mix should match");

    let fluid = FluidAmount::new(slag(), 10);
    let mut ox = batch(dust_a(), 5);
    let mut red = batch(dust_b(), 3);
    let mut pur = batch(dust_c(), 2);

    assert!(recipe.matches(&fluid, &ox, &red, &pur));
    assert!(recipe.can_mix(&fluid, &ox, &red, &pur, 1200));

    let convertible = recipe.convertible(&fluid, &ox, &red, &pur);
    assert_eq!(convertible.volume, 3, "reducer count caps throughput");
    assert_eq!(recipe.get_output(&convertible, 1200), FluidAmount::new(steel(), 3));

    let mut rng = SimRng::new(7);
    recipe.update_additives(&convertible, &mut ox, &mut red, &mut pur, 1200, &mut rng);
    assert_eq!(pur.count, 2);
    assert_eq!(red.count, 0);
    assert!((2..=5).contains(&ox.count));
    assert_eq!(engine.registry().get(id).map(|r| r.name()), Some("steel"));
}

#[test]
fn oxidizer_consumption_is_binomial() {
    let engine = steel_engine();
    let recipe = engine.registry().get(engine.registry().recipe_id("steel").unwrap()).unwrap();
    let convertible = FluidAmount::new(slag(), 3);

    let mut total_left = 0u32;
    let runs = 2000;
    for seed in 0..runs {
        let mut ox = batch(dust_a(), 5);
        let mut red = batch(dust_b(), 3);
        let mut pur = batch(dust_c(), 2);
        let mut rng = SimRng::new(seed);
        recipe.update_additives(&convertible, &mut ox, &mut red, &mut pur, 1200, &mut rng);
        assert!((2..=5).contains(&ox.count));
        total_left += ox.count;
    }
    // Expected 5 - 3 * 0.5 = 3.5 left on average.
    let mean = total_left as f64 / runs as f64;
    assert!((3.3..=3.7).contains(&mean), "mean oxidizer left: {mean}");
}

#[test]
fn below_temperature_changes_nothing() {
    let engine = steel_engine();
    let mut vessel = steel_vessel(999);
    let before = vessel.clone();
    let outcome = engine.step(&mut vessel, &mut seeded_rng());

    assert!(matches!(
        outcome,
        MixOutcome::Stalled { reason: StallReason::BelowTemperature, .. }
    ));
    assert_eq!(vessel.input, before.input);
    assert_eq!(vessel.output, before.output);
    assert_eq!(vessel.oxidizer, before.oxidizer);
    assert_eq!(vessel.reducer, before.reducer);
    assert_eq!(vessel.purifier, before.purifier);
}

// ===========================================================================
// Engine over several ticks
// ===========================================================================

#[test]
fn vessel_runs_until_reducer_is_restocked() {
    let engine = steel_engine();
    let mut vessel = steel_vessel(1200);
    let mut rng = seeded_rng();

    assert!(engine.step(&mut vessel, &mut rng).is_mixed());
    assert!(matches!(
        engine.step(&mut vessel, &mut rng),
        MixOutcome::Stalled {
            reason: StallReason::MissingAdditive(AdditiveSlot::Reducer),
            ..
        }
    ));

    vessel.set_additive(AdditiveSlot::Reducer, Some(batch(dust_b(), 64)));
    // Oxidizer may run out first; keep it stocked too.
    vessel.set_additive(AdditiveSlot::Oxidizer, Some(batch(dust_a(), 64)));
    let MixOutcome::Mixed(report) = engine.step(&mut vessel, &mut rng) else {
        panic!("expected a mix after restocking");
    };
    assert_eq!(report.conversions, 7);
    assert_eq!(vessel.input.map(|f| f.volume), Some(0));
    assert_eq!(vessel.output.volume_of(steel()), 10);

    assert!(matches!(
        engine.step(&mut vessel, &mut rng),
        MixOutcome::Stalled { reason: StallReason::InsufficientFluid, .. }
    ));
}

#[test]
fn same_seed_same_result() {
    let engine = steel_engine();
    let mut a = steel_vessel(1200);
    let mut b = steel_vessel(1200);
    let mut rng_a = SimRng::new(99);
    let mut rng_b = SimRng::new(99);
    assert_eq!(engine.step(&mut a, &mut rng_a), engine.step(&mut b, &mut rng_b));
    assert_eq!(a, b);
}

#[test]
fn tagged_reducer_accepts_any_member() {
    let mut tags = TagTable::new();
    tags.insert("dustReducer", dust_b());
    tags.insert("dustReducer", dust_d());

    let mut builder = RecipeRegistryBuilder::new();
    builder
        .register(
            MixRecipeBuilder::new(
                "tagged",
                FluidAmount::new(slag(), 2),
                OutputRule::PerConversion { fluid: pig_iron(), volume: 1 },
            )
            .oxidizer_item(dust_a(), 0)
            .reducer_tag("dustReducer", 100)
            .purifier_item(dust_c(), 0),
        )
        .unwrap();
    let engine = MixEngine::new(builder.build(&tags).unwrap());

    let mut vessel = steel_vessel(0);
    vessel.set_additive(AdditiveSlot::Reducer, Some(batch(dust_d(), 2)));
    let MixOutcome::Mixed(report) = engine.step(&mut vessel, &mut seeded_rng()) else {
        panic!("expected a mix");
    };
    assert_eq!(report.conversions, 2);
    assert_eq!(report.consumed, FluidAmount::new(slag(), 4));
    assert_eq!(report.produced, FluidAmount::new(pig_iron(), 2));
    assert_eq!(report.additives_used, [0, 2, 0]);
}
