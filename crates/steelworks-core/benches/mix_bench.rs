use criterion::{Criterion, black_box, criterion_group, criterion_main};
use steelworks_core::engine::MixEngine;
use steelworks_core::fluid::FluidAmount;
use steelworks_core::id::{FluidKind, ItemKind};
use steelworks_core::recipe::{MixRecipeBuilder, OutputRule};
use steelworks_core::registry::RecipeRegistryBuilder;
use steelworks_core::tag::NoTags;
use steelworks_core::test_utils::*;

/// `n` decoy recipes on distinct fluids, then the steel mix last.
fn crowded_engine(n: u32) -> MixEngine {
    let mut builder = RecipeRegistryBuilder::new();
    for i in 0..n {
        builder
            .register(
                MixRecipeBuilder::new(
                    &format!("decoy_{i}"),
                    FluidAmount::new(FluidKind(100 + i), 1),
                    OutputRule::PerConversion { fluid: steel(), volume: 1 },
                )
                .oxidizer_item(ItemKind(100 + i), 10)
                .reducer_item(dust_b(), 10)
                .purifier_item(dust_c(), 10),
            )
            .unwrap();
    }
    builder.register(steel_mix()).unwrap();
    MixEngine::new(builder.build(&NoTags).unwrap())
}

fn bench_find_match(c: &mut Criterion) {
    let engine = crowded_engine(500);
    let fluid = FluidAmount::new(slag(), 10);
    let (ox, red, pur) = (batch(dust_a(), 5), batch(dust_b(), 3), batch(dust_c(), 2));
    c.bench_function("find_match_500", |b| {
        b.iter(|| {
            black_box(
                engine
                    .registry()
                    .find_match(black_box(&fluid), &ox, &red, &pur),
            )
        })
    });
}

fn bench_step_cached(c: &mut Criterion) {
    let engine = crowded_engine(500);
    let mut rng = seeded_rng();
    c.bench_function("step_cached_500", |b| {
        b.iter(|| {
            let mut vessel = steel_vessel(1200);
            vessel.cached_recipe = engine.registry().recipe_id("steel");
            black_box(engine.step(&mut vessel, &mut rng))
        })
    });
}

criterion_group!(benches, bench_find_match, bench_step_cached);
criterion_main!(benches);
