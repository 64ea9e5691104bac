use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evrp_genetic::demo_data::{self, DemoLayout};
use evrp_genetic::fitness::evaluate_population;
use evrp_genetic::population::generate_initial_population;
use evrp_genetic::GeneticConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_population_evaluation(c: &mut Criterion) {
    let config = GeneticConfig::default();
    let layout = DemoLayout {
        depots: 4,
        customers: 200,
        stations: 16,
        vehicles: 20,
        seed: 1,
    };
    let instance = demo_data::instance(layout, config.energy_model()).unwrap();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let population = generate_initial_population(&instance, 100, &mut rng).members;

    c.bench_function("evaluate 100 plans x 200 customers", |b| {
        b.iter(|| evaluate_population(black_box(population.clone()), &instance, &config))
    });
}

criterion_group!(benches, bench_population_evaluation);
criterion_main!(benches);
