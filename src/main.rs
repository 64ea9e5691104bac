use evrp_genetic::demo_data::{self, DemoLayout};
use evrp_genetic::genetic_algorithm::Optimizer;
use evrp_genetic::report::{print_summary, timestamped_path, ConsoleObserver, CsvObserver};
use evrp_genetic::{GeneticConfig, GeneticOptimizer};
use std::error::Error;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GeneticConfig {
        population_size: 60,
        generations: 150,
        elite_size: 3,
        tournament_size: 4,
        battery_capacity: 120.0,
        ..Default::default()
    };

    let layout = DemoLayout {
        depots: 3,
        customers: 60,
        stations: 9,
        vehicles: 9,
        seed: config.seed,
    };

    let instance = demo_data::instance(layout, config.energy_model())?;
    info!(
        depots = instance.depots().len(),
        customers = instance.customers().len(),
        stations = instance.stations().len(),
        vehicles = instance.vehicle_count(),
        "demo instance ready"
    );

    let csv_path = timestamped_path("evrp_generations");
    let csv = CsvObserver::create(&csv_path)?;
    let mut observers = (ConsoleObserver, csv);

    let mut optimizer = GeneticOptimizer::new(config, instance.clone())?;
    let start = Instant::now();
    let outcome = optimizer.optimize(&mut observers);
    let runtime = start.elapsed();

    let (_, csv) = observers;
    csv.finish()?;

    match outcome {
        Some(outcome) => {
            print_summary(
                &outcome.best,
                &outcome.record,
                outcome.infeasible_replacements,
                &instance,
            );
            info!(runtime = ?runtime, path = %csv_path, "generation statistics written");
        }
        None => info!("population was empty, nothing to report"),
    }

    Ok(())
}
