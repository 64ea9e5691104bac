use crate::chromosome::{FitnessRecord, RoutePlan};
use crate::fitness::driven_plan;
use crate::genetic_algorithm::{GenerationStats, Observer};
use crate::instance::ProblemInstance;
use chrono::Local;
use colored::Colorize;
use csv::Writer;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub history: Vec<GenerationStats>,
}

impl Observer for RecordingObserver {
    fn on_generation(&mut self, stats: &GenerationStats) {
        self.history.push(*stats);
    }
}

#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn on_generation(&mut self, stats: &GenerationStats) {
        println!(
            "{} - Min fitness: {:.6}, avg fitness: {:.6}, best so far: {:.6}, replaced: {} ({} total)",
            format!("Generation {:3}", stats.generation).bold().red(),
            stats.min_fitness,
            stats.avg_fitness,
            stats.best_so_far,
            stats.replacements,
            stats.infeasible_total,
        );
    }
}

/// Writes one CSV row per generation. Write failures are logged and the
/// first one is returned from `finish`.
pub struct CsvObserver<W: Write> {
    writer: Writer<W>,
    error: Option<csv::Error>,
}

impl CsvObserver<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, csv::Error> {
        Ok(Self::from_writer(File::create(path)?))
    }
}

impl<W: Write> CsvObserver<W> {
    pub fn from_writer(writer: W) -> Self {
        CsvObserver {
            writer: Writer::from_writer(writer),
            error: None,
        }
    }

    pub fn finish(mut self) -> Result<W, csv::Error> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        self.writer.flush()?;
        self.writer.into_inner().map_err(|error| {
            io::Error::new(error.error().kind(), error.error().to_string()).into()
        })
    }
}

impl<W: Write> Observer for CsvObserver<W> {
    fn on_generation(&mut self, stats: &GenerationStats) {
        if self.error.is_some() {
            return;
        }

        if let Err(error) = self.writer.serialize(stats) {
            warn!(%error, generation = stats.generation, "failed to write generation stats");
            self.error = Some(error);
        }
    }
}

pub fn timestamped_path(prefix: &str) -> String {
    format!("{}_{}.csv", prefix, Local::now().format("%Y%m%d_%H%M%S"))
}

// Route listing with the external node ids, charging detours included
pub fn describe_plan(plan: &RoutePlan, instance: &ProblemInstance) -> Vec<String> {
    let label = |index: usize| {
        instance
            .node(index)
            .map(|node| node.id.to_string())
            .unwrap_or_else(|_| "?".to_string())
    };

    driven_plan(plan, instance)
        .routes()
        .iter()
        .enumerate()
        .filter(|(_, route)| !route.is_empty())
        .map(|(vehicle, route)| {
            let stops = route
                .path()
                .into_iter()
                .map(&label)
                .collect::<Vec<_>>()
                .join(" -> ");
            format!("Vehicle {:2}: {}", vehicle, stops)
        })
        .collect()
}

pub fn print_summary(
    plan: &RoutePlan,
    record: &FitnessRecord,
    replacements: usize,
    instance: &ProblemInstance,
) {
    println!("{}", "Best solution".bold().green());
    for line in describe_plan(plan, instance) {
        println!("  {}", line);
    }
    println!(
        "Fitness: {:.6}, distance: {:.2}, charging time: {:.2}, single-customer routes: {}, feasible: {}",
        record.fitness,
        record.total_distance,
        record.total_charging_time,
        record.single_customer_routes,
        record.feasible,
    );
    println!("Infeasible chromosomes replaced: {}", replacements);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chromosome::Route;
    use crate::instance::{EnergyModel, Node};

    fn stats(generation: usize) -> GenerationStats {
        GenerationStats {
            generation,
            min_fitness: 1.5,
            avg_fitness: 2.25,
            best_so_far: 1.5,
            replacements: 2,
            infeasible_total: 3,
        }
    }

    #[test]
    fn csv_observer_writes_header_and_rows() {
        let mut observer = CsvObserver::from_writer(Vec::new());
        observer.on_generation(&stats(0));
        observer.on_generation(&stats(1));

        let bytes = observer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "generation,min_fitness,avg_fitness,best_so_far,replacements,infeasible_total\n\
             0,1.5,2.25,1.5,2,3\n\
             1,1.5,2.25,1.5,2,3\n"
        );
    }

    #[test]
    fn describes_only_used_vehicles_with_external_ids() {
        let nodes = vec![
            Node::depot(100, 0.0, 0.0),
            Node::customer(7, 1.0, 0.0, 1),
            Node::customer(8, 2.0, 0.0, 1),
        ];
        let instance =
            ProblemInstance::from_coordinates(nodes, 2, EnergyModel::default()).unwrap();
        let plan = RoutePlan::new(vec![Route::empty(0), Route::new(0, vec![2, 1])]);

        assert_eq!(
            describe_plan(&plan, &instance),
            vec!["Vehicle  1: 100 -> 8 -> 7 -> 100".to_string()]
        );
    }

    #[test]
    fn lists_charging_detours_with_station_ids() {
        let nodes = vec![
            Node::depot(1, 0.0, 0.0),
            Node::customer(2, 0.0, 60.0, 1),
            Node::station(9, 10.0, 40.0),
        ];
        let instance =
            ProblemInstance::from_coordinates(nodes, 1, EnergyModel::default()).unwrap();
        let plan = RoutePlan::new(vec![Route::new(0, vec![1])]);

        assert_eq!(
            describe_plan(&plan, &instance),
            vec!["Vehicle  0: 1 -> 2 -> 9 -> 1".to_string()]
        );
    }
}
