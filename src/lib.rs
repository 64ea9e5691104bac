pub mod chromosome;
pub mod config;
pub mod crossover;
pub mod demo_data;
pub mod error;
pub mod fitness;
pub mod genetic_algorithm;
pub mod genetic_optimizer;
pub mod instance;
pub mod mutation;
pub mod population;
pub mod report;
pub mod selection;

pub use chromosome::{FitnessRecord, Route, RoutePlan};
pub use config::GeneticConfig;
pub use error::{ConfigError, DataError, EvrpError};
pub use genetic_algorithm::{Chromosome, GenerationStats, Observer, Optimizer};
pub use genetic_optimizer::{GeneticOptimizer, RunOutcome};
pub use instance::{EnergyModel, Node, NodeKind, ProblemInstance};
