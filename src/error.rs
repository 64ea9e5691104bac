use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("population size must be at least 1")]
    EmptyPopulation,
    #[error("elite size must be at least 1, otherwise the best plan can be lost")]
    ZeroEliteSize,
    #[error("elite size {elite_size} exceeds population size {population_size}")]
    EliteSizeTooLarge {
        elite_size: usize,
        population_size: usize,
    },
    #[error("tournament size {tournament_size} exceeds population size {population_size}")]
    TournamentSizeTooLarge {
        tournament_size: usize,
        population_size: usize,
    },
    #[error("tournament size must be at least 1")]
    ZeroTournamentSize,
    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    #[error("instance has no depots")]
    NoDepots,
    #[error("instance has no vehicles")]
    NoVehicles,
    #[error("node {0} is not part of the instance")]
    UnknownNode(usize),
    #[error("distance matrix must be {expected}x{expected}, got {rows} entries")]
    MatrixShape { expected: usize, rows: usize },
    #[error("distance matrix is not symmetric between nodes {from} and {to}")]
    AsymmetricMatrix { from: usize, to: usize },
    #[error("distance between nodes {from} and {to} is invalid: {value}")]
    InvalidDistance { from: usize, to: usize, value: f64 },
}

#[derive(Debug, Error)]
pub enum EvrpError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid problem instance: {0}")]
    Data(#[from] DataError),
}
