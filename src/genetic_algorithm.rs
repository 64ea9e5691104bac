use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt::Debug;

// This trait represents a chromosome - a single solution to
// the problem we're solving. Lower fitness is better.
pub trait Chromosome: Send + Sync + Debug + Clone {
    fn fitness(&self) -> f64;
    fn is_evaluated(&self) -> bool;
}

// This trait represents a configuration of the algorithm
pub trait Meta: Send + Sync + Debug + Clone {
    fn population_size(&self) -> usize;
    fn elite_size(&self) -> usize;
    fn generations(&self) -> usize;
}

// Statistics reported once per generation. Fitness figures describe the
// population the generation starts from; the replacement counts include
// the offspring built during it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub min_fitness: f64,
    pub avg_fitness: f64,
    pub best_so_far: f64,
    pub replacements: usize,
    pub infeasible_total: usize,
}

// This trait receives the per-generation statistics, the engine
// itself never prints anything
pub trait Observer {
    fn on_generation(&mut self, stats: &GenerationStats);
}

impl<A: Observer, B: Observer> Observer for (A, B) {
    fn on_generation(&mut self, stats: &GenerationStats) {
        self.0.on_generation(stats);
        self.1.on_generation(stats);
    }
}

// This trait encapsulates the optimizer logic
pub trait Optimizer<C: Chromosome>: Send + Sync + Debug {
    type Outcome;

    fn optimize(&mut self, observer: &mut dyn Observer) -> Self::Outcome;
}

// This trait encapsulates the underlying genetic algorithm used by the
// optimizer to find the solution. Every method consuming randomness gets
// the single run-wide generator passed in explicitly.
pub trait Algorithm<M: Meta, C: Chromosome>: Send + Sync + Debug {
    fn meta(&self) -> &M;
    fn generate_one(&self, rng: &mut StdRng) -> C;
    fn generate(&self, rng: &mut StdRng) -> Vec<C>;
    fn evaluate(&self, population: Vec<C>) -> Vec<C>;
    fn select(&self, population: &[C], rng: &mut StdRng) -> Vec<C>;
    fn elitism(&self, population: &[C]) -> Vec<C>;
    fn crossover(&self, pool: &[C], offspring: usize, rng: &mut StdRng) -> Vec<C>;
    fn mutate(&self, population: Vec<C>, rng: &mut StdRng) -> Vec<C>;
    fn is_infeasible(&self, chromosome: &C) -> bool;
}
