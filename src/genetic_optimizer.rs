use crate::chromosome::{FitnessRecord, RoutePlan};
use crate::config::GeneticConfig;
use crate::crossover::bcrc_crossover;
use crate::error::EvrpError;
use crate::fitness::evaluate_population;
use crate::genetic_algorithm::{Algorithm, Chromosome, GenerationStats, Meta, Observer, Optimizer};
use crate::instance::ProblemInstance;
use crate::mutation::mutate;
use crate::population::{generate_initial_chromosome, generate_initial_population, Population};
use crate::selection::{get_elites, selection};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

#[derive(Debug)]
pub struct EvrpAlgorithm {
    pub config: GeneticConfig,
    pub instance: ProblemInstance,
}

impl EvrpAlgorithm {
    /// Validates the configuration and installs its energy model on the
    /// instance, so the evaluator reads battery parameters from one place.
    pub fn new(config: GeneticConfig, instance: ProblemInstance) -> Result<Self, EvrpError> {
        config.validate()?;
        let instance = instance.with_energy_model(config.energy_model());

        Ok(EvrpAlgorithm { config, instance })
    }
}

impl Algorithm<GeneticConfig, RoutePlan> for EvrpAlgorithm {
    fn meta(&self) -> &GeneticConfig {
        &self.config
    }

    fn generate_one(&self, rng: &mut StdRng) -> RoutePlan {
        generate_initial_chromosome(&self.instance, rng)
    }

    fn generate(&self, rng: &mut StdRng) -> Vec<RoutePlan> {
        generate_initial_population(&self.instance, self.config.population_size, rng).members
    }

    fn evaluate(&self, population: Vec<RoutePlan>) -> Vec<RoutePlan> {
        evaluate_population(population, &self.instance, &self.config)
    }

    fn select(&self, population: &[RoutePlan], rng: &mut StdRng) -> Vec<RoutePlan> {
        selection(
            population,
            self.config.elite_size,
            self.config.tournament_size,
            rng,
        )
    }

    fn elitism(&self, population: &[RoutePlan]) -> Vec<RoutePlan> {
        get_elites(population, self.config.elite_size)
    }

    fn crossover(&self, pool: &[RoutePlan], offspring: usize, rng: &mut StdRng) -> Vec<RoutePlan> {
        let mut children = Vec::with_capacity(offspring);

        for _ in 0..offspring {
            let (Some(parent_a), Some(parent_b)) = (pool.choose(rng), pool.choose(rng)) else {
                break;
            };

            if rng.gen_bool(self.config.crossover_probability) {
                children.push(bcrc_crossover(parent_a, parent_b, &self.instance, rng));
            } else {
                children.push(parent_a.clone());
            }
        }

        children
    }

    fn mutate(&self, population: Vec<RoutePlan>, rng: &mut StdRng) -> Vec<RoutePlan> {
        // sequential on purpose: every draw comes from the one run-wide stream
        population
            .into_iter()
            .map(|plan| mutate(plan, &self.instance, &self.config, rng))
            .collect()
    }

    fn is_infeasible(&self, chromosome: &RoutePlan) -> bool {
        chromosome.fitness() >= self.config.infeasibility_threshold
    }
}

// `Evolving` covers one whole loop pass in `step`: record stats, select,
// crossover, mutate, reevaluate, replace infeasible offspring, advance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Init,
    Evolving,
    Done,
}

#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub best: RoutePlan,
    pub record: FitnessRecord,
    pub infeasible_replacements: usize,
    pub history: Vec<GenerationStats>,
}

#[derive(Debug)]
pub struct GeneticOptimizer {
    pub algorithm: Box<dyn Algorithm<GeneticConfig, RoutePlan>>,
    rng: StdRng,
    state: EngineState,
    population: Population,
    best: Option<RoutePlan>,
}

impl GeneticOptimizer {
    pub fn new(config: GeneticConfig, instance: ProblemInstance) -> Result<Self, EvrpError> {
        let algorithm = EvrpAlgorithm::new(config, instance)?;
        Ok(Self::with_algorithm(Box::new(algorithm)))
    }

    pub fn with_algorithm(algorithm: Box<dyn Algorithm<GeneticConfig, RoutePlan>>) -> Self {
        let rng = StdRng::seed_from_u64(algorithm.meta().seed);

        GeneticOptimizer {
            algorithm,
            rng,
            state: EngineState::Init,
            population: Population::default(),
            best: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    fn initialize(&mut self) {
        let members = self.algorithm.generate(&mut self.rng);
        self.population = Population {
            members: self.algorithm.evaluate(members),
            ..Default::default()
        };
        self.state = EngineState::Evolving;
    }

    /// Runs one generation: records the statistics of the current population,
    /// breeds the non-elite slots, scores them, swaps out infeasible offspring
    /// and installs the elites ahead of them.
    pub fn step(&mut self) -> GenerationStats {
        if self.state == EngineState::Init {
            self.initialize();
        }

        let mut stats = self.record_generation();

        let meta = self.algorithm.meta();
        let offspring_count = meta.population_size().saturating_sub(meta.elite_size());
        let members = &self.population.members;

        let pool = self.algorithm.select(members, &mut self.rng);
        let elites = self.algorithm.elitism(members);
        let children = self.algorithm.crossover(&pool, offspring_count, &mut self.rng);
        let children = self.algorithm.mutate(children, &mut self.rng);
        let children = self.algorithm.evaluate(children);
        let (children, replaced) = self.replace_infeasible(children);

        let mut next = elites;
        next.extend(children);

        self.population.members = next;
        self.population.generation += 1;
        self.population.infeasible_replacements += replaced;
        stats.replacements = replaced;
        stats.infeasible_total = self.population.infeasible_replacements;

        debug!(
            generation = stats.generation,
            min_fitness = stats.min_fitness,
            avg_fitness = stats.avg_fitness,
            replaced,
            "generation finished"
        );

        stats
    }

    // Infeasible offspring are swapped for one fresh random plan each. The
    // replacement is scored but kept even when it is infeasible too.
    fn replace_infeasible(&mut self, children: Vec<RoutePlan>) -> (Vec<RoutePlan>, usize) {
        let mut replaced = 0;
        let mut admitted = Vec::with_capacity(children.len());

        for (index, child) in children.into_iter().enumerate() {
            if !self.algorithm.is_infeasible(&child) {
                admitted.push(child);
                continue;
            }

            trace!(index, fitness = child.fitness(), "replacing infeasible chromosome");
            let fresh = self.algorithm.generate_one(&mut self.rng);
            admitted.extend(self.algorithm.evaluate(vec![fresh]));
            replaced += 1;
        }

        (admitted, replaced)
    }

    fn record_generation(&mut self) -> GenerationStats {
        let members = &self.population.members;
        let fitness: Vec<f64> = members.iter().map(Chromosome::fitness).collect();

        let min_fitness = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let avg_fitness = if fitness.is_empty() {
            f64::INFINITY
        } else {
            fitness.iter().sum::<f64>() / fitness.len() as f64
        };

        self.update_best();

        GenerationStats {
            generation: self.population.generation,
            min_fitness,
            avg_fitness,
            best_so_far: self.best.as_ref().map_or(f64::INFINITY, Chromosome::fitness),
            replacements: 0,
            infeasible_total: self.population.infeasible_replacements,
        }
    }

    // Earliest member with the lowest fitness, kept only on strict improvement
    fn update_best(&mut self) {
        let leader = self
            .population
            .members
            .iter()
            .position_min_by(|a, b| a.fitness().total_cmp(&b.fitness()));

        let Some(leader) = leader.map(|index| &self.population.members[index]) else {
            return;
        };

        let improved = self
            .best
            .as_ref()
            .map_or(true, |best| leader.fitness() < best.fitness());

        if improved {
            info!(
                generation = self.population.generation,
                fitness = leader.fitness(),
                "new best chromosome"
            );
            self.best = Some(leader.clone());
        }
    }

    fn finish(&mut self, history: Vec<GenerationStats>) -> Option<RunOutcome> {
        self.update_best();
        self.state = EngineState::Done;

        let best = self.best.clone()?;
        let record = *best.record()?;

        Some(RunOutcome {
            best,
            record,
            infeasible_replacements: self.population.infeasible_replacements,
            history,
        })
    }
}

impl Optimizer<RoutePlan> for GeneticOptimizer {
    type Outcome = Option<RunOutcome>;

    fn optimize(&mut self, observer: &mut dyn Observer) -> Self::Outcome {
        let meta = self.algorithm.meta();
        info!(
            population_size = meta.population_size(),
            generations = meta.generations(),
            elite_size = meta.elite_size(),
            seed = meta.seed,
            "starting genetic search"
        );

        let generations = meta.generations();
        let mut history = Vec::with_capacity(generations);

        if self.state == EngineState::Init {
            self.initialize();
        }

        while self.population.generation < generations {
            let stats = self.step();
            observer.on_generation(&stats);
            history.push(stats);
        }

        let outcome = self.finish(history);
        if let Some(outcome) = outcome.as_ref() {
            info!(
                fitness = outcome.record.fitness,
                distance = outcome.record.total_distance,
                charging_time = outcome.record.total_charging_time,
                replacements = outcome.infeasible_replacements,
                "search finished"
            );
        }

        outcome
    }
}
