use crate::genetic_algorithm::Chromosome;
use rand::Rng;

/// The `elite_size` fittest chromosomes, ties resolved by population order.
pub fn get_elites<C: Chromosome>(population: &[C], elite_size: usize) -> Vec<C> {
    let mut ranked: Vec<usize> = (0..population.len()).collect();
    // stable sort keeps the earlier index first on equal fitness
    ranked.sort_by(|&a, &b| population[a].fitness().total_cmp(&population[b].fitness()));

    ranked
        .into_iter()
        .take(elite_size)
        .map(|index| population[index].clone())
        .collect()
}

/// Samples `tournament_size` members with replacement and returns the best.
pub fn run_tournament<'a, C: Chromosome, R: Rng + ?Sized>(
    population: &'a [C],
    tournament_size: usize,
    rng: &mut R,
) -> &'a C {
    let mut winner = &population[rng.gen_range(0..population.len())];

    for _ in 1..tournament_size {
        let contender = &population[rng.gen_range(0..population.len())];
        if contender.fitness() < winner.fitness() {
            winner = contender;
        }
    }

    winner
}

/// Mating pool: the elites followed by one tournament winner for every
/// remaining slot of the population.
pub fn selection<C: Chromosome, R: Rng + ?Sized>(
    population: &[C],
    elite_size: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<C> {
    let mut pool = get_elites(population, elite_size);
    let remaining = population.len().saturating_sub(elite_size);

    pool.extend((0..remaining).map(|_| run_tournament(population, tournament_size, rng).clone()));
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Clone, Debug, PartialEq)]
    struct Scored(usize, f64);

    impl Chromosome for Scored {
        fn fitness(&self) -> f64 {
            self.1
        }

        fn is_evaluated(&self) -> bool {
            true
        }
    }

    fn population() -> Vec<Scored> {
        vec![
            Scored(0, 5.0),
            Scored(1, 2.0),
            Scored(2, 9.0),
            Scored(3, 2.0),
            Scored(4, 1.0),
        ]
    }

    #[test]
    fn elites_are_lowest_fitness_with_stable_ties() {
        let elites = get_elites(&population(), 3);
        assert_eq!(elites, vec![Scored(4, 1.0), Scored(1, 2.0), Scored(3, 2.0)]);
    }

    #[test]
    fn full_tournament_is_likely_to_find_best() {
        let population = population();
        let mut rng = StdRng::seed_from_u64(1);

        // a tournament can never return something worse than its entrants,
        // and with a large sample the global best is found
        let winner = run_tournament(&population, 64, &mut rng);
        assert_eq!(winner, &Scored(4, 1.0));
    }

    #[test]
    fn single_entrant_tournament_is_a_uniform_draw() {
        let population = population();
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [false; 5];
        for _ in 0..200 {
            seen[run_tournament(&population, 1, &mut rng).0] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn pool_has_elites_first_and_population_size() {
        let population = population();
        let mut rng = StdRng::seed_from_u64(9);
        let pool = selection(&population, 2, 2, &mut rng);

        assert_eq!(pool.len(), population.len());
        assert_eq!(&pool[..2], &[Scored(4, 1.0), Scored(1, 2.0)]);
    }
}
