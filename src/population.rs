use crate::chromosome::{Route, RoutePlan};
use crate::instance::ProblemInstance;
use rand::Rng;

#[derive(Clone, Debug, Default)]
pub struct Population {
    pub members: Vec<RoutePlan>,
    pub generation: usize,
    pub infeasible_replacements: usize,
}

// Slots get depots round-robin from a random offset, then every customer
// lands once in a random slot at a random position. Battery feasibility is
// left to the evaluator.
pub fn generate_initial_chromosome<R: Rng + ?Sized>(
    instance: &ProblemInstance,
    rng: &mut R,
) -> RoutePlan {
    let depots = instance.depots();
    let offset = rng.gen_range(0..depots.len());
    let mut routes: Vec<Route> = (0..instance.vehicle_count())
        .map(|slot| Route::empty(depots[(offset + slot) % depots.len()]))
        .collect();

    for &customer in instance.customers() {
        let slot = rng.gen_range(0..routes.len());
        let stops = &mut routes[slot].stops;
        let position = rng.gen_range(0..=stops.len());
        stops.insert(position, customer);
    }

    RoutePlan::new(routes)
}

pub fn generate_initial_population<R: Rng + ?Sized>(
    instance: &ProblemInstance,
    population_size: usize,
    rng: &mut R,
) -> Population {
    Population {
        members: (0..population_size)
            .map(|_| generate_initial_chromosome(instance, rng))
            .collect(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{EnergyModel, Node};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn instance() -> ProblemInstance {
        let mut nodes = vec![Node::depot(1, 0.0, 0.0), Node::depot(2, 50.0, 50.0)];
        nodes.extend((0..12).map(|i| Node::customer(10 + i, i as f64 * 4.0, 10.0, 1)));
        nodes.push(Node::station(40, 25.0, 25.0));
        ProblemInstance::from_coordinates(nodes, 3, EnergyModel::default()).unwrap()
    }

    #[test]
    fn every_chromosome_covers_all_customers() {
        let instance = instance();
        let mut rng = StdRng::seed_from_u64(7);
        let population = generate_initial_population(&instance, 25, &mut rng);

        assert_eq!(population.members.len(), 25);
        assert_eq!(population.generation, 0);
        assert_eq!(population.infeasible_replacements, 0);
        for plan in population.members.iter() {
            assert_eq!(plan.routes().len(), 3);
            assert!(plan.covers_all_customers(&instance));
            assert!(plan.record().is_none());
        }
    }

    #[test]
    fn slots_use_every_depot_when_vehicles_allow() {
        let instance = instance();
        let mut rng = StdRng::seed_from_u64(11);
        let plan = generate_initial_chromosome(&instance, &mut rng);

        let mut depots: Vec<usize> = plan.routes().iter().map(|route| route.depot).collect();
        depots.sort_unstable();
        depots.dedup();
        assert_eq!(depots, vec![0, 1]);
    }

    #[test]
    fn same_seed_gives_same_chromosome() {
        let instance = instance();
        let a = generate_initial_chromosome(&instance, &mut StdRng::seed_from_u64(3));
        let b = generate_initial_chromosome(&instance, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
