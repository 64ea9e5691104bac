use crate::chromosome::RoutePlan;
use crate::config::GeneticConfig;
use crate::instance::ProblemInstance;
use rand::seq::{index, SliceRandom};
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
pub struct BorderCustomer {
    pub route: usize,
    pub position: usize,
    pub customer: usize,
    pub candidate_depots: Vec<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntraDepotKind {
    Swap,
    Inversion,
    Insertion,
}

const INTRA_DEPOT_KINDS: [IntraDepotKind; 3] = [
    IntraDepotKind::Swap,
    IntraDepotKind::Inversion,
    IntraDepotKind::Insertion,
];

// A customer borders a depot used by another route when
// nearest / d(customer, depot) >= 1 - border_ratio
pub fn border_customers(
    plan: &RoutePlan,
    instance: &ProblemInstance,
    border_ratio: f64,
) -> Vec<BorderCustomer> {
    let mut depots_in_use: Vec<usize> = plan.routes().iter().map(|route| route.depot).collect();
    depots_in_use.sort_unstable();
    depots_in_use.dedup();

    let mut border = Vec::new();
    for (route_index, route) in plan.routes().iter().enumerate() {
        for (position, &customer) in route.stops.iter().enumerate() {
            if !instance.is_customer(customer) {
                continue;
            }

            let nearest = instance
                .depots()
                .iter()
                .map(|&depot| instance.distance(customer, depot))
                .fold(f64::INFINITY, f64::min);

            let candidate_depots: Vec<usize> = depots_in_use
                .iter()
                .copied()
                .filter(|&depot| depot != route.depot)
                .filter(|&depot| {
                    let distance = instance.distance(customer, depot);
                    distance == 0.0 || nearest / distance >= 1.0 - border_ratio
                })
                .collect();

            if !candidate_depots.is_empty() {
                border.push(BorderCustomer {
                    route: route_index,
                    position,
                    customer,
                    candidate_depots,
                });
            }
        }
    }

    border
}

// Border customers are preferred, otherwise any customer is moved to a
// random route of another depot. Single-depot plans come back unchanged.
pub fn inter_depot_mutation<R: Rng + ?Sized>(
    plan: &RoutePlan,
    instance: &ProblemInstance,
    border_ratio: f64,
    rng: &mut R,
) -> RoutePlan {
    let mut child = RoutePlan::new(plan.routes().to_vec());
    let border = border_customers(plan, instance, border_ratio);

    let (source, position, target) = if let Some(chosen) = border.choose(rng) {
        let depot = *chosen
            .candidate_depots
            .choose(rng)
            .unwrap_or(&plan.routes()[chosen.route].depot);
        let targets: Vec<usize> = (0..plan.routes().len())
            .filter(|&index| plan.routes()[index].depot == depot)
            .collect();
        match targets.choose(rng) {
            Some(&target) => (chosen.route, chosen.position, target),
            None => return child,
        }
    } else {
        let sources: Vec<usize> = (0..plan.routes().len())
            .filter(|&index| plan.routes()[index].customer_count(instance) > 0)
            .collect();
        let Some(&source) = sources.choose(rng) else {
            return child;
        };
        let source_depot = plan.routes()[source].depot;
        let targets: Vec<usize> = (0..plan.routes().len())
            .filter(|&index| plan.routes()[index].depot != source_depot)
            .collect();
        let Some(&target) = targets.choose(rng) else {
            return child;
        };
        let positions: Vec<usize> = plan.routes()[source]
            .stops
            .iter()
            .enumerate()
            .filter(|&(_, &stop)| instance.is_customer(stop))
            .map(|(position, _)| position)
            .collect();
        match positions.choose(rng) {
            Some(&position) => (source, position, target),
            None => return child,
        }
    };

    let routes = child.routes_mut();
    let customer = routes[source].stops.remove(position);
    let insert_at = rng.gen_range(0..=routes[target].stops.len());
    routes[target].stops.insert(insert_at, customer);

    child
}

pub fn intra_depot_mutation<R: Rng + ?Sized>(plan: &RoutePlan, rng: &mut R) -> RoutePlan {
    let mut child = RoutePlan::new(plan.routes().to_vec());
    let candidates: Vec<usize> = (0..plan.routes().len())
        .filter(|&index| plan.routes()[index].stops.len() >= 2)
        .collect();

    let Some(&route) = candidates.choose(rng) else {
        return child;
    };

    let kind = *INTRA_DEPOT_KINDS
        .choose(rng)
        .unwrap_or(&IntraDepotKind::Swap);
    let stops = &mut child.routes_mut()[route].stops;
    let picked = index::sample(rng, stops.len(), 2);
    let (from, to) = (picked.index(0), picked.index(1));

    match kind {
        IntraDepotKind::Swap => stops.swap(from, to),
        IntraDepotKind::Inversion => stops[from.min(to)..=from.max(to)].reverse(),
        IntraDepotKind::Insertion => {
            let stop = stops.remove(from);
            stops.insert(to, stop);
        }
    }

    child
}

// At most one operator per call, inter-depot only for multi-depot plans
pub fn mutate<R: Rng + ?Sized>(
    plan: RoutePlan,
    instance: &ProblemInstance,
    config: &GeneticConfig,
    rng: &mut R,
) -> RoutePlan {
    if !rng.gen_bool(config.mutation_probability) {
        return plan;
    }

    let first_depot = plan.routes().first().map(|route| route.depot);
    let spans_depots = plan
        .routes()
        .iter()
        .any(|route| Some(route.depot) != first_depot);

    let child = if spans_depots && rng.gen_bool(config.inter_depot_share) {
        inter_depot_mutation(&plan, instance, config.border_ratio, rng)
    } else {
        intra_depot_mutation(&plan, rng)
    };

    debug_assert!(
        !plan.covers_all_customers(instance) || child.covers_all_customers(instance),
        "mutation lost or duplicated a customer"
    );

    child
}
