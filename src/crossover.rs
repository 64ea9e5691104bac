use crate::chromosome::{Route, RoutePlan};
use crate::instance::ProblemInstance;
use rand::seq::IteratorRandom;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insertion {
    pub route: usize,
    pub position: usize,
    pub cost: f64,
}

// Smallest added distance over every gap of every route; an empty route
// costs the round trip from its depot. Ties keep the first one found.
pub fn cheapest_insertion(
    routes: &[Route],
    customer: usize,
    instance: &ProblemInstance,
) -> Option<Insertion> {
    let mut best: Option<Insertion> = None;

    for (index, route) in routes.iter().enumerate() {
        for position in 0..=route.stops.len() {
            let prev = if position == 0 {
                route.depot
            } else {
                route.stops[position - 1]
            };
            let next = route.stops.get(position).copied().unwrap_or(route.depot);

            let cost = instance.distance(prev, customer) + instance.distance(customer, next)
                - instance.distance(prev, next);

            if best.map_or(true, |best| cost < best.cost) {
                best = Some(Insertion {
                    route: index,
                    position,
                    cost,
                });
            }
        }
    }

    best
}

// Best-Cost Route Crossover: the customers of a random non-empty route of
// `parent_b` are pulled out of a copy of `parent_a` and reinserted in donor
// order at their cheapest point. Emptied routes keep their slot.
pub fn bcrc_crossover<R: Rng + ?Sized>(
    parent_a: &RoutePlan,
    parent_b: &RoutePlan,
    instance: &ProblemInstance,
    rng: &mut R,
) -> RoutePlan {
    let donor = parent_b
        .routes()
        .iter()
        .filter(|route| route.customer_count(instance) > 0)
        .choose(rng);

    let Some(donor) = donor else {
        return RoutePlan::new(parent_a.routes().to_vec());
    };

    let removed: Vec<usize> = donor
        .stops
        .iter()
        .copied()
        .filter(|&stop| instance.is_customer(stop))
        .collect();

    let mut routes = parent_a.routes().to_vec();
    for route in routes.iter_mut() {
        route.stops.retain(|stop| !removed.contains(stop));
    }

    // no insertion point only when the plan has no vehicle slots at all
    for &customer in removed.iter() {
        if let Some(insertion) = cheapest_insertion(&routes, customer, instance) {
            routes[insertion.route]
                .stops
                .insert(insertion.position, customer);
        }
    }

    let child = RoutePlan::new(routes);
    debug_assert!(
        !parent_a.covers_all_customers(instance) || child.covers_all_customers(instance),
        "crossover lost or duplicated a customer"
    );

    child
}
