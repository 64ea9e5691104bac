use crate::genetic_algorithm::Chromosome;
use crate::instance::ProblemInstance;
use serde::Serialize;

/// One vehicle's tour. The depot is implicit at both ends, `stops` holds the
/// interior nodes (customers and optionally charging stations) in visiting
/// order. An empty route is an unused vehicle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    pub depot: usize,
    pub stops: Vec<usize>,
}

impl Route {
    pub fn new(depot: usize, stops: Vec<usize>) -> Self {
        Route { depot, stops }
    }

    pub fn empty(depot: usize) -> Self {
        Route {
            depot,
            stops: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn customer_count(&self, instance: &ProblemInstance) -> usize {
        self.stops
            .iter()
            .filter(|&&stop| instance.is_customer(stop))
            .count()
    }

    // Full node sequence including the depot at both ends
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.stops.len() + 2);
        path.push(self.depot);
        path.extend_from_slice(&self.stops);
        path.push(self.depot);
        path
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FitnessRecord {
    pub fitness: f64,
    pub total_distance: f64,
    pub total_charging_time: f64,
    pub single_customer_routes: usize,
    pub feasible: bool,
}

/// A candidate solution: one route per vehicle slot plus the cached fitness.
///
/// The cache is dropped whenever the routes are borrowed mutably, so a
/// record is only ever observed for the routes it was computed from.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePlan {
    routes: Vec<Route>,
    record: Option<FitnessRecord>,
}

impl RoutePlan {
    pub fn new(routes: Vec<Route>) -> Self {
        RoutePlan {
            routes,
            record: None,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut Vec<Route> {
        self.record = None;
        &mut self.routes
    }

    pub fn record(&self) -> Option<&FitnessRecord> {
        self.record.as_ref()
    }

    pub fn set_record(&mut self, record: FitnessRecord) {
        self.record = Some(record);
    }

    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        self.routes.iter().flat_map(|route| route.stops.iter().copied())
    }

    /// True when every customer of the instance is visited exactly once.
    pub fn covers_all_customers(&self, instance: &ProblemInstance) -> bool {
        let mut visits = vec![0u32; instance.nodes().len()];
        for stop in self.customers().filter(|&stop| instance.is_customer(stop)) {
            visits[stop] += 1;
        }

        instance.customers().iter().all(|&customer| visits[customer] == 1)
            && visits.iter().sum::<u32>() as usize == instance.customers().len()
    }
}

impl Chromosome for RoutePlan {
    fn fitness(&self) -> f64 {
        self.record.map_or(f64::INFINITY, |record| record.fitness)
    }

    fn is_evaluated(&self) -> bool {
        self.record.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{EnergyModel, Node};

    fn instance() -> ProblemInstance {
        let nodes = vec![
            Node::depot(1, 0.0, 0.0),
            Node::customer(2, 1.0, 0.0, 1),
            Node::customer(3, 2.0, 0.0, 1),
            Node::station(4, 1.0, 1.0),
        ];
        ProblemInstance::from_coordinates(nodes, 2, EnergyModel::default()).unwrap()
    }

    #[test]
    fn coverage_counts_customers_only() {
        let instance = instance();
        let plan = RoutePlan::new(vec![Route::new(0, vec![1, 3]), Route::new(0, vec![2])]);
        assert!(plan.covers_all_customers(&instance));

        let duplicated = RoutePlan::new(vec![Route::new(0, vec![1, 2]), Route::new(0, vec![2])]);
        assert!(!duplicated.covers_all_customers(&instance));

        let missing = RoutePlan::new(vec![Route::new(0, vec![1]), Route::empty(0)]);
        assert!(!missing.covers_all_customers(&instance));
    }

    #[test]
    fn mutable_access_invalidates_record() {
        let mut plan = RoutePlan::new(vec![Route::new(0, vec![1, 2])]);
        plan.set_record(FitnessRecord {
            fitness: 1.0,
            total_distance: 4.0,
            total_charging_time: 0.0,
            single_customer_routes: 0,
            feasible: true,
        });
        assert_eq!(plan.fitness(), 1.0);

        plan.routes_mut()[0].stops.swap(0, 1);
        assert!(!plan.is_evaluated());
        assert_eq!(plan.fitness(), f64::INFINITY);
    }

    #[test]
    fn path_wraps_stops_with_depot() {
        let route = Route::new(0, vec![1, 3, 2]);
        assert_eq!(route.path(), vec![0, 1, 3, 2, 0]);
        assert_eq!(route.customer_count(&instance()), 2);
    }
}
