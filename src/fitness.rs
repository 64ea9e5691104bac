use crate::chromosome::{FitnessRecord, Route, RoutePlan};
use crate::config::GeneticConfig;
use crate::instance::{NodeKind, ProblemInstance};
use rayon::prelude::*;

const ENERGY_EPSILON: f64 = 1e-9;

// `stops` is the tour actually driven between the depot visits, detour
// stations included, so its length is `distance`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteSimulation {
    pub distance: f64,
    pub charging_time: f64,
    pub feasible: bool,
    pub stops: Vec<usize>,
}

// Drives one vehicle along its route and tracks the battery. When the charge
// left cannot cover the next leg the vehicle detours to the reachable station
// with the cheapest `current -> station -> next` path and tops up just enough
// for the segment up to the next station or depot. A leg that no chain of
// reachable stations covers makes the route infeasible; the remaining legs
// still count towards the distance.
pub fn simulate_route(route: &Route, instance: &ProblemInstance) -> RouteSimulation {
    let energy = instance.energy();
    let path = route.path();
    let mut result = RouteSimulation {
        feasible: true,
        ..Default::default()
    };

    if route.is_empty() {
        return result;
    }

    let mut battery = energy.battery_capacity;
    let mut current = path[0];
    let mut detoured: Vec<usize> = Vec::new();

    let last = path.len() - 1;

    for i in 1..path.len() {
        let next = path[i];

        if !result.feasible {
            result.distance += instance.distance(current, next);
            if i < last {
                result.stops.push(next);
            }
            current = next;
            continue;
        }

        if instance.is_station(current) {
            let required = segment_energy(current, &path, i, instance);
            result.charging_time += charge(&mut battery, required, instance);
        }

        detoured.clear();
        while battery + ENERGY_EPSILON < instance.distance(current, next) * energy.consumption_rate
        {
            let station = instance
                .stations()
                .iter()
                .copied()
                .filter(|&station| station != current && !detoured.contains(&station))
                .filter(|&station| {
                    instance.distance(current, station) * energy.consumption_rate
                        <= battery + ENERGY_EPSILON
                })
                .min_by(|&a, &b| {
                    let via_a = instance.distance(current, a) + instance.distance(a, next);
                    let via_b = instance.distance(current, b) + instance.distance(b, next);
                    via_a.total_cmp(&via_b)
                });

            match station {
                Some(station) => {
                    let leg = instance.distance(current, station);
                    result.distance += leg;
                    battery = (battery - leg * energy.consumption_rate).max(0.0);
                    detoured.push(station);
                    result.stops.push(station);
                    current = station;

                    let required = segment_energy(current, &path, i, instance);
                    result.charging_time += charge(&mut battery, required, instance);
                }
                None => {
                    result.feasible = false;
                    break;
                }
            }
        }

        let leg = instance.distance(current, next);
        result.distance += leg;
        battery = (battery - leg * energy.consumption_rate).max(0.0);
        if i < last {
            result.stops.push(next);
        }
        current = next;
    }

    result
}

// The plan as it is driven, with every detour station written into its
// route. The copy carries no fitness record.
pub fn driven_plan(plan: &RoutePlan, instance: &ProblemInstance) -> RoutePlan {
    let routes = plan
        .routes()
        .iter()
        .map(|route| Route::new(route.depot, simulate_route(route, instance).stops))
        .collect();

    RoutePlan::new(routes)
}

// Energy needed from `from` to `path[next]` and onwards until the next
// station or depot, capped at the battery capacity
fn segment_energy(from: usize, path: &[usize], next: usize, instance: &ProblemInstance) -> f64 {
    let energy = instance.energy();
    let mut distance = instance.distance(from, path[next]);

    for j in next..path.len() - 1 {
        if instance.kind(path[j]) != NodeKind::Customer {
            break;
        }
        distance += instance.distance(path[j], path[j + 1]);
    }

    (distance * energy.consumption_rate).min(energy.battery_capacity)
}

// Tops the battery up to `required` and returns the time it took
fn charge(battery: &mut f64, required: f64, instance: &ProblemInstance) -> f64 {
    if required <= *battery {
        return 0.0;
    }

    let added = required - *battery;
    *battery = required;
    added / instance.energy().charging_rate
}

pub fn evaluate(plan: &RoutePlan, instance: &ProblemInstance, config: &GeneticConfig) -> FitnessRecord {
    let mut total_distance = 0.0;
    let mut total_charging_time = 0.0;
    let mut single_customer_routes = 0;
    let mut feasible = true;

    for route in plan.routes() {
        let simulation = simulate_route(route, instance);
        total_distance += simulation.distance;
        total_charging_time += simulation.charging_time;
        feasible &= simulation.feasible;

        if route.customer_count(instance) == 1 {
            single_customer_routes += 1;
        }
    }

    // A lone customer cannot be served any other way
    let penalty = if instance.customers().len() > 1 {
        config.single_customer_penalty * single_customer_routes as f64
    } else {
        0.0
    };

    let mut fitness =
        config.w1 * (total_distance / 100.0) + config.w2 * (total_charging_time / 100.0) + penalty;

    if !feasible {
        fitness = config.infeasibility_threshold + fitness.max(0.0);
    }

    FitnessRecord {
        fitness,
        total_distance,
        total_charging_time,
        single_customer_routes,
        feasible,
    }
}

// Scores every plan without a cached record, in parallel. Output keeps the
// input order.
pub fn evaluate_population(
    mut population: Vec<RoutePlan>,
    instance: &ProblemInstance,
    config: &GeneticConfig,
) -> Vec<RoutePlan> {
    population
        .par_iter_mut()
        .filter(|plan| plan.record().is_none())
        .for_each(|plan| {
            let record = evaluate(plan, instance, config);
            plan.set_record(record);
        });

    population
}
