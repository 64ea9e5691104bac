use crate::error::DataError;
use crate::instance::{EnergyModel, Node, ProblemInstance};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

const AREA: f64 = 100.0;
const CLUSTER_SPREAD: f64 = 12.0;

#[derive(Clone, Copy, Debug)]
pub struct DemoLayout {
    pub depots: usize,
    pub customers: usize,
    pub stations: usize,
    pub vehicles: usize,
    pub seed: u64,
}

pub fn depots(count: usize, rng: &mut StdRng) -> Vec<(f64, f64)> {
    (0..count)
        .map(|_| (rng.gen_range(0.0..AREA), rng.gen_range(0.0..AREA)))
        .collect()
}

// Customers gather around the depots with a normal spread, which gives
// the inter-depot mutation some border customers to work with
pub fn customers(count: usize, depots: &[(f64, f64)], rng: &mut StdRng) -> Vec<(f64, f64, u32)> {
    (0..count)
        .map(|i| {
            let (cx, cy) = depots[i % depots.len()];
            let dx: f64 = StandardNormal.sample(rng);
            let dy: f64 = StandardNormal.sample(rng);
            let x = (cx + dx * CLUSTER_SPREAD).clamp(0.0, AREA);
            let y = (cy + dy * CLUSTER_SPREAD).clamp(0.0, AREA);
            (x, y, rng.gen_range(5..=20))
        })
        .collect()
}

// Stations on a regular grid so every part of the area has one nearby
pub fn stations(count: usize) -> Vec<(f64, f64)> {
    let side = (count as f64).sqrt().ceil().max(1.0) as usize;
    let step = AREA / side as f64;

    (0..count)
        .map(|i| {
            let (row, col) = (i / side, i % side);
            ((col as f64 + 0.5) * step, (row as f64 + 0.5) * step)
        })
        .collect()
}

pub fn instance(layout: DemoLayout, energy: EnergyModel) -> Result<ProblemInstance, DataError> {
    let mut rng = StdRng::seed_from_u64(layout.seed);
    let depot_coords = depots(layout.depots.max(1), &mut rng);

    let mut nodes: Vec<Node> = Vec::with_capacity(layout.depots + layout.customers + layout.stations);
    let mut next_id = 0u32;
    let mut id = || {
        next_id += 1;
        next_id
    };

    nodes.extend(depot_coords.iter().map(|&(x, y)| Node::depot(id(), x, y)));
    nodes.extend(
        customers(layout.customers, &depot_coords, &mut rng)
            .into_iter()
            .map(|(x, y, demand)| Node::customer(id(), x, y, demand)),
    );
    nodes.extend(
        stations(layout.stations)
            .into_iter()
            .map(|(x, y)| Node::station(id(), x, y)),
    );

    ProblemInstance::from_coordinates(nodes, layout.vehicles, energy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_reproducible_and_complete() {
        let layout = DemoLayout {
            depots: 3,
            customers: 40,
            stations: 6,
            vehicles: 8,
            seed: 99,
        };

        let a = instance(layout, EnergyModel::default()).unwrap();
        let b = instance(layout, EnergyModel::default()).unwrap();

        assert_eq!(a.depots().len(), 3);
        assert_eq!(a.customers().len(), 40);
        assert_eq!(a.stations().len(), 6);
        assert_eq!(a.nodes(), b.nodes());

        let ids: Vec<u32> = a.nodes().iter().map(|node| node.id).collect();
        assert_eq!(ids, (1..=49).collect::<Vec<u32>>());
    }

    #[test]
    fn stations_stay_inside_the_area() {
        for (x, y) in stations(7) {
            assert!((0.0..=AREA).contains(&x));
            assert!((0.0..=AREA).contains(&y));
        }
    }
}
