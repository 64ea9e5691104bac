use crate::error::DataError;
use serde::{Deserialize, Serialize};

const SYMMETRY_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Depot,
    Customer,
    Station,
}

// A node as delivered by the loader. `id` is the external label, the
// position inside `ProblemInstance::nodes` is the dense index every
// operator works with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub demand: u32,
}

impl Node {
    pub fn depot(id: u32, x: f64, y: f64) -> Self {
        Node {
            kind: NodeKind::Depot,
            id,
            x,
            y,
            demand: 0,
        }
    }

    pub fn customer(id: u32, x: f64, y: f64, demand: u32) -> Self {
        Node {
            kind: NodeKind::Customer,
            id,
            x,
            y,
            demand,
        }
    }

    pub fn station(id: u32, x: f64, y: f64) -> Self {
        Node {
            kind: NodeKind::Station,
            id,
            x,
            y,
            demand: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnergyModel {
    pub battery_capacity: f64,
    pub consumption_rate: f64,
    pub charging_rate: f64,
}

impl Default for EnergyModel {
    fn default() -> Self {
        EnergyModel {
            battery_capacity: 100.0,
            consumption_rate: 1.0,
            charging_rate: 1.0,
        }
    }
}

/// Immutable description of an EVRP instance.
///
/// Node references are resolved once into dense indices; the distance matrix
/// is stored row-major and is never modified after construction.
#[derive(Clone, Debug)]
pub struct ProblemInstance {
    nodes: Vec<Node>,
    depots: Vec<usize>,
    customers: Vec<usize>,
    stations: Vec<usize>,
    vehicle_count: usize,
    energy: EnergyModel,
    distances: Vec<f64>,
}

impl ProblemInstance {
    /// Builds an instance from nodes and a precomputed square distance matrix.
    pub fn new(
        nodes: Vec<Node>,
        vehicle_count: usize,
        energy: EnergyModel,
        matrix: Vec<Vec<f64>>,
    ) -> Result<Self, DataError> {
        let n = nodes.len();

        if matrix.len() != n {
            return Err(DataError::MatrixShape {
                expected: n,
                rows: matrix.len(),
            });
        }

        let mut distances = Vec::with_capacity(n * n);
        for row in matrix.iter() {
            if row.len() != n {
                return Err(DataError::MatrixShape {
                    expected: n,
                    rows: row.len(),
                });
            }
            distances.extend_from_slice(row);
        }

        for from in 0..n {
            for to in 0..n {
                let value = distances[from * n + to];
                if !value.is_finite() || value < 0.0 {
                    return Err(DataError::InvalidDistance { from, to, value });
                }
                if to > from {
                    let back = distances[to * n + from];
                    if (value - back).abs() > SYMMETRY_TOLERANCE * value.max(1.0) {
                        return Err(DataError::AsymmetricMatrix { from, to });
                    }
                }
            }
        }

        let indices_of = |kind: NodeKind| -> Vec<usize> {
            nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| node.kind == kind)
                .map(|(index, _)| index)
                .collect()
        };

        let depots = indices_of(NodeKind::Depot);
        let customers = indices_of(NodeKind::Customer);
        let stations = indices_of(NodeKind::Station);

        if depots.is_empty() {
            return Err(DataError::NoDepots);
        }

        if vehicle_count == 0 {
            return Err(DataError::NoVehicles);
        }

        Ok(ProblemInstance {
            nodes,
            depots,
            customers,
            stations,
            vehicle_count,
            energy,
            distances,
        })
    }

    /// Builds an instance with euclidean distances between node coordinates.
    pub fn from_coordinates(
        nodes: Vec<Node>,
        vehicle_count: usize,
        energy: EnergyModel,
    ) -> Result<Self, DataError> {
        let matrix = nodes
            .iter()
            .map(|a| {
                nodes
                    .iter()
                    .map(|b| (a.x - b.x).hypot(a.y - b.y))
                    .collect()
            })
            .collect();

        Self::new(nodes, vehicle_count, energy, matrix)
    }

    pub fn with_energy_model(mut self, energy: EnergyModel) -> Self {
        self.energy = energy;
        self
    }

    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.nodes.len() + to]
    }

    pub fn node(&self, index: usize) -> Result<&Node, DataError> {
        self.nodes.get(index).ok_or(DataError::UnknownNode(index))
    }

    #[inline]
    pub fn kind(&self, index: usize) -> NodeKind {
        self.nodes[index].kind
    }

    #[inline]
    pub fn is_customer(&self, index: usize) -> bool {
        self.kind(index) == NodeKind::Customer
    }

    #[inline]
    pub fn is_station(&self, index: usize) -> bool {
        self.kind(index) == NodeKind::Station
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn depots(&self) -> &[usize] {
        &self.depots
    }

    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    pub fn stations(&self) -> &[usize] {
        &self.stations
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    pub fn energy(&self) -> &EnergyModel {
        &self.energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<Node> {
        vec![
            Node::depot(1, 0.0, 0.0),
            Node::customer(2, 3.0, 4.0, 5),
            Node::station(3, 0.0, 4.0),
        ]
    }

    #[test]
    fn resolves_kinds_into_dense_indices() {
        let instance = ProblemInstance::from_coordinates(nodes(), 1, EnergyModel::default()).unwrap();

        assert_eq!(instance.depots(), &[0]);
        assert_eq!(instance.customers(), &[1]);
        assert_eq!(instance.stations(), &[2]);
        assert_eq!(instance.distance(0, 1), 5.0);
        assert_eq!(instance.distance(1, 2), 3.0);
        assert!(instance.is_station(2));
        assert_eq!(instance.node(1).unwrap().demand, 5);
        assert_eq!(instance.node(7), Err(DataError::UnknownNode(7)));
    }

    #[test]
    fn rejects_asymmetric_matrix() {
        let matrix = vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 3.0],
            vec![2.0, 4.0, 0.0],
        ];
        let result = ProblemInstance::new(nodes(), 1, EnergyModel::default(), matrix);

        assert_eq!(result.unwrap_err(), DataError::AsymmetricMatrix { from: 1, to: 2 });
    }

    #[test]
    fn rejects_incomplete_matrix() {
        let matrix = vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0]];
        let result = ProblemInstance::new(nodes(), 1, EnergyModel::default(), matrix);

        assert_eq!(
            result.unwrap_err(),
            DataError::MatrixShape {
                expected: 3,
                rows: 2
            }
        );
    }

    #[test]
    fn rejects_missing_depot_and_vehicles() {
        let without_depot = vec![Node::customer(1, 0.0, 0.0, 1)];
        assert_eq!(
            ProblemInstance::from_coordinates(without_depot, 1, EnergyModel::default())
                .unwrap_err(),
            DataError::NoDepots
        );
        assert_eq!(
            ProblemInstance::from_coordinates(nodes(), 0, EnergyModel::default()).unwrap_err(),
            DataError::NoVehicles
        );
    }
}
