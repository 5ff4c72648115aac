//! Target properties shared between compilation passes.

use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;

use qcanvas_ir::{ClbitId, QubitId};

/// Mapping from logical circuit qubits to physical device qubits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// `physical[logical]` is the device qubit holding that logical qubit.
    physical: Vec<u32>,
}

impl Layout {
    /// Map logical qubit `i` to physical qubit `i`.
    pub fn trivial(num_qubits: u32) -> Self {
        Self {
            physical: (0..num_qubits).collect(),
        }
    }

    /// Physical qubit currently holding `logical`.
    #[inline]
    pub fn get_physical(&self, logical: QubitId) -> Option<u32> {
        self.physical.get(logical.index()).copied()
    }

    /// Exchange the logical qubits held by two physical qubits.
    pub fn swap_physical(&mut self, p1: u32, p2: u32) {
        for p in &mut self.physical {
            if *p == p1 {
                *p = p2;
            } else if *p == p2 {
                *p = p1;
            }
        }
    }

    /// Number of mapped logical qubits.
    pub fn len(&self) -> usize {
        self.physical.len()
    }

    /// Whether the layout maps no qubits.
    pub fn is_empty(&self) -> bool {
        self.physical.is_empty()
    }
}

/// Device connectivity: which physical qubit pairs support two-qubit gates.
///
/// Edges are undirected. The graph is kept alongside the edge list so
/// shortest-path queries during routing do not rebuild it.
#[derive(Debug, Clone, Serialize)]
pub struct CouplingMap {
    num_qubits: u32,
    edges: Vec<(u32, u32)>,
    #[serde(skip)]
    graph: UnGraph<u32, ()>,
}

impl CouplingMap {
    /// Create a coupling map with no edges.
    pub fn new(num_qubits: u32) -> Self {
        let mut graph = UnGraph::with_capacity(num_qubits as usize, 0);
        for q in 0..num_qubits {
            graph.add_node(q);
        }
        Self {
            num_qubits,
            edges: vec![],
            graph,
        }
    }

    /// Build from an edge list, as reported by device configuration.
    ///
    /// Reversed duplicates (`[a, b]` and `[b, a]`) collapse to one edge and
    /// edges naming qubits beyond `num_qubits` are ignored.
    pub fn from_edges(num_qubits: u32, edges: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut map = Self::new(num_qubits);
        for (a, b) in edges {
            map.add_edge(a, b);
        }
        map
    }

    /// Add an undirected edge.
    pub fn add_edge(&mut self, q1: u32, q2: u32) {
        if q1 == q2 || q1 >= self.num_qubits || q2 >= self.num_qubits || self.is_connected(q1, q2)
        {
            return;
        }
        let edge = (q1.min(q2), q1.max(q2));
        self.edges.push(edge);
        self.graph
            .add_edge(NodeIndex::new(q1 as usize), NodeIndex::new(q2 as usize), ());
    }

    /// Whether two physical qubits are directly coupled.
    #[inline]
    pub fn is_connected(&self, q1: u32, q2: u32) -> bool {
        self.edges.contains(&(q1.min(q2), q1.max(q2)))
    }

    /// Number of physical qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Coupled pairs, each as `(low, high)`.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Physical qubits coupled to `qubit`.
    pub fn neighbors(&self, qubit: u32) -> impl Iterator<Item = u32> + '_ {
        self.edges.iter().filter_map(move |&(a, b)| {
            if a == qubit {
                Some(b)
            } else if b == qubit {
                Some(a)
            } else {
                None
            }
        })
    }

    /// Shortest path between two physical qubits, endpoints included.
    pub fn shortest_path(&self, from: u32, to: u32) -> Option<Vec<u32>> {
        if from >= self.num_qubits || to >= self.num_qubits {
            return None;
        }
        let goal = NodeIndex::new(to as usize);
        astar(
            &self.graph,
            NodeIndex::new(from as usize),
            |n| n == goal,
            |_| 1u32,
            |_| 0u32,
        )
        .map(|(_, path)| path.into_iter().map(|n| self.graph[n]).collect())
    }

    /// Linear chain 0-1-2-...
    pub fn linear(n: u32) -> Self {
        Self::from_edges(n, (1..n).map(|i| (i - 1, i)))
    }

    /// All-to-all connectivity.
    pub fn full(n: u32) -> Self {
        Self::from_edges(n, (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))))
    }
}

/// Native gate set of the target device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasisGates {
    gates: Vec<String>,
}

impl BasisGates {
    /// Create a basis from gate names.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a gate is in the basis.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }

    /// Gate names in the basis.
    pub fn gates(&self) -> &[String] {
        &self.gates
    }

    /// IBM Eagle basis (RZ + SX + X + CX).
    pub fn ibm() -> Self {
        Self::new(["rz", "sx", "x", "cx", "measure", "barrier"])
    }

    /// IBM Heron basis (RZ + SX + X + CZ).
    pub fn heron() -> Self {
        Self::new(["rz", "sx", "x", "cz", "measure", "barrier"])
    }

    /// Every gate the IR defines; translation is a no-op.
    pub fn universal() -> Self {
        Self::new([
            "x", "h", "sx", "rx", "ry", "rz", "cx", "cz", "measure", "barrier",
        ])
    }
}

/// Properties shared between compilation passes.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    /// Logical-to-physical mapping, set by layout passes.
    pub layout: Option<Layout>,
    /// Device connectivity; absent for all-to-all simulators.
    pub coupling_map: Option<CouplingMap>,
    /// Native gate set.
    pub basis_gates: Option<BasisGates>,
    /// Classical bits written by measurements in the input circuit, sorted.
    pub measured_clbits: Option<Vec<ClbitId>>,
}

impl PropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set target connectivity and native gates.
    #[must_use]
    pub fn with_target(mut self, coupling_map: Option<CouplingMap>, basis_gates: BasisGates) -> Self {
        self.coupling_map = coupling_map;
        self.basis_gates = Some(basis_gates);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_coupling() {
        let map = CouplingMap::linear(4);
        assert!(map.is_connected(0, 1));
        assert!(map.is_connected(2, 1));
        assert!(!map.is_connected(0, 2));
        assert_eq!(map.shortest_path(0, 3), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_from_edges_dedups_reversed_pairs() {
        let map = CouplingMap::from_edges(3, [(0, 1), (1, 0), (1, 2), (2, 7)]);
        assert_eq!(map.edges(), &[(0, 1), (1, 2)]);
        let mut n: Vec<u32> = map.neighbors(1).collect();
        n.sort_unstable();
        assert_eq!(n, vec![0, 2]);
    }

    #[test]
    fn test_disconnected_has_no_path() {
        let map = CouplingMap::from_edges(4, [(0, 1), (2, 3)]);
        assert_eq!(map.shortest_path(0, 3), None);
    }

    #[test]
    fn test_full_coupling() {
        let map = CouplingMap::full(5);
        assert_eq!(map.edges().len(), 10);
    }

    #[test]
    fn test_layout_swap() {
        let mut layout = Layout::trivial(3);
        layout.swap_physical(0, 2);
        assert_eq!(layout.get_physical(QubitId(0)), Some(2));
        assert_eq!(layout.get_physical(QubitId(2)), Some(0));
        assert_eq!(layout.get_physical(QubitId(1)), Some(1));
    }

    #[test]
    fn test_basis_sets() {
        assert!(BasisGates::heron().contains("cz"));
        assert!(!BasisGates::heron().contains("cx"));
        assert!(BasisGates::ibm().contains("cx"));
        assert!(BasisGates::universal().contains("ry"));
    }
}
