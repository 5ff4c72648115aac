//! What a backend can run, and the device topology it exposes.

use serde::{Deserialize, Serialize};

use qcanvas_compile::{BasisGates, CouplingMap, PropertySet};

/// Static description of a backend, fixed at construction time.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Backend name.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Native gate set.
    pub basis_gates: BasisGates,
    /// Qubit connectivity; `None` means all-to-all.
    pub coupling_map: Option<CouplingMap>,
    /// Whether this backend is a simulator.
    pub is_simulator: bool,
    /// Largest accepted shot count per circuit.
    pub max_shots: u32,
}

impl Capabilities {
    /// Capabilities of an all-to-all simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            basis_gates: BasisGates::universal(),
            coupling_map: None,
            is_simulator: true,
            max_shots: 1_000_000,
        }
    }

    /// Transpilation target for this backend.
    pub fn target(&self) -> PropertySet {
        PropertySet::new().with_target(self.coupling_map.clone(), self.basis_gates.clone())
    }
}

/// Device topology, exported as proof of which processor ran a job.
///
/// Serializes as
/// `{"backend": .., "num_qubits": .., "basis_gates": [..], "coupling_map": [[a, b], ..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Device name.
    pub backend: String,
    /// Physical qubit count.
    pub num_qubits: u32,
    /// Native gate names (excluding `measure` and `barrier`).
    pub basis_gates: Vec<String>,
    /// Coupled qubit pairs, each listed once as `[low, high]`.
    pub coupling_map: Vec<[u32; 2]>,
}

impl Topology {
    /// Derive the topology from a backend's capabilities.
    ///
    /// Returns `None` when the backend has no coupling map.
    pub fn from_capabilities(caps: &Capabilities) -> Option<Self> {
        let map = caps.coupling_map.as_ref()?;
        Some(Self {
            backend: caps.name.clone(),
            num_qubits: caps.num_qubits,
            basis_gates: caps
                .basis_gates
                .gates()
                .iter()
                .filter(|g| !matches!(g.as_str(), "measure" | "barrier"))
                .cloned()
                .collect(),
            coupling_map: map.edges().iter().map(|&(a, b)| [a, b]).collect(),
        })
    }

    /// Number of couplers on each qubit, indexed by qubit.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.num_qubits as usize];
        for [a, b] in &self.coupling_map {
            for q in [a, b] {
                if let Some(d) = degrees.get_mut(*q as usize) {
                    *d += 1;
                }
            }
        }
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_has_no_topology() {
        let caps = Capabilities::simulator(5);
        assert!(Topology::from_capabilities(&caps).is_none());
        assert!(caps.target().coupling_map.is_none());
    }

    #[test]
    fn test_topology_from_device() {
        let caps = Capabilities {
            name: "ibm_test".into(),
            num_qubits: 3,
            basis_gates: BasisGates::heron(),
            coupling_map: Some(CouplingMap::linear(3)),
            is_simulator: false,
            max_shots: 100_000,
        };
        let topo = Topology::from_capabilities(&caps).unwrap();
        assert_eq!(topo.coupling_map, vec![[0, 1], [1, 2]]);
        assert!(!topo.basis_gates.contains(&"measure".to_string()));
        assert_eq!(topo.degrees(), vec![1, 2, 1]);

        let json = serde_json::to_value(&topo).unwrap();
        assert_eq!(json["coupling_map"][1], serde_json::json!([1, 2]));
    }
}
