//! Quantum gate types.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::parameter::ParameterExpression;

/// Gates the canvas pipeline builds, transpiles into, and simulates.
///
/// The ansatz only ever emits `Ry`, `Rz` and `CX`; the remaining variants are
/// the targets of basis translation for superconducting devices
/// (`rz`, `sx`, `x`, `cx`/`cz`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Hadamard gate.
    H,
    /// sqrt(X) gate.
    SX,
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
}

impl StandardGate {
    /// Get the name of this gate, as spelled in OpenQASM.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::H => "h",
            StandardGate::SX => "sx",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
        }
    }

    /// Number of qubits this gate acts on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ => 2,
            _ => 1,
        }
    }

    /// The rotation angle, for parameterized gates.
    pub fn parameter(&self) -> Option<&ParameterExpression> {
        match self {
            StandardGate::Rx(p) | StandardGate::Ry(p) | StandardGate::Rz(p) => Some(p),
            _ => None,
        }
    }

    /// Whether the angle still contains a free symbol.
    pub fn is_symbolic(&self) -> bool {
        self.parameter().is_some_and(ParameterExpression::is_symbolic)
    }

    /// Bind free symbols in the angle, if any.
    pub fn bind(&self, values: &FxHashMap<String, f64>) -> Self {
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(p.bind(values)),
            StandardGate::Ry(p) => StandardGate::Ry(p.bind(values)),
            StandardGate::Rz(p) => StandardGate::Rz(p.bind(values)),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_arity() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::Ry(0.5.into()).num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CZ.name(), "cz");
    }

    #[test]
    fn test_bind_rotation() {
        let gate = StandardGate::Rz(ParameterExpression::symbol("t"));
        assert!(gate.is_symbolic());

        let mut values = FxHashMap::default();
        values.insert("t".to_string(), 0.25);
        let bound = gate.bind(&values);
        assert!(!bound.is_symbolic());
        assert_eq!(bound.parameter().and_then(ParameterExpression::as_f64), Some(0.25));
    }
}
