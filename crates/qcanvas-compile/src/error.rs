//! Error types for compilation.

use qcanvas_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors that can occur during transpilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Rebuilding a circuit produced invalid IR.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// Basis translation was requested without a target basis.
    #[error("No basis gates set on the property set")]
    MissingBasisGates,

    /// Routing was requested without a coupling map or layout.
    #[error("Routing requires a coupling map and a layout")]
    MissingLayout,

    /// The target basis cannot express a gate.
    #[error("Gate '{gate}' cannot be expressed in basis [{basis}]")]
    UnsupportedGate {
        /// Gate name.
        gate: String,
        /// Comma separated basis gate names.
        basis: String,
    },

    /// The circuit needs more qubits than the device has.
    #[error("Circuit requires {required} qubits but target has {available}")]
    CircuitTooLarge {
        /// Logical qubits in the circuit.
        required: usize,
        /// Physical qubits on the target.
        available: u32,
    },

    /// Two physical qubits have no connecting path.
    #[error("No path between physical qubits {from} and {to}")]
    Unroutable {
        /// Source physical qubit.
        from: u32,
        /// Destination physical qubit.
        to: u32,
    },

    /// A pass left a gate acting on a qubit after its final measurement.
    #[error("Gate '{gate}' follows the measurement of {qubit}")]
    GateAfterMeasurement {
        /// Offending gate.
        gate: String,
        /// Wire it acts on.
        qubit: QubitId,
    },

    /// The set of measured classical bits changed during compilation.
    #[error("Measurement map changed: expected {expected} measured bits, found {found}")]
    MeasurementMismatch {
        /// Measured bits in the input circuit.
        expected: usize,
        /// Measured bits after compilation.
        found: usize,
    },
}

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;
