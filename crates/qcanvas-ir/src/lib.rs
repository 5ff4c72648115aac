//! Quantum Canvas circuit intermediate representation
//!
//! The data structures every other canvas crate speaks: register-indexed
//! qubits and classical bits, a compact gate set, symbolic rotation angles,
//! and an immutable [`Circuit`] produced by [`CircuitBuilder`].
//!
//! # Example: Binding a template
//!
//! ```rust
//! use qcanvas_ir::{Circuit, ParameterExpression, QubitId};
//!
//! let mut builder = Circuit::builder("template", 1, 1);
//! builder.ry(ParameterExpression::symbol("θ[0]"), QubitId(0)).unwrap();
//! builder.rz(ParameterExpression::symbol("θ[1]"), QubitId(0)).unwrap();
//! builder.measure_all();
//! let template = builder.build();
//! assert_eq!(template.num_parameters(), 2);
//!
//! let bound = template.bind_parameters(&[0.5, 1.5]).unwrap();
//! assert!(bound.is_bound());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `SX` | 1 | Pauli-X and its square root |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX`, `CZ` | 2 | Controlled-NOT and Controlled-Z |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::{Circuit, CircuitBuilder};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use parameter::ParameterExpression;
pub use qubit::{ClbitId, QubitId};
