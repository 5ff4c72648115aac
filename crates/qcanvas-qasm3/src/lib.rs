//! OpenQASM 3 serialization for Quantum Canvas circuits.
//!
//! Remote sampling services accept circuits as QASM text; this crate turns a
//! bound [`qcanvas_ir::Circuit`] into that text.
//!
//! ```rust
//! use qcanvas_ir::Circuit;
//!
//! let qasm = qcanvas_qasm3::emit(&Circuit::bell().unwrap()).unwrap();
//! assert!(qasm.contains("OPENQASM 3.0;"));
//! ```

pub mod emitter;
pub mod error;

pub use emitter::emit;
pub use error::{EmitError, EmitResult};
