//! Quantum Canvas transpilation
//!
//! Rewrites circuits into the form an execution backend accepts: mapped onto
//! its qubits, routed over its couplings, expressed in its native gates, and
//! locally optimized. Measurement semantics never change; a verification pass
//! at the end of every pipeline enforces it.
//!
//! # Pipeline
//!
//! ```text
//! Circuit ─► TrivialLayout ─► BasicRouting ─► BasisTranslation
//!                                                   │
//!         MeasurementVerification ◄─ PeepholeOptimization
//! ```
//!
//! Layout and routing run only when the target has a [`CouplingMap`].
//!
//! # Example
//!
//! ```rust
//! use qcanvas_compile::{BasisGates, CouplingMap, PassManagerBuilder};
//! use qcanvas_ir::Circuit;
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_optimization_level(3)
//!     .with_target(Some(CouplingMap::linear(3)), BasisGates::heron())
//!     .build();
//!
//! let compiled = pm.run(Circuit::bell().unwrap(), &mut props).unwrap();
//! assert!(qcanvas_compile::passes::is_in_basis(&compiled, &BasisGates::heron()));
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod property;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder, transpile};
pub use pass::{Pass, PassKind};
pub use property::{BasisGates, CouplingMap, Layout, PropertySet};
