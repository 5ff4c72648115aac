//! Quantum Canvas Hardware Abstraction Layer
//!
//! A single [`Backend`] trait covers both ways of running circuits: an
//! in-process simulator and a remote sampling service. Both return the same
//! shape, one [`Counts`] histogram per circuit in submission order, and both
//! are checked by [`validate_results`] before anything reaches the caller.
//!
//! # Supported Backends
//!
//! | Backend | Crate | Authentication |
//! |---------|-------|----------------|
//! | Local statevector simulator | `qcanvas-adapter-sim` | None |
//! | IBM Quantum | `qcanvas-adapter-ibm` | `IBM_API_KEY` + `IBM_SERVICE_CRN`, or `IBM_QUANTUM_TOKEN` |
//!
//! # Progress reporting
//!
//! Backends and pipelines publish [`CanvasEvent`]s to an injected
//! [`EventSink`]. [`TracingSink`] forwards them to `tracing`,
//! [`CollectingSink`] records them for tests.

pub mod backend;
pub mod capability;
pub mod error;
pub mod events;
pub mod job;
pub mod result;

pub use backend::{Backend, DEFAULT_OPTIMIZATION_LEVEL, check_shots, transpile_for};
pub use capability::{Capabilities, Topology};
pub use error::{HalError, HalResult};
pub use events::{CanvasEvent, CollectingSink, EventSink, NullSink, SharedSink, TracingSink};
pub use job::{JobId, JobInfo, JobStatus};
pub use result::{Counts, validate_results};
