//! Quantum Canvas IBM Quantum Backend
//!
//! Runs canvas circuits on IBM Quantum hardware through the Qiskit Runtime
//! Sampler REST API. A whole batch is submitted as a single job, one PUB per
//! circuit, and results are mapped back in submission order.
//!
//! # Authentication
//!
//! | Variables | Flow |
//! |-----------|------|
//! | `IBM_API_KEY` + `IBM_SERVICE_CRN` | IAM key exchange, Cloud API |
//! | `IBM_QUANTUM_TOKEN` | Direct bearer token, legacy endpoint |
//!
//! Set `IBM_QUANTUM_BACKEND` to pin a device; otherwise the least busy
//! operational device is used.
//!
//! # Example
//!
//! ```ignore
//! use qcanvas_adapter_ibm::{IbmBackend, IbmConfig};
//! use qcanvas_hal::Backend;
//! use qcanvas_ir::Circuit;
//!
//! let backend = IbmBackend::connect(IbmConfig::from_env(2)?, None).await?;
//! let counts = backend.execute(&[Circuit::bell()?], 100).await?;
//! ```

mod api;
mod backend;
mod config;
mod error;

pub use api::{BackendInfo, BackendStatus, IbmClient};
pub use backend::{IbmBackend, select_least_busy};
pub use config::{DEFAULT_POLL_INTERVAL, IbmConfig, IbmCredentials};
pub use error::{IbmError, IbmResult};
