//! Quantum Canvas
//!
//! Turns a name into a quantum fingerprint. The pipeline is fully
//! deterministic up to the sampling of measurement shots:
//!
//! ```text
//! name ─► normalize ─► SHA-256 ─► seed (u32) ─► ChaCha8 ─► angles in [0, 2π)
//!      ─► EfficientSU2 ansatz (RY/RZ, full CX entanglement) ─► backend ─► Counts
//! ```
//!
//! A [`Canvas`] session fixes the [`CanvasConfig`] and the backend. Batches
//! build every circuit first and submit them to the backend in one call, so a
//! remote queue is paid for once per batch.
//!
//! # Example
//!
//! ```ignore
//! use qcanvas::{BackendKind, Canvas, CanvasConfig, save_result};
//!
//! let canvas = Canvas::new(CanvasConfig::default(), BackendKind::Local)?;
//! let result = canvas.generate("Alice").await?;
//! println!("{} distinct states", result.num_states());
//! save_result(&result, "web/quantum_data.json", false)?;
//! ```

pub mod analysis;
pub mod ansatz;
pub mod canvas;
pub mod config;
pub mod error;
pub mod params;
pub mod result;
pub mod seed;

pub use analysis::{bitstring_to_int, calculate_probability, hamming_weight};
pub use ansatz::{Ansatz, build_circuit, circuit_name};
pub use canvas::{BackendKind, Canvas, DEFAULT_HARDWARE_MAP_PATH, PreparedCircuit};
pub use config::{CanvasConfig, MAX_LAYERS, MAX_QUBITS};
pub use error::{CanvasError, CanvasResult};
pub use params::{derive_parameters, sample_parameters};
pub use result::{ArtResult, DEFAULT_RESULT_PATH, FullRecord, aggregate, save_result};
pub use seed::{derive_seed, normalize_name};

pub use qcanvas_hal::{CanvasEvent, CollectingSink, Counts, EventSink, NullSink, SharedSink, TracingSink};
