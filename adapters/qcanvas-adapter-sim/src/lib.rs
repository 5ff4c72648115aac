//! Quantum Canvas Local Statevector Simulator
//!
//! An in-process [`Backend`](qcanvas_hal::Backend) for development and for
//! generating art without cloud credentials. Circuits are compiled for an
//! all-to-all target, simulated exactly, then sampled.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 5 | < 1 KB | Instant |
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```ignore
//! use qcanvas_adapter_sim::SimulatorBackend;
//! use qcanvas_hal::Backend;
//! use qcanvas_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new().with_seed(7);
//!     let counts = backend.execute(&[Circuit::bell()?], 1000).await?;
//!
//!     // Expect ~50% |00⟩ and ~50% |11⟩
//!     println!("Results: {:?}", counts[0]);
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
