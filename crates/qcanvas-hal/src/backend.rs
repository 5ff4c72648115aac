//! The execution backend trait.
//!
//! Every backend offers one operation: run a batch of circuits for a number
//! of shots and return one [`Counts`] per circuit, in input order.
//!
//! | Method | Kind | Returns |
//! |--------|------|---------|
//! | `name()` | sync | `&str` |
//! | `capabilities()` | sync | `&Capabilities` |
//! | `execute()` | async | `HalResult<Vec<Counts>>` |
//! | `topology()` | sync, provided | `Option<Topology>` |
//!
//! Backends own transpilation: the caller hands over logical circuits and the
//! backend compiles them for its own gate set and connectivity before running.

use async_trait::async_trait;
use tracing::debug;

use qcanvas_compile::transpile;
use qcanvas_ir::Circuit;

use crate::capability::{Capabilities, Topology};
use crate::error::{HalError, HalResult};
use crate::result::Counts;

/// Optimization level backends compile at.
pub const DEFAULT_OPTIMIZATION_LEVEL: u8 = 3;

/// An execution backend.
///
/// # Contract
///
/// - `execute()` returns exactly one `Counts` per input circuit, in input
///   order, each summing to `shots`; otherwise it fails and returns nothing.
/// - `capabilities()` is cached at construction and never performs I/O.
/// - There are no internal retries. Failures surface to the caller.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Run `circuits`, each for `shots` shots.
    async fn execute(&self, circuits: &[Circuit], shots: u32) -> HalResult<Vec<Counts>>;

    /// Physical device topology, when the backend is a real device.
    fn topology(&self) -> Option<Topology> {
        Topology::from_capabilities(self.capabilities())
    }
}

/// Reject shot counts the backend cannot honor.
pub fn check_shots(caps: &Capabilities, shots: u32) -> HalResult<()> {
    if shots == 0 {
        return Err(HalError::InvalidShots("shots must be at least 1".into()));
    }
    if shots > caps.max_shots {
        return Err(HalError::InvalidShots(format!(
            "{shots} shots exceeds the maximum of {} on {}",
            caps.max_shots, caps.name
        )));
    }
    Ok(())
}

/// Compile logical circuits for a backend's target.
///
/// Each circuit must be fully bound and fit on the device.
pub fn transpile_for(
    caps: &Capabilities,
    circuits: &[Circuit],
    optimization_level: u8,
) -> HalResult<Vec<Circuit>> {
    let target = caps.target();
    circuits
        .iter()
        .map(|circuit| {
            if !circuit.is_bound() {
                return Err(HalError::InvalidCircuit(format!(
                    "circuit '{}' has unbound parameters",
                    circuit.name()
                )));
            }
            if circuit.num_qubits() > caps.num_qubits as usize {
                return Err(HalError::InvalidCircuit(format!(
                    "circuit '{}' needs {} qubits, {} has {}",
                    circuit.name(),
                    circuit.num_qubits(),
                    caps.name,
                    caps.num_qubits
                )));
            }
            let compiled = transpile(circuit.clone(), optimization_level, &target)?;
            debug!(
                circuit = circuit.name(),
                depth = compiled.depth(),
                ops = compiled.instructions().len(),
                "transpiled"
            );
            Ok(compiled)
        })
        .collect()
}
