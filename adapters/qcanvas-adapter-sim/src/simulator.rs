//! Simulator backend implementation.

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use tracing::{debug, instrument};
use uuid::Uuid;

use qcanvas_hal::{
    Backend, CanvasEvent, Capabilities, Counts, DEFAULT_OPTIMIZATION_LEVEL, HalResult,
    SharedSink, check_shots, transpile_for, validate_results,
};
use qcanvas_ir::Circuit;

use crate::statevector::{MeasureMap, Statevector};

/// Default qubit limit; a 20-qubit state vector takes 16 MiB.
const DEFAULT_MAX_QUBITS: u32 = 20;

/// Local simulator backend.
///
/// Each circuit is transpiled for an all-to-all target, simulated once as a
/// statevector, and then sampled `shots` times from the exact distribution.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    /// Fixed sampling seed; `None` draws fresh entropy on every run.
    seed: Option<u64>,
    events: Option<SharedSink>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            seed: None,
            events: None,
        }
    }

    /// Make sampling reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Report progress to `sink`.
    #[must_use]
    pub fn with_events(mut self, sink: SharedSink) -> Self {
        self.events = Some(sink);
        self
    }

    fn emit(&self, event: CanvasEvent) {
        if let Some(sink) = &self.events {
            sink.emit(&event);
        }
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    /// Simulate one compiled circuit.
    #[instrument(skip(self, circuit, rng), fields(circuit = circuit.name()))]
    fn run_simulation(
        &self,
        circuit: &Circuit,
        shots: u32,
        rng: &mut ChaCha8Rng,
    ) -> HalResult<Counts> {
        let start = Instant::now();
        let mut sv = Statevector::new(circuit.num_qubits());
        for inst in circuit.instructions() {
            sv.apply(inst)?;
        }

        let cumulative = sv.cumulative_probabilities();
        let measures = MeasureMap::from_instructions(circuit.instructions(), circuit.num_clbits());
        let mut counts = Counts::new();
        for _ in 0..shots {
            let outcome = Statevector::outcome_for(&cumulative, rng.r#gen::<f64>());
            counts.insert(measures.bitstring(outcome), 1);
        }

        debug!(
            qubits = circuit.num_qubits(),
            states = counts.len(),
            elapsed = ?start.elapsed(),
            "simulation completed"
        );
        Ok(counts)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, circuits), fields(circuits = circuits.len()))]
    async fn execute(&self, circuits: &[Circuit], shots: u32) -> HalResult<Vec<Counts>> {
        check_shots(&self.capabilities, shots)?;

        let compiled = transpile_for(&self.capabilities, circuits, DEFAULT_OPTIMIZATION_LEVEL)?;
        self.emit(CanvasEvent::Transpiled {
            circuits: compiled.len(),
            max_depth: compiled.iter().map(Circuit::depth).max().unwrap_or(0),
        });

        let run_id = Uuid::new_v4();
        debug!(%run_id, shots, "starting local run");
        self.emit(CanvasEvent::Executing {
            backend: self.name().to_string(),
            circuits: compiled.len(),
            shots,
        });

        let mut rng = self.rng();
        let results = compiled
            .iter()
            .map(|circuit| self.run_simulation(circuit, shots, &mut rng))
            .collect::<HalResult<Vec<_>>>()?;

        validate_results(circuits, &results, shots)?;
        Ok(results)
    }
}
