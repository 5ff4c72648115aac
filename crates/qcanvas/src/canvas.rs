//! The canvas session: one configuration, one backend, many names.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use qcanvas_adapter_ibm::{IbmBackend, IbmConfig};
use qcanvas_adapter_sim::SimulatorBackend;
use qcanvas_hal::{
    Backend, CanvasEvent, HalError, SharedSink, TracingSink, validate_results,
};
use qcanvas_ir::Circuit;

use crate::ansatz::{Ansatz, circuit_name};
use crate::config::{CanvasConfig, MAX_QUBITS};
use crate::error::{CanvasError, CanvasResult};
use crate::params::sample_parameters;
use crate::result::{ArtResult, aggregate, write_json};
use crate::seed::derive_seed;

/// Where `export_hardware_map` writes by default.
pub const DEFAULT_HARDWARE_MAP_PATH: &str = "output/hardware_map.json";

/// Which execution backend a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// In-process statevector simulator.
    #[default]
    Local,
    /// IBM Quantum, least busy operational device.
    Ibm,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Ibm => write!(f, "ibm"),
        }
    }
}

/// A circuit ready to run, with the seed it came from.
#[derive(Debug, Clone)]
pub struct PreparedCircuit {
    /// Input name, as given.
    pub name: String,
    /// Seed derived from the name.
    pub seed: u32,
    /// Bound ansatz.
    pub circuit: Circuit,
}

/// A generation session.
///
/// The backend is created on first use and shared by every later call,
/// including calls from concurrent tasks.
pub struct Canvas {
    config: CanvasConfig,
    kind: Option<BackendKind>,
    ansatz: Ansatz,
    backend: OnceCell<Arc<dyn Backend>>,
    events: SharedSink,
    simulator_seed: Option<u64>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("config", &self.config)
            .field("kind", &self.kind)
            .field("backend", &self.backend.get().map(|b| b.name().to_string()))
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Create a session that will initialize a `kind` backend on first use.
    pub fn new(config: CanvasConfig, kind: BackendKind) -> CanvasResult<Self> {
        Ok(Self {
            config,
            kind: Some(kind),
            ansatz: Ansatz::new(&config)?,
            backend: OnceCell::new(),
            events: Arc::new(TracingSink),
            simulator_seed: None,
        })
    }

    /// Create a session around an existing backend.
    pub fn with_backend(config: CanvasConfig, backend: Arc<dyn Backend>) -> CanvasResult<Self> {
        Ok(Self {
            config,
            kind: None,
            ansatz: Ansatz::new(&config)?,
            backend: OnceCell::new_with(Some(backend)),
            events: Arc::new(TracingSink),
            simulator_seed: None,
        })
    }

    /// Send progress events to `sink` instead of `tracing`.
    #[must_use]
    pub fn with_events(mut self, sink: SharedSink) -> Self {
        self.events = sink;
        self
    }

    /// Make local sampling reproducible. Ignored by remote backends.
    #[must_use]
    pub fn with_simulator_seed(mut self, seed: u64) -> Self {
        self.simulator_seed = Some(seed);
        self
    }

    /// Session configuration.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Backend kind, `None` for an injected backend.
    pub fn kind(&self) -> Option<BackendKind> {
        self.kind
    }

    /// Name of the backend, once it has been initialized.
    pub fn backend_name(&self) -> Option<&str> {
        self.backend.get().map(|b| b.name())
    }

    /// The session backend, initializing it on first call.
    pub async fn backend(&self) -> CanvasResult<&Arc<dyn Backend>> {
        self.backend.get_or_try_init(|| self.init_backend()).await
    }

    async fn init_backend(&self) -> CanvasResult<Arc<dyn Backend>> {
        match self.kind.unwrap_or_default() {
            BackendKind::Local => {
                let mut sim =
                    SimulatorBackend::with_max_qubits(MAX_QUBITS).with_events(self.events.clone());
                if let Some(seed) = self.simulator_seed {
                    sim = sim.with_seed(seed);
                }
                self.events.emit(&CanvasEvent::BackendSelected {
                    backend: sim.name().to_string(),
                    num_qubits: sim.capabilities().num_qubits,
                    pending_jobs: None,
                });
                Ok(Arc::new(sim))
            }
            BackendKind::Ibm => {
                let config = IbmConfig::from_env(self.config.num_qubits).map_err(HalError::from)?;
                let backend = IbmBackend::connect(config, Some(self.events.clone()))
                    .await
                    .map_err(HalError::from)?;
                Ok(Arc::new(backend))
            }
        }
    }

    /// Derive the seed and bind the ansatz for one name.
    pub fn prepare(&self, name: &str) -> CanvasResult<PreparedCircuit> {
        let seed = derive_seed(name)?;
        let params = sample_parameters(seed, self.ansatz.num_parameters());
        let circuit = self.ansatz.bind(&params, circuit_name(seed))?;
        self.events.emit(&CanvasEvent::CircuitPrepared {
            name: name.to_string(),
            seed,
            num_parameters: params.len(),
        });
        Ok(PreparedCircuit {
            name: name.to_string(),
            seed,
            circuit,
        })
    }

    /// Run the pipeline for one name.
    pub async fn generate(&self, name: &str) -> CanvasResult<ArtResult> {
        let mut results = self.run(vec![self.prepare(name)?]).await?;
        results.pop().ok_or_else(|| {
            CanvasError::ExecutionResultMismatch("backend returned no result".into())
        })
    }

    /// Run the pipeline for every name with a single backend submission.
    ///
    /// Results are returned in input order. Any name that fails to prepare
    /// fails the whole batch before anything is executed.
    pub async fn generate_batch<S: AsRef<str>>(&self, names: &[S]) -> CanvasResult<Vec<ArtResult>> {
        if names.is_empty() {
            return Err(CanvasError::EmptyBatch);
        }
        let prepared = names
            .iter()
            .map(|name| self.prepare(name.as_ref()))
            .collect::<CanvasResult<Vec<_>>>()?;
        debug!(circuits = prepared.len(), "batch prepared");

        let results = self.run(prepared).await?;
        self.events.emit(&CanvasEvent::BatchComplete {
            count: results.len(),
        });
        Ok(results)
    }

    async fn run(&self, prepared: Vec<PreparedCircuit>) -> CanvasResult<Vec<ArtResult>> {
        let backend = self.backend().await?;
        let circuits: Vec<Circuit> = prepared.iter().map(|p| p.circuit.clone()).collect();
        let shots = self.config.shots;

        let counts = backend.execute(&circuits, shots).await?;
        // backends validate too; checked again here so an injected backend cannot skip it
        validate_results(&circuits, &counts, shots)?;

        let backend_name = backend.name().to_string();
        Ok(prepared
            .into_iter()
            .zip(counts)
            .map(|(p, counts)| {
                let result = aggregate(p.name, p.seed, counts, self.config, backend_name.clone());
                self.events.emit(&CanvasEvent::ResultReady {
                    name: result.name().to_string(),
                    num_states: result.num_states(),
                });
                result
            })
            .collect())
    }

    /// Write the device topology as JSON.
    ///
    /// Returns `Ok(None)` without touching the filesystem when the backend
    /// has no topology, as with the local simulator.
    pub async fn export_hardware_map(&self, path: impl AsRef<Path>) -> CanvasResult<Option<PathBuf>> {
        let backend = self.backend().await?;
        let Some(topology) = backend.topology() else {
            debug!(backend = backend.name(), "no hardware topology to export");
            return Ok(None);
        };
        let json = serde_json::to_string_pretty(&topology)?;
        let written = write_json(path.as_ref(), &json)?;
        info!(path = %written.display(), backend = %topology.backend, "hardware map exported");
        Ok(Some(written))
    }
}
