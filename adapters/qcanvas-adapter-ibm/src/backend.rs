//! IBM Quantum backend implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use qcanvas_compile::{BasisGates, CouplingMap};
use qcanvas_hal::{
    Backend, CanvasEvent, Capabilities, Counts, DEFAULT_OPTIMIZATION_LEVEL, HalResult, JobId,
    JobInfo, JobStatus, SharedSink, check_shots, transpile_for, validate_results,
};
use qcanvas_ir::Circuit;
use qcanvas_qasm3::emit;

use crate::api::{BackendInfo, IbmClient, JobStatusResponse};
use crate::config::IbmConfig;
use crate::error::{IbmError, IbmResult};

/// Shot limit assumed when a device does not report one.
const DEFAULT_MAX_SHOTS: u32 = 100_000;

/// Gates the compiler can target on IBM hardware.
const TRANSLATABLE_GATES: &[&str] = &["x", "sx", "rz", "rx", "cx", "cz"];

/// IBM Quantum backend adapter.
///
/// The device is chosen once, at [`connect`](Self::connect); every
/// `execute` call submits one Sampler job for the whole batch.
pub struct IbmBackend {
    client: Arc<IbmClient>,
    /// Capabilities of the selected device, fetched at connect time.
    capabilities: Capabilities,
    pending_jobs: Option<u32>,
    poll_interval: Duration,
    events: Option<SharedSink>,
}

impl std::fmt::Debug for IbmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IbmBackend")
            .field("client", &self.client)
            .field("device", &self.capabilities.name)
            .field("num_qubits", &self.capabilities.num_qubits)
            .finish_non_exhaustive()
    }
}

impl IbmBackend {
    /// Authenticate and pick a device.
    ///
    /// A pinned `config.device` is used as-is; otherwise the least busy
    /// operational hardware device with at least `config.min_qubits` qubits.
    pub async fn connect(config: IbmConfig, events: Option<SharedSink>) -> IbmResult<Self> {
        let client = IbmClient::from_credentials(&config.credentials).await?;

        let info = match &config.device {
            Some(name) => {
                let info = client.get_backend(name).await?;
                if !info.status.operational {
                    return Err(IbmError::BackendUnavailable(format!(
                        "{name}: {}",
                        info.status.status_msg.as_deref().unwrap_or("offline")
                    )));
                }
                info
            }
            None => {
                let backends = client.list_backends().await?;
                debug!(candidates = backends.len(), "selecting least busy device");
                select_least_busy(&backends, config.min_qubits)
                    .cloned()
                    .ok_or(IbmError::NoOperationalBackend {
                        min_qubits: config.min_qubits,
                    })?
            }
        };

        info!(
            device = %info.name,
            num_qubits = info.num_qubits,
            pending_jobs = ?info.status.pending_jobs,
            "IBM device selected"
        );

        let backend = Self {
            client: Arc::new(client),
            capabilities: capabilities_from_info(&info),
            pending_jobs: info.status.pending_jobs,
            poll_interval: config.poll_interval,
            events,
        };
        backend.emit(CanvasEvent::BackendSelected {
            backend: backend.capabilities.name.clone(),
            num_qubits: backend.capabilities.num_qubits,
            pending_jobs: backend.pending_jobs.map(u64::from),
        });
        Ok(backend)
    }

    /// Queue length of the device when it was selected.
    pub fn pending_jobs(&self) -> Option<u32> {
        self.pending_jobs
    }

    fn emit(&self, event: CanvasEvent) {
        if let Some(sink) = &self.events {
            sink.emit(&event);
        }
    }

    /// Poll until the job reaches a terminal state.
    ///
    /// There is no overall timeout; the service decides when a job fails.
    async fn wait_for_completion(&self, job_id: &JobId) -> IbmResult<()> {
        let mut last: Option<JobStatus> = None;
        loop {
            let response = self.client.get_job_status(&job_id.0).await?;
            let status = map_status(&response);
            if last.as_ref() != Some(&status) {
                self.emit(CanvasEvent::job_status(job_id.0.clone(), &status));
                last = Some(status.clone());
            }
            match status {
                JobStatus::Completed => return Ok(()),
                JobStatus::Failed(msg) => return Err(IbmError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(IbmError::JobCancelled(job_id.0.clone())),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

/// Pick the operational hardware device with the shortest queue.
///
/// Devices smaller than `min_qubits` are skipped; ties go to the
/// alphabetically first name.
pub fn select_least_busy(backends: &[BackendInfo], min_qubits: u32) -> Option<&BackendInfo> {
    backends
        .iter()
        .filter(|b| b.status.operational && !b.simulator && b.num_qubits >= min_qubits)
        .min_by(|a, b| {
            let queue = |info: &BackendInfo| info.status.pending_jobs.unwrap_or(u32::MAX);
            queue(a).cmp(&queue(b)).then_with(|| a.name.cmp(&b.name))
        })
}

/// Map a device description onto compiler target capabilities.
fn capabilities_from_info(info: &BackendInfo) -> Capabilities {
    let gates = info
        .basis_gates
        .iter()
        .filter(|g| TRANSLATABLE_GATES.contains(&g.as_str()))
        .cloned()
        .chain(["measure".to_string(), "barrier".to_string()]);
    let edges = info.coupling_map.iter().map(|&[a, b]| (a, b));

    Capabilities {
        name: info.name.clone(),
        num_qubits: info.num_qubits,
        basis_gates: BasisGates::new(gates),
        coupling_map: Some(CouplingMap::from_edges(info.num_qubits, edges)),
        is_simulator: info.simulator,
        max_shots: info.max_shots.unwrap_or(DEFAULT_MAX_SHOTS),
    }
}

fn map_status(response: &JobStatusResponse) -> JobStatus {
    match response.status.to_uppercase().as_str() {
        "QUEUED" | "INITIALIZING" => JobStatus::Queued,
        "COMPLETED" | "DONE" => JobStatus::Completed,
        "FAILED" | "ERROR" => JobStatus::Failed(
            response
                .error_message()
                .unwrap_or_else(|| "unknown error".to_string()),
        ),
        s if s.starts_with("CANCELLED") => JobStatus::Cancelled,
        _ => JobStatus::Running,
    }
}

#[async_trait]
impl Backend for IbmBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self, circuits), fields(device = %self.capabilities.name, circuits = circuits.len()))]
    async fn execute(&self, circuits: &[Circuit], shots: u32) -> HalResult<Vec<Counts>> {
        check_shots(&self.capabilities, shots)?;

        let compiled = transpile_for(&self.capabilities, circuits, DEFAULT_OPTIMIZATION_LEVEL)?;
        self.emit(CanvasEvent::Transpiled {
            circuits: compiled.len(),
            max_depth: compiled.iter().map(Circuit::depth).max().unwrap_or(0),
        });

        let programs = compiled
            .iter()
            .map(|c| emit(c).map_err(|e| IbmError::Circuit(e.to_string())))
            .collect::<IbmResult<Vec<_>>>()?;

        self.emit(CanvasEvent::Executing {
            backend: self.name().to_string(),
            circuits: programs.len(),
            shots,
        });
        let response = self
            .client
            .submit_sampler_job(self.name(), &programs, shots)
            .await?;
        let job_id = JobId::new(response.id);
        self.emit(CanvasEvent::JobSubmitted(JobInfo::submitted(
            job_id.clone(),
            self.name(),
            programs.len(),
        )));

        self.wait_for_completion(&job_id).await?;

        let results = self.client.get_job_results(&job_id.0).await?;
        if results.results.len() != circuits.len() {
            return Err(IbmError::MalformedResults(format!(
                "submitted {} circuits but job {job_id} returned {} results",
                circuits.len(),
                results.results.len()
            ))
            .into());
        }
        let counts = results
            .results
            .iter()
            .zip(circuits)
            .map(|(result, circuit)| result.to_counts(circuit.num_clbits()))
            .collect::<IbmResult<Vec<_>>>()?;

        validate_results(circuits, &counts, shots)?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BackendStatus;

    fn device(name: &str, operational: bool, pending: Option<u32>, qubits: u32) -> BackendInfo {
        BackendInfo {
            name: name.to_string(),
            num_qubits: qubits,
            status: BackendStatus {
                operational,
                status_msg: None,
                pending_jobs: pending,
            },
            basis_gates: vec!["cz".into(), "rz".into(), "sx".into(), "x".into(), "rzz".into()],
            coupling_map: vec![[0, 1], [1, 0], [1, 2]],
            simulator: false,
            max_shots: None,
        }
    }

    #[test]
    fn test_least_busy_picks_shortest_queue() {
        let backends = vec![
            device("ibm_fez", true, Some(40), 156),
            device("ibm_torino", true, Some(3), 133),
            device("ibm_kyiv", false, Some(0), 127),
        ];
        let chosen = select_least_busy(&backends, 5).unwrap();
        assert_eq!(chosen.name, "ibm_torino");
    }

    #[test]
    fn test_least_busy_skips_simulators_and_small_devices() {
        let mut sim = device("simulator_stabilizer", true, Some(0), 5000);
        sim.simulator = true;
        let backends = vec![sim, device("tiny", true, Some(0), 3), device("ibm_fez", true, Some(9), 156)];
        assert_eq!(select_least_busy(&backends, 5).unwrap().name, "ibm_fez");
    }

    #[test]
    fn test_least_busy_tie_breaks_by_name() {
        let backends = vec![
            device("ibm_marrakesh", true, Some(2), 156),
            device("ibm_fez", true, Some(2), 156),
        ];
        assert_eq!(select_least_busy(&backends, 1).unwrap().name, "ibm_fez");
    }

    #[test]
    fn test_least_busy_none_operational() {
        let backends = vec![device("ibm_fez", false, Some(0), 156)];
        assert!(select_least_busy(&backends, 1).is_none());
    }

    #[test]
    fn test_capabilities_keep_translatable_gates() {
        let caps = capabilities_from_info(&device("ibm_torino", true, Some(0), 133));
        assert!(caps.basis_gates.contains("cz"));
        assert!(caps.basis_gates.contains("measure"));
        assert!(!caps.basis_gates.contains("rzz"));
        let map = caps.coupling_map.unwrap();
        assert!(map.is_connected(1, 0));
        assert_eq!(map.edges().len(), 2);
        assert_eq!(caps.max_shots, DEFAULT_MAX_SHOTS);
    }

    #[test]
    fn test_map_status() {
        let status = |s: &str| JobStatusResponse {
            id: "j".into(),
            status: s.into(),
            error: None,
            state: None,
        };
        assert_eq!(map_status(&status("Queued")), JobStatus::Queued);
        assert_eq!(map_status(&status("Running")), JobStatus::Running);
        assert_eq!(map_status(&status("Completed")), JobStatus::Completed);
        assert_eq!(map_status(&status("Cancelled - Ran too long")), JobStatus::Cancelled);
        assert!(matches!(map_status(&status("Failed")), JobStatus::Failed(_)));
    }
}
