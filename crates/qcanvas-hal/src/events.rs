//! Progress events and the sinks that receive them.
//!
//! Pipelines and backends report what they are doing through an injected
//! [`EventSink`] instead of printing. Events carry no correctness contract;
//! they exist so an operator can trace which device and job produced a result.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, info};

use crate::job::{JobInfo, JobStatus};

/// Something worth reporting while generating art.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[non_exhaustive]
pub enum CanvasEvent {
    /// A backend handle was initialized.
    BackendSelected {
        /// Backend name.
        backend: String,
        /// Qubits on the device.
        num_qubits: u32,
        /// Queue length at selection time, for remote devices.
        pending_jobs: Option<u64>,
    },
    /// A circuit was built for one name.
    CircuitPrepared {
        /// The input name.
        name: String,
        /// Seed derived from it.
        seed: u32,
        /// Number of rotation angles bound.
        num_parameters: usize,
    },
    /// Circuits were compiled for the backend.
    Transpiled {
        /// Number of circuits.
        circuits: usize,
        /// Depth of the deepest compiled circuit.
        max_depth: usize,
    },
    /// Execution started.
    Executing {
        /// Backend name.
        backend: String,
        /// Number of circuits.
        circuits: usize,
        /// Shots per circuit.
        shots: u32,
    },
    /// A remote job was accepted by the service.
    JobSubmitted(JobInfo),
    /// A remote job changed state while being waited on.
    JobStatusChanged {
        /// Job identifier.
        job_id: String,
        /// New state.
        status: String,
    },
    /// A result record was produced.
    ResultReady {
        /// The input name.
        name: String,
        /// Distinct states observed.
        num_states: usize,
    },
    /// A batch finished.
    BatchComplete {
        /// Number of results.
        count: usize,
    },
}

impl CanvasEvent {
    /// Convenience constructor for status updates.
    pub fn job_status(job_id: impl Into<String>, status: &JobStatus) -> Self {
        CanvasEvent::JobStatusChanged {
            job_id: job_id.into(),
            status: status.to_string(),
        }
    }
}

/// Receiver of progress events.
pub trait EventSink: Send + Sync {
    /// Handle one event.
    fn emit(&self, event: &CanvasEvent);
}

/// Shared handle to an event sink.
pub type SharedSink = Arc<dyn EventSink>;

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &CanvasEvent) {
        match event {
            CanvasEvent::BackendSelected {
                backend,
                num_qubits,
                pending_jobs,
            } => info!(backend, num_qubits, ?pending_jobs, "backend selected"),
            CanvasEvent::CircuitPrepared {
                name,
                seed,
                num_parameters,
            } => debug!(name, seed, num_parameters, "circuit prepared"),
            CanvasEvent::Transpiled { circuits, max_depth } => {
                debug!(circuits, max_depth, "circuits transpiled");
            }
            CanvasEvent::Executing {
                backend,
                circuits,
                shots,
            } => info!(backend, circuits, shots, "executing"),
            CanvasEvent::JobSubmitted(job) => info!(
                job_id = %job.id,
                backend = %job.backend,
                circuits = job.num_circuits,
                "job submitted, waiting for results"
            ),
            CanvasEvent::JobStatusChanged { job_id, status } => {
                info!(job_id, status, "job status changed");
            }
            CanvasEvent::ResultReady { name, num_states } => {
                info!(name, num_states, "result ready");
            }
            CanvasEvent::BatchComplete { count } => info!(count, "batch complete"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &CanvasEvent) {}
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<CanvasEvent>>,
}

impl CollectingSink {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<CanvasEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: &CanvasEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &CanvasEvent) {
        (**self).emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobId;

    #[test]
    fn test_collecting_sink_keeps_order() {
        let sink = CollectingSink::new();
        sink.emit(&CanvasEvent::BatchComplete { count: 1 });
        sink.emit(&CanvasEvent::BatchComplete { count: 2 });
        assert_eq!(
            sink.events(),
            vec![
                CanvasEvent::BatchComplete { count: 1 },
                CanvasEvent::BatchComplete { count: 2 },
            ]
        );
    }

    #[test]
    fn test_shared_sink_forwards() {
        let inner = Arc::new(CollectingSink::new());
        let shared: SharedSink = inner.clone();
        shared.emit(&CanvasEvent::JobSubmitted(JobInfo::submitted(
            JobId::from("job-1"),
            "ibm_test",
            3,
        )));
        assert_eq!(inner.events().len(), 1);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(CanvasEvent::ResultReady {
            name: "Alice".into(),
            num_states: 7,
        })
        .unwrap();
        assert_eq!(json["event"], "result_ready");
        assert_eq!(json["num_states"], 7);
    }

    #[test]
    fn test_tracing_and_null_sinks_accept_everything() {
        let event = CanvasEvent::job_status("job-1", &JobStatus::Running);
        TracingSink.emit(&event);
        NullSink.emit(&event);
    }
}
