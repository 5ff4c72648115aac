//! Error types for the IBM Quantum adapter.

use qcanvas_hal::HalError;
use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors that can occur when using IBM Quantum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IbmError {
    /// No credentials in the environment.
    #[error(
        "IBM Quantum credentials not found. Set IBM_API_KEY and IBM_SERVICE_CRN, or IBM_QUANTUM_TOKEN."
    )]
    MissingToken,

    /// Token cannot be sent as a header.
    #[error("Invalid IBM Quantum API token")]
    InvalidToken,

    /// IAM token exchange failed.
    #[error("IAM token exchange failed: {0}")]
    IamTokenExchange(String),

    /// API key given without a service CRN.
    #[error("IBM_SERVICE_CRN environment variable is required when using IBM_API_KEY")]
    MissingServiceCrn,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error.
    #[error("IBM Quantum API error: {message}")]
    Api {
        /// Error code from API.
        code: Option<String>,
        /// Error message.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Job failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Job was cancelled.
    #[error("Job was cancelled: {0}")]
    JobCancelled(String),

    /// The named device does not exist or is offline.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Least-busy selection found nothing to run on.
    #[error("No operational device with at least {min_qubits} qubits")]
    NoOperationalBackend {
        /// Qubits the circuits need.
        min_qubits: u32,
    },

    /// Circuit could not be serialized for submission.
    #[error("Circuit conversion error: {0}")]
    Circuit(String),

    /// Result payload does not have the expected shape.
    #[error("Malformed job results: {0}")]
    MalformedResults(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<IbmError> for HalError {
    fn from(e: IbmError) -> Self {
        match e {
            IbmError::MissingToken
            | IbmError::InvalidToken
            | IbmError::IamTokenExchange(_)
            | IbmError::MissingServiceCrn => HalError::AuthenticationFailed(e.to_string()),
            IbmError::Http(err) => HalError::Network(err.to_string()),
            IbmError::JobFailed(msg) => HalError::JobFailed(msg),
            IbmError::JobCancelled(_) => HalError::JobCancelled,
            IbmError::BackendUnavailable(msg) => HalError::BackendUnavailable(msg),
            IbmError::NoOperationalBackend { .. } => HalError::BackendUnavailable(e.to_string()),
            IbmError::Circuit(msg) => HalError::InvalidCircuit(msg),
            IbmError::MalformedResults(msg) => HalError::ResultMismatch(msg),
            IbmError::Json(err) => HalError::Serialization(err),
            _ => HalError::Backend(e.to_string()),
        }
    }
}
