//! Error types for QASM emission.

use thiserror::Error;

/// Errors that can occur while serializing a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// A gate angle still references a free parameter.
    #[error("Cannot emit unbound parameter '{0}'")]
    UnboundParameter(String),
}

/// Result type for emission.
pub type EmitResult<T> = Result<T, EmitError>;
