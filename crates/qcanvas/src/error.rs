//! Error types for the canvas pipeline.

use std::path::PathBuf;

use qcanvas_hal::HalError;
use qcanvas_ir::IrError;
use thiserror::Error;

/// Errors surfaced by the canvas pipeline.
///
/// Nothing is recovered internally: a wrong seed, parameter count or result
/// shape is always returned to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CanvasError {
    /// The input name is empty after trimming, or otherwise unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The angle vector does not fit the ansatz.
    #[error("Parameter count mismatch: expected {expected}, got {actual}")]
    ParameterCountMismatch {
        /// Parameters the ansatz declares.
        expected: usize,
        /// Parameters supplied.
        actual: usize,
    },

    /// The backend returned the wrong number or shape of results.
    #[error("Execution result mismatch: {0}")]
    ExecutionResultMismatch(String),

    /// `generate_batch` was called with no names.
    #[error("Cannot generate an empty batch")]
    EmptyBatch,

    /// Failure reported by the execution backend.
    #[error("Backend failure: {0}")]
    RemoteServiceFailure(#[source] HalError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Circuit(IrError),
}

impl CanvasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<IrError> for CanvasError {
    fn from(e: IrError) -> Self {
        match e {
            IrError::ParameterCountMismatch { expected, actual } => {
                Self::ParameterCountMismatch { expected, actual }
            }
            other => Self::Circuit(other),
        }
    }
}

impl From<HalError> for CanvasError {
    fn from(e: HalError) -> Self {
        match e {
            HalError::ResultMismatch(msg) => Self::ExecutionResultMismatch(msg),
            other => Self::RemoteServiceFailure(other),
        }
    }
}

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ir_parameter_mismatch_is_lifted() {
        let err: CanvasError = IrError::ParameterCountMismatch {
            expected: 40,
            actual: 3,
        }
        .into();
        assert!(matches!(
            err,
            CanvasError::ParameterCountMismatch {
                expected: 40,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_result_mismatch_is_lifted() {
        let err: CanvasError = HalError::ResultMismatch("2 of 3".into()).into();
        assert!(matches!(err, CanvasError::ExecutionResultMismatch(_)));

        let err: CanvasError = HalError::JobCancelled.into();
        assert!(matches!(err, CanvasError::RemoteServiceFailure(_)));
    }
}
