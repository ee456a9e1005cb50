//! Error type for sampling and batched algebra operations

use thiserror::Error;

/// Errors raised by the sampler and the batched matrix algebra
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    #[error("Shape mismatch in {operation}: expected {expected}, got {got}")]
    ShapeMismatch {
        operation: &'static str,
        expected: String,
        got: String,
    },
    #[error("Batch size mismatch: {left} vs {right}")]
    BatchMismatch { left: usize, right: usize },
    #[error("rotation matrices not computed")]
    RotationsNotComputed,
    #[error("Invalid sampler configuration: {0}")]
    InvalidConfig(String),
    #[error("Stride must be at least 1")]
    InvalidStride,
    #[error("Start index {start} out of range for batch of {len}")]
    StartOutOfRange { start: usize, len: usize },
    #[error("Sample points have {n_dims} coordinates, quaternions need 4")]
    NotQuaternion { n_dims: usize },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SamplerError>;

impl SamplerError {
    pub(crate) fn shape(operation: &'static str, expected: impl Into<String>, got: impl Into<String>) -> Self {
        SamplerError::ShapeMismatch {
            operation,
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Whether this error is a violated call-order precondition that the
    /// caller can recover from by running the missing step first
    pub fn is_precondition(&self) -> bool {
        matches!(self, SamplerError::RotationsNotComputed)
    }
}
