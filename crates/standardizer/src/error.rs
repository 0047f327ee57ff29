//! Standardization Error Types

use thiserror::Error;

/// Errors while fitting or applying standardization statistics
#[derive(Debug, Clone, Error)]
pub enum StandardizeError {
    /// Fit called on an empty batch
    #[error("cannot fit standardization statistics on an empty batch")]
    EmptyBatch,

    /// A feature had zero variance in the training batch. Transforming with
    /// such a scale would divide by zero, so the fit is rejected outright
    /// instead of emitting hazardous parameters.
    #[error("feature {feature} has zero variance in the training batch")]
    ZeroVariance { feature: usize },

    /// Vector length does not match the fitted dimension
    #[error("dimension mismatch: params cover {expected} features, input has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
