//! Model Error Types

use thiserror::Error;

/// Errors during model training or parameter handling
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// Training called with no samples
    #[error("cannot train on an empty batch")]
    EmptyTrainingSet,

    /// Feature rows and label count disagree
    #[error("feature rows ({rows}) and labels ({labels}) do not match")]
    LabelMismatch { rows: usize, labels: usize },

    /// Training batch contains only one class
    #[error("training batch contains a single class; both labels are required")]
    SingleClass,

    /// Serialized parameters carry an unknown schema version
    #[error("unsupported parameter schema version {found}, expected {expected}")]
    UnsupportedSchemaVersion { found: u32, expected: u32 },

    /// Serialized parameters name an unknown architecture
    #[error("unsupported architecture id {id:?}")]
    UnsupportedArchitecture { id: String },

    /// Flat parameter array does not match the declared dimensions
    #[error("parameter array length {actual} does not match dimensions (expected {expected})")]
    ParameterLengthMismatch { expected: usize, actual: usize },

    /// Dimensions list cannot describe a dense network
    #[error("invalid dimensions {dimensions:?}: at least input and output sizes are required")]
    InvalidDimensions { dimensions: Vec<usize> },

    /// A parameter value is NaN or infinite
    #[error("parameter {index} is not finite")]
    NonFiniteParameter { index: usize },
}
