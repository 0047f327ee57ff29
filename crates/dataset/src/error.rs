//! Dataset Error Types

use thiserror::Error;

/// Errors while loading or splitting the dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset file could not be opened or read at all
    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// No usable rows survived parsing
    #[error("dataset {path} contains no usable rows")]
    Empty { path: String },

    /// Split ratios do not describe a valid partition
    #[error("invalid split ratios: train={train}, validation={validation}, test={test}")]
    InvalidRatios {
        train: f64,
        validation: f64,
        test: f64,
    },

    /// A split ended up with no samples
    #[error("the {split} split is empty; dataset too small for the requested ratios")]
    EmptySplit { split: &'static str },

    /// Feature matrix assembly failed
    #[error("feature matrix shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
