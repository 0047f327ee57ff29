//! Export Error Types

use classifier::ModelError;
use thiserror::Error;

/// Errors while loading artifacts or generating the inference module
#[derive(Debug, Error)]
pub enum ExportError {
    /// A required parameter artifact is missing or unreadable
    #[error("cannot read parameter artifact {path}: {source}")]
    MissingArtifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An artifact exists but does not parse as its schema
    #[error("parameter artifact {path} is not valid: {source}")]
    ArtifactFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Writing an artifact failed
    #[error("cannot write artifact {path}: {source}")]
    WriteArtifact {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The parameter set itself is inconsistent
    #[error(transparent)]
    InvalidParameters(#[from] ModelError),

    /// Only single-output classifiers can be compiled
    #[error("unsupported output width {output_dim}; the module emits one probability")]
    UnsupportedOutput { output_dim: usize },

    /// Scaler and model disagree about the feature dimension
    #[error("scaler covers {scaler_dim} features but the model expects {model_dim}")]
    ScalerModelMismatch { scaler_dim: usize, model_dim: usize },

    /// A scale entry would make the emitted normalize divide by zero
    #[error("scale for feature {feature} is zero or not finite; refusing to emit a division-by-zero")]
    InvalidScale { feature: usize },
}
