//! Parameter Artifact IO

use crate::ExportError;
use classifier::ModelParameters;
use serde::Serialize;
use standardizer::StandardizationParams;
use std::fs;
use std::path::Path;
use tracing::info;

/// The two inputs every export needs
#[derive(Debug, Clone)]
pub struct ExportInputs {
    pub scaler: StandardizationParams,
    pub model: ModelParameters,
}

/// Load and cross-check the persisted scaler and model artifacts.
///
/// A missing or unreadable artifact is fatal and the error names the exact
/// path; there is nothing sensible to export without it.
pub fn load_artifacts(scaler_path: &Path, model_path: &Path) -> Result<ExportInputs, ExportError> {
    let scaler: StandardizationParams = read_json(scaler_path)?;
    let model: ModelParameters = read_json(model_path)?;

    model.validate()?;
    if scaler.dimension() != model.dimensions[0] {
        return Err(ExportError::ScalerModelMismatch {
            scaler_dim: scaler.dimension(),
            model_dim: model.dimensions[0],
        });
    }

    info!(
        scaler = %scaler_path.display(),
        model = %model_path.display(),
        layers = model.layer_count(),
        "loaded export artifacts"
    );
    Ok(ExportInputs { scaler, model })
}

/// Write a serializable artifact as pretty-printed JSON.
pub fn write_json_artifact<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| ExportError::ArtifactFormat {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, json).map_err(|source| ExportError::WriteArtifact {
        path: path.display().to_string(),
        source,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ExportError> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::MissingArtifact {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ExportError::ArtifactFormat {
        path: path.display().to_string(),
        source,
    })
}
