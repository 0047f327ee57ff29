//! Pipeline Configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Train/validation/test fractions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train: 0.70,
            validation: 0.15,
            test: 0.15,
        }
    }
}

/// Decision tree candidate settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            min_samples_leaf: 10,
        }
    }
}

/// Full pipeline configuration.
///
/// Values come from an optional TOML file plus `WAF_PIPELINE_*` environment
/// overrides; anything unset falls back to these defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Labeled request CSV
    pub dataset_path: PathBuf,
    /// Where artifacts and the generated module land
    pub output_dir: PathBuf,
    /// Seed driving the split and every stochastic training step
    pub seed: u64,
    /// Decision threshold used for evaluation and event reporting
    pub threshold: f64,
    /// Split fractions
    pub split: SplitConfig,
    /// Hidden widths of the MLP candidates
    pub mlp_hidden_dims: Vec<usize>,
    /// Decision tree candidate settings
    pub tree: TreeConfig,
    /// Capacity of the event buffer filled from the test split
    pub event_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("http_requests_labeled.csv"),
            output_dir: PathBuf::from("artifacts"),
            seed: 42,
            threshold: 0.5,
            split: SplitConfig::default(),
            mlp_hidden_dims: vec![8, 16],
            tree: TreeConfig::default(),
            event_capacity: 1000,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from an optional file plus environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder
            .add_source(config::Environment::with_prefix("WAF_PIPELINE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Path of the generated C module.
    pub fn module_path(&self) -> PathBuf {
        self.output_dir.join("waf_inference.h")
    }

    /// Path of the persisted standardization statistics.
    pub fn scaler_path(&self) -> PathBuf {
        self.output_dir.join("scaler.json")
    }

    /// Path of the persisted model parameters.
    pub fn model_path(&self) -> PathBuf {
        self.output_dir.join("model.json")
    }

    /// Path of the architecture descriptor accompanying an export.
    pub fn architecture_path(&self) -> PathBuf {
        self.output_dir.join("architecture.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.mlp_hidden_dims, vec![8, 16]);
        assert_eq!(config.split.train, 0.70);
        assert!(config.module_path().ends_with("waf_inference.h"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = PipelineConfig::load(None).unwrap();
        assert_eq!(config.tree.max_depth, 5);
        assert_eq!(config.event_capacity, 1000);
    }
}
