//! Classifier Capability Interface

use crate::ModelParameters;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Layer shape of a trained model, derived from the model itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    /// Width of the feature vector the model consumes
    pub input_dim: usize,
    /// Hidden layer widths, in forward order; empty for linear models
    pub hidden_dims: Vec<usize>,
    /// Output width (1 for the binary classifiers here)
    pub output_dim: usize,
    /// Total learned parameters
    pub parameter_count: usize,
}

/// Capability interface shared by every candidate model.
///
/// The trainer selects over and the exporter consumes this trait only; no
/// code outside a model's own module inspects its concrete type.
pub trait Classifier: Send {
    /// Human-readable candidate name used in reports
    fn name(&self) -> &str;

    /// Probability that the feature vector is malicious, in [0, 1]
    fn forward(&self, features: ArrayView1<'_, f64>) -> f64;

    /// Number of learned parameters
    fn parameter_count(&self) -> usize;

    /// Layer shape, discovered from the trained parameters
    fn architecture(&self) -> Architecture;

    /// Learned parameters in the portable schema, or `None` when the model
    /// cannot be expressed as dense layers (the decision tree)
    fn export_parameters(&self) -> Option<ModelParameters>;
}

/// Logistic sigmoid `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Rectified linear unit `max(0, x)`.
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

/// Threshold a probability into the final verdict. Malicious iff
/// `probability >= threshold`; the boundary itself is malicious.
pub fn classify(probability: f64, threshold: f64) -> bool {
    probability >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_range() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(40.0) > 0.999);
        assert!(sigmoid(-40.0) < 0.001);
    }

    #[test]
    fn test_relu() {
        assert_eq!(relu(-1.5), 0.0);
        assert_eq!(relu(2.5), 2.5);
        assert_eq!(relu(0.0), 0.0);
    }

    #[test]
    fn test_classify_boundary_is_inclusive() {
        assert!(classify(0.6, 0.5));
        assert!(!classify(0.4, 0.5));
        assert!(classify(0.5, 0.5));
    }
}
