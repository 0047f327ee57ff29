//! Logistic Regression

use crate::model::{sigmoid, Architecture, Classifier};
use crate::{ModelError, ModelParameters};
use ndarray::{Array1, ArrayView1, ArrayView2};
use tracing::debug;

/// Training settings for logistic regression
#[derive(Debug, Clone)]
pub struct LogisticRegressionConfig {
    /// Full-batch gradient descent step size
    pub learning_rate: f64,
    /// Number of passes over the training batch
    pub epochs: usize,
    /// L2 regularization strength
    pub l2: f64,
    /// Reweight samples inversely to class frequency
    pub balanced: bool,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 300,
            l2: 1e-4,
            balanced: true,
        }
    }
}

/// Linear model with a sigmoid output
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    weights: Array1<f64>,
    bias: f64,
}

impl LogisticRegression {
    /// Fit with deterministic full-batch gradient descent on weighted
    /// cross-entropy. Zero-initialized, so no seed is involved.
    pub fn fit(
        features: ArrayView2<'_, f64>,
        labels: &[u8],
        config: &LogisticRegressionConfig,
    ) -> Result<Self, ModelError> {
        let n = features.nrows();
        if n == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if labels.len() != n {
            return Err(ModelError::LabelMismatch {
                rows: n,
                labels: labels.len(),
            });
        }

        let n_pos = labels.iter().filter(|&&l| l == 1).count();
        let n_neg = n - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(ModelError::SingleClass);
        }

        // Balanced weighting: n / (2 * n_c) per class
        let (w_neg, w_pos) = if config.balanced {
            (n as f64 / (2.0 * n_neg as f64), n as f64 / (2.0 * n_pos as f64))
        } else {
            (1.0, 1.0)
        };

        let d = features.ncols();
        let mut weights = Array1::<f64>::zeros(d);
        let mut bias = 0.0f64;

        for _ in 0..config.epochs {
            let logits = features.dot(&weights) + bias;
            let residual = Array1::from_iter(logits.iter().zip(labels).map(|(&z, &y)| {
                let sample_weight = if y == 1 { w_pos } else { w_neg };
                sample_weight * (sigmoid(z) - y as f64)
            }));

            let grad_w = features.t().dot(&residual) / n as f64 + config.l2 * &weights;
            let grad_b = residual.sum() / n as f64;

            weights = weights - config.learning_rate * &grad_w;
            bias -= config.learning_rate * grad_b;
        }

        debug!(features = d, epochs = config.epochs, "logistic regression fitted");
        Ok(Self { weights, bias })
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "LogisticRegression"
    }

    fn forward(&self, features: ArrayView1<'_, f64>) -> f64 {
        sigmoid(self.weights.dot(&features) + self.bias)
    }

    fn parameter_count(&self) -> usize {
        self.weights.len() + 1
    }

    fn architecture(&self) -> Architecture {
        Architecture {
            input_dim: self.weights.len(),
            hidden_dims: Vec::new(),
            output_dim: 1,
            parameter_count: self.parameter_count(),
        }
    }

    fn export_parameters(&self) -> Option<ModelParameters> {
        // A single dense layer [d, 1]: weights then bias
        let mut parameters = self.weights.to_vec();
        parameters.push(self.bias);
        Some(ModelParameters::dense(
            vec![self.weights.len(), 1],
            parameters,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// One informative feature: negative for benign, positive for malicious.
    fn separable(n_per_class: usize) -> (Array2<f64>, Vec<u8>) {
        let n = n_per_class * 2;
        let mut labels = Vec::with_capacity(n);
        let features = Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 1 {
                return 1.0; // constant nuisance feature
            }
            if i < n_per_class {
                -1.0 - (i as f64 % 5.0) * 0.1
            } else {
                1.0 + (i as f64 % 5.0) * 0.1
            }
        });
        for i in 0..n {
            labels.push(u8::from(i >= n_per_class));
        }
        (features, labels)
    }

    #[test]
    fn test_fit_separates_classes() {
        let (features, labels) = separable(50);
        let model =
            LogisticRegression::fit(features.view(), &labels, &Default::default()).unwrap();

        for (row, &label) in features.rows().into_iter().zip(&labels) {
            let p = model.forward(row);
            if label == 1 {
                assert!(p > 0.5, "malicious sample scored {}", p);
            } else {
                assert!(p < 0.5, "benign sample scored {}", p);
            }
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (features, labels) = separable(20);
        let a = LogisticRegression::fit(features.view(), &labels, &Default::default()).unwrap();
        let b = LogisticRegression::fit(features.view(), &labels, &Default::default()).unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.bias, b.bias);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let features = Array2::zeros((4, 2));
        let labels = vec![0u8; 4];
        assert!(matches!(
            LogisticRegression::fit(features.view(), &labels, &Default::default()),
            Err(ModelError::SingleClass)
        ));
    }

    #[test]
    fn test_export_layout() {
        let (features, labels) = separable(20);
        let model =
            LogisticRegression::fit(features.view(), &labels, &Default::default()).unwrap();
        let params = model.export_parameters().unwrap();
        params.validate().unwrap();
        assert_eq!(params.dimensions, vec![2, 1]);
        assert_eq!(params.parameters.len(), 3);

        let arch = model.architecture();
        assert_eq!(arch.input_dim, 2);
        assert!(arch.hidden_dims.is_empty());
        assert_eq!(arch.parameter_count, 3);
    }
}
