//! Classification Metrics

use crate::model::{classify, Classifier};
use ndarray::ArrayView2;
use serde::Serialize;

/// Binary classification metrics over one evaluation split.
///
/// `confusion[actual][predicted]` with 0 = benign, 1 = malicious.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: [[usize; 2]; 2],
}

impl ClassificationMetrics {
    /// Compute metrics from aligned truth/prediction vectors. Degenerate
    /// denominators (no predicted or no actual positives) yield 0, not NaN.
    pub fn compute(y_true: &[u8], y_pred: &[u8]) -> Self {
        let mut confusion = [[0usize; 2]; 2];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            confusion[usize::from(t == 1)][usize::from(p == 1)] += 1;
        }

        let tp = confusion[1][1] as f64;
        let fp = confusion[0][1] as f64;
        let fn_ = confusion[1][0] as f64;
        let total = y_true.len() as f64;

        let accuracy = if total > 0.0 {
            (confusion[0][0] + confusion[1][1]) as f64 / total
        } else {
            0.0
        };
        let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy,
            precision,
            recall,
            f1,
            confusion,
        }
    }
}

/// Run a classifier over a split and compute its metrics at the given
/// decision threshold.
pub fn evaluate_classifier(
    model: &dyn Classifier,
    features: ArrayView2<'_, f64>,
    labels: &[u8],
    threshold: f64,
) -> ClassificationMetrics {
    let predictions: Vec<u8> = features
        .rows()
        .into_iter()
        .map(|row| u8::from(classify(model.forward(row), threshold)))
        .collect();
    ClassificationMetrics::compute(labels, &predictions)
}
