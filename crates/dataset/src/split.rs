//! Deterministic Stratified Splitting

use crate::DatasetError;
use ndarray::{Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Train/validation/test fractions. Must be positive and sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.70,
            validation: 0.15,
            test: 0.15,
        }
    }
}

impl SplitRatios {
    fn validate(&self) -> Result<(), DatasetError> {
        let sum = self.train + self.validation + self.test;
        if self.train <= 0.0 || self.validation <= 0.0 || self.test <= 0.0 || (sum - 1.0).abs() > 1e-9
        {
            return Err(DatasetError::InvalidRatios {
                train: self.train,
                validation: self.validation,
                test: self.test,
            });
        }
        Ok(())
    }
}

/// One split: feature rows with aligned labels.
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub features: Array2<f64>,
    pub labels: Vec<u8>,
    /// Row indices into the loaded dataset, for tracing back to records
    pub indices: Vec<usize>,
}

impl DataSplit {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// The three disjoint splits of a loaded dataset.
#[derive(Debug, Clone)]
pub struct SplitDataset {
    pub train: DataSplit,
    pub validation: DataSplit,
    pub test: DataSplit,
}

/// Partition a dataset into stratified train/validation/test splits.
///
/// Rows are grouped by label, shuffled under `StdRng::seed_from_u64(seed)`,
/// and allocated per class according to the ratios, so class proportions
/// carry over into every split. Identical inputs and seed always yield the
/// same partition. Within a split, rows keep their original dataset order.
pub fn stratified_split(
    features: ArrayView2<'_, f64>,
    labels: &[u8],
    ratios: SplitRatios,
    seed: u64,
) -> Result<SplitDataset, DatasetError> {
    ratios.validate()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_idx = Vec::new();
    let mut val_idx = Vec::new();
    let mut test_idx = Vec::new();

    for class in [0u8, 1u8] {
        let mut class_indices: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        class_indices.shuffle(&mut rng);

        let n = class_indices.len();
        let n_train = (n as f64 * ratios.train).round() as usize;
        let n_val = ((n as f64 * ratios.validation).round() as usize).min(n - n_train.min(n));

        train_idx.extend_from_slice(&class_indices[..n_train.min(n)]);
        val_idx.extend_from_slice(&class_indices[n_train.min(n)..(n_train + n_val).min(n)]);
        test_idx.extend_from_slice(&class_indices[(n_train + n_val).min(n)..]);
    }

    for (name, idx) in [
        ("train", &train_idx),
        ("validation", &val_idx),
        ("test", &test_idx),
    ] {
        if idx.is_empty() {
            return Err(DatasetError::EmptySplit { split: name });
        }
    }

    // Restore original record order inside each split
    train_idx.sort_unstable();
    val_idx.sort_unstable();
    test_idx.sort_unstable();

    info!(
        train = train_idx.len(),
        validation = val_idx.len(),
        test = test_idx.len(),
        seed,
        "stratified split complete"
    );

    Ok(SplitDataset {
        train: take_rows(features, labels, &train_idx),
        validation: take_rows(features, labels, &val_idx),
        test: take_rows(features, labels, &test_idx),
    })
}

fn take_rows(features: ArrayView2<'_, f64>, labels: &[u8], indices: &[usize]) -> DataSplit {
    DataSplit {
        features: features.select(Axis(0), indices),
        labels: indices.iter().map(|&i| labels[i]).collect(),
        indices: indices.to_vec(),
    }
}
