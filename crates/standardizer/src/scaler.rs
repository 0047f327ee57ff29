//! Standard Scaler Implementation

use crate::StandardizeError;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Per-feature centering and scaling statistics.
///
/// `scale` holds the population standard deviation (ddof = 0) of each
/// feature over the training batch. A successful fit guarantees every entry
/// is finite and strictly positive, so `transform` never divides by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizationParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardizationParams {
    /// Number of features covered by these statistics.
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one vector: `(x - mean) / scale` per slot.
    pub fn transform(&self, vector: ArrayView1<'_, f64>) -> Result<Array1<f64>, StandardizeError> {
        self.check_dimension(vector.len())?;
        Ok(Array1::from_iter(vector.iter().enumerate().map(|(i, &x)| {
            (x - self.mean[i]) / self.scale[i]
        })))
    }

    /// Standardize every row of a matrix.
    pub fn transform_matrix(
        &self,
        matrix: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>, StandardizeError> {
        self.check_dimension(matrix.ncols())?;
        let mut out = matrix.to_owned();
        for mut row in out.rows_mut() {
            for (i, x) in row.iter_mut().enumerate() {
                *x = (*x - self.mean[i]) / self.scale[i];
            }
        }
        Ok(out)
    }

    fn check_dimension(&self, actual: usize) -> Result<(), StandardizeError> {
        if actual != self.dimension() {
            return Err(StandardizeError::DimensionMismatch {
                expected: self.dimension(),
                actual,
            });
        }
        Ok(())
    }
}

/// What `fit` does with a feature whose training variance is zero.
///
/// Dividing by a zero scale is the one numeric hazard of the transform, so
/// the choice is forced to be explicit here instead of silently patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroVariancePolicy {
    /// Reject the batch with [`StandardizeError::ZeroVariance`].
    #[default]
    Reject,
    /// Substitute a unit scale: the feature passes through centered but
    /// unscaled. This reproduces the fallback the original scaler applied
    /// and is required for schemas with reserved always-zero slots.
    Unit,
}

/// Fit per-feature mean and scale over a training batch, rejecting any
/// zero-variance feature. See [`fit_with_policy`] for the lenient variant.
pub fn fit(data: ArrayView2<'_, f64>) -> Result<StandardizationParams, StandardizeError> {
    fit_with_policy(data, ZeroVariancePolicy::Reject)
}

/// Fit per-feature mean and scale with an explicit zero-variance policy.
pub fn fit_with_policy(
    data: ArrayView2<'_, f64>,
    policy: ZeroVariancePolicy,
) -> Result<StandardizationParams, StandardizeError> {
    let n = data.nrows();
    if n == 0 {
        return Err(StandardizeError::EmptyBatch);
    }

    let mean: Vec<f64> = data
        .mean_axis(Axis(0))
        .ok_or(StandardizeError::EmptyBatch)?
        .to_vec();

    let mut scale = Vec::with_capacity(data.ncols());
    for (i, column) in data.axis_iter(Axis(1)).enumerate() {
        let m = mean[i];
        let variance = column.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / n as f64;
        let std_dev = variance.sqrt();
        if std_dev == 0.0 || !std_dev.is_finite() {
            match policy {
                ZeroVariancePolicy::Reject => {
                    return Err(StandardizeError::ZeroVariance { feature: i })
                }
                ZeroVariancePolicy::Unit => {
                    warn!(feature = i, "zero-variance feature, substituting unit scale");
                    scale.push(1.0);
                }
            }
        } else {
            scale.push(std_dev);
        }
    }

    debug!(features = mean.len(), samples = n, "fitted standardization statistics");
    Ok(StandardizationParams { mean, scale })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_mean_and_scale() {
        let data = array![[1.0, 10.0], [3.0, 30.0], [5.0, 50.0]];
        let params = fit(data.view()).unwrap();
        assert_eq!(params.mean, vec![3.0, 30.0]);
        // population std of [1,3,5] is sqrt(8/3)
        assert!((params.scale[0] - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_transform_centers_and_scales() {
        let data = array![[2.0, 4.0], [4.0, 8.0], [6.0, 12.0]];
        let params = fit(data.view()).unwrap();
        let scaled = params.transform_matrix(data.view()).unwrap();

        for col in scaled.axis_iter(Axis(1)) {
            let mean = col.iter().sum::<f64>() / col.len() as f64;
            let var = col.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / col.len() as f64;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_variance_is_rejected() {
        // second column is constant
        let data = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];
        match fit(data.view()) {
            Err(StandardizeError::ZeroVariance { feature }) => assert_eq!(feature, 1),
            other => panic!("expected ZeroVariance, got {:?}", other),
        }
    }

    #[test]
    fn test_unit_policy_substitutes_unit_scale() {
        let data = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];
        let params = fit_with_policy(data.view(), ZeroVariancePolicy::Unit).unwrap();
        assert_eq!(params.scale[1], 1.0);

        // constant feature passes through centered, not exploded
        let scaled = params.transform(data.row(0)).unwrap();
        assert_eq!(scaled[1], 0.0);
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let data = Array2::<f64>::zeros((0, 4));
        assert!(matches!(fit(data.view()), Err(StandardizeError::EmptyBatch)));
    }

    proptest::proptest! {
        /// Under the unit policy, fitting any non-empty batch succeeds and
        /// transforming the batch itself yields only finite values.
        #[test]
        fn prop_unit_policy_transform_is_finite(
            rows in proptest::collection::vec(
                proptest::collection::vec(-1e3f64..1e3, 4), 1..20
            )
        ) {
            let n = rows.len();
            let flat: Vec<f64> = rows.into_iter().flatten().collect();
            let data = Array2::from_shape_vec((n, 4), flat).unwrap();

            let params = fit_with_policy(data.view(), ZeroVariancePolicy::Unit).unwrap();
            let scaled = params.transform_matrix(data.view()).unwrap();
            for &value in scaled.iter() {
                proptest::prop_assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let params = fit(data.view()).unwrap();
        let wrong = Array1::from(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            params.transform(wrong.view()),
            Err(StandardizeError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }
}
