//! Portable Model Parameter Schema
//!
//! Versioned, library-independent representation of a trained dense model.
//! The exporter consumes this schema instead of any training-time object
//! graph, so export works no matter how the parameters were produced.

use crate::{Architecture, ModelError};
use serde::{Deserialize, Serialize};

/// Current schema version accepted by the exporter
pub const PARAMS_SCHEMA_VERSION: u32 = 1;

/// Architecture id for a stack of dense layers, ReLU between hidden layers,
/// sigmoid on the single output
pub const DENSE_ARCHITECTURE_ID: &str = "dense-relu-sigmoid";

/// Flat, versioned parameter set for a dense feedforward model.
///
/// `dimensions` lists layer widths from input to output, e.g. `[22, 8, 1]`.
/// `parameters` concatenates, per layer: the weight matrix in row-major
/// `[input][output]` order, then the bias vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub schema_version: u32,
    pub architecture_id: String,
    pub dimensions: Vec<usize>,
    pub parameters: Vec<f64>,
}

impl ModelParameters {
    /// Build a dense parameter set from dimensions and flat values.
    pub fn dense(dimensions: Vec<usize>, parameters: Vec<f64>) -> Self {
        Self {
            schema_version: PARAMS_SCHEMA_VERSION,
            architecture_id: DENSE_ARCHITECTURE_ID.to_string(),
            dimensions,
            parameters,
        }
    }

    /// Number of weight/bias layers described.
    pub fn layer_count(&self) -> usize {
        self.dimensions.len().saturating_sub(1)
    }

    /// Flat parameter count implied by a dimensions list.
    pub fn expected_parameter_count(dimensions: &[usize]) -> usize {
        dimensions
            .windows(2)
            .map(|pair| pair[0] * pair[1] + pair[1])
            .sum()
    }

    /// Check schema version, architecture id, dimension/length consistency
    /// and value finiteness.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.schema_version != PARAMS_SCHEMA_VERSION {
            return Err(ModelError::UnsupportedSchemaVersion {
                found: self.schema_version,
                expected: PARAMS_SCHEMA_VERSION,
            });
        }
        if self.architecture_id != DENSE_ARCHITECTURE_ID {
            return Err(ModelError::UnsupportedArchitecture {
                id: self.architecture_id.clone(),
            });
        }
        if self.dimensions.len() < 2 || self.dimensions.iter().any(|&d| d == 0) {
            return Err(ModelError::InvalidDimensions {
                dimensions: self.dimensions.clone(),
            });
        }
        let expected = Self::expected_parameter_count(&self.dimensions);
        if self.parameters.len() != expected {
            return Err(ModelError::ParameterLengthMismatch {
                expected,
                actual: self.parameters.len(),
            });
        }
        if let Some(index) = self.parameters.iter().position(|p| !p.is_finite()) {
            return Err(ModelError::NonFiniteParameter { index });
        }
        Ok(())
    }

    /// Weight and bias slices of layer `layer` (0-based, forward order).
    ///
    /// Requires `layer < layer_count()` on validated parameters; the weight
    /// slice is row-major `[input][output]`.
    pub fn layer(&self, layer: usize) -> (&[f64], &[f64]) {
        let mut offset = 0;
        for l in 0..layer {
            let (input, output) = (self.dimensions[l], self.dimensions[l + 1]);
            offset += input * output + output;
        }
        let (input, output) = (self.dimensions[layer], self.dimensions[layer + 1]);
        let weights = &self.parameters[offset..offset + input * output];
        let bias = &self.parameters[offset + input * output..offset + input * output + output];
        (weights, bias)
    }

    /// Architecture descriptor derived from the dimensions.
    pub fn architecture(&self) -> Architecture {
        let hidden_dims = if self.dimensions.len() > 2 {
            self.dimensions[1..self.dimensions.len() - 1].to_vec()
        } else {
            Vec::new()
        };
        Architecture {
            input_dim: self.dimensions[0],
            hidden_dims,
            output_dim: *self.dimensions.last().unwrap_or(&0),
            parameter_count: self.parameters.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> ModelParameters {
        // 2 -> 2 -> 1: (2*2 + 2) + (2*1 + 1) = 9 values
        ModelParameters::dense(
            vec![2, 2, 1],
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
        )
    }

    #[test]
    fn test_validate_accepts_consistent_params() {
        small_params().validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        let mut p = small_params();
        p.parameters.pop();
        assert!(matches!(
            p.validate(),
            Err(ModelError::ParameterLengthMismatch {
                expected: 9,
                actual: 8
            })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut p = small_params();
        p.parameters[3] = f64::NAN;
        assert!(matches!(
            p.validate(),
            Err(ModelError::NonFiniteParameter { index: 3 })
        ));
    }

    #[test]
    fn test_validate_rejects_foreign_schema() {
        let mut p = small_params();
        p.schema_version = 99;
        assert!(matches!(
            p.validate(),
            Err(ModelError::UnsupportedSchemaVersion { found: 99, .. })
        ));

        let mut p = small_params();
        p.architecture_id = "random-forest".to_string();
        assert!(matches!(
            p.validate(),
            Err(ModelError::UnsupportedArchitecture { .. })
        ));
    }

    #[test]
    fn test_layer_slicing() {
        let p = small_params();
        let (w0, b0) = p.layer(0);
        assert_eq!(w0, &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(b0, &[0.5, 0.6]);
        let (w1, b1) = p.layer(1);
        assert_eq!(w1, &[0.7, 0.8]);
        assert_eq!(b1, &[0.9]);
    }

    #[test]
    fn test_architecture_descriptor() {
        let arch = small_params().architecture();
        assert_eq!(arch.input_dim, 2);
        assert_eq!(arch.hidden_dims, vec![2]);
        assert_eq!(arch.output_dim, 1);
        assert_eq!(arch.parameter_count, 9);
    }
}
