//! Reference Evaluators
//!
//! Two implementations of the exported module's numeric contract: a
//! double-precision forward pass (the normative reference) and a
//! single-precision pass that mirrors the generated C code's arithmetic and
//! summation order. The module is correct when the two agree within 1e-5
//! on every feature vector.

use classifier::ModelParameters;
use standardizer::StandardizationParams;

/// Double-precision standardization: `(x - mean) / scale` per slot.
pub fn normalize_f64(scaler: &StandardizationParams, features: &[f64]) -> Vec<f64> {
    debug_assert_eq!(features.len(), scaler.dimension());
    features
        .iter()
        .enumerate()
        .map(|(i, &x)| (x - scaler.mean[i]) / scaler.scale[i])
        .collect()
}

/// Single-precision standardization as the generated module performs it.
pub fn normalize_f32(scaler: &StandardizationParams, features: &[f64]) -> Vec<f32> {
    debug_assert_eq!(features.len(), scaler.dimension());
    features
        .iter()
        .enumerate()
        .map(|(i, &x)| (x as f32 - scaler.mean[i] as f32) / scaler.scale[i] as f32)
        .collect()
}

/// Normative double-precision forward pass over normalized features.
pub fn infer_f64(model: &ModelParameters, features: &[f64]) -> f64 {
    debug_assert_eq!(features.len(), model.dimensions[0]);
    let n_layers = model.layer_count();
    let mut activations: Vec<f64> = features.to_vec();

    for layer in 0..n_layers {
        let (weights, bias) = model.layer(layer);
        let (input, output) = (model.dimensions[layer], model.dimensions[layer + 1]);
        let last = layer + 1 == n_layers;

        let mut next = vec![0.0f64; output];
        for (j, out) in next.iter_mut().enumerate() {
            let mut sum = bias[j];
            for i in 0..input {
                sum += activations[i] * weights[i * output + j];
            }
            *out = if last {
                1.0 / (1.0 + (-sum).exp())
            } else {
                sum.max(0.0)
            };
        }
        activations = next;
    }
    activations[0]
}

/// Single-precision forward pass mirroring the emitted C code: float
/// constants, float accumulation, identical summation order.
pub fn infer_f32(model: &ModelParameters, features: &[f64]) -> f32 {
    debug_assert_eq!(features.len(), model.dimensions[0]);
    let n_layers = model.layer_count();
    let mut activations: Vec<f32> = features.iter().map(|&x| x as f32).collect();

    for layer in 0..n_layers {
        let (weights, bias) = model.layer(layer);
        let (input, output) = (model.dimensions[layer], model.dimensions[layer + 1]);
        let last = layer + 1 == n_layers;

        let mut next = vec![0.0f32; output];
        for (j, out) in next.iter_mut().enumerate() {
            let mut sum = bias[j] as f32;
            for i in 0..input {
                sum += activations[i] * weights[i * output + j] as f32;
            }
            *out = if last {
                1.0 / (1.0 + (-sum).exp())
            } else {
                sum.max(0.0)
            };
        }
        activations = next;
    }
    activations[0]
}
