//! C Module Code Generation

use crate::ExportError;
use classifier::ModelParameters;
use standardizer::StandardizationParams;
use std::fmt::Write;
use tracing::info;

/// Render one constant with 8 fractional digits, the precision at which
/// re-parsing stays within 1e-6 of the trained value.
fn format_float(value: f64) -> String {
    format!("{:.8}f", value)
}

/// Compile scaler statistics and dense-model parameters into a single
/// self-contained C header.
///
/// The emitted module carries the constant tables, `waf_normalize` (in
/// place, slot order fixed), `waf_infer` (ReLU hidden layers, sigmoid
/// output) and `waf_classify` (inclusive threshold). Any number of hidden
/// layers is supported; the layer loop is driven by the parameter
/// dimensions. Output is a pure function of the inputs: no timestamps, no
/// unordered iteration.
pub fn generate_module(
    scaler: &StandardizationParams,
    model: &ModelParameters,
) -> Result<String, ExportError> {
    model.validate()?;

    let dims = &model.dimensions;
    let output_dim = *dims.last().unwrap_or(&0);
    if output_dim != 1 {
        return Err(ExportError::UnsupportedOutput { output_dim });
    }
    if scaler.dimension() != dims[0] {
        return Err(ExportError::ScalerModelMismatch {
            scaler_dim: scaler.dimension(),
            model_dim: dims[0],
        });
    }
    if let Some(feature) = scaler
        .scale
        .iter()
        .position(|&s| s == 0.0 || !s.is_finite())
    {
        return Err(ExportError::InvalidScale { feature });
    }

    let n_features = dims[0];
    let n_layers = model.layer_count();
    let max_width = dims[1..].iter().copied().max().unwrap_or(1);
    let arch_label = dims
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");

    let mut out = String::new();

    // Header and guards
    writeln!(out, "// Generated request-classifier inference module").ok();
    writeln!(
        out,
        "// Architecture: dense {} (ReLU hidden, sigmoid output)",
        arch_label
    )
    .ok();
    writeln!(out, "// Regenerate via the export pipeline; do not edit.").ok();
    writeln!(out).ok();
    writeln!(out, "#ifndef WAF_INFERENCE_H").ok();
    writeln!(out, "#define WAF_INFERENCE_H").ok();
    writeln!(out).ok();
    writeln!(out, "#include <math.h>").ok();
    writeln!(out).ok();
    writeln!(out, "#define WAF_N_FEATURES {}", n_features).ok();
    writeln!(out, "#define WAF_N_LAYERS {}", n_layers).ok();
    writeln!(out, "#define WAF_MAX_WIDTH {}", max_width).ok();
    writeln!(out).ok();

    // Standardization tables
    writeln!(out, "// Standardization: scaled = (x - mean) / scale").ok();
    emit_vector(&mut out, "WAF_SCALER_MEAN", "WAF_N_FEATURES", &scaler.mean, "f");
    emit_vector(&mut out, "WAF_SCALER_SCALE", "WAF_N_FEATURES", &scaler.scale, "f");

    // Per-layer weight and bias tables
    for layer in 0..n_layers {
        let (weights, bias) = model.layer(layer);
        let (input, output) = (dims[layer], dims[layer + 1]);

        writeln!(out, "// Layer {}: {}x{} weights", layer, input, output).ok();
        writeln!(
            out,
            "static const float WAF_W{}[{}][{}] = {{",
            layer, input, output
        )
        .ok();
        for i in 0..input {
            let row = (0..output)
                .map(|j| format_float(weights[i * output + j]))
                .collect::<Vec<_>>()
                .join(", ");
            let comma = if i + 1 < input { "," } else { "" };
            writeln!(out, "    {{{}}}{}", row, comma).ok();
        }
        writeln!(out, "}};").ok();
        writeln!(out).ok();
        emit_vector(&mut out, &format!("WAF_B{}", layer), &output.to_string(), bias, "h");
    }

    // Activations
    writeln!(out, "static inline float waf_relu(float x) {{").ok();
    writeln!(out, "    return (x > 0.0f) ? x : 0.0f;").ok();
    writeln!(out, "}}").ok();
    writeln!(out).ok();
    writeln!(out, "static inline float waf_sigmoid(float x) {{").ok();
    writeln!(out, "    return 1.0f / (1.0f + expf(-x));").ok();
    writeln!(out, "}}").ok();
    writeln!(out).ok();

    // normalize
    writeln!(out, "// Apply standardization in place, feature order fixed").ok();
    writeln!(
        out,
        "static inline void waf_normalize(float features[WAF_N_FEATURES]) {{"
    )
    .ok();
    writeln!(out, "    for (int i = 0; i < WAF_N_FEATURES; i++) {{").ok();
    writeln!(
        out,
        "        features[i] = (features[i] - WAF_SCALER_MEAN[i]) / WAF_SCALER_SCALE[i];"
    )
    .ok();
    writeln!(out, "    }}").ok();
    writeln!(out, "}}").ok();
    writeln!(out).ok();

    // infer: alternate between two scratch buffers, layer by layer
    writeln!(out, "// Forward pass over normalized features.").ok();
    writeln!(out, "// Returns the malicious probability in [0, 1].").ok();
    writeln!(
        out,
        "static inline float waf_infer(const float features[WAF_N_FEATURES]) {{"
    )
    .ok();
    writeln!(out, "    float buf_a[WAF_MAX_WIDTH];").ok();
    writeln!(out, "    float buf_b[WAF_MAX_WIDTH];").ok();

    let mut source = "features".to_string();
    let mut dest = "buf_a";
    for layer in 0..n_layers {
        let (input, output) = (dims[layer], dims[layer + 1]);
        let activation = if layer + 1 == n_layers {
            "waf_sigmoid"
        } else {
            "waf_relu"
        };

        writeln!(out).ok();
        writeln!(out, "    // layer {}: {} -> {}", layer, input, output).ok();
        writeln!(out, "    for (int j = 0; j < {}; j++) {{", output).ok();
        writeln!(out, "        float sum = WAF_B{}[j];", layer).ok();
        writeln!(out, "        for (int i = 0; i < {}; i++) {{", input).ok();
        writeln!(out, "            sum += {}[i] * WAF_W{}[i][j];", source, layer).ok();
        writeln!(out, "        }}").ok();
        writeln!(out, "        {}[j] = {}(sum);", dest, activation).ok();
        writeln!(out, "    }}").ok();

        source = dest.to_string();
        dest = if dest == "buf_a" { "buf_b" } else { "buf_a" };
    }

    writeln!(out).ok();
    writeln!(out, "    return {}[0];", source).ok();
    writeln!(out, "}}").ok();
    writeln!(out).ok();

    // classify
    writeln!(out, "// 1 = malicious (probability >= threshold), 0 = benign").ok();
    writeln!(
        out,
        "static inline int waf_classify(float probability, float threshold = 0.5f) {{"
    )
    .ok();
    writeln!(out, "    return (probability >= threshold) ? 1 : 0;").ok();
    writeln!(out, "}}").ok();
    writeln!(out).ok();
    writeln!(out, "#endif // WAF_INFERENCE_H").ok();

    info!(
        layers = n_layers,
        parameters = model.parameters.len(),
        bytes = out.len(),
        "generated inference module"
    );
    Ok(out)
}

/// Emit a 1-D constant table, one value per line, slots annotated with the
/// given prefix.
fn emit_vector(out: &mut String, name: &str, len_expr: &str, values: &[f64], slot_prefix: &str) {
    writeln!(out, "static const float {}[{}] = {{", name, len_expr).ok();
    for (i, &v) in values.iter().enumerate() {
        let comma = if i + 1 < values.len() { "," } else { "" };
        writeln!(out, "    {}{}  // {}{}", format_float(v), comma, slot_prefix, i).ok();
    }
    writeln!(out, "}};").ok();
    writeln!(out).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference;

    fn scaler(dim: usize) -> StandardizationParams {
        StandardizationParams {
            mean: (0..dim).map(|i| i as f64 * 0.5).collect(),
            scale: (0..dim).map(|i| 1.0 + i as f64 * 0.25).collect(),
        }
    }

    fn mlp_params() -> ModelParameters {
        // 3 -> 4 -> 1
        let parameters = vec![
            // W0 (3x4)
            0.11, -0.32, 0.45, 0.08, -0.21, 0.37, -0.14, 0.29, 0.05, -0.44, 0.26, -0.09,
            // B0 (4)
            0.02, -0.07, 0.13, 0.01, // W1 (4x1)
            0.61, -0.53, 0.38, 0.12, // B1 (1)
            -0.23,
        ];
        ModelParameters::dense(vec![3, 4, 1], parameters)
    }

    #[test]
    fn test_codegen_is_deterministic() {
        let s = scaler(3);
        let m = mlp_params();
        let first = generate_module(&s, &m).unwrap();
        let second = generate_module(&s, &m).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_module_structure() {
        let module = generate_module(&scaler(3), &mlp_params()).unwrap();

        assert!(module.contains("#define WAF_N_FEATURES 3"));
        assert!(module.contains("#define WAF_N_LAYERS 2"));
        assert!(module.contains("static const float WAF_SCALER_MEAN[WAF_N_FEATURES]"));
        assert!(module.contains("static const float WAF_W0[3][4]"));
        assert!(module.contains("static const float WAF_B1[1]"));
        assert!(module.contains("waf_normalize"));
        assert!(module.contains("waf_infer"));
        assert!(module.contains("float threshold = 0.5f"));
        // 8 fractional digits on constants
        assert!(module.contains("0.11000000f"));
        assert!(module.contains("-0.23000000f"));
    }

    #[test]
    fn test_single_layer_logistic_module() {
        let m = ModelParameters::dense(vec![3, 1], vec![0.5, -0.25, 0.125, 0.0625]);
        let module = generate_module(&scaler(3), &m).unwrap();

        assert!(module.contains("#define WAF_N_LAYERS 1"));
        assert!(module.contains("static const float WAF_W0[3][1]"));
        // the only layer goes straight through the sigmoid
        assert!(module.contains("waf_sigmoid(sum)"));
        assert!(!module.contains("waf_relu(sum)"));
        assert!(module.contains("return buf_a[0];"));
    }

    #[test]
    fn test_two_hidden_layers_generalization() {
        let dims = vec![2, 3, 3, 1];
        let count = ModelParameters::expected_parameter_count(&dims);
        let m = ModelParameters::dense(dims, (0..count).map(|i| i as f64 * 0.01).collect());
        let module = generate_module(&scaler(2), &m).unwrap();

        assert!(module.contains("#define WAF_N_LAYERS 3"));
        assert!(module.contains("WAF_W2"));
        // layers alternate buffers: features -> buf_a -> buf_b -> buf_a
        assert!(module.contains("return buf_a[0];"));
    }

    #[test]
    fn test_multi_output_is_rejected() {
        let dims = vec![3, 4, 2];
        let count = ModelParameters::expected_parameter_count(&dims);
        let m = ModelParameters::dense(dims, vec![0.1; count]);
        assert!(matches!(
            generate_module(&scaler(3), &m),
            Err(ExportError::UnsupportedOutput { output_dim: 2 })
        ));
    }

    #[test]
    fn test_zero_scale_is_rejected() {
        let mut s = scaler(3);
        s.scale[1] = 0.0;
        assert!(matches!(
            generate_module(&s, &mlp_params()),
            Err(ExportError::InvalidScale { feature: 1 })
        ));
    }

    #[test]
    fn test_float_module_matches_double_reference() {
        let s = scaler(3);
        let m = mlp_params();
        // representative raw feature vectors, normalized through the scaler
        let probes = [
            vec![0.0, 0.0, 0.0],
            vec![1.0, 7.5, 3.25],
            vec![-4.0, 2.0, 100.0],
            vec![55.0, -3.5, 0.125],
        ];

        for raw in &probes {
            let normalized = reference::normalize_f64(&s, raw);
            let exact = reference::infer_f64(&m, &normalized);
            let emitted = reference::infer_f32(&m, &normalized) as f64;
            assert!(
                (exact - emitted).abs() < 1e-5,
                "float path diverged: {} vs {}",
                exact,
                emitted
            );
        }
    }
}
