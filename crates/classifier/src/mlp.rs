//! One-Hidden-Layer MLP

use crate::model::{relu, sigmoid, Architecture, Classifier};
use crate::{ModelError, ModelParameters};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Dimension, Zip};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Training settings for the MLP candidates
#[derive(Debug, Clone)]
pub struct MlpConfig {
    /// Hidden layer width
    pub hidden_dim: usize,
    /// Passes over the training batch
    pub epochs: usize,
    /// Mini-batch size (clamped to the batch when larger)
    pub batch_size: usize,
    /// Adam step size
    pub learning_rate: f64,
    /// L2 regularization strength
    pub l2: f64,
    /// Seed for weight init and epoch shuffling
    pub seed: u64,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden_dim: 8,
            epochs: 50,
            batch_size: 64,
            learning_rate: 1e-3,
            l2: 1e-4,
            seed: 42,
        }
    }
}

/// Feedforward network: dense ReLU hidden layer, sigmoid output unit
#[derive(Debug, Clone)]
pub struct MlpClassifier {
    name: String,
    /// input x hidden
    w1: Array2<f64>,
    b1: Array1<f64>,
    /// hidden weights into the single output unit
    w2: Array1<f64>,
    b2: f64,
}

impl MlpClassifier {
    /// Fit with mini-batch Adam on binary cross-entropy. Weight init and
    /// shuffling are driven entirely by `config.seed`, so identical inputs
    /// reproduce identical models.
    pub fn fit(
        features: ArrayView2<'_, f64>,
        labels: &[u8],
        config: &MlpConfig,
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

        let d = features.ncols();
        let h = config.hidden_dim;
        let mut rng = StdRng::seed_from_u64(config.seed);

        // Glorot-uniform init
        let limit1 = (6.0 / (d + h) as f64).sqrt();
        let limit2 = (6.0 / (h + 1) as f64).sqrt();
        let mut w1 = Array2::from_shape_fn((d, h), |_| rng.gen_range(-limit1..limit1));
        let mut b1 = Array1::<f64>::zeros(h);
        let mut w2 = Array1::from_shape_fn(h, |_| rng.gen_range(-limit2..limit2));
        let mut b2 = 0.0f64;

        let mut adam = AdamState::new(d, h);
        let batch_size = config.batch_size.max(1).min(n);
        let mut order: Vec<usize> = (0..n).collect();
        let mut step = 0i32;

        for _ in 0..config.epochs {
            order.shuffle(&mut rng);

            for batch in order.chunks(batch_size) {
                let xb = features.select(Axis(0), batch);
                let yb = Array1::from_iter(batch.iter().map(|&i| labels[i] as f64));
                let m = batch.len() as f64;

                // Forward
                let z1 = xb.dot(&w1) + &b1;
                let a1 = z1.mapv(relu);
                let z2 = a1.dot(&w2) + b2;
                let p = z2.mapv(sigmoid);

                // Backward: sigmoid + cross-entropy collapses to (p - y)
                let delta2 = (&p - &yb) / m;
                let grad_w2 = a1.t().dot(&delta2) + config.l2 * &w2;
                let grad_b2 = delta2.sum();

                let mask = z1.mapv(|z| if z > 0.0 { 1.0 } else { 0.0 });
                let delta1 = delta2
                    .view()
                    .insert_axis(Axis(1))
                    .dot(&w2.view().insert_axis(Axis(0)))
                    * mask;
                let grad_w1 = xb.t().dot(&delta1) + config.l2 * &w1;
                let grad_b1 = delta1.sum_axis(Axis(0));

                step += 1;
                adam_step(&mut w1, &grad_w1, &mut adam.m_w1, &mut adam.v_w1, config.learning_rate, step);
                adam_step(&mut b1, &grad_b1, &mut adam.m_b1, &mut adam.v_b1, config.learning_rate, step);
                adam_step(&mut w2, &grad_w2, &mut adam.m_w2, &mut adam.v_w2, config.learning_rate, step);
                b2 -= config.learning_rate * adam.scalar_step(grad_b2, step);
            }
        }

        debug!(
            hidden = h,
            epochs = config.epochs,
            samples = n,
            "mlp fitted"
        );
        Ok(Self {
            name: format!("MLP({})", h),
            w1,
            b1,
            w2,
            b2,
        })
    }

    /// Hidden layer width.
    pub fn hidden_dim(&self) -> usize {
        self.b1.len()
    }
}

impl Classifier for MlpClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn forward(&self, features: ArrayView1<'_, f64>) -> f64 {
        let hidden = (features.dot(&self.w1) + &self.b1).mapv(relu);
        sigmoid(hidden.dot(&self.w2) + self.b2)
    }

    fn parameter_count(&self) -> usize {
        self.w1.len() + self.b1.len() + self.w2.len() + 1
    }

    fn architecture(&self) -> Architecture {
        Architecture {
            input_dim: self.w1.nrows(),
            hidden_dims: vec![self.hidden_dim()],
            output_dim: 1,
            parameter_count: self.parameter_count(),
        }
    }

    fn export_parameters(&self) -> Option<ModelParameters> {
        let (d, h) = (self.w1.nrows(), self.hidden_dim());
        let mut parameters = Vec::with_capacity(self.parameter_count());
        // layer 0: W[input][hidden] row-major, then bias
        parameters.extend(self.w1.iter().copied());
        parameters.extend(self.b1.iter().copied());
        // layer 1: W[hidden][1] row-major, then bias
        parameters.extend(self.w2.iter().copied());
        parameters.push(self.b2);
        Some(ModelParameters::dense(vec![d, h, 1], parameters))
    }
}

/// Adam moment estimates for every parameter group
struct AdamState {
    m_w1: Array2<f64>,
    v_w1: Array2<f64>,
    m_b1: Array1<f64>,
    v_b1: Array1<f64>,
    m_w2: Array1<f64>,
    v_w2: Array1<f64>,
    m_b2: f64,
    v_b2: f64,
}

const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;

impl AdamState {
    fn new(d: usize, h: usize) -> Self {
        Self {
            m_w1: Array2::zeros((d, h)),
            v_w1: Array2::zeros((d, h)),
            m_b1: Array1::zeros(h),
            v_b1: Array1::zeros(h),
            m_w2: Array1::zeros(h),
            v_w2: Array1::zeros(h),
            m_b2: 0.0,
            v_b2: 0.0,
        }
    }

    /// Bias-corrected Adam direction for the scalar output bias.
    fn scalar_step(&mut self, grad: f64, step: i32) -> f64 {
        self.m_b2 = ADAM_BETA1 * self.m_b2 + (1.0 - ADAM_BETA1) * grad;
        self.v_b2 = ADAM_BETA2 * self.v_b2 + (1.0 - ADAM_BETA2) * grad * grad;
        let m_hat = self.m_b2 / (1.0 - ADAM_BETA1.powi(step));
        let v_hat = self.v_b2 / (1.0 - ADAM_BETA2.powi(step));
        m_hat / (v_hat.sqrt() + ADAM_EPS)
    }
}

/// One Adam update over an arbitrary-dimension parameter array.
fn adam_step<D: Dimension>(
    param: &mut ndarray::Array<f64, D>,
    grad: &ndarray::Array<f64, D>,
    m: &mut ndarray::Array<f64, D>,
    v: &mut ndarray::Array<f64, D>,
    learning_rate: f64,
    step: i32,
) {
    let bc1 = 1.0 - ADAM_BETA1.powi(step);
    let bc2 = 1.0 - ADAM_BETA2.powi(step);
    Zip::from(param).and(grad).and(m).and(v).for_each(|p, &g, m, v| {
        *m = ADAM_BETA1 * *m + (1.0 - ADAM_BETA1) * g;
        *v = ADAM_BETA2 * *v + (1.0 - ADAM_BETA2) * g * g;
        *p -= learning_rate * (*m / bc1) / ((*v / bc2).sqrt() + ADAM_EPS);
    });
}
