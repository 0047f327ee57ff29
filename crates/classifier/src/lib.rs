//! Request Classifier Models
//!
//! The candidate models evaluated by the training pipeline. Every variant
//! implements the `Classifier` capability trait, so the trainer and the
//! exporter never branch on concrete model identity.

mod error;
mod logistic;
mod metrics;
mod mlp;
mod model;
mod params;
mod tree;

pub use error::ModelError;
pub use logistic::{LogisticRegression, LogisticRegressionConfig};
pub use metrics::{evaluate_classifier, ClassificationMetrics};
pub use mlp::{MlpClassifier, MlpConfig};
pub use model::{classify, relu, sigmoid, Architecture, Classifier};
pub use params::{ModelParameters, DENSE_ARCHITECTURE_ID, PARAMS_SCHEMA_VERSION};
pub use tree::{DecisionTreeClassifier, DecisionTreeConfig};
