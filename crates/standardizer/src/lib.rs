//! Feature Standardization
//!
//! Fits per-feature mean/scale statistics on a training batch and applies
//! the `(x - mean) / scale` transform. Statistics are frozen after fitting
//! and later embedded as constants in the exported inference module.

mod error;
mod scaler;

pub use error::StandardizeError;
pub use scaler::{fit, fit_with_policy, StandardizationParams, ZeroVariancePolicy};
