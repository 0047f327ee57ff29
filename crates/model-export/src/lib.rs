//! Model Export
//!
//! Serializes a fitted standardizer and a trained dense classifier into a
//! self-contained C inference module for the memory-constrained target.
//! Codegen is deterministic: identical parameters always produce
//! byte-identical output.

mod artifacts;
mod codegen;
mod error;
pub mod reference;

pub use artifacts::{load_artifacts, write_json_artifact, ExportInputs};
pub use codegen::generate_module;
pub use error::ExportError;
