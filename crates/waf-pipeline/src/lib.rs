//! Request Classifier Pipeline
//!
//! Orchestrates the offline batch run: load the labeled dataset, split,
//! fit the standardizer, train and select candidate classifiers, then
//! compile the winner into the portable inference module.

pub mod config;
pub mod run;
pub mod stage;

pub use config::PipelineConfig;
pub use run::{export_from_artifacts, run, CandidateReport, PipelineSummary};
pub use stage::{PipelineStage, StageError, StageTracker};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging for the pipeline binary.
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
