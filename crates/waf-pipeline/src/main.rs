//! Request Classifier Pipeline - Main Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use waf_pipeline::{export_from_artifacts, init_logging, run, PipelineConfig};

/// Train candidate request classifiers and export the best one as a
/// self-contained C inference module.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file (TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<String>,

    /// Override the labeled dataset path
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Override the artifact output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Skip training and regenerate the module from persisted artifacts
    #[arg(long)]
    export_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Request Classifier Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut config = PipelineConfig::load(args.config.as_deref())?;
    if let Some(dataset) = args.dataset {
        config.dataset_path = dataset;
    }
    if let Some(out_dir) = args.out_dir {
        config.output_dir = out_dir;
    }

    if args.export_only {
        let module_path = export_from_artifacts(&config)?;
        info!("Module written to {}", module_path.display());
        return Ok(());
    }

    let summary = run(&config).await?;

    info!("Candidate comparison (validation F1):");
    for candidate in &summary.candidates {
        info!(
            "  {:<28} | F1: {:.4} | Params: {}",
            candidate.name, candidate.metrics.f1, candidate.parameter_count
        );
    }
    info!(
        "Best: {} (val F1 {:.4}, test F1 {:.4})",
        summary.best_name, summary.validation.f1, summary.test.f1
    );
    info!("Module written to {}", summary.module_path.display());

    Ok(())
}
