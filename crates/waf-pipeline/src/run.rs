//! Pipeline Orchestration

use crate::config::PipelineConfig;
use crate::stage::{PipelineStage, StageTracker};
use anyhow::{anyhow, bail, Context};
use classifier::{
    classify, evaluate_classifier, Architecture, ClassificationMetrics, Classifier,
    DecisionTreeClassifier, DecisionTreeConfig, LogisticRegression, LogisticRegressionConfig,
    MlpClassifier, MlpConfig, ModelError,
};
use dataset::{load_csv, stratified_split, SplitRatios};
use event_log::{EventBuffer, WafAction, WafEvent};
use model_export::{generate_module, load_artifacts, reference, write_json_artifact};
use ndarray::Array2;
use standardizer::ZeroVariancePolicy;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Validation outcome of one trained candidate
#[derive(Debug, Clone)]
pub struct CandidateReport {
    pub name: String,
    pub metrics: ClassificationMetrics,
    pub parameter_count: usize,
}

/// Everything one pipeline invocation produced
#[derive(Debug)]
pub struct PipelineSummary {
    pub best_name: String,
    pub validation: ClassificationMetrics,
    /// Diagnostic only; never used for selection
    pub test: ClassificationMetrics,
    pub architecture: Architecture,
    pub candidates: Vec<CandidateReport>,
    pub rows_skipped: usize,
    pub events_recorded: u64,
    pub module_path: PathBuf,
}

/// Training recipe for one candidate; consumed by its blocking task
enum CandidateRecipe {
    Logistic(LogisticRegressionConfig),
    Mlp(MlpConfig),
    Tree(DecisionTreeConfig),
}

impl CandidateRecipe {
    fn fit(
        self,
        features: Array2<f64>,
        labels: Vec<u8>,
    ) -> Result<Box<dyn Classifier + Send>, ModelError> {
        match self {
            CandidateRecipe::Logistic(config) => Ok(Box::new(LogisticRegression::fit(
                features.view(),
                &labels,
                &config,
            )?)),
            CandidateRecipe::Mlp(config) => {
                Ok(Box::new(MlpClassifier::fit(features.view(), &labels, &config)?))
            }
            CandidateRecipe::Tree(config) => Ok(Box::new(DecisionTreeClassifier::fit(
                features.view(),
                &labels,
                &config,
            )?)),
        }
    }
}

/// Execute the full pipeline: load, split, fit scaler, train candidates,
/// select by validation F1, report on the test split and export the winner.
/// Any stage failure aborts the run; re-running is cheap and idempotent.
pub async fn run(config: &PipelineConfig) -> anyhow::Result<PipelineSummary> {
    let mut tracker = StageTracker::new();

    let dataset = load_csv(&config.dataset_path)?;
    tracker.advance(PipelineStage::Loaded)?;

    let ratios = SplitRatios {
        train: config.split.train,
        validation: config.split.validation,
        test: config.split.test,
    };
    let split = stratified_split(dataset.features.view(), &dataset.labels, ratios, config.seed)?;
    tracker.advance(PipelineStage::Split)?;

    // Statistics come from the training split only. Unit policy: the
    // reserved behavioral slots are constant by contract, so a strict fit
    // would reject every real dataset.
    let scaler =
        standardizer::fit_with_policy(split.train.features.view(), ZeroVariancePolicy::Unit)?;
    let train_x = scaler.transform_matrix(split.train.features.view())?;
    let val_x = scaler.transform_matrix(split.validation.features.view())?;
    let test_x = scaler.transform_matrix(split.test.features.view())?;
    tracker.advance(PipelineStage::ScalerFit)?;

    // Candidate training tasks are independent: each owns its copy of the
    // scaled matrices, and selection below is an order-insensitive max.
    let mut recipes = vec![CandidateRecipe::Logistic(LogisticRegressionConfig::default())];
    for (i, &hidden_dim) in config.mlp_hidden_dims.iter().enumerate() {
        recipes.push(CandidateRecipe::Mlp(MlpConfig {
            hidden_dim,
            seed: config.seed.wrapping_add(i as u64 + 1),
            ..MlpConfig::default()
        }));
    }
    recipes.push(CandidateRecipe::Tree(DecisionTreeConfig {
        max_depth: config.tree.max_depth,
        min_samples_leaf: config.tree.min_samples_leaf,
    }));

    let mut handles = Vec::new();
    for recipe in recipes {
        let features = train_x.clone();
        let labels = split.train.labels.clone();
        handles.push(tokio::task::spawn_blocking(move || recipe.fit(features, labels)));
    }

    let mut models: Vec<Box<dyn Classifier + Send>> = Vec::new();
    let mut reports = Vec::new();
    for handle in handles {
        let model = handle.await.context("candidate training task panicked")??;
        let metrics = evaluate_classifier(
            model.as_ref(),
            val_x.view(),
            &split.validation.labels,
            config.threshold,
        );
        info!(
            candidate = model.name(),
            f1 = metrics.f1,
            accuracy = metrics.accuracy,
            params = model.parameter_count(),
            "candidate evaluated"
        );
        reports.push(CandidateReport {
            name: model.name().to_string(),
            metrics,
            parameter_count: model.parameter_count(),
        });
        models.push(model);
    }
    tracker.advance(PipelineStage::CandidatesTrained)?;

    // Max validation F1; the first best wins ties, like the reference report
    let best_index = reports
        .iter()
        .enumerate()
        .fold(0usize, |best, (i, report)| {
            if report.metrics.f1 > reports[best].metrics.f1 {
                i
            } else {
                best
            }
        });
    let best = models[best_index].as_ref();
    let validation = reports[best_index].metrics.clone();
    info!(best = best.name(), f1 = validation.f1, "best candidate selected");
    tracker.advance(PipelineStage::BestSelected)?;

    // Single diagnostic pass over the untouched test split; its predictions
    // also feed the event buffer consumed by the dashboard side
    let test_metrics = evaluate_classifier(
        best,
        test_x.view(),
        &split.test.labels,
        config.threshold,
    );
    info!(
        f1 = test_metrics.f1,
        accuracy = test_metrics.accuracy,
        "final test evaluation (diagnostic)"
    );

    let events = EventBuffer::new(config.event_capacity);
    for (row, &record_index) in test_x.rows().into_iter().zip(&split.test.indices) {
        let record = &dataset.records[record_index];
        let probability = best.forward(row);
        let malicious = classify(probability, config.threshold);
        events.push(WafEvent {
            method: record.method.clone(),
            path: record.path.clone(),
            query: record.query.clone(),
            user_agent: record.user_agent.clone(),
            probability,
            classification: u8::from(malicious),
            action: if malicious {
                WafAction::Blocked
            } else {
                WafAction::Allowed
            },
            client_ip: record.ip.clone(),
        });
    }

    // Export: persist the versioned artifacts, then compile the module
    let params = best.export_parameters().ok_or_else(|| {
        anyhow!(
            "selected model {} has no dense-layer parameter form and cannot be exported",
            best.name()
        )
    })?;
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("cannot create output directory {}", config.output_dir.display())
    })?;
    let architecture = params.architecture();
    if architecture.input_dim != feature_encoder::FEATURE_DIMENSION {
        bail!(
            "model input width {} does not match the {}-slot feature schema",
            architecture.input_dim,
            feature_encoder::FEATURE_DIMENSION
        );
    }
    write_json_artifact(&config.scaler_path(), &scaler)?;
    write_json_artifact(&config.model_path(), &params)?;
    write_json_artifact(&config.architecture_path(), &architecture)?;

    let module = generate_module(&scaler, &params)?;

    // Verify the module's float arithmetic against the double-precision
    // reference on real (already normalized) test vectors
    for row in test_x.rows().into_iter().take(32) {
        let normalized = row.to_vec();
        let exact = reference::infer_f64(&params, &normalized);
        let emitted = reference::infer_f32(&params, &normalized) as f64;
        if (exact - emitted).abs() >= 1e-5 {
            bail!(
                "generated module diverges from the reference: {} vs {}",
                emitted,
                exact
            );
        }
    }

    let module_path = config.module_path();
    fs::write(&module_path, &module)
        .with_context(|| format!("cannot write module {}", module_path.display()))?;
    tracker.advance(PipelineStage::Exported)?;

    info!(
        module = %module_path.display(),
        events = events.total_recorded(),
        "pipeline complete"
    );

    Ok(PipelineSummary {
        best_name: best.name().to_string(),
        validation,
        test: test_metrics,
        architecture,
        candidates: reports,
        rows_skipped: dataset.rows_skipped,
        events_recorded: events.total_recorded(),
        module_path,
    })
}

/// Regenerate the inference module from previously persisted artifacts,
/// without retraining. Fails when either artifact is missing or unreadable.
pub fn export_from_artifacts(config: &PipelineConfig) -> anyhow::Result<PathBuf> {
    let inputs = load_artifacts(&config.scaler_path(), &config.model_path())?;
    let module = generate_module(&inputs.scaler, &inputs.model)?;

    let module_path = config.module_path();
    fs::write(&module_path, &module)
        .with_context(|| format!("cannot write module {}", module_path.display()))?;
    info!(module = %module_path.display(), "module regenerated from artifacts");
    Ok(module_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    const HEADER: &str = "ip,method,path,query,user_agent,headers,content_length,label";

    const BENIGN_UAS: [&str; 3] = [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/91.0",
        "Mozilla/5.0 (X11; Linux x86_64) Firefox/89.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/605.1",
    ];

    fn write_synthetic_csv(path: &Path) {
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();

        for i in 0..60 {
            let (method, req_path, query) = match i % 4 {
                0 => ("GET", "/".to_string(), String::new()),
                1 => ("GET", format!("/products/{}", i), String::new()),
                2 => ("POST", "/search".to_string(), format!("q=laptop{}&page={}", i, i % 7)),
                _ => ("HEAD", "/api/v1/users".to_string(), String::new()),
            };
            writeln!(
                file,
                "10.0.0.{},{},{},{},{},Host: shop.example; Accept-Language: en-US,{},0",
                i % 250,
                method,
                req_path,
                query,
                BENIGN_UAS[i % 3],
                i % 3,
            )
            .unwrap();
        }

        for i in 0..60 {
            let (method, req_path, query, ua) = match i % 4 {
                0 => ("GET", "/wp-admin".to_string(), String::new(), "Mozilla/5.0"),
                1 => (
                    "GET",
                    "/product".to_string(),
                    format!("id={}' UNION SELECT secret FROM users--", i),
                    BENIGN_UAS[i % 3],
                ),
                2 => (
                    "GET",
                    "/search".to_string(),
                    "q=<script>alert(1)</script>".to_string(),
                    BENIGN_UAS[i % 3],
                ),
                _ => ("GET", "/".to_string(), String::new(), "sqlmap/1.4.7"),
            };
            writeln!(
                file,
                "192.168.1.{},{},{},{},{},,{},1",
                i % 250,
                method,
                req_path,
                query,
                ua,
                i % 5,
            )
            .unwrap();
        }
    }

    fn test_config(dir: &Path) -> PipelineConfig {
        let dataset_path = dir.join("requests.csv");
        write_synthetic_csv(&dataset_path);
        PipelineConfig {
            dataset_path,
            output_dir: dir.join("artifacts"),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let summary = run(&config).await.unwrap();

        assert_eq!(summary.candidates.len(), 4);
        // the attack signals are cleanly separable, any competent winner
        // should do well on validation
        assert!(summary.validation.f1 >= 0.8, "f1 was {}", summary.validation.f1);
        assert_eq!(summary.architecture.input_dim, 22);
        assert_eq!(summary.architecture.output_dim, 1);
        // test split: 9 benign + 9 malicious events
        assert_eq!(summary.events_recorded, 18);

        let module = std::fs::read_to_string(&summary.module_path).unwrap();
        assert!(module.starts_with("// Generated request-classifier inference module"));
        assert!(module.contains("#define WAF_N_FEATURES 22"));

        // persisted artifacts accompany the module
        assert!(config.scaler_path().exists());
        assert!(config.model_path().exists());
        assert!(config.architecture_path().exists());
    }

    #[tokio::test]
    async fn test_rerun_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let first = run(&config).await.unwrap();
        let module_a = std::fs::read(&first.module_path).unwrap();
        let second = run(&config).await.unwrap();
        let module_b = std::fs::read(&second.module_path).unwrap();

        assert_eq!(first.best_name, second.best_name);
        assert_eq!(module_a, module_b);
    }

    #[tokio::test]
    async fn test_export_from_artifacts_matches_pipeline_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let summary = run(&config).await.unwrap();
        let trained = std::fs::read(&summary.module_path).unwrap();

        let regenerated_path = export_from_artifacts(&config).unwrap();
        let regenerated = std::fs::read(&regenerated_path).unwrap();
        assert_eq!(trained, regenerated);
    }

    #[test]
    fn test_export_without_artifacts_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            dataset_path: dir.path().join("unused.csv"),
            output_dir: dir.path().join("artifacts"),
            ..PipelineConfig::default()
        };
        let err = export_from_artifacts(&config).unwrap_err();
        assert!(err.to_string().contains("scaler.json"));
    }

    #[tokio::test]
    async fn test_missing_dataset_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            dataset_path: dir.path().join("does-not-exist.csv"),
            output_dir: dir.path().join("artifacts"),
            ..PipelineConfig::default()
        };
        assert!(run(&config).await.is_err());
    }
}
