//! Pipeline Stage Machine

use thiserror::Error;

/// Checkpoints of one pipeline invocation, in execution order. The machine
/// only moves forward; `Exported` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Loaded,
    Split,
    ScalerFit,
    CandidatesTrained,
    BestSelected,
    Exported,
}

impl PipelineStage {
    /// The only stage that may legally follow this one.
    pub fn next(self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Loaded => Some(PipelineStage::Split),
            PipelineStage::Split => Some(PipelineStage::ScalerFit),
            PipelineStage::ScalerFit => Some(PipelineStage::CandidatesTrained),
            PipelineStage::CandidatesTrained => Some(PipelineStage::BestSelected),
            PipelineStage::BestSelected => Some(PipelineStage::Exported),
            PipelineStage::Exported => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStage::Loaded => "Loaded",
            PipelineStage::Split => "Split",
            PipelineStage::ScalerFit => "ScalerFit",
            PipelineStage::CandidatesTrained => "CandidatesTrained",
            PipelineStage::BestSelected => "BestSelected",
            PipelineStage::Exported => "Exported",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage ordering violation
#[derive(Debug, Clone, Error)]
pub enum StageError {
    #[error("cannot enter stage {attempted} from {current}; stages advance strictly forward")]
    OutOfOrder {
        current: &'static str,
        attempted: &'static str,
    },
}

/// Enforces the strictly-forward stage order over one invocation.
#[derive(Debug, Default)]
pub struct StageTracker {
    current: Option<PipelineStage>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last stage completed, if any.
    pub fn current(&self) -> Option<PipelineStage> {
        self.current
    }

    /// Record completion of `stage`. Only the immediate successor of the
    /// current stage is accepted; anything else is an ordering violation.
    pub fn advance(&mut self, stage: PipelineStage) -> Result<(), StageError> {
        let expected = match self.current {
            None => Some(PipelineStage::Loaded),
            Some(current) => current.next(),
        };
        if expected != Some(stage) {
            return Err(StageError::OutOfOrder {
                current: self.current.map(PipelineStage::as_str).unwrap_or("Start"),
                attempted: stage.as_str(),
            });
        }
        self.current = Some(stage);
        Ok(())
    }
}
