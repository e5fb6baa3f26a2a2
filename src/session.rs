//! One analysis run: the progress loop raced against the result producer,
//! plus the application state that holds the result being displayed.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

use crate::assessment::AnalysisResult;
use crate::backend::{AnalysisBackend, BackendError, Upload};
use crate::progress::{ProgressOutcome, ProgressSimulator, ProgressTask, ProgressTiming, ProgressUpdate};
use crate::report::{self, ExportPaths, ReportError};
use crate::scoring::recommendations;
use crate::synthetic;

/// What to do when the backend cannot produce a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Substitute a synthetic result, tagged as `ResultSource::Fallback`
    #[default]
    Synthetic,
    /// Surface the backend error
    Fail,
}

/// Where the displayed result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Backend,
    Demo,
    /// Synthetic data standing in for a failed backend call
    Fallback,
    /// A previously exported result read back from disk
    Loaded,
}

impl ResultSource {
    /// Warning to show alongside a result that is not a real assessment.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            ResultSource::Fallback => Some(
                "Analysis backend unavailable: showing synthetic demo-quality data, not a real assessment.",
            ),
            ResultSource::Backend | ResultSource::Demo | ResultSource::Loaded => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Analysis backend failed: {0}")]
    Backend(#[from] BackendError),
}

pub enum Request {
    Demo,
    Upload(Upload),
}

#[derive(Debug, Clone)]
pub struct Assessment {
    pub result: AnalysisResult,
    pub source: ResultSource,
    /// How the progress loop ended; `None` when no loop ran
    pub progress: Option<ProgressOutcome>,
}

impl Assessment {
    /// Wrap a result read back from a structured export.
    pub fn loaded(result: AnalysisResult) -> Self {
        Self {
            result,
            source: ResultSource::Loaded,
            progress: None,
        }
    }
}

enum FirstDone {
    Result(Result<(AnalysisResult, ResultSource), SessionError>),
    Progress(ProgressOutcome),
}

/// Runs analyses against a backend with a fixed fallback policy.
pub struct Assessor {
    backend: Box<dyn AnalysisBackend>,
    policy: FallbackPolicy,
    timing: ProgressTiming,
    seed: Option<u64>,
}

impl Assessor {
    pub fn new(backend: Box<dyn AnalysisBackend>, policy: FallbackPolicy, timing: ProgressTiming) -> Self {
        Self {
            backend,
            policy,
            timing,
            seed: None,
        }
    }

    /// Make synthetic results and progress increments reproducible.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }

    fn synthesize(&self, filename: &str) -> AnalysisResult {
        synthetic::generate(&mut self.rng(0), filename, Utc::now())
    }

    /// Produce a result while the progress loop animates.
    ///
    /// Demo results are ready at once but held until progress completes.
    /// Uploads race the backend against the progress loop; if the result
    /// wins, the loop is cancelled before this returns.
    #[instrument(skip_all, fields(backend = self.backend.name(), policy = ?self.policy))]
    pub async fn run(
        &self,
        request: Request,
        updates: UnboundedSender<ProgressUpdate>,
    ) -> Result<Assessment, SessionError> {
        let mut progress = ProgressTask::spawn(
            ProgressSimulator::new(self.rng(1)),
            self.timing,
            updates,
        );

        let upload = match request {
            Request::Demo => {
                let result = self.synthesize(synthetic::DEMO_FILENAME);
                let outcome = progress.wait().await;
                info!(analysis_id = %result.analysis_id, "demo analysis ready");
                return Ok(Assessment {
                    result,
                    source: ResultSource::Demo,
                    progress: Some(outcome),
                });
            }
            Request::Upload(upload) => upload,
        };

        let producing = self.produce(&upload);
        tokio::pin!(producing);

        let first = tokio::select! {
            biased;
            produced = &mut producing => FirstDone::Result(produced),
            outcome = progress.wait() => FirstDone::Progress(outcome),
        };

        let (produced, outcome) = match first {
            FirstDone::Result(produced) => {
                let outcome = progress.cancel().await;
                (produced, outcome)
            }
            FirstDone::Progress(outcome) => {
                debug!("progress finished first, waiting for result");
                (producing.await, outcome)
            }
        };

        let (result, source) = produced?;
        info!(analysis_id = %result.analysis_id, ?source, ?outcome, "analysis ready");
        Ok(Assessment {
            result,
            source,
            progress: Some(outcome),
        })
    }

    async fn produce(&self, upload: &Upload) -> Result<(AnalysisResult, ResultSource), SessionError> {
        match self.backend.analyze(upload).await {
            Ok(mut result) => {
                if result.recommendations.is_empty() {
                    result.recommendations =
                        recommendations::derive_recommendations(&result.analysis);
                    debug!(count = result.recommendations.len(), "derived recommendations");
                }
                Ok((result, ResultSource::Backend))
            }
            Err(err) => match self.policy {
                FallbackPolicy::Synthetic => {
                    warn!(error = %err, "backend failed, substituting synthetic result");
                    Ok((self.synthesize(&upload.filename), ResultSource::Fallback))
                }
                FallbackPolicy::Fail => Err(err.into()),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No analysis to export yet. Run an analysis first.")]
    NoAnalysis,

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// The result currently on display, if any.
#[derive(Debug, Default)]
pub struct AppState {
    current: Option<Assessment>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous result; a new run never mutates it in place.
    pub fn begin(&mut self) {
        self.current = None;
    }

    pub fn complete(&mut self, assessment: Assessment) {
        self.current = Some(assessment);
    }

    pub fn current(&self) -> Option<&Assessment> {
        self.current.as_ref()
    }

    fn assessment(&self) -> Result<&Assessment, ExportError> {
        self.current.as_ref().ok_or(ExportError::NoAnalysis)
    }

    pub fn export_structured(&self) -> Result<String, ExportError> {
        Ok(report::to_structured(&self.assessment()?.result)?)
    }

    pub fn export_text(&self) -> Result<String, ExportError> {
        let assessment = self.assessment()?;
        Ok(report::to_text(&assessment.result, assessment.source.notice()))
    }

    pub fn write_exports(&self, dir: &Path, at: DateTime<Utc>) -> Result<ExportPaths, ExportError> {
        let assessment = self.assessment()?;
        Ok(report::write_exports(
            &assessment.result,
            assessment.source.notice(),
            dir,
            at,
        )?)
    }
}
