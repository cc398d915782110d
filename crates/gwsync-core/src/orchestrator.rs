// ── Sync orchestration ──
//
// Drives one run: extract from the first endpoint, then sync every other
// endpoint in order. Targets are handled strictly one after another since
// they share the run's single archive, which is written back from the
// snapshot before each target and removed after it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::archive::ConfigArchive;
use crate::config::Endpoint;
use crate::error::CoreError;
use crate::extract::SourceExtractor;
use crate::progress::{SyncProgress, SyncStep, TracingProgress};
use crate::session::Connector;
use crate::snapshot::ConfigSnapshot;
use crate::target::{TargetOutcome, TargetSynchronizer};

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Every target was attempted.
    Completed,
    /// Nothing could be taken from the source; no target was contacted.
    ExtractionFailed(CoreError),
    /// A target failed and the remaining targets were skipped.
    Aborted { target: String },
}

/// Per-target record of a run.
#[derive(Debug)]
pub struct TargetReport {
    pub target: String,
    pub outcome: TargetOutcome,
}

/// Everything a run did, in order.
#[derive(Debug)]
pub struct RunReport {
    pub snapshot: Option<ConfigSnapshot>,
    pub targets: Vec<TargetReport>,
    pub outcome: RunOutcome,
}

impl RunReport {
    /// The error that aborted the run, if a target failed.
    pub fn failure(&self) -> Option<&CoreError> {
        self.targets.iter().find_map(|t| t.outcome.error())
    }

    /// Number of targets that were attempted.
    pub fn attempted(&self) -> usize {
        self.targets.len()
    }
}

/// Runs extraction and target syncs over an ordered endpoint list.
pub struct SyncOrchestrator<C: Connector> {
    connector: C,
    archive: ConfigArchive,
    progress: Arc<dyn SyncProgress>,
}

impl<C: Connector> SyncOrchestrator<C> {
    pub fn new(connector: C, archive: ConfigArchive) -> Self {
        Self {
            connector,
            archive,
            progress: Arc::new(TracingProgress),
        }
    }

    /// Replace the progress observer.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn SyncProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn archive(&self) -> &ConfigArchive {
        &self.archive
    }

    /// Synchronize `endpoints[1..]` from `endpoints[0]`.
    ///
    /// Only an empty endpoint list is an error; extraction and target
    /// failures are reported through [`RunReport::outcome`].
    pub async fn run(&self, endpoints: &[Endpoint]) -> Result<RunReport, CoreError> {
        let (source, targets) = split_source(endpoints)?;

        let extractor = SourceExtractor::new(&self.connector, &self.archive, self.progress.as_ref());
        let snapshot = match extractor.extract(source).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                self.discard_archive().await;
                return Ok(RunReport {
                    snapshot: None,
                    targets: Vec::new(),
                    outcome: RunOutcome::ExtractionFailed(error),
                });
            }
        };

        if targets.is_empty() {
            info!("no targets configured, nothing to sync");
            self.discard_archive().await;
        }

        let synchronizer =
            TargetSynchronizer::new(&self.connector, &self.archive, self.progress.as_ref());
        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            let outcome = match self.archive.write(&snapshot.archive).await {
                Ok(()) => synchronizer.sync(source, target, &snapshot).await,
                Err(e) => {
                    let error = CoreError::Sync {
                        target: target.to_string(),
                        source: Box::new(e),
                    };
                    self.progress.step(&SyncStep::SyncFailed { error: &error });
                    TargetOutcome::Failed(error)
                }
            };
            let fatal = outcome.is_fatal();
            reports.push(TargetReport {
                target: target.to_string(),
                outcome,
            });
            if fatal {
                warn!(target = %target, "aborting run");
                return Ok(RunReport {
                    snapshot: Some(snapshot),
                    targets: reports,
                    outcome: RunOutcome::Aborted {
                        target: target.to_string(),
                    },
                });
            }
        }

        Ok(RunReport {
            snapshot: Some(snapshot),
            targets: reports,
            outcome: RunOutcome::Completed,
        })
    }

    /// Extract from `endpoints[0]` and keep the archive.
    pub async fn extract_only(&self, endpoints: &[Endpoint]) -> Result<ConfigSnapshot, CoreError> {
        let (source, _) = split_source(endpoints)?;
        let extractor = SourceExtractor::new(&self.connector, &self.archive, self.progress.as_ref());
        let result = extractor.extract(source).await;
        if result.is_err() {
            self.discard_archive().await;
        }
        result
    }

    async fn discard_archive(&self) {
        if let Err(e) = self.archive.remove().await {
            warn!(error = %e, "archive cleanup failed");
        }
    }
}

fn split_source(endpoints: &[Endpoint]) -> Result<(&Endpoint, &[Endpoint]), CoreError> {
    endpoints.split_first().ok_or_else(|| CoreError::Config {
        message: "no gateways configured".into(),
    })
}
