// ── Target synchronization ──
//
// Imports the run's archive into one target gateway while keeping the
// target's own hostname. The gateway validates an imported archive against
// its live node identity, and the archive carries the source's, so the
// target's hostname is set to the source's for the import and put back
// before activation.

use tracing::{debug, warn};

use crate::archive::ConfigArchive;
use crate::config::Endpoint;
use crate::error::CoreError;
use crate::progress::{SyncProgress, SyncStep};
use crate::session::{Connector, GatewaySession};
use crate::snapshot::ConfigSnapshot;

/// Result of syncing one target.
#[derive(Debug)]
pub enum TargetOutcome {
    /// The gateway confirmed the activation.
    Activated,
    /// The connection dropped during activation. Some gateways close the
    /// management connection right after a successful activation, so this
    /// is treated as success without being able to confirm it.
    AssumedActivated,
    /// The gateway answered the activation with a refusal. The run goes on.
    ActivationRejected,
    /// Any other failure. Ends the run.
    Failed(CoreError),
}

impl TargetOutcome {
    /// Whether this outcome stops the run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// How activation ended, once the session got that far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    Confirmed,
    Refused,
    Disconnected,
}

/// Pushes the extracted configuration to target gateways.
pub struct TargetSynchronizer<'a, C: Connector> {
    connector: &'a C,
    archive: &'a ConfigArchive,
    progress: &'a dyn SyncProgress,
}

impl<'a, C: Connector> TargetSynchronizer<'a, C> {
    pub fn new(connector: &'a C, archive: &'a ConfigArchive, progress: &'a dyn SyncProgress) -> Self {
        Self {
            connector,
            archive,
            progress,
        }
    }

    /// Sync `target` with the archive extracted from `source`.
    ///
    /// The archive is removed before this returns, whatever the outcome.
    pub async fn sync(
        &self,
        source: &Endpoint,
        target: &Endpoint,
        snapshot: &ConfigSnapshot,
    ) -> TargetOutcome {
        self.progress.step(&SyncStep::SyncStarted { target });

        let outcome = match self.sync_session(source, target, snapshot).await {
            Ok(Activation::Confirmed) => {
                self.progress.step(&SyncStep::Activated);
                TargetOutcome::Activated
            }
            Ok(Activation::Refused) => {
                self.progress.step(&SyncStep::ActivationRejected);
                TargetOutcome::ActivationRejected
            }
            Ok(Activation::Disconnected) => {
                self.progress.step(&SyncStep::ActivationDisconnected);
                TargetOutcome::AssumedActivated
            }
            Err(e) => {
                let error = CoreError::Sync {
                    target: target.to_string(),
                    source: Box::new(e),
                };
                self.progress.step(&SyncStep::SyncFailed { error: &error });
                TargetOutcome::Failed(error)
            }
        };

        self.cleanup().await;
        outcome
    }

    async fn cleanup(&self) {
        match self.archive.remove().await {
            Ok(true) => self.progress.step(&SyncStep::ArchiveRemoved {
                path: self.archive.path(),
            }),
            Ok(false) => debug!(path = %self.archive.path().display(), "no archive to clean up"),
            Err(e) => warn!(error = %e, "archive cleanup failed"),
        }
    }

    /// Open, use and terminate one session. Termination is best-effort and
    /// never changes the outcome.
    async fn sync_session(
        &self,
        source: &Endpoint,
        target: &Endpoint,
        snapshot: &ConfigSnapshot,
    ) -> Result<Activation, CoreError> {
        let session = self.connector.open(target).await?;
        let result = self.import_and_activate(&session, source, target, snapshot).await;

        if let Err(e) = session.terminate().await {
            if matches!(result, Ok(Activation::Disconnected)) {
                debug!(target = %target, error = %e, "session already gone after activation");
            } else {
                warn!(target = %target, error = %e, "session terminate failed");
            }
        }
        result
    }

    async fn import_and_activate(
        &self,
        session: &C::Session,
        source: &Endpoint,
        target: &Endpoint,
        snapshot: &ConfigSnapshot,
    ) -> Result<Activation, CoreError> {
        let source_hostname =
            snapshot
                .source_hostname()
                .ok_or_else(|| CoreError::MissingIdentity {
                    address: source.to_string(),
                })?;

        session.load_active_configuration().await?;

        let original = session.current_node().await?;
        self.progress.step(&SyncStep::NodeInfoSaved);
        let masked =
            original
                .with_hostname(source_hostname)
                .ok_or_else(|| CoreError::MissingIdentity {
                    address: target.to_string(),
                })?;

        self.progress.step(&SyncStep::HostnameMasked {
            hostname: source_hostname,
        });
        let imported = match session.patch_current_node(&masked).await {
            Ok(()) => session.import_configuration(self.archive.path()).await,
            Err(e) => Err(e),
        };
        if imported.is_ok() {
            self.progress.step(&SyncStep::ArchiveImported);
        }

        // The target's own identity goes back even when the import failed.
        let restored = session.patch_current_node(&original).await;
        match (imported, restored) {
            (Ok(()), Ok(())) => {}
            (Err(e), Ok(())) | (Ok(()), Err(e)) => return Err(e.into()),
            (Err(e), Err(restore)) => {
                warn!(target = %target, error = %restore, "hostname restore failed after import error");
                return Err(e.into());
            }
        }
        self.progress.step(&SyncStep::HostnameRestored {
            hostname: original.hostname().unwrap_or_default(),
        });

        let comment = snapshot.activation_comment(source);
        self.progress.step(&SyncStep::Activating { comment: &comment });
        match session.activate(&comment).await {
            Ok(true) => Ok(Activation::Confirmed),
            Ok(false) => Ok(Activation::Refused),
            Err(e) if e.is_disconnect() => {
                debug!(target = %target, error = %e, "disconnect during activation");
                Ok(Activation::Disconnected)
            }
            Err(e) => Err(e.into()),
        }
    }
}
