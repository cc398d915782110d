// ── Source extraction ──
//
// Pulls the active configuration of the source gateway into the run's
// archive and captures the comment and node identity targets need.

use tracing::{debug, warn};

use crate::archive::ConfigArchive;
use crate::config::Endpoint;
use crate::error::CoreError;
use crate::progress::{SyncProgress, SyncStep};
use crate::session::{Connector, GatewaySession};
use crate::snapshot::{ConfigSnapshot, active_comment};

/// Extracts a [`ConfigSnapshot`] and the archive from the source gateway.
pub struct SourceExtractor<'a, C: Connector> {
    connector: &'a C,
    archive: &'a ConfigArchive,
    progress: &'a dyn SyncProgress,
}

impl<'a, C: Connector> SourceExtractor<'a, C> {
    pub fn new(connector: &'a C, archive: &'a ConfigArchive, progress: &'a dyn SyncProgress) -> Self {
        Self {
            connector,
            archive,
            progress,
        }
    }

    /// Run the extraction sequence against `source`.
    ///
    /// On success the archive file holds an export of the configuration that
    /// was active on the source and the snapshot carries the same bytes. Any
    /// failure is returned as [`CoreError::Extraction`].
    pub async fn extract(&self, source: &Endpoint) -> Result<ConfigSnapshot, CoreError> {
        self.progress.step(&SyncStep::ExtractStarted { source });

        let result = self.extract_session(source).await.map_err(|e| CoreError::Extraction {
            address: source.to_string(),
            source: Box::new(e),
        });

        if let Err(ref error) = result {
            self.progress.step(&SyncStep::ExtractFailed { error });
        }
        result
    }

    /// Open, use and terminate one session. The session is terminated on
    /// every path once it was opened.
    async fn extract_session(&self, source: &Endpoint) -> Result<ConfigSnapshot, CoreError> {
        let session = self.connector.open(source).await?;
        let result = self.read_source(&session, source).await;

        match (result, session.terminate().await) {
            (Ok(snapshot), Ok(())) => Ok(snapshot),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(terminate)) => {
                warn!(source = %source, error = %terminate, "session terminate failed after error");
                Err(e)
            }
        }
    }

    async fn read_source(
        &self,
        session: &C::Session,
        source: &Endpoint,
    ) -> Result<ConfigSnapshot, CoreError> {
        let configs = session.list_configurations().await?;
        let comment = active_comment(&configs);
        debug!(entries = configs.len(), "configurations listed");
        self.progress.step(&SyncStep::CommentExtracted { comment: &comment });

        session.load_active_configuration().await?;
        let size = session.export_configuration(self.archive.path()).await?;
        self.progress.step(&SyncStep::ArchiveExported {
            path: self.archive.path(),
            size,
        });

        let node_identity = session.current_node().await?;
        if node_identity.hostname().is_none() {
            return Err(CoreError::MissingIdentity {
                address: source.to_string(),
            });
        }

        let archive = self.archive.read().await?;
        Ok(ConfigSnapshot {
            comment,
            node_identity,
            archive,
        })
    }
}
