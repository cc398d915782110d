// ── Run progress reporting ──
//
// Every major step of a run is announced to a `SyncProgress` observer owned
// by the orchestrator. The CLI prints them as status lines; tests record
// them; `TracingProgress` turns them into log events.

use std::path::Path;

use tracing::{info, warn};

use crate::config::Endpoint;
use crate::error::CoreError;

/// A step of an extraction or target sync.
#[derive(Debug)]
pub enum SyncStep<'a> {
    ExtractStarted { source: &'a Endpoint },
    CommentExtracted { comment: &'a str },
    ArchiveExported { path: &'a Path, size: u64 },
    ExtractFailed { error: &'a CoreError },

    SyncStarted { target: &'a Endpoint },
    NodeInfoSaved,
    HostnameMasked { hostname: &'a str },
    ArchiveImported,
    HostnameRestored { hostname: &'a str },
    Activating { comment: &'a str },
    Activated,
    ActivationRejected,
    ActivationDisconnected,
    SyncFailed { error: &'a CoreError },
    ArchiveRemoved { path: &'a Path },
}

/// Observer for run progress.
pub trait SyncProgress: Send + Sync {
    fn step(&self, step: &SyncStep<'_>);
}

/// Logs every step through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl SyncProgress for TracingProgress {
    fn step(&self, step: &SyncStep<'_>) {
        match step {
            SyncStep::ExtractStarted { source } => {
                info!(source = %source, "downloading current config");
            }
            SyncStep::CommentExtracted { comment } => info!(comment, "extracted comment"),
            SyncStep::ArchiveExported { path, size } => {
                info!(path = %path.display(), size, "archive stored");
            }
            SyncStep::ExtractFailed { error } => {
                warn!(error = %error, "failed to retrieve configuration");
            }
            SyncStep::SyncStarted { target } => info!(target = %target, "uploading config"),
            SyncStep::NodeInfoSaved => info!("node info saved"),
            SyncStep::HostnameMasked { hostname } => info!(hostname, "hostname overwritten"),
            SyncStep::ArchiveImported => info!("archive imported"),
            SyncStep::HostnameRestored { hostname } => info!(hostname, "hostname restored"),
            SyncStep::Activating { comment } => info!(comment, "activating configuration"),
            SyncStep::Activated => info!("config sync completed"),
            SyncStep::ActivationRejected => warn!("activation refused, synchronization failed"),
            SyncStep::ActivationDisconnected => {
                info!("gateway dropped the connection during activation, assuming success");
            }
            SyncStep::SyncFailed { error } => warn!(error = %error, "sync failed"),
            SyncStep::ArchiveRemoved { path } => info!(path = %path.display(), "archive cleaned up"),
        }
    }
}
