//! CLI configuration: a thin wrapper around `gwsync_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--gateways, --insecure, --timeout).

use std::path::{Path, PathBuf};
use std::time::Duration;

use gwsync_core::{TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use gwsync_config::{GatewayFile, GatewayRecord, gateways_path};

/// Gateway file location (flag > env > default lookup).
pub fn active_gateways_path(global: &GlobalOpts) -> PathBuf {
    global.gateways.clone().unwrap_or_else(gateways_path)
}

/// Load the active gateway file.
pub fn load(global: &GlobalOpts) -> Result<(PathBuf, GatewayFile), CliError> {
    let path = active_gateways_path(global);
    let file = gwsync_config::load_gateway_file(&path)?;
    tracing::debug!(path = %path.display(), gateways = file.gateways.len(), "gateway file loaded");
    Ok((path, file))
}

/// Transport settings with CLI flag overrides applied.
pub fn transport(file: &GatewayFile, global: &GlobalOpts) -> Result<TransportConfig, CliError> {
    let mut transport = file.transport();
    if global.insecure {
        transport.tls = TlsMode::DangerAcceptInvalid;
    }
    match global.timeout {
        Some(0) => {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Some(secs) => transport.timeout = Duration::from_secs(secs),
        None => {}
    }
    Ok(transport)
}

/// Archive path (flag > gateway file > default).
pub fn archive_path(file: &GatewayFile, flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(|| file.archive.clone(), Path::to_path_buf)
}
