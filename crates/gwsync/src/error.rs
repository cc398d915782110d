//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use gwsync_config::ConfigError;
use gwsync_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const SYNC_ABORTED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to gateway at {url}")]
    #[diagnostic(
        code(gwsync::connection_failed),
        help(
            "Check that the management interface is reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Gateway request timed out")]
    #[diagnostic(
        code(gwsync::timeout),
        help("Increase the timeout with --timeout or `timeout:` in the gateway file.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(gwsync::auth_failed),
        help("Verify the gateway's REST API key and that it is allowed to manage configurations.")
    )]
    AuthFailed { message: String },

    #[error("No API key configured for gateway '{gateway}'")]
    #[diagnostic(
        code(gwsync::no_credentials),
        help("Set `api_key` or `api_key_env` for this gateway in the gateway file.")
    )]
    NoCredentials { gateway: String },

    // ── Sync ─────────────────────────────────────────────────────────
    #[error("Synchronization aborted at {target}")]
    #[diagnostic(
        code(gwsync::sync_aborted),
        help(
            "{reason}\n\
             Gateways after {target} were not synchronized. See the log file for details."
        )
    )]
    SyncAborted { target: String, reason: String },

    #[error("Gateway {address} reported no node hostname")]
    #[diagnostic(code(gwsync::missing_identity))]
    MissingIdentity { address: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Gateway API error: {message}")]
    #[diagnostic(code(gwsync::api_error))]
    Api { message: String },

    #[error("Configuration archive {path}: {reason}")]
    #[diagnostic(code(gwsync::archive))]
    Archive { path: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Gateway file not found")]
    #[diagnostic(
        code(gwsync::no_config),
        help(
            "Create a gateway file or pass one with --gateways.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("No gateways configured in {path}")]
    #[diagnostic(
        code(gwsync::no_gateways),
        help("List the source gateway first under `gateways:`, then the targets.")
    )]
    NoGateways { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gwsync::validation))]
    Validation { field: String, reason: String },

    #[error("Could not load gateway file: {message}")]
    #[diagnostic(code(gwsync::config))]
    Config { message: String },

    // ── Serialization ────────────────────────────────────────────────
    #[error("Could not render JSON output: {0}")]
    #[diagnostic(code(gwsync::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML output: {0}")]
    #[diagnostic(code(gwsync::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(gwsync::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::SyncAborted { .. } => exit_code::SYNC_ABORTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Api { message, status: _ } => CliError::Api { message },

            CoreError::MissingIdentity { address } => CliError::MissingIdentity { address },

            CoreError::Archive { path, reason } => CliError::Archive { path, reason },

            // The source step is named in the inner error's context already.
            CoreError::Extraction { source, .. } => CliError::from(*source),

            CoreError::Sync { target, source } => CliError::SyncAborted {
                target,
                reason: source.to_string(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "gateways".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => CliError::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { gateway } => CliError::NoCredentials { gateway },
            ConfigError::Figment(e) => CliError::Config {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_failure_maps_to_aborted_exit_code() {
        let err = CliError::from(CoreError::Sync {
            target: "10.0.0.11".into(),
            source: Box::new(CoreError::Timeout),
        });
        assert!(matches!(err, CliError::SyncAborted { ref target, .. } if target == "10.0.0.11"));
        assert_eq!(err.exit_code(), exit_code::SYNC_ABORTED);
    }

    #[test]
    fn extraction_failure_maps_to_root_cause() {
        let err = CliError::from(CoreError::Extraction {
            address: "10.0.0.10".into(),
            source: Box::new(CoreError::ConnectionFailed {
                url: "https://10.0.0.10/airlock/rest/".into(),
                reason: "connection refused".into(),
            }),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn missing_key_is_an_auth_error() {
        let err = CliError::from(ConfigError::NoCredentials {
            gateway: "10.0.0.10".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }
}
