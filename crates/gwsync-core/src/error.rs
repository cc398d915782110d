// ── Core error types ──
//
// Domain errors from gwsync-core. Callers see what failed and where
// (extraction from the source, sync to a target), not raw HTTP details.
// The `From<gwsync_api::Error>` impl translates client-layer errors.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach gateway at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Gateway request timed out")]
    Timeout,

    // ── Gateway errors ───────────────────────────────────────────────
    #[error("Gateway API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Gateway {address} reported no node hostname")]
    MissingIdentity { address: String },

    // ── Archive errors ───────────────────────────────────────────────
    #[error("Configuration archive {path}: {reason}")]
    Archive { path: String, reason: String },

    // ── Run-level errors ─────────────────────────────────────────────
    #[error("Failed to retrieve configuration from {address}: {source}")]
    Extraction {
        address: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Failed to sync configuration to {target}: {source}")]
    Sync {
        target: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The innermost error, skipping `Extraction` / `Sync` context.
    pub fn root_cause(&self) -> &CoreError {
        match self {
            Self::Extraction { source, .. } | Self::Sync { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// ── Conversion from client-layer errors ──────────────────────────────

impl From<gwsync_api::Error> for CoreError {
    fn from(err: gwsync_api::Error) -> Self {
        match err {
            gwsync_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            gwsync_api::Error::InvalidApiKey(message) => CoreError::AuthenticationFailed {
                message: format!("Invalid API key: {message}"),
            },
            gwsync_api::Error::Disconnected { url, message } => CoreError::ConnectionFailed {
                url,
                reason: message,
            },
            gwsync_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            gwsync_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            gwsync_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            gwsync_api::Error::Api {
                status,
                path,
                message,
            } => CoreError::Api {
                message: format!("{path}: {message}"),
                status: Some(status),
            },
            gwsync_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            gwsync_api::Error::Archive { path, source } => CoreError::Archive {
                path: path.display().to_string(),
                reason: source.to_string(),
            },
        }
    }
}
