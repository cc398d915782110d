use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `gwsync-api` crate.
///
/// Every failure of the management client surfaces as one of these.
/// `gwsync-core` maps them into extraction and synchronization failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Session creation rejected or session no longer valid (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// API key cannot be used as a header value.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    // ── Transport ───────────────────────────────────────────────────
    /// The management connection was refused or dropped before a
    /// response arrived.
    #[error("Connection to {url} lost: {message}")]
    Disconnected { url: String, message: String },

    /// Any other HTTP transport error (timeouts, body decoding, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The gateway answered with an unexpected HTTP status.
    #[error("Gateway API error (HTTP {status}) on {path}: {message}")]
    Api {
        status: u16,
        path: String,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Reading or writing the local configuration archive failed.
    #[error("Archive I/O error on {}: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts stay transport errors; only refused or broken
        // connections count as a disconnect.
        if !err.is_timeout() && (err.is_connect() || err.is_request()) {
            let url = err
                .url()
                .map(ToString::to_string)
                .unwrap_or_else(|| "<unknown>".into());
            return Self::Disconnected {
                url,
                message: err.to_string(),
            };
        }
        Self::Transport(err)
    }
}

impl Error {
    /// Returns `true` if the management connection went away underneath
    /// the request.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}
