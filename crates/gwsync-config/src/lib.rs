//! Gateway list for gwsync.
//!
//! YAML gateway file loading, credential resolution (env var + plaintext),
//! and translation to `gwsync_core::Endpoint` / `TransportConfig`. The CLI
//! adds flag overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gwsync_core::{DEFAULT_ARCHIVE, DEFAULT_PORT, Endpoint, TlsMode, TransportConfig};

/// File name looked up in the working directory first.
pub const GATEWAYS_FILE: &str = "gateways.yaml";

/// Settings that may be overridden through `GWSYNC_*` variables.
const ENV_KEYS: &[&str] = &["archive", "timeout", "insecure", "ca_cert"];

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("gateway file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for gateway '{gateway}'")]
    NoCredentials { gateway: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Gateway file ────────────────────────────────────────────────────

/// Top-level gateway file. The first gateway is the source.
#[derive(Debug, Deserialize, Serialize)]
pub struct GatewayFile {
    #[serde(default)]
    pub gateways: Vec<GatewayRecord>,

    /// Local path of the transient configuration archive.
    #[serde(default = "default_archive")]
    pub archive: PathBuf,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed management certificates.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// Path to a custom CA certificate. Takes precedence over `insecure`.
    pub ca_cert: Option<PathBuf>,
}

impl Default for GatewayFile {
    fn default() -> Self {
        Self {
            gateways: Vec::new(),
            archive: default_archive(),
            timeout: default_timeout(),
            insecure: default_insecure(),
            ca_cert: None,
        }
    }
}

fn default_archive() -> PathBuf {
    DEFAULT_ARCHIVE.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_insecure() -> bool {
    true
}

/// One gateway entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayRecord {
    /// Management address (IP or hostname).
    pub ip: String,

    /// API key (plaintext, prefer `api_key_env`).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// ── Gateway file path ───────────────────────────────────────────────

/// `./gateways.yaml` if present, otherwise the platform config dir.
pub fn gateways_path() -> PathBuf {
    let local = PathBuf::from(GATEWAYS_FILE);
    if local.exists() {
        return local;
    }
    ProjectDirs::from("ch", "airlock", "gwsync")
        .map_or(local, |dirs| dirs.config_dir().join(GATEWAYS_FILE))
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the gateway file at `path`, layered over defaults and under
/// `GWSYNC_*` environment overrides.
pub fn load_gateway_file(path: &Path) -> Result<GatewayFile, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let figment = Figment::new()
        .merge(Serialized::defaults(GatewayFile::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed("GWSYNC_").only(ENV_KEYS));

    let file: GatewayFile = figment.extract()?;
    file.validate()?;
    Ok(file)
}

impl GatewayFile {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pos) = self.gateways.iter().position(|g| g.ip.trim().is_empty()) {
            return Err(ConfigError::Validation {
                field: format!("gateways[{pos}].ip"),
                reason: "must not be empty".into(),
            });
        }
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    /// All gateways as endpoints, source first. Fails on the first gateway
    /// without a resolvable API key.
    pub fn endpoints(&self) -> Result<Vec<Endpoint>, ConfigError> {
        self.gateways
            .iter()
            .map(|g| Ok(Endpoint::new(g.ip.clone(), resolve_api_key(g)?).with_port(g.port)))
            .collect()
    }

    /// Transport settings shared by every gateway session.
    pub fn transport(&self) -> TransportConfig {
        let tls = if let Some(ref ca_path) = self.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a gateway's API key: `api_key_env` lookup, then plaintext.
pub fn resolve_api_key(gateway: &GatewayRecord) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(ref env_name) = gateway.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Plaintext in the gateway file
    if let Some(ref key) = gateway.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        gateway: gateway.ip.clone(),
    })
}
