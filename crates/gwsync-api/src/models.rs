// Configuration REST API response types
//
// The gateway speaks JSON:API: every payload sits under a top-level `data`
// member, resources carry `type`, `id` and `attributes`. Attributes use
// `#[serde(default)]` liberally since field presence varies by release.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Document envelope ────────────────────────────────────────────────

/// Top-level JSON:API document.
#[derive(Debug, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// A JSON:API resource object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<A> {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
    pub attributes: A,
}

// ── Configurations ───────────────────────────────────────────────────

/// Lifecycle state of a stored configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigType {
    CurrentlyActive,
    PreviouslyActive,
    Saved,
    Initializing,
    #[serde(other)]
    Unknown,
}

/// Attributes of an entry from `GET /configuration/configurations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationAttributes {
    pub config_type: ConfigType,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One stored configuration.
pub type Configuration = Resource<ConfigurationAttributes>;

impl Configuration {
    /// Whether this is the configuration currently enforced by the gateway.
    pub fn is_active(&self) -> bool {
        self.attributes.config_type == ConfigType::CurrentlyActive
    }
}

/// Body of `POST /configuration/configurations/activate`.
#[derive(Debug, Serialize)]
pub struct ActivationRequest<'a> {
    pub comment: &'a str,
}

// ── Nodes ────────────────────────────────────────────────────────────

/// The node-info document from `/configuration/nodes/current`.
///
/// Kept as raw JSON: the whole document is read, one attribute is
/// rewritten and the rest is sent back unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeInfo(Value);

impl NodeInfo {
    const ATTRIBUTES: &'static str = "/data/attributes";

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The node's `hostName` attribute.
    pub fn hostname(&self) -> Option<&str> {
        self.0
            .pointer(Self::ATTRIBUTES)?
            .get("hostName")?
            .as_str()
    }

    /// Copy of this document with `hostName` replaced.
    ///
    /// Returns `None` when the document has no `data.attributes` object.
    pub fn with_hostname(&self, hostname: &str) -> Option<Self> {
        let mut value = self.0.clone();
        let attributes = value.pointer_mut(Self::ATTRIBUTES)?.as_object_mut()?;
        attributes.insert("hostName".into(), Value::String(hostname.to_owned()));
        Some(Self(value))
    }
}
