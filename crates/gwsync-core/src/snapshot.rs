// ── Source configuration snapshot ──

use std::fmt;

use gwsync_api::{Configuration, NodeInfo};

use crate::config::Endpoint;

/// What the extractor took from the source, shared read-only by every
/// target sync of the run.
#[derive(Clone, PartialEq)]
pub struct ConfigSnapshot {
    /// Comment of the source's active configuration (empty if it has none).
    pub comment: String,
    /// The source's full node-info document.
    pub node_identity: NodeInfo,
    /// The exported configuration archive, byte for byte.
    pub archive: Vec<u8>,
}

impl fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSnapshot")
            .field("comment", &self.comment)
            .field("hostname", &self.source_hostname())
            .field("archive_len", &self.archive.len())
            .finish()
    }
}

impl ConfigSnapshot {
    /// The source node's hostname.
    pub fn source_hostname(&self) -> Option<&str> {
        self.node_identity.hostname()
    }

    /// Comment to activate the imported configuration with on a target.
    pub fn activation_comment(&self, source: &Endpoint) -> String {
        let note = format!("(sync from {})", source.address);
        if self.comment.is_empty() {
            note
        } else {
            format!("{} {note}", self.comment)
        }
    }
}

/// Comment of the currently active configuration.
///
/// An active entry without a comment, or no active entry at all, yields an
/// empty string.
pub fn active_comment(configs: &[Configuration]) -> String {
    configs
        .iter()
        .find(|c| c.is_active())
        .and_then(|c| c.attributes.comment.clone())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;

    fn configs(value: serde_json::Value) -> Vec<Configuration> {
        serde_json::from_value(value).unwrap()
    }

    fn snapshot(comment: &str) -> ConfigSnapshot {
        ConfigSnapshot {
            comment: comment.into(),
            node_identity: NodeInfo::from_value(json!({
                "data": { "attributes": { "hostName": "gwA" } }
            })),
            archive: b"PK".to_vec(),
        }
    }

    #[test]
    fn picks_comment_of_active_entry() {
        let list = configs(json!([
            { "id": "1", "attributes": { "configType": "SAVED", "comment": "draft" } },
            { "id": "2", "attributes": { "configType": "CURRENTLY_ACTIVE", "comment": "baseline" } }
        ]));
        assert_eq!(active_comment(&list), "baseline");
    }

    #[test]
    fn missing_comment_is_empty() {
        let list = configs(json!([
            { "id": "2", "attributes": { "configType": "CURRENTLY_ACTIVE" } }
        ]));
        assert_eq!(active_comment(&list), "");
        assert_eq!(active_comment(&[]), "");
    }

    #[test]
    fn activation_comment_names_source() {
        let source = Endpoint::new("A", SecretString::from("k".to_owned()));
        assert_eq!(
            snapshot("baseline").activation_comment(&source),
            "baseline (sync from A)"
        );
        assert_eq!(snapshot("").activation_comment(&source), "(sync from A)");
        assert_eq!(snapshot("").source_hostname(), Some("gwA"));
    }
}
