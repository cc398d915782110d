// ── Gateway session seam ──
//
// The extractor and synchronizer drive these traits, not the HTTP client
// directly. `RestConnector` is the production implementation on top of
// `gwsync_api::GatewayClient`.

use std::path::Path;

use async_trait::async_trait;
use gwsync_api::{Configuration, Error, GatewayClient, NodeInfo, TransportConfig};
use tracing::debug;

use crate::config::Endpoint;

/// An authenticated management session against one gateway.
///
/// Owned by exactly one extractor or synchronizer call and terminated
/// before that call returns.
#[async_trait]
pub trait GatewaySession: Send + Sync {
    /// All stored configurations.
    async fn list_configurations(&self) -> Result<Vec<Configuration>, Error>;

    /// Load the active configuration into the session's working copy.
    async fn load_active_configuration(&self) -> Result<(), Error>;

    /// Write the working copy to `dest` as a zip archive. Returns its size.
    async fn export_configuration(&self, dest: &Path) -> Result<u64, Error>;

    /// Replace the working copy with the archive at `src`.
    async fn import_configuration(&self, src: &Path) -> Result<(), Error>;

    /// The node's full settings document.
    async fn current_node(&self) -> Result<NodeInfo, Error>;

    /// Overwrite the node's settings document.
    async fn patch_current_node(&self, node: &NodeInfo) -> Result<(), Error>;

    /// Activate the working copy. `Ok(false)` means the gateway refused.
    async fn activate(&self, comment: &str) -> Result<bool, Error>;

    /// End the session on the gateway.
    async fn terminate(&self) -> Result<(), Error>;
}

/// Opens sessions against endpoints.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: GatewaySession;

    async fn open(&self, endpoint: &Endpoint) -> Result<Self::Session, Error>;
}

// ── REST implementation ──────────────────────────────────────────────

/// Connector for real gateways over the configuration REST API.
#[derive(Debug, Clone, Default)]
pub struct RestConnector {
    transport: TransportConfig,
}

impl RestConnector {
    pub fn new(transport: TransportConfig) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl Connector for RestConnector {
    type Session = GatewayClient;

    async fn open(&self, endpoint: &Endpoint) -> Result<GatewayClient, Error> {
        let url = endpoint.rest_url()?;
        debug!(%url, "opening gateway session");
        let client = GatewayClient::with_base_url(url, &endpoint.api_key, &self.transport)?;
        client.create_session().await?;
        Ok(client)
    }
}

#[async_trait]
impl GatewaySession for GatewayClient {
    async fn list_configurations(&self) -> Result<Vec<Configuration>, Error> {
        GatewayClient::list_configurations(self).await
    }

    async fn load_active_configuration(&self) -> Result<(), Error> {
        GatewayClient::load_active_configuration(self).await
    }

    async fn export_configuration(&self, dest: &Path) -> Result<u64, Error> {
        self.export_configuration_file(dest).await
    }

    async fn import_configuration(&self, src: &Path) -> Result<(), Error> {
        self.import_configuration_file(src).await
    }

    async fn current_node(&self) -> Result<NodeInfo, Error> {
        GatewayClient::current_node(self).await
    }

    async fn patch_current_node(&self, node: &NodeInfo) -> Result<(), Error> {
        GatewayClient::patch_current_node(self, node).await
    }

    async fn activate(&self, comment: &str) -> Result<bool, Error> {
        GatewayClient::activate(self, comment).await
    }

    async fn terminate(&self) -> Result<(), Error> {
        self.terminate_session().await
    }
}
