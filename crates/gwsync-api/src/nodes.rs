// Node endpoints
//
// The current node's settings, including the `hostName` the gateway checks
// imported archives against.

use reqwest::StatusCode;
use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;
use crate::models::NodeInfo;

const CURRENT_NODE: &str = "configuration/nodes/current";

impl GatewayClient {
    /// Read the current node's full settings document.
    ///
    /// `GET /configuration/nodes/current`
    pub async fn current_node(&self) -> Result<NodeInfo, Error> {
        debug!("fetching current node");
        Ok(NodeInfo::from_value(self.get_json(CURRENT_NODE).await?))
    }

    /// Write the current node's settings document back.
    ///
    /// `PATCH /configuration/nodes/current`
    pub async fn patch_current_node(&self, node: &NodeInfo) -> Result<(), Error> {
        let url = self.url(CURRENT_NODE)?;
        debug!(hostname = node.hostname().unwrap_or_default(), "PATCH {url}");
        self.send(
            CURRENT_NODE,
            self.http().patch(url).json(node.as_value()),
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        )
        .await?;
        Ok(())
    }
}
