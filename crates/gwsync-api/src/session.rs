// Session lifecycle
//
// `session/create` trades the bearer token for a session cookie scoped to
// one management login; `session/terminate` releases it on the gateway.

use reqwest::StatusCode;
use tracing::debug;

use crate::client::GatewayClient;
use crate::error::Error;

impl GatewayClient {
    /// Open an authenticated session.
    ///
    /// `POST /session/create`
    pub async fn create_session(&self) -> Result<(), Error> {
        debug!(url = %self.base_url(), "creating session");
        self.post_empty("session/create", &[StatusCode::OK])
            .await?;
        debug!("session created");
        Ok(())
    }

    /// End the current session.
    ///
    /// `POST /session/terminate`
    pub async fn terminate_session(&self) -> Result<(), Error> {
        debug!(url = %self.base_url(), "terminating session");
        self.post_empty("session/terminate", &[StatusCode::OK, StatusCode::NO_CONTENT])
            .await?;
        debug!("session terminated");
        Ok(())
    }
}
