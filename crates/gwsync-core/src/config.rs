// ── Runtime endpoint configuration ──
//
// These types describe *which* gateways to talk to and with what key.
// They carry credential data but never touch disk: gwsync-config builds
// them from the gateway file and hands them in.

use std::fmt;

use secrecy::SecretString;
use url::Url;

/// Default port of the management interface.
pub const DEFAULT_PORT: u16 = 443;

/// One gateway management endpoint.
///
/// In an ordered endpoint list, index 0 is the source and every later
/// entry is a target. Nothing enforces uniqueness.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// IP address or hostname of the management interface. A full origin
    /// URL (`https://gw.example:8443`) is accepted as well.
    pub address: String,
    /// Management port, ignored when `address` is a URL.
    pub port: u16,
    /// REST API key.
    pub api_key: SecretString,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            address: address.into(),
            port: DEFAULT_PORT,
            api_key,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// REST root URL of this endpoint.
    pub fn rest_url(&self) -> Result<Url, gwsync_api::Error> {
        if self.address.contains("://") {
            let origin = Url::parse(&self.address)?;
            return gwsync_api::GatewayClient::rest_url(&origin);
        }
        gwsync_api::GatewayClient::management_url(&self.address, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == DEFAULT_PORT || self.address.contains("://") {
            f.write_str(&self.address)
        } else {
            write!(f, "{}:{}", self.address, self.port)
        }
    }
}
