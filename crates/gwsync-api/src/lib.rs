// gwsync-api: Async Rust client for the Airlock Gateway configuration REST API

pub mod client;
pub mod configuration;
pub mod error;
pub mod models;
pub mod nodes;
pub mod session;
pub mod transport;

pub use client::GatewayClient;
pub use error::Error;
pub use models::{ConfigType, Configuration, ConfigurationAttributes, NodeInfo};
pub use transport::{TlsMode, TransportConfig};
