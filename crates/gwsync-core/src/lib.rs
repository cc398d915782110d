//! Configuration sync between Airlock Gateways.
//!
//! One gateway (the source) has its active configuration exported; every
//! other gateway (the targets) imports it while keeping its own hostname.
//!
//! - **[`SyncOrchestrator`]**: Drives a run over an ordered endpoint list:
//!   extract once from the first endpoint, then sync the rest in order,
//!   stopping at the first failed target.
//!
//! - **[`SourceExtractor`]**: Reads the active configuration's comment and
//!   the source node identity, and exports the configuration into the run's
//!   [`ConfigArchive`].
//!
//! - **[`TargetSynchronizer`]**: Imports the archive into one target with
//!   its hostname temporarily set to the source's, restores it, activates,
//!   and always removes the archive afterwards.
//!
//! - **[`Connector`] / [`GatewaySession`]**: The session seam both of the
//!   above drive. [`RestConnector`] talks to real gateways through
//!   `gwsync-api`.
//!
//! - **[`SyncProgress`]**: Observer receiving every step of a run.

pub mod archive;
pub mod config;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod progress;
pub mod session;
pub mod snapshot;
pub mod target;

// ── Primary re-exports ──────────────────────────────────────────────
pub use archive::{ConfigArchive, DEFAULT_ARCHIVE};
pub use config::{DEFAULT_PORT, Endpoint};
pub use error::CoreError;
pub use extract::SourceExtractor;
pub use orchestrator::{RunOutcome, RunReport, SyncOrchestrator, TargetReport};
pub use progress::{SyncProgress, SyncStep, TracingProgress};
pub use session::{Connector, GatewaySession, RestConnector};
pub use snapshot::ConfigSnapshot;
pub use target::{TargetOutcome, TargetSynchronizer};

// Client-layer types that appear in the public API.
pub use gwsync_api::{NodeInfo, TlsMode, TransportConfig};
