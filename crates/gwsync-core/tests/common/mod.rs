// Scripted in-memory gateways for driving the sync flow without HTTP.
#![allow(clippy::unwrap_used, dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Value, json};

use gwsync_api::{Configuration, Error, NodeInfo};
use gwsync_core::{Connector, Endpoint, GatewaySession, SyncProgress, SyncStep};

// ── Gateway state ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Open,
    ListConfigs,
    LoadActive,
    Export,
    Import,
    NodeInfo,
    Patch,
    Activate,
    Terminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Disconnect,
    Api,
}

#[derive(Debug, Clone)]
pub struct FakeGateway {
    pub hostname: String,
    pub comment: Option<String>,
    pub archive: Vec<u8>,
    pub activation_result: bool,
    pub fault: Option<(Op, Fault)>,
    pub fault_once: bool,
    pub node: Option<Value>,

    pub hostname_at_import: Option<String>,
    pub imported: Option<Vec<u8>>,
    pub activated: Option<(String, String)>,
    pub sessions_opened: u32,
    pub sessions_terminated: u32,
}

impl FakeGateway {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.into(),
            comment: None,
            archive: format!("PK-{hostname}").into_bytes(),
            activation_result: true,
            fault: None,
            fault_once: false,
            node: None,
            hostname_at_import: None,
            imported: None,
            activated: None,
            sessions_opened: 0,
            sessions_terminated: 0,
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn failing(mut self, op: Op, fault: Fault) -> Self {
        self.fault = Some((op, fault));
        self
    }

    /// Like [`failing`](Self::failing), but only the first matching call fails.
    pub fn failing_once(mut self, op: Op, fault: Fault) -> Self {
        self.fault = Some((op, fault));
        self.fault_once = true;
        self
    }

    /// Serve `node` from `current_node` instead of the generated document.
    pub fn with_node(mut self, node: Value) -> Self {
        self.node = Some(node);
        self
    }

    pub fn refusing_activation(mut self) -> Self {
        self.activation_result = false;
        self
    }
}

#[derive(Default)]
struct FleetState {
    gateways: HashMap<String, FakeGateway>,
    calls: Vec<String>,
}

/// A set of fake gateways keyed by address; also the `Connector`.
#[derive(Clone, Default)]
pub struct FakeFleet {
    state: Arc<Mutex<FleetState>>,
}

impl FakeFleet {
    pub fn with(self, address: &str, gateway: FakeGateway) -> Self {
        self.state
            .lock()
            .unwrap()
            .gateways
            .insert(address.into(), gateway);
        self
    }

    pub fn gateway(&self, address: &str) -> FakeGateway {
        self.state.lock().unwrap().gateways[address].clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn opened(&self, address: &str) -> bool {
        self.calls().contains(&format!("{address} open"))
    }

    /// Record a call and return the scripted fault for it, if any.
    fn call(&self, address: &str, op: Op) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("{address} {}", op_name(op)));
        let gateway = state.gateways.get_mut(address).unwrap();
        let fault = gateway.fault;
        if gateway.fault_once && matches!(fault, Some((failing, _)) if failing == op) {
            gateway.fault = None;
        }
        match fault {
            Some((failing, Fault::Disconnect)) if failing == op => Err(Error::Disconnected {
                url: format!("https://{address}/airlock/rest/"),
                message: "connection closed before message completed".into(),
            }),
            Some((failing, Fault::Api)) if failing == op => Err(Error::Api {
                status: 500,
                path: op_name(op).into(),
                message: "scripted failure".into(),
            }),
            _ => Ok(()),
        }
    }

    fn update<R>(&self, address: &str, f: impl FnOnce(&mut FakeGateway) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(state.gateways.get_mut(address).unwrap())
    }
}

fn op_name(op: Op) -> &'static str {
    match op {
        Op::Open => "open",
        Op::ListConfigs => "list-configs",
        Op::LoadActive => "load-active",
        Op::Export => "export",
        Op::Import => "import",
        Op::NodeInfo => "node-info",
        Op::Patch => "patch",
        Op::Activate => "activate",
        Op::Terminate => "terminate",
    }
}

// ── Connector / session ─────────────────────────────────────────────

pub struct FakeSession {
    address: String,
    fleet: FakeFleet,
}

#[async_trait]
impl Connector for FakeFleet {
    type Session = FakeSession;

    async fn open(&self, endpoint: &Endpoint) -> Result<FakeSession, Error> {
        self.call(&endpoint.address, Op::Open)?;
        self.update(&endpoint.address, |gw| gw.sessions_opened += 1);
        Ok(FakeSession {
            address: endpoint.address.clone(),
            fleet: self.clone(),
        })
    }
}

#[async_trait]
impl GatewaySession for FakeSession {
    async fn list_configurations(&self) -> Result<Vec<Configuration>, Error> {
        self.fleet.call(&self.address, Op::ListConfigs)?;
        let comment = self.fleet.gateway(&self.address).comment;
        let mut active = json!({ "configType": "CURRENTLY_ACTIVE" });
        if let Some(comment) = comment {
            active["comment"] = json!(comment);
        }
        Ok(serde_json::from_value(json!([
            { "id": "1", "attributes": { "configType": "PREVIOUSLY_ACTIVE", "comment": "old" } },
            { "id": "2", "attributes": active }
        ]))
        .unwrap())
    }

    async fn load_active_configuration(&self) -> Result<(), Error> {
        self.fleet.call(&self.address, Op::LoadActive)
    }

    async fn export_configuration(&self, dest: &Path) -> Result<u64, Error> {
        self.fleet.call(&self.address, Op::Export)?;
        let archive = self.fleet.gateway(&self.address).archive;
        std::fs::write(dest, &archive).unwrap();
        Ok(archive.len() as u64)
    }

    async fn import_configuration(&self, src: &Path) -> Result<(), Error> {
        self.fleet.call(&self.address, Op::Import)?;
        let archive = std::fs::read(src).map_err(|source| Error::Archive {
            path: src.to_path_buf(),
            source,
        })?;
        self.fleet.update(&self.address, |gw| {
            gw.hostname_at_import = Some(gw.hostname.clone());
            gw.imported = Some(archive);
        });
        Ok(())
    }

    async fn current_node(&self) -> Result<NodeInfo, Error> {
        self.fleet.call(&self.address, Op::NodeInfo)?;
        let gateway = self.fleet.gateway(&self.address);
        if let Some(node) = gateway.node {
            return Ok(NodeInfo::from_value(node));
        }
        let hostname = gateway.hostname;
        Ok(NodeInfo::from_value(json!({
            "data": {
                "type": "node",
                "id": "1",
                "attributes": { "hostName": hostname, "managementInterface": "eth0" }
            }
        })))
    }

    async fn patch_current_node(&self, node: &NodeInfo) -> Result<(), Error> {
        self.fleet.call(&self.address, Op::Patch)?;
        let hostname = node.hostname().unwrap().to_owned();
        self.fleet.update(&self.address, |gw| gw.hostname = hostname);
        Ok(())
    }

    async fn activate(&self, comment: &str) -> Result<bool, Error> {
        self.fleet.call(&self.address, Op::Activate)?;
        Ok(self.fleet.update(&self.address, |gw| {
            if gw.activation_result {
                gw.activated = Some((comment.to_owned(), gw.hostname.clone()));
            }
            gw.activation_result
        }))
    }

    async fn terminate(&self) -> Result<(), Error> {
        self.fleet.call(&self.address, Op::Terminate)?;
        self.fleet.update(&self.address, |gw| gw.sessions_terminated += 1);
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

pub fn endpoint(address: &str) -> Endpoint {
    Endpoint::new(address, SecretString::from(format!("key{address}")))
}

/// Records step names in order.
#[derive(Default)]
pub struct RecordingProgress {
    steps: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn steps(&self) -> Vec<String> {
        self.steps.lock().unwrap().clone()
    }
}

impl SyncProgress for RecordingProgress {
    fn step(&self, step: &SyncStep<'_>) {
        let name = match step {
            SyncStep::ExtractStarted { source } => format!("extract {}", source.address),
            SyncStep::CommentExtracted { comment } => format!("comment {comment}"),
            SyncStep::ArchiveExported { .. } => "exported".into(),
            SyncStep::ExtractFailed { .. } => "extract-failed".into(),
            SyncStep::SyncStarted { target } => format!("sync {}", target.address),
            SyncStep::NodeInfoSaved => "node-saved".into(),
            SyncStep::HostnameMasked { hostname } => format!("masked {hostname}"),
            SyncStep::ArchiveImported => "imported".into(),
            SyncStep::HostnameRestored { hostname } => format!("restored {hostname}"),
            SyncStep::Activating { comment } => format!("activating {comment}"),
            SyncStep::Activated => "activated".into(),
            SyncStep::ActivationRejected => "rejected".into(),
            SyncStep::ActivationDisconnected => "disconnected".into(),
            SyncStep::SyncFailed { .. } => "sync-failed".into(),
            SyncStep::ArchiveRemoved { .. } => "cleaned".into(),
        };
        self.steps.lock().unwrap().push(name);
    }
}
