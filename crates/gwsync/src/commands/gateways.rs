//! `gwsync gateways`: show the gateway file's gateways and their roles.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{GatewaysArgs, GatewaysCommand, GlobalOpts};
use crate::config::{self, GatewayRecord};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "****";

#[derive(Debug, Serialize)]
struct GatewayView {
    #[serde(skip)]
    index: usize,
    role: &'static str,
    ip: String,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key_env: Option<String>,
}

#[derive(Tabled)]
struct GatewayRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Role")]
    role: &'static str,
    #[tabled(rename = "Address")]
    ip: String,
    #[tabled(rename = "Port")]
    port: u16,
    #[tabled(rename = "API Key")]
    key: String,
}

impl GatewayView {
    fn new(index: usize, record: &GatewayRecord) -> Self {
        Self {
            index,
            role: if index == 0 { "source" } else { "target" },
            ip: record.ip.clone(),
            port: record.port,
            api_key: record.api_key.as_ref().map(|_| REDACTED),
            api_key_env: record.api_key_env.clone(),
        }
    }

    /// Where the key comes from, without revealing it.
    fn key_source(&self) -> String {
        match (&self.api_key_env, self.api_key) {
            (Some(var), Some(_)) => format!("${var} or {REDACTED}"),
            (Some(var), None) => format!("${var}"),
            (None, Some(_)) => REDACTED.into(),
            (None, None) => "(missing)".into(),
        }
    }
}

pub fn handle(args: &GatewaysArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command.as_ref().unwrap_or(&GatewaysCommand::List) {
        GatewaysCommand::List => list(global),
    }
}

fn list(global: &GlobalOpts) -> Result<(), CliError> {
    let (_, file) = config::load(global)?;
    let views: Vec<GatewayView> = file
        .gateways
        .iter()
        .enumerate()
        .map(|(i, g)| GatewayView::new(i, g))
        .collect();

    let rendered = output::render_list(
        &global.output,
        &views,
        |v| GatewayRow {
            index: v.index + 1,
            role: v.role,
            ip: v.ip.clone(),
            port: v.port,
            key: v.key_source(),
        },
        |v| format!("{}\t{}", v.role, v.ip),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(api_key: Option<&str>, api_key_env: Option<&str>) -> GatewayRecord {
        GatewayRecord {
            ip: "10.0.0.10".into(),
            api_key: api_key.map(Into::into),
            api_key_env: api_key_env.map(Into::into),
            port: 443,
        }
    }

    #[test]
    fn first_gateway_is_source() {
        assert_eq!(GatewayView::new(0, &record(Some("k"), None)).role, "source");
        assert_eq!(GatewayView::new(2, &record(Some("k"), None)).role, "target");
    }

    #[test]
    fn key_is_never_shown() {
        let view = GatewayView::new(0, &record(Some("secret-key"), Some("GW_A_KEY")));
        assert_eq!(view.key_source(), "$GW_A_KEY or ****");
        assert_eq!(view.api_key, Some(REDACTED));
        assert_eq!(GatewayView::new(1, &record(None, None)).key_source(), "(missing)");
    }
}
