//! `gwsync export`: extract from the source and keep the archive.

use std::sync::Arc;

use serde::Serialize;

use gwsync_core::{ConfigArchive, RestConnector, SyncOrchestrator};

use crate::cli::{ExportArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::progress::ConsoleProgress;

#[derive(Debug, Serialize)]
struct ExportSummary {
    source: String,
    hostname: String,
    comment: String,
    archive: String,
    size: usize,
}

fn detail(s: &ExportSummary) -> String {
    format!(
        "Source:   {}\nHostname: {}\nComment:  {}\nArchive:  {} ({} bytes)",
        s.source, s.hostname, s.comment, s.archive, s.size
    )
}

pub async fn handle(args: &ExportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (path, file) = config::load(global)?;
    let endpoints = file.endpoints()?;
    let Some(source) = endpoints.first() else {
        return Err(CliError::NoGateways {
            path: path.display().to_string(),
        });
    };

    let archive = ConfigArchive::new(config::archive_path(&file, args.archive.as_deref()));
    let progress = ConsoleProgress::from_global(global);
    let orchestrator =
        SyncOrchestrator::new(RestConnector::new(config::transport(&file, global)?), archive)
            .with_progress(Arc::new(progress));

    let snapshot = orchestrator.extract_only(&endpoints).await?;

    let summary = ExportSummary {
        source: source.to_string(),
        hostname: snapshot.source_hostname().unwrap_or_default().to_owned(),
        comment: snapshot.comment.clone(),
        archive: orchestrator.archive().path().display().to_string(),
        size: snapshot.archive.len(),
    };
    let rendered = output::render_single(&global.output, &summary, detail, |s| s.archive.clone())?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
