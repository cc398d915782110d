//! `gwsync run`: extract from the source, sync every target.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use gwsync_core::{
    ConfigArchive, RestConnector, RunOutcome, RunReport, SyncOrchestrator, TargetOutcome,
};

use crate::cli::{GlobalOpts, RunArgs};
use crate::config;
use crate::error::CliError;
use crate::output;
use crate::progress::ConsoleProgress;

// ── Summary ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct RunSummary {
    source: String,
    comment: Option<String>,
    outcome: &'static str,
    targets: Vec<TargetSummary>,
}

#[derive(Debug, Serialize, Tabled)]
struct TargetSummary {
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Result")]
    result: &'static str,
    #[tabled(rename = "Error")]
    #[serde(skip_serializing_if = "String::is_empty")]
    error: String,
}

fn outcome_label(outcome: &TargetOutcome) -> &'static str {
    match outcome {
        TargetOutcome::Activated => "activated",
        TargetOutcome::AssumedActivated => "assumed activated",
        TargetOutcome::ActivationRejected => "activation refused",
        TargetOutcome::Failed(_) => "failed",
    }
}

fn summarize(source: String, report: &RunReport) -> RunSummary {
    let outcome = match report.outcome {
        RunOutcome::Completed => "completed",
        RunOutcome::ExtractionFailed(_) => "extraction failed",
        RunOutcome::Aborted { .. } => "aborted",
    };
    RunSummary {
        source,
        comment: report.snapshot.as_ref().map(|s| s.comment.clone()),
        outcome,
        targets: report
            .targets
            .iter()
            .map(|t| TargetSummary {
                target: t.target.clone(),
                result: outcome_label(&t.outcome),
                error: t
                    .outcome
                    .error()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            })
            .collect(),
    }
}

fn detail(summary: &RunSummary) -> String {
    let mut out = format!("Source: {} ({})", summary.source, summary.outcome);
    if !summary.targets.is_empty() {
        out.push('\n');
        out.push_str(&output::render_table(&summary.targets));
    }
    out
}

fn plain(summary: &RunSummary) -> String {
    summary
        .targets
        .iter()
        .map(|t| format!("{}\t{}", t.target, t.result))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
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

    let report = orchestrator.run(&endpoints).await?;

    let summary = summarize(source.to_string(), &report);
    let rendered = output::render_single(&global.output, &summary, detail, plain)?;
    output::print_output(&rendered, global.quiet);

    match &report.outcome {
        RunOutcome::Completed => Ok(()),
        // Nothing was changed on any gateway; the run is a no-op.
        RunOutcome::ExtractionFailed(error) => {
            tracing::warn!(error = %error, "no gateway synchronized");
            Ok(())
        }
        RunOutcome::Aborted { target } => Err(CliError::SyncAborted {
            target: target.clone(),
            reason: report
                .failure()
                .map_or_else(String::new, |e| e.root_cause().to_string()),
        }),
    }
}
