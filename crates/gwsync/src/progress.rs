//! Console status lines for a run.
//!
//! Prints one line per step and forwards every step to `TracingProgress`,
//! so the log file records the same sequence. Status lines go to stdout
//! with table output and to stderr otherwise, keeping stdout parseable.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;

use gwsync_core::{SyncProgress, SyncStep, TracingProgress};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

/// Where status lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStream {
    Stdout,
    Stderr,
}

impl StatusStream {
    /// Stdout only for human-readable table output.
    pub fn for_format(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => Self::Stdout,
            _ => Self::Stderr,
        }
    }

    fn is_terminal(self) -> bool {
        match self {
            Self::Stdout => io::stdout().is_terminal(),
            Self::Stderr => io::stderr().is_terminal(),
        }
    }
}

pub struct ConsoleProgress {
    color: bool,
    quiet: bool,
    stream: StatusStream,
}

impl ConsoleProgress {
    pub fn new(color: bool, quiet: bool, stream: StatusStream) -> Self {
        Self {
            color,
            quiet,
            stream,
        }
    }

    pub fn from_global(global: &GlobalOpts) -> Self {
        let stream = StatusStream::for_format(&global.output);
        let color = match global.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stream.is_terminal() && std::env::var("NO_COLOR").is_err(),
        };
        Self::new(color, global.quiet, stream)
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_owned()
        }
    }

    fn ok(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_owned()
        }
    }

    fn bad(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_owned()
        }
    }

    fn line(&self, step: &SyncStep<'_>) -> String {
        match step {
            SyncStep::ExtractStarted { source } => {
                self.heading(&format!("Download current config from {source}"))
            }
            SyncStep::CommentExtracted { comment } => format!("- comment: {comment}"),
            SyncStep::ArchiveExported { path, size } => {
                format!("- stored as: {} ({size} bytes)", path.display())
            }
            SyncStep::ExtractFailed { error } => self.bad(&error.to_string()),
            SyncStep::SyncStarted { target } => self.heading(&format!("Upload config to {target}")),
            SyncStep::NodeInfoSaved => "- save node info".into(),
            SyncStep::HostnameMasked { hostname } => format!("- overwrite hostname with {hostname}"),
            SyncStep::ArchiveImported => "- upload zip".into(),
            SyncStep::HostnameRestored { hostname } => format!("- restore hostname {hostname}"),
            SyncStep::Activating { comment } => format!("- activate config: {comment}"),
            SyncStep::Activated => self.ok("Config sync completed"),
            SyncStep::ActivationRejected => self.bad("Activation refused, synchronization failed"),
            SyncStep::ActivationDisconnected => {
                self.ok("Connection closed during activation, assuming it succeeded")
            }
            SyncStep::SyncFailed { error } => self.bad(&error.to_string()),
            SyncStep::ArchiveRemoved { path } => format!("Cleaned up {}", path.display()),
        }
    }
}

impl SyncProgress for ConsoleProgress {
    fn step(&self, step: &SyncStep<'_>) {
        TracingProgress.step(step);
        if self.quiet {
            return;
        }
        let line = self.line(step);
        let _ = match self.stream {
            StatusStream::Stdout => writeln!(io::stdout().lock(), "{line}"),
            StatusStream::Stderr => writeln!(io::stderr().lock(), "{line}"),
        };
    }
}
