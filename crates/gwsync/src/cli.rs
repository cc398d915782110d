//! Clap derive structures for the `gwsync` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gwsync -- push one Airlock Gateway's configuration to the others
#[derive(Debug, Parser)]
#[command(
    name = "gwsync",
    version,
    about = "Synchronize configuration between Airlock Gateways",
    long_about = "Exports the active configuration of the first gateway in the gateway file\n\
        and imports it into every other gateway, keeping each target's own\n\
        hostname, then activates it.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Gateway file (default: ./gateways.yaml, then the user config dir)
    #[arg(long, short = 'g', env = "GWSYNC_GATEWAYS", global = true)]
    pub gateways: Option<PathBuf>,

    /// Per-run log file, truncated on every run
    #[arg(
        long,
        env = "GWSYNC_LOG_FILE",
        default_value = "last_run.log",
        global = true
    )]
    pub log_file: PathBuf,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GWSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates (overrides the gateway file)
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides the gateway file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sync every target gateway from the source gateway
    Run(RunArgs),

    /// Export the source gateway's active configuration only
    Export(ExportArgs),

    /// Show the configured gateways
    #[command(alias = "gw")]
    Gateways(GatewaysArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Per-command arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Local path of the transient configuration archive
    #[arg(long, short = 'a')]
    pub archive: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Where to keep the exported archive
    #[arg(long, short = 'a')]
    pub archive: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GatewaysArgs {
    #[command(subcommand)]
    pub command: Option<GatewaysCommand>,
}

#[derive(Debug, Subcommand)]
pub enum GatewaysCommand {
    /// List gateways with their role (default)
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
