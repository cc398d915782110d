mod cli;
mod commands;
mod config;
mod error;
mod output;
mod progress;

use std::fs::File;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::{CliError, exit_code};

/// Log file filter: everything gwsync does, transport crates at info.
const LOG_FILE_FILTER: &str = "info,gwsync=debug,gwsync_core=debug,gwsync_api=debug,gwsync_config=debug";

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Only gateway runs get a log file
    let with_log_file = matches!(cli.command, Command::Run(_) | Command::Export(_));
    let guard = init_tracing(&cli.global, with_log_file);

    let code = match run(cli).await {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    // Flush the log file before exiting.
    drop(guard);
    std::process::exit(code);
}

fn init_tracing(global: &GlobalOpts, with_log_file: bool) -> Option<WorkerGuard> {
    let filter = if global.quiet {
        "error"
    } else {
        match global.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)));

    let (file_layer, guard) = if with_log_file {
        match File::create(&global.log_file) {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(EnvFilter::new(LOG_FILE_FILTER));
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "warning: cannot write log file {}: {e}",
                    global.log_file.display()
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file_layer)
        .init();
    guard
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "gwsync", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &cli.global).await
        }
    }
}
