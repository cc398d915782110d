//! Command dispatch: bridges CLI args -> core runs -> output formatting.

pub mod export;
pub mod gateways;
pub mod run;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Run(args) => run::handle(&args, global).await,
        Command::Export(args) => export::handle(&args, global).await,
        Command::Gateways(args) => gateways::handle(&args, global),
        // Completions are handled before dispatch
        Command::Completions(_) => Err(CliError::Internal(
            "completions are generated before dispatch".into(),
        )),
    }
}
