//! Command dispatch: bridges CLI args -> config / core -> output formatting.

pub mod entries;
pub mod items;
pub mod setup;
pub mod util;
pub mod watch;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Setup(args) => setup::handle(args, global).await,
        Command::Entries(args) => entries::handle(args, global),
        Command::Items(args) => items::handle(args, global).await,
        Command::Watch(args) => watch::handle(args, global).await,
        // Completions are handled before dispatch
        Command::Completions(_) => Ok(()),
    }
}
