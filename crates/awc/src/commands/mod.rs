//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod access;
pub mod ask;
pub mod chat;
pub mod config_cmd;
pub mod notifications;
pub mod util;
pub mod videos;

use crate::cli::{Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a portal-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Notifications(args) => notifications::handle(ctx, args, global).await,
        Command::Chat(args) => chat::handle(ctx, args, global).await,
        Command::Videos(args) => videos::handle(ctx, args, global).await,
        Command::Ask(args) => ask::handle(ctx, args, global).await,
        // Access, Config and Completions are handled before dispatch
        Command::Access(_) | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
