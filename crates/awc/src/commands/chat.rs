//! Staff chat command handlers.

use tabled::Tabled;

use awc_core::{ChatThread, ChatThreadsResponse, ChatUnreadFeed, CoreError};

use crate::cli::{ChatArgs, ChatCommand, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util::{self, Update, WatchCursor};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ThreadRow {
    #[tabled(rename = "Channel")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Unread")]
    unread: u32,
    #[tabled(rename = "Last message")]
    last: String,
}

impl From<&ChatThread> for ThreadRow {
    fn from(t: &ChatThread) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            unread: t.unread_count,
            last: t
                .last_message_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: ChatArgs, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require_signed_in()?;
    if !ctx.session.is_staff() {
        return Err(CliError::PermissionDenied {
            message: "staff chat requires a staff role".into(),
        });
    }
    match args.command {
        ChatCommand::Read { channel } => {
            ctx.portal_client()?
                .mark_channel_read(&channel)
                .await
                .map_err(CoreError::from)?;
            output::print_status(&format!("Marked #{channel} read"), global.quiet);
            Ok(())
        }

        ChatCommand::Threads => {
            let feed = ctx.chat_feed()?;
            let result = threads(&feed, global).await;
            feed.shutdown().await;
            result
        }

        ChatCommand::Watch => {
            let feed = ctx.chat_feed()?;
            watch(&feed, global).await;
            feed.shutdown().await;
            Ok(())
        }
    }
}

async fn threads(feed: &ChatUnreadFeed, global: &GlobalOpts) -> Result<(), CliError> {
    let data = util::first_result(feed.subscribe()).await?;
    let out = output::render_list(
        &global.output,
        &data.threads,
        |t| ThreadRow::from(t),
        |t| t.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    output::print_status(&format!("{} unread", data.total_unread), global.quiet);
    Ok(())
}

async fn watch(feed: &ChatUnreadFeed, global: &GlobalOpts) {
    let mut stream = feed.subscribe();
    let mut cursor = WatchCursor::default();
    let mut last_total = None;
    report(cursor.advance(stream.current()), &mut last_total, global.quiet);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = stream.changed() => {
                let Some(state) = next else { break };
                report(cursor.advance(&state), &mut last_total, global.quiet);
            }
        }
    }
}

fn report(
    update: Option<Update<ChatThreadsResponse>>,
    last_total: &mut Option<u32>,
    quiet: bool,
) {
    match update {
        Some(Update::Data(data)) if *last_total != Some(data.total_unread) => {
            *last_total = Some(data.total_unread);
            let busiest = data
                .threads
                .iter()
                .filter(|t| t.unread_count > 0)
                .map(|t| format!("{} {}", t.name, t.unread_count))
                .collect::<Vec<_>>()
                .join(", ");
            output::print_output(
                &format!("{}  {} unread  {busiest}", util::timestamp(), data.total_unread),
                quiet,
            );
        }
        Some(Update::Failed {
            errors,
            retry_in_secs,
            message,
        }) => eprintln!(
            "{}  poll failed ({errors} in a row, retrying in {retry_in_secs}s): {message}",
            util::timestamp()
        ),
        _ => {}
    }
}
