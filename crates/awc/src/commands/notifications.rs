//! Notification command handlers.

use tabled::Tabled;

use awc_core::{CoreError, Notification, NotificationFeed, NotificationsResponse};

use crate::cli::{GlobalOpts, NotificationsArgs, NotificationsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util::{self, Update, WatchCursor};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    unread: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Received")]
    received: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.clone(),
            unread: if n.read { String::new() } else { "●".into() },
            title: n.title.clone(),
            kind: n.kind.clone().unwrap_or_default(),
            received: n
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.require_signed_in()?;
    match args.command {
        // Writes go straight to the portal.
        NotificationsCommand::Read { ids } => {
            ctx.portal_client()?
                .mark_notifications_read(&ids)
                .await
                .map_err(CoreError::from)?;
            output::print_status(
                &format!("Marked {} notification(s) read", ids.len()),
                global.quiet,
            );
            Ok(())
        }

        NotificationsCommand::ReadAll => {
            ctx.portal_client()?
                .mark_all_notifications_read()
                .await
                .map_err(CoreError::from)?;
            output::print_status("Marked all notifications read", global.quiet);
            Ok(())
        }

        NotificationsCommand::List { unread } => {
            let feed = ctx.notification_feed()?;
            let result = list(&feed, unread, global).await;
            feed.shutdown().await;
            result
        }

        NotificationsCommand::Watch => {
            let feed = ctx.notification_feed()?;
            watch(&feed, global).await;
            feed.shutdown().await;
            Ok(())
        }
    }
}

async fn list(feed: &NotificationFeed, unread: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let data = util::first_result(feed.subscribe()).await?;
    let shown: Vec<Notification> = data
        .notifications
        .iter()
        .filter(|n| !unread || !n.read)
        .cloned()
        .collect();
    let out = output::render_list(
        &global.output,
        &shown,
        |n| NotificationRow::from(n),
        |n| n.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    output::print_status(&format!("{} unread", data.unread_count), global.quiet);
    Ok(())
}

async fn watch(feed: &NotificationFeed, global: &GlobalOpts) {
    let mut stream = feed.subscribe();
    let mut cursor = WatchCursor::default();
    let mut last_count = None;
    report(cursor.advance(stream.current()), &mut last_count, global.quiet);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = stream.changed() => {
                let Some(state) = next else { break };
                report(cursor.advance(&state), &mut last_count, global.quiet);
            }
        }
    }
}

/// Print count changes and failures; identical counts stay quiet.
fn report(
    update: Option<Update<NotificationsResponse>>,
    last_count: &mut Option<u32>,
    quiet: bool,
) {
    match update {
        Some(Update::Data(data)) if *last_count != Some(data.unread_count) => {
            *last_count = Some(data.unread_count);
            output::print_output(
                &format!("{}  {} unread", util::timestamp(), data.unread_count),
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
