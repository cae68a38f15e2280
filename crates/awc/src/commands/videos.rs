//! Video channel command handlers.

use tabled::Tabled;

use awc_core::Video;

use crate::cli::{GlobalOpts, VideosArgs, VideosCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VideoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Views")]
    views: String,
}

impl From<&Video> for VideoRow {
    fn from(v: &Video) -> Self {
        Self {
            id: v.id.clone(),
            title: v.title.clone(),
            when: v
                .scheduled_start
                .or(v.published_at)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            views: v.view_count.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: VideosArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let videos = ctx.video_service()?;
    if !videos.is_enabled() {
        output::print_status(
            "Video channel not configured; set [video] channel_id and api_key",
            global.quiet,
        );
    }

    let out = match args.command {
        VideosCommand::Live => {
            let status = videos.live_status().await;
            output::render_single(
                &global.output,
                &status,
                |s| match (&s.title, &s.url) {
                    (Some(title), Some(url)) if s.is_live => format!("LIVE  {title}\n{url}"),
                    _ if s.is_live => "LIVE".into(),
                    _ => "Not live".into(),
                },
                |s| s.is_live.to_string(),
            )?
        }

        VideosCommand::Recent { limit } => {
            let list = videos.recent_videos(limit).await;
            output::render_list(&global.output, &list, |v| VideoRow::from(v), |v| v.url.clone())?
        }

        VideosCommand::Upcoming => {
            let list = videos.upcoming_streams().await;
            output::render_list(&global.output, &list, |v| VideoRow::from(v), |v| v.url.clone())?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
