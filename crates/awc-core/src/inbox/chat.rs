use std::sync::Arc;

use tracing::{debug, info};

use awc_api::{ChatThread, ChatThreadsResponse, PortalClient};

use crate::config::FeedIntervals;
use crate::error::CoreError;
use crate::poll::{Environment, PollConfig, PollState, PollStream, Poller};
use crate::session::Session;

/// Polled unread counters for staff chat.
///
/// Only staff sessions poll (every 15 s by default); for anyone else the
/// feed exists but stays disabled.
pub struct ChatUnreadFeed {
    client: PortalClient,
    staff: bool,
    poller: Poller<ChatThreadsResponse>,
}

impl ChatUnreadFeed {
    /// Start polling. Must be called within a Tokio runtime.
    pub fn start(
        client: PortalClient,
        session: &Session,
        intervals: &FeedIntervals,
        env: &Environment,
    ) -> Self {
        let staff = session.is_authenticated() && session.is_staff();
        debug!(
            enabled = staff,
            interval_secs = intervals.staff_chat.as_secs(),
            "starting chat unread feed"
        );

        let fetch_client = client.clone();
        let fetch = move || {
            let client = fetch_client.clone();
            async move { client.list_chat_threads().await.map_err(CoreError::from) }
        };
        let config = PollConfig::new(intervals.staff_chat)
            .max_interval(intervals.max_backoff)
            .enabled(staff);

        Self {
            client,
            staff,
            poller: Poller::start(fetch, config, env),
        }
    }

    pub fn state(&self) -> PollState<ChatThreadsResponse> {
        self.poller.state()
    }

    pub fn subscribe(&self) -> PollStream<ChatThreadsResponse> {
        self.poller.subscribe()
    }

    pub fn total_unread(&self) -> u32 {
        self.poller.data().map_or(0, |d| d.total_unread)
    }

    pub fn threads(&self) -> Vec<ChatThread> {
        self.poller
            .data()
            .map(|d| d.threads.clone())
            .unwrap_or_default()
    }

    /// Unread count for one channel; 0 if unknown.
    pub fn unread_for(&self, channel_id: &str) -> u32 {
        self.poller.data().map_or(0, |d| {
            d.threads
                .iter()
                .find(|t| t.id == channel_id)
                .map_or(0, |t| t.unread_count)
        })
    }

    pub fn data(&self) -> Option<Arc<ChatThreadsResponse>> {
        self.poller.data()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_polling()
    }

    pub fn refresh(&self) -> bool {
        self.poller.refresh()
    }

    pub async fn mark_channel_read(&self, channel_id: &str) -> Result<(), CoreError> {
        if !self.staff {
            return Err(CoreError::PermissionDenied {
                message: "staff chat requires a staff role".into(),
            });
        }
        self.client.mark_channel_read(channel_id).await?;
        info!(channel_id, "chat channel marked read");
        Ok(())
    }

    pub async fn shutdown(self) {
        self.poller.shutdown().await;
    }
}
