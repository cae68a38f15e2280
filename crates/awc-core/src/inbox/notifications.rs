use std::sync::Arc;

use tracing::{debug, info};

use awc_api::{Notification, NotificationsResponse, PortalClient};

use crate::config::FeedIntervals;
use crate::error::CoreError;
use crate::poll::{Environment, PollConfig, PollState, PollStream, Poller};
use crate::session::Session;

/// Polled view of the signed-in user's notifications.
///
/// Staff poll every 20 s, everyone else every 45 s (see [`FeedIntervals`]).
/// Anonymous sessions get a disabled feed that never fetches.
///
/// The mark-read calls only acknowledge the write; counts change when the
/// next poll lands.
pub struct NotificationFeed {
    client: PortalClient,
    authenticated: bool,
    poller: Poller<NotificationsResponse>,
}

impl NotificationFeed {
    /// Start polling. Must be called within a Tokio runtime.
    pub fn start(
        client: PortalClient,
        session: &Session,
        intervals: &FeedIntervals,
        env: &Environment,
    ) -> Self {
        let authenticated = session.is_authenticated();
        let base = if session.is_staff() {
            intervals.staff_notifications
        } else {
            intervals.member_notifications
        };
        debug!(
            authenticated,
            interval_secs = base.as_secs(),
            "starting notification feed"
        );

        let fetch_client = client.clone();
        let fetch = move || {
            let client = fetch_client.clone();
            async move { client.list_notifications().await.map_err(CoreError::from) }
        };
        let config = PollConfig::new(base)
            .max_interval(intervals.max_backoff)
            .enabled(authenticated);

        Self {
            client,
            authenticated,
            poller: Poller::start(fetch, config, env),
        }
    }

    pub fn state(&self) -> PollState<NotificationsResponse> {
        self.poller.state()
    }

    pub fn subscribe(&self) -> PollStream<NotificationsResponse> {
        self.poller.subscribe()
    }

    /// Unread count from the last successful poll (0 before the first).
    pub fn unread_count(&self) -> u32 {
        self.poller.data().map_or(0, |d| d.unread_count)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.poller
            .data()
            .map(|d| d.notifications.clone())
            .unwrap_or_default()
    }

    pub fn data(&self) -> Option<Arc<NotificationsResponse>> {
        self.poller.data()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_polling()
    }

    /// Ask for an immediate poll; `false` if one is already running.
    pub fn refresh(&self) -> bool {
        self.poller.refresh()
    }

    /// Mark specific notifications read. An empty list sends nothing.
    pub async fn mark_as_read(&self, ids: &[String]) -> Result<(), CoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.require_session()?;
        self.client.mark_notifications_read(ids).await?;
        info!(count = ids.len(), "notifications marked read");
        Ok(())
    }

    pub async fn mark_all_as_read(&self) -> Result<(), CoreError> {
        self.require_session()?;
        self.client.mark_all_notifications_read().await?;
        info!("all notifications marked read");
        Ok(())
    }

    pub async fn shutdown(self) {
        self.poller.shutdown().await;
    }

    fn require_session(&self) -> Result<(), CoreError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(CoreError::Unauthenticated)
        }
    }
}
