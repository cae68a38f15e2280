use std::sync::Arc;

use tracing::{debug, warn};

use awc_api::{LiveStatus, Video, VideoClient};

use super::VideoCache;
use crate::config::VideoConfig;
use crate::error::CoreError;

const LIVE_KEY: &str = "live";

/// Cached, failure-tolerant front for the video platform.
///
/// Every query returns a usable answer: on error the failure is logged and
/// a safe default (`not live`, empty list) comes back instead. Without an
/// API key or channel id the service is disabled and only returns defaults.
#[derive(Debug, Clone)]
pub struct VideoService {
    client: Option<VideoClient>,
    cache: Arc<VideoCache>,
    upcoming_limit: u32,
}

impl VideoService {
    pub fn new(client: Option<VideoClient>, cache: Arc<VideoCache>) -> Self {
        Self {
            client,
            cache,
            upcoming_limit: 10,
        }
    }

    /// Build the client and a fresh cache from `config`.
    pub fn from_config(config: &VideoConfig) -> Result<Self, CoreError> {
        let cache = Arc::new(VideoCache::new(config.live_ttl, config.list_ttl));
        Ok(Self::new(config.client()?, cache).with_upcoming_limit(config.max_results))
    }

    pub fn with_upcoming_limit(mut self, limit: u32) -> Self {
        self.upcoming_limit = limit;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub fn cache(&self) -> &Arc<VideoCache> {
        &self.cache
    }

    /// Whether the channel is broadcasting now.
    pub async fn live_status(&self) -> LiveStatus {
        let Some(client) = &self.client else {
            debug!("video service not configured; reporting offline");
            return LiveStatus::offline();
        };
        if let Some(hit) = self.cache.live.get(LIVE_KEY) {
            debug!("live status cache hit");
            return hit;
        }
        match client.live_status().await {
            Ok(status) => {
                self.cache.live.insert(LIVE_KEY, status.clone());
                status
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch live status");
                LiveStatus::offline()
            }
        }
    }

    /// Most recent uploads, newest first.
    pub async fn recent_videos(&self, limit: u32) -> Vec<Video> {
        self.cached_list(ListQuery::Recent(limit)).await
    }

    /// Scheduled broadcasts, soonest first.
    pub async fn upcoming_streams(&self) -> Vec<Video> {
        self.cached_list(ListQuery::Upcoming(self.upcoming_limit))
            .await
    }

    pub fn clear_cache(&self) {
        debug!("clearing video cache");
        self.cache.clear();
    }

    async fn cached_list(&self, query: ListQuery) -> Vec<Video> {
        let key = query.cache_key();
        let Some(client) = &self.client else {
            debug!(%key, "video service not configured; returning empty list");
            return Vec::new();
        };
        if let Some(hit) = self.cache.lists.get(&key) {
            debug!(%key, "video list cache hit");
            return hit.as_ref().clone();
        }
        let result = match query {
            ListQuery::Recent(limit) => client.recent_videos(limit).await,
            ListQuery::Upcoming(limit) => client.upcoming_streams(limit).await,
        };
        match result {
            Ok(videos) => {
                self.cache.lists.insert(key, Arc::new(videos.clone()));
                videos
            }
            Err(e) => {
                warn!(error = %e, %key, "failed to fetch videos");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ListQuery {
    Recent(u32),
    Upcoming(u32),
}

impl ListQuery {
    fn cache_key(self) -> String {
        match self {
            Self::Recent(limit) => format!("recent:{limit}"),
            Self::Upcoming(limit) => format!("upcoming:{limit}"),
        }
    }
}
