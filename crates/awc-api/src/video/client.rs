// Async client for the video platform's Data API.
//
// Base path: https://www.googleapis.com/youtube/v3/
// Auth: `key` query parameter. Request URLs are never logged with their
// query string, and transport errors are stripped of their URL, so the key
// stays out of the logs.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::{LiveStatus, SearchResponse, Video, VideoListResponse};
use crate::error::Error;
use crate::http::{handle_response, join_segments};
use crate::transport::TransportConfig;

/// Default Data API root.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Upper bound the platform accepts for `maxResults`.
const MAX_RESULTS_LIMIT: u32 = 50;

/// Which broadcasts a channel search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Live,
    Upcoming,
    Completed,
}

impl EventType {
    fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
        }
    }
}

/// Async client scoped to a single channel.
#[derive(Debug, Clone)]
pub struct VideoClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
    channel_id: String,
}

impl VideoClient {
    pub fn new(
        base_url: &str,
        api_key: SecretString,
        channel_id: impl Into<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            api_key,
            channel_id: channel_id.into(),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        api_key: SecretString,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
            channel_id: channel_id.into(),
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = join_segments(&self.base_url, &[resource])?;
        debug!(path = url.path(), "GET");

        let resp = self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.expose_secret())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        handle_response(resp).await.map_err(without_url)
    }

    // ━━ Raw endpoints ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `search` scoped to the channel, optionally filtered by broadcast type.
    pub async fn search(
        &self,
        event_type: Option<EventType>,
        max_results: u32,
    ) -> Result<SearchResponse, Error> {
        let mut params = vec![
            ("part", "snippet".to_owned()),
            ("channelId", self.channel_id.clone()),
            ("type", "video".to_owned()),
            ("order", "date".to_owned()),
            ("maxResults", max_results.clamp(1, MAX_RESULTS_LIMIT).to_string()),
        ];
        if let Some(event_type) = event_type {
            params.push(("eventType", event_type.as_str().to_owned()));
        }
        self.get("search", &params).await
    }

    /// `videos` details for a batch of ids.
    pub async fn videos(&self, ids: &[String]) -> Result<VideoListResponse, Error> {
        if ids.is_empty() {
            return Ok(VideoListResponse::default());
        }
        self.get(
            "videos",
            &[
                (
                    "part",
                    "snippet,contentDetails,statistics,liveStreamingDetails".to_owned(),
                ),
                ("id", ids.join(",")),
            ],
        )
        .await
    }

    // ━━ Normalized queries ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Whether the channel is live right now.
    pub async fn live_status(&self) -> Result<LiveStatus, Error> {
        let resp = self.search(Some(EventType::Live), 1).await?;
        Ok(LiveStatus::from_search(resp))
    }

    /// Most recent uploads, enriched with duration and view counts.
    pub async fn recent_videos(&self, limit: u32) -> Result<Vec<Video>, Error> {
        self.search_with_details(None, limit).await
    }

    /// Scheduled broadcasts, soonest first.
    pub async fn upcoming_streams(&self, limit: u32) -> Result<Vec<Video>, Error> {
        let mut videos = self
            .search_with_details(Some(EventType::Upcoming), limit)
            .await?;
        // Unscheduled broadcasts go last.
        videos.sort_by_key(|v| (v.scheduled_start.is_none(), v.scheduled_start));
        Ok(videos)
    }

    /// Search, then fetch details for the hits, preserving search order.
    /// Hits missing from the details response fall back to their snippet.
    async fn search_with_details(
        &self,
        event_type: Option<EventType>,
        limit: u32,
    ) -> Result<Vec<Video>, Error> {
        let hits = self.search(event_type, limit).await?;
        let ids: Vec<String> = hits
            .items
            .iter()
            .filter_map(|item| item.id.video_id.clone())
            .collect();

        let mut details: std::collections::HashMap<String, Video> = self
            .videos(&ids)
            .await?
            .items
            .into_iter()
            .map(|item| (item.id.clone(), Video::from(item)))
            .collect();

        Ok(hits
            .items
            .into_iter()
            .filter_map(|item| {
                let id = item.id.video_id.clone()?;
                details.remove(&id).or_else(|| Video::from_search(item))
            })
            .collect())
    }
}

/// Drop the request URL (which carries the key) from transport errors.
fn without_url(err: Error) -> Error {
    match err {
        Error::Transport(e) => Error::Transport(e.without_url()),
        other => other,
    }
}
