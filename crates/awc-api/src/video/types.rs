// Video platform wire types and the normalized records built from them.
//
// Raw types mirror the platform's camelCase JSON (`search` and `videos`
// resources). `Video` and `LiveStatus` are what the rest of the workspace
// consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

// ── Raw: search ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    #[serde(default)]
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItemId {
    #[serde(default, rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    /// "live", "upcoming" or "none".
    #[serde(default)]
    pub live_broadcast_content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Largest available thumbnail URL.
    pub fn best(&self) -> Option<String> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

// ── Raw: videos ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
    #[serde(default)]
    pub statistics: Option<Statistics>,
    #[serde(default)]
    pub live_streaming_details: Option<LiveStreamingDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentDetails {
    /// ISO 8601 duration, e.g. `PT1H12M5S`.
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Counts arrive as decimal strings.
    #[serde(default)]
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamingDetails {
    #[serde(default)]
    pub scheduled_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_start_time: Option<DateTime<Utc>>,
}

// ── Normalized records ───────────────────────────────────────────────

/// A channel video, normalized from `search` + `videos` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub duration: Option<String>,
    pub view_count: Option<u64>,
    pub scheduled_start: Option<DateTime<Utc>>,
    pub url: String,
}

impl From<VideoItem> for Video {
    fn from(item: VideoItem) -> Self {
        Self {
            url: format!("{WATCH_URL}{}", item.id),
            thumbnail_url: item.snippet.thumbnails.best(),
            title: item.snippet.title,
            description: item.snippet.description,
            published_at: item.snippet.published_at,
            duration: item.content_details.and_then(|c| c.duration),
            view_count: item
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|v| v.parse().ok()),
            scheduled_start: item
                .live_streaming_details
                .and_then(|d| d.scheduled_start_time),
            id: item.id,
        }
    }
}

impl Video {
    /// Build a record from a bare search hit (no `videos` details).
    pub fn from_search(item: SearchItem) -> Option<Self> {
        let id = item.id.video_id?;
        Some(Self {
            url: format!("{WATCH_URL}{id}"),
            thumbnail_url: item.snippet.thumbnails.best(),
            title: item.snippet.title,
            description: item.snippet.description,
            published_at: item.snippet.published_at,
            duration: None,
            view_count: None,
            scheduled_start: None,
            id,
        })
    }
}

/// Whether the channel is broadcasting right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStatus {
    pub is_live: bool,
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub url: Option<String>,
}

impl LiveStatus {
    /// The "not live" default.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Derive live status from an `eventType=live` search.
    pub fn from_search(resp: SearchResponse) -> Self {
        resp.items
            .into_iter()
            .find_map(|item| {
                let video_id = item.id.video_id?;
                Some(Self {
                    is_live: true,
                    url: Some(format!("{WATCH_URL}{video_id}")),
                    thumbnail_url: item.snippet.thumbnails.best(),
                    title: Some(item.snippet.title),
                    video_id: Some(video_id),
                })
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn video_item_normalizes_counts_and_thumbnails() {
        let item: VideoItem = serde_json::from_str(
            r#"{
                "id": "abc",
                "snippet": {
                    "title": "Sunday Service",
                    "description": "Worship",
                    "publishedAt": "2024-06-16T15:00:00Z",
                    "thumbnails": {"default": {"url": "d.jpg"}, "medium": {"url": "m.jpg"}}
                },
                "contentDetails": {"duration": "PT1H30M"},
                "statistics": {"viewCount": "1234"}
            }"#,
        )
        .unwrap();
        let video = Video::from(item);
        assert_eq!(video.thumbnail_url.as_deref(), Some("m.jpg"));
        assert_eq!(video.view_count, Some(1234));
        assert_eq!(video.duration.as_deref(), Some("PT1H30M"));
        assert_eq!(video.url, "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn empty_live_search_is_offline() {
        assert_eq!(
            LiveStatus::from_search(SearchResponse::default()),
            LiveStatus::offline()
        );
    }

    #[test]
    fn search_hits_without_video_id_are_skipped() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"items":[{"id":{"kind":"youtube#channel"}},{"id":{"videoId":"live1"},"snippet":{"title":"Live now"}}]}"#,
        )
        .unwrap();
        let status = LiveStatus::from_search(resp);
        assert!(status.is_live);
        assert_eq!(status.video_id.as_deref(), Some("live1"));
        assert_eq!(status.title.as_deref(), Some("Live now"));
    }
}
