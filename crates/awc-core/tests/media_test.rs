#![allow(clippy::unwrap_used)]
// VideoService caching and degradation against a wiremock video platform.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use awc_api::VideoClient;
use awc_core::{VideoCache, VideoConfig, VideoService};

// ── Helpers ─────────────────────────────────────────────────────────

fn service(server: &MockServer, cache: VideoCache) -> VideoService {
    let base = Url::parse(&format!("{}/youtube/v3/", server.uri())).unwrap();
    let client = VideoClient::with_client(
        reqwest::Client::new(),
        base,
        SecretString::from("yt-key".to_owned()),
        "UC-church",
    );
    VideoService::new(Some(client), Arc::new(cache))
}

fn live_body() -> serde_json::Value {
    json!({
        "items": [{
            "id": { "videoId": "live1" },
            "snippet": {
                "title": "Sunday Worship",
                "liveBroadcastContent": "live",
                "thumbnails": { "high": { "url": "https://img.example/live1.jpg" } }
            }
        }]
    })
}

async fn mount_recent(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("order", "date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": { "videoId": "v1" },
                "snippet": { "title": "Midweek Study" }
            }]
        })))
        .expect(expected)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "v1",
                "snippet": { "title": "Midweek Study" },
                "contentDetails": { "duration": "PT45M" },
                "statistics": { "viewCount": "120" }
            }]
        })))
        .mount(server)
        .await;
}

// ── Live status ─────────────────────────────────────────────────────

#[tokio::test]
async fn live_status_is_cached_within_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("eventType", "live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(live_body()))
        .expect(1)
        .mount(&server)
        .await;

    let videos = service(&server, VideoCache::default());
    let first = videos.live_status().await;
    let second = videos.live_status().await;

    assert!(first.is_live);
    assert_eq!(first.video_id.as_deref(), Some("live1"));
    assert_eq!(first, second);
}

#[tokio::test]
async fn clear_cache_forces_a_new_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("eventType", "live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(live_body()))
        .expect(2)
        .mount(&server)
        .await;

    let videos = service(&server, VideoCache::default());
    videos.live_status().await;
    videos.clear_cache();
    assert!(videos.cache().is_empty());
    videos.live_status().await;
}

#[tokio::test]
async fn expired_entries_are_refetched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("eventType", "live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(live_body()))
        .expect(2)
        .mount(&server)
        .await;

    let cache = VideoCache::new(Duration::from_millis(50), Duration::from_secs(600));
    let videos = service(&server, cache);
    videos.live_status().await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    videos.live_status().await;
}

#[tokio::test]
async fn live_lookup_failure_reports_offline_and_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "quotaExceeded" }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let videos = service(&server, VideoCache::default());
    let status = videos.live_status().await;
    assert!(!status.is_live);
    assert!(status.video_id.is_none());
    // second call goes back to the network
    videos.live_status().await;
    assert!(videos.cache().is_empty());
}

// ── Lists ───────────────────────────────────────────────────────────

#[tokio::test]
async fn recent_videos_are_cached_per_limit() {
    let server = MockServer::start().await;
    mount_recent(&server, 2).await;

    let videos = service(&server, VideoCache::default());
    let first = videos.recent_videos(5).await;
    let again = videos.recent_videos(5).await;
    let other_limit = videos.recent_videos(6).await;

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, "v1");
    assert_eq!(first[0].duration.as_deref(), Some("PT45M"));
    assert_eq!(first, again);
    assert_eq!(first, other_limit);
}

#[tokio::test]
async fn list_failure_returns_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let videos = service(&server, VideoCache::default());
    assert!(videos.recent_videos(5).await.is_empty());
    assert!(videos.upcoming_streams().await.is_empty());
    assert!(videos.cache().is_empty());
}

// ── Configuration ───────────────────────────────────────────────────

#[tokio::test]
async fn missing_credentials_disable_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(live_body()))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = VideoConfig::new(Url::parse(&server.uri()).unwrap());
    config.channel_id = Some("UC-church".into());
    let videos = VideoService::from_config(&config).unwrap();

    assert!(!videos.is_enabled());
    assert!(!videos.live_status().await.is_live);
    assert!(videos.recent_videos(3).await.is_empty());
    assert!(videos.upcoming_streams().await.is_empty());
}
