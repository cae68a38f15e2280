// Hand-crafted async HTTP client for the AWC-Connect portal REST API.
//
// Every request carries the session's bearer token as a default header.
// Write endpoints only acknowledge; callers re-read state on their next poll.

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::{ChatThreadsResponse, MarkReadRequest, NotificationsResponse};
use crate::error::Error;
use crate::http::{handle_empty, handle_response, join_segments};
use crate::transport::TransportConfig;

/// Async client for the portal REST API.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Debug, Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PortalClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url`, attaching `Authorization: Bearer` when
    /// a session token is present.
    ///
    /// Without a token requests go out unauthenticated and the portal answers
    /// 401, surfaced as [`Error::Unauthorized`].
    pub fn new(
        base_url: &str,
        token: Option<&SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = match token {
            Some(token) => crate::auth::bearer_headers(token)?,
            None => reqwest::header::HeaderMap::new(),
        };
        let http = transport.build_client_with_headers(headers)?;
        let base_url = Url::parse(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The portal origin this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = join_segments(&self.base_url, segments)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), Error> {
        let url = join_segments(&self.base_url, segments)?;
        debug!("POST {url}");

        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await?;
        handle_empty(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Notifications ────────────────────────────────────────────────

    pub async fn list_notifications(&self) -> Result<NotificationsResponse, Error> {
        self.get(&["api", "notifications"], &[]).await
    }

    pub async fn mark_notifications_read(&self, ids: &[String]) -> Result<(), Error> {
        self.post_no_response(&["api", "notifications", "read"], Some(&MarkReadRequest { ids }))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<(), Error> {
        self.post_no_response::<()>(&["api", "notifications", "read-all"], None)
            .await
    }

    // ── Staff chat ───────────────────────────────────────────────────

    pub async fn list_chat_threads(&self) -> Result<ChatThreadsResponse, Error> {
        self.get(
            &["api", "staff", "chat", "threads"],
            &[("includeUnread", "1")],
        )
        .await
    }

    pub async fn mark_channel_read(&self, channel_id: &str) -> Result<(), Error> {
        self.post_no_response::<()>(
            &["api", "staff", "chat", "channels", channel_id, "read"],
            None,
        )
        .await
    }
}
