// Wire types for the portal REST API.
//
// Field names follow the portal's snake_case JSON. Everything except the
// identifiers is defaulted so partially populated payloads still parse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single notification addressed to the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "message")]
    pub body: String,
    /// Category reported by the portal (e.g. "event", "prayer", "chat").
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// In-app path to open when the notification is selected.
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, alias = "is_read")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// `GET /api/notifications`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsResponse {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub server_time: Option<DateTime<Utc>>,
}

/// A staff chat channel with its unread counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatThread {
    /// Channel identifier, used by the mark-read endpoint.
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// "channel" or "direct".
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_message_preview: Option<String>,
}

/// `GET /api/staff/chat/threads?includeUnread=1`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatThreadsResponse {
    #[serde(default)]
    pub threads: Vec<ChatThread>,
    #[serde(default)]
    pub total_unread: u32,
    #[serde(default)]
    pub server_time: Option<DateTime<Utc>>,
}

/// `POST /api/notifications/read` body.
#[derive(Debug, Serialize)]
pub(crate) struct MarkReadRequest<'a> {
    pub ids: &'a [String],
}
