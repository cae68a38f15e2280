//! Async HTTP clients for the services AWC-Connect talks to.
//!
//! - [`PortalClient`]: the portal REST API (notifications, staff chat),
//!   authenticated with the session's bearer token.
//! - [`VideoClient`]: the video platform's search/videos endpoints, keyed by
//!   API key and channel id, normalized into [`Video`] / [`LiveStatus`].
//! - [`AssistantClient`]: single-turn `generateContent` calls against the
//!   generative chat backend.
//!
//! All clients share [`TransportConfig`] for TLS and timeout settings and
//! report failures through the single [`Error`] type.

pub mod assistant;
pub mod auth;
pub mod error;
mod http;
pub mod portal;
pub mod transport;
pub mod video;

pub use assistant::AssistantClient;
pub use error::Error;
pub use portal::PortalClient;
pub use portal::types::{
    ChatThread, ChatThreadsResponse, Notification, NotificationsResponse,
};
pub use transport::{TlsMode, TransportConfig};
pub use video::VideoClient;
pub use video::types::{LiveStatus, Video};
