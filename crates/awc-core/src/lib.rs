//! Domain layer between `awc-api` and the AWC-Connect front ends.
//!
//! - **[`access`]**: fixed role tables (permissions, field visibility,
//!   navigation) and the [`Guard`] decisions composed from them. Pure
//!   functions; unknown roles always get the most restrictive answer.
//!
//! - **[`poll`]**: the [`Poller`] engine. Runs an async fetch on an
//!   interval, pauses while the host [`Environment`] is hidden or offline,
//!   backs off exponentially on failure, and publishes [`PollState`]
//!   snapshots through `watch` channels.
//!
//! - **[`inbox`]**: [`NotificationFeed`] and [`ChatUnreadFeed`], pollers
//!   wired to portal endpoints with role-dependent intervals.
//!
//! - **[`media`]**: [`VideoService`], video platform lookups behind an
//!   injected TTL [`VideoCache`], degrading to safe defaults on error.
//!
//! - **[`assistant`]**: [`Assistant`], single-turn questions under a fixed
//!   persona with a fixed apology on failure.
//!
//! Every constructor takes an explicit [`Session`]; nothing reads ambient
//! global state.

pub mod access;
pub mod assistant;
pub mod config;
pub mod error;
pub mod inbox;
pub mod media;
pub mod poll;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use access::{
    FieldVisibility, Guard, GuardDecision, NavItem, Permission, Requirement, Role,
};
pub use assistant::Assistant;
pub use config::{AssistantConfig, FeedIntervals, PortalConfig, TlsVerification, VideoConfig};
pub use error::CoreError;
pub use inbox::{ChatUnreadFeed, NotificationFeed};
pub use media::{VideoCache, VideoService};
pub use poll::{Environment, PollConfig, PollState, PollStream, Poller};
pub use session::{CurrentUser, Session};

// Wire types consumers render directly.
pub use awc_api::{
    ChatThread, ChatThreadsResponse, LiveStatus, Notification, NotificationsResponse, Video,
};

// One-shot portal writes that need no poller.
pub use awc_api::PortalClient;
