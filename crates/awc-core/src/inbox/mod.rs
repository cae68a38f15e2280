// ── Inbox feeds ──
//
// Notification and staff-chat unread counters, each a `Poller` configured
// with a portal endpoint and a role-dependent interval.

mod chat;
mod notifications;

pub use chat::ChatUnreadFeed;
pub use notifications::NotificationFeed;
