// ── Media ──
//
// Video platform lookups behind an injected TTL cache.

mod cache;
mod video;

pub use cache::{DEFAULT_LIST_TTL, DEFAULT_LIVE_TTL, TtlCache, VideoCache};
pub use video::VideoService;
