// ── Host environment signals ──
//
// Visibility and connectivity of the host, shared by every poller that
// was started against the same `Environment`. Pollers only run while the
// host is both visible and online.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Shared visibility/online flags observed by pollers.
///
/// Cheaply cloneable; all clones drive the same signals.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Arc<EnvironmentInner>,
}

#[derive(Debug)]
struct EnvironmentInner {
    visible: watch::Sender<bool>,
    online: watch::Sender<bool>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// A host that starts out visible and online.
    pub fn new() -> Self {
        Self::with_state(true, true)
    }

    pub fn with_state(visible: bool, online: bool) -> Self {
        let (visible, _) = watch::channel(visible);
        let (online, _) = watch::channel(online);
        Self {
            inner: Arc::new(EnvironmentInner { visible, online }),
        }
    }

    pub fn is_visible(&self) -> bool {
        *self.inner.visible.borrow()
    }

    pub fn is_online(&self) -> bool {
        *self.inner.online.borrow()
    }

    /// Report a visibility change. Repeating the current value is a no-op.
    pub fn set_visible(&self, visible: bool) {
        let changed = self.inner.visible.send_if_modified(|v| {
            let changed = *v != visible;
            *v = visible;
            changed
        });
        if changed {
            debug!(visible, "host visibility changed");
        }
    }

    /// Report a connectivity change. Repeating the current value is a no-op.
    pub fn set_online(&self, online: bool) {
        let changed = self.inner.online.send_if_modified(|v| {
            let changed = *v != online;
            *v = online;
            changed
        });
        if changed {
            debug!(online, "host connectivity changed");
        }
    }

    pub(crate) fn watch_visible(&self) -> watch::Receiver<bool> {
        self.inner.visible.subscribe()
    }

    pub(crate) fn watch_online(&self) -> watch::Receiver<bool> {
        self.inner.online.subscribe()
    }
}
