// ── Reactive poll streams ──
//
// Subscription types for consuming poller state changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::PollState;

/// A subscription to one poller's state.
///
/// Provides both point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct PollStream<T: Send + Sync + 'static> {
    current: PollState<T>,
    receiver: watch::Receiver<PollState<T>>,
}

impl<T: Send + Sync + 'static> PollStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<PollState<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation time or by the last `changed()`.
    pub fn current(&self) -> &PollState<T> {
        &self.current
    }

    /// Latest snapshot (may have changed since creation).
    pub fn latest(&self) -> PollState<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the poller has shut down.
    pub async fn changed(&mut self) -> Option<PollState<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Wait until a snapshot satisfies `predicate`, checking the current
    /// value first. Returns `None` once the poller has shut down.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&PollState<T>) -> bool,
    ) -> Option<PollState<T>> {
        let snap = self.receiver.wait_for(|s| predicate(s)).await.ok()?.clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> PollWatchStream<T> {
        PollWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current state first, then each subsequent transition.
pub struct PollWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<PollState<T>>,
}

impl<T: Send + Sync + 'static> Stream for PollWatchStream<T> {
    type Item = PollState<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
