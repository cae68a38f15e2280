// ── Polling engine ──
//
// A `Poller<T>` repeatedly runs an async fetch on a schedule and publishes
// the result through a `watch` channel. One driver task per poller owns
// the state machine:
//
//   inactive ──(enabled && visible && online)──▶ fetch now ──▶ sleep(interval)
//      ▲                                            ▲               │
//      └──────────(any condition false)─────────────┴──(tick/refresh)┘
//
// Each cycle is awaited to completion before the next sleep starts, so at
// most one fetch is ever outstanding. Failures stretch the interval with
// capped exponential backoff; success resets it.

mod backoff;
mod environment;
mod state;
mod stream;

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;

pub use backoff::{DEFAULT_MAX_INTERVAL, backoff_interval};
pub use environment::Environment;
pub use state::PollState;
pub use stream::{PollStream, PollWatchStream};

// ── Fetch ────────────────────────────────────────────────────────────

/// Boxed future returned by a [`Fetch`].
pub type FetchFuture<T> = BoxFuture<'static, Result<T, CoreError>>;

/// Zero-argument async data source driven by a [`Poller`].
///
/// Implemented for any `Fn() -> impl Future<Output = Result<T, CoreError>>`.
pub trait Fetch<T>: Send + Sync + 'static {
    fn fetch(&self) -> FetchFuture<T>;
}

impl<T, F, Fut> Fetch<T> for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
{
    fn fetch(&self) -> FetchFuture<T> {
        Box::pin((self)())
    }
}

/// Callback invoked with every fetch failure.
pub type ErrorCallback = Arc<dyn Fn(&CoreError) + Send + Sync>;

// ── PollConfig ───────────────────────────────────────────────────────

/// Schedule and gating for one poller.
#[derive(Clone)]
pub struct PollConfig {
    pub base_interval: Duration,
    pub max_interval: Duration,
    pub enabled: bool,
    pub on_error: Option<ErrorCallback>,
}

impl PollConfig {
    /// Enabled, with the default 60 s backoff ceiling.
    pub fn new(base_interval: Duration) -> Self {
        Self {
            base_interval,
            max_interval: DEFAULT_MAX_INTERVAL,
            enabled: true,
            on_error: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = max_interval;
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&CoreError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for PollConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollConfig")
            .field("base_interval", &self.base_interval)
            .field("max_interval", &self.max_interval)
            .field("enabled", &self.enabled)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

// ── Poller ───────────────────────────────────────────────────────────

/// Owning handle to a running poller.
///
/// Dropping the handle (or calling [`shutdown()`](Self::shutdown)) stops the
/// driver task. A fetch still in flight at that point is abandoned and its
/// result is never published.
pub struct Poller<T: Send + Sync + 'static> {
    shared: Arc<Shared<T>>,
    task: Option<JoinHandle<()>>,
}

struct Shared<T> {
    state: watch::Sender<PollState<T>>,
    enabled: watch::Sender<bool>,
    fetcher: watch::Sender<Arc<dyn Fetch<T>>>,
    refresh: Notify,
    in_flight: AtomicBool,
    cancel: CancellationToken,
    env: Environment,
    base_interval: Duration,
    max_interval: Duration,
    on_error: Option<ErrorCallback>,
}

impl<T: Send + Sync + 'static> Poller<T> {
    /// Spawn the driver task. Must be called within a Tokio runtime.
    ///
    /// If the poller is eligible to run, the first fetch starts immediately.
    pub fn start(fetch: impl Fetch<T>, config: PollConfig, env: &Environment) -> Self {
        let (state, _) = watch::channel(PollState::new(config.base_interval));
        let (enabled, _) = watch::channel(config.enabled);
        let (fetcher, _) = watch::channel::<Arc<dyn Fetch<T>>>(Arc::new(fetch));

        let shared = Arc::new(Shared {
            state,
            enabled,
            fetcher,
            refresh: Notify::new(),
            in_flight: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            env: env.clone(),
            base_interval: config.base_interval,
            max_interval: config.max_interval,
            on_error: config.on_error,
        });

        let task = tokio::spawn(drive(Arc::clone(&shared)));
        Self {
            shared,
            task: Some(task),
        }
    }

    // ── Observation ──────────────────────────────────────────────

    /// Point-in-time copy of the poll state.
    pub fn state(&self) -> PollState<T> {
        self.shared.state.borrow().clone()
    }

    /// Last successful result, if any.
    pub fn data(&self) -> Option<Arc<T>> {
        self.shared.state.borrow().data.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.shared.state.borrow().is_polling
    }

    pub fn is_enabled(&self) -> bool {
        *self.shared.enabled.borrow()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> PollStream<T> {
        PollStream::new(self.shared.state.subscribe())
    }

    // ── Control ──────────────────────────────────────────────────

    /// Turn polling on or off. Re-enabling fetches immediately if the host
    /// is visible and online.
    pub fn set_enabled(&self, enabled: bool) {
        self.shared.enabled.send_if_modified(|current| {
            let changed = *current != enabled;
            *current = enabled;
            changed
        });
    }

    /// Swap the fetch function. An active poller fetches again immediately
    /// with the replacement.
    pub fn set_fetcher(&self, fetch: impl Fetch<T>) {
        self.shared.fetcher.send_replace(Arc::new(fetch));
    }

    /// Request an immediate fetch.
    ///
    /// Returns `false` (and does nothing) while a fetch is already in flight
    /// or polling is inactive.
    pub fn refresh(&self) -> bool {
        if self.shared.in_flight.load(Ordering::Acquire) || !self.is_polling() {
            return false;
        }
        self.shared.refresh.notify_one();
        true
    }

    /// Stop the driver and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.shared.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl<T: Send + Sync + 'static> Drop for Poller<T> {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Poller<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Poller")
            .field("is_polling", &state.is_polling)
            .field("loading", &state.loading)
            .field("current_interval", &state.current_interval)
            .field("consecutive_errors", &state.consecutive_errors)
            .finish_non_exhaustive()
    }
}

// ── Driver ───────────────────────────────────────────────────────────

/// Why the active phase ended.
enum Exit {
    /// Re-evaluate the gating conditions.
    Reevaluate,
    Cancelled,
}

async fn drive<T: Send + Sync + 'static>(shared: Arc<Shared<T>>) {
    let mut enabled = shared.enabled.subscribe();
    let mut fetcher = shared.fetcher.subscribe();
    let mut visible = shared.env.watch_visible();
    let mut online = shared.env.watch_online();

    loop {
        let active = *enabled.borrow_and_update()
            && *visible.borrow_and_update()
            && *online.borrow_and_update();
        fetcher.mark_unchanged();
        set_polling(&shared, active);

        let exit = if active {
            run_active(&shared, &mut enabled, &mut fetcher, &mut visible, &mut online).await
        } else {
            tokio::select! {
                biased;
                () = shared.cancel.cancelled() => Exit::Cancelled,
                r = enabled.changed() => exit_on(r),
                r = visible.changed() => exit_on(r),
                r = online.changed() => exit_on(r),
                r = fetcher.changed() => exit_on(r),
            }
        };

        if matches!(exit, Exit::Cancelled) {
            break;
        }
    }

    set_polling(&shared, false);
    debug!("poller stopped");
}

/// Fetch immediately, then on every tick, until a gating input changes.
async fn run_active<T: Send + Sync + 'static>(
    shared: &Shared<T>,
    enabled: &mut watch::Receiver<bool>,
    fetcher: &mut watch::Receiver<Arc<dyn Fetch<T>>>,
    visible: &mut watch::Receiver<bool>,
    online: &mut watch::Receiver<bool>,
) -> Exit {
    loop {
        let fetch = Arc::clone(&fetcher.borrow_and_update());
        if !run_cycle(shared, fetch.as_ref()).await {
            return Exit::Cancelled;
        }

        let interval = shared.state.borrow().current_interval;
        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => return Exit::Cancelled,
            r = enabled.changed() => return exit_on(r),
            r = visible.changed() => return exit_on(r),
            r = online.changed() => return exit_on(r),
            r = fetcher.changed() => return exit_on(r),
            () = shared.refresh.notified() => debug!("manual refresh"),
            () = tokio::time::sleep(interval) => {}
        }
    }
}

fn exit_on(changed: Result<(), watch::error::RecvError>) -> Exit {
    match changed {
        Ok(()) => Exit::Reevaluate,
        Err(_) => Exit::Cancelled,
    }
}

fn set_polling<T>(shared: &Shared<T>, active: bool) {
    let changed = shared.state.send_if_modified(|s| {
        let changed = s.is_polling != active;
        s.is_polling = active;
        changed
    });
    if changed {
        debug!(is_polling = active, "poller state changed");
    }
}

/// Run one fetch and publish its outcome.
///
/// Returns `false` if the poller was torn down while the fetch was pending;
/// nothing is published in that case.
async fn run_cycle<T: Send + Sync + 'static>(shared: &Shared<T>, fetch: &dyn Fetch<T>) -> bool {
    shared.in_flight.store(true, Ordering::Release);
    shared.state.send_modify(|s| s.loading = true);

    let outcome = tokio::select! {
        biased;
        () = shared.cancel.cancelled() => None,
        result = guarded_fetch(fetch) => Some(result),
    };
    shared.in_flight.store(false, Ordering::Release);

    let Some(result) = outcome else {
        return false;
    };
    if shared.cancel.is_cancelled() {
        return false;
    }

    match result {
        Ok(data) => {
            shared.state.send_modify(|s| {
                if s.consecutive_errors > 0 {
                    debug!(after_errors = s.consecutive_errors, "poll recovered");
                }
                s.data = Some(Arc::new(data));
                s.error = None;
                s.consecutive_errors = 0;
                s.current_interval = shared.base_interval;
                s.last_success = Some(Utc::now());
                s.loading = false;
            });
        }
        Err(err) => {
            let err = Arc::new(err);
            shared.state.send_modify(|s| {
                s.consecutive_errors = s.consecutive_errors.saturating_add(1);
                s.current_interval = backoff_interval(
                    shared.base_interval,
                    s.consecutive_errors,
                    shared.max_interval,
                );
                s.error = Some(Arc::clone(&err));
                s.loading = false;
                warn!(
                    error = %err,
                    consecutive_errors = s.consecutive_errors,
                    retry_in_ms = u64::try_from(s.current_interval.as_millis()).unwrap_or(u64::MAX),
                    "poll failed"
                );
            });
            if let Some(on_error) = &shared.on_error {
                on_error(&err);
            }
        }
    }
    true
}

/// Run the fetch, converting a panic into [`CoreError::Internal`].
async fn guarded_fetch<T: 'static>(fetch: &dyn Fetch<T>) -> Result<T, CoreError> {
    let future = match std::panic::catch_unwind(AssertUnwindSafe(|| fetch.fetch())) {
        Ok(future) => future,
        Err(payload) => return Err(panicked(payload.as_ref())),
    };
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(panicked(payload.as_ref())),
    }
}

fn panicked(payload: &(dyn Any + Send)) -> CoreError {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    CoreError::Internal(format!("fetch panicked: {detail}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use super::*;

    #[tokio::test]
    async fn panicking_fetch_becomes_internal_error() {
        let fetch = || async {
            let missing: Option<u32> = None;
            Ok::<_, CoreError>(missing.expect("boom"))
        };
        let result = guarded_fetch::<u32>(&fetch).await;
        match result {
            Err(CoreError::Internal(msg)) => assert!(msg.contains("boom"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn closure_fetch_runs() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let fetch = move || {
            let counter = Arc::clone(&counter);
            async move { Ok::<_, CoreError>(counter.fetch_add(1, Ordering::SeqCst) + 1) }
        };
        assert_eq!(guarded_fetch::<u32>(&fetch).await.unwrap(), 1);
        assert_eq!(guarded_fetch::<u32>(&fetch).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn config_builder() {
        let config = PollConfig::new(Duration::from_secs(20))
            .enabled(false)
            .max_interval(Duration::from_secs(30))
            .on_error(|_| {});
        assert!(!config.enabled);
        assert_eq!(config.max_interval, Duration::from_secs(30));
        assert!(format!("{config:?}").contains("on_error: true"));
    }
}
