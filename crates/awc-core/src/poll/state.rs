use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::CoreError;

/// Snapshot of a poller, published after every transition.
#[derive(Debug)]
pub struct PollState<T> {
    /// Last successful result. Kept across later failures.
    pub data: Option<Arc<T>>,
    /// A fetch is in flight.
    pub loading: bool,
    /// Most recent failure; cleared by the next success.
    pub error: Option<Arc<CoreError>>,
    /// Enabled, visible and online all hold, so the timer is running.
    pub is_polling: bool,
    /// Delay before the next scheduled fetch.
    pub current_interval: Duration,
    pub consecutive_errors: u32,
    pub last_success: Option<DateTime<Utc>>,
}

impl<T> PollState<T> {
    pub(crate) fn new(base_interval: Duration) -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            is_polling: false,
            current_interval: base_interval,
            consecutive_errors: 0,
            last_success: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

// Manual impl: `Arc<T>` is cloneable without `T: Clone`.
impl<T> Clone for PollState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            error: self.error.clone(),
            is_polling: self.is_polling,
            current_interval: self.current_interval,
            consecutive_errors: self.consecutive_errors,
            last_success: self.last_success,
        }
    }
}
