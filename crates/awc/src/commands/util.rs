//! Shared helpers for command handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use awc_core::{PollState, PollStream};

use crate::error::CliError;

/// Wait for the first completed fetch: its data, or its error.
pub async fn first_result<T: Send + Sync + 'static>(
    mut stream: PollStream<T>,
) -> Result<Arc<T>, CliError> {
    let state = stream
        .wait_for(|s| s.last_success.is_some() || s.consecutive_errors > 0)
        .await
        .ok_or_else(|| CliError::ApiError {
            code: "internal".into(),
            message: "poller stopped before the first fetch".into(),
        })?;
    match (state.data, state.error) {
        (_, Some(err)) => Err(CliError::from(err.as_ref())),
        (Some(data), None) => Ok(data),
        (None, None) => Err(CliError::ApiError {
            code: "internal".into(),
            message: "fetch completed without data".into(),
        }),
    }
}

/// What changed between two snapshots, for `watch` commands.
pub enum Update<T> {
    Data(Arc<T>),
    Failed { errors: u32, retry_in_secs: u64, message: String },
}

/// Tracks the last reported fetch so each one prints exactly once.
#[derive(Default)]
pub struct WatchCursor {
    last_success: Option<DateTime<Utc>>,
    errors: u32,
}

impl WatchCursor {
    pub fn advance<T>(&mut self, state: &PollState<T>) -> Option<Update<T>> {
        if state.loading {
            return None;
        }
        if state.last_success != self.last_success && state.consecutive_errors == 0 {
            self.last_success = state.last_success;
            self.errors = 0;
            return state.data.clone().map(Update::Data);
        }
        if state.consecutive_errors > self.errors {
            self.errors = state.consecutive_errors;
            return Some(Update::Failed {
                errors: state.consecutive_errors,
                retry_in_secs: state.current_interval.as_secs(),
                message: state
                    .error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            });
        }
        None
    }
}

/// Local wall-clock time for watch lines.
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
