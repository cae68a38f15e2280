use std::time::Duration;

/// Ceiling applied to the retry interval when nothing else is configured.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);

/// Effective interval after `consecutive_errors` failures in a row.
///
/// Zero errors yields `base`; otherwise `base * 2^(n-1)`, never exceeding
/// `max`. Overflow saturates to `max`.
pub fn backoff_interval(base: Duration, consecutive_errors: u32, max: Duration) -> Duration {
    if consecutive_errors == 0 {
        return base.min(max);
    }
    let factor = 1_u32
        .checked_shl(consecutive_errors - 1)
        .unwrap_or(u32::MAX);
    base.checked_mul(factor).map_or(max, |d| d.min(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Duration = Duration::from_secs(5);

    #[test]
    fn doubles_per_failure() {
        assert_eq!(backoff_interval(BASE, 1, DEFAULT_MAX_INTERVAL), BASE);
        assert_eq!(
            backoff_interval(BASE, 2, DEFAULT_MAX_INTERVAL),
            Duration::from_secs(10)
        );
        assert_eq!(
            backoff_interval(BASE, 3, DEFAULT_MAX_INTERVAL),
            Duration::from_secs(20)
        );
        assert_eq!(
            backoff_interval(BASE, 4, DEFAULT_MAX_INTERVAL),
            Duration::from_secs(40)
        );
    }

    #[test]
    fn capped_at_max() {
        assert_eq!(
            backoff_interval(BASE, 5, DEFAULT_MAX_INTERVAL),
            DEFAULT_MAX_INTERVAL
        );
        assert_eq!(
            backoff_interval(BASE, 40, DEFAULT_MAX_INTERVAL),
            DEFAULT_MAX_INTERVAL
        );
        assert_eq!(
            backoff_interval(BASE, u32::MAX, DEFAULT_MAX_INTERVAL),
            DEFAULT_MAX_INTERVAL
        );
    }

    #[test]
    fn no_errors_is_base() {
        assert_eq!(backoff_interval(BASE, 0, DEFAULT_MAX_INTERVAL), BASE);
    }

    #[test]
    fn base_above_max_is_clamped() {
        let base = Duration::from_secs(90);
        assert_eq!(
            backoff_interval(base, 0, DEFAULT_MAX_INTERVAL),
            DEFAULT_MAX_INTERVAL
        );
    }
}
