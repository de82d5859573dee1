//! Throttle policy configuration.

use std::time::Duration;

use crate::error::{DoormanError, Result};

/// Default number of attempts allowed within the window.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default sliding window length (15 minutes).
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);
/// Default block duration once the limit is tripped (15 minutes).
pub const DEFAULT_BLOCK_DURATION: Duration = Duration::from_secs(15 * 60);

/// Policy governing one call site's throttle behavior.
///
/// A policy is validated at construction time. Zero attempts or zero-length
/// durations are programming errors, not runtime conditions, so `new`
/// rejects them up front and every per-call path can assume a usable policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Attempts allowed within the window before a block is imposed
    max_attempts: u32,
    /// Sliding window length for counting attempts
    window: Duration,
    /// Duration of the block once triggered
    block_duration: Duration,
}

impl ThrottlePolicy {
    /// Create a validated policy.
    pub fn new(max_attempts: u32, window: Duration, block_duration: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(DoormanError::Policy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if window.is_zero() {
            return Err(DoormanError::Policy("window must be non-zero".to_string()));
        }
        if block_duration.is_zero() {
            return Err(DoormanError::Policy(
                "block_duration must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            max_attempts,
            window,
            block_duration,
        })
    }

    /// Attempts allowed within the window.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sliding window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Sliding window length in milliseconds.
    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    /// Block duration.
    pub fn block_duration(&self) -> Duration {
        self.block_duration
    }

    /// Block duration in milliseconds.
    pub fn block_duration_ms(&self) -> i64 {
        self.block_duration.as_millis() as i64
    }
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window: DEFAULT_WINDOW,
            block_duration: DEFAULT_BLOCK_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_values() {
        let policy = ThrottlePolicy::default();
        assert_eq!(policy.max_attempts(), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(policy.window(), DEFAULT_WINDOW);
        assert_eq!(policy.block_duration(), DEFAULT_BLOCK_DURATION);
    }

    #[test]
    fn test_valid_policy() {
        let policy =
            ThrottlePolicy::new(3, Duration::from_secs(60), Duration::from_secs(120)).unwrap();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.window_ms(), 60_000);
        assert_eq!(policy.block_duration_ms(), 120_000);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = ThrottlePolicy::new(0, Duration::from_secs(60), Duration::from_secs(60));
        assert!(matches!(result, Err(DoormanError::Policy(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let result = ThrottlePolicy::new(5, Duration::ZERO, Duration::from_secs(60));
        assert!(matches!(result, Err(DoormanError::Policy(_))));
    }

    #[test]
    fn test_zero_block_duration_rejected() {
        let result = ThrottlePolicy::new(5, Duration::from_secs(60), Duration::ZERO);
        assert!(matches!(result, Err(DoormanError::Policy(_))));
    }
}
