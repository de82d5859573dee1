//! Per-identifier throttle state.

/// Throttle state tracked for a single identifier.
///
/// Timestamps are milliseconds since the Unix epoch. The attempt list is
/// pruned lazily on each check, never proactively, so it may briefly hold
/// stale timestamps between checks.
#[derive(Debug, Clone, Default)]
pub struct AttemptEntry {
    /// Timestamps of attempts counted toward the current window, oldest first
    pub(crate) attempts: Vec<i64>,
    /// When set and in the future, the identifier is blocked regardless of
    /// attempt count
    pub(crate) blocked_until: Option<i64>,
}

impl AttemptEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the entry is blocked as of `now_ms`.
    pub fn is_blocked(&self, now_ms: i64) -> bool {
        self.blocked_until.is_some_and(|until| until > now_ms)
    }

    /// Drop attempts that fell out of the window as of `now_ms`.
    pub fn prune(&mut self, now_ms: i64, window_ms: i64) {
        self.attempts.retain(|&t| now_ms - t < window_ms);
    }

    /// Count attempts within the window as of `now_ms`, without pruning.
    pub fn recent_count(&self, now_ms: i64, window_ms: i64) -> usize {
        self.attempts
            .iter()
            .filter(|&&t| now_ms - t < window_ms)
            .count()
    }

    /// Whether the entry holds no recent attempts and no active block, i.e.
    /// the sweep may delete it.
    pub fn is_expired(&self, now_ms: i64, window_ms: i64) -> bool {
        !self.is_blocked(now_ms) && self.recent_count(now_ms, window_ms) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_empty() {
        let entry = AttemptEntry::new();
        assert!(entry.attempts.is_empty());
        assert!(entry.blocked_until.is_none());
        assert!(!entry.is_blocked(1_000));
    }

    #[test]
    fn test_prune_drops_stale_attempts() {
        let mut entry = AttemptEntry {
            attempts: vec![0, 500, 900, 1_500],
            blocked_until: None,
        };

        // Window of 1000ms at now=1600: 0 and 500 are stale, 900 and 1500 remain
        entry.prune(1_600, 1_000);
        assert_eq!(entry.attempts, vec![900, 1_500]);
    }

    #[test]
    fn test_prune_window_boundary_exclusive() {
        let mut entry = AttemptEntry {
            attempts: vec![0],
            blocked_until: None,
        };

        // An attempt exactly window_ms old no longer counts
        entry.prune(1_000, 1_000);
        assert!(entry.attempts.is_empty());
    }

    #[test]
    fn test_recent_count_does_not_mutate() {
        let entry = AttemptEntry {
            attempts: vec![0, 900],
            blocked_until: None,
        };

        assert_eq!(entry.recent_count(1_000, 500), 1);
        assert_eq!(entry.attempts.len(), 2);
    }

    #[test]
    fn test_blocked_until_boundary() {
        let entry = AttemptEntry {
            attempts: Vec::new(),
            blocked_until: Some(5_000),
        };

        assert!(entry.is_blocked(4_999));
        assert!(!entry.is_blocked(5_000));
    }

    #[test]
    fn test_is_expired() {
        let mut entry = AttemptEntry::new();
        assert!(entry.is_expired(10_000, 1_000));

        entry.attempts.push(9_500);
        assert!(!entry.is_expired(10_000, 1_000));

        // Attempt fell out of the window, but an active block keeps it alive
        entry.blocked_until = Some(20_000);
        assert!(!entry.is_expired(11_000, 1_000));

        // Expired block with no recent attempts makes it deletable
        entry.blocked_until = Some(10_500);
        assert!(entry.is_expired(11_000, 1_000));
    }
}
