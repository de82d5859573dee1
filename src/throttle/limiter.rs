//! Core attempt limiter implementation.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::bus::{EventBus, ThrottleEvent};

use super::entry::AttemptEntry;
use super::policy::{ThrottlePolicy, DEFAULT_WINDOW};

/// Outcome of a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The attempt is permitted and has been recorded.
    Allowed,
    /// The attempt is rejected. The caller must not retry internally and
    /// should surface `retry_after_secs` to the end user.
    Blocked {
        /// Whole seconds until the block lifts, rounded up.
        retry_after_secs: u64,
    },
}

impl Decision {
    /// Whether the attempt was permitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    /// Seconds until retry, when blocked.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Decision::Allowed => None,
            Decision::Blocked { retry_after_secs } => Some(*retry_after_secs),
        }
    }
}

/// Read-only diagnostic view of an identifier's throttle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryInfo {
    /// Attempts recorded within the default window.
    pub attempts: usize,
    /// Raw block expiry, if one has been recorded. May already be in the
    /// past; it is cleared on the identifier's next check.
    pub blocked_until_ms: Option<i64>,
}

/// The attempt limiter tracking per-identifier sliding windows and blocks.
///
/// The whole entry table sits behind a single lock. Each check's
/// read-prune-append sequence runs inside one lock acquisition, so two
/// racing checks for the same identifier can never both claim the last
/// attempt slot. State is transient: the table is rebuilt empty on restart.
pub struct AttemptLimiter {
    /// Throttle entries indexed by identifier
    entries: Mutex<HashMap<String, AttemptEntry>>,
    /// Optional bus for block/reset/sweep notifications
    events: Option<EventBus>,
}

impl AttemptLimiter {
    /// Create a limiter that publishes no events.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            events: None,
        }
    }

    /// Create a limiter that publishes state changes to `events`.
    pub fn with_events(events: EventBus) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            events: Some(events),
        }
    }

    /// Decide whether a new attempt is currently permitted for `identifier`
    /// under `policy`.
    ///
    /// An allowed call is recorded as an attempt. A call rejected because an
    /// earlier block is still active is not recorded; the call that trips a
    /// new block is the one that exceeded the allowance and is likewise not
    /// appended to the attempt history.
    pub fn check(&self, identifier: &str, policy: &ThrottlePolicy) -> Decision {
        self.check_at(identifier, policy, Utc::now().timestamp_millis())
    }

    fn check_at(&self, identifier: &str, policy: &ThrottlePolicy, now_ms: i64) -> Decision {
        trace!(identifier = %identifier, "Checking attempt allowance");

        let mut event = None;
        let decision = {
            let mut entries = self.entries.lock();

            let entry = entries.entry(identifier.to_string()).or_insert_with(|| {
                debug!(identifier = %identifier, "Creating new throttle entry");
                AttemptEntry::new()
            });

            if let Some(until) = entry.blocked_until {
                if until > now_ms {
                    // Active block: reject without consuming an attempt slot
                    return Decision::Blocked {
                        retry_after_secs: ceil_secs(until - now_ms),
                    };
                }
                // Expired block: back to plain sliding-window tracking
                entry.blocked_until = None;
            }

            entry.prune(now_ms, policy.window_ms());

            if entry.attempts.len() >= policy.max_attempts() as usize {
                let until = now_ms + policy.block_duration_ms();
                entry.blocked_until = Some(until);
                debug!(
                    identifier = %identifier,
                    blocked_until_ms = until,
                    "Attempt limit exceeded, blocking"
                );
                event = Some(ThrottleEvent::Blocked {
                    identifier: identifier.to_string(),
                    blocked_until_ms: until,
                });
                Decision::Blocked {
                    retry_after_secs: ceil_secs(policy.block_duration_ms()),
                }
            } else {
                entry.attempts.push(now_ms);
                Decision::Allowed
            }
        };

        if let (Some(bus), Some(event)) = (&self.events, event) {
            bus.publish(event);
        }

        decision
    }

    /// Unconditionally discard all state for `identifier`.
    ///
    /// Used for administrative unblocking. Unknown identifiers are a no-op.
    pub fn reset(&self, identifier: &str) {
        let removed = self.entries.lock().remove(identifier).is_some();

        if removed {
            debug!(identifier = %identifier, "Throttle state reset");
            if let Some(bus) = &self.events {
                bus.publish(ThrottleEvent::Reset {
                    identifier: identifier.to_string(),
                });
            }
        }
    }

    /// Read-only diagnostic view for `identifier`.
    ///
    /// Attempts are counted against the default window regardless of the
    /// policy the entry was created under. Does not mutate or prune.
    pub fn info(&self, identifier: &str) -> EntryInfo {
        self.info_at(identifier, Utc::now().timestamp_millis())
    }

    fn info_at(&self, identifier: &str, now_ms: i64) -> EntryInfo {
        let entries = self.entries.lock();

        match entries.get(identifier) {
            Some(entry) => EntryInfo {
                attempts: entry.recent_count(now_ms, DEFAULT_WINDOW.as_millis() as i64),
                blocked_until_ms: entry.blocked_until,
            },
            None => EntryInfo {
                attempts: 0,
                blocked_until_ms: None,
            },
        }
    }

    /// Delete entries with no attempt inside the default window and no
    /// active block. Returns the number of entries removed.
    ///
    /// The expiry check and the deletion happen under the same lock that
    /// `check` and `reset` take, so a sweep can never race an entry out from
    /// under a concurrent mutation.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now().timestamp_millis())
    }

    fn sweep_at(&self, now_ms: i64) -> usize {
        let removed = {
            let mut entries = self.entries.lock();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(now_ms, DEFAULT_WINDOW.as_millis() as i64));
            before - entries.len()
        };

        if removed > 0 {
            debug!(removed = removed, "Swept expired throttle entries");
            if let Some(bus) = &self.events {
                bus.publish(ThrottleEvent::Swept { removed });
            }
        }

        removed
    }

    /// Number of tracked identifiers.
    pub fn entry_count(&self) -> usize {
        self.entries.lock().len()
    }
}

impl Default for AttemptLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Round a millisecond duration up to whole seconds.
fn ceil_secs(ms: i64) -> u64 {
    ((ms + 999) / 1000).max(0) as u64
}
