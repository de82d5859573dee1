//! Throttle trait for abstracting over limiter implementations.

use async_trait::async_trait;

use super::limiter::{AttemptLimiter, Decision, EntryInfo};
use super::policy::ThrottlePolicy;

/// Trait for attempt-throttle implementations.
///
/// This abstracts the concrete [`AttemptLimiter`] away from the gRPC
/// service, so alternative backends can be dropped in without touching the
/// transport layer.
#[async_trait]
pub trait ThrottleBackend: Send + Sync {
    /// Decide whether a new attempt is currently permitted.
    async fn check(&self, identifier: &str, policy: &ThrottlePolicy) -> Decision;

    /// Discard all state for an identifier.
    async fn reset(&self, identifier: &str);

    /// Read-only diagnostic view of an identifier's state.
    async fn info(&self, identifier: &str) -> EntryInfo;
}

#[async_trait]
impl ThrottleBackend for AttemptLimiter {
    async fn check(&self, identifier: &str, policy: &ThrottlePolicy) -> Decision {
        AttemptLimiter::check(self, identifier, policy)
    }

    async fn reset(&self, identifier: &str) {
        AttemptLimiter::reset(self, identifier);
    }

    async fn info(&self, identifier: &str) -> EntryInfo {
        AttemptLimiter::info(self, identifier)
    }
}
