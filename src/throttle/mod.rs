//! Attempt throttling logic and state management.

mod backend;
mod entry;
mod limiter;
mod policy;
mod sweeper;

pub use backend::ThrottleBackend;
pub use entry::AttemptEntry;
pub use limiter::{AttemptLimiter, Decision, EntryInfo};
pub use policy::{
    ThrottlePolicy, DEFAULT_BLOCK_DURATION, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW,
};
pub use sweeper::{spawn_sweeper, SweeperHandle, DEFAULT_SWEEP_INTERVAL};
