//! Periodic housekeeping for the attempt limiter.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::limiter::AttemptLimiter;

/// Default interval between sweeps (5 minutes).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Handle to a running sweeper task.
///
/// The sweeper owns its timer; dropping the handle without calling
/// [`SweeperHandle::shutdown`] leaves the task running until the runtime
/// exits. Shutdown is explicit so callers control when the timer stops.
pub struct SweeperHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for the task to exit.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}

/// Spawn a background task that sweeps expired entries every `interval`.
pub fn spawn_sweeper(limiter: Arc<AttemptLimiter>, interval: Duration) -> SweeperHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so a fresh limiter is
        // not swept before it has seen any traffic
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = limiter.sweep();
                    if removed > 0 {
                        debug!(removed = removed, "Sweeper removed expired entries");
                    }
                }
                _ = stop_rx.changed() => {
                    info!("Sweeper shutting down");
                    break;
                }
            }
        }
    });

    SweeperHandle { stop_tx, task }
}
