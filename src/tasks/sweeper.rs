//! Expiration Sweeper Task
//!
//! Background task that periodically reclaims expired cache entries so they
//! do not linger until a read happens to touch them.

use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Weak;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::Shared;
use crate::config::SweepConfig;

// == Sweeper Handle ==
/// Owned handle to a running sweeper. Dropping it stops the task.
#[derive(Debug)]
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweeper. Idempotent.
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns the expiration sweeper for a cache.
///
/// Every `sweep.interval()` the task locks the cache and examines
/// `sweep.samples_for(len)` entries from the least recently used end,
/// reclaiming expired ones. The task holds only a weak reference and exits
/// once the cache is gone.
///
/// A panic during a pass (an eviction listener, say) is caught and the
/// task carries on at the next tick.
///
/// Must be called from within a Tokio runtime.
pub(crate) fn spawn_sweeper_task<K, V>(cache: Weak<Shared<K, V>>, sweep: SweepConfig) -> SweeperHandle
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
{
    let handle = tokio::spawn(async move {
        info!(
            hz = sweep.hz,
            min_samples = sweep.min_samples,
            promote_inspected = sweep.promote_inspected,
            "Starting expiration sweeper"
        );

        let mut ticker = time::interval(sweep.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(cache) = cache.upgrade() else {
                break;
            };

            let pass = panic::catch_unwind(AssertUnwindSafe(|| cache.sweep_once(&sweep)));
            drop(cache);

            // A failed pass is absorbed; the next tick tries again
            if let Ok(outcome) = pass {
                if outcome.reclaimed > 0 {
                    debug!(
                        inspected = outcome.inspected,
                        reclaimed = outcome.reclaimed,
                        "Sweep reclaimed expired entries"
                    );
                }
            }
        }

        info!("Expiration sweeper stopped: cache dropped");
    });

    SweeperHandle { handle }
}
