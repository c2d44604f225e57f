//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheEngine, Clock};

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task sleeps for the engine's current cleanup interval between passes, so
/// a changed interval takes effect after the sleep in progress.
///
/// Only reached through [`CacheEngine::start_cleanup`], which keeps at most one
/// task per engine.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub(crate) fn spawn_cleanup_task<T, C>(cache: CacheEngine<T, C>) -> JoinHandle<()>
where
    T: Clone + Serialize + Send + Sync + 'static,
    C: Clock,
{
    tokio::spawn(async move {
        let interval = cache.config().await.cleanup_interval;
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            let interval = cache.config().await.cleanup_interval;
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
