//! Job that saves the completed counters to the database.
//!
//! A checkpoint writes the counter of every torrent in memory. A failed
//! checkpoint is logged and retried on the next tick. One last checkpoint
//! runs when the job is stopped, so the counters survive a restart even
//! when the periodic checkpoint is disabled.
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use torrust_tracker_configuration::Core;

use super::{ctrl_c, interval_after, next_tick};
use crate::core;

/// It starts the checkpoint job. It runs every `persistence_interval`
/// seconds; `0` leaves only the checkpoint on shutdown.
#[must_use]
pub fn start_job(config: &Core, tracker: &Arc<core::Tracker>) -> JoinHandle<()> {
    start_job_until(config, tracker, ctrl_c())
}

/// Like [`start_job`], stopping when `shutdown` completes.
#[must_use]
pub fn start_job_until<S>(config: &Core, tracker: &Arc<core::Tracker>, shutdown: S) -> JoinHandle<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let weak_tracker = std::sync::Arc::downgrade(tracker);
    let mut interval = interval_after(config.persistence_interval);

    tokio::spawn(async move {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Stopping torrent checkpoint job..");
                    if let Some(tracker) = weak_tracker.upgrade() {
                        checkpoint(&tracker);
                    }
                    break;
                }
                () = next_tick(&mut interval) => {
                    if let Some(tracker) = weak_tracker.upgrade() {
                        checkpoint(&tracker);
                    } else {
                        break;
                    }
                }
            }
        }
    })
}

fn checkpoint(tracker: &core::Tracker) {
    let start_time = Utc::now().time();

    match tracker.checkpoint() {
        Ok(torrents) => tracing::info!(
            torrents,
            "Saved completed counters in: {}ms",
            (Utc::now().time() - start_time).num_milliseconds()
        ),
        Err(err) => tracing::error!(%err, "Unable to save the completed counters"),
    }
}
