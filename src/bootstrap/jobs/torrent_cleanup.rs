//! Job that runs a task on intervals to clean up torrents.
//!
//! It removes inactive peers and applies the retention policy to the
//! torrents left without peers.
//!
//! **Inactive peers** are peers that have not been updated for more than `max_peer_timeout` seconds.
//! `max_peer_timeout` is a customizable core tracker option.
//!
//! Refer to [`torrust-tracker-configuration documentation`](https://docs.rs/torrust-tracker-configuration) for more info about those options.
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use torrust_tracker_configuration::Core;

use super::{ctrl_c, interval_after, next_tick};
use crate::core;

/// It starts a jobs for cleaning up the torrent data in the tracker.
///
/// The cleaning task is executed on an `inactive_peer_cleanup_interval`.
/// A zero interval never runs a cleanup.
///
/// Refer to [`torrust-tracker-configuration documentation`](https://docs.rs/torrust-tracker-configuration) for more info about that option.
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
    let mut interval = interval_after(config.inactive_peer_cleanup_interval);

    tokio::spawn(async move {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Stopping torrent cleanup job..");
                    break;
                }
                () = next_tick(&mut interval) => {
                    if let Some(tracker) = weak_tracker.upgrade() {
                        let start_time = Utc::now().time();
                        tracing::info!("Cleaning up torrents..");
                        let report = tracker.cleanup_torrents();
                        tracing::info!(
                            inactive_peers = report.inactive_peers,
                            removed_torrents = report.removed_torrents,
                            "Cleaned up torrents in: {}ms",
                            (Utc::now().time() - start_time).num_milliseconds()
                        );
                    } else {
                        break;
                    }
                }
            }
        }
    })
}
