//! Job that logs the torrent metrics on intervals.
use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use torrust_tracker_configuration::Core;

use super::{ctrl_c, interval_after, next_tick};
use crate::core;

/// It starts the job. The metrics are logged every
/// `statistics_log_interval` seconds.
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
    let mut interval = interval_after(config.statistics_log_interval);

    tokio::spawn(async move {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("Stopping statistics job..");
                    break;
                }
                () = next_tick(&mut interval) => {
                    let Some(tracker) = weak_tracker.upgrade() else {
                        break;
                    };

                    let metrics = tracker.get_torrents_metrics();

                    tracing::info!(
                        torrents = metrics.torrents,
                        peerless_torrents = metrics.peerless_torrents,
                        seeders = metrics.seeders,
                        leechers = metrics.leechers,
                        completed = metrics.completed,
                        downloads = metrics.downloads,
                        "torrent metrics"
                    );
                }
            }
        }
    })
}
