//! Application jobs launchers.
//!
//! The main application setup has only two main stages:
//!
//! 1. Setup the domain layer: the core tracker.
//! 2. Launch the background jobs that keep the registry healthy.
//!
//! Every job is a `tokio` task that runs on a fixed interval and stops when
//! its shutdown future completes. In the application that future is the
//! `ctrl-c` signal.
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};

pub mod log_statistics;
pub mod torrent_checkpoint;
pub mod torrent_cleanup;

/// Completes when the process receives `ctrl-c`.
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "unable to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// An interval that waits for a whole period before its first tick.
/// Returns `None` for a zero period.
fn interval_after(secs: u64) -> Option<Interval> {
    if secs == 0 {
        return None;
    }

    let period = Duration::from_secs(secs);

    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    Some(interval)
}

/// Waits for the next tick. Never completes without an interval.
async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
