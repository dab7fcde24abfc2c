//! Statistics services.
//!
//! The metrics are computed on every call with a full scan of the
//! repository. Nothing is cached.
use std::sync::Arc;

use serde::Serialize;
use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;

use crate::core::Tracker;

/// All the metrics collected by the tracker.
#[derive(Debug, PartialEq, Serialize)]
pub struct TrackerMetrics {
    /// General metrics for all torrents (number of seeders, leechers, etcetera)
    pub torrents_metrics: TorrentsMetrics,

    /// Whether the completed counters survive a restart.
    pub persistent: bool,
}

/// It returns all the [`TrackerMetrics`]
#[must_use]
pub fn get_metrics(tracker: &Arc<Tracker>) -> TrackerMetrics {
    TrackerMetrics {
        torrents_metrics: tracker.get_torrents_metrics(),
        persistent: tracker.is_persistent(),
    }
}
