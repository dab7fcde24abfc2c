//! Torrust Swarm Registry application.
//!
//! The application is a container for the background jobs that keep the
//! registry healthy. It is responsible for:
//!
//! - Loading the completed counters from the database when persistence is
//!   enabled.
//! - Starting the jobs depending on the configuration.
//!
//! Jobs:
//!
//! - Torrent cleaner: it removes inactive peers and applies the retention
//!   policy to peerless torrents. Disabled with a zero interval.
//! - Torrent checkpoint: it saves the completed counters. Only when
//!   persistence is enabled.
//! - Statistics: it logs the torrent metrics. Disabled with a zero interval.
use std::sync::Arc;

use tokio::task::JoinHandle;
use torrust_tracker_configuration::Configuration;
use tracing::{error, info};

use crate::bootstrap::jobs::{log_statistics, torrent_checkpoint, torrent_cleanup};
use crate::core;

/// It loads the persisted counters and starts the jobs.
///
/// Counters that can not be loaded are logged; the registry starts empty
/// and they are merged back on the next checkpoint, since the database
/// never lowers a counter.
#[must_use]
pub fn start(config: &Configuration, tracker: &Arc<core::Tracker>) -> Vec<JoinHandle<()>> {
    let mut jobs: Vec<JoinHandle<()>> = Vec::new();

    // Load the completed counters
    if tracker.is_persistent() {
        match tracker.load_torrents_from_database() {
            Ok(torrents) => info!(torrents, "Loaded completed counters from the database"),
            Err(err) => error!(%err, "Could not load the completed counters from the database"),
        }
    }

    // Start runners to remove inactive peers and peerless torrents, every interval
    if config.core.inactive_peer_cleanup_interval > 0 {
        jobs.push(torrent_cleanup::start_job(&config.core, tracker));
    }

    if tracker.is_persistent() {
        jobs.push(torrent_checkpoint::start_job(&config.core, tracker));
    }

    if config.core.statistics_log_interval > 0 {
        jobs.push(log_statistics::start_job(&config.core, tracker));
    }

    jobs
}
