use serde::{Deserialize, Serialize};

use crate::v2::database::Database;
use crate::TrackerPolicy;

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Core {
    // Database configuration.
    #[serde(default = "Core::default_database")]
    pub database: Database,

    /// Interval in seconds that the cleanup job will run to remove inactive
    /// peers and to apply the retention policy. `0` disables the job.
    #[serde(default = "Core::default_inactive_peer_cleanup_interval")]
    pub inactive_peer_cleanup_interval: u64,

    /// Interval in seconds between two checkpoints of the completed
    /// counters. `0` disables the periodic checkpoint; the counters are
    /// still saved on shutdown when persistence is enabled.
    #[serde(default = "Core::default_persistence_interval")]
    pub persistence_interval: u64,

    /// Interval in seconds between two log lines with the torrent metrics.
    /// `0` disables them.
    #[serde(default = "Core::default_statistics_log_interval")]
    pub statistics_log_interval: u64,

    // Tracker policy configuration.
    #[serde(default = "Core::default_tracker_policy")]
    pub tracker_policy: TrackerPolicy,
}

impl Default for Core {
    fn default() -> Self {
        Self {
            database: Self::default_database(),
            inactive_peer_cleanup_interval: Self::default_inactive_peer_cleanup_interval(),
            persistence_interval: Self::default_persistence_interval(),
            statistics_log_interval: Self::default_statistics_log_interval(),
            tracker_policy: Self::default_tracker_policy(),
        }
    }
}

impl Core {
    fn default_database() -> Database {
        Database::default()
    }

    fn default_inactive_peer_cleanup_interval() -> u64 {
        600
    }

    fn default_persistence_interval() -> u64 {
        900
    }

    fn default_statistics_log_interval() -> u64 {
        60
    }

    fn default_tracker_policy() -> TrackerPolicy {
        TrackerPolicy::default()
    }
}
