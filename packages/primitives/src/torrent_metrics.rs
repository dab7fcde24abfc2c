use std::ops::AddAssign;

use serde::Serialize;

/// Aggregate metrics for all torrents in the repository.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub struct TorrentsMetrics {
    /// Total number of seeders for all torrents
    pub seeders: u64,
    /// Total number of peers that have ever completed downloading for all torrents.
    pub completed: u64,
    /// Total number of leechers for all torrents.
    pub leechers: u64,
    /// Total number of torrents.
    pub torrents: u64,
    /// Number of torrents without peers.
    pub peerless_torrents: u64,
    /// Completed downloads counted since startup, the torrents removed since
    /// included, plus the counters loaded from the database at startup.
    pub downloads: u64,
}

impl TorrentsMetrics {
    /// Total number of peers, the sum of all swarm sizes.
    #[must_use]
    pub fn peers(&self) -> u64 {
        self.seeders + self.leechers
    }
}

impl AddAssign for TorrentsMetrics {
    fn add_assign(&mut self, rhs: Self) {
        self.seeders += rhs.seeders;
        self.completed += rhs.completed;
        self.leechers += rhs.leechers;
        self.torrents += rhs.torrents;
        self.peerless_torrents += rhs.peerless_torrents;
        self.downloads += rhs.downloads;
    }
}
