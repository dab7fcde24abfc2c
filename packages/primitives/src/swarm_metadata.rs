use derive_more::Constructor;
use serde::Serialize;

/// Swarm statistics for one torrent.
///
/// It's the snapshot returned after an announce and the per-torrent entry
/// in a scrape response.
///
/// See [BEP 48: Tracker Protocol Extension: Scrape](https://www.bittorrent.org/beps/bep_0048.html)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Constructor, Serialize)]
pub struct SwarmMetadata {
    /// (i.e `completed`): The number of peers that have ever completed downloading
    pub downloaded: u32,
    /// (i.e `seeders`): The number of active peers that have completed downloading (seeders)
    pub complete: u32,
    /// (i.e `leechers`): The number of active peers that have not completed downloading (leechers)
    pub incomplete: u32,
}

impl SwarmMetadata {
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// The number of peers in the swarm.
    #[must_use]
    pub fn peers(&self) -> u32 {
        self.complete + self.incomplete
    }

    #[must_use]
    pub fn seeders(&self) -> u32 {
        self.complete
    }

    #[must_use]
    pub fn leechers(&self) -> u32 {
        self.incomplete
    }
}
