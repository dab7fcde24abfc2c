use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Announce events. Described on the
/// [BEP 3. The `BitTorrent` Protocol Specification](https://www.bittorrent.org/beps/bep_0003.html)
#[derive(Hash, Clone, Copy, Debug, Default, Display, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AnnounceEvent {
    /// The peer has started downloading the torrent.
    #[display("started")]
    Started,
    /// The peer has ceased downloading the torrent.
    #[display("stopped")]
    Stopped,
    /// The peer has completed downloading the torrent.
    #[display("completed")]
    Completed,
    /// One of the announcements done at regular intervals.
    #[default]
    #[display("")]
    None,
}

impl AnnounceEvent {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        *self == AnnounceEvent::Completed
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self == AnnounceEvent::Stopped
    }
}
