use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use torrust_tracker_clock::clock::Time;
use torrust_tracker_primitives::announce_event::AnnounceEvent;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, NumberOfBytes};

use crate::CurrentClock;

#[derive(Debug, Default)]
struct TorrentPeerBuilder {
    peer: peer::Peer,
}

#[allow(dead_code)]
impl TorrentPeerBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            peer: peer::Peer {
                updated: CurrentClock::now(),
                ..Default::default()
            },
        }
    }

    #[must_use]
    fn with_event(mut self, event: AnnounceEvent) -> Self {
        self.peer.event = event;
        self
    }

    #[must_use]
    fn with_peer_address(mut self, peer_addr: SocketAddr) -> Self {
        self.peer.peer_addr = peer_addr;
        self
    }

    #[must_use]
    fn with_peer_id(mut self, peer_id: peer::Id) -> Self {
        self.peer.peer_id = peer_id;
        self
    }

    #[must_use]
    fn with_number_of_bytes_left(mut self, left: i64) -> Self {
        self.peer.left = NumberOfBytes(left);
        self
    }

    #[must_use]
    fn updated_at(mut self, updated: DurationSinceUnixEpoch) -> Self {
        self.peer.updated = updated;
        self
    }

    #[must_use]
    fn into(self) -> peer::Peer {
        self.peer
    }
}

/// A torrent seeder is a peer with 0 bytes left to download which
/// has just announced the `completed` event.
#[must_use]
pub fn a_completed_peer(id: i32) -> peer::Peer {
    TorrentPeerBuilder::new()
        .with_number_of_bytes_left(0)
        .with_event(AnnounceEvent::Completed)
        .with_peer_id(id.into())
        .into()
}

/// A torrent leecher is a peer that is not a seeder.
#[must_use]
pub fn a_started_peer(id: i32) -> peer::Peer {
    TorrentPeerBuilder::new()
        .with_number_of_bytes_left(1)
        .with_event(AnnounceEvent::Started)
        .with_peer_id(id.into())
        .into()
}

/// A leecher last seen at `updated`.
#[must_use]
pub fn a_peer_updated_at(id: i32, updated: DurationSinceUnixEpoch) -> peer::Peer {
    TorrentPeerBuilder::new()
        .with_number_of_bytes_left(1)
        .with_event(AnnounceEvent::None)
        .with_peer_id(id.into())
        .updated_at(updated)
        .into()
}

/// A peer that announced from port `0`.
#[must_use]
pub fn a_peer_without_port() -> peer::Peer {
    TorrentPeerBuilder::new()
        .with_peer_address(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 0))
        .into()
}
