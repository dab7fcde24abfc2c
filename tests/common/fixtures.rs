use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use torrust_tracker_clock::clock::{self, Time};
use torrust_tracker_primitives::announce_event::AnnounceEvent;
use torrust_tracker_primitives::peer::fixture::PeerBuilder;
use torrust_tracker_primitives::peer::Peer;
use torrust_tracker_primitives::DurationSinceUnixEpoch;

/// A distinct client: its own peer id and its own address.
pub fn client(id: u8) -> PeerBuilder {
    PeerBuilder::leecher()
        .with_peer_id(&i32::from(id).into())
        .with_peer_addr(&SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, id)), 6881))
        .last_updated_on(clock::Working::now())
}

pub fn started(id: u8) -> Peer {
    client(id).with_event(AnnounceEvent::Started).build()
}

pub fn completed(id: u8) -> Peer {
    client(id)
        .with_event(AnnounceEvent::Completed)
        .with_no_bytes_pending_to_download()
        .build()
}

/// A client that announces it started and then that it completed.
pub fn downloaded(id: u8) -> [Peer; 2] {
    [started(id), completed(id)]
}

pub fn stopped(id: u8) -> Peer {
    client(id).with_event(AnnounceEvent::Stopped).build()
}

/// A peer whose last announce is `ago` in the past.
pub fn last_seen(id: u8, ago: Duration) -> Peer {
    let updated = clock::Working::now_sub(&ago).unwrap_or(DurationSinceUnixEpoch::ZERO);

    client(id).with_event(AnnounceEvent::None).last_updated_on(updated).build()
}
