//! The peer record kept in a torrent swarm.
//!
//! A sample peer:
//!
//! ```rust
//! use std::net::{IpAddr, Ipv4Addr, SocketAddr};
//!
//! use torrust_tracker_primitives::announce_event::AnnounceEvent;
//! use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, NumberOfBytes};
//!
//! let peer = peer::Peer {
//!     peer_id: peer::Id(*b"-qB00000000000000000"),
//!     peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 8080),
//!     updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
//!     uploaded: NumberOfBytes(0),
//!     downloaded: NumberOfBytes(0),
//!     left: NumberOfBytes(0),
//!     event: AnnounceEvent::Started,
//! };
//!
//! assert!(peer.is_seeder());
//! ```
//!
//! Within a swarm a peer is identified by its [`Key`]: the peer id the
//! client sent together with the socket address it announced from. The
//! same peer id may appear more than once in a swarm behind different
//! addresses.
use std::net::SocketAddr;
use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

use crate::announce_event::AnnounceEvent;
use crate::{DurationSinceUnixEpoch, NumberOfBytes};

pub const PEER_ID_BYTES_LEN: usize = 20;

/// A peer record. Every announce replaces the whole record.
#[derive(Debug, Clone, Serialize, Copy, PartialEq, Eq, Hash)]
pub struct Peer {
    /// ID used by the downloader peer
    pub peer_id: Id,
    /// The IP and port this peer is listening on
    pub peer_addr: SocketAddr,
    /// The last time the tracker received an announce request from this peer (timestamp)
    #[serde(serialize_with = "ser_unix_time_value")]
    pub updated: DurationSinceUnixEpoch,
    /// The total amount of bytes uploaded by this peer so far
    pub uploaded: NumberOfBytes,
    /// The total amount of bytes downloaded by this peer so far
    pub downloaded: NumberOfBytes,
    /// The number of bytes this peer still has to download
    pub left: NumberOfBytes,
    /// The announce event sent with this record.
    pub event: AnnounceEvent,
}

impl Peer {
    /// A seeder has nothing left to download.
    #[must_use]
    pub fn is_seeder(&self) -> bool {
        self.left.0 <= 0
    }

    #[must_use]
    pub fn is_leecher(&self) -> bool {
        !self.is_seeder()
    }

    /// The identity of this peer inside a swarm.
    #[must_use]
    pub fn key(&self) -> Key {
        Key::new(self.peer_id, self.peer_addr)
    }
}

/// Serializes a `DurationSinceUnixEpoch` as a Unix timestamp in milliseconds.
///
/// # Errors
///
/// Will return `serde::Serializer::Error` if unable to serialize the `unix_time_value`.
pub fn ser_unix_time_value<S: serde::Serializer>(unix_time_value: &DurationSinceUnixEpoch, ser: S) -> Result<S::Ok, S::Error> {
    #[allow(clippy::cast_possible_truncation)]
    ser.serialize_u64(unix_time_value.as_millis() as u64)
}

/// The identity of a peer inside one swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Constructor)]
pub struct Key {
    pub peer_id: Id,
    pub peer_addr: SocketAddr,
}

/// Error returned when trying to convert an invalid peer id from another type.
///
/// Usually because the source format does not contain 20 bytes.
#[derive(Error, Debug, Clone)]
pub enum IdConversionError {
    #[error("not enough bytes for peer id: {message} {location}")]
    NotEnoughBytes {
        location: &'static Location<'static>,
        message: String,
    },
    #[error("too many bytes for peer id: {message} {location}")]
    TooManyBytes {
        location: &'static Location<'static>,
        message: String,
    },
}

/// Peer id chosen by the client.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, PartialOrd, Ord)]
pub struct Id(pub [u8; 20]);

impl From<[u8; 20]> for Id {
    fn from(bytes: [u8; 20]) -> Self {
        Id(bytes)
    }
}

impl From<i32> for Id {
    fn from(number: i32) -> Self {
        let mut bytes = [0u8; 20];
        bytes[16..].copy_from_slice(&number.to_le_bytes());
        Id(bytes)
    }
}

impl TryFrom<&[u8]> for Id {
    type Error = IdConversionError;

    #[track_caller]
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < PEER_ID_BYTES_LEN {
            return Err(IdConversionError::NotEnoughBytes {
                location: Location::caller(),
                message: format! {"got {} bytes, expected {}", bytes.len(), PEER_ID_BYTES_LEN},
            });
        }
        if bytes.len() > PEER_ID_BYTES_LEN {
            return Err(IdConversionError::TooManyBytes {
                location: Location::caller(),
                message: format! {"got {} bytes, expected {}", bytes.len(), PEER_ID_BYTES_LEN},
            });
        }

        let mut id = Id::default();
        id.0.copy_from_slice(bytes);
        Ok(id)
    }
}

impl TryFrom<Vec<u8>> for Id {
    type Error = IdConversionError;

    #[track_caller]
    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(bytes.as_slice())
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

impl Id {
    /// Converts to hex string.
    ///
    /// For the `PeerId` `-qB00000000000000000` it returns `0x2d71423030303030303030303030303030303030`
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        let mut buffer = [0u8; PEER_ID_BYTES_LEN * 2];

        match binascii::bin2hex(&self.0, &mut buffer) {
            Ok(hex) => format!("0x{}", String::from_utf8_lossy(hex)),
            Err(_) => String::new(),
        }
    }
}

impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex_string())
    }
}

pub mod fixture {
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    use super::{Id, Peer};
    use crate::announce_event::AnnounceEvent;
    use crate::{DurationSinceUnixEpoch, NumberOfBytes};

    #[derive(PartialEq, Debug, Default)]
    pub struct PeerBuilder {
        peer: Peer,
    }

    impl PeerBuilder {
        #[must_use]
        pub fn seeder() -> Self {
            let peer = Peer {
                peer_id: Id(*b"-qB00000000000000001"),
                peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080),
                updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
                uploaded: NumberOfBytes(0),
                downloaded: NumberOfBytes(0),
                left: NumberOfBytes(0),
                event: AnnounceEvent::Completed,
            };

            Self { peer }
        }

        #[must_use]
        pub fn leecher() -> Self {
            let peer = Peer {
                peer_id: Id(*b"-qB00000000000000002"),
                peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2)), 8080),
                updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
                uploaded: NumberOfBytes(0),
                downloaded: NumberOfBytes(0),
                left: NumberOfBytes(10),
                event: AnnounceEvent::Started,
            };

            Self { peer }
        }

        #[must_use]
        pub fn with_peer_id(mut self, peer_id: &Id) -> Self {
            self.peer.peer_id = *peer_id;
            self
        }

        #[must_use]
        pub fn with_peer_addr(mut self, peer_addr: &SocketAddr) -> Self {
            self.peer.peer_addr = *peer_addr;
            self
        }

        #[must_use]
        pub fn with_event(mut self, event: AnnounceEvent) -> Self {
            self.peer.event = event;
            self
        }

        #[must_use]
        pub fn with_bytes_pending_to_download(mut self, left: i64) -> Self {
            self.peer.left = NumberOfBytes(left);
            self
        }

        #[must_use]
        pub fn with_no_bytes_pending_to_download(mut self) -> Self {
            self.peer.left = NumberOfBytes(0);
            self
        }

        #[must_use]
        pub fn last_updated_on(mut self, updated: DurationSinceUnixEpoch) -> Self {
            self.peer.updated = updated;
            self
        }

        #[must_use]
        pub fn build(self) -> Peer {
            self.peer
        }
    }

    impl Default for Peer {
        fn default() -> Self {
            Self {
                peer_id: Id(*b"-qB00000000000000000"),
                peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080),
                updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
                uploaded: NumberOfBytes(0),
                downloaded: NumberOfBytes(0),
                left: NumberOfBytes(0),
                event: AnnounceEvent::Started,
            }
        }
    }
}
