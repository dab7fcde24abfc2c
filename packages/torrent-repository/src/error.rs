//! Errors returned by the torrent repository.
//!
//! Absence is never an error: an unknown torrent or peer yields an empty
//! result. The only failure is a malformed identifier, and it is always
//! detected before any state is touched.
use std::panic::Location;
use std::sync::Arc;

use thiserror::Error;
use torrust_tracker_located_error::{DynError, LocatedError};
use torrust_tracker_primitives::{info_hash, peer};

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid identifier: {source}")]
    InvalidIdentifier {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
    },
}

/// A peer record that can not belong to any swarm.
#[derive(Error, Debug, Clone)]
pub enum InvalidPeer {
    #[error("peer {peer_id} announced port 0 from {ip}, {location}")]
    ZeroPort {
        peer_id: peer::Id,
        ip: std::net::IpAddr,
        location: &'static Location<'static>,
    },
}

impl From<info_hash::ConversionError> for Error {
    #[track_caller]
    fn from(err: info_hash::ConversionError) -> Self {
        Self::InvalidIdentifier {
            source: (Arc::new(err) as DynError).into(),
        }
    }
}

impl From<peer::IdConversionError> for Error {
    #[track_caller]
    fn from(err: peer::IdConversionError) -> Self {
        Self::InvalidIdentifier {
            source: (Arc::new(err) as DynError).into(),
        }
    }
}

impl From<InvalidPeer> for Error {
    #[track_caller]
    fn from(err: InvalidPeer) -> Self {
        Self::InvalidIdentifier {
            source: (Arc::new(err) as DynError).into(),
        }
    }
}

/// Parses the info-hash sent by a client.
///
/// # Errors
///
/// Will return [`Error::InvalidIdentifier`] if `bytes` is not exactly 20 bytes long.
#[track_caller]
pub fn parse_info_hash(bytes: &[u8]) -> Result<info_hash::InfoHash, Error> {
    Ok(info_hash::InfoHash::try_from(bytes)?)
}

/// Parses the peer id sent by a client.
///
/// # Errors
///
/// Will return [`Error::InvalidIdentifier`] if `bytes` is not exactly 20 bytes long.
#[track_caller]
pub fn parse_peer_id(bytes: &[u8]) -> Result<peer::Id, Error> {
    Ok(peer::Id::try_from(bytes)?)
}

/// Checks that a peer record can be stored in a swarm.
///
/// # Errors
///
/// Will return [`Error::InvalidIdentifier`] if the peer announced port `0`,
/// since no other peer could ever connect to it.
#[track_caller]
pub fn validate_peer(peer: &peer::Peer) -> Result<(), Error> {
    if peer.peer_addr.port() == 0 {
        return Err(InvalidPeer::ZeroPort {
            peer_id: peer.peer_id,
            ip: peer.peer_addr.ip(),
            location: Location::caller(),
        }
        .into());
    }

    Ok(())
}
