//! Errors returned by the core `Tracker`.
//!
//! Error | Context | Description
//! ---|---|---
//! `InvalidIdentifier` | Announce | The info-hash or the peer record can not be stored. Nothing was changed.
//! `PersistenceUnavailable` | Load, checkpoint | The database failed. Only the durability of the completed counters is affected.
//!
//! There is no "not found" error: unknown torrents yield empty results.
use torrust_tracker_located_error::{Located, LocatedError};

use super::databases;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("The announce was rejected: {source}")]
    InvalidIdentifier {
        source: torrust_tracker_torrent_repository::Error,
    },

    #[error("The persistence backend is unavailable: {source}")]
    PersistenceUnavailable {
        source: LocatedError<'static, databases::error::Error>,
    },
}

impl From<torrust_tracker_torrent_repository::Error> for Error {
    fn from(err: torrust_tracker_torrent_repository::Error) -> Self {
        Self::InvalidIdentifier { source: err }
    }
}

impl From<databases::error::Error> for Error {
    #[track_caller]
    fn from(err: databases::error::Error) -> Self {
        Self::PersistenceUnavailable {
            source: Located(err).into(),
        }
    }
}
