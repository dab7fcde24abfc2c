//! The durable side of the torrents: their completed counters.
//!
//! Swarms are never persisted. A checkpoint writes the counter of every
//! torrent in memory and startup reads them back into fresh entries with
//! empty swarms. A `completed` announce writes the counter of its torrent,
//! and the cleanup sweep writes the counters of the torrents it is about to
//! drop.
use std::sync::Arc;

use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::PersistentTorrents;

use super::databases::error::Error;
use super::databases::Database;

/// Stores the completed counters through a [`Database`] driver.
#[derive(Clone)]
pub struct TorrentsPersistence {
    database: Arc<Box<dyn Database>>,
}

impl TorrentsPersistence {
    #[must_use]
    pub fn new(database: &Arc<Box<dyn Database>>) -> Self {
        Self {
            database: database.clone(),
        }
    }

    /// Every stored counter.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the underlying database query fails.
    pub fn load_all(&self) -> Result<PersistentTorrents, Error> {
        self.database.load_persistent_torrents()
    }

    /// The stored counter of one torrent.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the underlying database query fails.
    pub fn load(&self, info_hash: &InfoHash) -> Result<Option<u32>, Error> {
        self.database.load_persistent_torrent(info_hash)
    }

    /// Stores the counter of one torrent. A lower counter than the stored
    /// one is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the database operation fails.
    pub fn save(&self, info_hash: &InfoHash, completed: u32) -> Result<(), Error> {
        self.database.save_persistent_torrent(info_hash, completed)
    }

    /// Stores all the counters in one transaction. An empty set is not sent
    /// to the database.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the database operation fails. No counter is
    /// stored in that case.
    pub fn save_all(&self, torrents: &PersistentTorrents) -> Result<(), Error> {
        if torrents.is_empty() {
            return Ok(());
        }

        self.database.save_persistent_torrents(torrents)
    }
}
