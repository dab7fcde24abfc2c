//! The persistence backends.
//!
//! The only durable data is the `completed` counter of each torrent, so the
//! schema is a single table:
//!
//!  Field         | Sample data                                | Description
//! ---|---|---
//!  `id`          | 1                                          | Autoincrement id
//!  `info_hash`   | `c1277613db1d28709b034a017ab2cae4be07ae10` | `BitTorrent` infohash V1
//!  `completed`   | 20                                         | Number of peers that ever completed the torrent
//!
//! Peer lists are never persisted. Peers re-announce on intervals, so swarms
//! are rebuilt a few minutes after a restart.
//!
//! There are two drivers: [`Sqlite`](crate::core::databases::sqlite::Sqlite)
//! and [`Mysql`](crate::core::databases::mysql::Mysql). Both store counters
//! with a "never lower" upsert: saving a counter smaller than the stored
//! one leaves the stored value untouched.
pub mod driver;
pub mod error;
pub mod mysql;
pub mod sqlite;

#[cfg(test)]
use mockall::automock;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::PersistentTorrents;

use self::error::Error;

/// The persistence trait.
#[cfg_attr(test, automock)]
pub trait Database: Sync + Send {
    /// It creates the `torrents` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Will return `Error` if unable to create the table.
    fn create_database_tables(&self) -> Result<(), Error>;

    /// It drops the `torrents` table.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to drop the table.
    fn drop_database_tables(&self) -> Result<(), Error>;

    /// It loads every stored `(info_hash, completed)` pair.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to load.
    fn load_persistent_torrents(&self) -> Result<PersistentTorrents, Error>;

    /// It loads the stored counter of one torrent, if any.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to load.
    fn load_persistent_torrent(&self, info_hash: &InfoHash) -> Result<Option<u32>, Error>;

    /// It saves the counter of one torrent.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to save.
    fn save_persistent_torrent(&self, info_hash: &InfoHash, completed: u32) -> Result<(), Error>;

    /// It saves many counters in a single transaction. Either all of them
    /// are stored or none is.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to save.
    fn save_persistent_torrents(&self, torrents: &PersistentTorrents) -> Result<(), Error>;
}
