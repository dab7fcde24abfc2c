//! Primitive types for the swarm registry.
//!
//! These are the plain data structures shared by every package in the
//! workspace: identifiers (info-hashes and peer ids), the peer record kept
//! in each swarm, the swarm snapshot returned to announce and scrape
//! handlers, aggregate metrics and the pagination request used to list
//! torrents.
use std::collections::BTreeMap;
use std::time::Duration;

use derive_more::Display;
use info_hash::InfoHash;
use serde::{Deserialize, Serialize};

pub mod announce_event;
pub mod info_hash;
pub mod pagination;
pub mod peer;
pub mod swarm_metadata;
pub mod torrent_metrics;

/// Duration since the Unix Epoch.
pub type DurationSinceUnixEpoch = Duration;

/// The completed counter of every torrent. It's the only torrent data that
/// survives a restart.
pub type PersistentTorrents = BTreeMap<InfoHash, u32>;

/// Number of bytes reported by a peer (uploaded, downloaded or left).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NumberOfBytes(pub i64);

/// The database management system used to persist the completed counters.
#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Clone, Copy, Display)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// The `SQLite3` database driver.
    #[display("sqlite3")]
    Sqlite3,
    /// The `MySQL` database driver.
    #[display("mysql")]
    MySQL,
}
