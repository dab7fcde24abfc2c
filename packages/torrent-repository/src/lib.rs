//! The in-memory repository of torrents and their swarms.
//!
//! The repository maps every [`InfoHash`](torrust_tracker_primitives::info_hash::InfoHash)
//! to an entry holding the swarm of peers of that torrent and its
//! completed-downloads counter. It is the only place where swarms are
//! mutated.
//!
//! Contention is partitioned by info-hash: the top-level map is a
//! concurrent map and each entry has its own lock, so announces for
//! different torrents never wait for each other and a full scan (the
//! cleanup sweep, the listing, the metrics) only ever holds one entry lock
//! at a time.
//!
//! There are two interchangeable map implementations:
//!
//! - [`TorrentsSkipMapRwLockParkingLot`]: a lock-free `crossbeam` skip list.
//!   Entries are kept in info-hash order.
//! - [`TorrentsDashMapRwLockParkingLot`]: a sharded `DashMap`.
//!
//! Both pass the same test suite (see `tests/repository`).
use std::sync::Arc;

use repository::dash_map::XacrimonDashMap;
use repository::skip_map::CrossbeamSkipList;
use torrust_tracker_clock::clock;

pub mod entry;
pub mod error;
pub mod pagination;
pub mod repository;

pub use error::Error;

/// Target for the repository log events.
pub const TORRENT_REPOSITORY_LOG_TARGET: &str = "TORRENT_REPOSITORY";

// Torrent Entry

pub type EntrySingle = entry::Torrent;
pub type EntryRwLockParkingLot = Arc<parking_lot::RwLock<EntrySingle>>;

// Repos

// Torrent repo: SkipMap; Peer list: BTreeMap
pub type TorrentsSkipMapRwLockParkingLot = CrossbeamSkipList<EntryRwLockParkingLot>;

// Torrent repo: DashMap; Peer list: BTreeMap
pub type TorrentsDashMapRwLockParkingLot = XacrimonDashMap<EntryRwLockParkingLot>;

/// The repository used by the tracker.
pub type Torrents = TorrentsSkipMapRwLockParkingLot;

/// This code needs to be copied into each crate.
/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Stopped;
