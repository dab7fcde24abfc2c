//! The core `tracker` module holds the swarm registry logic. It does not
//! know anything about the delivery layer.
//!
//! ```text
//! Delivery layer     Domain layer
//!
//!     HTTP tracker |
//!      UDP tracker |> Core tracker
//! Tracker REST API |
//! ```
//!
//! The protocol layers parse and validate the requests, build a
//! [`peer::Peer`] record stamped with the current time and call the
//! [`Tracker`]. The tracker only owns the registry of torrents and swarms
//! and the durable completed counters.
//!
//! # Announce request
//!
//! A peer announces itself to the swarm of a torrent and receives the other
//! peers in that swarm:
//!
//! ```rust,no_run
//! use std::net::{IpAddr, Ipv4Addr, SocketAddr};
//! use std::str::FromStr;
//!
//! use torrust_swarm_registry::core::Tracker;
//! use torrust_tracker_configuration::Core;
//! use torrust_tracker_primitives::announce_event::AnnounceEvent;
//! use torrust_tracker_primitives::info_hash::InfoHash;
//! use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, NumberOfBytes};
//!
//! let tracker = Tracker::new(&Core::default());
//!
//! let info_hash = InfoHash::from_str("3b245504cf5f11bbdbe1201cea6a6bf45aee1bc0").unwrap();
//!
//! let peer = peer::Peer {
//!     peer_id: peer::Id(*b"-qB00000000000000001"),
//!     peer_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(126, 0, 0, 1)), 8081),
//!     updated: DurationSinceUnixEpoch::new(1_669_397_478_934, 0),
//!     uploaded: NumberOfBytes(0),
//!     downloaded: NumberOfBytes(0),
//!     left: NumberOfBytes(0),
//!     event: AnnounceEvent::Completed,
//! };
//!
//! let announce_data = tracker.announce(&info_hash, &peer, None).unwrap();
//! ```
//!
//! The [`AnnounceData`] contains up to [`TORRENT_PEERS_LIMIT`] peers, never
//! the announcing one, and the [`SwarmMetadata`] of the torrent after the
//! announce:
//!
//! ```rust,no_run
//! pub struct SwarmMetadata {
//!     pub downloaded: u32, // Peers that have ever completed the torrent
//!     pub complete: u32,   // Seeders: active peers with nothing left to download
//!     pub incomplete: u32, // Leechers: active peers still downloading
//! }
//! ```
//!
//! A `stopped` event removes the peer from the swarm. A `completed` event
//! increases `downloaded` once per peer session: repeating it does nothing
//! until the peer announces with another event.
//!
//! # Scrape request
//!
//! A scrape returns the [`SwarmMetadata`] of several torrents at once.
//! Unknown torrents get zeroed metadata.
//!
//! # Cleanup
//!
//! Peers that stop announcing are removed by the [`EvictionSweeper`](sweeper::EvictionSweeper)
//! and the torrents left without peers are dropped or kept according to the
//! [`RetentionPolicy`](torrust_tracker_configuration::RetentionPolicy).
//!
//! # Persistence
//!
//! When `persistent_torrent_completed_stat` is enabled the completed
//! counters are loaded at startup and written back by
//! [`Tracker::checkpoint`]. Swarms are never persisted. A database failure
//! never fails an announce or a scrape; it is returned only by the startup
//! load and the checkpoints.
pub mod databases;
pub mod error;
pub mod persistence;
pub mod services;
pub mod sweeper;

use std::collections::HashMap;
use std::sync::Arc;

use derive_more::Constructor;
use torrust_tracker_clock::clock::Time;
use torrust_tracker_configuration::{Core, TrackerPolicy, TORRENT_PEERS_LIMIT};
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::{Pagination, TorrentsSortKey};
use torrust_tracker_primitives::peer;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;
use torrust_tracker_torrent_repository::pagination::TorrentListing;
use torrust_tracker_torrent_repository::repository::Repository;
use torrust_tracker_torrent_repository::Torrents;
use tracing::{debug, error, warn};

use self::databases::Database;
use self::error::Error;
use self::persistence::TorrentsPersistence;
use self::sweeper::{EvictionSweeper, SweepReport};
use crate::CurrentClock;

/// The domain layer tracker service.
///
/// > **NOTICE**: the `Tracker` is not responsible for handling the network layer.
/// Typically, the `Tracker` is used by a higher application service that handles
/// the network layer.
pub struct Tracker {
    policy: TrackerPolicy,
    persistence: Option<TorrentsPersistence>,
    pub torrents: Arc<Torrents>,
    sweeper: EvictionSweeper<Torrents>,
}

/// Structure that holds the data returned by the `announce` request.
#[derive(Clone, Debug, PartialEq, Constructor, Default)]
pub struct AnnounceData {
    /// The list of peers in the same swarm.
    /// It excludes the peer that made the request.
    pub peers: Vec<Arc<peer::Peer>>,
    /// Swarm statistics
    pub stats: SwarmMetadata,
}

/// Structure that holds the data returned by the `scrape` request.
#[derive(Debug, PartialEq, Default)]
pub struct ScrapeData {
    /// A map of infohashes and swarm metadata for each torrent.
    pub files: HashMap<InfoHash, SwarmMetadata>,
}

impl ScrapeData {
    /// Creates a new empty `ScrapeData` with no files (torrents).
    #[must_use]
    pub fn empty() -> Self {
        let files: HashMap<InfoHash, SwarmMetadata> = HashMap::new();
        Self { files }
    }

    /// Creates a new `ScrapeData` with zeroed metadata for each torrent.
    #[must_use]
    pub fn zeroed(info_hashes: &[InfoHash]) -> Self {
        let mut scrape_data = Self::empty();

        for info_hash in info_hashes {
            scrape_data.add_file_with_zeroed_metadata(info_hash);
        }

        scrape_data
    }

    /// Adds a torrent to the `ScrapeData`.
    pub fn add_file(&mut self, info_hash: &InfoHash, swarm_metadata: SwarmMetadata) {
        self.files.insert(*info_hash, swarm_metadata);
    }

    /// Adds a torrent to the `ScrapeData` with zeroed metadata.
    pub fn add_file_with_zeroed_metadata(&mut self, info_hash: &InfoHash) {
        self.files.insert(*info_hash, SwarmMetadata::zeroed());
    }
}

impl Tracker {
    /// `Tracker` constructor.
    ///
    /// The database is only opened when the completed counters are
    /// persisted. If it can not be opened the error is logged and the
    /// tracker runs without persistence.
    #[must_use]
    pub fn new(config: &Core) -> Tracker {
        let database = if config.tracker_policy.persistent_torrent_completed_stat {
            match databases::driver::build(&config.database.driver, &config.database.path) {
                Ok(database) => Some(Arc::new(database)),
                Err(err) => {
                    error!(%err, driver = %config.database.driver, "unable to open the database, completed counters will not be persisted");
                    None
                }
            }
        } else {
            None
        };

        Self::with_database(&config.tracker_policy, database.as_ref())
    }

    /// A `Tracker` over an already opened database. `None` disables the
    /// persistence of the completed counters.
    #[must_use]
    pub fn with_database(policy: &TrackerPolicy, database: Option<&Arc<Box<dyn Database>>>) -> Tracker {
        let torrents = Arc::new(Torrents::default());
        let persistence = database.map(TorrentsPersistence::new);

        Tracker {
            policy: policy.clone(),
            persistence: persistence.clone(),
            sweeper: EvictionSweeper::new(&torrents, policy, persistence),
            torrents,
        }
    }

    /// Whether the completed counters are persisted.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistence.is_some()
    }

    #[must_use]
    pub fn policy(&self) -> &TrackerPolicy {
        &self.policy
    }

    /// It handles an announce request.
    ///
    /// The peer record replaces any previous record of the same peer. At
    /// most `limit` peers are returned, [`TORRENT_PEERS_LIMIT`] when no
    /// limit is given.
    ///
    /// # Errors
    ///
    /// Will return [`Error::InvalidIdentifier`] if the peer record can not be
    /// stored. The swarm is left untouched.
    pub fn announce(&self, info_hash: &InfoHash, peer: &peer::Peer, limit: Option<usize>) -> Result<AnnounceData, Error> {
        let opt_persisted_completed = self.persisted_completed(info_hash);

        let stats = self.torrents.upsert_peer(info_hash, peer, opt_persisted_completed)?;

        if peer.event.is_completed() {
            self.save_completed(info_hash, stats.downloaded);
        }

        let peers = self
            .torrents
            .get_peers(info_hash, &peer.key(), Some(limit.unwrap_or(TORRENT_PEERS_LIMIT)));

        Ok(AnnounceData { peers, stats })
    }

    /// The durable counter of a torrent that is not in memory yet.
    fn persisted_completed(&self, info_hash: &InfoHash) -> Option<u32> {
        let persistence = self.persistence.as_ref()?;

        if self.torrents.contains(info_hash) {
            return None;
        }

        match persistence.load(info_hash) {
            Ok(completed) => completed,
            Err(err) => {
                warn!(%info_hash, %err, "unable to load the persisted completed counter");
                None
            }
        }
    }

    /// Writes the counter of a torrent through to the database. A resent
    /// `completed` event writes the same value again, which is harmless.
    fn save_completed(&self, info_hash: &InfoHash, completed: u32) {
        let Some(persistence) = &self.persistence else {
            return;
        };

        if let Err(err) = persistence.save(info_hash, completed) {
            warn!(%info_hash, %err, "unable to save the completed counter, it is left to the next checkpoint");
        }
    }

    /// It handles a scrape request. Repeated info-hashes are reported once.
    #[must_use]
    pub fn scrape(&self, info_hashes: &[InfoHash]) -> ScrapeData {
        let mut scrape_data = ScrapeData::empty();

        for info_hash in info_hashes {
            scrape_data.add_file(info_hash, self.get_swarm_metadata(info_hash));
        }

        scrape_data
    }

    /// The swarm metadata of a torrent, zeroed if it is not tracked.
    #[must_use]
    pub fn get_swarm_metadata(&self, info_hash: &InfoHash) -> SwarmMetadata {
        self.torrents.get_swarm_metadata_or_default(info_hash)
    }

    /// Removes a peer from the swarm of a torrent.
    pub fn remove_peer(&self, info_hash: &InfoHash, key: &peer::Key) {
        self.torrents.remove_peer(info_hash, key);
    }

    /// Get all torrent peers for a given torrent, up to [`TORRENT_PEERS_LIMIT`].
    #[must_use]
    pub fn get_torrent_peers(&self, info_hash: &InfoHash) -> Vec<Arc<peer::Peer>> {
        self.torrents.get_torrent_peers(info_hash, Some(TORRENT_PEERS_LIMIT))
    }

    /// A sorted page of the tracked torrents and the total number of torrents.
    #[must_use]
    pub fn get_torrents_page(&self, sort_key: TorrentsSortKey, pagination: &Pagination) -> (Vec<TorrentListing>, usize) {
        self.torrents.list_entries_page(sort_key, pagination)
    }

    /// It calculates and returns the general `Tracker` [`TorrentsMetrics`].
    #[must_use]
    pub fn get_torrents_metrics(&self) -> TorrentsMetrics {
        self.torrents.get_metrics()
    }

    /// Removes the inactive peers and applies the retention policy to the
    /// torrents left without peers.
    pub fn cleanup_torrents(&self) -> SweepReport {
        self.sweeper.sweep(CurrentClock::now())
    }

    /// It loads the completed counters from the database into memory. The
    /// torrents get an empty swarm. Torrents already in memory are kept
    /// as they are.
    ///
    /// Returns how many torrents were loaded.
    ///
    /// # Errors
    ///
    /// Will return [`Error::PersistenceUnavailable`] if the database can not
    /// be read. The repository is left untouched.
    pub fn load_torrents_from_database(&self) -> Result<usize, Error> {
        let Some(persistence) = &self.persistence else {
            return Ok(0);
        };

        let persistent_torrents = persistence.load_all()?;

        Ok(self.torrents.import_persistent(&persistent_torrents))
    }

    /// It writes the completed counter of every torrent in memory to the
    /// database. Returns how many counters were written.
    ///
    /// # Errors
    ///
    /// Will return [`Error::PersistenceUnavailable`] if the counters can not
    /// be written. None of them is stored in that case.
    pub fn checkpoint(&self) -> Result<usize, Error> {
        let Some(persistence) = &self.persistence else {
            return Ok(0);
        };

        let persistent_torrents = self.torrents.export_persistent();

        persistence.save_all(&persistent_torrents)?;

        debug!(torrents = persistent_torrents.len(), "checkpoint saved");

        Ok(persistent_torrents.len())
    }
}
