use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use torrust_tracker_configuration::RetentionPolicy;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::{Pagination, TorrentsSortKey};
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, PersistentTorrents};

use crate::entry::Snapshot;
use crate::pagination::TorrentListing;
use crate::Error;

pub mod dash_map;
pub mod skip_map;

/// The operations on the whole set of torrents.
///
/// Every operation on a single torrent locks only that torrent's entry.
/// Operations on the whole set visit the entries one at a time.
pub trait Repository<T>: Debug + Default + Send + Sync + 'static {
    /// The entry for a torrent, if it is tracked.
    fn get(&self, key: &InfoHash) -> Option<T>;

    fn contains(&self, key: &InfoHash) -> bool {
        self.get(key).is_some()
    }

    /// Aggregated counters over all the torrents, computed on every call,
    /// and the downloads total.
    fn get_metrics(&self) -> TorrentsMetrics;

    /// A sorted page of torrents and the total number of torrents.
    fn list_entries_page(&self, sort_key: TorrentsSortKey, pagination: &Pagination) -> (Vec<TorrentListing>, usize);

    /// Creates an entry with an empty swarm for every persisted torrent that
    /// is not already in the repository. Returns how many were created.
    fn import_persistent(&self, persistent_torrents: &PersistentTorrents) -> usize;

    /// The completed counter of every torrent.
    fn export_persistent(&self) -> PersistentTorrents;

    /// Drops a torrent and its swarm.
    fn remove(&self, key: &InfoHash) -> Option<T>;

    /// Removes, from every swarm, the peers last updated before
    /// `now - timeout`. Returns how many peers were removed.
    fn remove_inactive_peers(&self, now: DurationSinceUnixEpoch, timeout: Duration) -> usize;

    /// Drops the peerless torrents the policy does not keep. Returns how many
    /// torrents were dropped.
    fn apply_retention_policy(&self, now: DurationSinceUnixEpoch, policy: &RetentionPolicy) -> usize {
        self.apply_retention_policy_saving(now, policy, &mut |_| true)
    }

    /// Like [`Repository::apply_retention_policy`], handing the completed
    /// counters of the removable torrents to `save` before any of them is
    /// dropped.
    ///
    /// Nothing is dropped when `save` returns `false`. A torrent whose
    /// counter grew after it was saved is kept until the next call.
    fn apply_retention_policy_saving(
        &self,
        now: DurationSinceUnixEpoch,
        policy: &RetentionPolicy,
        save: &mut dyn FnMut(&PersistentTorrents) -> bool,
    ) -> usize;

    /// Applies an announced peer record to the swarm of a torrent, creating
    /// the entry when the torrent is not tracked yet.
    ///
    /// `opt_persisted_completed` is the durable completed counter of the
    /// torrent, used only when the entry has to be created. An entry that
    /// replaces one retired by a concurrent removal starts from the larger
    /// of that counter and the retired entry's one.
    ///
    /// # Errors
    ///
    /// Will return [`Error::InvalidIdentifier`] if the peer record can not
    /// belong to a swarm. Nothing is changed in that case.
    fn upsert_peer(
        &self,
        info_hash: &InfoHash,
        peer: &peer::Peer,
        opt_persisted_completed: Option<u32>,
    ) -> Result<SwarmMetadata, Error>;

    /// Removes a peer from a swarm. Unknown torrents and peers are ignored.
    fn remove_peer(&self, info_hash: &InfoHash, key: &peer::Key);

    /// Up to `limit` peers of the swarm, excluding the requesting peer.
    fn get_peers(&self, info_hash: &InfoHash, requester: &peer::Key, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;

    /// Up to `limit` peers of the swarm.
    fn get_torrent_peers(&self, info_hash: &InfoHash, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;

    fn get_swarm_metadata(&self, info_hash: &InfoHash) -> Option<SwarmMetadata>;

    /// The swarm metadata, zeroed for torrents that are not tracked.
    fn get_swarm_metadata_or_default(&self, info_hash: &InfoHash) -> SwarmMetadata {
        self.get_swarm_metadata(info_hash).unwrap_or_default()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn count_peerless_torrents(&self) -> usize {
        self.get_metrics().peerless_torrents as usize
    }

    #[allow(clippy::cast_possible_truncation)]
    fn count_peers(&self) -> usize {
        self.get_metrics().peers() as usize
    }
}

/// Adds one entry to the aggregated metrics.
pub(crate) fn add_to_metrics(metrics: &mut TorrentsMetrics, snapshot: &Snapshot) {
    let stats = snapshot.swarm_metadata;

    *metrics += TorrentsMetrics {
        seeders: u64::from(stats.complete),
        completed: u64::from(stats.downloaded),
        leechers: u64::from(stats.incomplete),
        torrents: 1,
        peerless_torrents: u64::from(stats.peers() == 0),
        ..Default::default()
    };
}

pub(crate) fn to_listing(info_hash: &InfoHash, snapshot: &Snapshot) -> TorrentListing {
    TorrentListing {
        info_hash: *info_hash,
        swarm_metadata: snapshot.swarm_metadata,
        created_at: snapshot.created_at,
    }
}
