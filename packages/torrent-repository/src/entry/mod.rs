use std::fmt::Debug;
use std::sync::Arc;

use torrust_tracker_configuration::RetentionPolicy;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch};

use self::peer_list::PeerList;

pub mod peer_list;
pub mod rw_lock_parking_lot;
pub mod single;

pub trait Entry {
    /// It returns the swarm metadata (statistics) as a struct:
    ///
    /// `(seeders, completed, leechers)`
    fn get_swarm_metadata(&self) -> SwarmMetadata;

    /// Returns True if the entry has to be dropped under the given
    /// retention policy at time `now`.
    fn is_removable(&self, policy: &RetentionPolicy, now: DurationSinceUnixEpoch) -> bool;

    /// Returns True if the Peers is Empty
    fn peers_is_empty(&self) -> bool;

    /// Returns the number of Peers
    fn get_peers_len(&self) -> usize;

    /// Get all swarm peers, optionally limiting the result.
    fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;

    /// It returns the list of peers for a given peer client, optionally limiting the
    /// result.
    ///
    /// It filters out the input peer, typically because we want to return this
    /// list of peers to that client peer.
    fn get_peers_for_client(&self, client: &peer::Key, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;

    /// It applies the peer record and returns true if the number of completed
    /// downloads has increased.
    ///
    /// A `stopped` event removes the peer. Any other event replaces the
    /// whole record. The completed counter grows when the new record carries
    /// the `completed` event and there is a previous record for the same
    /// peer that did not.
    fn upsert_peer(&mut self, peer: &peer::Peer) -> bool;

    /// It removes a peer from the swarm, returning its last record.
    fn remove_peer(&mut self, key: &peer::Key) -> Option<Arc<peer::Peer>>;

    /// It removes the peers that have not been updated since `current_cutoff`
    /// and returns how many were removed.
    fn remove_inactive_peers(&mut self, current_cutoff: DurationSinceUnixEpoch) -> usize;
}

#[allow(clippy::module_name_repetitions)]
pub trait EntrySync {
    fn get_swarm_metadata(&self) -> SwarmMetadata;
    fn is_removable(&self, policy: &RetentionPolicy, now: DurationSinceUnixEpoch) -> bool;
    fn peers_is_empty(&self) -> bool;
    fn get_peers_len(&self) -> usize;
    fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;
    fn get_peers_for_client(&self, client: &peer::Key, limit: Option<usize>) -> Vec<Arc<peer::Peer>>;
    fn remove_peer(&self, key: &peer::Key) -> Option<Arc<peer::Peer>>;
    fn remove_inactive_peers(&self, current_cutoff: DurationSinceUnixEpoch) -> usize;

    /// Applies the peer record unless the entry has been retired, in which
    /// case the caller holds a stale handle and gets `None`.
    fn upsert_peer_and_get_stats(&self, peer: &peer::Peer) -> Option<(bool, SwarmMetadata)>;

    /// Retires the entry if it is removable under the policy and its
    /// completed counter is not above `saved_completed`, the value already
    /// made durable. A retired entry never accepts peers again.
    fn retire_if_removable(&self, policy: &RetentionPolicy, now: DurationSinceUnixEpoch, saved_completed: u32) -> bool;

    /// Retires the entry unconditionally.
    fn retire(&self);

    fn is_retired(&self) -> bool;

    /// A consistent copy of the entry data, read under a single lock.
    fn snapshot(&self) -> Snapshot;
}

/// A consistent copy of the data of one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub swarm_metadata: SwarmMetadata,
    pub created_at: DurationSinceUnixEpoch,
    pub last_activity: DurationSinceUnixEpoch,
    pub retired: bool,
}

/// A data structure containing all the information about a torrent in the tracker.
///
/// This is the tracker entry for a given torrent and contains the swarm data,
/// that's the list of all the peers trying to download the same torrent.
/// The tracker keeps one entry like this for every torrent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Torrent {
    /// The swarm: a network of peers that are all trying to download the torrent associated to this entry
    pub(crate) peers: PeerList,
    /// The number of peers that have ever completed downloading the torrent associated to this entry
    pub(crate) downloaded: u32,
    /// When the entry was created.
    pub(crate) created_at: DurationSinceUnixEpoch,
    /// The latest `updated` time of any peer record applied to the entry.
    pub(crate) last_activity: DurationSinceUnixEpoch,
    /// Set once the entry has been dropped from the repository.
    pub(crate) retired: bool,
}

impl Torrent {
    /// A new entry with an empty swarm.
    #[must_use]
    pub fn new(downloaded: u32, created_at: DurationSinceUnixEpoch) -> Self {
        Self {
            peers: PeerList::default(),
            downloaded,
            created_at,
            last_activity: created_at,
            retired: false,
        }
    }

    #[must_use]
    pub fn downloaded(&self) -> u32 {
        self.downloaded
    }

    #[must_use]
    pub fn created_at(&self) -> DurationSinceUnixEpoch {
        self.created_at
    }

    #[must_use]
    pub fn last_activity(&self) -> DurationSinceUnixEpoch {
        self.last_activity
    }

    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            swarm_metadata: self.get_swarm_metadata(),
            created_at: self.created_at,
            last_activity: self.last_activity,
            retired: self.retired,
        }
    }
}
