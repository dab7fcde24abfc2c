use std::sync::Arc;

use torrust_tracker_configuration::RetentionPolicy;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch};

use super::{Entry, EntrySync, Snapshot};
use crate::{EntryRwLockParkingLot, EntrySingle};

impl EntrySync for EntryRwLockParkingLot {
    fn get_swarm_metadata(&self) -> SwarmMetadata {
        self.read().get_swarm_metadata()
    }

    fn is_removable(&self, policy: &RetentionPolicy, now: DurationSinceUnixEpoch) -> bool {
        self.read().is_removable(policy, now)
    }

    fn peers_is_empty(&self) -> bool {
        self.read().peers_is_empty()
    }

    fn get_peers_len(&self) -> usize {
        self.read().get_peers_len()
    }

    fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        self.read().get_peers(limit)
    }

    fn get_peers_for_client(&self, client: &peer::Key, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        self.read().get_peers_for_client(client, limit)
    }

    fn remove_peer(&self, key: &peer::Key) -> Option<Arc<peer::Peer>> {
        self.write().remove_peer(key)
    }

    fn remove_inactive_peers(&self, current_cutoff: DurationSinceUnixEpoch) -> usize {
        self.write().remove_inactive_peers(current_cutoff)
    }

    fn upsert_peer_and_get_stats(&self, peer: &peer::Peer) -> Option<(bool, SwarmMetadata)> {
        let mut entry = self.write();

        if entry.retired {
            return None;
        }

        let completed_now = entry.upsert_peer(peer);

        Some((completed_now, entry.get_swarm_metadata()))
    }

    fn retire_if_removable(&self, policy: &RetentionPolicy, now: DurationSinceUnixEpoch, saved_completed: u32) -> bool {
        let mut entry = self.write();

        if entry.retired || entry.downloaded > saved_completed || !entry.is_removable(policy, now) {
            return false;
        }

        entry.retired = true;
        true
    }

    fn retire(&self) {
        self.write().retired = true;
    }

    fn is_retired(&self) -> bool {
        self.read().retired
    }

    fn snapshot(&self) -> Snapshot {
        self.read().snapshot()
    }
}

impl From<EntrySingle> for EntryRwLockParkingLot {
    fn from(entry: EntrySingle) -> Self {
        Arc::new(parking_lot::RwLock::new(entry))
    }
}
