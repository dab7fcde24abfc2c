use std::sync::Arc;

use torrust_tracker_configuration::RetentionPolicy;
use torrust_tracker_primitives::peer::{self};
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::DurationSinceUnixEpoch;

use super::Entry;
use crate::EntrySingle;

impl Entry for EntrySingle {
    #[allow(clippy::cast_possible_truncation)]
    fn get_swarm_metadata(&self) -> SwarmMetadata {
        let (seeders, leechers) = self.peers.seeders_and_leechers();

        SwarmMetadata {
            downloaded: self.downloaded,
            complete: seeders as u32,
            incomplete: leechers as u32,
        }
    }

    fn is_removable(&self, policy: &RetentionPolicy, now: DurationSinceUnixEpoch) -> bool {
        policy.should_remove(self.peers.len(), self.last_activity, now)
    }

    fn peers_is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    fn get_peers_len(&self) -> usize {
        self.peers.len()
    }

    fn get_peers(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        self.peers.get_all(limit)
    }

    fn get_peers_for_client(&self, client: &peer::Key, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        self.peers.get_peers_excluding(client, limit)
    }

    fn upsert_peer(&mut self, peer: &peer::Peer) -> bool {
        self.last_activity = self.last_activity.max(peer.updated);

        if peer.event.is_stopped() {
            drop(self.peers.remove(&peer.key()));
            return false;
        }

        let previous = self.peers.upsert(Arc::new(*peer));

        // A peer first seen with the completed event is not counted.
        let completed_now = peer.event.is_completed() && previous.is_some_and(|old| !old.event.is_completed());

        if completed_now {
            self.downloaded = self.downloaded.saturating_add(1);
        }

        completed_now
    }

    fn remove_peer(&mut self, key: &peer::Key) -> Option<Arc<peer::Peer>> {
        self.peers.remove(key)
    }

    fn remove_inactive_peers(&mut self, current_cutoff: DurationSinceUnixEpoch) -> usize {
        self.peers.remove_inactive(current_cutoff)
    }
}
