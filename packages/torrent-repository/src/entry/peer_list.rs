//! The swarm of one torrent.
use std::sync::Arc;

use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch};

/// Peers keyed by their swarm identity: peer id plus socket address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeerList {
    peers: std::collections::BTreeMap<peer::Key, Arc<peer::Peer>>,
}

impl PeerList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Replaces the whole record of the peer, returning the previous one.
    pub fn upsert(&mut self, value: Arc<peer::Peer>) -> Option<Arc<peer::Peer>> {
        self.peers.insert(value.key(), value)
    }

    pub fn remove(&mut self, key: &peer::Key) -> Option<Arc<peer::Peer>> {
        self.peers.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &peer::Key) -> Option<&Arc<peer::Peer>> {
        self.peers.get(key)
    }

    /// Removes the peers last updated before `cutoff` and returns how many
    /// were removed.
    pub fn remove_inactive(&mut self, cutoff: DurationSinceUnixEpoch) -> usize {
        let before = self.peers.len();
        self.peers.retain(|_, peer| peer.updated >= cutoff);
        before - self.peers.len()
    }

    #[must_use]
    pub fn seeders_and_leechers(&self) -> (usize, usize) {
        let seeders = self.peers.values().filter(|peer| peer.is_seeder()).count();
        let leechers = self.len() - seeders;

        (seeders, leechers)
    }

    #[must_use]
    pub fn get_all(&self, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        match limit {
            Some(limit) => self.peers.values().take(limit).cloned().collect(),
            None => self.peers.values().cloned().collect(),
        }
    }

    /// The peers other than `client`, in key order.
    #[must_use]
    pub fn get_peers_excluding(&self, client: &peer::Key, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        let others = self.peers.iter().filter(|(key, _)| *key != client).map(|(_, peer)| peer.clone());

        match limit {
            Some(limit) => others.take(limit).collect(),
            None => others.collect(),
        }
    }
}
