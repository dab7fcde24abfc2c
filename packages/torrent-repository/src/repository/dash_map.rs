use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use torrust_tracker_clock::clock::Time;
use torrust_tracker_configuration::RetentionPolicy;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::{Pagination, TorrentsSortKey};
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;
use torrust_tracker_primitives::{peer, DurationSinceUnixEpoch, PersistentTorrents};
use tracing::{debug, info};

use super::{add_to_metrics, to_listing, Repository};
use crate::entry::EntrySync;
use crate::error::validate_peer;
use crate::pagination::{paginate, TorrentListing};
use crate::{CurrentClock, EntryRwLockParkingLot, EntrySingle, Error, TORRENT_REPOSITORY_LOG_TARGET};

/// A repository over a sharded `DashMap`.
///
/// A shard guard is never held while waiting for a map operation on the
/// same map: entries are cloned out of the map before their lock is taken
/// for a write that may be followed by a removal.
#[derive(Default, Debug)]
pub struct XacrimonDashMap<T> {
    pub torrents: DashMap<InfoHash, T>,
    /// Downloads counted since startup. Never lowered by a removal.
    downloads: AtomicU64,
}

impl XacrimonDashMap<EntryRwLockParkingLot> {
    /// Removes the node for `info_hash` only if it still holds `entry`.
    fn remove_node(&self, info_hash: &InfoHash, entry: &EntryRwLockParkingLot) {
        drop(self.torrents.remove_if(info_hash, |_, current| Arc::ptr_eq(current, entry)));
    }
}

impl Repository<EntryRwLockParkingLot> for XacrimonDashMap<EntryRwLockParkingLot>
where
    EntryRwLockParkingLot: EntrySync,
{
    fn upsert_peer(
        &self,
        info_hash: &InfoHash,
        peer: &peer::Peer,
        opt_persisted_completed: Option<u32>,
    ) -> Result<SwarmMetadata, Error> {
        validate_peer(peer)?;

        let mut opt_completed = opt_persisted_completed;

        loop {
            // The shard guard is released at the end of this statement.
            let entry = self
                .torrents
                .entry(*info_hash)
                .or_insert_with(|| EntrySingle::new(opt_completed.unwrap_or_default(), peer.updated).into())
                .value()
                .clone();

            if let Some((counted, stats)) = entry.upsert_peer_and_get_stats(peer) {
                if counted {
                    self.downloads.fetch_add(1, Ordering::Relaxed);
                }
                return Ok(stats);
            }

            // Retired by a sweep: the next entry keeps its counter.
            opt_completed = opt_completed.max(Some(entry.get_swarm_metadata().downloaded));
            self.remove_node(info_hash, &entry);
        }
    }

    fn remove_peer(&self, info_hash: &InfoHash, key: &peer::Key) {
        if let Some(entry) = self.get(info_hash) {
            drop(entry.remove_peer(key));
        }
    }

    fn get_peers(&self, info_hash: &InfoHash, requester: &peer::Key, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        match self.get(info_hash) {
            Some(entry) => entry.get_peers_for_client(requester, limit),
            None => vec![],
        }
    }

    fn get_torrent_peers(&self, info_hash: &InfoHash, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        match self.get(info_hash) {
            Some(entry) => entry.get_peers(limit),
            None => vec![],
        }
    }

    fn get_swarm_metadata(&self, info_hash: &InfoHash) -> Option<SwarmMetadata> {
        self.get(info_hash).map(|entry| entry.get_swarm_metadata())
    }

    fn get(&self, key: &InfoHash) -> Option<EntryRwLockParkingLot> {
        let maybe_entry = self.torrents.get(key);
        maybe_entry.map(|entry| entry.value().clone())
    }

    fn get_metrics(&self) -> TorrentsMetrics {
        let mut metrics = TorrentsMetrics {
            downloads: self.downloads.load(Ordering::Relaxed),
            ..Default::default()
        };

        for entry in &self.torrents {
            let snapshot = entry.value().snapshot();
            if !snapshot.retired {
                add_to_metrics(&mut metrics, &snapshot);
            }
        }

        metrics
    }

    fn list_entries_page(&self, sort_key: TorrentsSortKey, pagination: &Pagination) -> (Vec<TorrentListing>, usize) {
        let listings = self
            .torrents
            .iter()
            .filter_map(|entry| {
                let snapshot = entry.value().snapshot();
                (!snapshot.retired).then(|| to_listing(entry.key(), &snapshot))
            })
            .collect();

        paginate(listings, sort_key, pagination)
    }

    fn import_persistent(&self, persistent_torrents: &PersistentTorrents) -> usize {
        let now = CurrentClock::now();
        let mut imported = 0;

        for (info_hash, completed) in persistent_torrents {
            if self.torrents.contains_key(info_hash) {
                continue;
            }

            let mut created = false;
            drop(self.torrents.entry(*info_hash).or_insert_with(|| {
                created = true;
                EntrySingle::new(*completed, now).into()
            }));

            if created {
                imported += 1;
                self.downloads.fetch_add(u64::from(*completed), Ordering::Relaxed);
            }
        }

        debug!(target: TORRENT_REPOSITORY_LOG_TARGET, imported, "imported persisted torrents");

        imported
    }

    fn export_persistent(&self) -> PersistentTorrents {
        self.torrents
            .iter()
            .filter_map(|entry| {
                let snapshot = entry.value().snapshot();
                (!snapshot.retired).then_some((*entry.key(), snapshot.swarm_metadata.downloaded))
            })
            .collect()
    }

    fn remove(&self, key: &InfoHash) -> Option<EntryRwLockParkingLot> {
        let entry = self.get(key)?;

        entry.retire();
        self.remove_node(key, &entry);

        Some(entry)
    }

    fn remove_inactive_peers(&self, now: DurationSinceUnixEpoch, timeout: Duration) -> usize {
        let current_cutoff = now.saturating_sub(timeout);
        let mut removed = 0;

        for entry in &self.torrents {
            removed += entry.value().remove_inactive_peers(current_cutoff);
        }

        if removed > 0 {
            info!(target: TORRENT_REPOSITORY_LOG_TARGET, removed, "removed inactive peers");
        }

        removed
    }

    fn apply_retention_policy_saving(
        &self,
        now: DurationSinceUnixEpoch,
        policy: &RetentionPolicy,
        save: &mut dyn FnMut(&PersistentTorrents) -> bool,
    ) -> usize {
        if *policy == RetentionPolicy::Persist {
            return 0;
        }

        // Removing while iterating would wait on the shard guard held by the
        // iterator, so the candidates are collected first.
        let candidates: Vec<(InfoHash, EntryRwLockParkingLot, u32)> = self
            .torrents
            .iter()
            .filter(|entry| !entry.value().is_retired() && entry.value().is_removable(policy, now))
            .map(|entry| {
                let downloaded = entry.value().get_swarm_metadata().downloaded;
                (*entry.key(), entry.value().clone(), downloaded)
            })
            .collect();

        let removable: PersistentTorrents = candidates
            .iter()
            .map(|(info_hash, _, downloaded)| (*info_hash, *downloaded))
            .collect();

        if removable.is_empty() || !save(&removable) {
            return 0;
        }

        let retired: Vec<(InfoHash, EntryRwLockParkingLot)> = candidates
            .into_iter()
            .filter(|(_, entry, saved_completed)| entry.retire_if_removable(policy, now, *saved_completed))
            .map(|(info_hash, entry, _)| (info_hash, entry))
            .collect();

        for (info_hash, entry) in &retired {
            self.remove_node(info_hash, entry);
        }

        if !retired.is_empty() {
            info!(target: TORRENT_REPOSITORY_LOG_TARGET, removed = retired.len(), ?policy, "removed peerless torrents");
        }

        retired.len()
    }
}
