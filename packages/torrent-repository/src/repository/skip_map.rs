use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_skiplist::SkipMap;
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

#[derive(Default, Debug)]
pub struct CrossbeamSkipList<T> {
    pub torrents: SkipMap<InfoHash, T>,
    /// Downloads counted since startup. Never lowered by a removal.
    downloads: AtomicU64,
}

impl Repository<EntryRwLockParkingLot> for CrossbeamSkipList<EntryRwLockParkingLot>
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
            let entry = self.torrents.get_or_insert_with(*info_hash, || {
                EntrySingle::new(opt_completed.unwrap_or_default(), peer.updated).into()
            });

            if let Some((counted, stats)) = entry.value().upsert_peer_and_get_stats(peer) {
                if counted {
                    self.downloads.fetch_add(1, Ordering::Relaxed);
                }
                return Ok(stats);
            }

            // The entry was retired by a sweep. Drop its node if the sweep
            // has not done it yet and start over with a new entry that keeps
            // the retired counter.
            opt_completed = opt_completed.max(Some(entry.value().get_swarm_metadata().downloaded));
            entry.remove();
        }
    }

    fn remove_peer(&self, info_hash: &InfoHash, key: &peer::Key) {
        if let Some(entry) = self.torrents.get(info_hash) {
            drop(entry.value().remove_peer(key));
        }
    }

    fn get_peers(&self, info_hash: &InfoHash, requester: &peer::Key, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        match self.torrents.get(info_hash) {
            Some(entry) => entry.value().get_peers_for_client(requester, limit),
            None => vec![],
        }
    }

    fn get_torrent_peers(&self, info_hash: &InfoHash, limit: Option<usize>) -> Vec<Arc<peer::Peer>> {
        match self.torrents.get(info_hash) {
            Some(entry) => entry.value().get_peers(limit),
            None => vec![],
        }
    }

    fn get_swarm_metadata(&self, info_hash: &InfoHash) -> Option<SwarmMetadata> {
        self.torrents.get(info_hash).map(|entry| entry.value().get_swarm_metadata())
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

            // Since SkipMap is lock-free the torrent could have been inserted
            // after checking if it exists.
            let mut created = false;
            self.torrents.get_or_insert_with(*info_hash, || {
                created = true;
                EntrySingle::new(*completed, now).into()
            });

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
        let entry = self.torrents.get(key)?;

        entry.value().retire();
        entry.remove();

        Some(entry.value().clone())
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

        let removable: PersistentTorrents = self
            .torrents
            .iter()
            .filter(|entry| !entry.value().is_retired() && entry.value().is_removable(policy, now))
            .map(|entry| (*entry.key(), entry.value().get_swarm_metadata().downloaded))
            .collect();

        if removable.is_empty() || !save(&removable) {
            return 0;
        }

        let mut removed = 0;

        for (info_hash, saved_completed) in &removable {
            let Some(entry) = self.torrents.get(info_hash) else {
                continue;
            };

            if entry.value().retire_if_removable(policy, now, *saved_completed) {
                entry.remove();
                removed += 1;
            }
        }

        if removed > 0 {
            info!(target: TORRENT_REPOSITORY_LOG_TARGET, removed, ?policy, "removed peerless torrents");
        }

        removed
    }
}
