//! The periodic eviction of stale peers and peerless torrents.
//!
//! A sweep first drops, from every swarm, the peers that did not announce
//! within the peer timeout, and then applies the retention policy to the
//! torrents left without peers. The repository visits the entries one at a
//! time, so a sweep never holds more than one entry lock.
//!
//! With persistence enabled the completed counters of the torrents about to
//! be dropped are stored first. When that fails the torrents are kept.
use std::sync::Arc;

use torrust_tracker_configuration::TrackerPolicy;
use torrust_tracker_primitives::{DurationSinceUnixEpoch, PersistentTorrents};
use torrust_tracker_torrent_repository::repository::Repository;
use torrust_tracker_torrent_repository::EntryRwLockParkingLot;
use tracing::{debug, error};

use super::persistence::TorrentsPersistence;

/// What a sweep removed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub inactive_peers: usize,
    pub removed_torrents: usize,
}

pub struct EvictionSweeper<R> {
    torrents: Arc<R>,
    policy: TrackerPolicy,
    persistence: Option<TorrentsPersistence>,
}

impl<R> EvictionSweeper<R>
where
    R: Repository<EntryRwLockParkingLot>,
{
    #[must_use]
    pub fn new(torrents: &Arc<R>, policy: &TrackerPolicy, persistence: Option<TorrentsPersistence>) -> Self {
        Self {
            torrents: torrents.clone(),
            policy: policy.clone(),
            persistence,
        }
    }

    /// Runs one sweep as of `now`.
    pub fn sweep(&self, now: DurationSinceUnixEpoch) -> SweepReport {
        let inactive_peers = self.torrents.remove_inactive_peers(now, self.policy.peer_timeout());

        let removed_torrents =
            self.torrents
                .apply_retention_policy_saving(now, &self.policy.retention_policy, &mut |torrents| self.save(torrents));

        let report = SweepReport {
            inactive_peers,
            removed_torrents,
        };

        debug!(?report, "sweep finished");

        report
    }

    fn save(&self, torrents: &PersistentTorrents) -> bool {
        let Some(persistence) = &self.persistence else {
            return true;
        };

        match persistence.save_all(torrents) {
            Ok(()) => true,
            Err(err) => {
                error!(%err, torrents = torrents.len(), "unable to save the completed counters of the peerless torrents, they are kept");
                false
            }
        }
    }
}
