//! Core tracker domain services.
//!
//! There are three services:
//!
//! - [`get_torrent_info`]: it returns all the data about one torrent.
//! - [`get_torrents_page`]: it returns a sorted page of torrents excluding the peer list.
//! - [`get_torrents`]: it returns data about some torrents in bulk excluding the peer list.
use std::sync::Arc;

use serde::Serialize;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::{Pagination, TorrentsSortKey};
use torrust_tracker_primitives::peer;
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_torrent_repository::entry::EntrySync;
use torrust_tracker_torrent_repository::pagination::TorrentListing;
use torrust_tracker_torrent_repository::repository::Repository;

use crate::core::Tracker;

/// It contains all the information the tracker has about a torrent
#[derive(Debug, PartialEq, Serialize)]
pub struct Info {
    /// The infohash of the torrent this data is related to
    pub info_hash: InfoHash,
    /// The total number of seeders for this torrent. Peer that actively serving a full copy of the torrent data
    pub seeders: u64,
    /// The total number of peers that have ever complete downloading this torrent
    pub completed: u64,
    /// The total number of leechers for this torrent. Peers that actively downloading this torrent
    pub leechers: u64,
    /// The swarm: the list of peers that are actively trying to download or serving this torrent
    pub peers: Option<Vec<peer::Peer>>,
}

/// It contains only part of the information the tracker has about a torrent
///
/// It contains the same data as [Info] but without the list of peers in the swarm.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct BasicInfo {
    /// The infohash of the torrent this data is related to
    pub info_hash: InfoHash,
    /// The total number of seeders for this torrent. Peer that actively serving a full copy of the torrent data
    pub seeders: u64,
    /// The total number of peers that have ever complete downloading this torrent
    pub completed: u64,
    /// The total number of leechers for this torrent. Peers that actively downloading this torrent
    pub leechers: u64,
}

impl BasicInfo {
    fn new(info_hash: &InfoHash, stats: &SwarmMetadata) -> Self {
        Self {
            info_hash: *info_hash,
            seeders: u64::from(stats.complete),
            completed: u64::from(stats.downloaded),
            leechers: u64::from(stats.incomplete),
        }
    }
}

impl From<TorrentListing> for BasicInfo {
    fn from(listing: TorrentListing) -> Self {
        Self::new(&listing.info_hash, &listing.swarm_metadata)
    }
}

/// It returns all the information the tracker has about one torrent in a [Info] struct.
#[must_use]
pub fn get_torrent_info(tracker: &Arc<Tracker>, info_hash: &InfoHash) -> Option<Info> {
    let torrent_entry = tracker.torrents.get(info_hash)?;

    let stats = torrent_entry.get_swarm_metadata();

    let peers = torrent_entry.get_peers(None);

    let peers = Some(peers.iter().map(|peer| (**peer)).collect());

    Some(Info {
        info_hash: *info_hash,
        seeders: u64::from(stats.complete),
        completed: u64::from(stats.downloaded),
        leechers: u64::from(stats.incomplete),
        peers,
    })
}

/// It returns a sorted page of torrents and the total number of torrents.
#[must_use]
pub fn get_torrents_page(tracker: &Arc<Tracker>, sort_key: TorrentsSortKey, pagination: &Pagination) -> (Vec<BasicInfo>, usize) {
    let (listings, total) = tracker.get_torrents_page(sort_key, pagination);

    (listings.into_iter().map(BasicInfo::from).collect(), total)
}

/// It returns the [`BasicInfo`] of the requested torrents the tracker has,
/// in the requested order.
#[must_use]
pub fn get_torrents(tracker: &Arc<Tracker>, info_hashes: &[InfoHash]) -> Vec<BasicInfo> {
    info_hashes
        .iter()
        .filter_map(|info_hash| {
            tracker
                .torrents
                .get_swarm_metadata(info_hash)
                .map(|stats| BasicInfo::new(info_hash, &stats))
        })
        .collect()
}
