//! Sorted, paged listings of the torrents in a repository.
//!
//! A page is cut from the whole set of entries after sorting it with a total
//! order: the requested key first and the info-hash to break ties. For a
//! fixed repository state the same request always returns the same slice,
//! and walking all the pages yields every torrent exactly once.
use std::cmp::Ordering;

use serde::Serialize;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::{Pagination, TorrentsSortKey};
use torrust_tracker_primitives::swarm_metadata::SwarmMetadata;
use torrust_tracker_primitives::DurationSinceUnixEpoch;

/// One torrent in a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TorrentListing {
    pub info_hash: InfoHash,
    pub swarm_metadata: SwarmMetadata,
    #[serde(serialize_with = "torrust_tracker_primitives::peer::ser_unix_time_value")]
    pub created_at: DurationSinceUnixEpoch,
}

fn compare(sort_key: TorrentsSortKey, a: &TorrentListing, b: &TorrentListing) -> Ordering {
    let by_key = match sort_key {
        TorrentsSortKey::InfoHash => Ordering::Equal,
        TorrentsSortKey::Peers => b.swarm_metadata.peers().cmp(&a.swarm_metadata.peers()),
        TorrentsSortKey::Completed => b.swarm_metadata.downloaded.cmp(&a.swarm_metadata.downloaded),
    };

    by_key.then_with(|| a.info_hash.cmp(&b.info_hash))
}

/// Sorts the listings and returns the requested page plus the total number
/// of listings.
#[must_use]
pub fn paginate(
    mut listings: Vec<TorrentListing>,
    sort_key: TorrentsSortKey,
    pagination: &Pagination,
) -> (Vec<TorrentListing>, usize) {
    let total = listings.len();

    listings.sort_unstable_by(|a, b| compare(sort_key, a, b));

    let page = listings
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.page_size as usize)
        .collect();

    (page, total)
}
