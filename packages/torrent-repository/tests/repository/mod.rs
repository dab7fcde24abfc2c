use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hasher;
use std::time::Duration;

use rstest::{fixture, rstest};
use torrust_tracker_clock::clock::Time as _;
use torrust_tracker_configuration::RetentionPolicy;
use torrust_tracker_primitives::announce_event::AnnounceEvent;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::{Pagination, TorrentsSortKey};
use torrust_tracker_primitives::peer::Peer;
use torrust_tracker_primitives::torrent_metrics::TorrentsMetrics;
use torrust_tracker_primitives::{NumberOfBytes, PersistentTorrents};
use torrust_tracker_torrent_repository::entry::Entry as _;
use torrust_tracker_torrent_repository::{EntrySingle, Error, TorrentsDashMapRwLockParkingLot, TorrentsSkipMapRwLockParkingLot};

use crate::common::repo::Repo;
use crate::common::torrent_peer_builder::{a_completed_peer, a_peer_updated_at, a_peer_without_port, a_started_peer};
use crate::CurrentClock;

#[fixture]
fn skip_list() -> Repo {
    Repo::SkipMapRwLockParkingLot(TorrentsSkipMapRwLockParkingLot::default())
}

#[fixture]
fn dash_map() -> Repo {
    Repo::DashMapRwLockParkingLot(TorrentsDashMapRwLockParkingLot::default())
}

/// The announces applied to each torrent, in order.
type Entries = Vec<(InfoHash, Vec<Peer>)>;

fn hashed(i: i32) -> InfoHash {
    let hash = &mut DefaultHasher::default();
    hash.write_i32(i);
    InfoHash::from(&hash.clone())
}

fn downloaded_peer(id: i32) -> Vec<Peer> {
    let started = a_started_peer(id);
    let mut completed = started;
    completed.event = AnnounceEvent::Completed;
    completed.left = NumberOfBytes(0);
    vec![started, completed]
}

#[fixture]
fn empty() -> Entries {
    vec![]
}

/// A torrent whose only peer has left.
#[fixture]
fn default() -> Entries {
    let mut peer = a_started_peer(1);
    peer.event = AnnounceEvent::Stopped;
    vec![(InfoHash::default(), vec![peer])]
}

#[fixture]
fn started() -> Entries {
    vec![(InfoHash::default(), vec![a_started_peer(1)])]
}

#[fixture]
fn completed() -> Entries {
    vec![(InfoHash::default(), vec![a_completed_peer(2)])]
}

#[fixture]
fn downloaded() -> Entries {
    vec![(InfoHash::default(), downloaded_peer(3))]
}

#[fixture]
fn three() -> Entries {
    vec![
        (hashed(1), vec![a_started_peer(1)]),
        (hashed(2), vec![a_completed_peer(2)]),
        (hashed(3), downloaded_peer(3)),
    ]
}

#[fixture]
fn many_out_of_order() -> Entries {
    let mut entries: HashSet<(InfoHash, i32)> = HashSet::default();

    for i in 0..408 {
        entries.insert((InfoHash::from(i), i));
    }

    // we keep the random order from the hashed set for the vector.
    entries.iter().map(|(h, i)| (*h, vec![a_started_peer(*i)])).collect()
}

#[fixture]
fn many_hashed_in_order() -> Entries {
    let mut entries: BTreeMap<InfoHash, Vec<Peer>> = BTreeMap::default();

    for i in 0..408 {
        let peers = if i % 3 == 0 { downloaded_peer(i) } else { vec![a_started_peer(i)] };
        entries.insert(hashed(i), peers);
    }

    // We return the entries in-order from from the b-tree map.
    entries.into_iter().collect()
}

#[fixture]
fn persistent_empty() -> PersistentTorrents {
    PersistentTorrents::default()
}

#[fixture]
fn persistent_single() -> PersistentTorrents {
    let t = [(hashed(-1), 0_u32)];

    t.iter().copied().collect()
}

#[fixture]
fn persistent_three() -> PersistentTorrents {
    let t = [(hashed(-1), 1_u32), (hashed(-2), 2_u32), (hashed(-3), 3_u32)];

    t.iter().copied().collect()
}

#[fixture]
fn paginated_limit_zero() -> Pagination {
    Pagination::new(0, 0)
}

#[fixture]
fn paginated_limit_one() -> Pagination {
    Pagination::new(0, 1)
}

#[fixture]
fn paginated_limit_one_offset_one() -> Pagination {
    Pagination::new(1, 1)
}

#[fixture]
fn policy_persist() -> RetentionPolicy {
    RetentionPolicy::Persist
}

#[fixture]
fn policy_remove() -> RetentionPolicy {
    RetentionPolicy::Remove
}

#[fixture]
fn policy_remove_after_an_hour() -> RetentionPolicy {
    RetentionPolicy::RemoveAfter(Duration::from_secs(3600))
}

fn make(repo: &Repo, entries: &Entries) {
    for (info_hash, peers) in entries {
        for peer in peers {
            repo.upsert_peer(info_hash, peer, None).expect("it should accept the peer");
        }
    }
}

/// The same announces applied to plain entries.
fn expected(entries: &Entries) -> BTreeMap<InfoHash, EntrySingle> {
    let mut torrents: BTreeMap<InfoHash, EntrySingle> = BTreeMap::default();

    for (info_hash, peers) in entries {
        let torrent = torrents.entry(*info_hash).or_default();
        for peer in peers {
            torrent.upsert_peer(peer);
        }
    }

    torrents
}

fn all_info_hashes(repo: &Repo, sort_key: TorrentsSortKey) -> Vec<InfoHash> {
    repo.list_entries_page(sort_key, &Pagination::new(0, u32::MAX))
        .0
        .iter()
        .map(|l| l.info_hash)
        .collect()
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::started(started())]
#[case::completed(completed())]
#[case::downloaded(downloaded())]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_get_a_torrent_entry(#[values(skip_list(), dash_map())] repo: Repo, #[case] entries: Entries) {
    make(&repo, &entries);

    if let Some((info_hash, _)) = entries.first() {
        let torrent = &expected(&entries)[info_hash];
        assert_eq!(repo.get(info_hash), Some(torrent.get_swarm_metadata()));
    } else {
        assert_eq!(repo.get(&InfoHash::default()), None);
    }
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::started(started())]
#[case::completed(completed())]
#[case::downloaded(downloaded())]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_list_the_entries_in_info_hash_order_by_default(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[case] entries: Entries,
    many_out_of_order: Entries,
) {
    make(&repo, &entries);

    let entries_a = all_info_hashes(&repo, TorrentsSortKey::default());

    make(&repo, &many_out_of_order);

    let entries_b = all_info_hashes(&repo, TorrentsSortKey::default());

    assert!(entries_a.windows(2).all(|w| w[0] < w[1]));
    assert!(entries_b.windows(2).all(|w| w[0] < w[1]));
    assert!(entries_a.iter().all(|h| entries_b.contains(h)));
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::started(started())]
#[case::completed(completed())]
#[case::downloaded(downloaded())]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_get_paginated(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[case] entries: Entries,
    #[values(paginated_limit_zero(), paginated_limit_one(), paginated_limit_one_offset_one())] paginated: Pagination,
) {
    make(&repo, &entries);

    let mut info_hashes = entries.iter().map(|(i, _)| *i).collect::<Vec<_>>();
    info_hashes.sort();

    let (page, total) = repo.list_entries_page(TorrentsSortKey::InfoHash, &paginated);

    // the total does not depend on the page.
    assert_eq!(total, info_hashes.len());

    match paginated {
        // it should return empty if the page size is zero.
        Pagination { page_size: 0, .. } => assert!(page.is_empty()),

        // it should return a single entry if the page size is one.
        Pagination { page_size: 1, page: 0 } => {
            if info_hashes.is_empty() {
                assert_eq!(page.len(), 0);
            } else {
                assert_eq!(page.len(), 1);
                assert_eq!(page.first().map(|l| &l.info_hash), info_hashes.first());
            }
        }

        // it should return only the second entry if both the page and the page size are one.
        Pagination { page_size: 1, page: 1 } => {
            if info_hashes.len() > 1 {
                assert_eq!(page.len(), 1);
                assert_eq!(page[0].info_hash, info_hashes[1]);
            } else {
                assert!(page.is_empty());
            }
        }
        // the other cases are not yet tested.
        _ => {}
    }
}

#[rstest]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_return_every_torrent_exactly_once_when_walking_all_the_pages(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[case] entries: Entries,
    #[values(TorrentsSortKey::InfoHash, TorrentsSortKey::Peers, TorrentsSortKey::Completed)] sort_key: TorrentsSortKey,
    #[values(1, 7, 100)] page_size: u32,
) {
    make(&repo, &entries);

    let mut seen = Vec::new();
    let mut page_number = 0;

    loop {
        let (page, total) = repo.list_entries_page(sort_key, &Pagination::new(page_number, page_size));

        assert_eq!(total, entries.len());

        if page.is_empty() {
            break;
        }

        seen.extend(page.iter().map(|l| l.info_hash));
        page_number += 1;
    }

    let unique: HashSet<InfoHash> = seen.iter().copied().collect();

    assert_eq!(seen.len(), entries.len());
    assert_eq!(unique.len(), entries.len());
    assert_eq!(seen, all_info_hashes(&repo, sort_key));
}

#[rstest]
#[case::three(three())]
#[case::in_order(many_hashed_in_order())]
fn it_should_list_the_most_completed_torrents_first(#[values(skip_list(), dash_map())] repo: Repo, #[case] entries: Entries) {
    make(&repo, &entries);

    let (page, _) = repo.list_entries_page(TorrentsSortKey::Completed, &Pagination::default());

    assert!(page.windows(2).all(|w| {
        let (a, b) = (&w[0], &w[1]);
        a.swarm_metadata.downloaded > b.swarm_metadata.downloaded
            || (a.swarm_metadata.downloaded == b.swarm_metadata.downloaded && a.info_hash < b.info_hash)
    }));
}

#[rstest]
fn it_should_list_the_largest_swarms_first(#[values(skip_list(), dash_map())] repo: Repo) {
    for i in 1..=3 {
        for peer in 0..i {
            repo.upsert_peer(&hashed(i), &a_started_peer(peer), None)
                .expect("it should accept the peer");
        }
    }

    let (page, _) = repo.list_entries_page(TorrentsSortKey::Peers, &Pagination::default());

    assert_eq!(page.iter().map(|l| l.info_hash).collect::<Vec<_>>(), vec![hashed(3), hashed(2), hashed(1)]);
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::started(started())]
#[case::completed(completed())]
#[case::downloaded(downloaded())]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_get_metrics(#[values(skip_list(), dash_map())] repo: Repo, #[case] entries: Entries) {
    make(&repo, &entries);

    let mut metrics = TorrentsMetrics::default();

    for torrent in expected(&entries).values() {
        let stats = torrent.get_swarm_metadata();

        metrics.torrents += 1;
        metrics.leechers += u64::from(stats.incomplete);
        metrics.seeders += u64::from(stats.complete);
        metrics.completed += u64::from(stats.downloaded);
        metrics.peerless_torrents += u64::from(stats.peers() == 0);
        metrics.downloads += u64::from(stats.downloaded);
    }

    assert_eq!(repo.get_metrics(), metrics);
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::started(started())]
#[case::completed(completed())]
#[case::downloaded(downloaded())]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_import_persistent_torrents(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[case] entries: Entries,
    #[values(persistent_empty(), persistent_single(), persistent_three())] persistent_torrents: PersistentTorrents,
) {
    make(&repo, &entries);

    let mut downloaded = repo.get_metrics().completed;
    persistent_torrents.iter().for_each(|(_, d)| downloaded += u64::from(*d));

    let imported = repo.import_persistent(&persistent_torrents);

    assert_eq!(imported, persistent_torrents.len());
    assert_eq!(repo.get_metrics().completed, downloaded);

    for (entry, completed) in persistent_torrents {
        let stats = repo.get(&entry).expect("it should be imported");
        assert_eq!(stats.downloaded, completed);
        assert_eq!(stats.peers(), 0);
    }
}

#[rstest]
fn it_should_not_overwrite_a_live_torrent_when_importing(#[values(skip_list(), dash_map())] repo: Repo) {
    let info_hash = hashed(1);

    for peer in &downloaded_peer(1) {
        repo.upsert_peer(&info_hash, peer, None).expect("it should accept the peer");
    }

    let imported = repo.import_persistent(&[(info_hash, 100)].into_iter().collect());

    assert_eq!(imported, 0);
    assert_eq!(repo.get(&info_hash).map(|s| (s.downloaded, s.complete)), Some((1, 1)));
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::three(three())]
#[case::in_order(many_hashed_in_order())]
fn it_should_export_the_completed_counter_of_every_torrent(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[case] entries: Entries,
) {
    make(&repo, &entries);

    let exported: PersistentTorrents = expected(&entries)
        .iter()
        .map(|(info_hash, torrent)| (*info_hash, torrent.downloaded()))
        .collect();

    assert_eq!(repo.export_persistent(), exported);
}

#[rstest]
fn it_should_seed_a_new_entry_with_the_persisted_counter(#[values(skip_list(), dash_map())] repo: Repo) {
    let info_hash = hashed(1);

    let [started, completed] = <[Peer; 2]>::try_from(downloaded_peer(1)).expect("it should be two announces");

    let stats = repo.upsert_peer(&info_hash, &started, Some(5)).expect("it should accept the peer");

    assert_eq!(stats.downloaded, 5);

    let stats = repo.upsert_peer(&info_hash, &completed, None).expect("it should accept the peer");

    assert_eq!(stats.downloaded, 6);

    // the persisted counter is only used to create the entry.
    let stats = repo
        .upsert_peer(&info_hash, &a_started_peer(2), Some(50))
        .expect("it should accept the peer");

    assert_eq!(stats.downloaded, 6);
    assert_eq!(stats.peers(), 2);
}

#[rstest]
fn it_should_keep_counting_the_downloads_of_the_removed_torrents(#[values(skip_list(), dash_map())] repo: Repo) {
    make(&repo, &vec![(hashed(1), downloaded_peer(1)), (hashed(2), downloaded_peer(2))]);

    repo.remove(&hashed(1));
    repo.import_persistent(&PersistentTorrents::from([(hashed(3), 5)]));

    let metrics = repo.get_metrics();

    assert_eq!(metrics.completed, 1 + 5);
    assert_eq!(metrics.downloads, 2 + 5);
}

#[rstest]
fn it_should_reject_a_peer_without_port(#[values(skip_list(), dash_map())] repo: Repo) {
    let info_hash = hashed(1);

    let result = repo.upsert_peer(&info_hash, &a_peer_without_port(), None);

    assert!(matches!(result, Err(Error::InvalidIdentifier { .. })));
    assert!(!repo.contains(&info_hash));
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::started(started())]
#[case::completed(completed())]
#[case::downloaded(downloaded())]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_remove_an_entry(#[values(skip_list(), dash_map())] repo: Repo, #[case] entries: Entries) {
    make(&repo, &entries);

    for (info_hash, torrent) in expected(&entries) {
        assert_eq!(repo.get(&info_hash), Some(torrent.get_swarm_metadata()));
        assert_eq!(repo.remove(&info_hash), Some(torrent.get_swarm_metadata()));

        assert_eq!(repo.get(&info_hash), None);
        assert_eq!(repo.remove(&info_hash), None);
    }

    assert_eq!(repo.get_metrics().torrents, 0);
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::started(started())]
#[case::completed(completed())]
#[case::downloaded(downloaded())]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_remove_inactive_peers(#[values(skip_list(), dash_map())] repo: Repo, #[case] entries: Entries) {
    use std::ops::Sub as _;

    use torrust_tracker_clock::clock::stopped::Stopped as _;
    use torrust_tracker_clock::clock::{self, Time as _};

    const TIMEOUT: Duration = Duration::from_secs(120);
    const EXPIRE: Duration = Duration::from_secs(121);

    make(&repo, &entries);

    let info_hash = hashed(255);
    let peers_before = repo.get_metrics().peers();

    // Set the last updated time of the peer to be 121 seconds ago.
    let now = clock::Working::now();
    clock::Stopped::local_set(&now);

    let peer = a_peer_updated_at(-1, now.sub(EXPIRE));

    // Insert the infohash and peer into the repository
    // and verify there is an extra torrent entry.
    {
        repo.upsert_peer(&info_hash, &peer, None).expect("it should accept the peer");
        assert_eq!(repo.get_metrics().torrents, expected(&entries).len() as u64 + 1);
    }

    // Verify that this new peer was inserted into the repository.
    assert!(repo.get_torrent_peers(&info_hash, None).contains(&peer.into()));

    // Remove peers that have not been updated since the timeout (120 seconds ago).
    let removed = repo.remove_inactive_peers(CurrentClock::now(), TIMEOUT);

    // Verify that only this peer was removed from the repository.
    assert_eq!(removed, 1);
    assert!(!repo.get_torrent_peers(&info_hash, None).contains(&peer.into()));
    assert_eq!(repo.get_metrics().peers(), peers_before);

    // The torrent itself is kept until the retention policy is applied.
    assert!(repo.contains(&info_hash));
}

#[rstest]
#[case::empty(empty())]
#[case::default(default())]
#[case::started(started())]
#[case::completed(completed())]
#[case::downloaded(downloaded())]
#[case::three(three())]
#[case::out_of_order(many_out_of_order())]
#[case::in_order(many_hashed_in_order())]
fn it_should_remove_peerless_torrents(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[case] entries: Entries,
    #[values(policy_persist(), policy_remove(), policy_remove_after_an_hour())] policy: RetentionPolicy,
) {
    make(&repo, &entries);

    let now = CurrentClock::now();
    let expected = expected(&entries);

    let removed = repo.apply_retention_policy(now, &policy);

    assert_eq!(removed, expected.values().filter(|t| t.is_removable(&policy, now)).count());

    for (info_hash, torrent) in &expected {
        assert_eq!(repo.contains(info_hash), !torrent.is_removable(&policy, now));
    }
}

#[rstest]
fn it_should_remove_an_idle_torrent_once_the_idle_time_has_passed(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[values(policy_remove_after_an_hour())] policy: RetentionPolicy,
) {
    let info_hash = hashed(1);
    let now = CurrentClock::now();

    let mut peer = a_peer_updated_at(1, now);
    repo.upsert_peer(&info_hash, &peer, None).expect("it should accept the peer");
    peer.event = AnnounceEvent::Stopped;
    repo.upsert_peer(&info_hash, &peer, None).expect("it should accept the peer");

    assert_eq!(repo.apply_retention_policy(now + Duration::from_secs(3599), &policy), 0);
    assert!(repo.contains(&info_hash));

    assert_eq!(repo.apply_retention_policy(now + Duration::from_secs(3600), &policy), 1);
    assert!(!repo.contains(&info_hash));
}

#[rstest]
fn it_should_hand_the_counters_of_the_removable_torrents_over_before_removing_them(
    #[values(skip_list(), dash_map())] repo: Repo,
) {
    let now = CurrentClock::now();

    let mut peers = downloaded_peer(1);
    let mut gone = peers[1];
    gone.event = AnnounceEvent::Stopped;
    peers.push(gone);

    make(&repo, &vec![(hashed(1), peers), (hashed(2), vec![a_started_peer(2)])]);

    let mut saved = PersistentTorrents::default();

    let removed = repo.apply_retention_policy_saving(now, &RetentionPolicy::Remove, &mut |torrents| {
        saved.extend(torrents);
        true
    });

    assert_eq!(removed, 1);
    assert_eq!(saved, PersistentTorrents::from([(hashed(1), 1)]));
    assert!(!repo.contains(&hashed(1)));
    assert!(repo.contains(&hashed(2)));
}

#[rstest]
fn it_should_keep_the_peerless_torrents_when_their_counters_are_not_saved(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[values(policy_remove(), policy_remove_after_an_hour())] policy: RetentionPolicy,
) {
    make(&repo, &default());

    let now = CurrentClock::now() + Duration::from_secs(3600);

    assert_eq!(repo.apply_retention_policy_saving(now, &policy, &mut |_| false), 0);
    assert!(repo.contains(&InfoHash::default()));

    // a later sweep that manages to save them removes them.
    assert_eq!(repo.apply_retention_policy_saving(now, &policy, &mut |_| true), 1);
    assert!(!repo.contains(&InfoHash::default()));
}

#[rstest]
fn it_should_not_call_save_when_nothing_is_removable(
    #[values(skip_list(), dash_map())] repo: Repo,
    #[values(policy_persist(), policy_remove())] policy: RetentionPolicy,
) {
    make(&repo, &started());

    let mut calls = 0;

    let removed = repo.apply_retention_policy_saving(CurrentClock::now(), &policy, &mut |_| {
        calls += 1;
        true
    });

    assert_eq!(removed, 0);
    assert_eq!(calls, 0);
}

#[rstest]
fn it_should_recreate_a_removed_torrent_on_the_next_announce(#[values(skip_list(), dash_map())] repo: Repo) {
    let info_hash = hashed(1);

    repo.upsert_peer(&info_hash, &a_completed_peer(1), None)
        .expect("it should accept the peer");
    repo.remove(&info_hash);

    let stats = repo
        .upsert_peer(&info_hash, &a_started_peer(2), None)
        .expect("it should accept the peer");

    assert_eq!(stats.downloaded, 0);
    assert_eq!(stats.peers(), 1);
}

#[rstest]
fn it_should_return_the_peers_of_a_swarm_excluding_the_requester(#[values(skip_list(), dash_map())] repo: Repo) {
    let info_hash = hashed(1);

    let requester = a_started_peer(1);
    let other = a_completed_peer(2);

    repo.upsert_peer(&info_hash, &requester, None).expect("it should accept the peer");
    repo.upsert_peer(&info_hash, &other, None).expect("it should accept the peer");

    let peers = repo.get_peers(&info_hash, &requester.key(), None);

    assert_eq!(peers.len(), 1);
    assert_eq!(*peers[0], other);

    repo.remove_peer(&info_hash, &other.key());

    assert!(repo.get_peers(&info_hash, &requester.key(), None).is_empty());
}

#[rstest]
fn it_should_answer_queries_about_an_unknown_torrent_with_nothing(#[values(skip_list(), dash_map())] repo: Repo) {
    let info_hash = hashed(1);
    let peer = a_started_peer(1);

    assert!(repo.get(&info_hash).is_none());
    assert!(repo.get_peers(&info_hash, &peer.key(), None).is_empty());
    assert!(repo.get_torrent_peers(&info_hash, None).is_empty());
    assert_eq!(repo.get_swarm_metadata_or_default(&info_hash), Default::default());

    // removing a peer of an unknown torrent does not create it.
    repo.remove_peer(&info_hash, &peer.key());
    assert!(!repo.contains(&info_hash));
}

#[rstest]
fn it_should_count_every_completion_when_peers_announce_concurrently(#[values(skip_list(), dash_map())] repo: Repo) {
    const THREADS: i32 = 8;
    const PEERS_PER_THREAD: i32 = 100;

    let info_hash = hashed(1);

    std::thread::scope(|s| {
        for t in 0..THREADS {
            let repo = &repo;
            s.spawn(move || {
                for p in 0..PEERS_PER_THREAD {
                    let peers = downloaded_peer(t * PEERS_PER_THREAD + p);
                    for peer in &peers {
                        repo.upsert_peer(&info_hash, peer, None).expect("it should accept the peer");
                    }
                }
            });
        }
    });

    let stats = repo.get(&info_hash).expect("it should be tracked");

    assert_eq!(i64::from(stats.downloaded), i64::from(THREADS * PEERS_PER_THREAD));
    assert_eq!(i64::from(stats.complete), i64::from(THREADS * PEERS_PER_THREAD));
}

#[rstest]
fn it_should_not_lose_an_announce_racing_with_the_retention_sweep(#[values(skip_list(), dash_map())] repo: Repo) {
    const ROUNDS: i32 = 500;

    let info_hash = hashed(1);
    let now = CurrentClock::now();

    std::thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..ROUNDS {
                repo.apply_retention_policy(now, &RetentionPolicy::Remove);
            }
        });

        s.spawn(|| {
            for round in 0..ROUNDS {
                let mut peer = a_peer_updated_at(round, now);
                repo.upsert_peer(&info_hash, &peer, None).expect("it should accept the peer");

                // the swarm has exactly the one peer just announced.
                let peers = repo.get_torrent_peers(&info_hash, None);
                assert!(peers.len() <= 1);

                peer.event = AnnounceEvent::Stopped;
                repo.upsert_peer(&info_hash, &peer, None).expect("it should accept the peer");
            }

            let last = a_peer_updated_at(ROUNDS, now);
            repo.upsert_peer(&info_hash, &last, None).expect("it should accept the peer");
        });
    });

    // The last announce is always visible once both threads are done.
    let peers = repo.get_torrent_peers(&info_hash, None);

    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].peer_id, a_peer_updated_at(ROUNDS, now).peer_id);
}
