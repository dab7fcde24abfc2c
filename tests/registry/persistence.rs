use torrust_swarm_registry::core::services::tracker_factory;
use torrust_tracker_primitives::info_hash::InfoHash;
use torrust_tracker_primitives::pagination::{Pagination, TorrentsSortKey};
use torrust_tracker_test_helpers::configuration;

use crate::common::fixtures::{completed, downloaded, started, stopped};

#[test]
fn the_completed_counters_should_survive_a_restart() {
    let config = configuration::ephemeral_with_persistence();

    let tracker = tracker_factory(&config);
    for (info_hash, downloads) in [(1, 3_u8), (2, 1), (3, 2)] {
        for peer in (1..=downloads).flat_map(downloaded) {
            tracker.announce(&InfoHash::from(info_hash), &peer, None).unwrap();
        }
    }
    assert_eq!(tracker.checkpoint().unwrap(), 3);
    drop(tracker);

    let restarted = tracker_factory(&config);
    assert_eq!(restarted.load_torrents_from_database().unwrap(), 3);

    let (listing, total) = restarted.get_torrents_page(TorrentsSortKey::Completed, &Pagination::default());

    assert_eq!(total, 3);
    assert_eq!(
        listing
            .iter()
            .map(|torrent| (torrent.info_hash, torrent.swarm_metadata.downloaded))
            .collect::<Vec<_>>(),
        vec![(InfoHash::from(1), 3), (InfoHash::from(3), 2), (InfoHash::from(2), 1)]
    );
    assert!(listing.iter().all(|torrent| torrent.swarm_metadata.peers() == 0));
}

#[test]
fn saving_the_loaded_counters_again_should_not_change_them() {
    let config = configuration::ephemeral_with_persistence();

    let tracker = tracker_factory(&config);
    for peer in downloaded(1) {
        tracker.announce(&InfoHash::from(1), &peer, None).unwrap();
    }
    tracker.checkpoint().unwrap();
    drop(tracker);

    let restarted = tracker_factory(&config);
    restarted.load_torrents_from_database().unwrap();
    restarted.checkpoint().unwrap();
    drop(restarted);

    let again = tracker_factory(&config);
    again.load_torrents_from_database().unwrap();

    assert_eq!(again.get_swarm_metadata(&InfoHash::from(1)).downloaded, 1);
}

#[test]
fn the_completed_counter_should_be_restored_when_a_removed_torrent_comes_back() {
    let config = configuration::ephemeral_with_persistence();
    let tracker = tracker_factory(&config);
    let info_hash = InfoHash::from(1);

    for peer in downloaded(1) {
        tracker.announce(&info_hash, &peer, None).unwrap();
    }
    tracker.checkpoint().unwrap();

    tracker.announce(&info_hash, &stopped(1), None).unwrap();
    assert_eq!(tracker.cleanup_torrents().removed_torrents, 1);

    let announce = tracker.announce(&info_hash, &started(2), None).unwrap();

    assert_eq!(announce.stats.downloaded, 1);
}

#[test]
fn the_completed_counter_should_be_kept_when_a_torrent_is_removed_between_checkpoints() {
    let config = configuration::ephemeral_with_persistence();
    let tracker = tracker_factory(&config);
    let info_hash = InfoHash::from(1);

    for peer in downloaded(1) {
        tracker.announce(&info_hash, &peer, None).unwrap();
    }
    tracker.announce(&info_hash, &stopped(1), None).unwrap();

    assert_eq!(tracker.cleanup_torrents().removed_torrents, 1);

    let announce = tracker.announce(&info_hash, &started(2), None).unwrap();

    assert_eq!(announce.stats.downloaded, 1);
    assert_eq!(tracker.get_torrents_metrics().completed, 1);
}

#[test]
fn a_tracker_without_persistence_should_never_touch_the_database() {
    let config = configuration::ephemeral();
    let tracker = tracker_factory(&config);

    tracker.announce(&InfoHash::from(1), &completed(1), None).unwrap();

    assert!(!tracker.is_persistent());
    assert_eq!(tracker.checkpoint().unwrap(), 0);
    assert_eq!(tracker.load_torrents_from_database().unwrap(), 0);
}
