//! **Torrust Swarm Registry** is the torrent and peer registry of a
//! `BitTorrent` tracker.
//!
//! It keeps, for every torrent the tracker knows about, the swarm of peers
//! sharing it and the number of times it has been completely downloaded.
//! Network front-ends (UDP, HTTP or a management API) feed announce and
//! scrape requests into the registry and read the listings and metrics it
//! produces.
//!
//! # Table of contents
//!
//! - [Features](#features)
//! - [Components](#components)
//! - [Configuration](#configuration)
//! - [Persistence](#persistence)
//!
//! # Features
//!
//! - Announce: register, update and remove peers, and get a peer list back.
//! - Scrape: swarm metadata for a batch of torrents.
//! - Eviction of peers that stopped announcing, and a configurable retention
//!   policy for torrents left without peers.
//! - Optional persistence of the completed-downloads counters in `SQLite`
//!   or `MySQL`.
//! - Paginated torrent listings and aggregate metrics.
//!
//! # Components
//!
//! - [`core`]: the domain [`Tracker`](crate::core::Tracker) and its services.
//! - [`bootstrap`]: configuration, logging and the background jobs.
//! - [`app`]: starts the jobs.
//!
//! The in-memory repository lives in its own package,
//! [`torrust-tracker-torrent-repository`](torrust_tracker_torrent_repository).
//!
//! # Configuration
//!
//! The configuration is loaded from a TOML file and overridden with
//! environment variables. See
//! [`torrust-tracker-configuration`](torrust_tracker_configuration) for all
//! the options. The default one is:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//! style = "default"
//!
//! [core]
//! inactive_peer_cleanup_interval = 600
//! persistence_interval = 900
//! statistics_log_interval = 60
//!
//! [core.database]
//! driver = "sqlite3"
//! path = "./storage/tracker/lib/database/sqlite3.db"
//!
//! [core.tracker_policy]
//! max_peer_timeout = 900
//! persistent_torrent_completed_stat = false
//! retention_policy = "remove"
//! ```
//!
//! # Persistence
//!
//! Only the completed counters are persisted, never the swarms. They are
//! loaded when the application starts and saved on every checkpoint, on
//! shutdown, when a peer completes a torrent and before the cleanup job drops
//! a torrent. A database outage never makes an announce fail: the counters
//! are kept in memory and saved on the next successful checkpoint.
pub mod app;
pub mod bootstrap;
pub mod core;

/// This code needs to be copied into each crate.
/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = torrust_tracker_clock::clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = torrust_tracker_clock::clock::Stopped;
