//! Tracker domain services. Core and statistics services.
//!
//! There are two types of service:
//!
//! - [Core tracker services](crate::core::services::torrent): data about one torrent or pages of torrents.
//! - [Services for statistics](crate::core::services::statistics): aggregate data about all the torrents.
pub mod statistics;
pub mod torrent;

use torrust_tracker_configuration::Configuration;

use crate::core::Tracker;

/// It returns a new tracker building its dependencies.
#[must_use]
pub fn tracker_factory(config: &Configuration) -> Tracker {
    Tracker::new(&config.core)
}
