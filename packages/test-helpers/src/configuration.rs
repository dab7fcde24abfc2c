//! Configurations for tests.
use std::env;

use torrust_tracker_configuration::{Configuration, RetentionPolicy, Threshold};
use torrust_tracker_primitives::DatabaseDriver;

use crate::random;

/// A configuration for tests. The sqlite database is a new random file in
/// the temporary directory, so tests running in parallel never share it.
/// Background jobs are disabled and logging is off.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration::default();

    config.logging.threshold = Threshold::Off; // Change to `debug` for tests debugging

    config.core.inactive_peer_cleanup_interval = 0;
    config.core.persistence_interval = 0;
    config.core.statistics_log_interval = 0;

    config.core.database.driver = DatabaseDriver::Sqlite3;
    config.core.database.path = ephemeral_sqlite_database();

    config
}

/// An ephemeral configuration with the completed counters persisted.
#[must_use]
pub fn ephemeral_with_persistence() -> Configuration {
    let mut config = ephemeral();

    config.core.tracker_policy.persistent_torrent_completed_stat = true;

    config
}

/// An ephemeral configuration with the given retention policy.
#[must_use]
pub fn ephemeral_with_retention_policy(retention_policy: RetentionPolicy) -> Configuration {
    let mut config = ephemeral();

    config.core.tracker_policy.retention_policy = retention_policy;

    config
}

/// A path for a new sqlite database file in the temporary directory.
#[must_use]
pub fn ephemeral_sqlite_database() -> String {
    let temp_directory = env::temp_dir();
    let random_db_id = random::string(16);
    let temp_file = temp_directory.join(format!("data_{random_db_id}.db"));

    temp_file.to_string_lossy().into_owned()
}
