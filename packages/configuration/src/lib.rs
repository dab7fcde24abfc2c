//! Configuration data structures for the Torrust swarm registry.
//!
//! The configuration is loaded with [`figment`] from a TOML document (a file
//! or the whole content in an environment variable) and can be overridden
//! with `TORRUST_TRACKER_` prefixed environment variables. Nested sections
//! are separated with a double underscore, for example:
//!
//! ```text
//! TORRUST_TRACKER_CORE__TRACKER_POLICY__MAX_PEER_TIMEOUT=1800
//! ```
//!
//! The current version of the configuration schema is [`v2`].
pub mod v2;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use thiserror::Error;
use torrust_tracker_located_error::{DynError, LocatedError};

/// The maximum number of returned peers for a torrent.
pub const TORRENT_PEERS_LIMIT: usize = 74;

/// Prefix for the environment variables that override configuration values.
pub const ENV_VAR_PREFIX: &str = "TORRUST_TRACKER_";

/// The whole `tracker.toml` file content. It has priority over the config file.
const ENV_VAR_CONFIG_TOML: &str = "TORRUST_TRACKER_CONFIG_TOML";

/// The `tracker.toml` file location.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "TORRUST_TRACKER_CONFIG_TOML_PATH";

pub type Configuration = v2::Configuration;
pub type Core = v2::core::Core;
pub type Database = v2::database::Database;
pub type Logging = v2::logging::Logging;
pub type Threshold = v2::logging::Threshold;
pub type Style = v2::logging::Style;

/// What happens to a torrent entry once its swarm is empty.
#[serde_as]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Peerless entries are kept forever.
    Persist,
    /// Peerless entries are removed on the next sweep.
    #[default]
    Remove,
    /// Peerless entries are removed once they have been idle for the given time.
    RemoveAfter(#[serde_as(as = "DurationSeconds<u64>")] Duration),
}

impl RetentionPolicy {
    /// Whether an entry with `peers` peers and the given last activity
    /// should be removed at `now`.
    #[must_use]
    pub fn should_remove(&self, peers: usize, last_activity: Duration, now: Duration) -> bool {
        if peers > 0 {
            return false;
        }

        match self {
            RetentionPolicy::Persist => false,
            RetentionPolicy::Remove => true,
            RetentionPolicy::RemoveAfter(idle) => last_activity.saturating_add(*idle) <= now,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct TrackerPolicy {
    /// Maximum time in seconds that a peer can be inactive before being
    /// considered an inactive peer. Inactive peers are removed by the
    /// cleanup job.
    #[serde(default = "TrackerPolicy::default_max_peer_timeout")]
    pub max_peer_timeout: u32,

    /// If enabled the number of completed downloads of each torrent is
    /// written to the database and survives restarts.
    #[serde(default = "TrackerPolicy::default_persistent_torrent_completed_stat")]
    pub persistent_torrent_completed_stat: bool,

    /// What the cleanup job does with torrents that have no peers.
    #[serde(default = "TrackerPolicy::default_retention_policy")]
    pub retention_policy: RetentionPolicy,
}

impl Default for TrackerPolicy {
    fn default() -> Self {
        Self {
            max_peer_timeout: Self::default_max_peer_timeout(),
            persistent_torrent_completed_stat: Self::default_persistent_torrent_completed_stat(),
            retention_policy: Self::default_retention_policy(),
        }
    }
}

impl TrackerPolicy {
    #[must_use]
    pub fn new(max_peer_timeout: u32, persistent_torrent_completed_stat: bool, retention_policy: RetentionPolicy) -> Self {
        Self {
            max_peer_timeout,
            persistent_torrent_completed_stat,
            retention_policy,
        }
    }

    fn default_max_peer_timeout() -> u32 {
        900
    }

    fn default_persistent_torrent_completed_stat() -> bool {
        false
    }

    fn default_retention_policy() -> RetentionPolicy {
        RetentionPolicy::Remove
    }

    #[must_use]
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.max_peer_timeout))
    }
}

/// Information required for loading config
#[derive(Debug, Default, Clone)]
pub struct Info {
    config_toml: Option<String>,
    config_toml_path: String,
}

impl Info {
    /// Build Configuration Info
    ///
    /// The TOML content in `TORRUST_TRACKER_CONFIG_TOML` wins over the file
    /// in `TORRUST_TRACKER_CONFIG_TOML_PATH`, which wins over the default path.
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to obtain a configuration.
    ///
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(default_config_toml_path: String) -> Result<Self, Error> {
        let config_toml = env::var(ENV_VAR_CONFIG_TOML).ok();

        let config_toml_path = env::var(ENV_VAR_CONFIG_TOML_PATH).unwrap_or(default_config_toml_path);

        Ok(Self {
            config_toml,
            config_toml_path,
        })
    }

    #[must_use]
    pub fn config_toml(&self) -> Option<&str> {
        self.config_toml.as_deref()
    }

    #[must_use]
    pub fn config_toml_path(&self) -> &str {
        &self.config_toml_path
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unable to load from Config File: {source}")]
    UnableToLoadFromConfigFile {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
    },

    /// The merged configuration could not be extracted into the schema.
    #[error("Failed processing the configuration: {source}")]
    ConfigError {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
    },

    #[error("Unable to encode the configuration: {source}")]
    UnableToEncode {
        source: LocatedError<'static, dyn std::error::Error + Send + Sync>,
    },
}

impl From<figment::Error> for Error {
    #[track_caller]
    fn from(err: figment::Error) -> Self {
        Self::ConfigError {
            source: (Arc::new(err) as DynError).into(),
        }
    }
}

impl From<toml::ser::Error> for Error {
    #[track_caller]
    fn from(err: toml::ser::Error) -> Self {
        Self::UnableToEncode {
            source: (Arc::new(err) as DynError).into(),
        }
    }
}

impl From<std::io::Error> for Error {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::UnableToLoadFromConfigFile {
            source: (Arc::new(err) as DynError).into(),
        }
    }
}
