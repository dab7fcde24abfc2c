//! Version `2` of the configuration schema.
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
//! Every value has a default, so an empty document is a valid configuration.
//! The retention policy is one of `"persist"`, `"remove"` or
//! `{ remove_after = <seconds> }`.
pub mod core;
pub mod database;
pub mod logging;

use std::fs;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use self::core::Core;
use self::logging::Logging;
use crate::{Error, Info, ENV_VAR_PREFIX};

/// The whole configuration of the application.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct Configuration {
    /// Logging configuration
    #[serde(default)]
    pub logging: Logging,

    /// Core configuration.
    #[serde(default)]
    pub core: Core,
}

impl Configuration {
    /// Loads the configuration from the configuration file, then applies
    /// the environment variable overrides.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `path` does not exist or has a bad configuration.
    pub fn load_from_file(path: &str) -> Result<Configuration, Error> {
        let figment = Figment::from(Serialized::defaults(Configuration::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"));

        let config: Configuration = figment.extract()?;

        Ok(config)
    }

    /// Loads the configuration described by `info`.
    ///
    /// The TOML content from the environment, when present, is used instead
    /// of the configuration file.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configuration cannot be read or has a bad configuration.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = Figment::from(Serialized::defaults(Configuration::default()));

        let figment = match info.config_toml() {
            Some(config_toml) => figment.merge(Toml::string(config_toml)),
            None => figment.merge(Toml::file(info.config_toml_path())),
        };

        let config: Configuration = figment.merge(Env::prefixed(ENV_VAR_PREFIX).split("__")).extract()?;

        Ok(config)
    }

    /// Saves the configuration to the configuration file.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configuration cannot be encoded to TOML or
    /// the file cannot be written.
    pub fn save_to_file(&self, path: &str) -> Result<(), Error> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Encodes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configuration cannot be encoded.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }
}
