//! Setup for the main tracker application.
//!
//! The [`setup`] only builds the application and its dependencies but it
//! does not start the application. In fact, there is no such thing as
//! the main application process. When the application starts, the only
//! thing it does is starting a bunch of independent jobs. If you are
//! looking for how things are started you should read [`app::start`](crate::app::start)
//! function documentation.
//!
//! Setup steps:
//!
//! 1. Load the global application configuration.
//! 2. Initialize static variables.
//! 3. Initialize logging.
//! 4. Initialize the domain tracker.
use std::sync::Arc;

use torrust_tracker_clock::static_time;
use torrust_tracker_configuration::Configuration;
use tracing::info;

use super::config::initialize_configuration;
use crate::bootstrap;
use crate::core::services::tracker_factory;
use crate::core::Tracker;

/// It loads the configuration from the environment and builds the main domain [`Tracker`] struct.
#[must_use]
pub fn setup() -> (Configuration, Arc<Tracker>) {
    let configuration = initialize_configuration();
    let tracker = initialize_with_configuration(&configuration);

    info!(persistent = tracker.is_persistent(), "Configuration:\n{}", configuration_summary(&configuration));

    (configuration, tracker)
}

/// It initializes the application with the given configuration.
///
/// The configuration may be obtained from the environment (via config file or env vars).
#[must_use]
pub fn initialize_with_configuration(configuration: &Configuration) -> Arc<Tracker> {
    initialize_static();
    initialize_logging(configuration);
    Arc::new(initialize_tracker(configuration))
}

/// It initializes the application static values.
///
/// These values are accessible throughout the entire application:
///
/// - The time when the application started.
pub fn initialize_static() {
    // Set the time of Torrust app starting
    lazy_static::initialize(&static_time::TIME_AT_APP_START);
}

/// It builds the domain tracker
///
/// The tracker is the domain layer service. It's the entrypoint to make requests to the domain layer.
/// It's used by other higher-level components like the UDP and HTTP trackers or the tracker API.
#[must_use]
pub fn initialize_tracker(config: &Configuration) -> Tracker {
    tracker_factory(config)
}

/// It initializes the log threshold, format and channel.
///
/// See [the logging setup](crate::bootstrap::logging::setup) for more info about logging.
pub fn initialize_logging(config: &Configuration) {
    bootstrap::logging::setup(config);
}

/// The configuration as TOML, with the database credentials masked.
fn configuration_summary(configuration: &Configuration) -> String {
    let mut masked = configuration.clone();
    masked.core.database.path = configuration.core.database.mask_secrets();

    masked.to_toml().unwrap_or_else(|err| format!("unable to encode the configuration: {err}"))
}
