//! Time source for the swarm registry.
//!
//! Every timestamp in the registry is a `DurationSinceUnixEpoch`: a
//! `std::time::Duration` since the Unix Epoch. Code never reads the system
//! time directly, it asks a clock. Production code uses the
//! [`Working`](clock::Working) clock, tests use the
//! [`Stopped`](clock::Stopped) clock, whose time only changes when the test
//! moves it. That is how inactivity timeouts and retention grace periods are
//! tested without sleeping.
//!
//! Each crate selects the clock with a `CurrentClock` alias:
//!
//! ```rust
//! use torrust_tracker_clock::clock;
//!
//! #[cfg(not(test))]
//! type CurrentClock = clock::Working;
//!
//! #[cfg(test)]
//! type CurrentClock = clock::Stopped;
//! ```
pub mod clock;
pub mod static_time;

#[macro_use]
extern crate lazy_static;

/// Working version, for production.
#[cfg(not(test))]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Working;

/// Stopped version, for testing.
#[cfg(test)]
#[allow(dead_code)]
pub(crate) type CurrentClock = clock::Stopped;
