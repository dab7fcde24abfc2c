use std::time::Duration;

use torrust_tracker_primitives::DurationSinceUnixEpoch;

pub mod stopped;
pub mod working;

/// A clock, parameterized by where its time comes from.
#[derive(Debug)]
pub struct Clock<T> {
    clock: std::marker::PhantomData<T>,
}

/// The working clock. It returns the current system time.
pub type Working = Clock<working::WorkingClock>;
/// The stopped clock. It returns a fixed time that tests can move.
pub type Stopped = Clock<stopped::StoppedClock>;

/// A timestamp source.
pub trait Time: Sized {
    fn now() -> DurationSinceUnixEpoch;

    fn dbg_clock_type() -> String;

    #[must_use]
    fn now_add(add_time: &Duration) -> Option<DurationSinceUnixEpoch> {
        Self::now().checked_add(*add_time)
    }

    #[must_use]
    fn now_sub(sub_time: &Duration) -> Option<DurationSinceUnixEpoch> {
        Self::now().checked_sub(*sub_time)
    }
}
