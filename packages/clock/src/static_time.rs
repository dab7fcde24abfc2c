//! The time the process started.
use std::time::SystemTime;

lazy_static! {
    /// Captured the first time it's read. The application forces it during bootstrap.
    pub static ref TIME_AT_APP_START: SystemTime = SystemTime::now();
}
