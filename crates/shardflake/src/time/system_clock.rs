use crate::{TimeSource, to_unix_millis};
use std::time::SystemTime;

/// The operating system's wall clock, sampled on every call.
///
/// This is the default source for [`Generator`]. It follows NTP and manual
/// adjustments, including backward steps; see [`MonotonicClock`] for a source
/// that never regresses.
///
/// [`Generator`]: crate::Generator
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn unix_millis(&self) -> i64 {
        to_unix_millis(SystemTime::now())
    }
}
