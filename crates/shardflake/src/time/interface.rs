use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC, in milliseconds
/// since the UNIX epoch.
pub const CUSTOM_EPOCH_MS: i64 = 1_735_689_600_000;

/// A source of wall-clock readings for the generator.
///
/// Readings are signed milliseconds since the UNIX epoch; the generator
/// subtracts its own epoch. Implementations are free to go backwards (the
/// system clock does under NTP adjustment); the generator copes with that.
///
/// This abstraction lets tests plug in a mocked clock.
///
/// # Example
///
/// ```
/// use shardflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn unix_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.unix_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn unix_millis(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn unix_millis(&self) -> i64 {
        (**self).unix_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn unix_millis(&self) -> i64 {
        (**self).unix_millis()
    }
}

/// Converts an instant to signed milliseconds since the UNIX epoch.
///
/// Sub-millisecond remainders round toward negative infinity, so instants
/// before 1970 stay ordered. Values beyond the `i64` range saturate.
pub fn to_unix_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(err) => {
            let before = err.duration();
            let mut millis = before.as_millis();
            if before.subsec_nanos() % 1_000_000 != 0 {
                millis += 1;
            }
            i64::try_from(millis).map_or(i64::MIN, |m| -m)
        }
    }
}

/// Converts signed milliseconds since the UNIX epoch back to an instant.
pub fn from_unix_millis(millis: i64) -> SystemTime {
    let offset = Duration::from_millis(millis.unsigned_abs());
    if millis >= 0 {
        UNIX_EPOCH + offset
    } else {
        UNIX_EPOCH - offset
    }
}
