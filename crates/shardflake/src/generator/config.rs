use crate::{CUSTOM_EPOCH_MS, from_unix_millis};
use std::time::{Duration, SystemTime};

/// Construction parameters for a [`Generator`].
///
/// [`Generator::new`] covers the common case; reach for the config when the
/// clock regression policy needs changing.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use shardflake::{Generator, GeneratorConfig, SystemClock};
///
/// let epoch = SystemTime::now() - Duration::from_secs(3600);
/// let config = GeneratorConfig::new(epoch, 7)
///     .with_max_clock_regression(Duration::from_millis(50));
/// let generator = Generator::from_config(config, SystemClock).unwrap();
/// assert_eq!(generator.machine_id(), 7);
/// ```
///
/// [`Generator`]: crate::Generator
/// [`Generator::new`]: crate::Generator::new
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Zero point of the timestamp field. Must not be in the future.
    pub epoch: SystemTime,
    /// Machine or shard ID encoded into every ID, in `[0, 1023]`.
    pub machine_id: u16,
    /// How far the clock may fall behind the last allocation before
    /// [`Generator::try_next_id`] and [`Generator::try_poll_id`] give up with
    /// [`Error::ClockMovedBackwards`].
    ///
    /// `None` (the default) spins until the clock catches up, however long
    /// that takes.
    ///
    /// [`Generator::try_next_id`]: crate::Generator::try_next_id
    /// [`Generator::try_poll_id`]: crate::Generator::try_poll_id
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    pub max_clock_regression: Option<Duration>,
}

impl GeneratorConfig {
    /// A config with no clock regression limit.
    pub fn new(epoch: SystemTime, machine_id: u16) -> Self {
        Self {
            epoch,
            machine_id,
            max_clock_regression: None,
        }
    }

    /// Sets [`Self::max_clock_regression`]. Only the fallible allocation
    /// methods act on it; [`Generator::next_id`] always waits.
    ///
    /// [`Generator::next_id`]: crate::Generator::next_id
    pub fn with_max_clock_regression(mut self, limit: Duration) -> Self {
        self.max_clock_regression = Some(limit);
        self
    }
}

impl Default for GeneratorConfig {
    /// Machine 0 with the [`CUSTOM_EPOCH_MS`] epoch and unbounded spinning on
    /// clock regression.
    fn default() -> Self {
        Self::new(from_unix_millis(CUSTOM_EPOCH_MS), 0)
    }
}
