use crate::SnowflakeId;

/// Represents the result of a single, non-blocking allocation attempt.
///
/// This type models the outcome of [`Generator::try_poll_id`]:
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means no ID is available until the clock
///   advances by roughly `yield_for` milliseconds.
///
/// This allows callers to choose their own backoff (spin, yield, sleep)
/// instead of the busy spin used by [`Generator::next_id`].
///
/// # Example
///
/// ```
/// use shardflake::{Generator, IdGenStatus, TimeSource, from_unix_millis};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn unix_millis(&self) -> i64 {
///         5
///     }
/// }
///
/// let generator = Generator::with_clock(from_unix_millis(0), 1, FixedTime).unwrap();
/// match generator.try_poll_id().unwrap() {
///     IdGenStatus::Ready { id } => assert_eq!(id.timestamp(), 5),
///     IdGenStatus::Pending { yield_for } => println!("back off for {yield_for} ms"),
/// }
/// ```
///
/// [`Generator::try_poll_id`]: crate::Generator::try_poll_id
/// [`Generator::next_id`]: crate::Generator::next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID could be generated for the current reading.
    ///
    /// `yield_for` is 1 when the millisecond's sequence space is spent, or the
    /// distance the clock fell behind the last allocation.
    Pending {
        /// Milliseconds until the clock is expected to allow progress.
        yield_for: i64,
    },
}
