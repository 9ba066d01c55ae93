/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `shardflake` can produce.
///
/// Construction errors (`InvalidMachineId`, `InvalidEpoch`) are the only ones a
/// well-configured service should ever observe. `TimestampOverflow` means the
/// 41-bit timestamp field is spent for the configured epoch, and
/// `ClockMovedBackwards` is only returned when a regression limit was set via
/// [`GeneratorConfig::max_clock_regression`].
///
/// [`GeneratorConfig::max_clock_regression`]: crate::GeneratorConfig::max_clock_regression
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The machine ID does not fit in the 10-bit machine field.
    #[error("machine ID {machine_id} must be in the range [0, 1023]")]
    InvalidMachineId { machine_id: u16 },

    /// The epoch lies in the future relative to the time source.
    #[error("epoch cannot be in the future ({ahead_ms} ms ahead of now)")]
    InvalidEpoch { ahead_ms: i64 },

    /// Milliseconds elapsed since the epoch no longer fit in 41 bits.
    #[error("timestamp overflowed 41 bits ({elapsed_ms} ms since epoch)")]
    TimestampOverflow { elapsed_ms: i64 },

    /// The clock fell further behind the last allocation than the configured
    /// regression limit allows.
    #[error("clock moved backwards by {behind_ms} ms")]
    ClockMovedBackwards { behind_ms: i64 },
}
