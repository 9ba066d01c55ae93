use crate::{
    Decomposed, Error, GeneratorConfig, IdGenStatus, Result, SnowflakeId, SystemClock, TimeSource,
    from_unix_millis,
    generator::state::{Allocation, AllocationState, Slot},
    to_unix_millis,
};
use core::fmt;
use std::time::SystemTime;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A lock-free Snowflake ID generator suitable for multi-threaded environments.
///
/// The last allocation `(millis, sequence)` lives in a single atomic word.
/// Every allocation is one compare-and-swap on that word, so concurrent
/// callers are linearized by CAS success order: IDs are unique, never
/// decrease, and each millisecond's sequences run contiguously from 0.
///
/// The generator is `Send + Sync`; share it through `&` or an `Arc`.
///
/// ## Caveats
///
/// Two generators with the same machine ID will mint colliding IDs. Assigning
/// machine IDs is the caller's job.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use shardflake::Generator;
///
/// let epoch = SystemTime::now() - Duration::from_secs(3600);
/// let generator = Generator::new(epoch, 123).unwrap();
///
/// let a = generator.next_id();
/// let b = generator.next_id();
/// assert!(a < b);
/// assert_eq!(generator.extract_machine_id(b), 123);
/// ```
pub struct Generator<T = SystemClock>
where
    T: TimeSource,
{
    state: AllocationState,
    epoch_ms: i64,
    machine_id: u16,
    max_regression_ms: Option<i64>,
    clock: T,
}

impl Generator<SystemClock> {
    /// Creates a generator reading the system wall clock.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMachineId`] if `machine_id` is above 1023
    /// - [`Error::InvalidEpoch`] if `epoch` is later than now
    pub fn new(epoch: SystemTime, machine_id: u16) -> Result<Self> {
        Self::with_clock(epoch, machine_id, SystemClock)
    }
}

impl<T> Generator<T>
where
    T: TimeSource,
{
    /// Creates a generator reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::new`], with "now" taken from `clock`.
    pub fn with_clock(epoch: SystemTime, machine_id: u16, clock: T) -> Result<Self> {
        Self::from_config(GeneratorConfig::new(epoch, machine_id), clock)
    }

    /// Creates a generator from a full [`GeneratorConfig`].
    ///
    /// The epoch is truncated to whole milliseconds. No prior allocation is
    /// recorded, so the first ID has sequence 0 whatever millisecond it lands
    /// in.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::new`], with "now" taken from `clock`.
    pub fn from_config(config: GeneratorConfig, clock: T) -> Result<Self> {
        if config.machine_id > SnowflakeId::MAX_MACHINE_ID {
            #[cfg(feature = "tracing")]
            tracing::warn!(machine_id = config.machine_id, "rejecting machine ID");
            return Err(Error::InvalidMachineId {
                machine_id: config.machine_id,
            });
        }

        let epoch_ms = to_unix_millis(config.epoch);
        let now = clock.unix_millis();
        if epoch_ms > now {
            #[cfg(feature = "tracing")]
            tracing::warn!(epoch_ms, now, "rejecting epoch in the future");
            return Err(Error::InvalidEpoch {
                ahead_ms: epoch_ms - now,
            });
        }

        let max_regression_ms = config
            .max_clock_regression
            .map(|limit| i64::try_from(limit.as_millis()).unwrap_or(i64::MAX));

        Ok(Self {
            state: AllocationState::new(Allocation::UNALLOCATED),
            epoch_ms,
            machine_id: config.machine_id,
            max_regression_ms,
            clock,
        })
    }

    /// The epoch, truncated to milliseconds.
    pub fn epoch(&self) -> SystemTime {
        from_unix_millis(self.epoch_ms)
    }

    /// The machine ID stamped into every ID.
    pub fn machine_id(&self) -> u16 {
        self.machine_id
    }

    /// Returns the next ID, spinning through contention, full milliseconds
    /// and backward clock steps.
    ///
    /// A configured [`GeneratorConfig::max_clock_regression`] does not apply
    /// here: however far the clock steps back, this waits for it to recover.
    /// Use [`Self::try_next_id`] to act on the limit.
    ///
    /// # Panics
    ///
    /// Panics once the 41-bit timestamp has overflowed, about 69 years after
    /// the epoch.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> SnowflakeId {
        loop {
            match self.poll(None) {
                Ok(IdGenStatus::Ready { id }) => break id,
                Ok(IdGenStatus::Pending { .. }) => core::hint::spin_loop(),
                Err(e) => panic!("{e}"),
            }
        }
    }

    /// A fallible version of [`Self::next_id`].
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOverflow`] once more than 2^41 - 1 ms have passed
    ///   since the epoch
    /// - [`Error::ClockMovedBackwards`] if a regression limit is configured
    ///   and exceeded
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<SnowflakeId> {
        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => break Ok(id),
                IdGenStatus::Pending { .. } => core::hint::spin_loop(),
            }
        }
    }

    /// Makes one allocation attempt against a fresh clock reading.
    ///
    /// Lost CAS races are retried internally; a full millisecond or a clock
    /// behind the last allocation comes back as [`IdGenStatus::Pending`] so
    /// the caller can decide how to wait before polling again.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_next_id`].
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        self.poll(self.max_regression_ms)
    }

    fn poll(&self, max_regression_ms: Option<i64>) -> Result<IdGenStatus> {
        let now = self.clock.unix_millis().saturating_sub(self.epoch_ms);

        if now > SnowflakeId::MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { elapsed_ms: now });
        }

        if now < 0 {
            // The clock stepped back past the epoch itself.
            let last = self.state.load().millis().max(0);
            return Self::cold_clock_behind(last - now, max_regression_ms);
        }

        match self.state.allocate(now) {
            Slot::Ready { sequence } => Ok(IdGenStatus::Ready {
                id: SnowflakeId::from_components(now, self.machine_id, sequence),
            }),
            Slot::Exhausted => Ok(IdGenStatus::Pending { yield_for: 1 }),
            Slot::Behind { behind_ms } => Self::cold_clock_behind(behind_ms, max_regression_ms),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(behind_ms: i64, max_regression_ms: Option<i64>) -> Result<IdGenStatus> {
        debug_assert!(behind_ms > 0);
        match max_regression_ms {
            Some(limit) if behind_ms > limit => {
                #[cfg(feature = "tracing")]
                tracing::warn!(behind_ms, limit, "clock regression exceeds limit");
                Err(Error::ClockMovedBackwards { behind_ms })
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::trace!(behind_ms, "clock behind last allocation");
                Ok(IdGenStatus::Pending {
                    yield_for: behind_ms,
                })
            }
        }
    }

    /// Resolves the ID's timestamp field against this generator's epoch.
    pub fn extract_time(&self, id: SnowflakeId) -> SystemTime {
        from_unix_millis(self.epoch_ms + id.timestamp())
    }

    /// The machine ID field; independent of the generator.
    pub fn extract_machine_id(&self, id: SnowflakeId) -> u16 {
        id.machine_id()
    }

    /// The sequence field; independent of the generator.
    pub fn extract_sequence(&self, id: SnowflakeId) -> u16 {
        id.sequence()
    }

    /// All three fields at once.
    pub fn decompose(&self, id: SnowflakeId) -> Decomposed {
        Decomposed {
            time: self.extract_time(id),
            machine_id: self.extract_machine_id(id),
            sequence: self.extract_sequence(id),
        }
    }
}

impl<T> fmt::Debug for Generator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.state.load();
        f.debug_struct("Generator")
            .field("epoch_ms", &self.epoch_ms)
            .field("machine_id", &self.machine_id)
            .field("last_millis", &last.millis())
            .field("last_sequence", &last.sequence())
            .field("max_regression_ms", &self.max_regression_ms)
            .finish_non_exhaustive()
    }
}
