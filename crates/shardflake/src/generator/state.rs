use crate::SnowflakeId;
use core::cmp;
use portable_atomic::{AtomicI64, Ordering};

/// `(millis, sequence)` of the last successful allocation, packed as
/// `millis << 12 | sequence` so one CAS covers both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Allocation {
    raw: i64,
}

impl Allocation {
    /// No allocation yet. Its millis is -1, so any valid reading opens a new
    /// bucket and the first ID of a generator always has sequence 0.
    pub(crate) const UNALLOCATED: Self = Self::new(-1, 0);

    pub(crate) const fn new(millis: i64, sequence: u16) -> Self {
        Self {
            raw: (millis << SnowflakeId::SEQUENCE_BITS) | sequence as i64,
        }
    }

    const fn from_raw(raw: i64) -> Self {
        Self { raw }
    }

    pub(crate) const fn millis(&self) -> i64 {
        // Arithmetic shift keeps the sentinel's sign.
        self.raw >> SnowflakeId::SEQUENCE_BITS
    }

    pub(crate) const fn sequence(&self) -> u16 {
        (self.raw & SnowflakeId::SEQUENCE_MASK) as u16
    }
}

/// Outcome of one run of the sequence allocation protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// The sequence number now owned by the caller for the requested millis.
    Ready { sequence: u16 },
    /// All 4096 sequences of the requested millisecond are taken.
    Exhausted,
    /// The reading is older than the last allocation by `behind_ms`.
    Behind { behind_ms: i64 },
}

/// The generator's only mutable state.
#[derive(Debug)]
pub(crate) struct AllocationState {
    #[cfg(feature = "cache-padded")]
    word: crossbeam_utils::CachePadded<AtomicI64>,
    #[cfg(not(feature = "cache-padded"))]
    word: AtomicI64,
}

impl AllocationState {
    pub(crate) fn new(initial: Allocation) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            word: crossbeam_utils::CachePadded::new(AtomicI64::new(initial.raw)),
            #[cfg(not(feature = "cache-padded"))]
            word: AtomicI64::new(initial.raw),
        }
    }

    pub(crate) fn load(&self) -> Allocation {
        Allocation::from_raw(self.word.load(Ordering::Relaxed))
    }

    /// Claims the next sequence number for `now`.
    ///
    /// A failed CAS means another thread advanced the state; the snapshot is
    /// re-read and the case analysis starts over. `Exhausted` and `Behind`
    /// are returned without touching the state so the caller can re-sample
    /// its clock.
    pub(crate) fn allocate(&self, now: i64) -> Slot {
        let mut current = self.word.load(Ordering::Relaxed);
        loop {
            let last = Allocation::from_raw(current);

            let next = match now.cmp(&last.millis()) {
                cmp::Ordering::Greater => Allocation::new(now, 0),
                cmp::Ordering::Equal => {
                    if last.sequence() >= SnowflakeId::MAX_SEQUENCE {
                        return Slot::Exhausted;
                    }
                    Allocation::new(now, last.sequence() + 1)
                }
                cmp::Ordering::Less => {
                    return Slot::Behind {
                        behind_ms: last.millis() - now,
                    };
                }
            };

            match self.word.compare_exchange_weak(
                current,
                next.raw,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    return Slot::Ready {
                        sequence: next.sequence(),
                    };
                }
                Err(actual) => current = actual,
            }
        }
    }
}
