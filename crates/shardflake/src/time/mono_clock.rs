use crate::{TimeSource, to_unix_millis};
use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicI64, Ordering},
    },
    thread,
    time::{Duration, Instant, SystemTime},
};

/// Milliseconds elapsed since the clock was anchored, published by the ticker.
#[derive(Debug)]
struct Ticker {
    elapsed: AtomicI64,
}

/// A time source that reads the wall clock once and advances monotonically
/// from there.
///
/// At construction the clock records `SystemTime::now()` as its anchor and
/// spawns a ticker thread that publishes the elapsed [`Instant`] time once per
/// millisecond. Readings are `anchor + elapsed`: they never go backward, even
/// if the system clock is stepped, and the hot path is a single atomic load
/// instead of a syscall.
///
/// Clones share one ticker. The thread exits on its next tick after the last
/// clone is dropped.
///
/// # Example
///
/// ```
/// use shardflake::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new().unwrap();
/// let a = clock.unix_millis();
/// std::thread::sleep(std::time::Duration::from_millis(3));
/// let b = clock.unix_millis();
/// assert!(b >= a);
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    ticker: Arc<Ticker>,
    anchor: i64,
}

impl MonotonicClock {
    /// Anchors a new clock at the current wall-clock time and starts its
    /// ticker thread.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the ticker thread cannot be spawned.
    pub fn new() -> io::Result<Self> {
        let start = Instant::now();
        let anchor = to_unix_millis(SystemTime::now());

        let ticker = Arc::new(Ticker {
            elapsed: AtomicI64::new(0),
        });

        let weak = Arc::downgrade(&ticker);
        thread::Builder::new()
            .name("shardflake-ticker".into())
            .spawn(move || {
                let mut tick: u64 = 1;
                loop {
                    let target = start + Duration::from_millis(tick);
                    let now = Instant::now();
                    if now < target {
                        thread::sleep(target - now);
                    }

                    let Some(ticker) = weak.upgrade() else {
                        break;
                    };

                    let elapsed = start.elapsed().as_millis() as u64;
                    ticker.elapsed.store(elapsed as i64, Ordering::Relaxed);

                    // Oversleeping skips ticks rather than replaying them.
                    tick = elapsed + 1;
                }
            })?;

        Ok(Self { ticker, anchor })
    }

    /// The wall-clock reading taken at construction, in UNIX milliseconds.
    pub fn anchor_millis(&self) -> i64 {
        self.anchor
    }
}

impl TimeSource for MonotonicClock {
    fn unix_millis(&self) -> i64 {
        self.anchor + self.ticker.elapsed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_anchor_and_never_regresses() {
        let clock = MonotonicClock::new().unwrap();
        let mut last = clock.unix_millis();
        assert!(last >= clock.anchor_millis());

        for _ in 0..50 {
            thread::sleep(Duration::from_micros(200));
            let now = clock.unix_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_with_real_time() {
        let clock = MonotonicClock::new().unwrap();
        let before = clock.unix_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.unix_millis() > before);
    }

    #[test]
    fn clones_share_the_ticker() {
        let clock = MonotonicClock::new().unwrap();
        let clone = clock.clone();
        assert_eq!(clock.anchor_millis(), clone.anchor_millis());
        assert!(Arc::ptr_eq(&clock.ticker, &clone.ticker));
    }
}
