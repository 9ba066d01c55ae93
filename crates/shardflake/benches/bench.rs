use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use shardflake::{
    Generator, IdGenStatus, MonotonicClock, SystemClock, TimeSource, from_unix_millis,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::{Duration, Instant, SystemTime},
};

struct FixedMockTime {
    millis: i64,
}

impl TimeSource for FixedMockTime {
    fn unix_millis(&self) -> i64 {
        self.millis
    }
}

// One full millisecond of sequence space per benchmark iteration.
const TOTAL_IDS: usize = 4096;

fn fixed_generator() -> Generator<FixedMockTime> {
    Generator::with_clock(from_unix_millis(0), 1, FixedMockTime { millis: 1 })
        .expect("valid generator")
}

fn hour_ago() -> SystemTime {
    SystemTime::now() - Duration::from_secs(3600)
}

/// Hot path: a fixed clock, so every poll is `Ready` until the millisecond is
/// spent.
fn bench_mock_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock/sequential");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = fixed_generator();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id() {
                        Ok(IdGenStatus::Ready { id }) => {
                            black_box(id);
                        }
                        _ => unreachable!(),
                    }
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Shared generator on a fixed clock; measures CAS contention only.
fn bench_mock_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock/contended");

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{TOTAL_IDS}/threads/{thread_count}"),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();
                    for _ in 0..iters {
                        let generator = Arc::new(fixed_generator());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        black_box(generator.next_id());
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }
                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// Real clocks: includes spinning whenever a millisecond fills up.
fn bench_clock_sequential<T: TimeSource>(
    c: &mut Criterion,
    group_name: &str,
    clock: impl Fn() -> T,
) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let generator = Generator::with_clock(hour_ago(), 1, clock()).expect("valid generator");
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id());
            }
        });
    });

    group.finish();
}

fn bench_system_sequential(c: &mut Criterion) {
    bench_clock_sequential(c, "system/sequential", || SystemClock);
}

fn bench_mono_sequential(c: &mut Criterion) {
    bench_clock_sequential(c, "mono/sequential", || {
        MonotonicClock::new().expect("ticker thread")
    });
}

/// Shared wall-clock generator across threads.
fn bench_system_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("system/threaded");

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{TOTAL_IDS}/threads/{thread_count}"),
            |b| {
                let generator = Generator::new(hour_ago(), 1).expect("valid generator");
                b.iter(|| {
                    scope(|s| {
                        for _ in 0..thread_count {
                            s.spawn(|| {
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next_id());
                                }
                            });
                        }
                    });
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mock_sequential,
    bench_mock_contended,
    bench_system_sequential,
    bench_mono_sequential,
    bench_system_threaded,
);
criterion_main!(benches);
