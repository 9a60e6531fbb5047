use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use shiftflake::{
    BasicEngine, DriftEngine, IdEngine, IdGenerator, Method, Options, SystemClock, TimeSource,
};
use std::{
    sync::{
        Arc, Barrier,
        atomic::{AtomicI64, Ordering},
    },
    thread::scope,
    time::Instant,
};

/// Clock that only moves when a generator waits on it.
struct FixedMockTime {
    millis: AtomicI64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> i64 {
        self.millis.load(Ordering::Relaxed)
    }

    fn sleep_millis(&self, millis: u64) {
        self.millis.fetch_add(millis as i64, Ordering::Relaxed);
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn options(method: Method) -> Options {
    Options {
        method,
        epoch: SystemClock.current_millis() - 1000,
        ..Options::new(1)
    }
}

fn fixed_clock() -> FixedMockTime {
    FixedMockTime {
        millis: AtomicI64::new(SystemClock.current_millis()),
    }
}

/// Benchmarks the single-threaded hot path.
fn bench_engine<E>(c: &mut Criterion, group_name: &str, engine_factory: impl Fn() -> E)
where
    E: IdEngine,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let engine = engine_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(engine.next_id());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one shared generator under contention.
fn bench_threaded(c: &mut Criterion, group_name: &str, method: Method) {
    let threads = num_cpus::get().clamp(2, 8);
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let mut total = core::time::Duration::ZERO;
            for _ in 0..iters {
                let generator = Arc::new(IdGenerator::new(options(method)).unwrap());
                let barrier = Arc::new(Barrier::new(threads + 1));
                let start = scope(|s| {
                    for _ in 0..threads {
                        let generator = Arc::clone(&generator);
                        let barrier = Arc::clone(&barrier);
                        s.spawn(move || {
                            barrier.wait();
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.next_id());
                            }
                        });
                    }
                    barrier.wait();
                    Instant::now()
                });
                total += start.elapsed();
            }
            total
        });
    });

    group.finish();
}

fn benchmarks(c: &mut Criterion) {
    bench_engine(c, "mock/basic", || {
        BasicEngine::new(options(Method::Basic), fixed_clock()).unwrap()
    });
    bench_engine(c, "mock/drift", || {
        DriftEngine::new(options(Method::Drift), fixed_clock()).unwrap()
    });
    bench_engine(c, "system/basic", || {
        BasicEngine::new(options(Method::Basic), SystemClock).unwrap()
    });
    bench_engine(c, "system/drift", || {
        DriftEngine::new(options(Method::Drift), SystemClock).unwrap()
    });
    bench_threaded(c, "system/basic/threaded", Method::Basic);
    bench_threaded(c, "system/drift/threaded", Method::Drift);
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
