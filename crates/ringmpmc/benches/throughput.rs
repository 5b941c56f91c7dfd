use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ringmpmc_rs::{Config, RingBuffer, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const MSG_PER_PRODUCER: u64 = 1_000_000; // 1M messages per producer

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    group.throughput(Throughput::Elements(1));

    let ring = RingBuffer::<u64>::with_config(LOW_LATENCY_CONFIG);
    group.bench_function("put_get", |b| {
        b.iter(|| {
            ring.put(black_box(1)).unwrap();
            black_box(ring.get().unwrap());
        });
    });

    group.bench_function("offer_poll", |b| {
        b.iter(|| {
            ring.offer(black_box(1)).unwrap();
            black_box(ring.poll(Duration::from_millis(1)).unwrap());
        });
    });

    group.finish();
}

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Elements(MSG_PER_PRODUCER));

    group.bench_function("single_producer_consumer", |b| {
        b.iter(|| {
            let ring = Arc::new(RingBuffer::<u64>::with_config(HIGH_THROUGHPUT_CONFIG));

            let producer = {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    for i in 0..MSG_PER_PRODUCER {
                        ring.put(i).unwrap();
                    }
                })
            };

            for _ in 0..MSG_PER_PRODUCER {
                black_box(ring.get().unwrap());
            }
            producer.join().unwrap();
        });
    });

    group.finish();
}

fn bench_mpmc(c: &mut Criterion) {
    let mut group = c.benchmark_group("mpmc");
    group.sample_size(10);

    for threads in [2usize, 4, 8] {
        let total = MSG_PER_PRODUCER * threads as u64;
        group.throughput(Throughput::Elements(total));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}P_{}C", threads, threads)),
            &threads,
            |b, &n| {
                b.iter(|| {
                    let ring = Arc::new(RingBuffer::<u64>::with_config(Config::new(1 << 12, false)));

                    let producers: Vec<_> = (0..n)
                        .map(|_| {
                            let ring = Arc::clone(&ring);
                            thread::spawn(move || {
                                for i in 0..MSG_PER_PRODUCER {
                                    ring.put(i).unwrap();
                                }
                            })
                        })
                        .collect();

                    // Every consumer takes exactly its share
                    let consumers: Vec<_> = (0..n)
                        .map(|_| {
                            let ring = Arc::clone(&ring);
                            thread::spawn(move || {
                                let mut sum = 0u64;
                                for _ in 0..MSG_PER_PRODUCER {
                                    sum = sum.wrapping_add(ring.get().unwrap());
                                }
                                sum
                            })
                        })
                        .collect();

                    for handle in producers {
                        handle.join().unwrap();
                    }
                    let sum = consumers
                        .into_iter()
                        .map(|h| h.join().unwrap())
                        .fold(0u64, u64::wrapping_add);
                    black_box(sum);
                });
            },
        );
    }

    group.finish();
}

fn bench_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("capacity");
    group.throughput(Throughput::Elements(MSG_PER_PRODUCER));
    group.sample_size(10);

    for capacity in [16usize, 256, 4096, 65536] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("slots_{}", capacity)),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let ring = Arc::new(RingBuffer::<u64>::new(capacity));

                    let producer = {
                        let ring = Arc::clone(&ring);
                        thread::spawn(move || {
                            for i in 0..MSG_PER_PRODUCER {
                                ring.put(i).unwrap();
                            }
                        })
                    };

                    for _ in 0..MSG_PER_PRODUCER {
                        black_box(ring.get().unwrap());
                    }
                    producer.join().unwrap();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_uncontended, bench_spsc, bench_mpmc, bench_capacity);
criterion_main!(benches);
