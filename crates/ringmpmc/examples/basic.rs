//! Worker pool fed through a shared ring buffer, shut down with `dispose()`.
//!
//! Run with: `cargo run --example basic --features tracing`

use ringmpmc_rs::{init_tracing, Config, RingBuffer, RingError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn main() {
    init_tracing();

    println!("RingMPMC Basic Example");
    println!("======================\n");

    let config = Config::new(1000, true); // rounded up to 1024 slots
    let ring = Arc::new(RingBuffer::<u64>::with_config(config));

    const N_PRODUCERS: u64 = 4;
    const N_WORKERS: usize = 3;
    const ITEMS_PER_PRODUCER: u64 = 250_000;

    println!("Configuration:");
    println!("  Ring capacity: {} slots", ring.capacity());
    println!("  Producers: {}", N_PRODUCERS);
    println!("  Workers: {}", N_WORKERS);
    println!("  Items per producer: {}\n", ITEMS_PER_PRODUCER);

    let start = Instant::now();

    let producers: Vec<_> = (0..N_PRODUCERS)
        .map(|id| {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                for i in 0..ITEMS_PER_PRODUCER {
                    ring.put(id * ITEMS_PER_PRODUCER + i).unwrap();
                }
            })
        })
        .collect();

    let workers: Vec<_> = (0..N_WORKERS)
        .map(|_| {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let mut count = 0u64;
                let mut sum = 0u64;
                loop {
                    match ring.poll(Duration::from_millis(100)) {
                        Ok(item) => {
                            count += 1;
                            sum += item;
                        }
                        // Keep waiting: producers may just be slow
                        Err(RingError::Timeout) => continue,
                        Err(RingError::Disposed) => break,
                    }
                }
                (count, sum)
            })
        })
        .collect();

    for handle in producers {
        handle.join().unwrap();
    }
    // Workers drain what is left, then see Disposed
    ring.dispose();

    let mut total = 0;
    let mut sum = 0;
    for (id, handle) in workers.into_iter().enumerate() {
        let (count, partial) = handle.join().unwrap();
        println!("  worker {}: {} items", id, count);
        total += count;
        sum += partial;
    }

    let elapsed = start.elapsed();
    let n = N_PRODUCERS * ITEMS_PER_PRODUCER;
    assert_eq!(total, n);
    assert_eq!(sum, n * (n - 1) / 2);

    let metrics = ring.metrics();
    println!("\nResults:");
    println!("  Items transferred: {}", total);
    println!("  Time: {:?}", elapsed);
    println!(
        "  Throughput: {:.2} M items/sec",
        total as f64 / elapsed.as_secs_f64() / 1e6
    );
    println!("  CAS failures: {}", metrics.cas_failures);
}
