//! Miri-compatible tests for detecting undefined behavior.
//!
//! Run with: `cargo +nightly miri test --test miri_tests`
//!
//! Miri is an interpreter for Rust's MIR that detects undefined behavior:
//! - Use of uninitialized memory
//! - Use-after-free and double drops
//! - Data races between threads
//!
//! These tests exercise the unsafe slot paths (write, move-out, drop on
//! teardown) with heap-owning values so a lost or doubled drop shows up.

use ringmpmc_rs::{RingBuffer, RingError};
use std::sync::Arc;
use std::thread;

/// Heap-owning items through a full lap.
#[test]
fn miri_put_get_owned_values() {
    let ring = RingBuffer::<String>::new(4);

    for i in 0..4 {
        ring.put(format!("item-{i}")).unwrap();
    }
    for i in 0..4 {
        assert_eq!(ring.get().unwrap(), format!("item-{i}"));
    }
}

/// Fill and drain repeatedly so every slot is reused across laps.
#[test]
fn miri_wrap_around() {
    let ring = RingBuffer::<Box<u32>>::new(2);

    for round in 0..3 {
        for i in 0..2 {
            assert!(ring.offer(Box::new(round * 10 + i)).is_ok());
        }
        assert!(ring.offer(Box::new(99)).unwrap_err().is_full());

        for i in 0..2 {
            assert_eq!(*ring.get().unwrap(), round * 10 + i);
        }
    }
}

/// Rejected offers hand the value back instead of leaking or dropping it.
#[test]
fn miri_rejected_offer_returns_value() {
    let ring = RingBuffer::<Vec<u8>>::new(2);
    ring.put(vec![1, 2, 3]).unwrap();
    ring.put(vec![]).unwrap();

    let back = ring.offer(vec![4, 5]).unwrap_err().into_inner();
    assert_eq!(back, vec![4, 5]);

    ring.dispose();
    let back = ring.offer(vec![6]).unwrap_err().into_inner();
    assert_eq!(back, vec![6]);
}

/// Values still in the ring are dropped exactly once with the ring.
#[test]
fn miri_drop_with_pending_items() {
    let ring = RingBuffer::<String>::new(8);
    for i in 0..5 {
        ring.put(i.to_string()).unwrap();
    }
    assert_eq!(ring.get().unwrap(), "0");
    drop(ring);
}

/// Drop after the counters have wrapped the slot array several times.
#[test]
fn miri_drop_after_laps() {
    let ring = RingBuffer::<Box<u64>>::new(2);
    for i in 0..7 {
        if ring.len() == ring.capacity() {
            ring.get().unwrap();
        }
        ring.put(Box::new(i)).unwrap();
    }
    assert_eq!(ring.len(), 2);
}

/// Cross-thread hand-off of owned values.
#[test]
fn miri_threaded_handoff() {
    let ring = Arc::new(RingBuffer::<String>::new(2));

    let producer = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || {
            for i in 0..10 {
                ring.put(i.to_string()).unwrap();
            }
            ring.dispose();
        })
    };

    let mut received = Vec::new();
    loop {
        match ring.get() {
            Ok(item) => received.push(item),
            Err(RingError::Disposed) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    producer.join().unwrap();

    let expected: Vec<String> = (0..10).map(|i| i.to_string()).collect();
    assert_eq!(received, expected);
}
