//! RingMPMC - Lock-Free Bounded Multi-Producer Multi-Consumer Queue
//!
//! A fixed-capacity ring buffer where producers and consumers synchronize
//! only through compare-and-swap on two position counters and a sequence
//! number per slot (the bounded MPMC queue described by Dmitry Vyukov),
//! extended with blocking, timed and disposable hand-off.
//!
//! # Key Features
//!
//! - Any number of producers and consumers, no locks
//! - Cache-line padded `head`/`tail` (no false sharing between the two sides)
//! - Blocking `put`/`get`, non-blocking `offer`, timed `poll`
//! - Adaptive backoff while waiting (spin → yield)
//! - `dispose()` to shut down; consumers drain published items first
//!
//! # Example
//!
//! ```
//! use ringmpmc_rs::{RingBuffer, RingError};
//! use std::time::Duration;
//!
//! let ring = RingBuffer::<u64>::new(3); // rounded up to 4 slots
//! assert_eq!(ring.capacity(), 4);
//!
//! ring.put(42).unwrap();
//! assert!(ring.offer(43).is_ok());
//!
//! assert_eq!(ring.get(), Ok(42));
//! assert_eq!(ring.poll(Duration::from_millis(10)), Ok(43));
//! assert_eq!(ring.poll(Duration::from_millis(10)), Err(RingError::Timeout));
//!
//! ring.dispose();
//! assert_eq!(ring.get(), Err(RingError::Disposed));
//! ```

mod backoff;
mod config;
mod error;
mod invariants;
mod metrics;
mod ring;
mod trace;

pub use backoff::Backoff;
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG, MIN_CAPACITY};
pub use error::{OfferError, RingError};
pub use metrics::MetricsSnapshot;
pub use ring::RingBuffer;
pub use trace::init_tracing;
