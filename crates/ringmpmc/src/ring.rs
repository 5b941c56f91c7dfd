use crate::invariants::{
    assert_sequence_in_window, debug_assert_bounded_count, debug_assert_head_not_past_tail,
    debug_assert_published,
};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::trace::{debug, info, trace};
use crate::{Backoff, Config, OfferError, RingError};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// This MPMC ring buffer hands off values through per-slot sequence numbers.
// Any number of producers race on `tail`, any number of consumers race on
// `head`, and each slot's `sequence` tells them whose turn it is.
//
// ## Sequence Numbers (Laps)
//
// `head` and `tail` are 63-bit positions; the slot for position `pos` is
// `pos & mask`. A slot's sequence encodes which lap it is ready for:
// - `sequence == pos`            free, a producer may claim position `pos`
// - `sequence == pos + 1`        written, a consumer may claim position `pos`
// - `sequence == pos + capacity` read, free again for the next lap
//
// Comparing `sequence` against the caller's position with a signed wrapping
// difference gives three outcomes: zero (claim), negative within one lap
// (full for producers, empty for consumers), or positive (the caller's view
// of the counter is stale). A difference more than one lap behind can only
// come from corruption and aborts the operation.
//
// ## Memory Ordering Protocol
//
// **Producer (put/offer):**
// 1. Load `tail` with Relaxed (only a hint for which slot to inspect)
// 2. Load the slot's `sequence` with Acquire (synchronizes with the consumer
//    that freed it on the previous lap)
// 3. CAS `tail` pos → pos+1 with Relaxed (ownership comes from the sequence)
// 4. Write the value into the slot (exclusive: this thread won the CAS)
// 5. Store `sequence = pos + 1` with Release (publishes the value)
//
// **Consumer (get/poll):**
// 1. Load `head` with Relaxed
// 2. Load the slot's `sequence` with Acquire (synchronizes with step 5 above)
// 3. CAS `head` pos → pos+1 with Relaxed
// 4. Move the value out of the slot (exclusive: this thread won the CAS)
// 5. Store `sequence = pos + capacity` with Release (frees the slot)
//
// ## Disposal
//
// `dispose()` sets `DISPOSED_BIT` on `tail` with `fetch_or`. A producer's CAS
// expects a `tail` without the bit, so no position can be claimed once the
// bit is set, and every position claimed before it is published by the thread
// that claimed it. A consumer facing an empty slot at `pos` reports disposal
// only when `tail == pos | DISPOSED_BIT`: nothing is claimed at or beyond
// `pos`, so nothing can ever be published there.
//
// ## Single-Writer Invariants
//
// `slot.value` is accessed through UnsafeCell without atomics. For a given
// lap exactly one producer (between its CAS and its publish) writes it and
// exactly one consumer (between its CAS and its release) reads it; the
// sequence handshake orders the two.
//
// =============================================================================

/// High bit of `tail`, set once by `dispose()` and never cleared.
const DISPOSED_BIT: u64 = 1 << 63;
/// Strips `DISPOSED_BIT` from a `tail` value.
const POSITION_MASK: u64 = !DISPOSED_BIT;

/// One cell of the ring: a lap marker plus storage for a single value.
struct Slot<T> {
    sequence: AtomicU64,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Slot<T> {
    fn new(sequence: u64) -> Self {
        Self {
            sequence: AtomicU64::new(sequence),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }
}

/// Read-mostly state shared by both sides.
struct Control {
    /// `capacity - 1`, turns a position into a slot index
    mask: u64,
}

/// Bounded lock-free MPMC ring buffer.
///
/// Producers call [`put`](Self::put) (blocking) or [`offer`](Self::offer)
/// (non-blocking); consumers call [`get`](Self::get) (blocking) or
/// [`poll`](Self::poll) (blocking with a timeout). Waiting is done by
/// spinning and yielding, never by parking on a lock, so a blocked thread
/// notices new space, new items or [`dispose`](Self::dispose) on its next
/// retry.
///
/// Share it between threads with an `Arc`:
///
/// ```
/// use ringmpmc_rs::RingBuffer;
/// use std::sync::Arc;
/// use std::thread;
///
/// let ring = Arc::new(RingBuffer::<u64>::new(4));
/// let producer = {
///     let ring = Arc::clone(&ring);
///     thread::spawn(move || {
///         for i in 0..100 {
///             ring.put(i).unwrap();
///         }
///     })
/// };
///
/// let mut sum = 0;
/// for _ in 0..100 {
///     sum += ring.get().unwrap();
/// }
/// producer.join().unwrap();
/// assert_eq!(sum, 4950);
/// ```
#[repr(C)]
pub struct RingBuffer<T> {
    // === PRODUCER HOT ===
    /// Next position to be claimed by a producer, plus `DISPOSED_BIT`
    tail: CachePadded<AtomicU64>,

    // === CONSUMER HOT ===
    /// Next position to be claimed by a consumer
    head: CachePadded<AtomicU64>,

    // === COLD STATE ===
    control: CachePadded<Control>,
    /// Thread-safe metrics (uses atomics internally)
    metrics: Metrics,
    config: Config,

    // === DATA ===
    /// Fixed at construction, length is a power of 2
    slots: Box<[Slot<T>]>,
}

// Safety: values are moved between threads through the slots, and each slot
// is only touched by the thread that won the CAS for it, so T: Send suffices.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Creates a ring buffer with at least `capacity` slots.
    ///
    /// The capacity is rounded up to the next power of 2 (minimum 2).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or cannot be rounded up within `usize`.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(Config::default().with_capacity(capacity))
    }

    /// Creates a ring buffer from a full configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.capacity` is zero or cannot be rounded up within `usize`.
    pub fn with_config(config: Config) -> Self {
        let capacity = config.capacity();
        let slots: Box<[Slot<T>]> = (0..capacity as u64).map(Slot::new).collect();

        debug!(
            requested = config.capacity,
            capacity,
            metrics = config.enable_metrics,
            "ring buffer created"
        );

        Self {
            tail: CachePadded::new(AtomicU64::new(0)),
            head: CachePadded::new(AtomicU64::new(0)),
            control: CachePadded::new(Control {
                mask: capacity as u64 - 1,
            }),
            metrics: Metrics::new(),
            config,
            slots,
        }
    }

    // ---------------------------------------------------------------------
    // CONSTANTS & STATUS
    // ---------------------------------------------------------------------

    /// Returns the number of slots (a power of 2, fixed for the buffer's life).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of claimed slots.
    ///
    /// This is a snapshot of two independent counters; under concurrent use it
    /// may be stale by the time it is returned.
    #[inline]
    pub fn len(&self) -> usize {
        // head first: tail only grows, so the pair never reads head > tail
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire) & POSITION_MASK;
        (tail.saturating_sub(head) as usize).min(self.capacity())
    }

    /// Returns true if no slot is claimed (best effort, see [`len`](Self::len)).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once [`dispose`](Self::dispose) has been called.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.tail.load(Ordering::Acquire) & DISPOSED_BIT != 0
    }

    #[inline]
    fn slot_index(&self, pos: u64) -> usize {
        (pos & self.control.mask) as usize
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Append `item`, waiting for space if the buffer is full.
    ///
    /// Returns [`RingError::Disposed`] if the buffer is, or becomes, disposed
    /// before the item could be stored; the item is dropped in that case.
    pub fn put(&self, item: T) -> Result<(), RingError> {
        // A blocking enqueue only gives up on disposal.
        self.put_internal(item, true).map_err(|_| RingError::Disposed)
    }

    /// Append `item` only if a slot is free right now.
    ///
    /// Never waits for a consumer. On rejection the item is handed back in
    /// the error: [`OfferError::Full`] if the buffer was full,
    /// [`OfferError::Disposed`] if it was disposed.
    pub fn offer(&self, item: T) -> Result<(), OfferError<T>> {
        self.put_internal(item, false)
    }

    fn put_internal(&self, item: T, block: bool) -> Result<(), OfferError<T>> {
        let capacity = self.capacity();
        let mut backoff = Backoff::new();
        let mut pos = self.tail.load(Ordering::Relaxed);

        let slot = loop {
            if pos & DISPOSED_BIT != 0 {
                return Err(OfferError::Disposed(item));
            }

            let index = self.slot_index(pos);
            let slot = &self.slots[index];
            let sequence = slot.sequence.load(Ordering::Acquire);
            let diff = sequence.wrapping_sub(pos) as i64;

            if diff == 0 {
                match self.tail.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break slot,
                    Err(current) => {
                        self.record(Metrics::add_cas_failure);
                        pos = current;
                    }
                }
            } else {
                assert_sequence_in_window!("put", index, sequence, pos, diff, capacity);

                if diff < 0 {
                    // Previous lap not consumed yet: the buffer is full.
                    if !block {
                        self.record(Metrics::add_offer_rejected);
                        return Err(OfferError::Full(item));
                    }
                    backoff.snooze();
                } else {
                    // Other producers moved on; start waiting afresh
                    backoff.reset();
                }
                pos = self.tail.load(Ordering::Relaxed);
            }
        };

        // Claiming a slot never takes the count above capacity
        debug_assert_bounded_count!(
            pos.wrapping_add(1)
                .wrapping_sub(self.head.load(Ordering::Relaxed)) as usize,
            capacity
        );

        // SAFETY: this thread won the CAS for `pos`, and the Acquire load of
        // `sequence == pos` ordered us after the consumer that emptied the slot
        // on the previous lap. No other thread touches `value` until the
        // Release store below publishes it.
        unsafe {
            (*slot.value.get()).write(item);
        }
        slot.sequence.store(pos.wrapping_add(1), Ordering::Release);

        self.record(Metrics::add_item_put);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Remove the oldest item, waiting until one is available.
    ///
    /// Items published before [`dispose`](Self::dispose) are still returned;
    /// once the buffer is disposed and drained this returns
    /// [`RingError::Disposed`].
    #[inline]
    pub fn get(&self) -> Result<T, RingError> {
        self.poll(Duration::ZERO)
    }

    /// Remove the oldest item, waiting at most `timeout` for one to appear.
    ///
    /// A zero `timeout` waits indefinitely, like [`get`](Self::get). Fails with
    /// [`RingError::Timeout`] once the wait reaches `timeout`, or with
    /// [`RingError::Disposed`] when the buffer is disposed and drained.
    pub fn poll(&self, timeout: Duration) -> Result<T, RingError> {
        let capacity = self.capacity();
        let started = (!timeout.is_zero()).then(Instant::now);
        let mut backoff = Backoff::new();
        let mut pos = self.head.load(Ordering::Relaxed);

        let slot = loop {
            let index = self.slot_index(pos);
            let slot = &self.slots[index];
            let sequence = slot.sequence.load(Ordering::Acquire);
            let expected = pos.wrapping_add(1);
            let diff = sequence.wrapping_sub(expected) as i64;

            if diff == 0 {
                match self.head.compare_exchange_weak(
                    pos,
                    expected,
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break slot,
                    Err(current) => {
                        self.record(Metrics::add_cas_failure);
                        pos = current;
                    }
                }
            } else {
                assert_sequence_in_window!("get", index, sequence, expected, diff, capacity);

                if diff < 0 {
                    // Nothing published at this position yet. After disposal
                    // a claimed position is still on its way unless tail
                    // stopped exactly here.
                    if self.tail.load(Ordering::Acquire) == pos | DISPOSED_BIT {
                        return Err(RingError::Disposed);
                    }
                    backoff.snooze();
                } else {
                    backoff.reset();
                }
                pos = self.head.load(Ordering::Relaxed);
            }

            if let Some(started) = started {
                if started.elapsed() >= timeout {
                    self.record(Metrics::add_timeout);
                    trace!(?timeout, "poll timed out");
                    return Err(RingError::Timeout);
                }
            }
        };

        debug_assert_head_not_past_tail!(
            pos.wrapping_add(1),
            self.tail.load(Ordering::Relaxed) & POSITION_MASK
        );

        // SAFETY: this thread won the CAS for `pos`, and the Acquire load of
        // `sequence == pos + 1` synchronized with the producer's Release store,
        // so the value is initialized. Moving it out leaves the slot logically
        // empty; the Release store below hands it to the next lap's producer.
        let item = unsafe { (*slot.value.get()).assume_init_read() };
        slot.sequence
            .store(pos.wrapping_add(capacity as u64), Ordering::Release);

        self.record(Metrics::add_item_taken);
        Ok(item)
    }

    // ---------------------------------------------------------------------
    // LIFECYCLE
    // ---------------------------------------------------------------------

    /// Dispose the buffer. Idempotent.
    ///
    /// Producers fail with `Disposed` from their next retry on. A producer
    /// that already claimed a slot still publishes into it, and consumers
    /// drain every claimed slot before failing with `Disposed`. Threads
    /// currently waiting are not woken; they observe disposal on their next
    /// retry.
    pub fn dispose(&self) {
        let previous = self.tail.fetch_or(DISPOSED_BIT, Ordering::AcqRel);
        if previous & DISPOSED_BIT == 0 {
            info!(pending = self.len(), "ring buffer disposed");
        }
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    #[inline]
    fn record(&self, counter: fn(&Metrics)) {
        if self.config.enable_metrics {
            counter(&self.metrics);
        }
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // Drop every value that was published but never read
        let head = *self.head.get_mut();
        let tail = *self.tail.get_mut() & POSITION_MASK;
        let mask = self.control.mask;

        for pos in head..tail {
            let slot = &mut self.slots[(pos & mask) as usize];
            let sequence = *slot.sequence.get_mut();
            debug_assert_published!(sequence, pos);

            if sequence == pos.wrapping_add(1) {
                // SAFETY: `&mut self` rules out concurrent operations, and a
                // sequence of pos + 1 means the value was written and not read.
                unsafe { slot.value.get_mut().assume_init_drop() };
            }
        }
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
