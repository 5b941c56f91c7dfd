use std::sync::atomic::{AtomicU64, Ordering};

/// Optional counters for monitoring ring buffer activity.
///
/// Updated with relaxed atomics only when `Config::enable_metrics` is set.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    items_put: AtomicU64,
    items_taken: AtomicU64,
    offers_rejected: AtomicU64,
    timeouts: AtomicU64,
    cas_failures: AtomicU64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_item_put(&self) {
        self.items_put.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_item_taken(&self) {
        self.items_taken.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_offer_rejected(&self) {
        self.offers_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_cas_failure(&self) {
        self.cas_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_put: self.items_put.load(Ordering::Relaxed),
            items_taken: self.items_taken.load(Ordering::Relaxed),
            offers_rejected: self.offers_rejected.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            cas_failures: self.cas_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the ring buffer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Items stored by `put` or an accepted `offer`.
    pub items_put: u64,
    /// Items removed by `get` or `poll`.
    pub items_taken: u64,
    /// `offer` calls turned away because the buffer was full.
    pub offers_rejected: u64,
    /// `poll` calls that gave up after their timeout.
    pub timeouts: u64,
    /// Lost compare-and-swap races on `head` or `tail`.
    pub cas_failures: u64,
}
