use std::hint;
use std::thread;

/// Adaptive backoff for the retry loops of the blocking operations.
///
/// The first few retries spin with PAUSE hints (2^step of them); after that
/// every retry yields the processor. There is no parking phase: a waiting
/// thread keeps re-observing the ring so that disposal and timeouts are
/// noticed on the next iteration.
#[derive(Debug, Default)]
pub struct Backoff {
    step: u32,
}

impl Backoff {
    const SPIN_LIMIT: u32 = 6; // 2^6 = 64 spins max before yielding

    /// Creates a new backoff instance.
    #[inline]
    pub fn new() -> Self {
        Self { step: 0 }
    }

    /// Wait before the next retry: spin while under the limit, then yield.
    #[inline]
    pub fn snooze(&mut self) {
        if self.step < Self::SPIN_LIMIT {
            for _ in 0..1u32 << self.step {
                hint::spin_loop();
            }
            self.step += 1;
        } else {
            thread::yield_now();
        }
    }

    #[cfg(test)]
    fn is_yielding(&self) -> bool {
        self.step >= Self::SPIN_LIMIT
    }

    /// Start a fresh wait cycle, e.g. after observing progress.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}
