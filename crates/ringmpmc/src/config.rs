/// Smallest slot count a ring buffer is built with.
pub const MIN_CAPACITY: usize = 2;

/// Configuration for [`RingBuffer`](crate::RingBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Requested number of slots (rounded up to a power of 2, default: 1024)
    pub capacity: usize,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    pub const fn new(capacity: usize, enable_metrics: bool) -> Self {
        Self {
            capacity,
            enable_metrics,
        }
    }

    /// Sets the requested capacity.
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enables or disables metrics collection.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Returns the realised slot count: the requested capacity rounded up to
    /// the next power of 2, and never fewer than 2 slots.
    ///
    /// With a single slot the "written" sequence (`pos + 1`) and the "free for
    /// the next lap" sequence (`pos + capacity`) coincide, so a producer could
    /// claim a slot whose value was never read.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity is zero or its power-of-2 rounding
    /// does not fit in `usize`.
    #[inline]
    pub const fn capacity(&self) -> usize {
        assert!(self.capacity > 0, "ring buffer capacity must be > 0");
        match self.capacity.checked_next_power_of_two() {
            Some(capacity) if capacity < MIN_CAPACITY => MIN_CAPACITY,
            Some(capacity) => capacity,
            None => panic!("ring buffer capacity overflows usize when rounded up"),
        }
    }

    /// Returns the mask for index wrapping.
    #[inline]
    pub const fn mask(&self) -> usize {
        self.capacity() - 1
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1024,
            enable_metrics: false,
        }
    }
}

/// Low latency configuration (256 slots, stays resident in L1/L2)
pub const LOW_LATENCY_CONFIG: Config = Config::new(256, false);

/// High throughput configuration (64K slots)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(1 << 16, false);
