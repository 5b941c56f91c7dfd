//! Assertion macros for ring buffer invariants.
//!
//! The slot sequence window check is always active: a sequence behind its
//! valid window means the shared state is corrupt, and every later operation
//! would act on garbage. The remaining checks are only active in debug builds
//! (`#[cfg(debug_assertions)]`), so there is zero overhead in release builds.

// =============================================================================
// Slot Sequence Window (always on)
// =============================================================================

/// Abort the current operation on a slot whose sequence fell behind its window.
///
/// **Invariant**: for a position `pos` mapped onto slot `i`, the slot's
/// sequence is never less than `pos - capacity` (producer side) or
/// `pos + 1 - capacity` (consumer side). Anything older means a lap was lost.
///
/// Used in: `RingBuffer::put_internal()` and `RingBuffer::poll()`
macro_rules! assert_sequence_in_window {
    ($op:literal, $index:expr, $sequence:expr, $expected:expr, $diff:expr, $capacity:expr) => {
        if $diff < -($capacity as i64) {
            $crate::invariants::sequence_violation($op, $index, $sequence, $expected)
        }
    };
}

#[cold]
#[inline(never)]
pub(crate) fn sequence_violation(op: &str, index: usize, sequence: u64, expected: u64) -> ! {
    crate::trace::error!(
        op,
        index,
        sequence,
        expected,
        "ring buffer slot sequence behind its window"
    );
    panic!(
        "ring buffer in compromised state during {op}: slot {index} has sequence {sequence}, expected {expected}"
    )
}

// =============================================================================
// Bounded Count
// =============================================================================

/// Assert that count does not exceed capacity.
///
/// **Invariant**: `0 ≤ (tail - head) ≤ capacity`
///
/// Used in: `put_internal()` after claiming a slot
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "bounded count violated: count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that head does not advance past tail.
///
/// **Invariant**: `head ≤ tail` (after advance)
///
/// Used in: `poll()` after claiming a slot
macro_rules! debug_assert_head_not_past_tail {
    ($new_head:expr, $tail:expr) => {
        debug_assert!(
            $new_head <= $tail,
            "head/tail order violated: advancing head {} beyond tail {}",
            $new_head,
            $tail
        )
    };
}

// =============================================================================
// Published Slot
// =============================================================================

/// Assert that a slot at position `pos` holds a published, unread value.
///
/// **Invariant**: `buffer[i] is initialized ⟺ sequence(i) == pos + 1`
///
/// Used in: `Drop` before dropping leftover values
macro_rules! debug_assert_published {
    ($sequence:expr, $pos:expr) => {
        debug_assert!(
            $sequence == $pos.wrapping_add(1),
            "published slot violated: position {} has sequence {}",
            $pos,
            $sequence
        )
    };
}

// =============================================================================
// Re-exports for crate-internal use
// =============================================================================

pub(crate) use assert_sequence_in_window;
pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_head_not_past_tail;
pub(crate) use debug_assert_published;
