//! Error types for ring buffer operations.

use thiserror::Error;

/// Errors returned by the blocking operations (`put`, `get`, `poll`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// The ring buffer has been disposed.
    #[error("ring buffer is disposed")]
    Disposed,

    /// A bounded wait expired before an item became available.
    #[error("timed out waiting for an item")]
    Timeout,
}

impl RingError {
    /// Returns `true` if retrying the operation may succeed (e.g., `Timeout`).
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this error indicates the ring buffer is permanently unusable.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disposed)
    }
}

/// Error returned by `offer` when the item was not accepted.
///
/// The rejected item is handed back so the caller can retry or drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OfferError<T> {
    /// The ring buffer is full.
    #[error("ring buffer is full")]
    Full(T),

    /// The ring buffer has been disposed.
    #[error("ring buffer is disposed")]
    Disposed(T),
}

impl<T> OfferError<T> {
    /// Recovers the item that was not accepted.
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            Self::Full(item) | Self::Disposed(item) => item,
        }
    }

    /// Returns `true` if the item was rejected because the buffer was full.
    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }

    /// Returns `true` if the item was rejected because the buffer was disposed.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed(_))
    }

    /// Maps a disposal rejection to [`RingError::Disposed`].
    ///
    /// A full buffer is not a failure of the buffer itself, so `Full` maps to `None`.
    #[inline]
    pub fn into_ring_error(self) -> Option<RingError> {
        match self {
            Self::Full(_) => None,
            Self::Disposed(_) => Some(RingError::Disposed),
        }
    }
}
