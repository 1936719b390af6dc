//! Errors surfaced to the consumer side of a generator.

use ::core::time::Duration;
use ::thiserror::Error;

/// Error returned when pulling from a [`Cursor`][`crate::Cursor`].
///
/// `E` is the [`Producer::Error`][`crate::Producer::Error`] of the underlying
/// producer. Panics are not converted into this type: a panicking producer
/// has its payload re-raised on the consumer thread, as if the producer had
/// been called directly.
#[derive(Debug, Error)]
pub
enum GeneratorError<E> {
    /// The producer returned `Err(_)`.
    ///
    /// Reported exactly once, by the first pull that observes it, after every
    /// value yielded before the failure.
    #[error("generator failed: {0}")]
    Failed(E),

    /// A value was requested but the sequence is over (completed, cancelled,
    /// or its failure was already reported).
    #[error("generator sequence exhausted")]
    Exhausted,

    /// The configured [`timeout`][`crate::Builder::timeout`] elapsed before
    /// the producer yielded or terminated. The sequence is still live.
    #[error("timed out after {0:?} waiting for the generator to yield")]
    TimedOut(Duration),

    /// The producer thread could not be created.
    #[error("failed to spawn the generator thread: {0}")]
    Spawn(#[source] ::std::io::Error),
}

impl<E> GeneratorError<E> {
    /// Whether this is the [`Exhausted`][`GeneratorError::Exhausted`] variant.
    pub
    fn is_exhausted (self: &'_ Self)
      -> bool
    {
        matches!(*self, Self::Exhausted)
    }

    /// Extracts the producer's own error, if this is one.
    pub
    fn into_failure (self: Self)
      -> Option<E>
    {
        match self {
            | Self::Failed(err) => Some(err),
            | _ => None,
        }
    }
}

/// The consumer closed the sequence while the producer was parked in
/// [`Yielder::try_yield`][`crate::Yielder::try_yield`].
///
/// Not an error from the consumer's point of view: it only tells the
/// producer to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("generator cancelled by its consumer")]
pub
struct Cancelled;
