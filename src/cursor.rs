//! The consumer side: pull-based iteration over one run of a producer.

use_prelude!();

use ::core::iter::FusedIterator;
use ::std::panic;

use crate::runner::{Failure, Runner, Turn};

/// One independent iteration over a [`Generator`][`crate::Generator`].
///
/// Obtained through [`Generator::iter`][`crate::Generator::iter`] (or by
/// iterating over a `&Generator`). The producer thread is only spawned by the
/// first pull, and only ever runs between a pull and its next yield.
///
/// Besides the [`Iterator`] impl, which yields
/// `Result<P::Item, GeneratorError<P::Error>>`, the cursor exposes the
/// explicit [`has_more`][`Cursor::has_more`] /
/// [`next_value`][`Cursor::next_value`] pair.
///
/// # Releasing the thread
///
/// A sequence that runs to completion releases its thread by itself. To stop
/// early, call [`close`][`Cursor::close`], or simply drop the cursor: the
/// producer is cancelled at the yield it is parked on, and its thread joined.
///
/// ```rust
/// use ::thread_gen::{from_fn, Generator, RunState, Yielder};
///
/// let naturals = Generator::new(from_fn(|co: &Yielder<u32>| {
///     (0 ..).for_each(|n| co.yield_(n));
///     Ok::<(), ::core::convert::Infallible>(())
/// }));
///
/// let mut cursor = naturals.iter();
/// assert_eq!(cursor.next_value().unwrap(), 0);
/// assert_eq!(cursor.next_value().unwrap(), 1);
/// cursor.close();
/// assert_eq!(cursor.state(), RunState::Cancelled);
/// assert!(cursor.next_value().unwrap_err().is_exhausted());
/// ```
pub
struct Cursor<P : Producer> {
    runner: Runner<P>,
    timeout: Option<Duration>,
}

impl<P : Producer> Cursor<P> {
    pub(in crate)
    fn new (producer: Arc<P>, config: Arc<Config>)
      -> Self
    {
        let timeout = config.timeout;
        Self {
            runner: Runner::new(producer, config),
            timeout,
        }
    }

    /// Current [`RunState`] of this iteration.
    pub
    fn state (self: &'_ Self)
      -> RunState
    {
        self.runner.state()
    }

    /// Whether another value is available, blocking until the producer
    /// yields it or terminates.
    ///
    /// The first call spawns the producer thread. Calling this repeatedly
    /// without [`next_value`][`Cursor::next_value`] in between neither
    /// advances the producer nor discards the pending value.
    ///
    /// # Errors
    ///
    ///   - [`GeneratorError::Failed`] when the producer returned an error.
    ///     It is reported once; afterwards the sequence is simply over.
    ///
    ///   - [`GeneratorError::TimedOut`] when a timeout is configured and the
    ///     producer took too long. Calling again keeps waiting.
    ///
    ///   - [`GeneratorError::Spawn`] when the thread could not be created.
    ///
    /// # Panics
    ///
    /// If the producer panicked, its panic resumes here, with the original
    /// payload.
    pub
    fn has_more (self: &'_ mut Self)
      -> Result<bool, GeneratorError<P::Error>>
    {
        if self.runner.state() == RunState::NotStarted {
            self.runner.start().map_err(GeneratorError::Spawn)?;
        }
        match self.runner.await_turn(self.timeout) {
            | Ok(Turn::Ready) => Ok(true),
            | Ok(Turn::Finished) => {
                self.runner.shutdown();
                Ok(false)
            },
            | Ok(Turn::Failed(Failure::Error(err))) => {
                self.runner.shutdown();
                Err(GeneratorError::Failed(err))
            },
            | Ok(Turn::Failed(Failure::Panic(payload))) => {
                self.runner.shutdown();
                panic::resume_unwind(payload)
            },
            | Err(waited) => Err(GeneratorError::TimedOut(waited)),
        }
    }

    /// Takes the next value, pulling it from the producer if needed.
    ///
    /// The producer stays parked until the following pull, so it never runs
    /// ahead of the consumer.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Exhausted`] once the sequence is over, plus every
    /// error [`has_more`][`Cursor::has_more`] can report.
    pub
    fn next_value (self: &'_ mut Self)
      -> Result<P::Item, GeneratorError<P::Error>>
    {
        if self.has_more()? {
            self.runner
                .take_value()
                .ok_or(GeneratorError::Exhausted)
        } else {
            Err(GeneratorError::Exhausted)
        }
    }

    /// Ends the iteration: cancels the producer if it has not terminated, and
    /// joins its thread.
    ///
    /// Safe to call any number of times, before the first pull, or after the
    /// sequence is over. Afterwards every pull reports exhaustion.
    pub
    fn close (self: &'_ mut Self)
    {
        self.runner.shutdown();
    }
}

impl<P : Producer> Iterator for Cursor<P> {
    type Item = Result<P::Item, GeneratorError<P::Error>>;

    fn next (self: &'_ mut Self)
      -> Option<Self::Item>
    {
        match self.has_more() {
            | Ok(true) => self.runner.take_value().map(Ok),
            | Ok(false) => None,
            | Err(err) => Some(Err(err)),
        }
    }
}

/// Once `None` is returned the run state is terminal.
impl<P : Producer> FusedIterator for Cursor<P> {}

impl<P : Producer> Drop for Cursor<P> {
    fn drop (self: &'_ mut Self)
    {
        let state = self.runner.state();
        if matches!(state, RunState::Running | RunState::Suspended) {
            debug!("generator cursor dropped while {:?}; closing it", state);
        }
        self.runner.shutdown();
    }
}

impl<P : Producer> ::core::fmt::Debug for Cursor<P> {
    fn fmt (self: &'_ Self, f: &'_ mut ::core::fmt::Formatter<'_>)
      -> ::core::fmt::Result
    {
        f   .debug_struct("Cursor")
            .field("state", &self.state())
            .field("timeout", &self.timeout)
            .finish()
    }
}
