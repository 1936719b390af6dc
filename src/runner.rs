//! The producer thread and the single-slot handoff it shares with the
//! consumer.
//!
//! Both sides only ever touch the [`Handoff`] through one mutex and wake each
//! other through one condition variable. The producer runs only between a
//! pull and its next yield; the rest of the time it is parked inside
//! [`Yielder::yield_`], so the two threads strictly alternate.

use_prelude!();

use ::core::{
    cell::Cell,
    mem,
    ops::Not as _,
};
use ::std::{
    any::Any,
    io,
    panic::{self, AssertUnwindSafe},
    sync::PoisonError,
    thread::{self, JoinHandle},
};

/// Lifecycle of one iteration over a generator.
///
/// ```text
/// NotStarted --start--> Running
/// Running --yield--> Suspended --pull--> Running
/// Running --Ok(())--> Done
/// Running --Err(_) / panic--> Failed
/// {NotStarted, Running, Suspended} --close--> Cancelled
/// ```
///
/// [`Done`][`RunState::Done`], [`Failed`][`RunState::Failed`] and
/// [`Cancelled`][`RunState::Cancelled`] are terminal.
#[derive(
    Debug,
    Clone, Copy,
    PartialEq, Eq,
    Hash,
)]
pub
enum RunState {
    /// Nothing has been pulled yet; no thread exists.
    NotStarted,
    /// The producer is computing its next value.
    Running,
    /// The producer is parked in a yield, waiting for the consumer.
    Suspended,
    /// The producer returned `Ok(())`.
    Done,
    /// The producer returned `Err(_)`, panicked, or could not be spawned.
    Failed,
    /// The consumer closed the sequence before it completed.
    Cancelled,
}

impl RunState {
    /// Whether no more values can ever be produced.
    pub
    fn is_terminal (self: Self)
      -> bool
    {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }
}

/// How the producer failed.
pub(in crate)
enum Failure<E> {
    Error(E),
    Panic(Box<dyn Any + Send>),
}

/// Single-capacity buffer between the two threads.
enum Slot<T, E> {
    Empty,
    Value(T),
    End,
    Failure(Failure<E>),
}

struct Handoff<T, E> {
    state: RunState,
    slot: Slot<T, E>,
}

struct Shared<T, E> {
    handoff: Mutex<Handoff<T, E>>,
    /// Signalled on every state change, by either side.
    turn: Condvar,
}

/// Unwinding payload used to stop a producer parked in `yield_` after its
/// consumer went away. Never escapes the producer thread.
struct CancelUnwind;

impl<T, E> Shared<T, E> {
    fn new ()
      -> Self
    {
        Self {
            handoff: Mutex::new(Handoff {
                state: RunState::NotStarted,
                slot: Slot::Empty,
            }),
            turn: Condvar::new(),
        }
    }

    /// Records how the producer's `run` ended and wakes the consumer.
    fn settle (
        self: &'_ Self,
        outcome: thread::Result<Result<(), E>>,
    )
    {
        let mut handoff = lock(&self.handoff);
        if handoff.state == RunState::Cancelled {
            trace!("generator producer unwound after cancellation");
            return;
        }
        let (state, slot) = match outcome {
            | Ok(Ok(())) => (RunState::Done, Slot::End),
            | Ok(Err(err)) => (
                RunState::Failed,
                Slot::Failure(Failure::Error(err)),
            ),
            | Err(payload) if payload.is::<CancelUnwind>() => (
                RunState::Cancelled,
                Slot::Empty,
            ),
            | Err(payload) => (
                RunState::Failed,
                Slot::Failure(Failure::Panic(payload)),
            ),
        };
        trace!("generator producer finished: {:?}", state);
        handoff.state = state;
        handoff.slot = slot;
        self.turn.notify_all();
    }
}

/// Producer-side view of the handoff, erased over the error type so that
/// [`Yielder`] only needs to know about the items.
trait Channel<T> : Send + Sync {
    fn publish (self: &'_ Self, value: T)
      -> Result<(), Cancelled>
    ;

    fn is_cancelled (self: &'_ Self)
      -> bool
    ;
}

impl<T : Send, E : Send> Channel<T> for Shared<T, E> {
    fn publish (self: &'_ Self, value: T)
      -> Result<(), Cancelled>
    {
        let mut handoff = lock(&self.handoff);
        if handoff.state == RunState::Cancelled {
            return Err(Cancelled);
        }
        debug_assert_eq!(handoff.state, RunState::Running);
        handoff.slot = Slot::Value(value);
        handoff.state = RunState::Suspended;
        trace!("generator value published");
        self.turn.notify_all();
        let handoff =
            self.turn
                .wait_while(handoff, |it| it.state == RunState::Suspended)
                .unwrap_or_else(PoisonError::into_inner)
        ;
        match handoff.state {
            | RunState::Cancelled => Err(Cancelled),
            | _ => Ok(()),
        }
    }

    fn is_cancelled (self: &'_ Self)
      -> bool
    {
        lock(&self.handoff).state == RunState::Cancelled
    }
}

/// The yield capability handed to [`Producer::run`].
///
/// It only lives for the duration of `run`, and cannot be shared with other
/// threads (`!Sync`): values must be yielded from the producer thread itself.
pub
struct Yielder<T> {
    channel: Arc<dyn Channel<T>>,
    _not_sync: PhantomData<Cell<()>>,
}

impl<T> Yielder<T> {
    /// Hands `value` over to the consumer and parks until the consumer asks
    /// for the next one.
    ///
    /// If the consumer closes the sequence instead, this call does not
    /// return: the producer thread unwinds (running destructors along the
    /// way) and the sequence ends silently. Yields attempted by those
    /// destructors return at once, discarding their value. Use
    /// [`try_yield`][`Yielder::try_yield`] to handle cancellation by hand.
    pub
    fn yield_ (self: &'_ Self, value: T)
    {
        // A yield from a destructor run by that very unwinding must not
        // unwind a second time: the value is dropped instead.
        if self.try_yield(value).is_err() && thread::panicking().not() {
            panic::resume_unwind(Box::new(CancelUnwind));
        }
    }

    /// Like [`yield_`][`Yielder::yield_`], but reports cancellation as
    /// `Err(Cancelled)` rather than unwinding.
    ///
    /// Once cancelled, every later call fails immediately, and whatever the
    /// routine returns is discarded.
    pub
    fn try_yield (self: &'_ Self, value: T)
      -> Result<(), Cancelled>
    {
        self.channel.publish(value)
    }

    /// Whether the consumer has closed the sequence.
    ///
    /// Long computations between two yields may poll this to bail out early.
    pub
    fn is_cancelled (self: &'_ Self)
      -> bool
    {
        self.channel.is_cancelled()
    }
}

impl<T> ::core::fmt::Debug for Yielder<T> {
    fn fmt (self: &'_ Self, f: &'_ mut ::core::fmt::Formatter<'_>)
      -> ::core::fmt::Result
    {
        f   .debug_struct("Yielder")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// What the consumer observed once the producer stopped running.
pub(in crate)
enum Turn<E> {
    /// A value is waiting in the slot.
    Ready,
    /// Completed or cancelled, or a failure that was already reported.
    Finished,
    Failed(Failure<E>),
}

/// Owns one producer thread and drives the handoff from the consumer side.
pub(in crate)
struct Runner<P : Producer> {
    producer: Arc<P>,
    config: Arc<Config>,
    shared: Arc<Shared<P::Item, P::Error>>,
    thread: Option<JoinHandle<()>>,
}

impl<P : Producer> Runner<P> {
    pub(in crate)
    fn new (producer: Arc<P>, config: Arc<Config>)
      -> Self
    {
        Self {
            producer,
            config,
            shared: Arc::new(Shared::new()),
            thread: None,
        }
    }

    pub(in crate)
    fn state (self: &'_ Self)
      -> RunState
    {
        lock(&self.shared.handoff).state
    }

    /// Spawns the producer thread. Does not wait for the first value.
    ///
    /// No-op unless [`NotStarted`][`RunState::NotStarted`].
    pub(in crate)
    fn start (self: &'_ mut Self)
      -> io::Result<()>
    {
        {
            let mut handoff = lock(&self.shared.handoff);
            if handoff.state != RunState::NotStarted {
                return Ok(());
            }
            handoff.state = RunState::Running;
        }
        let producer = Arc::clone(&self.producer);
        let shared = Arc::clone(&self.shared);
        match
            self.config
                .thread_builder()
                .spawn(move || drive(&*producer, shared))
        {
            | Ok(thread) => {
                debug!(
                    "spawned generator thread {:?}",
                    thread.thread().name().unwrap_or("<unnamed>"),
                );
                self.thread = Some(thread);
                Ok(())
            },
            | Err(err) => {
                let mut handoff = lock(&self.shared.handoff);
                handoff.state = RunState::Failed;
                handoff.slot = Slot::Empty;
                Err(err)
            },
        }
    }

    /// Resumes a parked producer whose value has been taken, then blocks
    /// until it yields again or terminates.
    ///
    /// Idempotent while a value sits in the slot. On timeout, returns the
    /// elapsed budget and leaves the producer running.
    pub(in crate)
    fn await_turn (self: &'_ Self, timeout: Option<Duration>)
      -> Result<Turn<P::Error>, Duration>
    {
        let turn = &self.shared.turn;
        let mut handoff = lock(&self.shared.handoff);
        if handoff.state == RunState::Suspended
        && matches!(handoff.slot, Slot::Empty)
        {
            trace!("resuming generator producer");
            handoff.state = RunState::Running;
            turn.notify_all();
        }
        let running = |it: &mut Handoff<P::Item, P::Error>| {
            it.state == RunState::Running
        };
        handoff = match timeout {
            | None => {
                turn.wait_while(handoff, running)
                    .unwrap_or_else(PoisonError::into_inner)
            },
            | Some(timeout) => {
                let (handoff, waited) =
                    turn.wait_timeout_while(handoff, timeout, running)
                        .unwrap_or_else(PoisonError::into_inner)
                ;
                if waited.timed_out() {
                    return Err(timeout);
                }
                handoff
            },
        };
        debug_assert_ne!(handoff.state, RunState::NotStarted);
        Ok(match handoff.state {
            | RunState::Suspended => Turn::Ready,
            | RunState::Failed => {
                match mem::replace(&mut handoff.slot, Slot::Empty) {
                    | Slot::Failure(failure) => Turn::Failed(failure),
                    | _ => Turn::Finished,
                }
            },
            | _ => Turn::Finished,
        })
    }

    /// Takes the published value out of the slot, if any. The producer
    /// stays parked until the next [`await_turn`][`Runner::await_turn`].
    pub(in crate)
    fn take_value (self: &'_ Self)
      -> Option<P::Item>
    {
        let mut handoff = lock(&self.shared.handoff);
        match mem::replace(&mut handoff.slot, Slot::Empty) {
            | Slot::Value(value) => Some(value),
            | other => {
                handoff.slot = other;
                None
            },
        }
    }

    /// Cancels the sequence unless already terminal, then releases the
    /// producer thread. Idempotent.
    pub(in crate)
    fn shutdown (self: &'_ mut Self)
    {
        let prior = {
            let mut handoff = lock(&self.shared.handoff);
            let prior = handoff.state;
            if prior.is_terminal().not() {
                debug!("cancelling generator while {:?}", prior);
                handoff.state = RunState::Cancelled;
                handoff.slot = Slot::Empty;
                self.shared.turn.notify_all();
            }
            prior
        };
        let thread = match self.thread.take() {
            | Some(thread) => thread,
            | None => return,
        };
        if prior == RunState::Running {
            // Only reachable after a timed-out pull: the producer is busy
            // and will notice the cancellation at its next yield.
            warn!(
                "detaching generator thread {:?}: still computing",
                thread.thread().name().unwrap_or("<unnamed>"),
            );
        } else if thread.join().is_err() {
            warn!("generator thread panicked outside of its producer");
        }
    }
}

/// Body of the producer thread.
fn drive<P : Producer> (
    producer: &'_ P,
    shared: Arc<Shared<P::Item, P::Error>>,
)
{
    let co = Yielder {
        channel: Arc::clone(&shared) as Arc<dyn Channel<P::Item>>,
        _not_sync: PhantomData,
    };
    ::unwind_safe::with_state(&*shared)
        .try_eval(|shared| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                producer.run(&co)
            }));
            shared.settle(outcome);
        })
        .finally(|shared| {
            // Whatever happened above, never leave the consumer waiting.
            shared.turn.notify_all();
        })
}
