//! The producer side of a generator: user logic that pushes values out.

use_prelude!();

/// A routine that emits a sequence of values through a [`Yielder`].
///
/// Implementations are *definitions*, not running instances: a single
/// producer is shared by every [`Cursor`][`crate::Cursor`] obtained from its
/// [`Generator`][`crate::Generator`], and each of those cursors calls
/// [`run`][`Producer::run`] afresh on its own thread. Any per-run state thus
/// belongs in the local variables of `run`, not in `self`.
///
/// # Example
///
/// ```rust
/// use ::thread_gen::{Generator, Producer, Yielder};
///
/// struct Countdown(u32);
///
/// impl Producer for Countdown {
///     type Item = u32;
///     type Error = ::core::convert::Infallible;
///
///     fn run (&self, co: &Yielder<u32>)
///       -> Result<(), Self::Error>
///     {
///         for n in (1 ..= self.0).rev() {
///             co.yield_(n);
///         }
///         Ok(())
///     }
/// }
///
/// let countdown = Generator::new(Countdown(3));
/// let values: Result<Vec<_>, _> = countdown.iter().collect();
/// assert_eq!(values.unwrap(), [3, 2, 1]);
/// ```
pub
trait Producer : Send + Sync + 'static {
    /// The type of the yielded values.
    type Item : Send + 'static;

    /// The error this routine may fail with, reported to the consumer as
    /// [`GeneratorError::Failed`].
    type Error : Send + 'static;

    /// Runs the routine to completion, yielding through `co`.
    ///
    /// Returning `Ok(())` ends the sequence. Returning `Err(_)` (or
    /// panicking) ends it too, after every value yielded so far has been
    /// handed over.
    fn run (
        self: &'_ Self,
        co: &'_ Yielder<Self::Item>,
    ) -> Result<(), Self::Error>
    ;
}

impl<P : ?Sized + Producer> Producer for Arc<P> {
    type Item = P::Item;
    type Error = P::Error;

    #[inline]
    fn run (
        self: &'_ Self,
        co: &'_ Yielder<Self::Item>,
    ) -> Result<(), Self::Error>
    {
        (**self).run(co)
    }
}

impl<T, E> Producer
    for Box<dyn Fn(&Yielder<T>) -> Result<(), E> + Send + Sync>
where
    T : Send + 'static,
    E : Send + 'static,
{
    type Item = T;
    type Error = E;

    #[inline]
    fn run (
        self: &'_ Self,
        co: &'_ Yielder<T>,
    ) -> Result<(), E>
    {
        self(co)
    }
}

/// A [`Producer`] defined by a closure. See [`from_fn`].
pub
struct FromFn<F, T, E> {
    f: F,
    _phantom: PhantomData<fn() -> (T, E)>,
}

/// Wraps a closure as a [`Producer`].
///
/// The closure must be callable several times (`Fn`), since every iteration
/// over the resulting generator runs it anew.
///
/// ```rust
/// use ::thread_gen::{from_fn, Generator, Yielder};
///
/// let evens = Generator::new(from_fn(|co: &Yielder<u8>| {
///     for n in (0 .. 10).step_by(2) {
///         co.yield_(n);
///     }
///     Ok::<(), ::core::convert::Infallible>(())
/// }));
/// assert_eq!(
///     evens.iter().map(Result::unwrap).collect::<Vec<_>>(),
///     [0, 2, 4, 6, 8],
/// );
/// ```
pub
fn from_fn<F, T, E> (f: F)
  -> FromFn<F, T, E>
where
    F : Fn(&Yielder<T>) -> Result<(), E>,
{
    FromFn { f, _phantom: PhantomData }
}

impl<F, T, E> Producer for FromFn<F, T, E>
where
    F : Fn(&Yielder<T>) -> Result<(), E> + Send + Sync + 'static,
    T : Send + 'static,
    E : Send + 'static,
{
    type Item = T;
    type Error = E;

    #[inline]
    fn run (
        self: &'_ Self,
        co: &'_ Yielder<T>,
    ) -> Result<(), E>
    {
        (self.f)(co)
    }
}

impl<F, T, E> ::core::fmt::Debug for FromFn<F, T, E> {
    fn fmt (self: &'_ Self, f: &'_ mut ::core::fmt::Formatter<'_>)
      -> ::core::fmt::Result
    {
        f   .debug_struct("FromFn")
            .finish()
    }
}

/// Maps the return type of a `#[generator]` function onto its error type.
///
/// Lets the attribute accept `Result` aliases such as `io::Result<()>`.
#[doc(hidden)]
pub
trait ProducerResult {
    /// `E` in `Result<(), E>`.
    type Error;
}

impl<E> ProducerResult for Result<(), E> {
    type Error = E;
}
