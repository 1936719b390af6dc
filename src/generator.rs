//! The reusable, iterable view over a [`Producer`].

use_prelude!();

use crate::cursor::Cursor;

/// A [`Producer`] definition that can be iterated any number of times.
///
/// Generators, also commonly referred to as coroutines, let one write an
/// iterator *imperatively*: the producer pushes values out with
/// [`Yielder::yield_`] whenever convenient, and the consumer pulls them one
/// at a time with a plain `for` loop. Here, each iteration runs the producer
/// on its own thread, which is parked at every yield until the consumer asks
/// for the next value.
///
/// # Example
///
/// ```rust
/// use ::thread_gen::prelude::*;
///
/// let fibonacci = Generator::new(from_fn(|co: &Yielder<u64>| {
///     let (mut a, mut b) = (0, 1);
///     while a < 50 {
///         co.yield_(a);
///         let next = a + b;
///         a = b;
///         b = next;
///     }
///     Ok::<(), ::core::convert::Infallible>(())
/// }));
///
/// let mut values = vec![];
/// for value in &fibonacci {
///     values.push(value.unwrap());
/// }
/// assert_eq!(values, [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
/// ```
///
/// # Independent iterations
///
/// Every call to [`.iter()`][`Generator::iter`] starts a fresh run of the
/// producer, with its own thread and its own position:
///
/// ```rust
/// use ::thread_gen::prelude::*;
///
/// let letters = Generator::new(from_fn(|co: &Yielder<char>| {
///     ('a' ..= 'c').for_each(|c| co.yield_(c));
///     Ok::<(), ::core::convert::Infallible>(())
/// }));
///
/// let mut first = letters.iter();
/// let mut second = letters.iter();
/// assert_eq!(first.next_value().unwrap(), 'a');
/// assert_eq!(first.next_value().unwrap(), 'b');
/// assert_eq!(second.next_value().unwrap(), 'a');
/// assert_eq!(first.next_value().unwrap(), 'c');
/// ```
///
/// # `Generator` _vs._ `Iterator`
///
///   - a `Generator` is a *definition*: it is never consumed, and is cheap to
///     [`Clone`] (the producer is shared behind an [`Arc`]);
///
///   - a [`Cursor`] is one *run*: it owns a thread and a position, and is the
///     actual [`Iterator`].
pub
struct Generator<P : Producer> {
    producer: Arc<P>,
    config: Arc<Config>,
}

impl<P : Producer> Generator<P> {
    /// Wraps `producer` with the default configuration.
    ///
    /// See [`Builder`][`crate::Builder`] to name the threads, size their
    /// stacks, or bound the pulls with a timeout.
    pub
    fn new (producer: P)
      -> Self
    {
        Self::with_config(producer, Config::default())
    }

    pub(in crate)
    fn with_config (producer: P, config: Config)
      -> Self
    {
        Self {
            producer: Arc::new(producer),
            config: Arc::new(config),
        }
    }

    /// The wrapped producer.
    pub
    fn producer (self: &'_ Self)
      -> &'_ P
    {
        &self.producer
    }

    /// Starts a new, independent iteration.
    ///
    /// Nothing runs until the first pull on the returned [`Cursor`].
    pub
    fn iter (self: &'_ Self)
      -> Cursor<P>
    {
        Cursor::new(Arc::clone(&self.producer), Arc::clone(&self.config))
    }

    /// Runs `f` with a fresh [`Cursor`], which is closed on every way out of
    /// `f`, unwinding included.
    ///
    /// ```rust
    /// use ::thread_gen::prelude::*;
    ///
    /// let squares = Generator::new(from_fn(|co: &Yielder<u32>| {
    ///     (1 ..).for_each(|n| co.yield_(n * n));
    ///     Ok::<(), ::core::convert::Infallible>(())
    /// }));
    ///
    /// let first_above_50 = squares.scope(|cursor| {
    ///     cursor
    ///         .map(Result::unwrap)
    ///         .find(|&square| square > 50)
    /// });
    /// assert_eq!(first_above_50, Some(64));
    /// ```
    pub
    fn scope<R> (
        self: &'_ Self,
        f: impl FnOnce(&mut Cursor<P>) -> R,
    ) -> R
    {
        ::unwind_safe::with_state(self.iter())
            .try_eval(|cursor| f(cursor))
            .finally(|mut cursor| cursor.close())
    }
}

impl<P : Producer> Clone for Generator<P> {
    fn clone (self: &'_ Self)
      -> Self
    {
        Self {
            producer: Arc::clone(&self.producer),
            config: Arc::clone(&self.config),
        }
    }
}

impl<'r, P : Producer> IntoIterator for &'r Generator<P> {
    type Item = Result<P::Item, GeneratorError<P::Error>>;
    type IntoIter = Cursor<P>;

    #[inline]
    fn into_iter (self: &'r Generator<P>)
      -> Cursor<P>
    {
        self.iter()
    }
}

impl<P : Producer> IntoIterator for Generator<P> {
    type Item = Result<P::Item, GeneratorError<P::Error>>;
    type IntoIter = Cursor<P>;

    #[inline]
    fn into_iter (self: Generator<P>)
      -> Cursor<P>
    {
        self.iter()
    }
}

impl<P : Producer> ::core::fmt::Debug for Generator<P> {
    fn fmt (self: &'_ Self, f: &'_ mut ::core::fmt::Formatter<'_>)
      -> ::core::fmt::Result
    {
        f   .debug_struct("Generator")
            .field("config", &self.config)
            .finish()
    }
}

/// Ensure that the yield capability cannot be handed to another thread.
/// ```compile_fail
/// use ::thread_gen::prelude::*;
///
/// let _ = Generator::new(from_fn(|co: &Yielder<u8>| {
///     ::std::thread::scope(|s| {
///         s.spawn(|| co.yield_(42));
///     });
///     Ok::<(), ::core::convert::Infallible>(())
/// }));
/// ```
fn _compile_error_test() {}
