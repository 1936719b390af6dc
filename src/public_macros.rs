/// Defines a local `yield_!` macro forwarding to the given [`Yielder`].
///
/// Handy to write closure producers in the same style as
/// `#[generator]`-tagged functions.
///
/// ```rust
/// use ::thread_gen::prelude::*;
///
/// let words = Generator::new(from_fn(|co: &Yielder<&'static str>| {
///     make_yield!(co);
///     yield_!("hello");
///     yield_!("world");
///     Ok::<(), ::core::convert::Infallible>(())
/// }));
/// assert_eq!(
///     words.iter().map(Result::unwrap).collect::<Vec<_>>(),
///     ["hello", "world"],
/// );
/// ```
///
/// [`Yielder`]: `crate::Yielder`
#[macro_export]
macro_rules! make_yield {
    (
        @with_dollar![$dol:tt]
        $co:expr
    ) => (
        macro_rules! yield_ {(
            $dol value:expr $dol(,)?
        ) => (
            $crate::Yielder::yield_($co, $dol value)
        )}
    );

    (
        $co:expr $(,)?
    ) => (
        $crate::make_yield!(
            @with_dollar![$]
            $co
        )
    )
}
