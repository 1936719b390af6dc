//! Per-generator configuration.

use_prelude!();

use ::std::thread;

#[derive(Debug, Clone, Default)]
pub(in crate)
struct Config {
    pub(in crate) name: Option<String>,
    pub(in crate) stack_size: Option<usize>,
    pub(in crate) timeout: Option<Duration>,
}

impl Config {
    pub(in crate)
    fn thread_builder (self: &'_ Self)
      -> thread::Builder
    {
        let mut builder = thread::Builder::new();
        if let Some(ref name) = self.name {
            builder = builder.name(name.clone());
        }
        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }
        builder
    }
}

/// Configures a [`Generator`][`crate::Generator`] before building it.
///
/// ```rust
/// use ::core::time::Duration;
/// use ::thread_gen::{from_fn, Builder, Yielder};
///
/// let naturals =
///     Builder::new()
///         .name("naturals")
///         .timeout(Duration::from_secs(5))
///         .build(from_fn(|co: &Yielder<u64>| {
///             (0 ..).for_each(|n| co.yield_(n));
///             Ok::<(), ::core::convert::Infallible>(())
///         }))
/// ;
/// let first: Vec<u64> =
///     naturals.iter()
///         .take(3)
///         .collect::<Result<_, _>>()
///         .unwrap()
/// ;
/// assert_eq!(first, [0, 1, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub
struct Builder {
    config: Config,
}

impl Builder {
    /// A builder with the defaults: unnamed thread, platform stack size, no
    /// timeout.
    pub
    fn new ()
      -> Self
    {
        Self::default()
    }

    /// Names the producer threads, as shown by debuggers and panic messages.
    pub
    fn name (mut self: Self, name: impl Into<String>)
      -> Self
    {
        self.config.name = Some(name.into());
        self
    }

    /// Stack size, in bytes, of the producer threads.
    pub
    fn stack_size (mut self: Self, size: usize)
      -> Self
    {
        self.config.stack_size = Some(size);
        self
    }

    /// Bounds every pull: if the producer neither yields nor terminates
    /// within `timeout`, the pull fails with
    /// [`GeneratorError::TimedOut`] and can be retried.
    pub
    fn timeout (mut self: Self, timeout: Duration)
      -> Self
    {
        self.config.timeout = Some(timeout);
        self
    }

    /// Wraps `producer` with this configuration.
    pub
    fn build<P : Producer> (self: Self, producer: P)
      -> crate::Generator<P>
    {
        crate::Generator::with_config(producer, self.config)
    }
}
