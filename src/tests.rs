#![allow(unused_imports)]
use {
    ::core::{
        convert::Infallible,
        iter::FromIterator,
        ops::Not as _,
        sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    ::std::{*, panic, prelude::v1::*},
    super::*,
};

/// A generator whose producer cannot fail.
fn infallible<T : Send + 'static> (
    f: impl Fn(&Yielder<T>) + Send + Sync + 'static,
) -> Generator<impl Producer<Item = T, Error = Infallible>>
{
    Generator::new(from_fn(move |co: &Yielder<T>| {
        f(co);
        Ok(())
    }))
}

/// Sets its flag when dropped, e.g. by a producer unwinding on cancellation.
struct SetOnDrop(sync::Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop (self: &'_ mut Self)
    {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn basic ()
{
    let generator = infallible(|co| {
        make_yield!(co);
        yield_!(42);
        yield_!(0);
        yield_!(27);
    });
    assert_it_eq!(
        &generator,
        [42, 0, 27],
    );
}

#[test]
fn range ()
{
    let (start, end) = (2_u8, 8_u8);
    let generator = infallible(move |co| {
        let mut current = start;
        while current < end {
            co.yield_(current);
            current += 1;
        }
    });
    assert_it_eq!(
        generator,
        Vec::from_iter(2 .. 8),
    );
}

#[test]
fn empty ()
{
    let generator = infallible(|_: &Yielder<u8>| {});
    let mut cursor = generator.iter();
    assert_eq!(cursor.state(), RunState::NotStarted);
    assert!(cursor.has_more().unwrap().not());
    assert_eq!(cursor.state(), RunState::Done);
    assert!(cursor.next_value().unwrap_err().is_exhausted());
    assert!(cursor.next().is_none());
}

#[test]
fn has_more_is_idempotent ()
{
    let steps = sync::Arc::new(AtomicUsize::new(0));
    let generator = infallible({
        let steps = steps.clone();
        move |co| for n in 0 .. 3 {
            steps.fetch_add(1, Ordering::SeqCst);
            co.yield_(n);
        }
    });
    let mut cursor = generator.iter();
    assert!(cursor.has_more().unwrap());
    assert!(cursor.has_more().unwrap());
    assert!(cursor.has_more().unwrap());
    assert_eq!(steps.load(Ordering::SeqCst), 1);
    assert_eq!(cursor.state(), RunState::Suspended);

    assert_eq!(cursor.next_value().unwrap(), 0);
    // Not resumed until asked for more.
    assert_eq!(steps.load(Ordering::SeqCst), 1);

    assert!(cursor.has_more().unwrap());
    assert_eq!(steps.load(Ordering::SeqCst), 2);
    assert_eq!(cursor.next_value().unwrap(), 1);
    assert_eq!(cursor.next_value().unwrap(), 2);
    assert!(cursor.has_more().unwrap().not());
    assert!(cursor.has_more().unwrap().not());
    assert_eq!(steps.load(Ordering::SeqCst), 3);
}

#[test]
fn exhausted ()
{
    let generator = infallible(|co| co.yield_('a'));
    let mut cursor = generator.iter();
    assert_eq!(cursor.next_value().unwrap(), 'a');
    assert!(cursor.next_value().unwrap_err().is_exhausted());
    assert!(cursor.next_value().unwrap_err().is_exhausted());
    assert_eq!(cursor.state(), RunState::Done);
}

#[test]
fn failure_after_partial_output ()
{
    let generator = Generator::new(from_fn(|co: &Yielder<u8>| {
        co.yield_(1);
        co.yield_(2);
        Err("boom")
    }));
    let mut cursor = generator.iter();
    assert_eq!(cursor.next().unwrap().unwrap(), 1);
    assert_eq!(cursor.next().unwrap().unwrap(), 2);
    match cursor.next() {
        | Some(Err(GeneratorError::Failed(err))) => assert_eq!(err, "boom"),
        | other => panic!("expected the producer's failure, got {:?}", other),
    }
    assert_eq!(cursor.state(), RunState::Failed);
    assert!(cursor.next().is_none());
    assert!(cursor.has_more().unwrap().not());
    assert!(cursor.next_value().unwrap_err().is_exhausted());
}

#[test]
fn failure_is_reported_by_has_more ()
{
    let generator = Generator::new(from_fn(|_: &Yielder<u8>| {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }));
    let mut cursor = generator.iter();
    let err = cursor.has_more().unwrap_err().into_failure().unwrap();
    assert_eq!(err.kind(), io::ErrorKind::Other);
    assert_eq!(err.to_string(), "disk on fire");
    assert!(cursor.has_more().unwrap().not());
}

#[test]
fn panic_resumes_on_the_consumer ()
{
    let generator = infallible(|co| {
        co.yield_(1);
        panic!("kaboom");
    });
    let mut cursor = generator.iter();
    assert_eq!(cursor.next_value().unwrap(), 1);
    let payload =
        panic::catch_unwind(panic::AssertUnwindSafe(|| cursor.has_more()))
            .unwrap_err()
    ;
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"kaboom"));
    assert_eq!(cursor.state(), RunState::Failed);
    assert!(cursor.has_more().unwrap().not());
}

#[test]
fn close_mid_iteration ()
{
    let unwound = sync::Arc::new(AtomicBool::new(false));
    let generator = infallible({
        let unwound = unwound.clone();
        move |co| {
            let _guard = SetOnDrop(unwound.clone());
            (0 ..).for_each(|n: u64| co.yield_(n));
        }
    });
    let mut cursor = generator.iter();
    assert_eq!(cursor.next_value().unwrap(), 0);
    assert_eq!(cursor.next_value().unwrap(), 1);
    cursor.close();
    // `close` joins the thread: the producer has unwound by now.
    assert!(unwound.load(Ordering::SeqCst));
    assert_eq!(cursor.state(), RunState::Cancelled);
    assert!(cursor.has_more().unwrap().not());
    assert!(cursor.next_value().unwrap_err().is_exhausted());
    cursor.close();
    assert_eq!(cursor.state(), RunState::Cancelled);
}

#[test]
fn drop_mid_iteration ()
{
    let unwound = sync::Arc::new(AtomicBool::new(false));
    let generator = infallible({
        let unwound = unwound.clone();
        move |co| {
            let _guard = SetOnDrop(unwound.clone());
            (0 ..).for_each(|n: u64| co.yield_(n));
        }
    });
    let first_three: Vec<u64> =
        generator.iter()
            .take(3)
            .collect::<Result<_, _>>()
            .unwrap()
    ;
    assert_eq!(first_three, [0, 1, 2]);
    assert!(unwound.load(Ordering::SeqCst));
}

#[test]
fn close_before_start ()
{
    let runs = sync::Arc::new(AtomicUsize::new(0));
    let generator = infallible({
        let runs = runs.clone();
        move |co| {
            runs.fetch_add(1, Ordering::SeqCst);
            co.yield_(());
        }
    });
    let mut cursor = generator.iter();
    cursor.close();
    cursor.close();
    assert_eq!(cursor.state(), RunState::Cancelled);
    assert!(cursor.has_more().unwrap().not());
    assert!(cursor.next().is_none());
    drop(cursor);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn close_after_completion ()
{
    let generator = infallible(|co| co.yield_(1));
    let mut cursor = generator.iter();
    assert_it_eq!(&mut cursor, [1]);
    cursor.close();
    assert_eq!(cursor.state(), RunState::Done);
}

#[test]
fn independent_iterations ()
{
    let generator = infallible(|co| (1 ..= 3).for_each(|n| co.yield_(n)));
    let mut first = generator.iter();
    let mut second = generator.clone().iter();
    assert_eq!(first.next_value().unwrap(), 1);
    assert_eq!(first.next_value().unwrap(), 2);
    assert_eq!(second.next_value().unwrap(), 1);
    assert_eq!(first.next_value().unwrap(), 3);
    assert!(first.next().is_none());
    assert_it_eq!(second, [2, 3]);
    assert_it_eq!(&generator, [1, 2, 3]);
}

#[test]
fn try_yield_reports_cancellation ()
{
    let seen = sync::Arc::new(sync::Mutex::new(vec![]));
    let generator = infallible({
        let seen = seen.clone();
        move |co| {
            let first = co.try_yield(1);
            let cancelled = co.is_cancelled();
            let second = co.try_yield(2);
            seen.lock().unwrap().extend(vec![
                (first, cancelled),
                (second, co.is_cancelled()),
            ]);
        }
    });
    let mut cursor = generator.iter();
    assert!(cursor.has_more().unwrap());
    cursor.close();
    assert_eq!(
        *seen.lock().unwrap(),
        [(Err(Cancelled), true), (Err(Cancelled), true)],
    );
    assert_eq!(cursor.state(), RunState::Cancelled);
}

#[test]
fn not_cancelled_while_running ()
{
    let generator = infallible(|co| {
        let cancelled = co.is_cancelled();
        co.yield_(cancelled);
    });
    assert_it_eq!(&generator, [false]);
}

#[test]
fn timeout ()
{
    let generator =
        Builder::new()
            .timeout(time::Duration::from_millis(20))
            .build(from_fn(|co: &Yielder<u8>| {
                thread::sleep(time::Duration::from_millis(200));
                co.yield_(7);
                Ok::<(), Infallible>(())
            }))
    ;
    let mut cursor = generator.iter();
    match cursor.has_more() {
        | Err(GeneratorError::TimedOut(waited)) => {
            assert_eq!(waited, time::Duration::from_millis(20));
        },
        | other => panic!("expected a timeout, got {:?}", other),
    }
    assert_eq!(cursor.state(), RunState::Running);
    let value = loop {
        match cursor.next_value() {
            | Err(GeneratorError::TimedOut(_)) => continue,
            | other => break other.unwrap(),
        }
    };
    assert_eq!(value, 7);
}

#[test]
fn close_after_timeout_detaches ()
{
    let generator =
        Builder::new()
            .timeout(time::Duration::from_millis(10))
            .build(from_fn(|co: &Yielder<u8>| {
                thread::sleep(time::Duration::from_millis(100));
                co.yield_(7);
                Ok::<(), Infallible>(())
            }))
    ;
    let mut cursor = generator.iter();
    assert!(matches!(cursor.has_more(), Err(GeneratorError::TimedOut(_))));
    cursor.close();
    assert_eq!(cursor.state(), RunState::Cancelled);
    assert!(cursor.has_more().unwrap().not());
}

#[test]
fn thread_name ()
{
    let generator =
        Builder::new()
            .name("thread-gen-test")
            .stack_size(256 * 1024)
            .build(from_fn(|co: &Yielder<Option<String>>| {
                co.yield_(thread::current().name().map(String::from));
                Ok::<(), Infallible>(())
            }))
    ;
    assert_it_eq!(
        &generator,
        [Some("thread-gen-test".to_owned())],
    );
}

#[test]
fn std_adapters ()
{
    let generator = infallible(|co| (1 ..= 10).for_each(|n: u32| co.yield_(n)));
    let evens: Vec<u32> =
        generator.iter()
            .map(Result::unwrap)
            .filter(|n| n % 2 == 0)
            .map(|n| n * n)
            .collect()
    ;
    assert_eq!(evens, [4, 16, 36, 64, 100]);
    let sum: u32 = generator.iter().map(Result::unwrap).sum();
    assert_eq!(sum, 55);
}

#[test]
fn boxed_producer ()
{
    let producer: Box<dyn Fn(&Yielder<&'static str>) -> Result<(), Infallible> + Send + Sync> =
        Box::new(|co| {
            co.yield_("boxed");
            Ok(())
        })
    ;
    assert_it_eq!(Generator::new(producer), ["boxed"]);
}

#[test]
fn scope_closes_on_unwind ()
{
    let unwound = sync::Arc::new(AtomicBool::new(false));
    let generator = infallible({
        let unwound = unwound.clone();
        move |co| {
            let _guard = SetOnDrop(unwound.clone());
            (0 ..).for_each(|n: u64| co.yield_(n));
        }
    });
    let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        generator.scope(|cursor| {
            assert_eq!(cursor.next_value().unwrap(), 0);
            panic!("consumer gave up");
        })
    }));
    assert!(outcome.is_err());
    assert!(unwound.load(Ordering::SeqCst));
}

#[test]
fn yield_from_a_destructor_while_cancelled ()
{
    struct Flush<'co> {
        co: &'co Yielder<u8>,
        flushed: sync::Arc<AtomicBool>,
    }

    impl Drop for Flush<'_> {
        fn drop (self: &'_ mut Self)
        {
            self.co.yield_(99);
            self.flushed.store(true, Ordering::SeqCst);
        }
    }

    let flushed = sync::Arc::new(AtomicBool::new(false));
    let generator = infallible({
        let flushed = flushed.clone();
        move |co| {
            let _flush = Flush { co, flushed: flushed.clone() };
            loop {
                co.yield_(0);
            }
        }
    });
    let mut cursor = generator.iter();
    assert_eq!(cursor.next_value().unwrap(), 0);
    cursor.close();
    assert!(flushed.load(Ordering::SeqCst));
    assert_eq!(cursor.state(), RunState::Cancelled);
    assert!(cursor.next().is_none());
}

#[cfg(target_pointer_width = "64")]
#[test]
fn spawn_failure ()
{
    let generator =
        Builder::new()
            .stack_size(1 << 52)
            .build(from_fn(|co: &Yielder<u8>| {
                co.yield_(0);
                Ok::<(), Infallible>(())
            }))
    ;
    let mut cursor = generator.iter();
    match cursor.has_more() {
        | Err(GeneratorError::Spawn(_)) => {},
        | other => panic!("expected a spawn failure, got {:?}", other),
    }
    assert_eq!(cursor.state(), RunState::Failed);
    assert!(cursor.has_more().unwrap().not());
    assert!(cursor.next_value().unwrap_err().is_exhausted());
}

#[test]
fn error_messages ()
{
    assert_eq!(
        GeneratorError::<Infallible>::Exhausted.to_string(),
        "generator sequence exhausted",
    );
    assert_eq!(
        GeneratorError::Failed("boom").to_string(),
        "generator failed: boom",
    );
    assert_eq!(
        GeneratorError::<Infallible>::TimedOut(time::Duration::from_millis(5))
            .to_string(),
        "timed out after 5ms waiting for the generator to yield",
    );
    assert_eq!(Cancelled.to_string(), "generator cancelled by its consumer");
}

#[test]
fn run_state_terminality ()
{
    use RunState::*;
    for &state in &[NotStarted, Running, Suspended] {
        assert!(state.is_terminal().not(), "{:?}", state);
    }
    for &state in &[Done, Failed, Cancelled] {
        assert!(state.is_terminal(), "{:?}", state);
    }
}

macro_rules! assert_it_eq {(
    $left:expr, $right:expr $(, $($msg:expr $(,)?)?)?
) => (
    assert_eq!(
        $left.into_iter().collect::<Result<Vec<_>, _>>().unwrap(),
        $right,
        $($($msg ,)?)?
    )
)}
use assert_it_eq;
