#[macro_use]
mod macros;

pub(in crate)
mod prelude;

use ::std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks, ignoring poisoning: producer code never runs while a handoff lock
/// is held.
pub(in crate)
fn lock<T> (mutex: &'_ Mutex<T>)
  -> MutexGuard<'_, T>
{
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
