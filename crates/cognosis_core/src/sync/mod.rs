//! Scoped mutual exclusion for shared atom state.
//!
//! # Responsibility
//! - Serialize mutation of values shared between threads.
//! - Release the lock on every exit path of the protected region.
//!
//! # Invariants
//! - Locks are not reentrant; a holder must not lock again.
//! - A panic inside the region releases the lock and leaves no poison.

use log::debug;
use parking_lot::{Mutex, MutexGuard};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::time::Duration;

/// Lock acquisition errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    LockAcquisitionFailed { waited: Duration },
}

impl Display for LockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LockAcquisitionFailed { waited } => {
                write!(f, "lock not acquired within {} ms", waited.as_millis())
            }
        }
    }
}

impl Error for LockError {}

/// Mutex whose guard scopes access to the protected value.
#[derive(Debug, Default)]
pub struct AtomMutex<T> {
    inner: Mutex<T>,
}

/// Plain critical section with no protected value.
pub type ScopedLock = AtomMutex<()>;

/// Exclusive access to the value inside an `AtomMutex`; unlocks on drop.
pub struct AtomMutexGuard<'a, T> {
    guard: MutexGuard<'a, T>,
}

impl<T> AtomMutex<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Blocks until the lock is held.
    pub fn lock(&self) -> AtomMutexGuard<'_, T> {
        AtomMutexGuard {
            guard: self.inner.lock(),
        }
    }

    /// Waits at most `timeout` for the lock.
    ///
    /// # Errors
    /// - `LockAcquisitionFailed` when the lock stays held past `timeout`.
    pub fn lock_for(&self, timeout: Duration) -> Result<AtomMutexGuard<'_, T>, LockError> {
        match self.inner.try_lock_for(timeout) {
            Some(guard) => Ok(AtomMutexGuard { guard }),
            None => {
                debug!(
                    "event=lock_acquire module=sync status=error waited_ms={}",
                    timeout.as_millis()
                );
                Err(LockError::LockAcquisitionFailed { waited: timeout })
            }
        }
    }

    /// Runs `f` while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Returns whether some thread holds the lock right now.
    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T> Deref for AtomMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for AtomMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::{AtomMutex, LockError, ScopedLock};
    use std::time::Duration;

    #[test]
    fn guard_releases_on_drop() {
        let lock = AtomMutex::new(0);
        {
            let mut guard = lock.lock();
            *guard += 1;
            assert!(lock.is_locked());
        }
        assert!(!lock.is_locked());
        assert_eq!(lock.into_inner(), 1);
    }

    #[test]
    fn bounded_wait_fails_while_held() {
        let lock = ScopedLock::default();
        let _held = lock.lock();
        let err = lock
            .lock_for(Duration::from_millis(10))
            .err()
            .expect("lock is held");
        assert_eq!(
            err,
            LockError::LockAcquisitionFailed {
                waited: Duration::from_millis(10),
            }
        );
    }
}
