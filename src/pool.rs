//! A small object pool for per-request scratch state.
//!
//! Slots are plain values kept on a mutex-guarded free list. [`Pool::acquire`]
//! pops one or, on a miss, builds a fresh `T::default()`; it never waits for
//! another request to give one back. The [`Pooled`] guard hands the slot
//! back when it drops, which also covers panics and cancelled futures.
//!
//! The pool does not reset slots. Callers reset on acquire (for
//! [`ResponseStats`](crate::ResponseStats) that is what `wrap` does).

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Idle slots kept by default. Anything beyond is dropped on release.
pub const DEFAULT_MAX_IDLE: usize = 1024;

/// A concurrency-safe free list of reusable `T`s.
#[derive(Debug)]
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
    max_idle: usize,
}

impl<T: Default> Pool<T> {
    pub fn new() -> Self {
        Self::with_max_idle(DEFAULT_MAX_IDLE)
    }

    /// A pool that retains at most `max_idle` slots between uses.
    pub fn with_max_idle(max_idle: usize) -> Self {
        Self { idle: Mutex::new(Vec::new()), max_idle }
    }

    /// Checks out a slot for exclusive use until the guard drops.
    pub fn acquire(&self) -> Pooled<'_, T> {
        let item = self.lock().pop().unwrap_or_default();
        Pooled { pool: self, item }
    }

    /// Number of idle slots currently retained.
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, item: T) {
        let mut idle = self.lock();
        if idle.len() < self.max_idle {
            idle.push(item);
        }
    }

    // The free list has no invariant a panicking holder could break.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self { Self::new() }
}

/// A slot checked out of a [`Pool`]. Returns itself to the pool on drop.
#[derive(Debug)]
pub struct Pooled<'p, T: Default> {
    pool: &'p Pool<T>,
    item: T,
}

impl<T: Default> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T { &self.item }
}

impl<T: Default> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T { &mut self.item }
}

impl<T: Default> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_allocates_and_release_retains() {
        let pool: Pool<Vec<u8>> = Pool::new();
        assert_eq!(pool.idle(), 0);

        let slot = pool.acquire();
        assert!(slot.is_empty());
        drop(slot);

        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn reuses_released_slot() {
        let pool: Pool<Vec<u8>> = Pool::new();
        {
            let mut slot = pool.acquire();
            slot.extend_from_slice(b"left over");
        }

        // No reset on acquire: the caller sees what the last user left.
        let slot = pool.acquire();
        assert_eq!(&slot[..], b"left over");
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn concurrent_checkouts_get_distinct_slots() {
        let pool: Pool<u32> = Pool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn max_idle_bounds_retained_slots() {
        let pool: Pool<u32> = Pool::with_max_idle(1);
        let a = pool.acquire();
        let b = pool.acquire();
        drop(a);
        drop(b);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn slot_returns_when_holder_panics() {
        let pool: Pool<u32> = Pool::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _slot = pool.acquire();
            panic!("handler blew up");
        }));

        assert!(result.is_err());
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn shared_across_threads() {
        let pool: Pool<Vec<usize>> = Pool::new();

        std::thread::scope(|s| {
            for id in 0..8 {
                let pool = &pool;
                s.spawn(move || {
                    for _ in 0..1000 {
                        let mut slot = pool.acquire();
                        slot.clear();
                        slot.push(id);
                        assert_eq!(*slot, [id]);
                    }
                });
            }
        });

        assert!(pool.idle() >= 1 && pool.idle() <= 8);
    }
}
