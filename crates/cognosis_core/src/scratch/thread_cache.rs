//! Per-thread scratch state.
//!
//! # Responsibility
//! - Give every thread its own `AtomicData` slot per cache handle.
//! - Give every thread its own `ScratchArena` so arenas never need a lock.
//!
//! # Invariants
//! - A thread never observes another thread's slot.
//! - Slots are created lazily with an empty-map payload and die with the
//!   thread.

use super::arena::ScratchArena;
use crate::model::atomic_data::AtomicData;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CACHE_ID: AtomicU64 = AtomicU64::new(1);

type Slot = Rc<RefCell<AtomicData>>;

thread_local! {
    static SLOTS: RefCell<HashMap<u64, Slot>> = RefCell::new(HashMap::new());
    static ARENA: RefCell<Option<ScratchArena>> = const { RefCell::new(None) };
}

/// Handle to one thread-confined `AtomicData` slot per thread.
///
/// The handle itself is `Send + Sync`; the data behind it is not shared.
/// Dropping the handle clears the slot of the dropping thread only; slots
/// on other threads are released when those threads exit.
#[derive(Debug)]
pub struct ThreadScratchCache {
    id: u64,
}

impl ThreadScratchCache {
    pub fn new() -> Self {
        Self {
            id: NEXT_CACHE_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Returns a copy of this thread's value, creating an empty map first.
    pub fn get(&self) -> AtomicData {
        self.with(|data| data.clone())
    }

    /// Replaces this thread's value.
    pub fn set(&self, value: AtomicData) {
        self.with(|data| *data = value);
    }

    /// Runs `f` against this thread's value in place.
    ///
    /// Other caches may be used inside `f`; this cache must not be.
    pub fn with<R>(&self, f: impl FnOnce(&mut AtomicData) -> R) -> R {
        let slot = self.slot();
        let mut data = slot.borrow_mut();
        f(&mut data)
    }

    /// Removes and returns this thread's value, if it was ever created.
    pub fn take(&self) -> Option<AtomicData> {
        let slot = SLOTS.with(|slots| slots.borrow_mut().remove(&self.id))?;
        match Rc::try_unwrap(slot) {
            Ok(cell) => Some(cell.into_inner()),
            // Only reachable from inside this cache's own `with`.
            Err(shared) => shared.try_borrow().ok().map(|data| data.clone()),
        }
    }

    /// This thread's slot; the map borrow ends before the caller uses it.
    fn slot(&self) -> Slot {
        SLOTS.with(|slots| {
            Rc::clone(
                slots
                    .borrow_mut()
                    .entry(self.id)
                    .or_insert_with(|| Rc::new(RefCell::new(AtomicData::empty()))),
            )
        })
    }
}

impl Default for ThreadScratchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ThreadScratchCache {
    fn drop(&mut self) {
        // The thread-local may already be gone during thread teardown.
        let _ = SLOTS.try_with(|slots| {
            if let Ok(mut slots) = slots.try_borrow_mut() {
                slots.remove(&self.id);
            }
        });
    }
}

/// Runs `f` with this thread's scratch arena.
///
/// The arena is created on first use with the default chunk capacity and is
/// reset before `f` runs, so every call starts from offset zero of the first
/// chunk. `f` must not call `with_scratch_arena` recursively.
pub fn with_scratch_arena<R>(f: impl FnOnce(&mut ScratchArena) -> R) -> R {
    ARENA.with(|cell| {
        let mut slot = cell.borrow_mut();
        let arena = slot.get_or_insert_with(ScratchArena::default);
        arena.reset();
        f(arena)
    })
}
