//! Injected locking policies for the query structures.
//!
//! The frontier and the accumulator are generic over a [`RawMutex`] type
//! parameter, so one implementation serves both execution modes:
//!
//! - [`NoLock`]: a no-op policy for single-threaded queries. It is
//!   deliberately `!Sync`, so sharing a `NoLock` query across threads is a
//!   compile error rather than a data race.
//! - [`SharedLock`]: a real mutex (`parking_lot`) for several worker threads
//!   cooperatively draining one query.

use std::cell::Cell;

pub use parking_lot::lock_api::RawMutex;

/// Real mutual exclusion for cooperative multi-worker drains.
pub type SharedLock = parking_lot::RawMutex;

/// Policy-generic mutex used by the frontier and accumulator.
pub(crate) type PolicyMutex<R, T> = parking_lot::lock_api::Mutex<R, T>;

/// No-op locking policy for single-threaded queries.
///
/// Lock and unlock compile to nothing. The `Cell` field keeps the type
/// `!Sync` while leaving it `Send`, so a sequential query can still be moved
/// to another thread, just not shared between threads.
pub struct NoLock {
    _not_sync: Cell<()>,
}

unsafe impl RawMutex for NoLock {
    const INIT: NoLock = NoLock {
        _not_sync: Cell::new(()),
    };

    type GuardMarker = parking_lot::lock_api::GuardSend;

    #[inline]
    fn lock(&self) {}

    #[inline]
    fn try_lock(&self) -> bool {
        true
    }

    #[inline]
    unsafe fn unlock(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nolock_mutex_round_trip() {
        let m: PolicyMutex<NoLock, u32> = PolicyMutex::new(7);
        *m.lock() += 1;
        assert_eq!(*m.lock(), 8);
    }

    #[test]
    fn shared_lock_mutex_round_trip() {
        let m: PolicyMutex<SharedLock, u32> = PolicyMutex::new(7);
        *m.lock() += 1;
        assert_eq!(*m.lock(), 8);
    }
}
