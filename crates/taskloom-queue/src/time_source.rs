//! Abstraction over "where does `now()` come from" so the queue and its
//! containers are agnostic to whether they're driven by the cached wall
//! clock (manual scheduler) or a caller-supplied virtual clock (virtual-time
//! scheduler).

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use taskloom_clock::Clock;

/// A source of "milliseconds, as of now" readings for scheduling code.
/// Implementations must be cheap and side-effect-free beyond the read
/// itself — the clock-freeze bracket (`crate::freeze`) assumes calling
/// `now_raw()` repeatedly is safe and idempotent-enough to snapshot.
pub trait TimeSource: Send + Sync {
    fn now_raw(&self) -> i64;
}

/// Time source backed by a [`taskloom_clock::Clock`]'s cached read — the
/// time source used by [`crate::TaskQueue`] when driven by the manual
/// scheduler.
pub struct CachedClockSource(pub Arc<Clock>);

impl TimeSource for CachedClockSource {
    fn now_raw(&self) -> i64 {
        self.0.now_cached()
    }
}

/// Time source backed by an atomic set purely by the caller — the time
/// source used by the virtual-time scheduler. `set` and `advance` are the
/// only ways this value changes; there is no background refresher.
pub struct VirtualTimeSource {
    now_ms: AtomicI64,
}

impl VirtualTimeSource {
    pub fn new(initial_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(initial_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) -> i64 {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst) + delta_ms
    }

    pub fn get(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

impl TimeSource for VirtualTimeSource {
    fn now_raw(&self) -> i64 {
        self.get()
    }
}
