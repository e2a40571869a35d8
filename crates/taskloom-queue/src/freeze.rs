//! The clock-freeze bracket: a scoped region during which every `now()` read
//! made through a [`TimeSource`](crate::TimeSource) returns one stable
//! snapshot, regardless of how much real time passes while the bracket is
//! held.
//!
//! Without this, an insertion-index search that spans several comparisons
//! can observe the clock ticking forward mid-search and misplace an entry
//! relative to ones it already compared against, silently violating the
//! queue's sortedness invariant.

use std::cell::Cell;

use crate::TimeSource;

thread_local! {
    static FROZEN_AT: Cell<Option<i64>> = const { Cell::new(None) };
}

/// RAII guard for a clock-freeze bracket. Brackets nest: only the outermost
/// `begin()` captures a snapshot, and only the outermost guard's `Drop`
/// releases it, so a freezing operation may safely call into another
/// freezing operation without losing its own stable snapshot.
///
/// The bracket is released on `Drop` unconditionally, including on unwind
/// from a panic inside the bracketed region.
#[must_use]
pub struct FreezeGuard {
    owns_bracket: bool,
}

impl FreezeGuard {
    /// Enter a clock-freeze bracket, snapshotting `source.now_raw()` if no
    /// bracket is already active on this thread.
    pub fn begin(source: &dyn TimeSource) -> Self {
        let owns_bracket = FROZEN_AT.with(|cell| {
            if cell.get().is_none() {
                cell.set(Some(source.now_raw()));
                true
            } else {
                false
            }
        });
        Self { owns_bracket }
    }
}

impl Drop for FreezeGuard {
    fn drop(&mut self) {
        if self.owns_bracket {
            FROZEN_AT.with(|cell| cell.set(None));
        }
    }
}

/// Read the current time as seen by scheduling code: the frozen snapshot if
/// a bracket is active on this thread, otherwise a fresh read from `source`.
pub fn now(source: &dyn TimeSource) -> i64 {
    FROZEN_AT.with(|cell| cell.get()).unwrap_or_else(|| source.now_raw())
}
