//! The ordered delayed-task queue shared by every taskloom scheduler
//! variant: the ordering discipline, the clock-freeze bracket that keeps
//! reposition math consistent, and the time-source abstraction that lets the
//! same queue run off either the cached wall clock or a virtual clock.

mod freeze;
mod queue;
mod time_source;

pub use freeze::FreezeGuard;
pub use queue::{TaskBody, TaskId, TaskQueue};
pub use time_source::{CachedClockSource, TimeSource, VirtualTimeSource};
