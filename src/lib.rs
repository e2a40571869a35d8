//! taskloom: a cooperating task scheduler toolkit.
//!
//! A shared, priority-ordered delayed-task queue (`taskloom-queue`) and the
//! low-overhead monotonic clock it depends on (`taskloom-clock`) back two
//! scheduler variants (`taskloom-scheduler`):
//!
//! - [`ManualScheduler`]: never owns threads of its own; a caller drives
//!   progress by calling [`ManualScheduler::tick`]. Useful when work must run
//!   on a specific externally-owned thread (a UI event loop, an I/O reactor,
//!   a deterministic test driver).
//! - [`VirtualTimeScheduler`]: the same core, but its clock is a value the
//!   caller sets rather than the wall clock, so tests can advance time
//!   arbitrarily and assert on exactly what fired.
//!
//! ```
//! use taskloom::{ManualScheduler, SchedulerConfig};
//! use taskloom_clock::ClockConfig;
//!
//! let scheduler = ManualScheduler::new(
//!     SchedulerConfig { tick_blocks_until_available: false },
//!     ClockConfig { auto_start: false, ..Default::default() },
//! );
//! scheduler.execute(|| println!("hello from taskloom")).unwrap();
//! std::thread::sleep(std::time::Duration::from_millis(5));
//! assert_eq!(scheduler.tick().unwrap(), 1);
//! ```

pub use taskloom_clock::{Clock, ClockConfig};
pub use taskloom_scheduler::{
    ManualScheduler, SchedulerConfig, SchedulerError, SchedulerResult, TaskId, VirtualTimeScheduler,
};
