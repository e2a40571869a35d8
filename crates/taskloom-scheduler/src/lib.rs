//! Manual and virtual-time task scheduler variants over the taskloom
//! delayed-task queue: accept, order, dispatch, cancel, and recur tasks with
//! delays, sharing one substrate and differing only in who advances time and
//! who executes work.

mod config;
mod error;
mod manual;
mod virtual_time;

pub use config::SchedulerConfig;
pub use error::{SchedulerError, SchedulerResult};
pub use manual::ManualScheduler;
pub use taskloom_queue::TaskId;
pub use virtual_time::VirtualTimeScheduler;
