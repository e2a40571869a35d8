// taskloom-scheduler: configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`crate::ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerConfig {
    /// When `true`, `tick()` with no ready tasks blocks until at least one
    /// runs. When `false`, `tick()` returns `0` immediately.
    pub tick_blocks_until_available: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_blocks_until_available: false,
        }
    }
}
