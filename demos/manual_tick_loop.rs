//! Drives a manual scheduler from a hand-rolled event loop, the way a host
//! application with its own UI/IO loop would call `tick()` once per pass
//! instead of handing the scheduler a thread of its own.

use std::time::Duration;

use taskloom::{ManualScheduler, SchedulerConfig};
use taskloom_clock::ClockConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let scheduler = ManualScheduler::new(
        SchedulerConfig { tick_blocks_until_available: false },
        ClockConfig::default(),
    );

    scheduler.execute(|| tracing::info!("fires immediately"))?;
    scheduler.schedule(|| tracing::info!("fires after 50ms"), 50)?;
    scheduler.schedule(|| tracing::info!("fires after 150ms"), 150)?;

    // Stand-in for a real event loop's own pacing (frame timer, epoll
    // timeout, etc.) — here a fixed sleep between ticks.
    for _ in 0..20 {
        let dispatched = scheduler.tick()?;
        if dispatched > 0 {
            tracing::debug!(dispatched, "drained ready tasks");
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    Ok(())
}
