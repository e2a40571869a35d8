//! Minimal demonstration of a recurring task on the manual scheduler,
//! driven from the calling thread's own tick loop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskloom_clock::ClockConfig;
use taskloom_scheduler::{ManualScheduler, SchedulerConfig};

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let scheduler = ManualScheduler::new(
        SchedulerConfig { tick_blocks_until_available: true },
        ClockConfig::default(),
    );

    let ticks = Arc::new(AtomicUsize::new(0));
    let ticks_in_task = ticks.clone();
    let heartbeat = scheduler
        .schedule_with_fixed_delay(
            move || {
                let n = ticks_in_task.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::info!(n, "heartbeat");
            },
            0,
            50,
        )
        .expect("valid delays");

    while ticks.load(Ordering::SeqCst) < 5 {
        scheduler.tick().expect("task did not panic");
    }

    scheduler.remove(heartbeat);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(scheduler.tick().unwrap(), 0, "removed task must not fire again");
}
