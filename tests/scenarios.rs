//! End-to-end acceptance tests against the public `taskloom` facade,
//! covering spec.md §8's concrete scenarios that exercise real wall-clock
//! timing (the pure-ordering scenarios live in
//! `taskloom-scheduler/tests/property_invariants.rs` and
//! `taskloom-scheduler/src/virtual_time.rs`'s unit tests against the
//! virtual-time variant).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use taskloom::{ManualScheduler, SchedulerConfig};
use taskloom_clock::ClockConfig;

fn scheduler() -> ManualScheduler {
    ManualScheduler::new(
        SchedulerConfig { tick_blocks_until_available: false },
        ClockConfig { refresh_cadence_ms: 5, auto_start: true },
    )
}

#[test]
fn earlier_delay_fires_before_later_one_on_wall_clock() {
    let scheduler = scheduler();
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    let (oa, ob) = (order.clone(), order.clone());
    scheduler.schedule(move || oa.lock().unwrap().push("a"), 60).unwrap();
    scheduler.schedule(move || ob.lock().unwrap().push("b"), 0).unwrap();

    std::thread::sleep(Duration::from_millis(15));
    assert_eq!(scheduler.tick().unwrap(), 1);
    assert_eq!(*order.lock().unwrap(), vec!["b"]);

    std::thread::sleep(Duration::from_millis(80));
    assert_eq!(scheduler.tick().unwrap(), 1);
    assert_eq!(*order.lock().unwrap(), vec!["b", "a"]);
}

#[test]
fn clear_tasks_empties_queue_without_running() {
    let scheduler = scheduler();
    let ran = Arc::new(AtomicUsize::new(0));
    let ran2 = ran.clone();
    scheduler.schedule(move || { ran2.fetch_add(1, Ordering::SeqCst); }, 50).unwrap();
    assert!(!scheduler.has_task_ready_to_run());

    scheduler.clear_tasks();

    std::thread::sleep(Duration::from_millis(80));
    assert_eq!(scheduler.tick().unwrap(), 0);
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[test]
fn recurring_task_survives_across_many_firings_until_removed() {
    let scheduler = scheduler();
    let runs = Arc::new(AtomicUsize::new(0));
    let runs2 = runs.clone();
    let id = scheduler
        .schedule_with_fixed_delay(move || { runs2.fetch_add(1, Ordering::SeqCst); }, 0, 15)
        .unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while runs.load(Ordering::SeqCst) < 3 && std::time::Instant::now() < deadline {
        scheduler.tick().unwrap();
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(runs.load(Ordering::SeqCst) >= 3);

    assert!(scheduler.remove(id));
    let observed_at_removal = runs.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(100));
    scheduler.tick().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), observed_at_removal);
}
