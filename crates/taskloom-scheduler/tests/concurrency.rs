//! Cross-thread integration tests for the manual scheduler: submissions and
//! removals from one thread observed by a `tick` loop on another.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use taskloom_clock::ClockConfig;
use taskloom_scheduler::{ManualScheduler, SchedulerConfig};

fn blocking_scheduler() -> Arc<ManualScheduler> {
    Arc::new(ManualScheduler::new(
        SchedulerConfig { tick_blocks_until_available: true },
        ClockConfig { refresh_cadence_ms: 5, auto_start: true },
    ))
}

#[test]
fn blocked_tick_wakes_within_a_bound_of_submission() {
    // spec.md §8 concrete scenario 5 / invariant P6
    let scheduler = blocking_scheduler();
    let ran = Arc::new(AtomicUsize::new(0));

    let started = Instant::now();
    let ticker = {
        let scheduler = scheduler.clone();
        std::thread::spawn(move || scheduler.tick().unwrap())
    };

    std::thread::sleep(Duration::from_millis(15));
    let ran2 = ran.clone();
    scheduler.execute(move || { ran2.fetch_add(1, Ordering::SeqCst); }).unwrap();

    let count = ticker.join().expect("ticker thread panicked");
    let elapsed = started.elapsed();

    assert_eq!(count, 1);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert!(elapsed < Duration::from_secs(1), "tick did not wake promptly: {elapsed:?}");
}

#[test]
fn blocked_tick_wakes_within_a_bound_of_delay_expiry() {
    let scheduler = blocking_scheduler();
    let ran = Arc::new(AtomicUsize::new(0));
    let ran2 = ran.clone();
    scheduler.schedule(move || { ran2.fetch_add(1, Ordering::SeqCst); }, 30).unwrap();

    let started = Instant::now();
    let count = scheduler.tick().unwrap();
    let elapsed = started.elapsed();

    assert_eq!(count, 1);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert!(elapsed >= Duration::from_millis(25));
    assert!(elapsed < Duration::from_secs(1), "tick waited too long: {elapsed:?}");
}

#[test]
fn removal_from_another_thread_prevents_future_firings() {
    // invariant P5: remove idempotence, exercised across threads
    let scheduler = blocking_scheduler();
    let runs = Arc::new(AtomicUsize::new(0));
    let runs2 = runs.clone();
    let id = scheduler
        .schedule_with_fixed_delay(move || { runs2.fetch_add(1, Ordering::SeqCst); }, 0, 20)
        .unwrap();

    // let the first firing happen
    scheduler.tick().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    let remover = {
        let scheduler = scheduler.clone();
        std::thread::spawn(move || scheduler.remove(id))
    };
    assert!(remover.join().unwrap());
    assert!(!scheduler.remove(id));

    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(scheduler.tick().unwrap(), 0);
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_submissions_from_many_threads_all_eventually_run() {
    let scheduler = blocking_scheduler();
    let ran = Arc::new(AtomicUsize::new(0));

    let submitters: Vec<_> = (0..8)
        .map(|_| {
            let scheduler = scheduler.clone();
            let ran = ran.clone();
            std::thread::spawn(move || {
                scheduler.execute(move || { ran.fetch_add(1, Ordering::SeqCst); }).unwrap();
            })
        })
        .collect();
    for s in submitters {
        s.join().unwrap();
    }

    let mut dispatched = 0;
    let deadline = Instant::now() + Duration::from_secs(2);
    while dispatched < 8 && Instant::now() < deadline {
        dispatched += scheduler.tick().unwrap();
    }

    assert_eq!(dispatched, 8);
    assert_eq!(ran.load(Ordering::SeqCst), 8);
}
