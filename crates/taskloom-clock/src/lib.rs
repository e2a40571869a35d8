//! Cached monotonic clock used as the default time source for the manual
//! scheduler. A background refresher keeps a cheap atomic snapshot fresh so
//! the scheduling hot path never pays for a syscall.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default cadence of the background refresher, in milliseconds.
pub const DEFAULT_REFRESH_CADENCE_MS: u64 = 100;

/// Configuration for a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockConfig {
    /// How often the background refresher samples the system clock.
    pub refresh_cadence_ms: u64,
    /// Whether [`Clock::new`] starts the refresher immediately.
    pub auto_start: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            refresh_cadence_ms: DEFAULT_REFRESH_CADENCE_MS,
            auto_start: true,
        }
    }
}

struct Refresher {
    stop: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
    cadence_ms: u64,
}

/// A process-wide-capable "milliseconds since epoch" clock with a cheap
/// cached read and an accurate (syscall) read.
///
/// `now_cached` is wait-free: it loads an `AtomicI64` that a daemon thread
/// refreshes on a fixed cadence. `now_accurate` always performs a real read
/// and republishes it, so callers that can't tolerate refresher lag may use
/// it directly.
pub struct Clock {
    cached_ms: AtomicI64,
    refresher: Mutex<Option<Refresher>>,
    default_cadence_ms: u64,
    auto_start: bool,
}

static SHARED: OnceLock<Arc<Clock>> = OnceLock::new();

impl Clock {
    /// Construct a clock from `config`. If `config.auto_start` is set the
    /// refresher daemon is spawned immediately.
    pub fn new(config: ClockConfig) -> Arc<Self> {
        let clock = Arc::new(Self {
            cached_ms: AtomicI64::new(current_epoch_ms()),
            refresher: Mutex::new(None),
            default_cadence_ms: config.refresh_cadence_ms,
            auto_start: config.auto_start,
        });
        if clock.auto_start {
            clock.start_refresher();
        }
        clock
    }

    /// The process-wide default clock, lazily constructed on first use with
    /// [`ClockConfig::default`]. Convenience only — prefer [`Clock::new`]
    /// when a caller owns the clock's lifecycle explicitly.
    pub fn shared() -> Arc<Clock> {
        SHARED.get_or_init(|| Clock::new(ClockConfig::default())).clone()
    }

    /// Last-refreshed millisecond value. No syscall, non-blocking.
    pub fn now_cached(&self) -> i64 {
        self.cached_ms.load(Ordering::Relaxed)
    }

    /// Perform a system time read, publish it as the new cached value, and
    /// return it. Thread-safe; concurrent callers race but the store is
    /// atomic, so no torn read is possible even on 32-bit hosts.
    pub fn now_accurate(&self) -> i64 {
        let now = current_epoch_ms();
        self.cached_ms.store(now, Ordering::Relaxed);
        now
    }

    /// Idempotent: spawns at most one refresher daemon, using the cadence
    /// from this clock's configuration.
    pub fn start_refresher(self: &Arc<Self>) {
        self.start_refresher_with_cadence(self.default_cadence_ms);
    }

    /// As [`Clock::start_refresher`] but with an explicit cadence.
    pub fn start_refresher_with_cadence(self: &Arc<Self>, cadence_ms: u64) {
        let mut guard = self.refresher.lock().expect("refresher mutex poisoned");
        if guard.is_some() {
            return;
        }
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = stop.clone();
        let clock = self.clone();
        let join = std::thread::Builder::new()
            .name("taskloom-clock-refresher".to_owned())
            .spawn(move || refresher_loop(clock, stop_for_thread, cadence_ms))
            .expect("failed to spawn clock refresher thread");
        *guard = Some(Refresher {
            stop,
            join: Some(join),
            cadence_ms,
        });
        tracing::debug!(cadence_ms, "clock refresher started");
    }

    /// Signals the daemon and waits for it to exit. Idempotent: calling this
    /// with no refresher running is a no-op.
    pub fn stop_refresher(&self) {
        let mut guard = self.refresher.lock().expect("refresher mutex poisoned");
        if let Some(mut refresher) = guard.take() {
            refresher.stop.store(true, Ordering::SeqCst);
            if let Some(join) = refresher.join.take() {
                let _ = join.join();
            }
            tracing::debug!("clock refresher stopped");
        }
    }

    /// Whether a refresher daemon is currently running.
    pub fn is_refresher_running(&self) -> bool {
        self.refresher.lock().expect("refresher mutex poisoned").is_some()
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop_refresher();
    }
}

fn refresher_loop(clock: Arc<Clock>, stop: Arc<AtomicBool>, cadence_ms: u64) {
    let cadence = Duration::from_millis(cadence_ms.max(1));
    while !stop.load(Ordering::SeqCst) {
        clock.now_accurate();
        std::thread::sleep(cadence);
    }
}

fn current_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
