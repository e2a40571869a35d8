// taskloom-scheduler: manual scheduler — a caller drives progress via tick()

use std::sync::Arc;

use taskloom_clock::{Clock, ClockConfig};
use taskloom_queue::{CachedClockSource, TaskId, TaskQueue};
use tracing::instrument;

use crate::config::SchedulerConfig;
use crate::error::{invoke_catching, SchedulerError, SchedulerResult};

/// A scheduler that never owns threads of its own (beyond the clock's
/// refresher); a caller drives progress by invoking [`ManualScheduler::tick`]
/// on whatever thread it likes — a UI event loop, an I/O reactor, or a test
/// driver.
///
/// Submissions and removals may come from any thread; exactly one thread
/// should drive dispatch via `tick` at a time (see the concurrency note on
/// [`ManualScheduler::tick`]).
pub struct ManualScheduler {
    clock: Arc<Clock>,
    queue: TaskQueue,
    config: SchedulerConfig,
}

impl ManualScheduler {
    /// Construct a scheduler with its own clock, configured from
    /// `clock_config`, running on `config`.
    pub fn new(config: SchedulerConfig, clock_config: ClockConfig) -> Self {
        let clock = Clock::new(clock_config);
        Self::with_clock(config, clock)
    }

    /// Construct a scheduler over a caller-supplied, possibly-shared clock
    /// (e.g. [`Clock::shared`]).
    pub fn with_clock(config: SchedulerConfig, clock: Arc<Clock>) -> Self {
        let queue = TaskQueue::new(Arc::new(CachedClockSource(clock.clone())));
        Self { clock, queue, config }
    }

    /// The clock backing this scheduler's fire-time stamps.
    pub fn clock(&self) -> &Arc<Clock> {
        &self.clock
    }

    /// Equivalent to `schedule(task, 0)`.
    pub fn execute<F>(&self, task: F) -> SchedulerResult<TaskId>
    where
        F: FnMut() + Send + 'static,
    {
        self.schedule(task, 0)
    }

    /// Insert a one-shot container firing `delay_ms` from now. Rejects a
    /// negative delay.
    pub fn schedule<F>(&self, task: F, delay_ms: i64) -> SchedulerResult<TaskId>
    where
        F: FnMut() + Send + 'static,
    {
        if delay_ms < 0 {
            return Err(SchedulerError::InvalidArgument(format!(
                "delay_ms must be non-negative, got {delay_ms}"
            )));
        }
        Ok(self.queue.insert_one_shot(task, delay_ms))
    }

    /// Insert a recurring container. Rejects negative delays.
    pub fn schedule_with_fixed_delay<F>(
        &self,
        task: F,
        initial_delay_ms: i64,
        recurring_delay_ms: i64,
    ) -> SchedulerResult<TaskId>
    where
        F: FnMut() + Send + 'static,
    {
        if initial_delay_ms < 0 || recurring_delay_ms < 0 {
            return Err(SchedulerError::InvalidArgument(format!(
                "delays must be non-negative, got initial={initial_delay_ms} recurring={recurring_delay_ms}"
            )));
        }
        Ok(self
            .queue
            .insert_recurring(task, initial_delay_ms, recurring_delay_ms))
    }

    /// Remove the first container whose task equals `id`. Works for both
    /// one-shot and recurring containers; a removal that returns `true`
    /// guarantees the task will not fire again via this scheduler.
    pub fn remove(&self, id: TaskId) -> bool {
        self.queue.remove_by_id(id)
    }

    /// Empty the queue without running anything.
    pub fn clear_tasks(&self) {
        self.queue.clear();
    }

    /// Best-effort, lock-free: is the head ready to run right now?
    pub fn has_task_ready_to_run(&self) -> bool {
        self.queue.has_ready_hint(self.clock.now_cached())
    }

    /// This scheduler has no lifecycle of its own: always `false`.
    pub fn is_shutdown(&self) -> bool {
        false
    }

    /// Drain all ready tasks, running each in submission order within a
    /// fire-time tie. If `tick_blocks_until_available` is set and nothing
    /// was ready, blocks until either a submission arrives or the head's
    /// delay expires, then drains again.
    ///
    /// # Concurrency
    ///
    /// `tick` does **not** guard against concurrent callers. The ready-check
    /// and the dequeue/reposition it triggers serialize individually inside
    /// the queue mutex, but not as one atomic step across a whole `tick`
    /// call, so two threads calling `tick` concurrently could in principle
    /// both observe the same container ready before either dequeues it.
    /// Callers must ensure at most one `tick` is in flight at a time; this
    /// is a deliberate choice to keep the fast path lock-light rather than
    /// serializing submissions against dispatch.
    ///
    /// If a task panics, the error propagates as `Err`; its container has
    /// already been dequeued or repositioned, so the scheduler remains
    /// usable for a subsequent `tick`.
    #[instrument(level = "debug", skip(self), fields(count = tracing::field::Empty))]
    pub fn tick(&self) -> SchedulerResult<usize> {
        loop {
            let mut count = 0usize;
            while let Some(body) = self.queue.take_ready() {
                count += 1;
                let mut guard = body.lock();
                invoke_catching(&mut **guard)?;
            }
            tracing::Span::current().record("count", count);

            if !self.config.tick_blocks_until_available || count > 0 {
                return Ok(count);
            }
            self.queue.wait_for_ready_or_submission();
        }
    }
}
