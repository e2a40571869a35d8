// taskloom-scheduler: virtual-time scheduler — same core, caller-driven clock

use std::sync::Arc;

use taskloom_queue::{TaskId, TaskQueue, VirtualTimeSource};
use tracing::instrument;

use crate::error::{invoke_catching, SchedulerError, SchedulerResult};

/// The same scheduling core as [`crate::ManualScheduler`], except its
/// internal `now()` is a value the caller sets rather than the cached wall
/// clock. Enables deterministic tests: advance past the Nth recurrence of a
/// task and assert the count.
pub struct VirtualTimeScheduler {
    time: Arc<VirtualTimeSource>,
    queue: TaskQueue,
}

impl VirtualTimeScheduler {
    /// Construct a scheduler whose virtual clock starts at `initial_time_ms`.
    pub fn new(initial_time_ms: i64) -> Self {
        let time = Arc::new(VirtualTimeSource::new(initial_time_ms));
        let queue = TaskQueue::new(time.clone());
        Self { time, queue }
    }

    /// The virtual clock's current value.
    pub fn now(&self) -> i64 {
        self.time.get()
    }

    /// Equivalent to `schedule(task, 0)`.
    pub fn execute<F>(&self, task: F) -> SchedulerResult<TaskId>
    where
        F: FnMut() + Send + 'static,
    {
        self.schedule(task, 0)
    }

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

    pub fn remove(&self, id: TaskId) -> bool {
        self.queue.remove_by_id(id)
    }

    pub fn clear_tasks(&self) {
        self.queue.clear();
    }

    pub fn has_task_ready_to_run(&self) -> bool {
        self.queue.has_ready_hint(self.time.get())
    }

    pub fn is_shutdown(&self) -> bool {
        false
    }

    /// Set the virtual clock to `now_ms` and drain everything that becomes
    /// ready at that instant, running each in order.
    #[instrument(level = "debug", skip(self), fields(now_ms, count = tracing::field::Empty))]
    pub fn tick(&self, now_ms: i64) -> SchedulerResult<usize> {
        self.time.set(now_ms);
        let mut count = 0usize;
        while let Some(body) = self.queue.take_ready() {
            count += 1;
            let mut guard = body.lock();
            invoke_catching(&mut **guard)?;
        }
        tracing::Span::current().record("count", count);
        Ok(count)
    }

    /// Move the virtual clock forward by `delta_ms` and drain, equivalent to
    /// `tick(now() + delta_ms)`.
    pub fn advance(&self, delta_ms: i64) -> SchedulerResult<usize> {
        let target = self.time.get() + delta_ms;
        self.tick(target)
    }

    /// Move the virtual clock to `now_ms` without draining. Useful for
    /// rewinding or resetting in tests; ordinary progress should go through
    /// [`VirtualTimeScheduler::tick`] or [`VirtualTimeScheduler::advance`].
    pub fn set_time(&self, now_ms: i64) {
        self.time.set(now_ms);
    }
}
