use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::freeze::{self, FreezeGuard};
use crate::TimeSource;

/// Opaque handle to a submitted task, returned by the scheduler at
/// submission time. Stands in for the original design's task-value equality
/// (see `SPEC_FULL.md` §3): `remove(id)` removes the container this handle
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// The runnable body of a task, shared so a recurring container can sit
/// back in the queue (available for the next firing, and for
/// identity-based removal) while the body that just fired runs outside the
/// queue mutex.
pub type TaskBody = Arc<Mutex<Box<dyn FnMut() + Send>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskKind {
    OneShot,
    Recurring { recurring_delay_ms: i64 },
}

struct DelayedTask {
    id: TaskId,
    body: TaskBody,
    fire_time_ms: i64,
    kind: TaskKind,
}

impl DelayedTask {
    fn remaining_delay(&self, now: i64) -> i64 {
        self.fire_time_ms - now
    }

    fn is_ready(&self, now: i64) -> bool {
        self.remaining_delay(now) <= 0
    }
}

/// A mutable, concurrency-aware sequence of delayed-task containers kept
/// sorted ascending by fire time, guarded by a single modification mutex
/// that doubles as the condvar used by a blocking `tick`.
///
/// Storage is a `VecDeque`: end insertions/removals (the dominant traffic —
/// the head pops on every one-shot firing, the tail grows on every
/// recurring reposition) are O(1) amortized at the ends and
/// O(min(k, n-k)) at an arbitrary index, matching the complexity contract
/// of spec.md §4.4 without a bespoke segmented-array allocator.
pub struct TaskQueue {
    time_source: Arc<dyn TimeSource>,
    state: Mutex<VecDeque<DelayedTask>>,
    condvar: Condvar,
    next_id: AtomicU64,
    /// Lock-free best-effort snapshot of the head's fire time, for the fast
    /// `has_task_ready_to_run` path. `i64::MAX` means "empty or stale empty".
    head_hint_ms: AtomicI64,
}

impl TaskQueue {
    pub fn new(time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            time_source,
            state: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            next_id: AtomicU64::new(1),
            head_hint_ms: AtomicI64::new(i64::MAX),
        }
    }

    /// Insert a one-shot container. `stamp_initial` happens here, inside the
    /// queue mutex and inside a clock-freeze bracket, per spec.md §4.2.
    pub fn insert_one_shot<F>(&self, body: F, delay_ms: i64) -> TaskId
    where
        F: FnMut() + Send + 'static,
    {
        self.insert(Box::new(body), TaskKind::OneShot, delay_ms)
    }

    /// Insert a recurring container with the given initial delay and
    /// recurrence period.
    pub fn insert_recurring<F>(&self, body: F, initial_delay_ms: i64, recurring_delay_ms: i64) -> TaskId
    where
        F: FnMut() + Send + 'static,
    {
        self.insert(
            Box::new(body),
            TaskKind::Recurring { recurring_delay_ms },
            initial_delay_ms,
        )
    }

    fn insert(&self, body: Box<dyn FnMut() + Send>, kind: TaskKind, delay_ms: i64) -> TaskId {
        let _freeze = FreezeGuard::begin(&*self.time_source);
        let now = freeze::now(&*self.time_source);
        let fire_time_ms = now + delay_ms;
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let entry = DelayedTask {
            id,
            body: Arc::new(Mutex::new(body)),
            fire_time_ms,
            kind,
        };

        let mut guard = self.state.lock();
        let idx = insertion_index_ascending(&mut guard, fire_time_ms);
        guard.insert(idx, entry);
        self.update_head_hint(&guard);
        self.condvar.notify_one();
        tracing::trace!(task_id = id.0, fire_time_ms, idx, "task inserted");
        id
    }

    /// Remove the first container whose task equals `id`. Works for both
    /// one-shot and recurring containers; a recurring container removed
    /// between firings does not fire again.
    pub fn remove_by_id(&self, id: TaskId) -> bool {
        let mut guard = self.state.lock();
        let removed = if let Some(pos) = guard.iter().position(|e| e.id == id) {
            guard.remove(pos);
            true
        } else {
            false
        };
        if removed {
            self.update_head_hint(&guard);
            tracing::trace!(task_id = id.0, "task removed");
        }
        removed
    }

    /// Drop all containers without running them.
    pub fn clear(&self) {
        let mut guard = self.state.lock();
        let dropped = guard.len();
        guard.clear();
        self.update_head_hint(&guard);
        tracing::trace!(dropped, "queue cleared");
    }

    /// If the head is ready, dequeue (one-shot) or reposition (recurring)
    /// it — inside the queue mutex and a clock-freeze bracket so the `now`
    /// used for the readiness check and for the recurring reposition's new
    /// fire time are identical — and return its body to be invoked outside
    /// the lock. Returns `None` if the head is missing or not yet ready.
    pub fn take_ready(&self) -> Option<TaskBody> {
        let _freeze = FreezeGuard::begin(&*self.time_source);
        let now = freeze::now(&*self.time_source);

        let mut guard = self.state.lock();
        let ready = matches!(guard.front(), Some(front) if front.is_ready(now));
        if !ready {
            return None;
        }
        let mut entry = guard.pop_front().expect("front checked ready above");
        let body = entry.body.clone();

        if let TaskKind::Recurring { recurring_delay_ms } = entry.kind {
            entry.fire_time_ms = now + recurring_delay_ms;
            // Searched from the rear: a just-repositioned recurring task's
            // new fire time is almost always the largest (or near-largest)
            // in the queue, since it landed `recurring_delay_ms` in the
            // future. `entry` was already popped, so it is structurally
            // excluded from this search (spec.md §9's open question).
            let idx = insertion_index_from_rear(&guard, entry.fire_time_ms);
            let task_id = entry.id;
            guard.insert(idx, entry);
            tracing::trace!(task_id = task_id.0, idx, "recurring task repositioned");
        }

        self.update_head_hint(&guard);
        Some(body)
    }

    /// Non-blocking, lock-free best-effort check: is the head (as of the
    /// last mutation) ready relative to `now`?
    pub fn has_ready_hint(&self, now: i64) -> bool {
        self.head_hint_ms.load(Ordering::Acquire) <= now
    }

    /// Re-inspect the head under the mutex and wait exactly once: forever if
    /// the queue is empty, for the head's remaining delay if it has one, or
    /// not at all if the head turns out to already be ready (a race between
    /// the caller's last check and this one). Matches step 3 of spec.md
    /// §4.5's `tick` algorithm.
    pub fn wait_for_ready_or_submission(&self) {
        let mut guard = self.state.lock();
        match guard.front() {
            None => {
                self.condvar.wait(&mut guard);
            }
            Some(front) => {
                let now = self.time_source.now_raw();
                let remaining = front.remaining_delay(now);
                if remaining > 0 {
                    self.condvar
                        .wait_for(&mut guard, Duration::from_millis(remaining as u64));
                }
                // remaining <= 0: fall through without waiting.
            }
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Test/property-test helper: is the queue sorted ascending by fire
    /// time? (P1 in spec.md §8.)
    pub fn is_sorted(&self) -> bool {
        let guard = self.state.lock();
        guard.iter().map(|e| e.fire_time_ms).collect::<Vec<_>>().windows(2).all(|w| w[0] <= w[1])
    }

    fn update_head_hint(&self, guard: &VecDeque<DelayedTask>) {
        let v = guard.front().map(|e| e.fire_time_ms).unwrap_or(i64::MAX);
        self.head_hint_ms.store(v, Ordering::Release);
    }
}

/// First index at which an existing entry's fire time is strictly greater
/// than `fire_time_ms` — i.e. last-equal-wins: ties are placed after
/// existing equal-keyed entries, preserving FIFO fairness (P2).
fn insertion_index_ascending(deque: &mut VecDeque<DelayedTask>, fire_time_ms: i64) -> usize {
    let slice = deque.make_contiguous();
    slice.partition_point(|e| e.fire_time_ms <= fire_time_ms)
}

/// Same ordering rule as [`insertion_index_ascending`], but scans from the
/// tail: a recurring task's freshly-stamped fire time is almost always near
/// the back of the queue, so starting there avoids walking the whole deque
/// on every reposition.
fn insertion_index_from_rear(deque: &VecDeque<DelayedTask>, fire_time_ms: i64) -> usize {
    let mut idx = deque.len();
    while idx > 0 && deque[idx - 1].fire_time_ms > fire_time_ms {
        idx -= 1;
    }
    idx
}
