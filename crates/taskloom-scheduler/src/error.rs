// taskloom-scheduler: error types

use thiserror::Error;

/// Result type returned by the taskloom scheduler variants.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A task's body panicked during `tick`. The container had already been
    /// dequeued (one-shot) or repositioned (recurring) before the body ran,
    /// so the scheduler itself remains usable after this error.
    #[error("task failed: {0}")]
    TaskFailure(String),

    /// Reserved for parity with the original error taxonomy: a blocking
    /// `tick` interrupted by a signal. `std::sync::Condvar` has no
    /// interruption concept, so this implementation never raises it.
    #[error("scheduler wait was interrupted")]
    Interrupted,
}

/// Run `body`, converting a panic into `SchedulerError::TaskFailure` instead
/// of letting it unwind across the scheduler's public API.
pub(crate) fn invoke_catching(body: &mut (dyn FnMut() + Send)) -> SchedulerResult<()> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(body))
        .map_err(|payload| SchedulerError::TaskFailure(panic_message(payload)))
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked with a non-string payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoke_catching_passes_through_success() {
        let mut called = false;
        let result = invoke_catching(&mut || called = true);
        assert!(result.is_ok());
        assert!(called);
    }

    #[test]
    fn invoke_catching_converts_panic_with_str_payload() {
        let result = invoke_catching(&mut || panic!("boom"));
        match result {
            Err(SchedulerError::TaskFailure(msg)) => assert_eq!(msg, "boom"),
            other => panic!("expected TaskFailure, got {other:?}"),
        }
    }

    #[test]
    fn invoke_catching_converts_panic_with_string_payload() {
        let result = invoke_catching(&mut || panic!("{}", format!("boom {}", 1)));
        match result {
            Err(SchedulerError::TaskFailure(msg)) => assert_eq!(msg, "boom 1"),
            other => panic!("expected TaskFailure, got {other:?}"),
        }
    }
}
