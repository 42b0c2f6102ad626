use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::state::SessionState;

/// The two lock-free flags shared between the control surface, the periodic
/// task and the completion handler.
///
/// Field ownership:
/// - `start_requested`: set by `enable()`, cleared by `disable()`, read-and-cleared
///   by the periodic task.
/// - `is_recording`: set by the periodic task on kick-off, cleared by
///   `disable()` (and by the periodic task if the kick-off is rejected), read
///   by the completion handler.
#[derive(Debug, Default)]
pub(crate) struct SessionFlags {
    start_requested: AtomicBool,
    is_recording: AtomicBool,
}

impl SessionFlags {
    pub(crate) fn state(&self) -> SessionState {
        SessionState::from_flags(
            self.start_requested.load(Ordering::SeqCst),
            self.is_recording.load(Ordering::SeqCst),
        )
    }

    pub(crate) fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    /// Consume a pending start request.
    pub(crate) fn take_start_request(&self) -> bool {
        self.start_requested.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn begin_recording(&self) {
        self.is_recording.store(true, Ordering::SeqCst);
    }

    /// Undo a kick-off the endpoint refused and queue another attempt.
    ///
    /// Returns false if `disable()` got in first, in which case nothing is
    /// re-requested.
    pub(crate) fn retry_start(&self) -> bool {
        let retried = self
            .is_recording
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if retried {
            self.start_requested.store(true, Ordering::SeqCst);
        }
        retried
    }
}

/// Cloneable handle for starting and stopping capture from any context.
///
/// Neither call touches hardware; both only flip flags that the periodic task
/// and the completion handler observe.
#[derive(Debug, Clone)]
pub struct CaptureControl {
    flags: Arc<SessionFlags>,
}

impl CaptureControl {
    pub(crate) fn new(flags: Arc<SessionFlags>) -> Self {
        Self { flags }
    }

    /// Request a capture session. Ignored while already recording.
    pub fn enable(&self) {
        if !self.flags.is_recording.load(Ordering::SeqCst) {
            self.flags.start_requested.store(true, Ordering::SeqCst);
        }
    }

    /// Request a graceful stop. In-flight transfers finish; the completion
    /// handler stops re-issuing USB writes from its next invocation.
    pub fn disable(&self) {
        self.flags.start_requested.store(false, Ordering::SeqCst);
        self.flags.is_recording.store(false, Ordering::SeqCst);
    }

    pub fn state(&self) -> SessionState {
        self.flags.state()
    }
}
