//! Cooperative cancellation flag shared between a scheduler and its owner.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Externally settable stop flag, checked by the scheduler at tick boundaries.
///
/// Clones share the same flag. Setting it never interrupts work that is
/// already running; the scheduler observes it before the next invocation.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancelSignal {
    /// Create a signal in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
