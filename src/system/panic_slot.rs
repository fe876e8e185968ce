// src/system/panic_slot.rs

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::system::work_queue::Invocation;

type Payload = Box<dyn Any + Send + 'static>;

/// Holds the first panic raised by an invocation until a caller re-raises it.
///
/// Later panics are logged and dropped.
#[derive(Default)]
pub struct PanicSlot {
    payload: Option<Payload>,
}

impl PanicSlot {
    pub fn record(&mut self, payload: Payload) {
        if self.payload.is_none() {
            self.payload = Some(payload);
        } else {
            warn!("additional invocation panic discarded; only the first is re-raised");
        }
    }

    pub fn take(&mut self) -> Option<Payload> {
        self.payload.take()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }
}

impl std::fmt::Debug for PanicSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanicSlot")
            .field("captured", &self.payload.is_some())
            .finish()
    }
}

/// Run one invocation, trapping a panic instead of unwinding the worker.
pub fn run_trapped(invocation: &Invocation) -> Result<(), Payload> {
    panic::catch_unwind(AssertUnwindSafe(|| invocation.run())).inspect_err(|_| {
        warn!(
            launch = invocation.launch,
            index = invocation.index,
            total = invocation.total,
            "invocation panicked; it counts as completed"
        );
    })
}

/// Re-raise a captured panic on the current thread, if there is one.
pub fn resume_if_panicked(payload: Option<Payload>) {
    if let Some(payload) = payload {
        panic::resume_unwind(payload);
    }
}
