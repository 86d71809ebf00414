use parking_lot::Once;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::traits::AbortSignal;

static CTRL_C_HANDLER: Once = Once::new();
static CTRL_C_RAISED: AtomicBool = AtomicBool::new(false);

/// Stops the run when the process receives `Ctrl-C`.
///
/// The first instance installs a process-wide handler; every instance then observes the same
/// flag. <div class="warning">Installing the handler replaces any `Ctrl-C` handling of other
/// libraries in the process.</div>
#[derive(Default)]
pub struct CtrlCAbortSignal;

impl CtrlCAbortSignal {
    /// Install the `Ctrl-C` handler (once per process) and return a signal observing it.
    pub fn new() -> Self {
        CTRL_C_HANDLER.call_once(|| {
            let installed = ctrlc::set_handler(|| {
                tracing::warn!("Ctrl-C pressed, stopping at the next iteration");
                CTRL_C_RAISED.store(true, Ordering::SeqCst);
            });
            if let Err(err) = installed {
                tracing::warn!("runs cannot be interrupted with Ctrl-C: {err}");
            }
        });
        Self
    }
}

impl AbortSignal for CtrlCAbortSignal {
    fn is_aborted(&self) -> bool {
        CTRL_C_RAISED.load(Ordering::SeqCst)
    }

    fn abort(&self) {
        CTRL_C_RAISED.store(true, Ordering::SeqCst);
    }
}

/// A flag raised from another thread, as [`RunHandle`](crate::runner::RunHandle) does. Share it
/// through an [`Arc`].
#[derive(Debug, Default)]
pub struct AtomicAbortSignal(AtomicBool);

impl AtomicAbortSignal {
    /// A signal which has not been raised.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }
}

impl AbortSignal for AtomicAbortSignal {
    fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// A signal which never fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopAbortSignal;

impl AbortSignal for NopAbortSignal {
    fn is_aborted(&self) -> bool {
        false
    }

    fn abort(&self) {}
}

impl<T: AbortSignal + ?Sized> AbortSignal for Arc<T> {
    fn is_aborted(&self) -> bool {
        (**self).is_aborted()
    }

    fn abort(&self) {
        (**self).abort();
    }
}
