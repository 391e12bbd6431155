//! Window-resize notification.
//!
//! The signal handler registered here only flips an atomic flag; the main
//! loop consumes it at the top of its next iteration and does the terminal
//! work itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct ResizeSignal {
    flag: Arc<AtomicBool>,
}

impl ResizeSignal {
    /// Create the flag and hook it to SIGWINCH where the platform has one.
    /// Registration failure is logged and otherwise ignored; crossterm's own
    /// resize events still arrive through the input poll.
    pub fn register() -> Self {
        let signal = Self::default();

        #[cfg(unix)]
        {
            use signal_hook::consts::SIGWINCH;
            if let Err(err) = signal_hook::flag::register(SIGWINCH, Arc::clone(&signal.flag)) {
                tracing::warn!(error = %err, "failed to register SIGWINCH");
            }
        }

        signal
    }

    /// Check (and clear) whether a resize was signalled.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::Relaxed)
    }
}
