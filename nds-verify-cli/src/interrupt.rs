//! Ctrl-C handling.
//!
//! While the ROM is being hashed, Ctrl-C sets a cancel flag that the hasher
//! checks between chunks, so the progress bar is cleared and the run ends
//! with a normal error. At any other time Ctrl-C exits immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Exit status for a run ended by Ctrl-C outside of hashing.
const INTERRUPTED_EXIT: i32 = 130;

#[derive(Clone, Default)]
pub(crate) struct Interrupt {
    cancel: Arc<AtomicBool>,
    armed: Arc<AtomicBool>,
}

impl Interrupt {
    /// Start a background thread listening for Ctrl-C. Returns `None` when
    /// the listener cannot be set up, in which case Ctrl-C keeps its default
    /// behavior.
    pub(crate) fn listen() -> Option<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| log::debug!("Ctrl-C listener unavailable: {}", e))
            .ok()?;

        let interrupt = Self::default();
        let watcher = interrupt.clone();
        thread::spawn(move || {
            rt.block_on(async {
                while tokio::signal::ctrl_c().await.is_ok() {
                    if !watcher.on_interrupt() {
                        std::process::exit(INTERRUPTED_EXIT);
                    }
                }
            })
        });
        Some(interrupt)
    }

    /// Route the next Ctrl-C to the returned flag instead of exiting.
    pub(crate) fn arm(&self) -> &AtomicBool {
        self.cancel.store(false, Ordering::SeqCst);
        self.armed.store(true, Ordering::SeqCst);
        &self.cancel
    }

    pub(crate) fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    /// Record a Ctrl-C. Returns `false` when nothing is armed and the
    /// process should exit.
    fn on_interrupt(&self) -> bool {
        if self.armed.load(Ordering::SeqCst) {
            self.cancel.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }
}
