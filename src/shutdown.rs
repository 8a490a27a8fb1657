//! Ctrl+C driven shutdown of the listener loop

use anyhow::{Context, Result};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set once shutdown has been requested; safe to share with a signal handler
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Request shutdown on Ctrl+C (SIGINT)
    pub fn install_ctrlc_handler(&self) -> Result<()> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            info!("Shutdown requested");
            flag.request();
        })
        .context("Failed to set Ctrl+C handler")
    }
}

/// Run `slice` until shutdown is requested, returning how many slices ran
///
/// Each slice must return within a bounded time so the flag is noticed.
pub fn run_until_shutdown(flag: &ShutdownFlag, mut slice: impl FnMut()) -> usize {
    let mut slices = 0;
    while !flag.is_requested() {
        slice();
        slices += 1;
    }
    slices
}
