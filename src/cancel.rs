//! One-shot broadcast cancellation.
//!
//! A [`CancelToken`] owns the only sender of a zero-capacity channel. Cancelling drops that
//! sender, which disconnects the channel: every receiver parked in a `select!` on
//! [`CancelToken::signal`] wakes at once, and every later select sees it ready immediately.

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Debug)]
pub struct CancelToken {
    fired: Arc<AtomicBool>,
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded::<()>(0);
        Self {
            fired: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Mutex::new(Some(tx))),
            signal: rx,
        }
    }

    /// Fire the signal. Idempotent; only the first call has an effect.
    pub fn cancel(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        self.trigger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Receiver that becomes ready (disconnected) once the token fires. Never yields a value.
    pub fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}

/// Exit status used when a second interrupt arrives while the first is still being handled.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Route SIGINT/SIGTERM to `token`. Can only be installed once per process.
/// The first signal cancels; a second one exits at once (a blocked stdin read never sees the token).
pub fn install_signal_handler(token: &CancelToken) -> Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        if token.is_cancelled() {
            log::warn!("Second interrupt; exiting without output");
            std::process::exit(FORCED_EXIT_CODE);
        }
        log::warn!("Interrupt received; finishing with what has been read so far");
        token.cancel();
    })
    .context("set Ctrl+C handler")
}
