//! Cooperative cancellation for long-running pipeline operations.
//!
//! Long-running loops (PDF page assembly, DOCX paragraph decoding, the
//! per-chunk summarization loop) poll a [`CancelToken`] between iterations
//! and unwind without partial results. The flag is a plain atomic so it can
//! be checked from inside `spawn_blocking` closures as well as async code.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Cloneable cancellation handle. All clones share one flag; canceling any
/// of them cancels the operation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Cancel-and-replace guard: at most one pipeline run is active per guard.
/// Starting a new run cancels the previous one (last request wins).
#[derive(Debug, Default)]
pub struct SingleFlight {
    current: Mutex<Option<CancelToken>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any in-flight run and hand out a fresh token for the next one.
    pub fn begin(&self) -> CancelToken {
        let token = CancelToken::new();
        let mut current = self.current.lock().expect("single-flight lock poisoned");
        if let Some(previous) = current.replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel the in-flight run, if any, without starting a new one.
    pub fn cancel_current(&self) {
        let current = self.current.lock().expect("single-flight lock poisoned");
        if let Some(token) = current.as_ref() {
            token.cancel();
        }
    }
}
