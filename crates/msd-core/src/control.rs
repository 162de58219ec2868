//! Cooperative cancellation for a running assembly.
//!
//! The assembly loop checks the token between parts only, so a cancelled run
//! never leaves a half-copied part behind the last whole one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared abort flag. Clone it into whatever needs to request the stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop at the next part boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
