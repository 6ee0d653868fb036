//! Cancellation token shared between a popup instance and its in-flight work

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheap clonable cancellation flag.
///
/// Closing a suggestion popup cancels the token; debounce timers and
/// provider calls check it before applying their results, so no work
/// outlives the trigger instance that started it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token; all clones observe it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether the token has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
