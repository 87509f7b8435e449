use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation signal for one discovery run.
///
/// Cheap to clone; every clone observes the same flag. Long-running loops
/// poll [`CancelToken::is_tripped`] between units of work; no operation is
/// aborted mid-flight. A new run gets a new token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    tripped: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn trip(&self) {
        self.tripped.store(true, Ordering::Relaxed);
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_signal() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_tripped());

        token.trip();
        assert!(observer.is_tripped());

        // Repeated trips are no-ops.
        token.trip();
        assert!(observer.is_tripped());
    }

    #[test]
    fn fresh_token_is_untripped() {
        let first = CancelToken::new();
        first.trip();

        let second = CancelToken::new();
        assert!(!second.is_tripped());
    }
}
