//! Cooperative cancellation.
//!
//! Parsing polls the token at well-defined reentry points (start of each
//! top-level declaration or statement) and surfaces cancellation immediately
//! as an `Err(Cancelled)` instead of absorbing it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Marker error returned by cancellable entry points.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("operation was cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// A cloneable handle used to request cancellation of an in-flight parse.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Poll point: returns `Err(Cancelled)` once `cancel` has been called.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_uncancelled_and_latches() {
        let token = CancellationToken::new();
        assert!(token.check().is_ok());
        token.cancel();
        assert_eq!(token.check(), Err(Cancelled));
        // Clones observe the same flag.
        assert!(token.clone().is_cancelled());
    }
}
