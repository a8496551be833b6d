//! Cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::GenerationError;

/// A cloneable flag a host sets to abandon a running pass.
///
/// Clones share the flag. The generator checks it once before each
/// candidate class.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Fail with [`GenerationError::Cancelled`] once cancellation was requested.
    pub fn check(&self) -> Result<(), GenerationError> {
        if self.is_cancelled() {
            Err(GenerationError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let host = token.clone();
        assert!(token.check().is_ok());

        host.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(GenerationError::Cancelled));
    }
}
