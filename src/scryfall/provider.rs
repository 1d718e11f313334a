//! Provider contract and request scoping.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::error::{ProviderError, ProviderResult};
use super::model::{Card, SearchOptions, SearchPage};

/// A card database the discovery engine can query.
///
/// Calls are blocking. Implementations must call [`RequestScope::check`]
/// before doing any work so a cancelled invocation fails fast.
pub trait CardProvider: Send + Sync {
    /// Run a search query and return the first page of results.
    fn search_cards(
        &self,
        scope: &RequestScope,
        query: &str,
        options: &SearchOptions,
    ) -> ProviderResult<SearchPage>;

    /// Fetch a single card by its Scryfall id.
    fn get_card(&self, scope: &RequestScope, id: &str) -> ProviderResult<Card>;
}

/// Cancellation and deadline state of one tool invocation.
///
/// Clones share the cancellation flag.
#[derive(Debug, Clone)]
pub struct RequestScope {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RequestScope {
    /// A scope that never expires.
    pub fn unbounded() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A scope that expires after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Mark the scope as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Time left before the deadline, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fail if the scope is cancelled or past its deadline.
    pub fn check(&self) -> ProviderResult<()> {
        if self.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        match self.remaining() {
            Some(left) if left.is_zero() => Err(ProviderError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Guard that cancels the scope when dropped unless disarmed.
    ///
    /// Tool routes hold one inside the request future: when the client
    /// cancels, the future is dropped and the blocking worker sees the flag.
    pub fn cancel_on_drop(&self) -> CancelGuard {
        CancelGuard {
            scope: Some(self.clone()),
        }
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Cancels its scope on drop. See [`RequestScope::cancel_on_drop`].
#[derive(Debug)]
pub struct CancelGuard {
    scope: Option<RequestScope>,
}

impl CancelGuard {
    /// Let the request finish normally without cancelling.
    pub fn disarm(mut self) {
        self.scope = None;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        if let Some(scope) = self.scope.take() {
            scope.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_scope_passes_check() {
        let scope = RequestScope::unbounded();
        assert!(scope.check().is_ok());
        assert!(scope.remaining().is_none());
    }

    #[test]
    fn test_cancelled_scope_fails_fast() {
        let scope = RequestScope::unbounded();
        scope.clone().cancel();
        assert!(matches!(scope.check(), Err(ProviderError::Cancelled)));
    }

    #[test]
    fn test_expired_deadline() {
        let scope = RequestScope::with_timeout(Duration::ZERO);
        assert!(matches!(
            scope.check(),
            Err(ProviderError::DeadlineExceeded)
        ));
    }

    #[test]
    fn test_guard_cancels_on_drop() {
        let scope = RequestScope::unbounded();
        {
            let _guard = scope.cancel_on_drop();
        }
        assert!(scope.is_cancelled());
    }

    #[test]
    fn test_disarmed_guard_does_not_cancel() {
        let scope = RequestScope::unbounded();
        scope.cancel_on_drop().disarm();
        assert!(!scope.is_cancelled());
    }
}
