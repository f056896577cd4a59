//! Simulated processing latency.
//!
//! [`AnalysisTimer`] suspends the caller for a fixed delay unless the
//! supplied [`CancellationToken`] fires first. [`CancelScope`] owns the
//! tokens of one feature instance: `reset` cancels whatever is pending and
//! arms a fresh token, `close` cancels everything for good.

use std::sync::Mutex;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::Rejection;

/// Cancellable delay used before producing a canned result.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisTimer {
    delay: Duration,
}

impl AnalysisTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the configured delay.
    ///
    /// Returns [`Rejection::Cancelled`] as soon as `token` is cancelled. A
    /// token that is already cancelled wins over an elapsed delay.
    pub async fn schedule(&self, token: &CancellationToken) -> Result<(), Rejection> {
        trace!(delay_ms = self.delay.as_millis() as u64, "analysis timer armed");
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(Rejection::Cancelled),
            _ = tokio::time::sleep(self.delay) => Ok(()),
        }
    }
}

/// Cancellation tokens for one feature instance.
#[derive(Debug)]
pub struct CancelScope {
    root: CancellationToken,
    current: Mutex<CancellationToken>,
}

impl CancelScope {
    pub fn new() -> Self {
        let root = CancellationToken::new();
        let current = Mutex::new(root.child_token());
        Self { root, current }
    }

    /// Token guarding the next operation.
    pub fn token(&self) -> CancellationToken {
        lock(&self.current).clone()
    }

    /// Cancel the pending operation, if any, and arm a fresh token.
    pub fn reset(&self) {
        let mut current = lock(&self.current);
        current.cancel();
        *current = self.root.child_token();
    }

    /// Cancel the pending operation and every later one.
    pub fn close(&self) {
        self.root.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.root.is_cancelled()
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn completes_after_delay() {
        let timer = AnalysisTimer::from_millis(1500);
        let start = Instant::now();
        timer.schedule(&CancellationToken::new()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_wait() {
        let timer = AnalysisTimer::from_millis(2000);
        let token = CancellationToken::new();
        let t = token.clone();
        let handle = tokio::spawn(async move { timer.schedule(&t).await });
        tokio::time::sleep(Duration::from_millis(500)).await;
        token.cancel();
        assert_eq!(handle.await.unwrap(), Err(Rejection::Cancelled));
    }

    #[tokio::test]
    async fn pre_cancelled_token_wins_over_zero_delay() {
        let timer = AnalysisTimer::from_millis(0);
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(timer.schedule(&token).await, Err(Rejection::Cancelled));
    }

    #[test]
    fn reset_cancels_only_the_pending_token() {
        let scope = CancelScope::new();
        let first = scope.token();
        scope.reset();
        assert!(first.is_cancelled());
        assert!(!scope.token().is_cancelled());
    }

    #[test]
    fn close_cancels_future_tokens() {
        let scope = CancelScope::new();
        scope.close();
        scope.reset();
        assert!(scope.is_closed());
        assert!(scope.token().is_cancelled());
    }
}
