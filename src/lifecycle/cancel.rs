//! Cooperative cancellation for connect requests.

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a cancellation fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancelReason {
    /// `cancel()` was called on the cancellation or one of its parents.
    #[error("context canceled")]
    Canceled,
    /// The deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Caller-supplied signal that a connect request should be abandoned.
///
/// Cloning yields a handle to the same signal; [`Cancellation::child`] yields a
/// new signal that also fires when this one does.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// A cancellation that only fires when [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cancellation that fires once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A cancellation that fires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derive a cancellation that fires with this one, keeping its deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a child whose deadline is the earlier of ours and `now + timeout`.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(existing) if existing <= candidate => existing,
            _ => candidate,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Fire the cancellation. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Underlying token, for connectors that select on it directly.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The reason this cancellation has fired, if it has.
    ///
    /// An explicit cancel takes precedence over an expired deadline.
    pub fn reason(&self) -> Option<CancelReason> {
        if self.token.is_cancelled() {
            return Some(CancelReason::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// Wait until the cancellation fires and report why.
    pub async fn cancelled(&self) -> CancelReason {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => CancelReason::Canceled,
                    _ = tokio::time::sleep_until(deadline) => CancelReason::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                CancelReason::Canceled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_cancellation_has_not_fired() {
        let cancel = Cancellation::new();
        assert_eq!(cancel.reason(), None);
        assert!(cancel.deadline().is_none());
    }

    #[test]
    fn cancel_propagates_to_children_only() {
        let parent = Cancellation::new();
        let child = parent.child();
        child.cancel();
        assert!(!parent.is_cancelled());

        let child = parent.child();
        parent.cancel();
        assert_eq!(child.reason(), Some(CancelReason::Canceled));
    }

    #[tokio::test]
    async fn token_is_shared_with_children() {
        let parent = Cancellation::new();
        let child = parent.child();

        parent.token().cancel();
        child.token().cancelled().await;
        assert_eq!(child.reason(), Some(CancelReason::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_fires_as_deadline_exceeded() {
        let cancel = Cancellation::with_timeout(Duration::from_millis(50));
        assert_eq!(cancel.reason(), None);
        assert_eq!(cancel.cancelled().await, CancelReason::DeadlineExceeded);
        assert_eq!(cancel.reason(), Some(CancelReason::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_cancel_wins_over_deadline() {
        let cancel = Cancellation::with_timeout(Duration::from_secs(10));
        let handle = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            handle.cancel();
        });
        assert_eq!(cancel.cancelled().await, CancelReason::Canceled);
    }

    #[tokio::test(start_paused = true)]
    async fn child_timeout_never_extends_parent_deadline() {
        let parent = Cancellation::with_timeout(Duration::from_millis(10));
        let child = parent.child_with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());
    }
}
