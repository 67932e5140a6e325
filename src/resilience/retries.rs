//! Retry logic.
//!
//! # Responsibilities
//! - Run an operation until it succeeds or fails permanently
//! - Wait out exponential backoff between attempts
//! - Abort promptly when the caller's cancellation fires
//!
//! # Design Decisions
//! - Operations classify their own failures with `backoff::Error`
//! - Exhausting the budget surfaces the last operation error, not a timeout
//! - Cancellation always takes precedence over a pending retry

use std::future::Future;

use backoff::backoff::Backoff;

use crate::error::{Error, Result};
use crate::lifecycle::Cancellation;

/// Failure of a single attempt: permanent, or transient with an optional
/// explicit retry delay.
pub type AttemptError = backoff::Error<Error>;

/// Run `operation` under `backoff` until it succeeds, fails permanently, the
/// budget runs out, or `cancel` fires.
///
/// `operation` receives the 1-based attempt number. A transient error's
/// `retry_after` replaces the scheduled delay but still consumes the budget.
pub async fn retry<T, B, F, Fut>(backoff: &mut B, cancel: &Cancellation, mut operation: F) -> Result<T>
where
    B: Backoff,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    backoff.reset();
    let mut attempt = 0u32;

    loop {
        attempt = attempt.saturating_add(1);

        let (err, retry_after) = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Permanent(e)) => return Err(e),
            Err(AttemptError::Transient { err, retry_after }) => (err, retry_after),
        };

        if let Some(reason) = cancel.reason() {
            tracing::debug!(attempt, reason = %reason, "Canceled after failed attempt");
            return Err(reason.into());
        }

        let Some(delay) = backoff.next_backoff().map(|d| retry_after.unwrap_or(d)) else {
            tracing::debug!(attempt, error = %err, "Retry budget exhausted");
            return Err(err);
        };

        tracing::debug!(attempt, delay = ?delay, error = %err, "Retrying connection");

        tokio::select! {
            biased;
            reason = cancel.cancelled() => {
                tracing::debug!(attempt, reason = %reason, "Canceled during backoff");
                return Err(reason.into());
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackoffConfig;
    use crate::lifecycle::CancelReason;
    use crate::resilience::backoff::{exponential_backoff, ExponentialBackoff};
    use std::time::Duration;
    use tokio::time::Instant;

    fn fast_backoff(budget_ms: u64) -> ExponentialBackoff {
        exponential_backoff(&BackoffConfig {
            initial_interval_ms: 10,
            randomization_factor: 0.0,
            multiplier: 1.0,
            max_interval_ms: 10,
            max_elapsed_time_ms: budget_ms,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let mut backoff = fast_backoff(0);
        let cancel = Cancellation::new();

        let value = retry(&mut backoff, &cancel, |attempt| async move {
            if attempt < 3 {
                Err(AttemptError::transient(Error::connect(format!("attempt {attempt}"))))
            } else {
                Ok(attempt)
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_error_stops_immediately() {
        let mut backoff = fast_backoff(0);
        let cancel = Cancellation::new();
        let mut calls = 0;

        let err = retry(&mut backoff, &cancel, |_| {
            calls += 1;
            async { Err::<(), _>(AttemptError::permanent(Error::NoConnectors)) }
        })
        .await
        .unwrap_err();

        assert!(err.is_no_connectors());
        assert_eq!(calls, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_budget_returns_last_error() {
        let mut backoff = fast_backoff(45);
        let cancel = Cancellation::new();

        let err = retry(&mut backoff, &cancel, |attempt| async move {
            Err::<(), _>(AttemptError::transient(Error::connect(format!("attempt {attempt}"))))
        })
        .await
        .unwrap_err();

        // Attempts at 0, 10, 20, 30, 40ms; the next delay would end at 50ms.
        assert_eq!(err.to_string(), "attempt 5");
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_overrides_scheduled_delay() {
        let mut backoff = fast_backoff(0);
        let cancel = Cancellation::new();
        let started = Instant::now();

        retry(&mut backoff, &cancel, |attempt| async move {
            if attempt == 1 {
                Err(AttemptError::retry_after(
                    Error::connect("busy"),
                    Duration::from_millis(250),
                ))
            } else {
                Ok(())
            }
        })
        .await
        .unwrap();

        assert_eq!(started.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_backoff() {
        let mut backoff = exponential_backoff(&BackoffConfig {
            initial_interval_ms: 60_000,
            randomization_factor: 0.0,
            ..BackoffConfig::default()
        });
        let cancel = Cancellation::with_timeout(Duration::from_millis(100));
        let started = Instant::now();

        let err = retry(&mut backoff, &cancel, |_| async {
            Err::<(), _>(AttemptError::transient(Error::connect("refused")))
        })
        .await
        .unwrap_err();

        assert_eq!(err.cancel_reason(), Some(CancelReason::DeadlineExceeded));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
