//! Exponential backoff with jitter.
//!
//! Schedules come from the `backoff` crate. They are driven by tokio's clock so
//! the elapsed-time budget follows `tokio::time` (and its paused test clock).

use std::time::{Duration, Instant};

use backoff::exponential;
use backoff::{Clock, ExponentialBackoffBuilder};

use crate::config::BackoffConfig;

/// Shortest delay a schedule will produce.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Exponential schedule for one connect request.
pub type ExponentialBackoff = exponential::ExponentialBackoff<TokioClock>;

/// [`Clock`] reading `tokio::time::Instant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Build a schedule from `config`.
///
/// Values a validated config never holds are coerced: non-finite or
/// out-of-range jitter becomes 0, a multiplier below 1 (or non-finite) becomes
/// 1, and intervals are raised to at least 1ms.
pub fn exponential_backoff(config: &BackoffConfig) -> ExponentialBackoff {
    let initial_interval = config.initial_interval().max(MIN_INTERVAL);
    let randomization_factor = match config.randomization_factor {
        f if f.is_finite() => f.clamp(0.0, 1.0),
        _ => 0.0,
    };
    let multiplier = match config.multiplier {
        m if m.is_finite() && m >= 1.0 => m,
        _ => 1.0,
    };

    let schedule = ExponentialBackoffBuilder::new()
        .with_initial_interval(initial_interval)
        .with_randomization_factor(randomization_factor)
        .with_multiplier(multiplier)
        .with_max_interval(config.max_interval().max(initial_interval))
        .with_max_elapsed_time(config.max_elapsed_time())
        .build();

    exponential::ExponentialBackoff {
        current_interval: schedule.current_interval,
        initial_interval: schedule.initial_interval,
        randomization_factor: schedule.randomization_factor,
        multiplier: schedule.multiplier,
        max_interval: schedule.max_interval,
        max_elapsed_time: schedule.max_elapsed_time,
        start_time: TokioClock.now(),
        clock: TokioClock,
    }
}
