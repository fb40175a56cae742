//! Process-wide circuit breaker around the ingestion sequence
//!
//! Consecutive guarded failures are counted; once the threshold is reached calls are rejected
//! without running the operation. A success resets the count. Without a reset timeout the
//! breaker stays open until [`CircuitBreaker::reset`] is called or the process restarts.

use ingesta_core::AppError;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Breaker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerOptions {
    /// Consecutive failures that open the breaker
    pub failure_threshold: u32,
    /// When set, one probe call is admitted once this long has passed since the last failure
    pub reset_timeout: Option<Duration>,
    /// Count caller-input errors as failures and report them as unavailability
    pub count_client_errors: bool,
}

impl Default for BreakerOptions {
    fn default() -> Self {
        Self {
            failure_threshold: ingesta_core::constants::BREAKER_FAILURE_THRESHOLD,
            reset_timeout: None,
            count_client_errors: false,
        }
    }
}

/// Point-in-time view of the breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakerState {
    pub failure_count: u32,
    pub threshold: u32,
    pub is_open: bool,
}

#[derive(Debug)]
struct BreakerInner {
    failure_count: u32,
    last_failure: Option<Instant>,
}

/// Thread-safe circuit breaker; clones share state.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    inner: Arc<Mutex<BreakerInner>>,
    options: BreakerOptions,
}

impl CircuitBreaker {
    pub fn new(options: BreakerOptions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BreakerInner {
                failure_count: 0,
                last_failure: None,
            })),
            options: BreakerOptions {
                failure_threshold: options.failure_threshold.max(1),
                ..options
            },
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Circuit breaker mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Run `op` under the breaker.
    ///
    /// The lock is released before `op` is awaited, so concurrent calls are not serialized.
    pub async fn call<T, F, Fut>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        self.admit()?;

        match op().await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) if e.is_client_error() && !self.options.count_client_errors => Err(e),
            Err(e) => {
                self.record_failure(&e);
                Err(match e {
                    AppError::ServiceUnavailable(msg) => AppError::ServiceUnavailable(msg),
                    other => AppError::ServiceUnavailable(other.message().to_string()),
                })
            }
        }
    }

    fn admit(&self) -> Result<(), AppError> {
        let mut inner = self.lock();

        if inner.failure_count < self.options.failure_threshold {
            return Ok(());
        }

        if let (Some(timeout), Some(last_failure)) =
            (self.options.reset_timeout, inner.last_failure)
        {
            if last_failure.elapsed() >= timeout {
                // Push the window forward so concurrent callers keep failing fast
                // while this probe runs.
                inner.last_failure = Some(Instant::now());
                tracing::info!(
                    failure_count = inner.failure_count,
                    "Circuit breaker admitting recovery probe"
                );
                return Ok(());
            }
        }

        tracing::debug!(
            failure_count = inner.failure_count,
            threshold = self.options.failure_threshold,
            "Circuit breaker open, rejecting call"
        );
        Err(AppError::ServiceUnavailable(
            "Circuit breaker open, try again later".to_string(),
        ))
    }

    fn record_success(&self) {
        let mut inner = self.lock();
        if inner.failure_count >= self.options.failure_threshold {
            tracing::info!("Circuit breaker closing after successful call");
        }
        inner.failure_count = 0;
        inner.last_failure = None;
    }

    fn record_failure(&self, error: &AppError) {
        let mut inner = self.lock();
        inner.failure_count = inner.failure_count.saturating_add(1);
        inner.last_failure = Some(Instant::now());

        if inner.failure_count == self.options.failure_threshold {
            tracing::warn!(
                failure_count = inner.failure_count,
                error = %error,
                "Circuit breaker opening after consecutive failures"
            );
        } else {
            tracing::debug!(
                failure_count = inner.failure_count,
                error = %error,
                "Guarded call failed"
            );
        }
    }

    /// Close the breaker and clear the failure count.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.failure_count = 0;
        inner.last_failure = None;
        tracing::info!("Circuit breaker reset");
    }

    pub fn snapshot(&self) -> BreakerState {
        let inner = self.lock();
        BreakerState {
            failure_count: inner.failure_count,
            threshold: self.options.failure_threshold,
            is_open: inner.failure_count >= self.options.failure_threshold,
        }
    }

    pub fn options(&self) -> BreakerOptions {
        self.options
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(BreakerOptions::default())
    }
}
