//! Retry with configurable backoff.
//!
//! Only retryable transport errors are retried. A response with an error
//! status is a normal value to this transformer, and body-parse failures
//! are returned on the first attempt.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::compose::{SharedTransformer, Transformer};
use crate::fetch::{BoxFuture, FetchRef, FetchResult};
use crate::init::RequestInit;
use crate::target::RequestTarget;

/// Default number of attempts.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between attempts.
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Multiplier applied to the base delay after a failed attempt.
#[derive(Clone)]
pub enum Backoff {
    /// The same multiplier after every attempt.
    Constant(f64),
    /// Multiplier computed from the zero-based index of the failed attempt.
    Custom(Arc<dyn Fn(u32) -> f64 + Send + Sync>),
}

impl Backoff {
    /// `2^attempt`: 1x, 2x, 4x, ...
    pub fn exponential() -> Self {
        Self::Custom(Arc::new(|attempt| 2f64.powi(attempt.min(30) as i32)))
    }

    /// Builds a custom backoff from a closure.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// The multiplier for the given failed attempt.
    pub fn factor(&self, attempt: u32) -> f64 {
        match self {
            Self::Constant(f) => *f,
            Self::Custom(f) => f(attempt),
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Constant(1.0)
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(factor) => f.debug_tuple("Constant").field(factor).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Retry configuration.
///
/// ## Examples
///
/// ```rust
/// use std::time::Duration;
/// use fetchkit_lib::{Backoff, RetryPolicy, retry_with};
///
/// let policy = RetryPolicy::default()
///     .max_attempts(5)
///     .base_delay(Duration::from_millis(200))
///     .backoff(Backoff::exponential());
///
/// assert_eq!(policy.delay_for(2), Duration::from_millis(800));
/// let transformer = retry_with(policy);
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            backoff: Backoff::default(),
        }
    }
}

impl RetryPolicy {
    /// Total attempts including the first. Zero is treated as one.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Number of attempts that will actually be made.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Delay to wait after the given zero-based failed attempt.
    ///
    /// Negative or non-finite products collapse to zero.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let secs = self.base_delay.as_secs_f64() * self.backoff.factor(attempt);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
    }
}

struct Retry {
    policy: RetryPolicy,
}

impl Transformer for Retry {
    fn apply(
        &self,
        next: FetchRef,
        target: RequestTarget,
        init: RequestInit,
    ) -> BoxFuture<'_, FetchResult> {
        Box::pin(async move {
            let attempts = self.policy.attempts();
            let mut attempt = 0;

            loop {
                match next.fetch(target.clone(), init.clone()).await {
                    Ok(response) => {
                        if attempt > 0 {
                            debug!(attempt = attempt + 1, "request succeeded after retry");
                        }
                        return Ok(response);
                    }
                    Err(e) if e.is_retryable() && attempt + 1 < attempts => {
                        let delay = self.policy.delay_for(attempt);
                        warn!(
                            url = %target,
                            attempt = attempt + 1,
                            max_attempts = attempts,
                            ?delay,
                            error = %e,
                            "request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    Err(e) if e.is_retryable() => {
                        warn!(url = %target, attempts, error = %e, "request failed, giving up");
                        return Err(e);
                    }
                    Err(e) => {
                        debug!(url = %target, error = %e, "error is not retryable");
                        return Err(e);
                    }
                }
            }
        })
    }
}

/// Re-invokes the rest of the chain when it fails with a retryable
/// transport error.
///
/// Waits `base_delay * backoff.factor(i)` after failed attempt `i` and
/// returns the last error once `max_attempts` are used up. There is no
/// wait after the final attempt.
pub fn retry(max_attempts: u32, base_delay: Duration, backoff: Backoff) -> SharedTransformer {
    retry_with(RetryPolicy {
        max_attempts,
        base_delay,
        backoff,
    })
}

/// Like [`retry`], from a [`RetryPolicy`].
pub fn retry_with(policy: RetryPolicy) -> SharedTransformer {
    Arc::new(Retry { policy })
}
