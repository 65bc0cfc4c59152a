use std::fmt;
use std::future::Future;

use log::{error, info, warn};

/// Result of a bounded retry: either a validated value or the fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryOutcome<T> {
    Success { value: T, attempts: u32 },
    Fallback { value: T, attempts: u32 },
}

impl<T> RetryOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            RetryOutcome::Success { value, .. } | RetryOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            RetryOutcome::Success { value, .. } | RetryOutcome::Fallback { value, .. } => value,
        }
    }

    /// Number of times the operation was invoked.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Success { attempts, .. } | RetryOutcome::Fallback { attempts, .. } => *attempts,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, RetryOutcome::Fallback { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RetryOutcome<U> {
        match self {
            RetryOutcome::Success { value, attempts } => RetryOutcome::Success {
                value: f(value),
                attempts,
            },
            RetryOutcome::Fallback { value, attempts } => RetryOutcome::Fallback {
                value: f(value),
                attempts,
            },
        }
    }
}

/// How a single attempt failed.
#[derive(Debug)]
pub enum AttemptError<E> {
    /// Try again, or fall back once attempts run out.
    Retryable(E),
    /// Stop immediately and surface the error.
    Fatal(E),
}

/// Runs `operation` up to `max_attempts` times (at least once), passing each
/// output through `validate`. The first valid output wins. When every attempt
/// is rejected, `fallback` supplies the value. A `Fatal` rejection ends the
/// loop and is the only way this returns `Err`.
pub async fn with_retry<R, T, E, Op, Fut, V, F>(
    max_attempts: u32,
    mut operation: Op,
    mut validate: V,
    fallback: F,
) -> Result<RetryOutcome<T>, E>
where
    Op: FnMut(u32) -> Fut,
    Fut: Future<Output = R>,
    V: FnMut(R) -> Result<T, AttemptError<E>>,
    F: FnOnce() -> T,
    E: fmt::Display,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let output = operation(attempt).await;
        match validate(output) {
            Ok(value) => {
                info!("✅ Attempt {}/{} succeeded", attempt, max_attempts);
                return Ok(RetryOutcome::Success {
                    value,
                    attempts: attempt,
                });
            }
            Err(AttemptError::Retryable(e)) => {
                warn!("⚠️ Attempt {}/{} failed: {}", attempt, max_attempts, e);
            }
            Err(AttemptError::Fatal(e)) => {
                error!("❌ Attempt {}/{} failed fatally: {}", attempt, max_attempts, e);
                return Err(e);
            }
        }
    }

    error!("❌ Max retries reached, using fallback");
    Ok(RetryOutcome::Fallback {
        value: fallback(),
        attempts: max_attempts,
    })
}
