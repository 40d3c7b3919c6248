//! Bounded retry with per-failure-kind pauses

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How a failed attempt should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The attempt ran out of time; retried after the longer pause
    Timeout,
    /// Any other recoverable failure; retried after the short pause
    Transient,
    /// Retrying cannot help; stop immediately
    Fatal,
}

/// Errors that know how they should be retried
pub trait Retryable {
    /// Classify this failure
    fn failure_kind(&self) -> FailureKind;
}

/// Outcome of an operation that never succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// Attempts actually made
    pub attempts: u32,
    /// Error from the final attempt
    pub last_error: E,
}

/// Retry policy: at most `max_attempts` tries, pausing between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Pause after a transient failure
    pub failure_delay: Duration,
    /// Pause after a timeout
    pub timeout_delay: Duration,
}

impl RetryPolicy {
    /// Pause that follows a failure of the given kind
    pub fn delay_for(&self, kind: FailureKind) -> Duration {
        match kind {
            FailureKind::Timeout => self.timeout_delay,
            FailureKind::Transient => self.failure_delay,
            FailureKind::Fatal => Duration::ZERO,
        }
    }

    /// Run `operation` until it succeeds, fails fatally, or attempts run out
    ///
    /// The closure receives the 1-based attempt number. No pause follows the
    /// final attempt.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    let kind = e.failure_kind();
                    if kind == FailureKind::Fatal || attempt >= max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last_error: e,
                        });
                    }

                    let delay = self.delay_for(kind);
                    warn!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "Attempt failed, retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fmt;
    use std::time::Instant;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Failure(FailureKind);

    impl fmt::Display for Failure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    impl Retryable for Failure {
        fn failure_kind(&self) -> FailureKind {
            self.0
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            failure_delay: Duration::from_millis(5),
            timeout_delay: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_delay_for_kind() {
        let policy = policy(3);
        assert_eq!(policy.delay_for(FailureKind::Timeout), Duration::from_millis(20));
        assert_eq!(policy.delay_for(FailureKind::Transient), Duration::from_millis(5));
        assert_eq!(policy.delay_for(FailureKind::Fatal), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_first_success_needs_no_retry() {
        let calls = Cell::new(0);
        let result: Result<u32, RetryExhausted<Failure>> = policy(3)
            .run(|attempt| {
                calls.set(calls.get() + 1);
                async move { Ok(attempt) }
            })
            .await;
        assert_eq!(result, Ok(1));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let result = policy(3)
            .run(|attempt| async move {
                if attempt < 3 {
                    Err(Failure(FailureKind::Transient))
                } else {
                    Ok("done")
                }
            })
            .await;
        assert_eq!(result, Ok("done"));
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts_and_waits_between() {
        let calls = Cell::new(0);
        let started = Instant::now();
        let result: Result<(), _> = policy(3)
            .run(|_| {
                calls.set(calls.get() + 1);
                async { Err(Failure(FailureKind::Timeout)) }
            })
            .await;

        assert_eq!(calls.get(), 3);
        assert_eq!(
            result,
            Err(RetryExhausted {
                attempts: 3,
                last_error: Failure(FailureKind::Timeout)
            })
        );
        // Two pauses of 20ms between three attempts
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_fatal_stops_immediately() {
        let calls = Cell::new(0);
        let result: Result<(), _> = policy(5)
            .run(|_| {
                calls.set(calls.get() + 1);
                async { Err(Failure(FailureKind::Fatal)) }
            })
            .await;
        assert_eq!(calls.get(), 1);
        assert_eq!(result.unwrap_err().attempts, 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = Cell::new(0);
        let _: Result<(), _> = policy(0)
            .run(|_| {
                calls.set(calls.get() + 1);
                async { Err(Failure(FailureKind::Transient)) }
            })
            .await;
        assert_eq!(calls.get(), 1);
    }
}
