use std::time::Duration;

use futures::TryFuture;
use futures_retry::{ErrorHandler, FutureFactory, FutureRetry, RetryPolicy};
use tracing::warn;

use crate::error::Error;

pub(crate) struct FixedCountWithDelayStrategy {
    operation: &'static str,
    max_attempts: usize,
    delay: Duration,
}

impl FixedCountWithDelayStrategy {
    pub(crate) fn new(operation: &'static str, max_attempts: usize, delay: Duration) -> Self {
        Self {
            operation,
            max_attempts,
            delay,
        }
    }
}

impl ErrorHandler<Error> for FixedCountWithDelayStrategy {
    type OutError = Error;

    fn handle(&mut self, attempt: usize, e: Error) -> RetryPolicy<Error> {
        if attempt >= self.max_attempts {
            return RetryPolicy::ForwardError(e);
        }

        if e.is_retryable() {
            warn!(
                "{} failed on attempt {}/{}, retrying: {}",
                self.operation, attempt, self.max_attempts, e
            );
            RetryPolicy::WaitRetry(self.delay)
        } else {
            RetryPolicy::ForwardError(e)
        }
    }
}

/// Drives `factory` until it succeeds or the strategy forwards the error.
pub(crate) async fn with_retry<F, T>(
    factory: F,
    strategy: FixedCountWithDelayStrategy,
) -> Result<T, Error>
where
    F: FutureFactory,
    F::FutureItem: TryFuture<Ok = T, Error = Error>,
{
    FutureRetry::new(factory, strategy)
        .await
        .map(|(value, _attempts)| value)
        .map_err(|(err, _attempts)| err)
}

#[cfg(test)]
mod tests {
    use rusoto_core::{request::HttpDispatchError, RusotoError};

    use super::*;

    fn refused() -> Error {
        Error::ListStreams(RusotoError::HttpDispatch(HttpDispatchError::new(
            "connection refused".to_string(),
        )))
    }

    #[test]
    fn retries_transient_errors_until_the_limit() {
        let mut strategy = FixedCountWithDelayStrategy::new("probe", 3, Duration::from_millis(5));
        assert!(matches!(
            strategy.handle(1, refused()),
            RetryPolicy::WaitRetry(d) if d == Duration::from_millis(5)
        ));
        assert!(matches!(
            strategy.handle(3, refused()),
            RetryPolicy::ForwardError(_)
        ));
    }

    #[test]
    fn forwards_permanent_errors_immediately() {
        let mut strategy = FixedCountWithDelayStrategy::new("probe", 3, Duration::from_millis(5));
        assert!(matches!(
            strategy.handle(1, Error::UnexpectedStatus("FROZEN".to_string())),
            RetryPolicy::ForwardError(Error::UnexpectedStatus(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn with_retry_recovers_after_transient_failures() {
        let mut calls = 0;
        let result = with_retry(
            || {
                calls += 1;
                let outcome = if calls < 3 { Err(refused()) } else { Ok(calls) };
                futures::future::ready(outcome)
            },
            FixedCountWithDelayStrategy::new("probe", 5, Duration::from_secs(1)),
        )
        .await;
        assert_eq!(result.ok(), Some(3));
    }
}
