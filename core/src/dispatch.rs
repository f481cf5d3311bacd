//! Worker dispatch for core computations.
//!
//! The computation core is synchronous and CPU-bound; the surrounding
//! service is an event loop. This shim runs a computation on the
//! blocking pool under a deadline, and flips the cancellation token on
//! timeout so the worker unwinds at its next poll instead of spinning
//! to completion for nobody.

use std::time::Duration;

use thiserror::Error;

use selene::CancelToken;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("computation exceeded its {0:?} deadline")]
    Timeout(Duration),
    #[error("worker panicked: {0}")]
    Worker(String),
    #[error(transparent)]
    Core(#[from] selene::Error),
}

/// Run `compute` on the blocking pool with a deadline.
///
/// The same token should be threaded into the computation's scan
/// calls; on timeout it is cancelled here and the abandoned worker
/// exits cooperatively.
pub async fn compute_with_deadline<T, F>(
    deadline: Duration,
    cancel: CancelToken,
    compute: F,
) -> Result<T, DispatchError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, selene::Error> + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(compute);
    match tokio::time::timeout(deadline, handle).await {
        Ok(Ok(result)) => result.map_err(DispatchError::Core),
        Ok(Err(join_error)) => Err(DispatchError::Worker(join_error.to_string())),
        Err(_elapsed) => {
            cancel.cancel();
            Err(DispatchError::Timeout(deadline))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completed_work_returns_its_value() {
        let result = compute_with_deadline(Duration::from_secs(5), CancelToken::new(), || Ok(42))
            .await
            .unwrap();
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn deadline_cancels_the_worker() {
        let token = CancelToken::new();
        let worker_token = token.clone();
        let result: Result<(), _> = compute_with_deadline(
            Duration::from_millis(50),
            token.clone(),
            move || {
                // A long scan polling its token, as the engines do.
                for _ in 0..200 {
                    if worker_token.is_canceled() {
                        return Err(selene::Error::Canceled);
                    }
                    std::thread::sleep(Duration::from_millis(10));
                }
                Ok(())
            },
        )
        .await;

        assert!(matches!(result, Err(DispatchError::Timeout(_))));
        assert!(token.is_canceled());
    }

    #[tokio::test]
    async fn core_errors_pass_through() {
        let result: Result<(), _> = compute_with_deadline(
            Duration::from_secs(5),
            CancelToken::new(),
            || Err(selene::Error::Computation("probe failed")),
        )
        .await;
        assert!(matches!(
            result,
            Err(DispatchError::Core(selene::Error::Computation(_)))
        ));
    }
}
