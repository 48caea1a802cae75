//! Bounded retry for eventually consistent backends.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error> {
    #[error("condition not met within {}s", .waited.as_secs())]
    TimedOut { waited: Duration },

    #[error(transparent)]
    Failed(E),
}

/// Polls `op` at a fixed `interval` until it yields a value or `deadline`
/// elapses.
///
/// `op` returns `Ok(Some(value))` when done, `Ok(None)` when not yet ready
/// (sleep and retry), or `Err` to abort immediately. There is no cancellation
/// primitive beyond the deadline.
pub async fn retry_until<T, E, F, Fut>(
    interval: Duration,
    deadline: Duration,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let started = Instant::now();

    loop {
        match op().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => return Err(RetryError::Failed(e)),
        }

        if started.elapsed() + interval > deadline {
            return Err(RetryError::TimedOut {
                waited: started.elapsed(),
            });
        }

        tokio::time::sleep(interval).await;
    }
}
