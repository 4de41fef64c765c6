use std::future::Future;
use std::time::Duration;

use futures::future::{select, Either};

use crate::ApiError;

/// Race `fut` against a timer; the loser is dropped.
pub(crate) async fn with_deadline<F, T>(fut: F, limit: Duration) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let fut = std::pin::pin!(fut);
    let timer = std::pin::pin!(sleep(limit));
    match select(fut, timer).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(ApiError::Timeout),
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(limit: Duration) {
    tokio::time::sleep(limit).await;
}

#[cfg(target_arch = "wasm32")]
async fn sleep(limit: Duration) {
    gloo_timers::future::sleep(limit).await;
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_through_fast_futures() {
        let out = with_deadline(async { Ok::<_, ApiError>(7) }, Duration::from_secs(1)).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn slow_futures_time_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ApiError>(())
        };
        let out = with_deadline(slow, Duration::from_millis(20)).await;
        assert_eq!(out, Err(ApiError::Timeout));
    }
}
