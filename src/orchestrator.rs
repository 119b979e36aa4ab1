//! Concurrent refresh batches
//!
//! A batch is a set of independent fetches issued together. Results are
//! handed back only when every fetch has succeeded; the first failure fails
//! the whole batch and nothing is returned. Callers commit the results in one
//! step, so a failed batch leaves their previous state untouched.
//!
//! There is no retry here. A failed batch is retried by the next user action.

use std::future::Future;
use std::time::Instant;

use futures::future::{try_join_all, BoxFuture};
use tracing::{debug, warn};

use crate::error::Result;

/// Run one batch future, timing and logging it under `label`.
///
/// The batch itself is expected to join its fetches concurrently, e.g. with
/// `tokio::try_join!` or [`join_all`].
pub async fn run_batch<T, F>(label: &'static str, batch: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    debug!(batch = label, "Starting refresh batch");

    let result = batch.await;
    let elapsed = start.elapsed();

    #[cfg(feature = "metrics")]
    crate::metrics::observe_batch_duration_seconds(label, elapsed.as_secs_f64());

    match &result {
        Ok(_) => debug!(
            batch = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "Refresh batch completed"
        ),
        Err(e) => {
            #[cfg(feature = "metrics")]
            crate::metrics::inc_batch_failure(label, e.kind());
            warn!(
                batch = label,
                elapsed_ms = elapsed.as_millis() as u64,
                "Refresh batch failed: {}",
                e
            );
        }
    }

    result
}

/// Join a homogeneous set of fetches, failing fast on the first error.
///
/// Results keep the order of `fetches`.
pub async fn join_all<'a, T>(
    label: &'static str,
    fetches: Vec<BoxFuture<'a, Result<T>>>,
) -> Result<Vec<T>> {
    run_batch(label, try_join_all(fetches)).await
}

/// Await `fetch` when present. Lets a batch carry a fetch that only applies
/// in some sessions, such as the signed-in caller's staking summary.
pub async fn optional<T, F>(fetch: Option<F>) -> Result<Option<T>>
where
    F: Future<Output = Result<T>>,
{
    match fetch {
        Some(fetch) => fetch.await.map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    async fn delayed(ms: u64, value: u32) -> Result<u32> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(value)
    }

    async fn failing(ms: u64) -> Result<u32> {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Err(Error::backend("test", "failing", "boom"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_runs_fetches_concurrently() {
        let start = tokio::time::Instant::now();
        let results = join_all(
            "test",
            vec![
                delayed(100, 1).boxed(),
                delayed(300, 2).boxed(),
                delayed(200, 3).boxed(),
            ],
        )
        .await
        .unwrap();

        assert_eq!(results, vec![1, 2, 3]);
        // Bounded by the slowest fetch, not the sum.
        assert!(start.elapsed() < Duration::from_millis(350));
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_failure_fails_the_batch() {
        let result = join_all(
            "test",
            vec![delayed(100, 1).boxed(), failing(50).boxed()],
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_heterogeneous_batch_with_try_join() {
        let (a, b) = run_batch("pair", async {
            tokio::try_join!(delayed(1, 7), async { Ok::<_, Error>("x") })
        })
        .await
        .unwrap();
        assert_eq!((a, b), (7, "x"));
    }

    #[tokio::test]
    async fn test_optional_fetch_skipped_when_absent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let absent: Option<std::future::Ready<Result<u32>>> = None;
        assert_eq!(optional(absent).await.unwrap(), None);

        let counted = {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>(5)
            }
        };
        assert_eq!(optional(Some(counted)).await.unwrap(), Some(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
