//! Async fan-out on tokio
//!
//! Same contract as [`crate::parallel`], with one tokio task per element. The
//! transform is called on the caller's task, in index order, to build each
//! future; the future itself runs as a spawned task and must be `'static`.
//! Clone what the future needs out of the borrowed element:
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! use fanout::tasks;
//!
//! let names = vec!["ada".to_string(), "grace".to_string()];
//! let shouted = tasks::map(&names, |name| {
//!     let name = name.clone();
//!     async move { name.to_uppercase() }
//! })
//! .await?;
//! assert_eq!(shouted, vec!["ADA", "GRACE"]);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::future::Future;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{FanOutError, panic_message};
use crate::index::by_value;
use crate::seq;

/// Handles of one call's tasks. Dropping it aborts every task still running.
struct TaskSet<R>(Vec<JoinHandle<R>>);

impl<R> Drop for TaskSet<R> {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Spawn `task(i)` for every `i` in `0..n` and await all of them in index order.
///
/// Every handle is awaited even after a failure. A panicking task fails the
/// call with [`FanOutError::TaskPanicked`] for the lowest panicking index.
///
/// Dropping the returned future before it resolves (a `timeout`, a losing
/// `select!` branch) aborts every task it spawned, as does a panic in `task`
/// partway through spawning. Aborted tasks stop at their next `.await`.
pub async fn map_index<R, F, Fut>(n: usize, mut task: F) -> Result<Vec<R>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
    R: Send + 'static,
{
    if n == 0 {
        return Ok(Vec::new());
    }

    let runtime = Handle::try_current().context("async fan-out requires a running tokio runtime")?;
    let started = Instant::now();
    tracing::debug!("Spawning {} async tasks", n);

    let mut spawned = TaskSet(Vec::with_capacity(n));
    for i in 0..n {
        spawned.0.push(runtime.spawn(task(i)));
    }

    let mut results = Vec::with_capacity(n);
    let mut failure: Option<FanOutError> = None;
    for (index, handle) in spawned.0.iter_mut().enumerate() {
        match handle.await {
            Ok(value) => results.push(value),
            Err(err) => {
                let err = if err.is_panic() {
                    let message = panic_message(err.into_panic().as_ref());
                    tracing::warn!("Async task {} panicked: {}", index, message);
                    FanOutError::TaskPanicked { index, message }
                } else {
                    tracing::warn!("Async task {} was cancelled", index);
                    FanOutError::TaskCancelled { index }
                };
                failure.get_or_insert(err);
            }
        }
    }

    tracing::debug!("Joined {} async tasks in {:?}", n, started.elapsed());
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(results),
    }
}

/// Async `out[i] = task(&items[i]).await`, one tokio task per element.
pub async fn map<T, R, F, Fut>(items: &[T], task: F) -> Result<Vec<R>>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = R> + Send + 'static,
    R: Send + 'static,
{
    map_index(items.len(), by_value(items, task)).await
}

pub async fn each_index<F, Fut>(n: usize, task: F) -> Result<()>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    map_index(n, task).await.map(|_| ())
}

pub async fn each<T, F, Fut>(items: &[T], task: F) -> Result<()>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    each_index(items.len(), by_value(items, task)).await
}

/// Each task yields a sub-sequence; they are concatenated in index order.
pub async fn map_index_flat<R, F, Fut>(n: usize, task: F) -> Result<Vec<R>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Vec<R>> + Send + 'static,
    R: Send + 'static,
{
    Ok(seq::flatten(map_index(n, task).await?))
}

/// Isolate-and-report async map: one `Result` per element, no early exit.
pub async fn map_result<T, V, E, F, Fut>(
    items: &[T],
    task: F,
) -> Result<Vec<std::result::Result<V, E>>>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
    V: Send + 'static,
    E: Send + 'static,
{
    map_index(items.len(), by_value(items, task)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reverse_completion_keeps_order() {
        let n = 8;
        let results = map_index(n, |i| async move {
            tokio::time::sleep(Duration::from_millis(((n - i) * 10) as u64)).await;
            i * 2
        })
        .await
        .unwrap();
        assert_eq!(results, seq::map_index(n, |i| i * 2));
    }

    #[tokio::test]
    async fn test_isolates_failures() {
        let results = map_result(&[1, 2, 3], |&x| async move {
            if x == 2 { Err(format!("bad {x}")) } else { Ok(x * 10) }
        })
        .await
        .unwrap();
        assert_eq!(results, vec![Ok(10), Err("bad 2".to_string()), Ok(30)]);
    }

    #[tokio::test]
    async fn test_flat_and_each() {
        let flat = map_index_flat(3, |i| async move { vec![i, i] })
            .await
            .unwrap();
        assert_eq!(flat, vec![0, 0, 1, 1, 2, 2]);

        let counter = Arc::new(AtomicUsize::new(0));
        each(&["a", "b", "c", "d"], |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
        .await
        .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_panic_waits_for_siblings() {
        let finished = Arc::new(AtomicUsize::new(0));
        let err = map_index(4, |i| {
            let finished = finished.clone();
            async move {
                if i == 1 {
                    panic!("async task {i} failed");
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
                finished.fetch_add(1, Ordering::SeqCst);
            }
        })
        .await
        .unwrap_err();

        match err.downcast_ref::<FanOutError>() {
            Some(FanOutError::TaskPanicked { index, message }) => {
                assert_eq!(*index, 1);
                assert_eq!(message, "async task 1 failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let results: Vec<u8> = map(&[] as &[u8], |x| {
            let x = *x;
            async move { x }
        })
        .await
        .unwrap();
        assert!(results.is_empty());
        each_index(0, |_| async {}).await.unwrap();
    }

    #[tokio::test]
    async fn test_dropping_the_call_aborts_its_tasks() {
        let done = Arc::new(AtomicUsize::new(0));
        let call = map_index(4, |_| {
            let done = done.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                done.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert!(tokio::time::timeout(Duration::from_millis(10), call).await.is_err());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(done.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_transform_aborts_spawned_tasks() {
        let done = Arc::new(AtomicUsize::new(0));
        let task_done = done.clone();
        let call = tokio::spawn(async move {
            map_index(4, move |i| {
                if i == 2 {
                    panic!("transform failed at {i}");
                }
                let done = task_done.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await
        });

        assert!(call.await.unwrap_err().is_panic());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(done.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_requires_runtime() {
        let mut future = std::pin::pin!(map_index(1, |i| async move { i }));
        let mut cx = std::task::Context::from_waker(std::task::Waker::noop());
        match future.as_mut().poll(&mut cx) {
            std::task::Poll::Ready(result) => {
                let err = result.unwrap_err();
                assert!(err.to_string().contains("tokio runtime"));
            }
            std::task::Poll::Pending => panic!("should fail before spawning anything"),
        }
    }
}
