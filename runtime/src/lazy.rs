//! Exactly-once asynchronous initialization.
//!
//! [`LazyInit`] runs an initializer the first time a value is requested and
//! hands every concurrent caller the same in-flight future. A successful
//! result is cached; a failure resets the guard so the next caller retries.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

type InitFuture<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

enum Slot<T, E>
where
    T: Clone,
    E: Clone,
{
    Empty,
    Pending(InitFuture<T, E>),
    Ready(T),
}

/// Async initialization guard.
pub struct LazyInit<T, E>
where
    T: Clone,
    E: Clone,
{
    slot: Mutex<Slot<T, E>>,
}

impl<T, E> LazyInit<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Uninitialized guard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
        }
    }

    /// Initialized value, if any.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        match &*self.slot() {
            Slot::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Whether initialization completed successfully.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(&*self.slot(), Slot::Ready(_))
    }

    /// Whether an initializer is currently running.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(&*self.slot(), Slot::Pending(_))
    }

    /// Return the value, running `init` if nobody has yet.
    ///
    /// Concurrent callers await the same initializer; `init` of later callers
    /// is never invoked while one is running.
    ///
    /// # Errors
    ///
    /// Returns the initializer's error. The guard is reset so a later call
    /// starts over.
    pub async fn get_or_try_init<F, Fut>(&self, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let future = {
            let mut slot = self.slot();
            let in_flight = match &*slot {
                Slot::Ready(value) => return Ok(value.clone()),
                Slot::Pending(future) => Some(future.clone()),
                Slot::Empty => None,
            };
            match in_flight {
                Some(future) => future,
                None => {
                    let future = init().boxed().shared();
                    *slot = Slot::Pending(future.clone());
                    future
                },
            }
        };

        let result = future.clone().await;

        let mut slot = self.slot();
        if let Slot::Pending(current) = &*slot {
            if Shared::ptr_eq(current, &future) {
                *slot = match &result {
                    Ok(value) => Slot::Ready(value.clone()),
                    Err(_) => Slot::Empty,
                };
            }
        }
        result
    }

    /// Forget the cached value.
    pub fn reset(&self) {
        *self.slot() = Slot::Empty;
    }

    fn slot(&self) -> MutexGuard<'_, Slot<T, E>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Default for LazyInit<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> std::fmt::Debug for LazyInit<T, E>
where
    T: Clone,
    E: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.slot.lock().unwrap_or_else(PoisonError::into_inner) {
            Slot::Empty => "empty",
            Slot::Pending(_) => "pending",
            Slot::Ready(_) => "ready",
        };
        f.debug_struct("LazyInit").field("state", &state).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_share_one_init() {
        let lazy: Arc<LazyInit<u32, String>> = Arc::new(LazyInit::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let lazy = Arc::clone(&lazy);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                lazy.get_or_try_init(|| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(42)
                })
                .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lazy.is_ready());
        assert_eq!(lazy.get(), Some(42));
    }

    #[tokio::test]
    async fn test_failure_allows_retry() {
        let lazy: LazyInit<u32, String> = LazyInit::new();

        let first = lazy
            .get_or_try_init(|| async { Err("script blocked".to_string()) })
            .await;
        assert_eq!(first, Err("script blocked".to_string()));
        assert!(!lazy.is_ready());
        assert!(!lazy.is_pending());

        let second = lazy.get_or_try_init(|| async { Ok(7) }).await;
        assert_eq!(second, Ok(7));
    }

    #[tokio::test]
    async fn test_ready_value_skips_init() {
        let lazy: LazyInit<u32, String> = LazyInit::new();
        lazy.get_or_try_init(|| async { Ok(1) }).await.unwrap();
        let again = lazy
            .get_or_try_init(|| async { Err("must not run".to_string()) })
            .await;
        assert_eq!(again, Ok(1));

        lazy.reset();
        assert_eq!(lazy.get(), None);
    }
}
