//! Trailing-edge debouncing with supersession.
//!
//! Every call to [`Debouncer::run`] takes a new generation. A call waits for
//! the quiet period and then runs its operation, but gives up with
//! [`Superseded`] as soon as a newer generation starts, whether it is still
//! waiting or already running. Only the last call of a burst produces a value,
//! and a slow response to an older call can never overwrite a newer one.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Returned to a caller whose invocation was replaced by a newer one.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Call superseded by a newer invocation")]
pub struct Superseded;

/// Delays and coalesces bursts of calls.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: watch::Sender<u64>,
}

impl Debouncer {
    /// Debouncer with the given quiet period.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        let (generation, _) = watch::channel(0);
        Self { delay, generation }
    }

    /// Quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is pending or running without starting anything new.
    pub fn cancel(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }

    /// Run `operation` after the quiet period unless a newer call arrives.
    ///
    /// # Errors
    ///
    /// Returns [`Superseded`] if another call to `run` (or [`Debouncer::cancel`])
    /// happens before `operation` completes. The operation's future is dropped
    /// in that case.
    pub async fn run<F, Fut, T>(&self, operation: F) -> Result<T, Superseded>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut mine = 0;
        self.generation.send_modify(|generation| {
            *generation += 1;
            mine = *generation;
        });
        let mut rx = self.generation.subscribe();

        tokio::select! {
            () = tokio::time::sleep(self.delay) => {}
            () = superseded(&mut rx, mine) => {
                tracing::trace!(generation = mine, "Debounced call superseded while waiting");
                return Err(Superseded);
            }
        }

        tokio::select! {
            output = operation() => Ok(output),
            () = superseded(&mut rx, mine) => {
                tracing::trace!(generation = mine, "Debounced call superseded while running");
                Err(Superseded)
            }
        }
    }
}

async fn superseded(rx: &mut watch::Receiver<u64>, mine: u64) {
    loop {
        if *rx.borrow_and_update() != mine {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
