//! Cooperative task handles
//!
//! [`Task`] owns one spawned unit of cooperative work. Spawning drives the
//! computation without blocking the caller; many tasks interleave by
//! suspending at their `.await` points instead of blocking.
//!
//! Cancellation is cooperative and non-preemptive: [`Task::cancel`] takes
//! effect at the computation's next suspension point, never in the middle
//! of a synchronous stretch. Resources the computation holds are released
//! by its own drop path. A dropped handle also cancels its task, so a
//! discarded `Task` cannot leak a running computation.

use std::future::Future;
use tokio::task::{JoinError, JoinHandle};

/// Handle to a spawned cooperative task.
#[derive(Debug)]
pub struct Task<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Task<T> {
    /// Spawns `future` onto the runtime and returns a handle to it.
    ///
    /// Returns as soon as the task is scheduled; it never blocks the
    /// calling task.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }
}

impl<T> Task<T> {
    /// Requests cancellation.
    ///
    /// The computation is abandoned at its next suspension point; if it has
    /// already completed, this is a no-op and [`join`](Self::join) still
    /// yields the result.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// True once the computation has completed or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the task to terminate.
    ///
    /// Yields the computation's result, or an error if it was cancelled or
    /// panicked.
    pub async fn join(mut self) -> Result<T, JoinError> {
        (&mut self.handle).await
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
