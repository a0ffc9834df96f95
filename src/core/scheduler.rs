//! Cancellable background tasks
//!
//! The blink timer chain (and anything else that reschedules itself)
//! runs as a spawned task owned by a [`TaskHandle`]. The handle owns
//! cancellation: dropping it aborts the task, and [`TaskHandle::stop`]
//! additionally waits for the task to wind down so the caller gets a
//! hard "no callbacks after this point" guarantee.

use std::future::Future;

use tokio::task::JoinHandle;

/// Handle to a repeating background task
///
/// Must be created inside a tokio runtime context.
#[derive(Debug)]
pub struct TaskHandle {
    inner: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Spawn a future as an owned background task
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            inner: Some(tokio::spawn(future)),
        }
    }

    /// Cancel the task and wait until it has fully stopped
    ///
    /// After this returns, the task body is guaranteed not to run
    /// again, including callbacks pending between two of its awaits.
    pub async fn stop(mut self) {
        if let Some(handle) = self.inner.take() {
            handle.abort();
            // JoinError::Cancelled is the expected outcome here.
            let _ = handle.await;
        }
    }

    /// Whether the task has already finished or been cancelled
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().map_or(true, |h| h.is_finished())
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(handle) = &self.inner {
            handle.abort();
        }
    }
}
