//! Background task runner.
//!
//! Each task runs on its own named thread and hands back exactly one value
//! over a one-shot channel. There is no cancellation and no timeout: a task
//! that never finishes leaves its handle pending forever.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::task::Poll;
use std::thread;

use crate::error::{GridError, Result};

/// Handle to a value being produced on a worker thread.
///
/// Resolves exactly once. After [`poll`](Self::poll) has returned
/// `Poll::Ready`, further polls report [`GridError::TaskLost`].
pub struct TaskHandle<T> {
    name: &'static str,
    rx: Receiver<T>,
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Runs `work(input)` on a fresh thread named `gridwave-{name}`.
///
/// Failing to start the thread is a [`GridError::SetupFailure`].
pub fn spawn<I, T, F>(name: &'static str, input: I, work: F) -> Result<TaskHandle<T>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: FnOnce(I) -> T + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    thread::Builder::new()
        .name(format!("gridwave-{name}"))
        .spawn(move || {
            log::debug!("{name} worker fired");
            let output = work(input);
            // The receiver may already be gone if the caller gave up on the result.
            if tx.send(output).is_err() {
                log::debug!("{name} worker finished after its handle was dropped");
            }
        })
        .map_err(|source| GridError::SetupFailure { task: name, source })?;

    Ok(TaskHandle { name, rx })
}

impl<T> TaskHandle<T> {
    /// Blocks until the worker delivers its value.
    pub fn join(self) -> Result<T> {
        self.rx.recv().map_err(|_| GridError::TaskLost { task: self.name })
    }

    /// Non-blocking check for the worker's value.
    pub fn poll(&mut self) -> Poll<Result<T>> {
        match self.rx.try_recv() {
            Ok(value) => Poll::Ready(Ok(value)),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Ready(Err(GridError::TaskLost { task: self.name })),
        }
    }
}
