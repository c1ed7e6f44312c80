use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A single delayed task that can be rescheduled or cancelled.
///
/// The delay and the task run in separate tokio tasks: cancelling (or
/// rescheduling, or dropping) only ever aborts the timer, so a task that has
/// already started always runs to completion. Successive tasks of one
/// `ScheduledTask` run one after another, never concurrently.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: Handle,
    timer: Option<JoinHandle<()>>,
    running: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ScheduledTask {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            timer: None,
            running: Arc::new(Mutex::new(None)),
        }
    }

    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let running = Arc::clone(&self.running);
        self.timer = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // no await below this point: once the delay is over, the timer
            // cannot be aborted half way through starting the task
            let previous = running.lock().take();
            let started = tokio::spawn(async move {
                if let Some(previous) = previous {
                    let _ = previous.await;
                }
                task.await;
            });
            *running.lock() = Some(started);
        }));
    }

    /// Stops the timer. Returns true if the task had not started yet.
    pub fn cancel(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                let pending = !timer.is_finished();
                timer.abort();
                pending
            }
            None => false,
        }
    }

    /// Waiting for its delay; the task has not started.
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// The task has started and not finished yet.
    pub fn is_running(&self) -> bool {
        self.running.lock().as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Hands out the started task, if it is still running, so a caller can
    /// wait for it.
    pub fn take_running(&mut self) -> Option<JoinHandle<()>> {
        let mut running = self.running.lock();
        match running.take() {
            Some(task) if !task.is_finished() => Some(task),
            _ => None,
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/scheduled.rs"]
mod tests;
