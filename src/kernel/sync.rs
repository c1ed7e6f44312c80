//! Debounced persistence of edited content and tokened workspace loads.

use std::path::PathBuf;
use std::time::Duration;

use rustc_hash::FxHashMap;

use super::services::adapters::{BoxFuture, ScheduledTask, SurfaceDispatcher};
use super::terminal::RequestId;

#[derive(Debug)]
struct PendingWrite {
    task: ScheduledTask,
    target: PathBuf,
    content: String,
}

pub struct ContentSyncBridge {
    dispatcher: SurfaceDispatcher,
    window: Duration,
    pending: FxHashMap<String, PendingWrite>,
    root: Option<PathBuf>,
    load_token: u64,
}

impl ContentSyncBridge {
    pub fn new(dispatcher: SurfaceDispatcher, window: Duration) -> Self {
        Self {
            dispatcher,
            window,
            pending: FxHashMap::default(),
            root: None,
            load_token: 0,
        }
    }

    /// Issues a load and returns its token.
    ///
    /// Reloading the same root leaves pending writes alone; the store lays
    /// unsaved edits over the loaded tree. Switching to another root starts
    /// every pending write of the old root right away.
    pub fn begin_load(&mut self, root: PathBuf) -> u64 {
        if self.root.as_deref() != Some(root.as_path()) {
            self.flush_in_background();
            self.root = Some(root.clone());
        }
        self.load_token = self.load_token.saturating_add(1);
        tracing::info!(token = self.load_token, root = %root.display(), "loading workspace");
        self.dispatcher.load_workspace(self.load_token, root);
        self.load_token
    }

    pub fn is_current_load(&self, token: u64) -> bool {
        token == self.load_token
    }

    /// Restarts the quiet window for `node_id`; only the latest content is written.
    pub fn content_edited(&mut self, node_id: &str, target: PathBuf, content: String) {
        self.prune_finished();

        let write = self
            .dispatcher
            .write_file(node_id.to_string(), target.clone(), content.clone());
        let handle = self.dispatcher.handle();
        let entry = self
            .pending
            .entry(node_id.to_string())
            .or_insert_with(|| PendingWrite {
                task: ScheduledTask::new(handle),
                target: PathBuf::new(),
                content: String::new(),
            });
        entry.target = target;
        entry.content = content;
        entry.task.schedule(self.window, write);
    }

    /// Drops the pending write of `node_id`, if any. A write that already
    /// started is left to finish.
    pub fn cancel(&mut self, node_id: &str) -> bool {
        self.pending
            .remove(node_id)
            .is_some_and(|mut pending| pending.task.cancel())
    }

    /// Cancels every timer and hands back the writes that were still due, so the
    /// caller can run them to completion. Writes already in flight are handed
    /// back as well and finish before the re-issued write of the same node.
    pub fn flush_all(&mut self) -> Vec<BoxFuture> {
        let mut writes: Vec<BoxFuture> = Vec::new();
        for (node_id, mut pending) in self.pending.drain() {
            let due = pending.task.cancel();
            let in_flight = pending.task.take_running();
            let write = if due {
                Some(
                    self.dispatcher
                        .write_file(node_id, pending.target, pending.content),
                )
            } else {
                None
            };
            match (in_flight, write) {
                (Some(in_flight), Some(write)) => writes.push(Box::pin(async move {
                    let _ = in_flight.await;
                    write.await;
                })),
                (Some(in_flight), None) => writes.push(Box::pin(async move {
                    let _ = in_flight.await;
                })),
                (None, Some(write)) => writes.push(write),
                (None, None) => {}
            }
        }
        writes
    }

    fn flush_in_background(&mut self) {
        let writes = self.flush_all();
        if writes.is_empty() {
            return;
        }
        tracing::debug!(count = writes.len(), "flushing writes of previous root");
        let handle = self.dispatcher.handle();
        for write in writes {
            handle.spawn(write);
        }
    }

    pub fn create_folder(&self, path: PathBuf) {
        self.dispatcher.create_folder(path);
    }

    pub fn run_command(&self, request: RequestId, command: String, args: Vec<String>) {
        self.dispatcher.run_command(request, command, args);
    }

    pub fn install_extension(&self, project_path: PathBuf, package: String) {
        self.dispatcher.install_extension(project_path, package);
    }

    pub fn is_pending(&self, node_id: &str) -> bool {
        self.pending
            .get(node_id)
            .is_some_and(|pending| pending.task.is_pending())
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .values()
            .filter(|pending| pending.task.is_pending())
            .count()
    }

    fn prune_finished(&mut self) {
        self.pending
            .retain(|_, pending| pending.task.is_pending() || pending.task.is_running());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/sync.rs"]
mod tests;
