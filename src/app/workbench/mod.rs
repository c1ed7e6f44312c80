//! Workbench: owns the shared store, the async runtime and the content sync bridge.

use crate::kernel::services::adapters::{AppMessage, AsyncRuntime};
use crate::kernel::services::ports::{CommandSurface, WorkspaceConfig};
use crate::kernel::{AppState, ContentSyncBridge, SharedStore, WorkspaceSnapshot};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

mod bridge;
mod tick;

pub struct Workbench {
    store: Arc<SharedStore>,
    runtime: AsyncRuntime,
    sync: ContentSyncBridge,
    rx: Receiver<AppMessage>,
}

impl Workbench {
    pub fn new(config: WorkspaceConfig, surface: Arc<dyn CommandSurface>) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(surface, tx)?;
        let sync = ContentSyncBridge::new(runtime.dispatcher(), config.debounce_window());
        let store = Arc::new(SharedStore::new(AppState::new(config)));
        Ok(Self {
            store,
            runtime,
            sync,
            rx,
        })
    }

    /// Shared handle for readers on other threads.
    pub fn store(&self) -> Arc<SharedStore> {
        Arc::clone(&self.store)
    }

    pub fn snapshot(&self) -> Arc<WorkspaceSnapshot> {
        self.store.snapshot()
    }

    pub fn pending_writes(&self) -> usize {
        self.sync.pending_count()
    }

    pub fn is_write_pending(&self, node_id: &str) -> bool {
        self.sync.is_pending(node_id)
    }

    /// Writes every pending edit immediately, then stops the runtime.
    pub fn shutdown(mut self, timeout: Duration) {
        let writes = self.sync.flush_all();
        let flushed = writes.len();
        self.runtime.block_on_all(writes);
        self.pump();
        tracing::info!(flushed, "workbench shut down");
        self.runtime.shutdown(timeout);
    }
}
