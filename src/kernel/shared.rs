//! Thread-safe handle around the store.
//!
//! Every dispatch runs under one mutation lock; after a state change a fresh
//! read snapshot is published through an `ArcSwap`, so readers on other
//! threads never block on a writer and never observe a half-applied action.
//!
//! Snapshots carry the tree outline without file contents. The outline, the
//! view rows and the transcript are shared with the previous snapshot until
//! they change; contents are read through open tabs or [`SharedStore::content`].

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::Serialize;

use super::dnd::DragState;
use super::state::Notice;
use super::tabs::Tab;
use super::terminal::TerminalLine;
use super::{Action, AppState, DispatchResult, Store};
use crate::models::{FileTreeRow, NodeData};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub revision: u64,
    pub root: Option<PathBuf>,
    pub loading: bool,
    /// Tree outline; `content` is always `None`.
    pub tree: Arc<Vec<NodeData>>,
    #[serde(skip)]
    pub rows: Arc<Vec<FileTreeRow>>,
    pub tabs: Vec<Tab>,
    pub active_tab: Option<String>,
    pub drag: DragState,
    pub terminal: Arc<Vec<TerminalLine>>,
    pub notices: Vec<Notice>,
    pub installing: Option<String>,
    #[serde(skip)]
    tree_rev: u64,
    #[serde(skip)]
    terminal_rev: u64,
}

impl WorkspaceSnapshot {
    fn capture(state: &AppState, revision: u64, previous: Option<&WorkspaceSnapshot>) -> Self {
        let tree_rev = state.tree.structure_rev();
        let (tree, rows) = match previous {
            Some(prev) if prev.tree_rev == tree_rev => {
                (Arc::clone(&prev.tree), Arc::clone(&prev.rows))
            }
            _ => (
                Arc::new(state.tree.to_outline()),
                Arc::new(state.tree.flatten_for_view()),
            ),
        };
        let terminal_rev = state.terminal.revision();
        let terminal = match previous {
            Some(prev) if prev.terminal_rev == terminal_rev => Arc::clone(&prev.terminal),
            _ => Arc::new(state.terminal.lines().to_vec()),
        };

        Self {
            revision,
            root: state.workspace_root.clone(),
            loading: state.loading,
            tree,
            rows,
            tabs: state.tabs.tabs().to_vec(),
            active_tab: state.tabs.active_id().map(str::to_string),
            drag: state.drag.state().clone(),
            terminal,
            notices: state.notices().cloned().collect(),
            installing: state.extensions.installing.clone(),
            tree_rev,
            terminal_rev,
        }
    }

    pub fn active(&self) -> Option<&Tab> {
        let id = self.active_tab.as_deref()?;
        self.tabs.iter().find(|t| t.node_id == id)
    }
}

pub struct SharedStore {
    store: Mutex<Store>,
    snapshot: ArcSwap<WorkspaceSnapshot>,
}

impl SharedStore {
    pub fn new(state: AppState) -> Self {
        let snapshot = WorkspaceSnapshot::capture(&state, 0, None);
        Self {
            store: Mutex::new(Store::new(state)),
            snapshot: ArcSwap::from_pointee(snapshot),
        }
    }

    pub fn dispatch(&self, action: Action) -> DispatchResult {
        let mut store = self.store.lock();
        let result = store.dispatch(action);
        if result.state_changed {
            let previous = self.snapshot.load();
            let revision = previous.revision.saturating_add(1);
            let next = WorkspaceSnapshot::capture(store.state(), revision, Some(&**previous));
            self.snapshot.store(Arc::new(next));
        }
        result
    }

    pub fn snapshot(&self) -> Arc<WorkspaceSnapshot> {
        self.snapshot.load_full()
    }

    /// Current content of file `id`, open or not.
    pub fn content(&self, id: &str) -> Option<String> {
        self.read(|state| state.tree.get(id)?.content().map(str::to_string))
    }

    /// Runs `f` against the live state under the mutation lock.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(self.store.lock().state())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/shared.rs"]
mod tests;
