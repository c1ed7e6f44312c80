use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::dnd::DragController;
use super::services::ports::WorkspaceConfig;
use super::tabs::TabSet;
use super::terminal::TerminalState;
use crate::models::FileTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-visible message, e.g. a failed write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ExtensionsState {
    pub installing: Option<String>,
    pub installed: BTreeSet<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub config: WorkspaceConfig,
    pub workspace_root: Option<PathBuf>,
    pub loading: bool,
    pub tree: FileTree,
    pub tabs: TabSet,
    pub drag: DragController,
    pub terminal: TerminalState,
    pub extensions: ExtensionsState,
    notices: VecDeque<Notice>,
    next_notice: u64,
}

impl AppState {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            config,
            workspace_root: None,
            loading: false,
            tree: FileTree::default(),
            tabs: TabSet::new(),
            drag: DragController::new(),
            terminal: TerminalState::default(),
            extensions: ExtensionsState::default(),
            notices: VecDeque::new(),
            next_notice: 0,
        }
    }

    pub fn notices(&self) -> impl ExactSizeIterator<Item = &Notice> + '_ {
        self.notices.iter()
    }

    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.next_notice = self.next_notice.saturating_add(1);
        self.notices.push_back(Notice {
            id: self.next_notice,
            level,
            message: message.into(),
        });
        while self.notices.len() > self.config.max_notices.max(1) {
            self.notices.pop_front();
        }
    }

    pub fn dismiss_notice(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    /// Label given to nodes of the workspace at `root`.
    pub fn workspace_label(&self, root: &Path) -> String {
        self.config.workspace_label.clone().unwrap_or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| root.display().to_string())
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
