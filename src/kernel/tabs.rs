//! Open editor tabs and the active pointer.

use std::sync::Arc;

use serde::Serialize;

use super::error::WorkspaceError;
use super::language::LanguageId;
use crate::models::NodeRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub node_id: String,
    pub name: String,
    /// Shared with published snapshots; replaced, never mutated in place.
    pub content: Arc<str>,
    pub language: LanguageId,
}

#[derive(Debug, Clone, Default)]
pub struct TabSet {
    tabs: Vec<Tab>,
    active: Option<String>,
}

impl TabSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Tab> {
        let id = self.active.as_deref()?;
        self.get(id)
    }

    pub fn get(&self, node_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.node_id == node_id)
    }

    pub fn is_open(&self, node_id: &str) -> bool {
        self.get(node_id).is_some()
    }

    fn position(&self, node_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.node_id == node_id)
    }

    /// Focuses the tab for `node`, opening it at the end when absent.
    /// Returns whether anything changed.
    pub fn open_file(&mut self, node: NodeRef<'_>) -> Result<bool, WorkspaceError> {
        let Some(content) = node.content() else {
            return Err(WorkspaceError::invalid(format!(
                "{} is a folder and cannot be opened",
                node.id()
            )));
        };

        if self.is_open(node.id()) {
            return Ok(self.focus(node.id()));
        }

        self.tabs.push(Tab {
            node_id: node.id().to_string(),
            name: node.name().to_string(),
            content: Arc::from(content),
            language: LanguageId::from_file_name(node.name()),
        });
        self.active = Some(node.id().to_string());
        Ok(true)
    }

    fn focus(&mut self, node_id: &str) -> bool {
        if self.active.as_deref() == Some(node_id) {
            return false;
        }
        self.active = Some(node_id.to_string());
        true
    }

    /// Closing the active tab focuses the last remaining one.
    pub fn close_tab(&mut self, node_id: &str) -> bool {
        let Some(index) = self.position(node_id) else {
            return false;
        };
        self.tabs.remove(index);
        if self.active.as_deref() == Some(node_id) {
            self.active = self.tabs.last().map(|t| t.node_id.clone());
        }
        true
    }

    pub fn set_active(&mut self, node_id: &str) -> Result<bool, WorkspaceError> {
        if !self.is_open(node_id) {
            return Err(WorkspaceError::invalid(format!("{node_id} is not open")));
        }
        Ok(self.focus(node_id))
    }

    pub fn sync_content(&mut self, node_id: &str, content: &str) -> bool {
        match self.tabs.iter_mut().find(|t| t.node_id == node_id) {
            Some(tab) if &*tab.content != content => {
                tab.content = Arc::from(content);
                true
            }
            _ => false,
        }
    }

    pub fn rename(&mut self, node_id: &str, name: &str) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.node_id == node_id) else {
            return false;
        };
        tab.name = name.to_string();
        tab.language = LanguageId::from_file_name(name);
        true
    }

    /// Drops every tab whose id fails `keep`, then repairs the active pointer
    /// the same way `close_tab` does. Returns the closed ids.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut closed = Vec::new();
        self.tabs.retain(|tab| {
            let kept = keep(&tab.node_id);
            if !kept {
                closed.push(tab.node_id.clone());
            }
            kept
        });

        let active_closed = self
            .active
            .as_deref()
            .is_some_and(|active| closed.iter().any(|id| id == active));
        if active_closed {
            self.active = self.tabs.last().map(|t| t.node_id.clone());
        }
        closed
    }

    pub fn clear(&mut self) -> Vec<String> {
        self.active = None;
        self.tabs.drain(..).map(|t| t.node_id).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/tabs.rs"]
mod tests;
