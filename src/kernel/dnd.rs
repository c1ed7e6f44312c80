//! Drag-and-drop reparenting state machine.
//!
//! Input-device independent: the host translates pointer or keyboard gestures
//! into `drag_start`/`drag_enter`/`drag_leave`/`drop`/`drag_end` calls.
//! Events that do not apply to the current state are ignored.

use serde::Serialize;

use super::error::WorkspaceError;
use crate::models::FileTree;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: String,
    },
    HoverTarget {
        source: String,
        target: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Moved { source: String, target: String },
    Cancelled,
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn source(&self) -> Option<&str> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging { source } | DragState::HoverTarget { source, .. } => Some(source),
        }
    }

    pub fn involves(&self, id: &str) -> bool {
        match &self.state {
            DragState::Idle => false,
            DragState::Dragging { source } => source == id,
            DragState::HoverTarget { source, target } => source == id || target == id,
        }
    }

    /// Starts (or restarts) a drag from an existing node.
    pub fn drag_start(&mut self, tree: &FileTree, id: &str) -> Result<bool, WorkspaceError> {
        if !tree.contains(id) {
            return Err(WorkspaceError::NotFound(id.to_string()));
        }
        let next = DragState::Dragging {
            source: id.to_string(),
        };
        Ok(self.transition(next))
    }

    /// Hovers `id` as the drop target. A target that cannot accept the source
    /// leaves the controller in `Dragging`. Returns true when the hover is accepted.
    pub fn drag_enter(&mut self, tree: &FileTree, id: &str) -> bool {
        let Some(source) = self.source().map(str::to_string) else {
            return false;
        };

        match tree.validate_move(&source, id) {
            Ok(()) => {
                self.transition(DragState::HoverTarget {
                    source,
                    target: id.to_string(),
                });
                true
            }
            Err(err) => {
                tracing::debug!(%source, target = %id, error = %err, "drag hover rejected");
                self.transition(DragState::Dragging { source });
                false
            }
        }
    }

    pub fn drag_leave(&mut self, id: &str) -> bool {
        let DragState::HoverTarget { source, target } = &self.state else {
            return false;
        };
        if target != id {
            return false;
        }
        let source = source.clone();
        self.transition(DragState::Dragging { source })
    }

    /// Completes the gesture. Only `HoverTarget` moves anything; the controller
    /// is always back in `Idle` afterwards, even when the move fails.
    pub fn drop(&mut self, tree: &mut FileTree) -> Result<DropOutcome, WorkspaceError> {
        match std::mem::take(&mut self.state) {
            DragState::HoverTarget { source, target } => {
                tree.move_node(&source, &target)?;
                tracing::debug!(%source, %target, "node moved by drag");
                Ok(DropOutcome::Moved { source, target })
            }
            DragState::Dragging { .. } | DragState::Idle => Ok(DropOutcome::Cancelled),
        }
    }

    pub fn drag_end(&mut self) -> bool {
        self.transition(DragState::Idle)
    }

    fn transition(&mut self, next: DragState) -> bool {
        if self.state == next {
            return false;
        }
        self.state = next;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/dnd.rs"]
mod tests;
