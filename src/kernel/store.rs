use std::path::PathBuf;

use rustc_hash::FxHashSet;

use crate::models::{NodeData, NodeKind};

use super::dnd::{DragState, DropOutcome};
use super::error::{ExternalIoError, WorkspaceError};
use super::services::ports::InstallOutcome;
use super::state::NoticeLevel;
use super::{Action, AppState, Effect};

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
    pub error: Option<WorkspaceError>,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            state_changed,
            ..Self::default()
        }
    }

    fn with_effects(effects: Vec<Effect>, state_changed: bool) -> Self {
        Self {
            effects,
            state_changed,
            error: None,
        }
    }
}

pub struct Store {
    state: AppState,
    /// Files edited since the last load whose latest content may not be on
    /// disk yet. A reload of the same root lays these over the loaded tree.
    unsaved: FxHashSet<String>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            unsaved: FxHashSet::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Reduces one action to completion. A rejected action leaves the state
    /// untouched and is reported through `DispatchResult::error`.
    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        match self.reduce(action) {
            Ok(result) => result,
            Err(error) => {
                tracing::debug!(%error, "action rejected");
                DispatchResult {
                    error: Some(error),
                    ..DispatchResult::default()
                }
            }
        }
    }

    fn reduce(&mut self, action: Action) -> Result<DispatchResult, WorkspaceError> {
        match action {
            Action::OpenWorkspace { root } => Ok(self.request_load(root)),
            Action::ReloadWorkspace => {
                let root = self
                    .state
                    .workspace_root
                    .clone()
                    .ok_or_else(|| WorkspaceError::invalid("no workspace is open"))?;
                Ok(self.request_load(root))
            }
            Action::WorkspaceLoaded { root, result } => Ok(self.apply_loaded(root, result)),
            Action::ToggleFolder { id } => Ok(DispatchResult::changed(
                self.state.tree.toggle_folder(&id)?,
            )),
            Action::CreateNode { parent, kind, name } => self.create_node(parent, kind, name),
            Action::DeleteNode { id } => Ok(self.delete_node(&id)),
            Action::RenameNode { id, name } => {
                validate_name(&name)?;
                self.state.tree.rename(&id, &name)?;
                self.state.tabs.rename(&id, &name);
                Ok(DispatchResult::changed(true))
            }
            Action::EditContent { id, content } => self.edit_content(id, content),
            Action::ContentSaved { id, content } => {
                self.content_saved(&id, &content);
                Ok(DispatchResult::unchanged())
            }
            Action::OpenFile { id } => {
                let node = self
                    .state
                    .tree
                    .get(&id)
                    .ok_or_else(|| WorkspaceError::NotFound(id.clone()))?;
                Ok(DispatchResult::changed(self.state.tabs.open_file(node)?))
            }
            Action::CloseTab { id } => {
                if !self.state.tabs.close_tab(&id) {
                    return Ok(DispatchResult::unchanged());
                }
                self.unsaved.remove(&id);
                Ok(DispatchResult::with_effects(
                    vec![Effect::CancelWrites { node_ids: vec![id] }],
                    true,
                ))
            }
            Action::SetActiveTab { id } => {
                Ok(DispatchResult::changed(self.state.tabs.set_active(&id)?))
            }
            Action::DragStart { id } => Ok(DispatchResult::changed(
                self.state.drag.drag_start(&self.state.tree, &id)?,
            )),
            Action::DragEnter { id } => {
                let before = self.state.drag.state().clone();
                self.state.drag.drag_enter(&self.state.tree, &id);
                Ok(DispatchResult::changed(*self.state.drag.state() != before))
            }
            Action::DragLeave { id } => {
                Ok(DispatchResult::changed(self.state.drag.drag_leave(&id)))
            }
            Action::Drop => self.drop_dragged(),
            Action::DragEnd => Ok(DispatchResult::changed(self.state.drag.drag_end())),
            Action::TerminalSubmit { line } => {
                let effects = self
                    .state
                    .terminal
                    .submit(&line)
                    .map(|req| Effect::RunCommand {
                        request: req.request,
                        command: req.command,
                        args: req.args,
                    })
                    .into_iter()
                    .collect();
                Ok(DispatchResult::with_effects(effects, true))
            }
            Action::CommandFinished { request, result } => {
                let result = result.map_err(|e| e.message);
                Ok(DispatchResult::changed(
                    self.state.terminal.apply_result(request, result),
                ))
            }
            Action::InstallExtension { package } => self.install_extension(package),
            Action::ExtensionInstalled { package, result } => {
                Ok(self.extension_installed(package, result))
            }
            Action::ReportExternalError(error) => {
                self.report_external(&error);
                Ok(DispatchResult::changed(true))
            }
            Action::DismissNotice { id } => {
                Ok(DispatchResult::changed(self.state.dismiss_notice(id)))
            }
        }
    }

    fn request_load(&mut self, root: PathBuf) -> DispatchResult {
        self.state.workspace_root = Some(root.clone());
        self.state.loading = true;
        DispatchResult::with_effects(vec![Effect::LoadWorkspace { root }], true)
    }

    fn apply_loaded(
        &mut self,
        root: PathBuf,
        result: Result<Vec<NodeData>, ExternalIoError>,
    ) -> DispatchResult {
        let label = self.state.workspace_label(&root);
        let same_root = self.state.tree.root_path() == root.as_path();
        self.state.loading = false;
        self.state.workspace_root = Some(root.clone());
        self.state.drag.drag_end();
        if !same_root {
            self.unsaved.clear();
        }

        let nodes = match result {
            Ok(nodes) => nodes,
            Err(error) => {
                // writes already scheduled still run; there is no tree left to
                // lay their content over
                self.unsaved.clear();
                self.report_external(&error);
                self.state.tree.clear(root, label);
                self.state.tabs.clear();
                return DispatchResult {
                    effects: Vec::new(),
                    state_changed: true,
                    error: Some(WorkspaceError::ExternalIo(error)),
                };
            }
        };

        let edits: Vec<(String, String)> = self
            .unsaved
            .iter()
            .filter_map(|id| {
                let content = self.state.tree.get(id)?.content()?;
                Some((id.clone(), content.to_string()))
            })
            .collect();

        if let Err(err) = self.state.tree.load(root, label, nodes) {
            tracing::warn!(error = %err, "loaded workspace rejected");
            self.state
                .push_notice(NoticeLevel::Error, format!("Workspace not loaded: {err}"));
            return DispatchResult {
                effects: Vec::new(),
                state_changed: true,
                error: Some(err.into()),
            };
        }

        let mut gone = Vec::new();
        for (id, content) in edits {
            let survives = self.state.tree.get(&id).is_some_and(|n| !n.is_folder());
            if survives && self.state.tree.update_content(&id, &content).is_ok() {
                continue;
            }
            self.unsaved.remove(&id);
            gone.push(id);
        }
        gone.sort();

        let tree = &self.state.tree;
        let closed = self
            .state
            .tabs
            .retain(|id| tree.get(id).is_some_and(|n| !n.is_folder()));
        for id in tree.file_ids() {
            let Some(node) = tree.get(&id) else {
                continue;
            };
            self.state.tabs.sync_content(&id, node.content().unwrap_or_default());
            if self.state.tabs.get(&id).is_some_and(|t| t.name != node.name()) {
                self.state.tabs.rename(&id, node.name());
            }
        }
        tracing::info!(
            nodes = tree.len(),
            closed_tabs = closed.len(),
            kept_edits = self.unsaved.len(),
            "workspace loaded"
        );

        let effects = if gone.is_empty() {
            Vec::new()
        } else {
            vec![Effect::CancelWrites { node_ids: gone }]
        };
        DispatchResult::with_effects(effects, true)
    }

    fn create_node(
        &mut self,
        parent: Option<String>,
        kind: NodeKind,
        name: String,
    ) -> Result<DispatchResult, WorkspaceError> {
        validate_name(&name)?;
        let id = self.state.tree.create_node(parent.as_deref(), kind, &name)?;
        tracing::debug!(%id, ?kind, %name, "node created");

        let mut effects = Vec::new();
        if self.state.workspace_root.is_some() {
            if let Some(target) = self.state.tree.target_path(&id) {
                effects.push(match kind {
                    NodeKind::Folder => Effect::CreateFolder { path: target },
                    NodeKind::File => Effect::ScheduleWrite {
                        node_id: id,
                        target,
                        content: String::new(),
                    },
                });
            }
        }
        Ok(DispatchResult::with_effects(effects, true))
    }

    fn delete_node(&mut self, id: &str) -> DispatchResult {
        let removed = self.state.tree.delete_node(id);
        if removed.is_empty() {
            return DispatchResult::unchanged();
        }
        for id in &removed {
            self.unsaved.remove(id);
        }
        self.state
            .tabs
            .retain(|tab| !removed.iter().any(|r| r == tab));
        if removed.iter().any(|r| self.state.drag.involves(r)) {
            self.state.drag.drag_end();
        }
        tracing::debug!(%id, removed = removed.len(), "node deleted");
        DispatchResult::with_effects(vec![Effect::CancelWrites { node_ids: removed }], true)
    }

    fn edit_content(
        &mut self,
        id: String,
        content: String,
    ) -> Result<DispatchResult, WorkspaceError> {
        self.state.tree.update_content(&id, &content)?;
        self.state.tabs.sync_content(&id, &content);

        let mut effects = Vec::new();
        if self.state.workspace_root.is_some() {
            if let Some(target) = self.state.tree.target_path(&id) {
                self.unsaved.insert(id.clone());
                effects.push(Effect::ScheduleWrite {
                    node_id: id,
                    target,
                    content,
                });
            }
        }
        Ok(DispatchResult::with_effects(effects, true))
    }

    /// A write of `content` landed. The node stops counting as unsaved once
    /// the disk holds what the tree holds and no load can still read the
    /// older copy.
    fn content_saved(&mut self, id: &str, content: &str) {
        if self.state.loading {
            return;
        }
        let matches = self
            .state
            .tree
            .get(id)
            .and_then(|node| node.content())
            .is_some_and(|current| current == content);
        if matches {
            self.unsaved.remove(id);
        }
    }

    fn drop_dragged(&mut self) -> Result<DispatchResult, WorkspaceError> {
        let was_dragging = *self.state.drag.state() != DragState::Idle;
        match self.state.drag.drop(&mut self.state.tree) {
            Ok(DropOutcome::Moved { .. }) => Ok(DispatchResult::changed(true)),
            Ok(DropOutcome::Cancelled) => Ok(DispatchResult::changed(was_dragging)),
            Err(error) => Ok(DispatchResult {
                effects: Vec::new(),
                state_changed: was_dragging,
                error: Some(error),
            }),
        }
    }

    fn install_extension(&mut self, package: String) -> Result<DispatchResult, WorkspaceError> {
        let package = package.trim().to_string();
        if package.is_empty() {
            return Err(WorkspaceError::invalid("package name is empty"));
        }
        let project_path = self
            .state
            .workspace_root
            .clone()
            .ok_or_else(|| WorkspaceError::invalid("no workspace is open"))?;
        if let Some(current) = &self.state.extensions.installing {
            return Err(WorkspaceError::invalid(format!(
                "{current} is already being installed"
            )));
        }

        self.state.extensions.installing = Some(package.clone());
        Ok(DispatchResult::with_effects(
            vec![Effect::InstallExtension {
                project_path,
                package,
            }],
            true,
        ))
    }

    fn extension_installed(
        &mut self,
        package: String,
        result: Result<InstallOutcome, ExternalIoError>,
    ) -> DispatchResult {
        if self.state.extensions.installing.as_deref() == Some(package.as_str()) {
            self.state.extensions.installing = None;
        }

        match result {
            Ok(outcome) if outcome.success => {
                self.state.extensions.installed.insert(package);
                self.state.push_notice(NoticeLevel::Info, outcome.message);
                match self.state.workspace_root.clone() {
                    Some(root) => self.request_load(root),
                    None => DispatchResult::changed(true),
                }
            }
            Ok(outcome) => {
                tracing::warn!(%package, message = %outcome.message, "extension install failed");
                self.state.push_notice(NoticeLevel::Error, outcome.message);
                DispatchResult::changed(true)
            }
            Err(error) => {
                self.report_external(&error);
                DispatchResult::changed(true)
            }
        }
    }

    fn report_external(&mut self, error: &ExternalIoError) {
        tracing::warn!(op = error.op, error = %error.message, "external operation failed");
        self.state.push_notice(NoticeLevel::Error, error.to_string());
    }
}

fn validate_name(name: &str) -> Result<(), WorkspaceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(WorkspaceError::invalid(format!("invalid name {name:?}")));
    }
    if name.contains(['/', '\\']) {
        return Err(WorkspaceError::invalid(format!(
            "name {name:?} must not contain path separators"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
