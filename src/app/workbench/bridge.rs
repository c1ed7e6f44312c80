use super::Workbench;
use crate::kernel::{Action, DispatchResult, Effect, WorkspaceError};

impl Workbench {
    /// Applies a UI action and starts whatever IO it requested.
    /// Returns whether the visible state changed.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, WorkspaceError> {
        let result = self.dispatch_kernel(action);
        match result.error {
            Some(error) => Err(error),
            None => Ok(result.state_changed),
        }
    }

    pub(super) fn dispatch_kernel(&mut self, action: Action) -> DispatchResult {
        let mut result = self.store.dispatch(action);
        for effect in std::mem::take(&mut result.effects) {
            self.run_effect(effect);
        }
        result
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::LoadWorkspace { root } => {
                self.sync.begin_load(root);
            }
            Effect::ScheduleWrite {
                node_id,
                target,
                content,
            } => {
                self.sync.content_edited(&node_id, target, content);
            }
            Effect::CancelWrites { node_ids } => {
                for node_id in node_ids {
                    if self.sync.cancel(&node_id) {
                        tracing::debug!(%node_id, "pending write cancelled");
                    }
                }
            }
            Effect::CreateFolder { path } => {
                self.sync.create_folder(path);
            }
            Effect::RunCommand {
                request,
                command,
                args,
            } => {
                self.sync.run_command(request, command, args);
            }
            Effect::InstallExtension {
                project_path,
                package,
            } => {
                tracing::info!(%package, "installing extension");
                self.sync.install_extension(project_path, package);
            }
        }
    }
}
