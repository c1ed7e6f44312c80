use super::Workbench;
use crate::kernel::services::adapters::AppMessage;
use crate::kernel::Action;
use std::time::Duration;

impl Workbench {
    /// Applies every message that has already arrived.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.handle_message(msg);
        }
        changed
    }

    /// Blocks until one message arrives and applies it. `None` on timeout.
    pub fn wait_for_message(&mut self, timeout: Duration) -> Option<bool> {
        let msg = self.rx.recv_timeout(timeout).ok()?;
        Some(self.handle_message(msg))
    }

    pub fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::WorkspaceLoaded {
                token,
                root,
                result,
            } => {
                if !self.sync.is_current_load(token) {
                    tracing::debug!(token, root = %root.display(), "stale workspace load discarded");
                    return false;
                }
                self.dispatch_kernel(Action::WorkspaceLoaded { root, result })
                    .state_changed
            }
            AppMessage::FileWritten {
                node_id,
                target,
                content,
            } => {
                tracing::debug!(%node_id, target = %target.display(), "file written");
                if self.sync.is_pending(&node_id) {
                    return false;
                }
                self.dispatch_kernel(Action::ContentSaved {
                    id: node_id,
                    content,
                })
                .state_changed
            }
            AppMessage::WriteFailed { node_id, error } => {
                tracing::warn!(%node_id, error = %error, "write failed");
                self.dispatch_kernel(Action::ReportExternalError(error))
                    .state_changed
            }
            AppMessage::FolderCreated { path } => {
                tracing::debug!(path = %path.display(), "folder created");
                false
            }
            AppMessage::ExternalFailure(error) => self
                .dispatch_kernel(Action::ReportExternalError(error))
                .state_changed,
            AppMessage::CommandFinished { request, result } => self
                .dispatch_kernel(Action::CommandFinished { request, result })
                .state_changed,
            AppMessage::ExtensionInstalled { package, result } => self
                .dispatch_kernel(Action::ExtensionInstalled { package, result })
                .state_changed,
        }
    }
}
