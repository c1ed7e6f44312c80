use std::path::PathBuf;

use crate::kernel::error::ExternalIoError;
use crate::kernel::services::ports::InstallOutcome;
use crate::kernel::terminal::RequestId;
use crate::models::{NodeData, NodeKind};

#[derive(Debug, Clone)]
pub enum Action {
    OpenWorkspace {
        root: PathBuf,
    },
    ReloadWorkspace,
    WorkspaceLoaded {
        root: PathBuf,
        result: Result<Vec<NodeData>, ExternalIoError>,
    },
    ToggleFolder {
        id: String,
    },
    CreateNode {
        parent: Option<String>,
        kind: NodeKind,
        name: String,
    },
    DeleteNode {
        id: String,
    },
    RenameNode {
        id: String,
        name: String,
    },
    EditContent {
        id: String,
        content: String,
    },
    /// `content` of `id` reached the disk.
    ContentSaved {
        id: String,
        content: String,
    },
    OpenFile {
        id: String,
    },
    CloseTab {
        id: String,
    },
    SetActiveTab {
        id: String,
    },
    DragStart {
        id: String,
    },
    DragEnter {
        id: String,
    },
    DragLeave {
        id: String,
    },
    Drop,
    DragEnd,
    TerminalSubmit {
        line: String,
    },
    CommandFinished {
        request: RequestId,
        result: Result<String, ExternalIoError>,
    },
    InstallExtension {
        package: String,
    },
    ExtensionInstalled {
        package: String,
        result: Result<InstallOutcome, ExternalIoError>,
    },
    ReportExternalError(ExternalIoError),
    DismissNotice {
        id: u64,
    },
}
