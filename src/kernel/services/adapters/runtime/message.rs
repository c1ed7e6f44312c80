use std::path::PathBuf;

use crate::kernel::error::ExternalIoError;
use crate::kernel::services::ports::InstallOutcome;
use crate::kernel::terminal::RequestId;
use crate::models::NodeData;

/// Results of command-surface calls, sent back to the dispatch thread.
#[derive(Debug)]
pub enum AppMessage {
    WorkspaceLoaded {
        token: u64,
        root: PathBuf,
        result: Result<Vec<NodeData>, ExternalIoError>,
    },
    FileWritten {
        node_id: String,
        target: PathBuf,
        content: String,
    },
    WriteFailed {
        node_id: String,
        error: ExternalIoError,
    },
    FolderCreated {
        path: PathBuf,
    },
    ExternalFailure(ExternalIoError),
    CommandFinished {
        request: RequestId,
        result: Result<String, ExternalIoError>,
    },
    ExtensionInstalled {
        package: String,
        result: Result<InstallOutcome, ExternalIoError>,
    },
}
