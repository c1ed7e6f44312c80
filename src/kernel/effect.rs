use std::path::PathBuf;

use crate::kernel::terminal::RequestId;

/// Requests for the async boundary, produced by `Store::dispatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadWorkspace {
        root: PathBuf,
    },
    ScheduleWrite {
        node_id: String,
        target: PathBuf,
        content: String,
    },
    CancelWrites {
        node_ids: Vec<String>,
    },
    CreateFolder {
        path: PathBuf,
    },
    RunCommand {
        request: RequestId,
        command: String,
        args: Vec<String>,
    },
    InstallExtension {
        project_path: PathBuf,
        package: String,
    },
}
