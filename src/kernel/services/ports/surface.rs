//! Command surface: the only boundary that touches disk, shell or package manager.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use crate::kernel::error::ExternalIoError;
use crate::models::NodeData;

pub type SurfaceFuture<T> = Pin<Box<dyn Future<Output = Result<T, ExternalIoError>> + Send + 'static>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub success: bool,
    pub message: String,
}

/// Every call returns an owned future so the runtime can drive it off the
/// dispatch thread.
pub trait CommandSurface: Send + Sync {
    fn load_workspace(&self, root: PathBuf) -> SurfaceFuture<Vec<NodeData>>;

    fn create_folder(&self, path: PathBuf) -> SurfaceFuture<()>;

    fn write_file(&self, target: PathBuf, content: String) -> SurfaceFuture<()>;

    fn run_command(&self, command: String, args: Vec<String>) -> SurfaceFuture<String>;

    fn install_extension(&self, project_path: PathBuf, package: String)
        -> SurfaceFuture<InstallOutcome>;
}
