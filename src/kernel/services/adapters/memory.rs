//! In-memory command surface that records every call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::kernel::error::ExternalIoError;
use crate::kernel::services::ports::{CommandSurface, InstallOutcome, SurfaceFuture};
use crate::models::NodeData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    LoadWorkspace(PathBuf),
    CreateFolder(PathBuf),
    WriteFile { target: PathBuf, content: String },
    RunCommand { command: String, args: Vec<String> },
    InstallExtension { project_path: PathBuf, package: String },
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<SurfaceCall>,
    workspaces: FxHashMap<PathBuf, Vec<NodeData>>,
    load_delays: FxHashMap<PathBuf, Duration>,
    write_delay: Option<Duration>,
    failing_ops: Vec<&'static str>,
    command_output: FxHashMap<String, Result<String, String>>,
    install_success: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        let surface = Self::default();
        surface.inner.lock().install_success = true;
        surface
    }

    pub fn with_workspace(self, root: impl Into<PathBuf>, nodes: Vec<NodeData>) -> Self {
        self.set_workspace(root, nodes);
        self
    }

    pub fn set_workspace(&self, root: impl Into<PathBuf>, nodes: Vec<NodeData>) {
        self.inner.lock().workspaces.insert(root.into(), nodes);
    }

    /// Delays the load response for `root`, to simulate slow disks.
    pub fn set_load_delay(&self, root: impl Into<PathBuf>, delay: Duration) {
        self.inner.lock().load_delays.insert(root.into(), delay);
    }

    /// Keeps every write in flight for `delay` after it is recorded.
    pub fn set_write_delay(&self, delay: Duration) {
        self.inner.lock().write_delay = Some(delay);
    }

    /// Makes every call of `op` (e.g. `"write_file"`) fail.
    pub fn fail_op(&self, op: &'static str) {
        self.inner.lock().failing_ops.push(op);
    }

    pub fn set_command_output(&self, command: &str, output: Result<String, String>) {
        self.inner
            .lock()
            .command_output
            .insert(command.to_string(), output);
    }

    pub fn set_install_success(&self, success: bool) {
        self.inner.lock().install_success = success;
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.inner.lock().calls.clone()
    }

    pub fn writes(&self) -> Vec<(PathBuf, String)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::WriteFile { target, content } => Some((target.clone(), content.clone())),
                _ => None,
            })
            .collect()
    }

    fn record(&self, op: &'static str, call: SurfaceCall) -> Result<(), ExternalIoError> {
        let mut inner = self.inner.lock();
        inner.calls.push(call);
        if inner.failing_ops.contains(&op) {
            return Err(ExternalIoError::new(op, "simulated failure"));
        }
        Ok(())
    }
}

impl CommandSurface for MemorySurface {
    fn load_workspace(&self, root: PathBuf) -> SurfaceFuture<Vec<NodeData>> {
        let recorded = self.record("load_workspace", SurfaceCall::LoadWorkspace(root.clone()));
        let (nodes, delay) = {
            let inner = self.inner.lock();
            (
                inner.workspaces.get(&root).cloned(),
                inner.load_delays.get(&root).copied(),
            )
        };
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            recorded?;
            nodes.ok_or_else(|| {
                ExternalIoError::new("load_workspace", format!("{} does not exist", root.display()))
            })
        })
    }

    fn create_folder(&self, path: PathBuf) -> SurfaceFuture<()> {
        let recorded = self.record("create_folder", SurfaceCall::CreateFolder(path));
        Box::pin(async move { recorded })
    }

    fn write_file(&self, target: PathBuf, content: String) -> SurfaceFuture<()> {
        let recorded = self.record("write_file", SurfaceCall::WriteFile { target, content });
        let delay = self.inner.lock().write_delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            recorded
        })
    }

    fn run_command(&self, command: String, args: Vec<String>) -> SurfaceFuture<String> {
        let recorded = self.record(
            "run_command",
            SurfaceCall::RunCommand {
                command: command.clone(),
                args: args.clone(),
            },
        );
        let canned = self.inner.lock().command_output.get(&command).cloned();
        Box::pin(async move {
            recorded?;
            match canned {
                Some(Ok(output)) => Ok(output),
                Some(Err(message)) => Err(ExternalIoError::new("run_command", message)),
                None => Ok(args.join(" ")),
            }
        })
    }

    fn install_extension(
        &self,
        project_path: PathBuf,
        package: String,
    ) -> SurfaceFuture<InstallOutcome> {
        let recorded = self.record(
            "install_extension",
            SurfaceCall::InstallExtension {
                project_path,
                package: package.clone(),
            },
        );
        let success = self.inner.lock().install_success;
        Box::pin(async move {
            recorded?;
            let message = if success {
                format!("Installed {package}")
            } else {
                format!("Failed to install {package}")
            };
            Ok(InstallOutcome { success, message })
        })
    }
}
