//! Disk, shell and npm backed command surface.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::process::Command;

use crate::kernel::error::ExternalIoError;
use crate::kernel::services::ports::{CommandSurface, InstallOutcome, SurfaceFuture, WorkspaceConfig};
use crate::models::NodeData;

#[derive(Debug, Clone)]
pub struct LocalSurface {
    config: Arc<WorkspaceConfig>,
    cwd: Arc<Mutex<PathBuf>>,
}

impl LocalSurface {
    pub fn new(config: &WorkspaceConfig, cwd: PathBuf) -> Self {
        Self {
            config: Arc::new(config.clone()),
            cwd: Arc::new(Mutex::new(cwd)),
        }
    }

    pub fn cwd(&self) -> PathBuf {
        self.cwd.lock().clone()
    }
}

fn read_workspace(root: &Path, config: &WorkspaceConfig) -> io::Result<Vec<NodeData>> {
    let meta = std::fs::metadata(root)?;
    if !meta.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", root.display()),
        ));
    }
    let label = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    read_dir_recursive(root, &label, config)
}

fn read_dir_recursive(dir: &Path, label: &str, config: &WorkspaceConfig) -> io::Result<Vec<NodeData>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if config.should_ignore(&name) {
            continue;
        }
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push((name, is_dir, entry.path()));
    }

    entries.sort_by(|(a_name, a_dir, _), (b_name, b_dir, _)| {
        b_dir
            .cmp(a_dir)
            .then_with(|| a_name.to_lowercase().cmp(&b_name.to_lowercase()))
    });

    let mut nodes = Vec::with_capacity(entries.len());
    for (name, is_dir, path) in entries {
        let id = path.to_string_lossy().to_string();
        let node = if is_dir {
            let children = match read_dir_recursive(&path, label, config) {
                Ok(children) => children,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable directory");
                    Vec::new()
                }
            };
            NodeData::folder(id, name, children)
        } else {
            let content = if config.read_file_contents {
                std::fs::read_to_string(&path).unwrap_or_default()
            } else {
                String::new()
            };
            NodeData::file(id, name, content)
        };
        nodes.push(node.with_origin(label));
    }
    Ok(nodes)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

async fn change_dir(cwd: &Mutex<PathBuf>, args: &[String]) -> Result<String, ExternalIoError> {
    let requested = match args.first() {
        Some(arg) => PathBuf::from(arg),
        None => home_dir()
            .ok_or_else(|| ExternalIoError::new("run_command", "cannot determine home directory"))?,
    };
    let candidate = if requested.is_relative() {
        cwd.lock().join(&requested)
    } else {
        requested.clone()
    };

    let is_dir = tokio::fs::metadata(&candidate)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ExternalIoError::new(
            "run_command",
            format!("No such directory: {}", requested.display()),
        ));
    }

    let resolved = tokio::fs::canonicalize(&candidate)
        .await
        .map_err(|e| ExternalIoError::from_io("run_command", &e))?;
    let message = format!("Changed directory to {}", resolved.display());
    *cwd.lock() = resolved;
    Ok(message)
}

impl CommandSurface for LocalSurface {
    fn load_workspace(&self, root: PathBuf) -> SurfaceFuture<Vec<NodeData>> {
        let config = Arc::clone(&self.config);
        Box::pin(async move {
            let result = tokio::task::spawn_blocking(move || read_workspace(&root, &config)).await;
            match result {
                Ok(Ok(nodes)) => Ok(nodes),
                Ok(Err(e)) => Err(ExternalIoError::from_io("load_workspace", &e)),
                Err(e) => Err(ExternalIoError::new("load_workspace", e.to_string())),
            }
        })
    }

    fn create_folder(&self, path: PathBuf) -> SurfaceFuture<()> {
        Box::pin(async move {
            tokio::fs::create_dir_all(&path)
                .await
                .map_err(|e| ExternalIoError::from_io("create_folder", &e))
        })
    }

    fn write_file(&self, target: PathBuf, content: String) -> SurfaceFuture<()> {
        Box::pin(async move {
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ExternalIoError::from_io("write_file", &e))?;
            }
            tokio::fs::write(&target, content)
                .await
                .map_err(|e| ExternalIoError::from_io("write_file", &e))
        })
    }

    fn run_command(&self, command: String, args: Vec<String>) -> SurfaceFuture<String> {
        let cwd = Arc::clone(&self.cwd);
        Box::pin(async move {
            if command == "cd" {
                return change_dir(&cwd, &args).await;
            }

            let dir = cwd.lock().clone();
            let output = Command::new(&command)
                .args(&args)
                .current_dir(&dir)
                .output()
                .await
                .map_err(|e| ExternalIoError::from_io("run_command", &e))?;
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                Err(ExternalIoError::new(
                    "run_command",
                    String::from_utf8_lossy(&output.stderr).to_string(),
                ))
            }
        })
    }

    fn install_extension(
        &self,
        project_path: PathBuf,
        package: String,
    ) -> SurfaceFuture<InstallOutcome> {
        Box::pin(async move {
            let output = Command::new("npm")
                .arg("install")
                .arg(&package)
                .current_dir(&project_path)
                .output()
                .await
                .map_err(|e| ExternalIoError::from_io("install_extension", &e))?;
            let success = output.status.success();
            let message = if success {
                format!("Installed {package}")
            } else {
                String::from_utf8_lossy(&output.stderr).trim().to_string()
            };
            Ok(InstallOutcome { success, message })
        })
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/local.rs"]
mod tests;
