use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tabtree::app::Workbench;
use tabtree::kernel::services::adapters::{ensure_settings_file, load_settings, LocalSurface};
use tabtree::kernel::{Action, NoticeLevel};
use tabtree::models::{NodeData, NodeKind};

mod logging;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

fn resolve_startup_root(cwd: &Path, arg: Option<&str>) -> io::Result<PathBuf> {
    let Some(arg) = arg else {
        return Ok(cwd.to_path_buf());
    };
    let path = PathBuf::from(arg);
    let path = if path.is_absolute() { path } else { cwd.join(path) };
    if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a directory", path.display()),
        ));
    }
    Ok(path)
}

fn print_nodes(nodes: &[NodeData], depth: usize) {
    for node in nodes {
        let marker = if node.kind == NodeKind::Folder { "/" } else { "" };
        println!("{}{}{}", "  ".repeat(depth), node.name, marker);
        if let Some(children) = &node.children {
            print_nodes(children, depth + 1);
        }
    }
}

fn main() -> io::Result<()> {
    let logging = logging::init();
    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "cannot create settings file");
    }
    let config = load_settings();

    let cwd = env::current_dir()?;
    let arg = env::args().nth(1);
    let root = resolve_startup_root(&cwd, arg.as_deref())?;

    let surface = Arc::new(LocalSurface::new(&config, cwd));
    let mut workbench = Workbench::new(config, surface)?;
    workbench
        .dispatch(Action::OpenWorkspace { root })
        .map_err(io::Error::other)?;

    while workbench.snapshot().loading {
        if workbench.wait_for_message(LOAD_TIMEOUT).is_none() {
            eprintln!("timed out waiting for the workspace to load");
            break;
        }
    }

    let snapshot = workbench.snapshot();
    print_nodes(&snapshot.tree, 0);
    for notice in &snapshot.notices {
        if notice.level == NoticeLevel::Error {
            eprintln!("error: {}", notice.message);
        }
    }
    if let Some(guard) = &logging {
        tracing::debug!(log_dir = %guard.log_dir().display(), "logs written");
    }

    workbench.shutdown(SHUTDOWN_TIMEOUT);
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/cli_startup_paths.rs"]
mod tests;
