use super::message::AppMessage;
use crate::kernel::services::ports::CommandSurface;
use crate::kernel::terminal::RequestId;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    dispatcher: SurfaceDispatcher,
}

impl AsyncRuntime {
    pub fn new(surface: Arc<dyn CommandSurface>, tx: Sender<AppMessage>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        let dispatcher = SurfaceDispatcher::new(runtime.handle().clone(), surface, tx);
        Ok(Self {
            runtime,
            dispatcher,
        })
    }

    pub fn dispatcher(&self) -> SurfaceDispatcher {
        self.dispatcher.clone()
    }

    /// Drives `futures` to completion on the runtime. Must not be called from
    /// inside an async context.
    pub fn block_on_all(&self, futures: Vec<BoxFuture>) {
        if futures.is_empty() {
            return;
        }
        self.runtime.block_on(async move {
            for future in futures {
                future.await;
            }
        });
    }

    pub fn shutdown(self, timeout: Duration) {
        self.runtime.shutdown_timeout(timeout);
    }
}

/// Spawns command-surface calls and reports each result as an [`AppMessage`].
#[derive(Clone)]
pub struct SurfaceDispatcher {
    handle: tokio::runtime::Handle,
    surface: Arc<dyn CommandSurface>,
    tx: Sender<AppMessage>,
}

impl SurfaceDispatcher {
    pub fn new(
        handle: tokio::runtime::Handle,
        surface: Arc<dyn CommandSurface>,
        tx: Sender<AppMessage>,
    ) -> Self {
        Self {
            handle,
            surface,
            tx,
        }
    }

    pub fn handle(&self) -> tokio::runtime::Handle {
        self.handle.clone()
    }

    pub fn load_workspace(&self, token: u64, root: PathBuf) {
        let tx = self.tx.clone();
        let call = self.surface.load_workspace(root.clone());
        self.handle.spawn(async move {
            let result = call.await;
            let _ = tx.send(AppMessage::WorkspaceLoaded {
                token,
                root,
                result,
            });
        });
    }

    /// The write itself; the caller decides when to run it.
    pub fn write_file(&self, node_id: String, target: PathBuf, content: String) -> BoxFuture {
        let tx = self.tx.clone();
        let surface = Arc::clone(&self.surface);
        Box::pin(async move {
            match surface.write_file(target.clone(), content.clone()).await {
                Ok(()) => {
                    let _ = tx.send(AppMessage::FileWritten {
                        node_id,
                        target,
                        content,
                    });
                }
                Err(error) => {
                    let _ = tx.send(AppMessage::WriteFailed { node_id, error });
                }
            }
        })
    }

    pub fn create_folder(&self, path: PathBuf) {
        let tx = self.tx.clone();
        let call = self.surface.create_folder(path.clone());
        self.handle.spawn(async move {
            let msg = match call.await {
                Ok(()) => AppMessage::FolderCreated { path },
                Err(error) => AppMessage::ExternalFailure(error),
            };
            let _ = tx.send(msg);
        });
    }

    pub fn run_command(&self, request: RequestId, command: String, args: Vec<String>) {
        let tx = self.tx.clone();
        let call = self.surface.run_command(command, args);
        self.handle.spawn(async move {
            let result = call.await;
            let _ = tx.send(AppMessage::CommandFinished { request, result });
        });
    }

    pub fn install_extension(&self, project_path: PathBuf, package: String) {
        let tx = self.tx.clone();
        let call = self.surface.install_extension(project_path, package.clone());
        self.handle.spawn(async move {
            let result = call.await;
            let _ = tx.send(AppMessage::ExtensionInstalled { package, result });
        });
    }
}
