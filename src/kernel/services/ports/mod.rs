//! Service ports: traits + data contracts.

pub mod config;
pub mod surface;

pub use config::WorkspaceConfig;
pub use surface::{CommandSurface, InstallOutcome, SurfaceFuture};
