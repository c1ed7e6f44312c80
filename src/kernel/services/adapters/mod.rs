//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod local;
pub mod memory;
pub mod paths;
pub mod runtime;
pub mod settings;

pub use local::LocalSurface;
pub use memory::{MemorySurface, SurfaceCall};
pub use paths::{ensure_log_dir, get_log_dir};
pub use runtime::{AppMessage, AsyncRuntime, BoxFuture, ScheduledTask, SurfaceDispatcher};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
