//! Async runtime adapter: executes command-surface effects and sends messages back.

mod message;
mod runtime;
mod scheduled;

pub use message::AppMessage;
pub use runtime::{AsyncRuntime, BoxFuture, SurfaceDispatcher};
pub use scheduled::ScheduledTask;
