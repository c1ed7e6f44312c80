//! Application layer: the headless workbench driving the kernel.

pub mod workbench;

pub use workbench::Workbench;
