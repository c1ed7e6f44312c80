//! tabtree - in-memory state core of a code workspace
//!
//! Modules:
//! - models: data model (FileTree, NodeData)
//! - kernel: state, actions and effects (Store, TabSet, DragController, ContentSyncBridge)
//! - app: application layer (Workbench)

pub mod app;
pub mod kernel;
pub mod models;
