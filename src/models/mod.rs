//! Workspace data model.

pub mod file_tree;
pub mod node;

pub use file_tree::{FileTree, FileTreeError, FileTreeRow, Lookup, NodeId, NodeRef};
pub use node::{NodeData, NodeKind};
