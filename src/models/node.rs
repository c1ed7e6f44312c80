//! Wire shape of workspace nodes exchanged with the command surface.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    pub fn is_folder(self) -> bool {
        matches!(self, Self::Folder)
    }
}

/// One node of a loaded workspace, recursively owning its children.
///
/// `content` is only meaningful for files, `children`/`is_open` only for folders.
/// A `Vec<NodeData>` is the full persisted form of a workspace tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeData>>,
    #[serde(default, rename = "isOpen", skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    #[serde(default, rename = "folder_name", alias = "originLabel")]
    pub origin_label: String,
}

impl NodeData {
    pub fn file(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::File,
            content: Some(content.into()),
            children: None,
            is_open: None,
            origin_label: String::new(),
        }
    }

    pub fn folder(id: impl Into<String>, name: impl Into<String>, children: Vec<NodeData>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Folder,
            content: None,
            children: Some(children),
            is_open: Some(false),
            origin_label: String::new(),
        }
    }

    pub fn with_origin(mut self, label: impl Into<String>) -> Self {
        self.origin_label = label.into();
        self
    }
}
