//! Workspace tree store.
//!
//! Nodes live in a slot arena with explicit parent links and ordered child lists.
//! External ids are opaque strings indexed into the arena, so lookups, ancestor
//! walks and moves are O(depth) instead of a traversal of the whole tree.

use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::path::{Path, PathBuf};

use super::node::{NodeData, NodeKind};

new_key_type! { pub struct NodeId; }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeError {
    NotFound(String),
    ParentNotFolder(String),
    TargetNotFolder(String),
    NotAFile(String),
    MoveOntoSelf(String),
    MoveIntoDescendant { source: String, target: String },
    DuplicateId(String),
    ShapeMismatch(String),
}

impl FileTreeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::ParentNotFolder(_))
    }
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::NotFound(id) => write!(f, "node {id} does not exist"),
            FileTreeError::ParentNotFolder(id) => write!(f, "parent {id} is not an existing folder"),
            FileTreeError::TargetNotFolder(id) => write!(f, "drop target {id} is not a folder"),
            FileTreeError::NotAFile(id) => write!(f, "node {id} is not a file"),
            FileTreeError::MoveOntoSelf(id) => write!(f, "cannot move node {id} onto itself"),
            FileTreeError::MoveIntoDescendant { source, target } => {
                write!(f, "cannot move {source} into its own descendant {target}")
            }
            FileTreeError::DuplicateId(id) => write!(f, "duplicate node id {id}"),
            FileTreeError::ShapeMismatch(id) => {
                write!(f, "node {id} has fields that do not match its kind")
            }
        }
    }
}

impl std::error::Error for FileTreeError {}

#[derive(Debug, Clone)]
enum NodeBody {
    File { content: String },
    Folder { children: Vec<NodeId>, is_open: bool },
}

#[derive(Debug, Clone)]
struct Node {
    key: String,
    name: CompactString,
    origin: CompactString,
    parent: Option<NodeId>,
    body: NodeBody,
}

impl Node {
    fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File { .. } => NodeKind::File,
            NodeBody::Folder { .. } => NodeKind::Folder,
        }
    }

    fn children(&self) -> &[NodeId] {
        match &self.body {
            NodeBody::Folder { children, .. } => children,
            NodeBody::File { .. } => &[],
        }
    }
}

/// Borrowed view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a FileTree,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a str {
        &self.node.key
    }

    pub fn name(&self) -> &'a str {
        &self.node.name
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn is_folder(&self) -> bool {
        self.kind().is_folder()
    }

    pub fn content(&self) -> Option<&'a str> {
        match &self.node.body {
            NodeBody::File { content } => Some(content),
            NodeBody::Folder { .. } => None,
        }
    }

    pub fn is_open(&self) -> Option<bool> {
        match self.node.body {
            NodeBody::Folder { is_open, .. } => Some(is_open),
            NodeBody::File { .. } => None,
        }
    }

    pub fn origin_label(&self) -> &'a str {
        &self.node.origin
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|id| self.tree.node_ref(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node
            .children()
            .iter()
            .filter_map(move |&id| tree.node_ref(id))
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

/// Result of [`FileTree::find`]: the node and its ancestors, outermost first.
#[derive(Debug)]
pub struct Lookup<'a> {
    pub node: NodeRef<'a>,
    pub ancestors: Vec<NodeRef<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeRow {
    pub id: String,
    pub depth: u16,
    pub name: String,
    pub kind: NodeKind,
    pub is_open: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FileTree {
    arena: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    by_key: FxHashMap<String, NodeId>,
    root_path: PathBuf,
    label: CompactString,
    next_id: u64,
    structure_rev: u64,
}

/// One folder whose children are still being exported.
struct ExportFrame {
    slot: NodeId,
    next: usize,
    children: Vec<NodeData>,
}

impl FileTree {
    pub fn new(root_path: PathBuf, label: impl Into<CompactString>) -> Self {
        Self {
            root_path,
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn from_nodes(
        root_path: PathBuf,
        label: impl Into<CompactString>,
        nodes: Vec<NodeData>,
    ) -> Result<Self, FileTreeError> {
        let mut tree = Self::new(root_path, label);
        tree.insert_all(nodes)?;
        Ok(tree)
    }

    /// Replaces the whole tree. The replacement is validated before it is
    /// swapped in, so on error the current tree is left untouched.
    pub fn load(
        &mut self,
        root_path: PathBuf,
        label: impl Into<CompactString>,
        nodes: Vec<NodeData>,
    ) -> Result<(), FileTreeError> {
        let mut next = Self::from_nodes(root_path, label, nodes)?;
        next.next_id = next.next_id.max(self.next_id);
        next.structure_rev = self.structure_rev.wrapping_add(1);
        *self = next;
        Ok(())
    }

    /// Drops every node but keeps root path, label and the id counter.
    pub fn clear(&mut self, root_path: PathBuf, label: impl Into<CompactString>) {
        let next_id = self.next_id;
        let structure_rev = self.structure_rev.wrapping_add(1);
        *self = Self::new(root_path, label);
        self.next_id = next_id;
        self.structure_rev = structure_rev;
    }

    /// Bumped by every change except content edits.
    pub fn structure_rev(&self) -> u64 {
        self.structure_rev
    }

    fn touch(&mut self) {
        self.structure_rev = self.structure_rev.wrapping_add(1);
    }

    /// Inserts nested wire nodes depth-first with an explicit stack, so the
    /// depth of a loaded tree is not bounded by the thread stack.
    fn insert_all(&mut self, nodes: Vec<NodeData>) -> Result<(), FileTreeError> {
        let mut stack: Vec<(Option<NodeId>, NodeData)> =
            nodes.into_iter().rev().map(|data| (None, data)).collect();

        while let Some((parent, data)) = stack.pop() {
            if self.by_key.contains_key(&data.id) {
                return Err(FileTreeError::DuplicateId(data.id));
            }

            let (body, children) = match data.kind {
                NodeKind::File => {
                    if data.children.is_some() || data.is_open.is_some() {
                        return Err(FileTreeError::ShapeMismatch(data.id));
                    }
                    (
                        NodeBody::File {
                            content: data.content.unwrap_or_default(),
                        },
                        Vec::new(),
                    )
                }
                NodeKind::Folder => {
                    if data.content.is_some() {
                        return Err(FileTreeError::ShapeMismatch(data.id));
                    }
                    (
                        NodeBody::Folder {
                            children: Vec::new(),
                            is_open: data.is_open.unwrap_or(false),
                        },
                        data.children.unwrap_or_default(),
                    )
                }
            };

            let origin = if data.origin_label.is_empty() {
                self.label.clone()
            } else {
                CompactString::from(data.origin_label)
            };

            let id = self.arena.insert(Node {
                key: data.id.clone(),
                name: CompactString::from(data.name),
                origin,
                parent,
                body,
            });
            self.by_key.insert(data.id, id);
            self.attach(parent, id);

            stack.extend(children.into_iter().rev().map(|child| (Some(id), child)));
        }
        Ok(())
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_key.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<NodeRef<'_>> {
        self.by_key.get(id).and_then(|&slot| self.node_ref(slot))
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.roots.iter().filter_map(|&slot| self.node_ref(slot))
    }

    fn node_ref(&self, slot: NodeId) -> Option<NodeRef<'_>> {
        self.arena
            .get(slot)
            .map(|node| NodeRef { tree: self, node })
    }

    fn slot(&self, id: &str) -> Result<NodeId, FileTreeError> {
        self.by_key
            .get(id)
            .copied()
            .ok_or_else(|| FileTreeError::NotFound(id.to_string()))
    }

    pub fn find(&self, id: &str) -> Option<Lookup<'_>> {
        let slot = *self.by_key.get(id)?;
        let node = self.node_ref(slot)?;
        let mut ancestors = Vec::new();
        let mut current = node.node.parent;
        while let Some(parent) = current {
            let Some(parent_ref) = self.node_ref(parent) else {
                break;
            };
            current = parent_ref.node.parent;
            ancestors.push(parent_ref);
        }
        ancestors.reverse();
        Some(Lookup { node, ancestors })
    }

    fn is_ancestor(&self, ancestor: NodeId, mut descendant: NodeId) -> bool {
        while let Some(node) = self.arena.get(descendant) {
            match node.parent {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => descendant = parent,
                None => break,
            }
        }
        false
    }

    /// Flips the expansion flag of a folder. Returns `false` for files.
    pub fn toggle_folder(&mut self, id: &str) -> Result<bool, FileTreeError> {
        let slot = self.slot(id)?;
        match self.arena.get_mut(slot).map(|n| &mut n.body) {
            Some(NodeBody::Folder { is_open, .. }) => {
                *is_open = !*is_open;
                self.touch();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn set_open(&mut self, id: &str, open: bool) -> Result<bool, FileTreeError> {
        let slot = self.slot(id)?;
        match self.arena.get_mut(slot).map(|n| &mut n.body) {
            Some(NodeBody::Folder { is_open, .. }) => {
                let changed = *is_open != open;
                *is_open = open;
                if changed {
                    self.touch();
                }
                Ok(changed)
            }
            _ => Ok(false),
        }
    }

    /// Appends a new node as the last child of `parent` (or of the root list)
    /// and returns its generated id. Creating inside a folder expands it.
    pub fn create_node(
        &mut self,
        parent: Option<&str>,
        kind: NodeKind,
        name: &str,
    ) -> Result<String, FileTreeError> {
        let parent_slot = match parent {
            Some(parent_id) => {
                let slot = self
                    .by_key
                    .get(parent_id)
                    .copied()
                    .filter(|&slot| self.arena.get(slot).is_some_and(|n| n.kind().is_folder()))
                    .ok_or_else(|| FileTreeError::ParentNotFolder(parent_id.to_string()))?;
                Some(slot)
            }
            None => None,
        };

        let origin = parent_slot
            .and_then(|slot| self.arena.get(slot))
            .map(|n| n.origin.clone())
            .unwrap_or_else(|| self.label.clone());
        let body = match kind {
            NodeKind::File => NodeBody::File {
                content: String::new(),
            },
            NodeKind::Folder => NodeBody::Folder {
                children: Vec::new(),
                is_open: false,
            },
        };

        let key = self.alloc_key();
        let slot = self.arena.insert(Node {
            key: key.clone(),
            name: CompactString::from(name),
            origin,
            parent: parent_slot,
            body,
        });
        self.by_key.insert(key.clone(), slot);
        self.attach(parent_slot, slot);

        if let Some(NodeBody::Folder { is_open, .. }) =
            parent_slot.and_then(|p| self.arena.get_mut(p)).map(|n| &mut n.body)
        {
            *is_open = true;
        }
        self.touch();

        Ok(key)
    }

    fn alloc_key(&mut self) -> String {
        loop {
            self.next_id = self.next_id.saturating_add(1);
            let key = format!("node-{}", self.next_id);
            if !self.by_key.contains_key(&key) {
                return key;
            }
        }
    }

    fn attach(&mut self, parent: Option<NodeId>, slot: NodeId) {
        match parent {
            Some(parent) => {
                if let Some(NodeBody::Folder { children, .. }) =
                    self.arena.get_mut(parent).map(|n| &mut n.body)
                {
                    children.push(slot);
                }
            }
            None => self.roots.push(slot),
        }
    }

    fn detach(&mut self, slot: NodeId) {
        let parent = self.arena.get(slot).and_then(|n| n.parent);
        match parent {
            Some(parent) => {
                if let Some(NodeBody::Folder { children, .. }) =
                    self.arena.get_mut(parent).map(|n| &mut n.body)
                {
                    children.retain(|&c| c != slot);
                }
            }
            None => self.roots.retain(|&r| r != slot),
        }
    }

    /// Removes the node with its whole subtree and returns the removed ids,
    /// outermost first. Unknown ids are a no-op.
    pub fn delete_node(&mut self, id: &str) -> Vec<String> {
        let Some(&slot) = self.by_key.get(id) else {
            return Vec::new();
        };

        self.detach(slot);
        self.touch();

        let mut removed = Vec::new();
        let mut stack = vec![slot];
        while let Some(current) = stack.pop() {
            let Some(node) = self.arena.remove(current) else {
                continue;
            };
            stack.extend(node.children().iter().rev().copied());
            self.by_key.remove(&node.key);
            removed.push(node.key);
        }
        removed
    }

    pub fn update_content(&mut self, id: &str, content: &str) -> Result<(), FileTreeError> {
        let slot = self.slot(id)?;
        match self.arena.get_mut(slot).map(|n| &mut n.body) {
            Some(NodeBody::File { content: current }) => {
                current.clear();
                current.push_str(content);
                Ok(())
            }
            _ => Err(FileTreeError::NotAFile(id.to_string())),
        }
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), FileTreeError> {
        let slot = self.slot(id)?;
        if let Some(node) = self.arena.get_mut(slot) {
            node.name = CompactString::from(name);
        }
        self.touch();
        Ok(())
    }

    /// Checks whether `source` may be reparented under `target` without
    /// touching the tree.
    pub fn validate_move(&self, source: &str, target: &str) -> Result<(), FileTreeError> {
        let source_slot = self.slot(source)?;
        let target_slot = self.slot(target)?;
        if !self
            .arena
            .get(target_slot)
            .is_some_and(|n| n.kind().is_folder())
        {
            return Err(FileTreeError::TargetNotFolder(target.to_string()));
        }
        if source_slot == target_slot {
            return Err(FileTreeError::MoveOntoSelf(source.to_string()));
        }
        if self.is_ancestor(source_slot, target_slot) {
            return Err(FileTreeError::MoveIntoDescendant {
                source: source.to_string(),
                target: target.to_string(),
            });
        }
        Ok(())
    }

    /// Detaches `source` and appends it as the last child of folder `target`,
    /// expanding the target.
    pub fn move_node(&mut self, source: &str, target: &str) -> Result<(), FileTreeError> {
        self.validate_move(source, target)?;
        let source_slot = self.slot(source)?;
        let target_slot = self.slot(target)?;

        self.detach(source_slot);
        if let Some(node) = self.arena.get_mut(source_slot) {
            node.parent = Some(target_slot);
        }
        if let Some(NodeBody::Folder { children, is_open }) =
            self.arena.get_mut(target_slot).map(|n| &mut n.body)
        {
            children.push(source_slot);
            *is_open = true;
        }
        self.touch();
        Ok(())
    }

    /// Write target of a node: the workspace root joined with the names on
    /// its ancestor chain.
    pub fn target_path(&self, id: &str) -> Option<PathBuf> {
        let lookup = self.find(id)?;
        let mut path = self.root_path.clone();
        for ancestor in &lookup.ancestors {
            path.push(ancestor.name());
        }
        path.push(lookup.node.name());
        Some(path)
    }

    /// Visible rows in display order; children of closed folders are skipped.
    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = self.roots.iter().rev().map(|&r| (r, 0)).collect();

        while let Some((slot, depth)) = stack.pop() {
            let Some(node) = self.arena.get(slot) else {
                continue;
            };
            let is_open = matches!(node.body, NodeBody::Folder { is_open: true, .. });
            result.push(FileTreeRow {
                id: node.key.clone(),
                depth,
                name: node.name.to_string(),
                kind: node.kind(),
                is_open,
            });
            if is_open {
                for &child in node.children().iter().rev() {
                    stack.push((child, depth.saturating_add(1)));
                }
            }
        }

        result
    }

    pub fn to_nodes(&self) -> Vec<NodeData> {
        self.roots
            .iter()
            .filter_map(|&root| self.export(root, true))
            .collect()
    }

    /// Like [`FileTree::to_nodes`] but without file contents.
    pub fn to_outline(&self) -> Vec<NodeData> {
        self.roots
            .iter()
            .filter_map(|&root| self.export(root, false))
            .collect()
    }

    /// Post-order export of one subtree with an explicit stack.
    fn export(&self, root: NodeId, with_content: bool) -> Option<NodeData> {
        let mut stack = vec![ExportFrame {
            slot: root,
            next: 0,
            children: Vec::new(),
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(node) = self.arena.get(frame.slot) else {
                stack.pop();
                continue;
            };
            if let Some(&child) = node.children().get(frame.next) {
                frame.next += 1;
                stack.push(ExportFrame {
                    slot: child,
                    next: 0,
                    children: Vec::new(),
                });
                continue;
            }

            let children = std::mem::take(&mut frame.children);
            stack.pop();
            let data = node_data(node, children, with_content);
            match stack.last_mut() {
                Some(parent) => parent.children.push(data),
                None => return Some(data),
            }
        }
        None
    }

    /// Ids of every file node, in display order.
    pub fn file_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(slot) = stack.pop() {
            let Some(node) = self.arena.get(slot) else {
                continue;
            };
            if node.kind() == NodeKind::File {
                ids.push(node.key.clone());
            }
            stack.extend(node.children().iter().rev().copied());
        }
        ids
    }

    /// Structural self-check: unique ids, consistent parent links, no cycles.
    pub fn check_invariants(&self) -> Result<(), FileTreeError> {
        let mut seen = FxHashSet::default();
        let mut stack: Vec<(NodeId, Option<NodeId>)> =
            self.roots.iter().map(|&r| (r, None)).collect();
        while let Some((slot, expected_parent)) = stack.pop() {
            let node = self
                .arena
                .get(slot)
                .ok_or_else(|| FileTreeError::NotFound(format!("{slot:?}")))?;
            if !seen.insert(slot) || !seen_key_matches(&self.by_key, node, slot) {
                return Err(FileTreeError::DuplicateId(node.key.clone()));
            }
            if node.parent != expected_parent {
                return Err(FileTreeError::ShapeMismatch(node.key.clone()));
            }
            stack.extend(node.children().iter().map(|&c| (c, Some(slot))));
        }
        if seen.len() != self.arena.len() || self.by_key.len() != self.arena.len() {
            return Err(FileTreeError::ShapeMismatch("detached nodes".to_string()));
        }
        Ok(())
    }
}

fn node_data(node: &Node, children: Vec<NodeData>, with_content: bool) -> NodeData {
    let (content, children, is_open) = match &node.body {
        NodeBody::File { content } => (with_content.then(|| content.clone()), None, None),
        NodeBody::Folder { is_open, .. } => (None, Some(children), Some(*is_open)),
    };
    NodeData {
        id: node.key.clone(),
        name: node.name.to_string(),
        kind: node.kind(),
        content,
        children,
        is_open,
        origin_label: node.origin.to_string(),
    }
}

fn seen_key_matches(by_key: &FxHashMap<String, NodeId>, node: &Node, slot: NodeId) -> bool {
    by_key.get(&node.key) == Some(&slot)
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
