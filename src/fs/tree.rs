use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::fs::gateway::{format_size, DirEntryInfo, DriveInfo};

/// Display name and identity of the synthetic root.
pub const COMPUTER_NAME: &str = "This Computer";

/// Handle to a node in a [`FileTree`].
///
/// Ids are never reassigned to another node, so a handle held by the
/// history stays valid even after its node is dropped from its parent's
/// listing. Re-listing a directory hands the same id back to an entry
/// that is still there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Type of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Computer,
    Drive,
    Folder,
    File,
}

impl NodeKind {
    /// Whether the node can be navigated into and listed.
    pub fn is_container(self) -> bool {
        !matches!(self, NodeKind::File)
    }
}

/// A node in the in-memory filesystem tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
    pub path: PathBuf,
    /// Non-owning back reference; `None` only for the computer root.
    pub parent: Option<NodeId>,
    /// `None`: not listed yet. `Some(empty)`: listed and empty.
    pub children: Option<Vec<NodeId>>,
    /// Formatted byte count captured at listing time (files only).
    pub size: Option<String>,
    pub modified_at: Option<DateTime<Local>>,
}

impl Node {
    /// Type column text: `Folder`, `Drive`, `TXT file`, ...
    pub fn type_label(&self) -> String {
        match self.kind {
            NodeKind::Computer => "Computer".to_string(),
            NodeKind::Drive => "Drive".to_string(),
            NodeKind::Folder => "Folder".to_string(),
            NodeKind::File => match Path::new(&self.name).extension() {
                Some(ext) => format!("{} file", ext.to_string_lossy().to_uppercase()),
                None => "File".to_string(),
            },
        }
    }
}

/// Arena holding every node created during a session.
///
/// Ownership flows from the computer root down through `children`; parents
/// are plain ids, so no reference cycles exist.
#[derive(Debug)]
pub struct FileTree {
    nodes: Vec<Node>,
    root: NodeId,
    /// Listings dropped by `invalidate`, kept until the next successful
    /// re-list so surviving entries get their old ids back.
    pub(crate) superseded: HashMap<NodeId, Vec<NodeId>>,
}

impl FileTree {
    /// Build the computer root and its drives. Drives are listed eagerly
    /// and live for the whole session.
    pub fn new(drives: Vec<DriveInfo>) -> Self {
        let mut tree = Self {
            nodes: vec![Node {
                kind: NodeKind::Computer,
                name: COMPUTER_NAME.to_string(),
                path: PathBuf::from(COMPUTER_NAME),
                parent: None,
                children: Some(Vec::new()),
                size: None,
                modified_at: None,
            }],
            root: NodeId(0),
            superseded: HashMap::new(),
        };

        let root = tree.root;
        for drive in drives {
            let drive_path = drive.path.to_string_lossy().to_string();
            let name = match drive.label {
                Some(label) if !label.is_empty() => format!("{} ({})", drive_path, label),
                _ => drive_path,
            };
            tree.attach_child(
                root,
                Node {
                    kind: NodeKind::Drive,
                    name,
                    path: drive.path,
                    parent: Some(root),
                    children: None,
                    size: None,
                    modified_at: None,
                },
            );
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node. Ids only come from this tree, so lookup cannot miss.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The cached listing, or `None` if the node has not been listed.
    pub fn cached_children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.node(id).children.as_deref()
    }

    /// Number of nodes ever created, including dropped ones.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Build an unattached child node from a listing entry.
    pub(crate) fn node_from_entry(&self, parent: NodeId, entry: DirEntryInfo) -> Node {
        let path = self.node(parent).path.join(&entry.file_name);
        let (kind, size) = if entry.is_directory {
            (NodeKind::Folder, None)
        } else {
            (NodeKind::File, Some(format_size(entry.size.unwrap_or(0))))
        };
        Node {
            kind,
            name: entry.name,
            path,
            parent: Some(parent),
            children: None,
            size,
            modified_at: entry.modified_at,
        }
    }

    /// Allocate `node` and append it to `parent`'s children, initialising
    /// the listing to empty first if it was unset.
    pub fn attach_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.node_mut(parent)
            .children
            .get_or_insert_with(Vec::new)
            .push(id);
        id
    }

    /// Remove `child` from `parent`'s cached listing. Returns whether it was present.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.node_mut(parent).children.as_mut() {
            Some(children) => {
                let before = children.len();
                children.retain(|&c| c != child);
                children.len() != before
            }
            None => false,
        }
    }

    /// Whether `child` is currently listed under `parent`.
    pub fn is_child_of(&self, child: NodeId, parent: NodeId) -> bool {
        self.cached_children(parent)
            .is_some_and(|children| children.contains(&child))
    }

    /// Find a cached child by exact (case-sensitive) name.
    pub fn find_child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.cached_children(parent)?
            .iter()
            .copied()
            .find(|&c| self.node(c).name == name)
    }

    /// Find a cached child by its exact host path. Unlike names, paths keep
    /// the raw bytes of names that are not valid UTF-8.
    pub fn find_child_by_path(&self, parent: NodeId, path: &Path) -> Option<NodeId> {
        self.cached_children(parent)?
            .iter()
            .copied()
            .find(|&c| self.node(c).path == path)
    }

    /// Give `id` a new name and path in place, rebasing the paths of any
    /// cached descendants so they keep pointing at real locations.
    pub fn rename_node(
        &mut self,
        id: NodeId,
        name: String,
        path: PathBuf,
        modified_at: DateTime<Local>,
    ) {
        let old_path = std::mem::replace(&mut self.node_mut(id).path, path.clone());
        let node = self.node_mut(id);
        node.name = name;
        node.modified_at = Some(modified_at);

        let mut stack: Vec<NodeId> = self.node(id).children.clone().unwrap_or_default();
        while let Some(desc) = stack.pop() {
            let node = self.node_mut(desc);
            if let Ok(rel) = node.path.strip_prefix(&old_path) {
                node.path = path.join(rel);
            }
            if let Some(children) = &node.children {
                stack.extend(children.iter().copied());
            }
        }
    }

    /// Chain of ids from the root down to `id`, inclusive.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut cursor = self.parent(id);
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.parent(parent);
        }
        chain.reverse();
        chain
    }
}
