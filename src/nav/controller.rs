use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{AppError, Result};
use crate::fs::gateway::{is_valid_name, FileSystemGateway};
use crate::fs::tree::{FileTree, NodeId, NodeKind};
use crate::nav::history::NavigationHistory;

/// One row of the current listing, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingEntry {
    /// The synthetic `..` link to the given parent.
    ParentLink(NodeId),
    Child(NodeId),
}

impl ListingEntry {
    /// The node the row refers to.
    pub fn node(self) -> NodeId {
        match self {
            ListingEntry::ParentLink(id) | ListingEntry::Child(id) => id,
        }
    }
}

/// What the presentation layer needs after any state change.
#[derive(Debug, Clone)]
pub struct NavSnapshot {
    pub current: NodeId,
    pub entries: Vec<ListingEntry>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub can_go_up: bool,
}

/// A validated delete that is waiting for user confirmation.
///
/// Produced by [`NavigationController::prepare_delete`] and consumed by
/// [`NavigationController::delete_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub node: NodeId,
    pub name: String,
    pub path: PathBuf,
    pub kind: NodeKind,
}

/// Owns the tree, the history and the current location, and routes every
/// navigation and mutation through the gateway.
///
/// All methods take `&mut self`, so at most one operation is in flight per
/// controller. Hosts with several views create one controller per view.
pub struct NavigationController<G> {
    gateway: G,
    tree: FileTree,
    history: NavigationHistory<NodeId>,
    current: NodeId,
}

impl<G: FileSystemGateway> NavigationController<G> {
    /// Start a session at the computer root with the host's drives.
    pub fn new(gateway: G) -> Self {
        let drives = gateway.enumerate_drives();
        tracing::debug!(count = drives.len(), "enumerated drives");
        let tree = FileTree::new(drives);
        let current = tree.root();
        Self {
            gateway,
            tree,
            history: NavigationHistory::new(),
            current,
        }
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    #[cfg(test)]
    pub fn history(&self) -> &NavigationHistory<NodeId> {
        &self.history
    }

    #[cfg(test)]
    pub fn current(&self) -> NodeId {
        self.current
    }

    #[cfg(test)]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn can_go_back(&self) -> bool {
        self.history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.can_go_forward()
    }

    pub fn can_go_up(&self) -> bool {
        self.current != self.tree.root()
    }

    /// Children of `node`, listed lazily.
    pub fn get_children(&mut self, node: NodeId) -> Result<Vec<NodeId>> {
        self.tree.get_children(node, &self.gateway)
    }

    /// Like `cached_listing`, listing the node first on a cache miss.
    #[cfg(test)]
    pub fn listing(&mut self) -> Result<Vec<ListingEntry>> {
        self.get_children(self.current)?;
        Ok(self.cached_listing())
    }

    /// The current node's listing in display order, `..` first when the
    /// current node has a parent. Never touches the host: an unlisted
    /// current node yields only the `..` link.
    pub fn cached_listing(&self) -> Vec<ListingEntry> {
        let mut entries = Vec::new();
        if let Some(parent) = self.tree.parent(self.current) {
            entries.push(ListingEntry::ParentLink(parent));
        }
        entries.extend(
            self.tree
                .display_order(self.current)
                .into_iter()
                .map(ListingEntry::Child),
        );
        entries
    }

    /// Current node, cached listing and navigation flags in one value.
    pub fn snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            current: self.current,
            entries: self.cached_listing(),
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
            can_go_up: self.can_go_up(),
        }
    }

    /// Move to `target`, recording the current node in the history.
    ///
    /// The move is committed before the target is listed; a listing
    /// failure is returned but the location still changes, and the target's
    /// listing stays unset for a later retry.
    pub fn navigate_to(&mut self, target: NodeId) -> Result<()> {
        let node = self.tree.node(target);
        if !node.kind.is_container() {
            return Err(AppError::NotAllowed {
                path: node.path.clone(),
                reason: "Cannot navigate into a file",
            });
        }
        tracing::debug!(to = %node.path.display(), "navigate");
        self.history.record_visit(self.current);
        self.current = target;
        self.get_children(target).map(|_| ())
    }

    /// Returns `Ok(false)` when there is nothing behind.
    pub fn navigate_back(&mut self) -> Result<bool> {
        match self.history.go_back(self.current) {
            Some(node) => {
                self.current = node;
                tracing::debug!(to = %self.tree.node(node).path.display(), "back");
                self.get_children(node).map(|_| true)
            }
            None => Ok(false),
        }
    }

    /// Returns `Ok(false)` when there is nothing ahead.
    pub fn navigate_forward(&mut self) -> Result<bool> {
        match self.history.go_forward() {
            Some(node) => {
                self.current = node;
                tracing::debug!(to = %self.tree.node(node).path.display(), "forward");
                self.get_children(node).map(|_| true)
            }
            None => Ok(false),
        }
    }

    /// Navigate to the parent; `Ok(false)` at the computer root.
    pub fn navigate_up(&mut self) -> Result<bool> {
        match self.tree.parent(self.current) {
            Some(parent) => self.navigate_to(parent).map(|_| true),
            None => Ok(false),
        }
    }

    /// Re-list the current node. History is untouched.
    pub fn refresh(&mut self) -> Result<()> {
        tracing::debug!(path = %self.tree.node(self.current).path.display(), "refresh");
        self.tree.invalidate(self.current);
        self.get_children(self.current).map(|_| ())
    }

    /// Resolve an absolute host path to a folder node, listing lazily from
    /// the owning drive, and navigate there.
    pub fn reveal_path(&mut self, path: &Path) -> Result<NodeId> {
        let root = self.tree.root();
        let drive = self
            .tree
            .cached_children(root)
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&d| path.starts_with(&self.tree.node(d).path))
            .max_by_key(|&d| self.tree.node(d).path.components().count())
            .ok_or_else(|| AppError::NotFound {
                path: path.to_path_buf(),
            })?;

        let rel = path
            .strip_prefix(&self.tree.node(drive).path)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut cursor = drive;
        for component in rel.components() {
            let next = self.tree.node(cursor).path.join(component);
            self.get_children(cursor)?;
            cursor = match self.tree.find_child_by_path(cursor, &next) {
                Some(child) if self.tree.node(child).kind == NodeKind::Folder => child,
                _ => return Err(AppError::NotFound { path: next }),
            };
        }

        if cursor != self.current {
            self.navigate_to(cursor)?;
        }
        Ok(cursor)
    }

    /// Nodes from the root down to `node`.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.ancestors(node)
    }

    /// Create a folder named `name` in the current drive or folder and add
    /// it to the cached listing.
    pub fn create_folder(&mut self, name: &str) -> Result<NodeId> {
        let current = self.current;
        let dir = self.tree.node(current);
        if !matches!(dir.kind, NodeKind::Drive | NodeKind::Folder) {
            return Err(AppError::NotAllowed {
                path: dir.path.clone(),
                reason: "Cannot create a folder here",
            });
        }
        if !is_valid_name(name) {
            return Err(AppError::InvalidName {
                name: name.to_string(),
            });
        }
        let new_path = dir.path.join(name);

        // List first so the appended node never sits in a partial cache.
        self.get_children(current)?;

        if let Err(e) = self.gateway.create_directory(&new_path) {
            tracing::warn!(path = %new_path.display(), error = %e, "create folder failed");
            return Err(e);
        }

        let id = self.tree.attach_child(
            current,
            crate::fs::tree::Node {
                kind: NodeKind::Folder,
                name: name.to_string(),
                path: new_path.clone(),
                parent: Some(current),
                children: None,
                size: None,
                modified_at: Some(Local::now()),
            },
        );
        tracing::info!(path = %new_path.display(), "created folder");
        Ok(id)
    }

    /// First phase of a delete: check that `node` may be deleted from the
    /// current listing. Nothing is touched until [`Self::delete_item`].
    pub fn prepare_delete(&self, node: NodeId) -> Result<PendingDelete> {
        let target = self.tree.node(node);
        if !matches!(target.kind, NodeKind::Folder | NodeKind::File) {
            return Err(AppError::NotAllowed {
                path: target.path.clone(),
                reason: "Only files and folders can be deleted",
            });
        }
        if !self.tree.is_child_of(node, self.current) {
            return Err(AppError::NotAllowed {
                path: target.path.clone(),
                reason: "Item is not in the current folder",
            });
        }
        Ok(PendingDelete {
            node,
            name: target.name.clone(),
            path: target.path.clone(),
            kind: target.kind,
        })
    }

    /// Second phase of a delete, after the user confirmed. Folders must be
    /// empty. On failure the tree is left as it was.
    pub fn delete_item(&mut self, pending: PendingDelete) -> Result<()> {
        // Re-validate: the location may have changed while confirming.
        let checked = self.prepare_delete(pending.node)?;

        let outcome = match checked.kind {
            NodeKind::Folder => self.gateway.remove_directory(&checked.path),
            _ => self.gateway.remove_file(&checked.path),
        };
        if let Err(e) = outcome {
            tracing::warn!(path = %checked.path.display(), error = %e, "delete failed");
            return Err(e);
        }

        self.tree.detach_child(self.current, checked.node);
        tracing::info!(path = %checked.path.display(), "deleted");
        Ok(())
    }

    /// Rename `node` within the current folder.
    ///
    /// Returns `Ok(false)` when `new_name` is empty or unchanged. A name
    /// already present in the cached listing is rejected before the host
    /// is touched; a clash the cache did not know about comes back from the
    /// host as `AlreadyExists`.
    pub fn rename_item(&mut self, node: NodeId, new_name: &str) -> Result<bool> {
        let target = self.tree.node(node);
        if new_name.is_empty() || new_name == target.name {
            return Ok(false);
        }
        if !matches!(target.kind, NodeKind::Folder | NodeKind::File) {
            return Err(AppError::NotAllowed {
                path: target.path.clone(),
                reason: "Only files and folders can be renamed",
            });
        }
        if !self.tree.is_child_of(node, self.current) {
            return Err(AppError::NotAllowed {
                path: target.path.clone(),
                reason: "Item is not in the current folder",
            });
        }
        if !is_valid_name(new_name) {
            return Err(AppError::InvalidName {
                name: new_name.to_string(),
            });
        }
        if self.tree.find_child_by_name(self.current, new_name).is_some() {
            return Err(AppError::DuplicateName {
                name: new_name.to_string(),
                dir: self.tree.node(self.current).path.clone(),
            });
        }

        let old_path = target.path.clone();
        let new_path = match old_path.parent() {
            Some(dir) => dir.join(new_name),
            None => PathBuf::from(new_name),
        };
        if let Err(e) = self.gateway.rename(&old_path, &new_path) {
            tracing::warn!(from = %old_path.display(), to = %new_path.display(), error = %e, "rename failed");
            return Err(e);
        }

        self.tree
            .rename_node(node, new_name.to_string(), new_path.clone(), Local::now());
        tracing::info!(from = %old_path.display(), to = %new_path.display(), "renamed");
        Ok(true)
    }
}
