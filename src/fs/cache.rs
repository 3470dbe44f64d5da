//! Lazy directory listings stored on the tree itself.
//!
//! A node's `children` field is the cache state: unset means "never
//! listed", set means "listing cached". Failed listings leave it unset so
//! the next request retries. Re-listing after an invalidate matches entries
//! to the old nodes by host path, so ids survive a refresh and the arena
//! only grows for names it has not seen before.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::fs::gateway::FileSystemGateway;
use crate::fs::tree::{FileTree, Node, NodeId, NodeKind};

impl FileTree {
    /// Children of `id`, listing through the gateway on a cache miss.
    pub fn get_children<G>(&mut self, id: NodeId, gateway: &G) -> Result<Vec<NodeId>>
    where
        G: FileSystemGateway + ?Sized,
    {
        if let Some(children) = self.cached_children(id) {
            return Ok(children.to_vec());
        }

        let path = self.node(id).path.clone();
        tracing::debug!(path = %path.display(), "listing directory");
        let entries = match gateway.list_children(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "listing failed");
                return Err(e);
            }
        };

        // Entries that survived since the last listing keep their ids.
        let mut previous: HashMap<PathBuf, NodeId> = self
            .superseded
            .remove(&id)
            .unwrap_or_default()
            .into_iter()
            .map(|c| (self.node(c).path.clone(), c))
            .collect();

        let mut ids = Vec::with_capacity(entries.len());
        self.node_mut(id).children = Some(Vec::new());
        for entry in entries {
            let fresh = self.node_from_entry(id, entry);
            let child = match previous.remove(&fresh.path) {
                Some(old) if self.node(old).kind == fresh.kind => {
                    self.reattach_child(id, old, fresh);
                    old
                }
                _ => self.attach_child(id, fresh),
            };
            ids.push(child);
        }
        tracing::debug!(
            path = %path.display(),
            listed = ids.len(),
            dropped = previous.len(),
            "listing cached"
        );
        Ok(ids)
    }

    /// Put a previously listed node back under `parent` with the metadata
    /// of a fresh listing. Its own cached listing is kept.
    fn reattach_child(&mut self, parent: NodeId, old: NodeId, fresh: Node) {
        let node = self.node_mut(old);
        node.name = fresh.name;
        node.size = fresh.size;
        node.modified_at = fresh.modified_at;
        self.node_mut(parent)
            .children
            .get_or_insert_with(Vec::new)
            .push(old);
    }

    /// Drop the cached listing of `id` so the next request re-lists it.
    ///
    /// Descendants are not touched. The computer root is never invalidated:
    /// its drives are fixed for the session.
    pub fn invalidate(&mut self, id: NodeId) {
        if self.node(id).kind == NodeKind::Computer {
            return;
        }
        if let Some(children) = self.node_mut(id).children.take() {
            self.superseded.insert(id, children);
        }
    }

    /// Children of `id` in display order (the listing must be cached).
    ///
    /// Drives sort as peers by name. Inside a directory, folders come
    /// before files and each group sorts by name, case-sensitively.
    pub fn display_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.cached_children(id).map(<[_]>::to_vec).unwrap_or_default();
        if self.node(id).kind == NodeKind::Computer {
            children.sort_by(|&a, &b| self.node(a).name.cmp(&self.node(b).name));
        } else {
            children.sort_by(|&a, &b| self.compare_entries(a, b));
        }
        children
    }

    fn compare_entries(&self, a: NodeId, b: NodeId) -> Ordering {
        let (a, b) = (self.node(a), self.node(b));
        let a_is_file = a.kind == NodeKind::File;
        let b_is_file = b.kind == NodeKind::File;
        a_is_file.cmp(&b_is_file).then_with(|| a.name.cmp(&b.name))
    }
}
