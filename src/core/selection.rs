//! The set of checked nodes and the operations that keep it consistent.

use std::collections::HashSet;

use super::{NodeId, NodeTree};

/// Checked node identities for one `NodeTree`.
///
/// Ignored nodes (including error leaves) can never be checked. Setting the
/// state of a directory forces the same state on every descendant that is not
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    checked: HashSet<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.checked.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.checked.iter()
    }

    /// Flips the state of a non-ignored node and propagates it downwards.
    /// Returns the new state, or `None` if the node is ignored or unknown.
    pub fn toggle(&mut self, tree: &NodeTree, id: NodeId) -> Option<bool> {
        let node = tree.get(id)?;
        if node.ignored || node.parent.is_none() {
            return None;
        }
        let checked = !self.is_checked(id);
        self.set_checked(tree, id, checked);
        Some(checked)
    }

    /// Sets the state of `id` and of its non-ignored descendants.
    pub fn set_checked(&mut self, tree: &NodeTree, id: NodeId, checked: bool) {
        let Some(node) = tree.get(id) else {
            return;
        };
        // The implicit root is not selectable; only what lies beneath it is.
        if node.ignored || node.parent.is_none() {
            return;
        }
        self.apply(id, checked);
        if node.is_directory() {
            self.propagate(tree, id, checked);
        }
    }

    pub fn check_all(&mut self, tree: &NodeTree) {
        for &id in tree.top_level() {
            self.set_checked(tree, id, true);
        }
    }

    pub fn uncheck_all(&mut self, tree: &NodeTree) {
        for &id in tree.top_level() {
            self.set_checked(tree, id, false);
        }
    }

    /// Drops every checked id. Used when the tree is replaced.
    pub fn clear(&mut self) {
        self.checked.clear();
    }

    /// Checked nodes that are files, in tree order.
    pub fn checked_files(&self, tree: &NodeTree) -> Vec<NodeId> {
        tree.iter()
            .filter(|n| n.is_file() && self.is_checked(n.id))
            .map(|n| n.id)
            .collect()
    }

    fn propagate(&mut self, tree: &NodeTree, parent: NodeId, checked: bool) {
        for &child in tree.children(parent) {
            let Some(node) = tree.get(child) else {
                continue;
            };
            // Ignored children are skipped along with their (empty) subtree.
            if node.ignored {
                continue;
            }
            self.apply(child, checked);
            if node.is_directory() {
                self.propagate(tree, child, checked);
            }
        }
    }

    fn apply(&mut self, id: NodeId, checked: bool) {
        if checked {
            self.checked.insert(id);
        } else {
            self.checked.remove(&id);
        }
    }
}
