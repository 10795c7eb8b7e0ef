pub mod cache;
pub mod content;
pub mod error;
pub mod ignore;
pub mod renderer;
pub mod selection;
pub mod tree_builder;

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Identity of a node within a single walk.
///
/// Ids are indices into the walk's arena, so they are only meaningful for the
/// `NodeTree` that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
    /// Synthetic leaf standing in for a subtree that could not be listed.
    Error(String),
}

/// One filesystem entry discovered during a walk.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub path: PathBuf,
    pub name: String,
    pub kind: NodeKind,
    pub ignored: bool,
    pub parent: Option<NodeId>,
    /// Populated only for directories that are not ignored.
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, NodeKind::Error(_))
    }

    /// The only special-cased directory name, labelled distinctly in listings.
    pub fn is_node_modules(&self) -> bool {
        self.is_directory() && self.name == tree_builder::NODE_MODULES
    }
}

/// The complete result of one walk: an arena of nodes under an implicit root.
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
    root: NodeId,
    by_path: HashMap<PathBuf, NodeId>,
}

impl NodeTree {
    pub(crate) fn new(root_path: &Path) -> Self {
        let root = Node {
            id: NodeId(0),
            path: root_path.to_path_buf(),
            name: display_name(root_path),
            kind: NodeKind::Directory,
            ignored: false,
            parent: None,
            children: Vec::new(),
        };
        let mut by_path = HashMap::new();
        by_path.insert(root_path.to_path_buf(), NodeId(0));
        Self {
            nodes: vec![root],
            root: NodeId(0),
            by_path,
        }
    }

    /// Appends a node as the last child of `parent` and returns its id.
    pub(crate) fn push_child(
        &mut self,
        parent: NodeId,
        path: PathBuf,
        name: String,
        kind: NodeKind,
        ignored: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        if !matches!(kind, NodeKind::Error(_)) {
            self.by_path.insert(path.clone(), id);
        }
        self.nodes.push(Node {
            id,
            path,
            name,
            kind,
            ignored,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root.0]
    }

    pub fn root_path(&self) -> &Path {
        &self.root().path
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// The nodes directly under the walked directory.
    pub fn top_level(&self) -> &[NodeId] {
        &self.root().children
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Number of discovered entries; the implicit root is not counted.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// `true` when the walk found nothing under the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every node except the implicit root, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().skip(1)
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub use cache::ContentCache;
pub use content::{CachedContentReader, ContentReader};
pub use error::CoreError;
pub use ignore::IgnoreMatcher;
pub use renderer::TreeRenderer;
pub use selection::Selection;
pub use tree_builder::TreeBuilder;
