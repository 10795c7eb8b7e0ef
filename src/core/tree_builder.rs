//! Builds a `NodeTree` by walking a directory with `walkdir`.

use std::cmp::Ordering;
use std::io::ErrorKind;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use super::error::CoreError;
use super::ignore::IgnoreMatcher;
use super::{NodeId, NodeKind, NodeTree};

/// Directory name that is always ignored, whatever the patterns say.
pub const NODE_MODULES: &str = "node_modules";

pub struct TreeBuilder {
    matcher: IgnoreMatcher,
}

impl TreeBuilder {
    pub fn new(matcher: IgnoreMatcher) -> Self {
        Self { matcher }
    }

    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(IgnoreMatcher::new(patterns))
    }

    /// Walks `root_path` and returns the complete tree.
    ///
    /// Failures never abort the walk: an unlistable directory gets a single
    /// `NodeKind::Error` child, a symlink loop becomes an error leaf in place of
    /// the link, and siblings are still visited.
    pub fn build(&self, root_path: &Path) -> NodeTree {
        tracing::info!("Walking directory tree at {}", root_path.display());
        let mut tree = NodeTree::new(root_path);
        let root = tree.root().id;

        if !root_path.is_dir() {
            let err = CoreError::NotADirectory(root_path.to_path_buf());
            tracing::warn!("{}", err);
            Self::push_error(&mut tree, root, root_path, &err);
            return tree;
        }

        let mut walker = WalkDir::new(root_path)
            .follow_links(true)
            .sort_by(compare_entries)
            .into_iter();

        while let Some(result) = walker.next() {
            match result {
                Ok(entry) if entry.depth() == 0 => {}
                Ok(entry) => {
                    if self.push_entry(&mut tree, &entry) {
                        walker.skip_current_dir();
                    }
                }
                Err(err) => self.push_walk_error(&mut tree, err),
            }
        }

        tracing::info!(
            "Walk of {} finished with {} nodes",
            root_path.display(),
            tree.len()
        );
        tree
    }

    /// Adds `entry` under its parent. Returns `true` for a directory that must
    /// not be descended into.
    fn push_entry(&self, tree: &mut NodeTree, entry: &DirEntry) -> bool {
        let path = entry.path();
        let is_dir = entry.file_type().is_dir();
        let Some(parent) = path.parent().and_then(|p| tree.find_by_path(p)) else {
            tracing::warn!("No parent node for {}, skipping", path.display());
            return is_dir;
        };

        let name = entry.file_name().to_string_lossy().to_string();
        if is_dir {
            let ignored = name == NODE_MODULES || self.matcher.is_match(path);
            tree.push_child(parent, path.to_path_buf(), name, NodeKind::Directory, ignored);
            ignored
        } else {
            let ignored = self.matcher.is_match(path);
            tree.push_child(parent, path.to_path_buf(), name, NodeKind::File, ignored);
            false
        }
    }

    fn push_walk_error(&self, tree: &mut NodeTree, err: walkdir::Error) {
        let Some(path) = err.path().map(Path::to_path_buf) else {
            tracing::warn!("Skipping unreadable directory entry: {}", err);
            return;
        };

        // A directory that could not be opened carries its own error leaf.
        let owner = tree
            .find_by_path(&path)
            .filter(|id| tree.get(*id).is_some_and(|n| n.is_directory()));
        let Some(parent) = owner.or_else(|| path.parent().and_then(|p| tree.find_by_path(p)))
        else {
            tracing::warn!("No parent node for {}: {}", path.display(), err);
            return;
        };

        // Dangling symlink.
        let not_found = err.io_error().is_some_and(|e| e.kind() == ErrorKind::NotFound);
        if owner.is_none() && err.loop_ancestor().is_none() && not_found {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let ignored = self.matcher.is_match(&path);
            tree.push_child(parent, path, name, NodeKind::File, ignored);
            return;
        }

        let err = CoreError::from(err);
        tracing::warn!("{}", err);
        Self::push_error(tree, parent, &path, &err);
    }

    fn push_error(tree: &mut NodeTree, parent: NodeId, path: &Path, err: &CoreError) {
        tree.push_child(
            parent,
            path.to_path_buf(),
            format!("Error: {err}"),
            NodeKind::Error(err.to_string()),
            true,
        );
    }
}

/// Directories first, then files, each by lowercase name.
fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    is_directory(b)
        .cmp(&is_directory(a))
        .then_with(|| lowercase_name(a).cmp(&lowercase_name(b)))
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Sorting happens before links are followed, so symlinks are resolved here.
fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

fn lowercase_name(entry: &DirEntry) -> String {
    entry.file_name().to_string_lossy().to_lowercase()
}

/// Convenience for callers that hold a path and a pattern list.
pub fn build_tree(root_path: &Path, patterns: &[String]) -> NodeTree {
    TreeBuilder::from_patterns(patterns).build(root_path)
}
