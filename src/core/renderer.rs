//! Generates the annotated text tree that is handed to the clipboard.

use super::content::ContentReader;
use super::selection::Selection;
use super::{Node, NodeId, NodeKind, NodeTree};

pub const HEADER_PREFIX: &str = "ContentTree: ";
pub const CONTENT_SKIPPED: &str = "<-- Content skipped -->";
pub const EMPTY_DIRECTORY: &str = "(empty directory)";
pub const SEPARATOR_WIDTH: usize = 40;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const GUIDE: &str = "│   ";
const INDENT: &str = "    ";

/// Placeholder emitted for a directory that was ignored during the walk.
pub fn skipped_directory(name: &str) -> String {
    format!("<-- {name} (skipped) -->")
}

/// Renders a `NodeTree` plus a `Selection` into text.
///
/// Checked files have their content embedded through the `ContentReader`;
/// everything else collapses to a placeholder line.
pub struct TreeRenderer<'a> {
    tree: &'a NodeTree,
    selection: &'a Selection,
    reader: &'a mut dyn ContentReader,
    max_lines: usize,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(
        tree: &'a NodeTree,
        selection: &'a Selection,
        reader: &'a mut dyn ContentReader,
        max_lines: usize,
    ) -> Self {
        Self {
            tree,
            selection,
            reader,
            max_lines,
        }
    }

    /// Produces the full output, starting with the header line.
    pub fn render(&mut self) -> String {
        let mut result = String::new();
        result.push_str(HEADER_PREFIX);
        result.push_str(&self.tree.root_path().display().to_string());
        result.push('\n');

        let tree = self.tree;
        let top_level = tree.top_level();
        for (i, &id) in top_level.iter().enumerate() {
            let is_last = i == top_level.len() - 1;
            self.render_node(&mut result, id, "", is_last);
        }

        result
    }

    fn render_node(&mut self, result: &mut String, id: NodeId, prefix: &str, is_last: bool) {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return;
        };

        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        let child_prefix = format!("{prefix}{}", if is_last { INDENT } else { GUIDE });

        result.push_str(&format!("{prefix}{connector}{}\n", node.name));

        match &node.kind {
            NodeKind::File => self.render_file(result, node, &child_prefix),
            NodeKind::Directory if node.ignored => {
                result.push_str(&format!("{child_prefix}{}\n", skipped_directory(&node.name)));
            }
            NodeKind::Directory => {
                let children = &node.children;
                if children.is_empty() {
                    result.push_str(&format!("{child_prefix}{EMPTY_DIRECTORY}\n"));
                    return;
                }
                for (i, &child_id) in children.iter().enumerate() {
                    let child_is_last = i == children.len() - 1;
                    let Some(child) = tree.get(child_id) else {
                        continue;
                    };
                    if child.is_directory() || child.is_error() || self.selection.is_checked(child_id)
                    {
                        self.render_node(result, child_id, &child_prefix, child_is_last);
                    } else {
                        // Unchecked files collapse to their name plus a placeholder.
                        let connector = if child_is_last { LAST_BRANCH } else { BRANCH };
                        let content_prefix = format!(
                            "{child_prefix}{}",
                            if child_is_last { INDENT } else { GUIDE }
                        );
                        result.push_str(&format!("{child_prefix}{connector}{}\n", child.name));
                        result.push_str(&format!("{content_prefix}{CONTENT_SKIPPED}\n"));
                    }
                }
            }
            // Error leaves are a single line.
            NodeKind::Error(_) => {}
        }
    }

    fn render_file(&mut self, result: &mut String, node: &Node, child_prefix: &str) {
        if node.ignored || !self.selection.is_checked(node.id) {
            result.push_str(&format!("{child_prefix}{CONTENT_SKIPPED}\n"));
            return;
        }

        let content = self.reader.read(&node.path, self.max_lines);
        for line in content.split('\n') {
            result.push_str(child_prefix);
            result.push_str(line);
            result.push('\n');
        }
        result.push_str(child_prefix);
        result.push_str(&"-".repeat(SEPARATOR_WIDTH));
        result.push('\n');
    }
}

/// Renders with a fresh renderer; see [`TreeRenderer`].
pub fn render(
    tree: &NodeTree,
    selection: &Selection,
    reader: &mut dyn ContentReader,
    max_lines: usize,
) -> String {
    TreeRenderer::new(tree, selection, reader, max_lines).render()
}
