//! Responsible for projecting the `NodeTree` and `Selection` into display rows.
//!
//! The domain model only knows ids, ignored flags and the checked set; this
//! module decides how that looks as a checkbox list.

use serde::Serialize;
use std::path::PathBuf;

use super::state::AppState;
use crate::core::{Node, NodeId, NodeTree, Selection};

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    Unchecked,
    /// Ignored entries and error leaves; they cannot be toggled.
    Disabled,
}

/// One visible line of the checkbox tree.
#[derive(Serialize, Clone, Debug)]
pub struct TreeRow {
    /// 1-based row number used by the `toggle` and `preview` commands.
    pub row: usize,
    pub id: NodeId,
    pub depth: usize,
    pub label: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub check_state: CheckState,
}

/// A serializable snapshot of what the interface shows.
#[derive(Serialize, Clone, Debug)]
pub struct UiState {
    pub current_dir: PathBuf,
    pub rows: Vec<TreeRow>,
    pub checked_count: usize,
    pub is_walking: bool,
    pub status_message: String,
    pub max_lines: usize,
}

pub fn generate_ui_state(state: &AppState) -> UiState {
    let rows = match &state.tree {
        Some(tree) if !state.is_walking => build_rows(tree, &state.selection),
        _ => Vec::new(),
    };
    UiState {
        current_dir: state.current_dir.clone(),
        rows,
        checked_count: state.selection.len(),
        is_walking: state.is_walking,
        status_message: state.status.clone(),
        max_lines: state.config.max_lines,
    }
}

/// Flattens the tree depth-first, in stored child order.
pub fn build_rows(tree: &NodeTree, selection: &Selection) -> Vec<TreeRow> {
    let mut rows = Vec::with_capacity(tree.len());
    for &id in tree.top_level() {
        push_rows(tree, selection, id, 0, &mut rows);
    }
    rows
}

fn push_rows(
    tree: &NodeTree,
    selection: &Selection,
    id: NodeId,
    depth: usize,
    rows: &mut Vec<TreeRow>,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    rows.push(TreeRow {
        row: rows.len() + 1,
        id,
        depth,
        label: label_for(node),
        path: node.path.clone(),
        is_directory: node.is_directory(),
        check_state: check_state_for(node, selection),
    });
    for &child in &node.children {
        push_rows(tree, selection, child, depth + 1, rows);
    }
}

fn label_for(node: &Node) -> String {
    if node.is_node_modules() {
        format!("{} (skipped content)", node.name)
    } else {
        node.name.clone()
    }
}

fn check_state_for(node: &Node, selection: &Selection) -> CheckState {
    if node.ignored {
        CheckState::Disabled
    } else if selection.is_checked(node.id) {
        CheckState::Checked
    } else {
        CheckState::Unchecked
    }
}

/// Looks up the node shown on a 1-based row.
pub fn node_for_row(rows: &[TreeRow], row: usize) -> Option<NodeId> {
    row.checked_sub(1)
        .and_then(|index| rows.get(index))
        .map(|r| r.id)
}

/// Formats rows as a plain-text checkbox list.
pub fn format_rows(rows: &[TreeRow]) -> String {
    let width = rows.len().to_string().len();
    let mut out = String::new();
    for row in rows {
        let checkbox = match row.check_state {
            CheckState::Checked => "[x]",
            CheckState::Unchecked => "[ ]",
            CheckState::Disabled => "[-]",
        };
        let slash = if row.is_directory { "/" } else { "" };
        out.push_str(&format!(
            "{:>width$} {} {}{}{}\n",
            row.row,
            checkbox,
            "  ".repeat(row.depth),
            row.label,
            slash
        ));
    }
    out
}
