//! Defines the state owned by the foreground thread.

use crate::config::{settings, AppConfig};
use crate::core::content::CachedContentReader;
use crate::core::renderer::render;
use crate::core::{ContentCache, NodeTree, Selection};
use std::path::PathBuf;

/// Holds the complete, mutable state of the application.
///
/// Only the foreground loop touches this struct. The background walk builds a
/// fresh `NodeTree` and hands it over through an event; it never sees the state.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// Where the configuration is persisted; `None` means the per-user default.
    pub config_path: Option<PathBuf>,
    /// The absolute path of the directory the user is looking at.
    pub current_dir: PathBuf,
    /// The result of the last completed walk.
    pub tree: Option<NodeTree>,
    /// Checked nodes of `tree`.
    pub selection: Selection,
    /// File contents for rendering and previews, memoized per `(path, cap)`.
    pub content: CachedContentReader,
    /// `true` while a walk is in flight. At most one walk runs at a time.
    pub is_walking: bool,
    /// A one-line description of what happened last.
    pub status: String,
}

impl AppState {
    pub fn new(config: AppConfig, config_path: Option<PathBuf>, current_dir: PathBuf) -> Self {
        Self {
            config,
            config_path,
            current_dir,
            tree: None,
            selection: Selection::new(),
            content: CachedContentReader::new(ContentCache::default()),
            is_walking: false,
            status: "Ready".to_string(),
        }
    }

    /// Replaces the tree. The selection never survives a refresh, and the
    /// content cache is dropped so the new tree sees current file contents.
    pub fn install_tree(&mut self, tree: NodeTree) {
        self.selection.clear();
        self.content.cache_mut().clear();
        self.tree = Some(tree);
    }

    /// Drops the tree and everything derived from it.
    pub fn reset_tree_state(&mut self) {
        self.tree = None;
        self.selection.clear();
        self.content.cache_mut().clear();
    }

    /// Persists the configuration, logging instead of failing.
    pub fn save_config(&self) {
        if let Err(e) = settings::save_config(&self.config, self.config_path.as_deref()) {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Renders the current tree and selection, or `None` when nothing is loaded.
    pub fn render_output(&mut self) -> Option<String> {
        let tree = self.tree.as_ref()?;
        Some(render(
            tree,
            &self.selection,
            &mut self.content,
            self.config.max_lines,
        ))
    }
}
