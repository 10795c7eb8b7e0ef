//! Contains the command handlers invoked by the interactive shell.
//!
//! Handlers mutate the foreground `AppState`, persist configuration where the
//! command calls for it, and return text for the shell to print. A returned
//! `JoinHandle` belongs to a walk that was started by the command.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

use super::proxy::EventProxy;
use super::state::AppState;
use super::tasks::start_walk;
use super::view_model::{build_rows, format_rows, generate_ui_state, node_for_row};
use crate::config::settings;
use crate::core::ContentReader;

/// Re-walks the current directory. A no-op while a walk is in flight.
pub fn refresh<P: EventProxy>(state: &mut AppState, proxy: P) -> Option<JoinHandle<()>> {
    let handle = start_walk(state, proxy);
    if handle.is_none() {
        state.status = "A refresh is already running".to_string();
    }
    handle
}

/// Switches to `directory`, records it as most recent, saves the config and
/// starts a walk.
pub fn open_directory<P: EventProxy>(
    state: &mut AppState,
    proxy: P,
    directory: &Path,
) -> Result<Option<JoinHandle<()>>> {
    let directory = resolve_directory(directory)?;
    if !directory.is_dir() {
        bail!("Not a directory: {}", directory.display());
    }

    state.current_dir = directory.clone();
    state.config.add_recent_directory(&directory);
    state.save_config();
    tracing::info!("Opened directory {}", directory.display());

    Ok(refresh(state, proxy))
}

/// Opens the `n`-th (1-based) entry of the recent directories list.
pub fn open_recent<P: EventProxy>(
    state: &mut AppState,
    proxy: P,
    n: usize,
) -> Result<Option<JoinHandle<()>>> {
    let directory = n
        .checked_sub(1)
        .and_then(|i| state.config.recent_directories.get(i))
        .cloned()
        .with_context(|| format!("No recent directory number {n}"))?;
    open_directory(state, proxy, Path::new(&directory))
}

pub fn list_recent(state: &AppState) -> String {
    if state.config.recent_directories.is_empty() {
        return "No recent directories.\n".to_string();
    }
    state
        .config
        .recent_directories
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{:>2} {}\n", i + 1, d))
        .collect()
}

/// Makes a path absolute against the process working directory.
pub fn resolve_directory(directory: &Path) -> Result<PathBuf> {
    std::path::absolute(directory)
        .with_context(|| format!("Could not resolve {}", directory.display()))
}

pub fn show_tree(state: &AppState) -> String {
    match &state.tree {
        Some(tree) if !tree.is_empty() => format_rows(&build_rows(tree, &state.selection)),
        Some(_) => "(empty directory)\n".to_string(),
        None if state.is_walking => "Still loading, try again shortly (or `wait`).\n".to_string(),
        None => "No directory loaded.\n".to_string(),
    }
}

/// Toggles each listed row. Ignored rows are reported and left alone.
pub fn toggle_rows(state: &mut AppState, rows: &[usize]) -> Result<String> {
    let tree = state.tree.as_ref().context("No directory loaded")?;
    let visible = build_rows(tree, &state.selection);

    let mut report = String::new();
    for &row in rows {
        let id = node_for_row(&visible, row).with_context(|| format!("No row {row}"))?;
        let name = tree.get(id).map(|n| n.name.as_str()).unwrap_or_default();
        match state.selection.toggle(tree, id) {
            Some(true) => report.push_str(&format!("checked {name}\n")),
            Some(false) => report.push_str(&format!("unchecked {name}\n")),
            None => report.push_str(&format!("{name} is ignored and cannot be checked\n")),
        }
    }
    state.status = format!("{} item(s) checked", state.selection.len());
    Ok(report)
}

pub fn check_all(state: &mut AppState) -> Result<()> {
    let tree = state.tree.as_ref().context("No directory loaded")?;
    state.selection.check_all(tree);
    state.status = format!("{} item(s) checked", state.selection.len());
    Ok(())
}

pub fn uncheck_all(state: &mut AppState) -> Result<()> {
    let tree = state.tree.as_ref().context("No directory loaded")?;
    state.selection.uncheck_all(tree);
    state.status = "Selection cleared".to_string();
    Ok(())
}

/// Renders the output text for the current tree and selection.
pub fn generate_output(state: &mut AppState) -> Result<String> {
    let output = state.render_output().context("No directory loaded")?;
    state.status = format!("Output generated ({} lines)", output.lines().count());
    Ok(output)
}

/// Renders the output text and writes it to `path`.
pub fn save_output(state: &mut AppState, path: &Path) -> Result<()> {
    let output = generate_output(state)?;
    fs::write(path, output).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Saved output to {}", path.display());
    state.status = format!("Output saved to {}", path.display());
    Ok(())
}

/// Returns the capped content of the file on `row`, served from the cache.
pub fn preview(state: &mut AppState, row: usize) -> Result<String> {
    let tree = state.tree.as_ref().context("No directory loaded")?;
    let rows = build_rows(tree, &state.selection);
    let id = node_for_row(&rows, row).with_context(|| format!("No row {row}"))?;
    let node = tree.get(id).with_context(|| format!("No row {row}"))?;
    if !node.is_file() {
        bail!("{} is not a file", node.name);
    }
    let path = node.path.clone();
    Ok(state.content.read(&path, state.config.max_lines))
}

pub fn list_patterns(state: &AppState) -> String {
    if state.config.ignored_patterns.is_empty() {
        return "No ignore patterns.\n".to_string();
    }
    state
        .config
        .ignored_patterns
        .iter()
        .map(|p| format!("{p}\n"))
        .collect()
}

/// Adds an ignore pattern, saves the config and re-walks.
pub fn add_pattern<P: EventProxy>(
    state: &mut AppState,
    proxy: P,
    pattern: &str,
) -> Result<Option<JoinHandle<()>>> {
    if !state.config.add_ignored_pattern(pattern) {
        bail!("Pattern {pattern:?} is blank or already present");
    }
    state.save_config();
    Ok(refresh(state, proxy))
}

/// Removes an ignore pattern, saves the config and re-walks.
pub fn remove_pattern<P: EventProxy>(
    state: &mut AppState,
    proxy: P,
    pattern: &str,
) -> Result<Option<JoinHandle<()>>> {
    if !state.config.remove_ignored_pattern(pattern) {
        bail!("Pattern {pattern:?} is not in the list");
    }
    state.save_config();
    Ok(refresh(state, proxy))
}

pub fn set_max_lines(state: &mut AppState, max_lines: usize) {
    state.config.max_lines = max_lines;
    state.save_config();
    state.status = if max_lines == 0 {
        "Embedded content is no longer capped".to_string()
    } else {
        format!("Embedded content is capped at {max_lines} lines")
    };
}

pub fn export_config(state: &mut AppState, path: &Path) -> Result<()> {
    settings::export_config(&state.config, path)?;
    state.status = format!("Settings exported to {}", path.display());
    Ok(())
}

/// Replaces the settings with those in `path`, saves them and re-walks.
pub fn import_config<P: EventProxy>(
    state: &mut AppState,
    proxy: P,
    path: &Path,
) -> Result<Option<JoinHandle<()>>> {
    state.config = settings::import_config(path)
        .with_context(|| format!("Failed to import settings from {}", path.display()))?;
    state.save_config();
    Ok(refresh(state, proxy))
}

/// Serializes the current view for scripting.
pub fn ui_state_json(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string_pretty(&generate_ui_state(state))?)
}

/// Final save before the process exits.
pub fn shutdown(state: &AppState) {
    tracing::info!("Shutting down. Saving final config...");
    state.save_config();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::AppEvent;
    use crate::app::tasks::handle_event;
    use crate::config::AppConfig;
    use tempfile::{tempdir, TempDir};
    use tokio::sync::mpsc;

    struct TestHarness {
        state: AppState,
        proxy: mpsc::UnboundedSender<AppEvent>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        root: PathBuf,
        config_path: PathBuf,
        _temp_dir: TempDir,
    }

    impl TestHarness {
        fn new() -> Self {
            let temp_dir = tempdir().unwrap();
            let root = temp_dir.path().join("project");
            fs::create_dir_all(root.join("src")).unwrap();
            fs::write(root.join("src/main.rs"), "fn main() {}\n").unwrap();
            fs::write(root.join("README.md"), "# Project\n").unwrap();
            let config_path = temp_dir.path().join("config/config.json");
            let (proxy, event_rx) = mpsc::unbounded_channel();
            let state = AppState::new(
                AppConfig::default(),
                Some(config_path.clone()),
                root.clone(),
            );
            Self {
                state,
                proxy,
                event_rx,
                root,
                config_path,
                _temp_dir: temp_dir,
            }
        }

        async fn finish_walk(&mut self, handle: Option<JoinHandle<()>>) {
            handle.expect("walk should have started").await.unwrap();
            let event = self.event_rx.recv().await.unwrap();
            handle_event(&mut self.state, event);
        }

        async fn loaded() -> Self {
            let mut harness = Self::new();
            let handle = refresh(&mut harness.state, harness.proxy.clone());
            harness.finish_walk(handle).await;
            harness
        }
    }

    #[tokio::test]
    async fn test_open_directory_records_recent_and_saves_config() {
        let mut harness = TestHarness::new();
        let root = harness.root.clone();

        let handle = open_directory(&mut harness.state, harness.proxy.clone(), &root).unwrap();
        harness.finish_walk(handle).await;

        let saved = settings::load_config(Some(&harness.config_path)).unwrap();
        assert_eq!(saved.recent_directories, vec![root.to_string_lossy().to_string()]);
        assert!(harness.state.tree.is_some());
    }

    #[tokio::test]
    async fn test_open_rejects_files() {
        let mut harness = TestHarness::new();
        let file = harness.root.join("README.md");
        assert!(open_directory(&mut harness.state, harness.proxy.clone(), &file).is_err());
        assert!(harness.state.config.recent_directories.is_empty());
    }

    #[tokio::test]
    async fn test_open_recent_uses_one_based_index() {
        let mut harness = TestHarness::new();
        let root = harness.root.clone();
        harness.state.config.add_recent_directory(&root);

        assert!(open_recent(&mut harness.state, harness.proxy.clone(), 0).is_err());
        assert!(open_recent(&mut harness.state, harness.proxy.clone(), 2).is_err());
        let handle = open_recent(&mut harness.state, harness.proxy.clone(), 1).unwrap();
        harness.finish_walk(handle).await;
        assert_eq!(harness.state.current_dir, root);
    }

    #[tokio::test]
    async fn test_toggle_and_generate() {
        let mut harness = TestHarness::loaded().await;
        // Rows: 1 src/, 2 main.rs, 3 README.md
        let report = toggle_rows(&mut harness.state, &[1]).unwrap();
        assert_eq!(report, "checked src\n");

        let output = generate_output(&mut harness.state).unwrap();
        assert!(output.contains("fn main() {}"));
        assert!(output.contains("└── README.md\n    <-- Content skipped -->\n"));
        assert!(toggle_rows(&mut harness.state, &[42]).is_err());
    }

    #[tokio::test]
    async fn test_check_all_then_uncheck_all_empties_selection() {
        let mut harness = TestHarness::loaded().await;
        check_all(&mut harness.state).unwrap();
        assert_eq!(harness.state.selection.len(), 3);
        uncheck_all(&mut harness.state).unwrap();
        assert!(harness.state.selection.is_empty());
    }

    #[tokio::test]
    async fn test_adding_pattern_saves_and_rewalks() {
        let mut harness = TestHarness::loaded().await;
        let handle = add_pattern(&mut harness.state, harness.proxy.clone(), "*.md").unwrap();
        assert!(harness.state.tree.is_none());
        harness.finish_walk(handle).await;

        let saved = settings::load_config(Some(&harness.config_path)).unwrap();
        assert!(saved.ignored_patterns.contains(&"*.md".to_string()));

        let tree = harness.state.tree.as_ref().unwrap();
        let readme = tree.find_by_path(&harness.root.join("README.md")).unwrap();
        assert!(tree.get(readme).unwrap().ignored);

        assert!(add_pattern(&mut harness.state, harness.proxy.clone(), "*.md").is_err());
        let handle = remove_pattern(&mut harness.state, harness.proxy.clone(), "*.md").unwrap();
        harness.finish_walk(handle).await;
        let tree = harness.state.tree.as_ref().unwrap();
        let readme = tree.find_by_path(&harness.root.join("README.md")).unwrap();
        assert!(!tree.get(readme).unwrap().ignored);
    }

    #[tokio::test]
    async fn test_preview_uses_line_cap() {
        let mut harness = TestHarness::loaded().await;
        fs::write(harness.root.join("README.md"), "1\n2\n3\n").unwrap();
        set_max_lines(&mut harness.state, 2);

        let content = preview(&mut harness.state, 3).unwrap();
        assert_eq!(content, "1\n2\n... (truncated after 2 lines)");
        assert!(preview(&mut harness.state, 1).is_err());
    }

    #[tokio::test]
    async fn test_save_output_writes_file() {
        let mut harness = TestHarness::loaded().await;
        let out = harness.root.join("out.txt");
        save_output(&mut harness.state, &out).unwrap();
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("ContentTree: "));
    }

    #[tokio::test]
    async fn test_refresh_while_walking_is_noop() {
        let mut harness = TestHarness::new();
        let first = refresh(&mut harness.state, harness.proxy.clone());
        assert!(refresh(&mut harness.state, harness.proxy.clone()).is_none());
        assert_eq!(harness.state.status, "A refresh is already running");
        harness.finish_walk(first).await;
        assert!(!harness.state.is_walking);
    }

    #[tokio::test]
    async fn test_export_then_import_restores_settings() {
        let mut harness = TestHarness::loaded().await;
        let exported = harness.root.join("settings.json");
        set_max_lines(&mut harness.state, 7);
        export_config(&mut harness.state, &exported).unwrap();

        set_max_lines(&mut harness.state, 99);
        let handle = import_config(&mut harness.state, harness.proxy.clone(), &exported).unwrap();
        harness.finish_walk(handle).await;

        assert_eq!(harness.state.config.max_lines, 7);
        let saved = settings::load_config(Some(&harness.config_path)).unwrap();
        assert_eq!(saved.max_lines, 7);
    }

    #[tokio::test]
    async fn test_ui_state_json_lists_rows() {
        let mut harness = TestHarness::loaded().await;
        toggle_rows(&mut harness.state, &[3]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&ui_state_json(&harness.state).unwrap()).unwrap();
        assert_eq!(value["checked_count"], 1);
        assert_eq!(value["rows"][2]["label"], "README.md");
        assert_eq!(value["rows"][2]["check_state"], "Checked");
        assert_eq!(value["rows"][1]["depth"], 1);
    }

    #[test]
    fn test_commands_without_tree_report_errors() {
        let temp_dir = tempdir().unwrap();
        let mut state = AppState::new(
            AppConfig::default(),
            Some(temp_dir.path().join("config.json")),
            temp_dir.path().to_path_buf(),
        );
        assert!(generate_output(&mut state).is_err());
        assert!(check_all(&mut state).is_err());
        assert_eq!(show_tree(&state), "No directory loaded.\n");
    }
}
