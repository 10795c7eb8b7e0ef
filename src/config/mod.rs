pub mod settings;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum number of entries kept in `recent_directories`.
pub const MAX_RECENT_DIRECTORIES: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub ignored_patterns: Vec<String>,
    /// Line cap for embedded file content; `0` means unlimited.
    pub max_lines: usize,
    /// Most recent first, unique by exact path string.
    pub recent_directories: Vec<String>,
    pub window_size: (u32, u32),
}

impl AppConfig {
    /// Moves `directory` to the front of the recent list, capping its length.
    pub fn add_recent_directory(&mut self, directory: &Path) {
        let directory = directory.to_string_lossy().to_string();
        self.recent_directories.retain(|d| *d != directory);
        self.recent_directories.insert(0, directory);
        self.recent_directories.truncate(MAX_RECENT_DIRECTORIES);
    }

    /// Adds a pattern unless it is blank or already present.
    pub fn add_ignored_pattern(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        if pattern.is_empty() || self.ignored_patterns.iter().any(|p| p == pattern) {
            return false;
        }
        self.ignored_patterns.push(pattern.to_string());
        true
    }

    pub fn remove_ignored_pattern(&mut self, pattern: &str) -> bool {
        let pattern = pattern.trim();
        let before = self.ignored_patterns.len();
        self.ignored_patterns.retain(|p| p != pattern);
        self.ignored_patterns.len() != before
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let ignored_patterns = [
            ".git",
            "__pycache__",
            "*.pyc",
            "*.pyo",
            "*.jpg",
            "*.png",
            "*.gif",
            "*.pdf",
            "*.DS_Store",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            ignored_patterns,
            max_lines: 50,
            recent_directories: Vec::new(),
            window_size: (800, 600),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_recent_directories_move_to_front_without_duplicates() {
        let mut config = AppConfig::default();
        config.add_recent_directory(&PathBuf::from("/a"));
        config.add_recent_directory(&PathBuf::from("/b"));
        config.add_recent_directory(&PathBuf::from("/a"));
        assert_eq!(config.recent_directories, vec!["/a", "/b"]);
    }

    #[test]
    fn test_recent_directories_are_capped() {
        let mut config = AppConfig::default();
        for i in 0..15 {
            config.add_recent_directory(&PathBuf::from(format!("/dir{i}")));
        }
        assert_eq!(config.recent_directories.len(), MAX_RECENT_DIRECTORIES);
        assert_eq!(config.recent_directories[0], "/dir14");
        assert_eq!(config.recent_directories[9], "/dir5");
    }

    #[test]
    fn test_pattern_edits() {
        let mut config = AppConfig::default();
        assert!(config.add_ignored_pattern(" target "));
        assert!(!config.add_ignored_pattern("target"));
        assert!(!config.add_ignored_pattern("   "));
        assert!(config.remove_ignored_pattern("target"));
        assert!(!config.remove_ignored_pattern("target"));
    }

    #[test]
    fn test_serialized_keys_and_shapes() {
        let value = serde_json::to_value(AppConfig::default()).unwrap();
        assert_eq!(value["max_lines"], 50);
        assert_eq!(value["window_size"], serde_json::json!([800, 600]));
        assert!(value["recent_directories"].as_array().unwrap().is_empty());
        assert_eq!(value["ignored_patterns"][0], ".git");
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"ignored_patterns": ["dist"]}"#).unwrap();
        assert_eq!(config.ignored_patterns, vec!["dist"]);
        assert_eq!(config.max_lines, 50);
        assert_eq!(config.window_size, (800, 600));
    }
}
