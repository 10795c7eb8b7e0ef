//! File content retrieval for rendering and previews.
//!
//! Reads never fail: every problem is reported through a sentinel string
//! that ends up inline in the rendered output.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::cache::ContentCache;
use crate::utils::file_detection::is_binary_file;

pub const NOT_READABLE: &str = "(File is not readable)";
pub const BINARY_FILE: &str = "(Binary file, content not displayed)";

/// Sentinel for read failures other than "missing" or "binary".
pub fn read_error(error: &dyn std::fmt::Display) -> String {
    format!("(Error reading file: {error})")
}

/// The marker line appended when content is cut at `max_lines`.
pub fn truncation_marker(max_lines: usize) -> String {
    format!("... (truncated after {max_lines} lines)")
}

/// Supplies file content to the renderer and the preview command.
pub trait ContentReader {
    /// Returns the content of `path`, cut at `max_lines` lines (`0` = no cap).
    fn read(&mut self, path: &Path, max_lines: usize) -> String;
}

/// Reads through a [`ContentCache`], so repeated renders skip the disk.
pub struct CachedContentReader {
    cache: ContentCache,
}

impl CachedContentReader {
    pub fn new(cache: ContentCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ContentCache {
        &mut self.cache
    }
}

impl Default for CachedContentReader {
    fn default() -> Self {
        Self::new(ContentCache::default())
    }
}

impl ContentReader for CachedContentReader {
    fn read(&mut self, path: &Path, max_lines: usize) -> String {
        self.cache
            .get_or_compute((path.to_path_buf(), max_lines), |(path, max_lines)| {
                read_file_content(path, *max_lines)
            })
    }
}

/// Reads a file as text, replacing invalid UTF-8 and applying the line cap.
pub fn read_file_content(path: &Path, max_lines: usize) -> String {
    if !path.is_file() {
        return NOT_READABLE.to_string();
    }

    match is_binary_file(path) {
        Ok(true) => return BINARY_FILE.to_string(),
        Ok(false) => {}
        Err(e) if e.kind() == ErrorKind::PermissionDenied || e.kind() == ErrorKind::NotFound => {
            return NOT_READABLE.to_string();
        }
        Err(e) => {
            tracing::warn!("Failed to inspect {}: {}", path.display(), e);
            return read_error(&e);
        }
    }

    match fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            truncate_lines(&text, max_lines)
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied || e.kind() == ErrorKind::NotFound => {
            NOT_READABLE.to_string()
        }
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            read_error(&e)
        }
    }
}

/// Keeps the first `max_lines` lines of `text` and appends the truncation
/// marker if anything was cut. `max_lines == 0` disables the cap.
pub fn truncate_lines(text: &str, max_lines: usize) -> String {
    if max_lines == 0 {
        return text.to_string();
    }

    let mut kept = String::new();
    for (count, line) in text.split_inclusive('\n').enumerate() {
        if count == max_lines {
            kept.push_str(&truncation_marker(max_lines));
            return kept;
        }
        kept.push_str(line);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn test_reads_text_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "hello\n").unwrap();
        assert_eq!(read_file_content(&path, 50), "hello\n");
    }

    #[test]
    fn test_missing_file_returns_sentinel() {
        let dir = tempdir().unwrap();
        assert_eq!(
            read_file_content(&dir.path().join("nope.txt"), 50),
            NOT_READABLE
        );
    }

    #[test]
    fn test_directory_is_not_readable_content() {
        let dir = tempdir().unwrap();
        assert_eq!(read_file_content(dir.path(), 50), NOT_READABLE);
    }

    #[test]
    fn test_binary_file_returns_sentinel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.dat");
        fs::write(&path, b"abc\0def").unwrap();
        assert_eq!(read_file_content(&path, 50), BINARY_FILE);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [b'c', b'a', b'f', 0xE9, b'\n']).unwrap();
        assert_eq!(read_file_content(&path, 50), "caf\u{FFFD}\n");
    }

    #[test]
    fn test_truncation_appends_marker() {
        let text = "1\n2\n3\n4\n";
        assert_eq!(
            truncate_lines(text, 2),
            "1\n2\n... (truncated after 2 lines)"
        );
    }

    #[test]
    fn test_exactly_max_lines_is_untouched() {
        assert_eq!(truncate_lines("1\n2\n", 2), "1\n2\n");
        assert_eq!(truncate_lines("1\n2", 2), "1\n2");
    }

    #[test]
    fn test_zero_means_unlimited() {
        let text = "line\n".repeat(500);
        assert_eq!(truncate_lines(&text, 0), text);
    }

    #[test]
    fn test_cached_reader_does_not_see_later_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "v1").unwrap();

        let mut reader = CachedContentReader::default();
        assert_eq!(reader.read(&path, 50), "v1");
        fs::write(&path, "v2").unwrap();
        assert_eq!(reader.read(&path, 50), "v1");

        reader.cache_mut().clear();
        assert_eq!(reader.read(&path, 50), "v2");
    }

    proptest! {
        #[test]
        fn prop_truncation_respects_line_cap(
            lines in proptest::collection::vec("[a-z ]{0,12}", 0..40),
            cap in 1usize..30,
        ) {
            let text: String = lines.iter().map(|l| format!("{l}\n")).collect();
            let out = truncate_lines(&text, cap);

            if lines.len() > cap {
                let pieces: Vec<&str> = out.split('\n').collect();
                prop_assert_eq!(pieces.len(), cap + 1);
                prop_assert_eq!(pieces[cap].to_string(), truncation_marker(cap));
                let expected: Vec<&str> = lines[..cap].iter().map(String::as_str).collect();
                prop_assert_eq!(pieces[..cap].to_vec(), expected);
            } else {
                prop_assert_eq!(out, text);
            }
        }
    }
}
