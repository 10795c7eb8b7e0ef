use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected by the binary heuristic.
pub const BINARY_SNIFF_LEN: usize = 8192;

/// Determines if a file is likely binary: a null byte in its first 8 KiB.
pub fn is_binary_file(path: &Path) -> io::Result<bool> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(BINARY_SNIFF_LEN);
    file.take(BINARY_SNIFF_LEN as u64).read_to_end(&mut head)?;
    Ok(is_binary_content(&head))
}

/// Byte-level form of [`is_binary_file`], applied to at most the first 8 KiB.
pub fn is_binary_content(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    head.contains(&0)
}
