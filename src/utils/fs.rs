//! src/utils/fs.rs
//! Plain-text asset loading

use std::fs;
use std::path::Path;

/// Reads a whole text file.
///
/// A missing or unreadable file yields an empty string; the failure is only
/// logged. Invalid UTF-8 is replaced rather than rejected.
pub fn read_all_text(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            String::new()
        }
    }
}
