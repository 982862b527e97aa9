//! Filesystem utilities

use std::path::Path;

use log::debug;

/// Check if a path is a regular file
pub fn is_file(path: &str) -> bool {
    let found = Path::new(path).is_file();
    if !found {
        debug!("no file at {}", path);
    }
    found
}
