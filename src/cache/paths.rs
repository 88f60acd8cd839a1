// Store location utilities.
// Resolves the platform cache directory for the persisted key-value store.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Base cache directory (~/.cache/kiosk on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kiosk").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the persisted key-value store file.
pub fn store_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("store.json"))
}
