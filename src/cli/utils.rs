//! Helpers shared by command handlers

use crate::config::DESK_DIR;
use crate::error::{DeskError, Result};
use std::path::{Path, PathBuf};

/// Find the nearest directory at or above `start` that contains `.ticket-desk`
///
/// `start` defaults to the current directory.
pub fn find_project_root(start: Option<&str>) -> Result<PathBuf> {
    let start = match start {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    start
        .ancestors()
        .find(|dir| dir.join(DESK_DIR).is_dir())
        .map(Path::to_path_buf)
        .ok_or(DeskError::ProjectNotInitialized)
}

/// Render an optional field for terminal output
pub fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
