//! Shared helpers for filesystem paths and CLI input parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Returns the application data directory, `{data_dir}/mianjing`.
///
/// `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("mianjing"))
}

/// Ensures the parent directory of the database file exists.
///
/// Creates the directory structure if it doesn't exist using `create_dir_all`.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

/// Splits comma-separated input, trimming entries and dropping empty ones.
///
/// # Examples
///
/// ```
/// use mianjing::utils::parse_list;
///
/// assert_eq!(parse_list("Rust, Go,, "), vec!["Rust", "Go"]);
/// assert!(parse_list("  ").is_empty());
/// ```
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
