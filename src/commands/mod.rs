pub mod init;
pub mod list;
pub mod sync;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// The project directory: `--path` if given, else the current directory.
pub fn project_root(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().context("Failed to read current directory"),
    }
}

/// Split a comma-separated flag value, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
