//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))
}

/// Copy a file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Files below `base` matching `pattern`, at any depth.
///
/// A pattern without `/` is matched against the file name, one with `/`
/// against the path relative to `base`. Directories in `skip` are not
/// descended into. Results are relative to `base` and sorted.
pub fn find_matching(
    base: &Path,
    pattern: &str,
    ignore_case: bool,
    skip: &[&Path],
) -> Result<Vec<PathBuf>> {
    let pattern =
        Pattern::new(pattern).with_context(|| format!("invalid glob pattern: {}", pattern))?;
    let options = MatchOptions {
        case_sensitive: !ignore_case,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let match_path = pattern.as_str().contains('/');
    let mut results = Vec::new();
    let walker = WalkDir::new(base)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !skip.iter().any(|s| e.path() == *s));

    for entry in walker {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", base.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(base) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let candidate = if match_path {
            relative.to_string_lossy().replace('\\', "/")
        } else {
            entry.file_name().to_string_lossy().into_owned()
        };

        if pattern.matches_with(&candidate, options) {
            results.push(relative.to_path_buf());
        }
    }

    results.sort();
    Ok(results)
}
