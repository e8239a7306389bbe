//! Expanding command-line targets into source files.

use crate::SourceFile;
use eraser_path::{relative_to_root, ExcludeMatcher};
use std::path::{Path, PathBuf};

/// Directory names never descended into.
const SKIPPED_DIRECTORIES: &[&str] = &[".git", ".hg", ".svn"];

/// Expand `targets` (files or directories) into the files to check.
///
/// Directories are walked recursively. Paths matching `exclude` are dropped;
/// an excluded directory is not walked at all. The result is sorted by
/// relative path.
pub fn discover_source_files(
    root: &Path,
    targets: &[PathBuf],
    exclude: &ExcludeMatcher,
) -> Vec<SourceFile> {
    let mut result = Vec::new();

    for target in targets {
        let path = if target.is_absolute() {
            target.clone()
        } else {
            root.join(target)
        };
        let relative_path = relative_to_root(root, &path);

        if path.is_dir() {
            if is_excluded_directory(&relative_path, exclude) {
                continue;
            }
            walk_directory(root, &path, exclude, &mut result);
        } else if path.is_file() {
            if !exclude.is_match(&relative_path) {
                result.push(SourceFile {
                    path,
                    relative_path,
                });
            }
        } else {
            tracing::warn!(path = %path.display(), "target does not exist");
        }
    }

    result.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    result.dedup();
    result
}

fn is_excluded_directory(relative_path: &str, exclude: &ExcludeMatcher) -> bool {
    let trimmed = relative_path.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        return false;
    }
    exclude.is_match(trimmed) || exclude.is_match(&format!("{}/", trimmed))
}

fn walk_directory(root: &Path, dir: &Path, exclude: &ExcludeMatcher, result: &mut Vec<SourceFile>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(err) => {
            tracing::warn!(path = %dir.display(), error = %err, "cannot read directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let relative_path = relative_to_root(root, &path);

        if path.is_dir() {
            let dir_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if SKIPPED_DIRECTORIES.contains(&dir_name)
                || is_excluded_directory(&relative_path, exclude)
            {
                continue;
            }
            walk_directory(root, &path, exclude, result);
        } else if path.is_file() && !exclude.is_match(&relative_path) {
            result.push(SourceFile {
                path,
                relative_path,
            });
        }
    }
}
