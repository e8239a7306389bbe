//! eraser_path: Path normalization, language identification and
//! file/folder exclusion.
//!
//! All matching happens on forward-slash paths relative to the project
//! root, so the same patterns work on every platform.

mod glob;

pub use glob::{glob_to_regex, is_path_excluded, ExcludeMatcher};

use std::path::Path;

/// Convert backslashes to forward slashes.
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Get the base name (file name) from a normalized path.
pub fn get_base_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(last_slash) => &path[last_slash + 1..],
        None => path,
    }
}

/// The extension of the file name in `path`, without the dot.
///
/// Names starting with their only dot (`.gitignore`) and names ending in a
/// dot have no extension.
pub fn get_file_extension(path: &str) -> Option<&str> {
    let file_name = get_base_name(path);
    let last_dot = file_name.rfind('.')?;
    if last_dot == 0 || last_dot == file_name.len() - 1 {
        return None;
    }
    Some(&file_name[last_dot + 1..])
}

/// Express `path` relative to `root`, with forward slashes.
///
/// Paths outside the root are returned whole.
pub fn relative_to_root(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    normalize_slashes(&relative.to_string_lossy())
}

/// Pick a language identifier from a file's extension.
pub fn language_id_for_path(path: &str) -> &'static str {
    let Some(ext) = get_file_extension(path) else {
        return "plaintext";
    };
    match ext.to_ascii_lowercase().as_str() {
        "py" | "pyi" => "python",
        "md" | "markdown" => "markdown",
        "mdx" => "mdx",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "mts" | "cts" => "typescript",
        "jsx" => "javascriptreact",
        "tsx" => "typescriptreact",
        "html" | "htm" => "html",
        "xml" => "xml",
        "xhtml" => "xhtml",
        "sh" | "bash" | "zsh" => "shellscript",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "rb" => "ruby",
        "sql" => "sql",
        "css" => "css",
        "scss" => "scss",
        "less" => "less",
        "lua" => "lua",
        "hs" => "haskell",
        "rs" => "rust",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "cs" => "csharp",
        _ => "plaintext",
    }
}

// ============================================================================
// Exclusion pattern builders
// ============================================================================

/// Pattern excluding exactly one file.
pub fn exclude_file_pattern(relative_path: &str) -> String {
    normalize_slashes(relative_path)
}

/// Pattern excluding every file sharing this file's extension, or every
/// file with the same name when it has none.
pub fn exclude_extension_pattern(relative_path: &str) -> String {
    let relative_path = normalize_slashes(relative_path);
    match get_file_extension(&relative_path) {
        Some(ext) => format!("*.{}", ext),
        None => get_base_name(&relative_path).to_string(),
    }
}

/// Pattern excluding a folder and everything below it.
pub fn exclude_folder_pattern(relative_path: &str) -> String {
    let relative_path = normalize_slashes(relative_path);
    if relative_path.ends_with('/') {
        format!("{}**", relative_path)
    } else {
        format!("{}/**", relative_path)
    }
}
