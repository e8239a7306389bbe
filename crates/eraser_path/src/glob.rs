//! A small glob dialect for exclusion patterns.
//!
//! Supported: `**` (any characters, across `/`), `*` (any characters within
//! one segment), `?` (one character within a segment). Everything else is
//! literal.

use crate::normalize_slashes;
use regex::Regex;

/// Translate a glob into an anchored regular expression.
pub fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let glob = normalize_slashes(glob);
    let mut out = String::with_capacity(glob.len() * 2 + 2);
    out.push('^');

    let mut chars = glob.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(".*");
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            _ => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
            }
        }
    }

    out.push('$');
    Regex::new(&out)
}

/// Compiled exclusion patterns.
///
/// A pattern without `/` also matches at any depth (`*.md` matches
/// `docs/readme.md`), and a plain name without glob characters also
/// excludes folders of that name and their contents (`node_modules`).
#[derive(Debug, Clone, Default)]
pub struct ExcludeMatcher {
    matchers: Vec<Regex>,
}

impl ExcludeMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut matchers = Vec::new();
        for raw in patterns {
            let pattern = normalize_slashes(raw.as_ref().trim());
            if pattern.is_empty() {
                continue;
            }
            for expanded in expand_pattern(&pattern) {
                match glob_to_regex(&expanded) {
                    Ok(re) => matchers.push(re),
                    Err(err) => {
                        tracing::warn!(pattern = %expanded, error = %err, "skipping exclusion pattern")
                    }
                }
            }
        }
        Self { matchers }
    }

    /// Whether no pattern was given.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Whether a project-relative path is excluded.
    pub fn is_match(&self, relative_path: &str) -> bool {
        if self.matchers.is_empty() {
            return false;
        }
        let path = normalize_slashes(relative_path);
        self.matchers.iter().any(|re| re.is_match(&path))
    }
}

fn expand_pattern(pattern: &str) -> Vec<String> {
    let mut expanded = vec![pattern.to_string()];
    if !pattern.contains('/') {
        expanded.push(format!("**/{}", pattern));
        if !pattern.contains(['*', '?']) {
            expanded.push(format!("{}/**", pattern));
            expanded.push(format!("**/{}/**", pattern));
        }
    }
    expanded
}

/// One-shot form of `ExcludeMatcher`.
pub fn is_path_excluded<S: AsRef<str>>(relative_path: &str, patterns: &[S]) -> bool {
    ExcludeMatcher::new(patterns).is_match(relative_path)
}
