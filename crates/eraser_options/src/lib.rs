//! eraser_options: User settings and the `.emojieraser.json` file.
//!
//! Settings are plain JSON with camelCase keys. Every key is optional;
//! missing keys take their defaults.

use eraser_diagnostics::Severity;
use eraser_path::{normalize_slashes, ExcludeMatcher};
use eraser_scanner::IgnoreFlags;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The settings file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = ".emojieraser.json";

/// The key editors nest these settings under.
pub const SETTINGS_SECTION: &str = "emojiChecker";

/// Errors reading or writing the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Emoji checking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Severity attached to every reported emoji.
    pub severity: Severity,
    /// Skip emoji inside comments.
    pub ignore_in_comments: bool,
    /// Skip emoji inside string literals.
    pub ignore_in_strings: bool,
    /// Skip Markdown documents entirely.
    pub ignore_markdown: bool,
    /// Glob patterns (relative to the project root) of files never checked.
    pub exclude_patterns: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let flags = IgnoreFlags::default();
        Self {
            severity: Severity::Error,
            ignore_in_comments: flags.ignore_in_comments,
            ignore_in_strings: flags.ignore_in_strings,
            ignore_markdown: flags.ignore_markdown,
            exclude_patterns: Vec::new(),
        }
    }
}

impl Settings {
    pub fn ignore_flags(&self) -> IgnoreFlags {
        IgnoreFlags {
            ignore_in_comments: self.ignore_in_comments,
            ignore_in_strings: self.ignore_in_strings,
            ignore_markdown: self.ignore_markdown,
        }
    }

    pub fn exclude_matcher(&self) -> ExcludeMatcher {
        ExcludeMatcher::new(self.exclude_patterns.as_slice())
    }

    /// Read settings from an editor configuration value, either bare or
    /// nested under the `emojiChecker` key. Unusable values yield `None`.
    pub fn from_editor_value(value: &serde_json::Value) -> Option<Settings> {
        let value = value.get(SETTINGS_SECTION).unwrap_or(value);
        if !value.is_object() {
            return None;
        }
        match Settings::deserialize(value) {
            Ok(settings) => Some(settings),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed editor settings");
                None
            }
        }
    }
}

/// Append an exclusion pattern unless it is blank or already present.
///
/// Patterns are trimmed and slash-normalized before comparison. Returns
/// whether the settings changed.
pub fn add_exclude_pattern(settings: &mut Settings, pattern: &str) -> bool {
    let normalized = normalize_slashes(pattern.trim());
    if normalized.is_empty() {
        return false;
    }

    let mut existing: Vec<String> = settings
        .exclude_patterns
        .iter()
        .map(|p| normalize_slashes(p.trim()))
        .filter(|p| !p.is_empty())
        .collect();
    if existing.contains(&normalized) {
        return false;
    }

    existing.push(normalized);
    settings.exclude_patterns = existing;
    true
}

/// Parse settings from JSON text.
pub fn parse_settings(content: &str) -> Result<Settings, serde_json::Error> {
    serde_json::from_str(content)
}

/// Load settings from a file. A missing file yields the defaults.
pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_settings(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write settings as pretty JSON.
pub fn save_settings_file(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    let mut content = serde_json::to_string_pretty(settings).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    content.push('\n');
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Add a pattern to the settings file at `path`, creating it if needed.
///
/// Returns whether the pattern was new.
pub fn add_exclude_pattern_to_file(path: &Path, pattern: &str) -> Result<bool, ConfigError> {
    let mut settings = load_settings_file(path)?;
    if !add_exclude_pattern(&mut settings, pattern) {
        return Ok(false);
    }
    save_settings_file(path, &settings)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.severity, Severity::Error);
        assert!(settings.ignore_in_comments);
        assert!(!settings.ignore_in_strings);
        assert!(settings.ignore_markdown);
        assert!(settings.exclude_patterns.is_empty());
    }

    #[test]
    fn test_parse_partial_settings() {
        let settings =
            parse_settings(r#"{"severity": "hint", "ignoreInStrings": true, "excludePatterns": ["*.md"]}"#)
                .unwrap();
        assert_eq!(settings.severity, Severity::Hint);
        assert!(settings.ignore_in_comments);
        assert!(settings.ignore_in_strings);
        assert_eq!(settings.exclude_patterns, vec!["*.md".to_string()]);
    }

    #[test]
    fn test_editor_value_nested_or_bare() {
        let nested = serde_json::json!({ "emojiChecker": { "ignoreMarkdown": false } });
        assert!(!Settings::from_editor_value(&nested).unwrap().ignore_markdown);

        let bare = serde_json::json!({ "severity": "Warning" });
        assert_eq!(Settings::from_editor_value(&bare).unwrap().severity, Severity::Warning);

        assert!(Settings::from_editor_value(&serde_json::Value::Null).is_none());
        let wrong = serde_json::json!({ "ignoreInComments": "yes" });
        assert!(Settings::from_editor_value(&wrong).is_none());
    }

    #[test]
    fn test_add_exclude_pattern_dedupes() {
        let mut settings = Settings::default();
        assert!(add_exclude_pattern(&mut settings, " src\\gen\\** "));
        assert!(!add_exclude_pattern(&mut settings, "src/gen/**"));
        assert!(!add_exclude_pattern(&mut settings, "   "));
        assert!(add_exclude_pattern(&mut settings, "*.md"));
        assert_eq!(settings.exclude_patterns, vec!["src/gen/**", "*.md"]);
    }

    #[test]
    fn test_ignore_flags() {
        let settings = Settings {
            ignore_in_comments: false,
            ignore_in_strings: true,
            ..Settings::default()
        };
        let flags = settings.ignore_flags();
        assert!(!flags.ignore_in_comments);
        assert!(flags.ignore_in_strings);
        assert!(flags.ignore_markdown);
    }

    #[test]
    fn test_settings_file_round_trip_through_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        assert_eq!(load_settings_file(&path).unwrap(), Settings::default());
        assert!(add_exclude_pattern_to_file(&path, "docs/**").unwrap());
        assert!(!add_exclude_pattern_to_file(&path, "docs/**").unwrap());

        let loaded = load_settings_file(&path).unwrap();
        assert_eq!(loaded.exclude_patterns, vec!["docs/**"]);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_settings_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }
}
