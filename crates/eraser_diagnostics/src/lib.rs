//! eraser_diagnostics: Diagnostic messages and severity levels.
//!
//! Every flagged emoji becomes a `Diagnostic` carrying the configured
//! `Severity`, a fixed message and the byte span of the occurrence.

use eraser_core::text::TextSpan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Diagnostic severity, ranked `Hint < Information < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Hint,
    Information,
    Warning,
    #[default]
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Hint => "Hint",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }

    /// Parse a severity name, case-insensitively. Unknown names yield `None`.
    pub fn parse(value: &str) -> Option<Severity> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hint" => Some(Severity::Hint),
            "information" | "info" => Some(Severity::Information),
            "warning" | "warn" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hint => write!(f, "hint"),
            Severity::Information => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::parse(s).ok_or_else(|| format!("unknown severity '{}'", s))
    }
}

/// Settings files are hand-edited, so an unrecognized level degrades to
/// `Error` instead of rejecting the whole file.
impl From<String> for Severity {
    fn from(value: String) -> Self {
        Severity::parse(&value).unwrap_or_default()
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        value.as_str().to_string()
    }
}

/// A diagnostic message template with a code.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g., 1001).
    pub code: u32,
    /// The message text.
    pub message: &'static str,
}

/// A realized diagnostic with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file path where this diagnostic occurred, if any.
    pub file: Option<String>,
    /// The byte span of the flagged text.
    pub span: TextSpan,
    /// The resolved message text.
    pub message_text: String,
    /// The diagnostic code.
    pub code: u32,
    /// The configured severity.
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(span: TextSpan, message: &DiagnosticMessage, severity: Severity) -> Self {
        Self {
            file: None,
            span,
            message_text: message.message.to_string(),
            code: message.code,
            severity,
        }
    }

    /// Attach a file name.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Whether this is an error diagnostic.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The code as printed, e.g. `EE1001`.
    pub fn code_label(&self) -> String {
        format!("EE{}", self.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}({}): ", file, self.span.start)?;
        }
        write!(f, "{} {}: {}", self.severity, self.code_label(), self.message_text)
    }
}

/// A collection of diagnostics accumulated across files.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by(|a, b| a.file.cmp(&b.file).then(a.span.start.cmp(&b.span.start)));
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::DiagnosticMessage;

    pub const EMOJI_DETECTED: DiagnosticMessage = DiagnosticMessage {
        code: 1001,
        message: "Emoji detected",
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ranking() {
        assert!(Severity::Hint < Severity::Information);
        assert!(Severity::Information < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("WARNING"), Some(Severity::Warning));
        assert_eq!(Severity::parse("information"), Some(Severity::Information));
        assert_eq!(Severity::parse("Hint"), Some(Severity::Hint));
        assert_eq!(Severity::parse("fatal"), None);
    }

    #[test]
    fn test_severity_serde_falls_back_to_error() {
        let s: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(s, Severity::Warning);
        let s: Severity = serde_json::from_str("\"loud\"").unwrap();
        assert_eq!(s, Severity::Error);
        assert_eq!(serde_json::to_string(&Severity::Hint).unwrap(), "\"Hint\"");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(TextSpan::new(6, 4), &messages::EMOJI_DETECTED, Severity::Warning)
            .with_file("src/main.rs");
        assert_eq!(diag.to_string(), "src/main.rs(6): warning EE1001: Emoji detected");
        assert!(!diag.is_error());
    }

    #[test]
    fn test_collection_sort_and_count() {
        let mut collection = DiagnosticCollection::new();
        let msg = &messages::EMOJI_DETECTED;
        collection.add(Diagnostic::new(TextSpan::new(9, 4), msg, Severity::Error).with_file("b"));
        collection.add(Diagnostic::new(TextSpan::new(3, 4), msg, Severity::Hint).with_file("b"));
        collection.add(Diagnostic::new(TextSpan::new(1, 4), msg, Severity::Error).with_file("a"));
        collection.sort();

        let starts: Vec<_> = collection
            .diagnostics()
            .iter()
            .map(|d| (d.file.clone().unwrap(), d.span.start))
            .collect();
        assert_eq!(starts, vec![("a".to_string(), 1), ("b".to_string(), 3), ("b".to_string(), 9)]);
        assert_eq!(collection.error_count(), 2);
        assert!(collection.has_errors());
    }
}
