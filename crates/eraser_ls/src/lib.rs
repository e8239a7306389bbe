//! eraser_ls: Language service.
//!
//! Tracks open documents and answers editor questions about them:
//! diagnostics, quick fixes, whole-document removal edits, and which
//! exclusion pattern a context-menu command should add. The language
//! service is consumed by the LSP server and has no protocol types of its own.

use eraser_checker::{quick_fix_for, remove_all_edit, Checker, QuickFix, TextEdit};
use eraser_core::text::TextSpan;
use eraser_diagnostics::Diagnostic;
use eraser_options::{
    add_exclude_pattern, add_exclude_pattern_to_file, ConfigError, Settings, CONFIG_FILE_NAME,
};
use eraser_path::{
    exclude_extension_pattern, exclude_file_pattern, exclude_folder_pattern,
    language_id_for_path, relative_to_root, ExcludeMatcher,
};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// URI schemes whose documents are checked.
const SCANNED_SCHEMES: &[&str] = &["file:", "untitled:"];

/// Whether documents with this URI are checked at all.
pub fn is_scannable_uri(uri: &str) -> bool {
    SCANNED_SCHEMES.iter().any(|scheme| uri.starts_with(scheme))
}

/// A document tracked by the language service.
#[derive(Debug)]
struct Document {
    /// Location on disk, when the document has one.
    path: Option<PathBuf>,
    /// The current source text.
    text: String,
    language_id: String,
    /// Version number for incremental updates.
    version: i32,
}

/// Which exclusion a context-menu command adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcludeKind {
    File,
    Extension,
    Folder,
}

/// The result of adding an exclusion pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionOutcome {
    pub pattern: String,
    /// False when the pattern was already present.
    pub added: bool,
    /// The config file the pattern was written to, if any.
    pub persisted_to: Option<PathBuf>,
}

impl ExclusionOutcome {
    /// A one-line message for the user.
    pub fn message(&self, kind: ExcludeKind, relative_path: &str) -> String {
        match (kind, self.added) {
            (ExcludeKind::File, true) => format!("Emoji Eraser: excluded file \"{}\"", relative_path),
            (ExcludeKind::File, false) => {
                format!("Emoji Eraser: file already excluded (\"{}\")", relative_path)
            }
            (ExcludeKind::Folder, true) => {
                format!("Emoji Eraser: excluded folder \"{}\"", relative_path)
            }
            (ExcludeKind::Folder, false) => {
                format!("Emoji Eraser: folder already excluded (\"{}\")", relative_path)
            }
            (ExcludeKind::Extension, true) if self.pattern.starts_with("*.") => {
                format!("Emoji Eraser: excluded all \"{}\" files", self.pattern)
            }
            (ExcludeKind::Extension, true) => {
                format!("Emoji Eraser: excluded files named \"{}\"", self.pattern)
            }
            (ExcludeKind::Extension, false) => {
                format!("Emoji Eraser: pattern already present (\"{}\")", self.pattern)
            }
        }
    }
}

/// Language service providing editor features.
pub struct LanguageService {
    /// Open documents tracked by URI.
    documents: FxHashMap<String, Document>,
    settings: Settings,
    matcher: ExcludeMatcher,
    workspace_root: Option<PathBuf>,
}

impl Default for LanguageService {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageService {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let matcher = settings.exclude_matcher();
        Self {
            documents: FxHashMap::default(),
            settings,
            matcher,
            workspace_root: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. Returns whether anything changed.
    pub fn set_settings(&mut self, settings: Settings) -> bool {
        if settings == self.settings {
            return false;
        }
        self.matcher = settings.exclude_matcher();
        self.settings = settings;
        true
    }

    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    pub fn set_workspace_root(&mut self, root: Option<PathBuf>) {
        self.workspace_root = root;
    }

    /// The workspace config file, when a root is known.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.workspace_root.as_ref().map(|root| root.join(CONFIG_FILE_NAME))
    }

    /// Open or replace a document.
    ///
    /// An empty `language_id` falls back to detection from the path.
    pub fn open_document(
        &mut self,
        uri: String,
        path: Option<PathBuf>,
        text: String,
        language_id: &str,
        version: i32,
    ) {
        let language_id = if language_id.is_empty() {
            let name = path.as_deref().map(|p| p.to_string_lossy()).unwrap_or_default();
            language_id_for_path(&name).to_string()
        } else {
            language_id.to_string()
        };
        self.documents.insert(
            uri,
            Document {
                path,
                text,
                language_id,
                version,
            },
        );
    }

    /// Update document content.
    pub fn update_document(&mut self, uri: &str, text: String, version: i32) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.text = text;
            doc.version = version;
        }
    }

    /// Close a document. Returns whether it was open.
    pub fn close_document(&mut self, uri: &str) -> bool {
        self.documents.remove(uri).is_some()
    }

    pub fn is_open(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }

    /// Get the current text of a document.
    pub fn get_document_text(&self, uri: &str) -> Option<&str> {
        self.documents.get(uri).map(|d| d.text.as_str())
    }

    pub fn get_document_version(&self, uri: &str) -> Option<i32> {
        self.documents.get(uri).map(|d| d.version)
    }

    /// URIs of every open document, sorted.
    pub fn document_uris(&self) -> Vec<String> {
        let mut uris: Vec<String> = self.documents.keys().cloned().collect();
        uris.sort();
        uris
    }

    /// Forward-slash path of `path` relative to the workspace root, or the
    /// whole path when no root is known.
    pub fn relative_path_of(&self, path: &Path) -> String {
        match &self.workspace_root {
            Some(root) => relative_to_root(root, path),
            None => relative_to_root(Path::new(""), path),
        }
    }

    /// Whether an open document is excluded. Documents without a path on
    /// disk are never excluded.
    pub fn is_excluded(&self, uri: &str) -> bool {
        let Some(path) = self.documents.get(uri).and_then(|d| d.path.as_deref()) else {
            return false;
        };
        self.matcher.is_match(&self.relative_path_of(path))
    }

    /// Get diagnostics for a document.
    ///
    /// Empty for unknown, unscannable and excluded documents.
    pub fn get_diagnostics(&self, uri: &str) -> Vec<Diagnostic> {
        let Some(doc) = self.documents.get(uri) else {
            return Vec::new();
        };
        if !is_scannable_uri(uri) || self.is_excluded(uri) {
            return Vec::new();
        }

        let mut checker = Checker::new(&self.settings);
        checker.check_document(None, &doc.text, &doc.language_id);
        checker.take_diagnostics().into_diagnostics()
    }

    /// Quick fixes for every diagnostic touching `span`.
    pub fn get_quick_fixes(&self, uri: &str, span: TextSpan) -> Vec<(Diagnostic, QuickFix)> {
        self.get_diagnostics(uri)
            .into_iter()
            .filter(|diagnostic| diagnostic.span.intersects(&span))
            .map(|diagnostic| {
                let fix = quick_fix_for(&diagnostic);
                (diagnostic, fix)
            })
            .collect()
    }

    /// An edit removing every emoji from an open document, ignored regions
    /// included. `None` when the document is unknown or has no emoji.
    pub fn remove_all_edit(&self, uri: &str) -> Option<TextEdit> {
        remove_all_edit(&self.documents.get(uri)?.text)
    }

    /// The pattern a context-menu command adds for `path`.
    pub fn exclusion_pattern(&self, path: &Path, kind: ExcludeKind) -> String {
        let relative = self.relative_path_of(path);
        match kind {
            ExcludeKind::File => exclude_file_pattern(&relative),
            ExcludeKind::Extension => exclude_extension_pattern(&relative),
            ExcludeKind::Folder => exclude_folder_pattern(&relative),
        }
    }

    /// Add an exclusion for `path` to the settings, and to the workspace
    /// config file when a root is known.
    pub fn add_exclusion(
        &mut self,
        path: &Path,
        kind: ExcludeKind,
    ) -> Result<ExclusionOutcome, ConfigError> {
        let pattern = self.exclusion_pattern(path, kind);

        let mut settings = self.settings.clone();
        let added = add_exclude_pattern(&mut settings, &pattern);
        self.set_settings(settings);

        let persisted_to = match self.config_path() {
            Some(config) => {
                add_exclude_pattern_to_file(&config, &pattern)?;
                Some(config)
            }
            None => None,
        };

        tracing::info!(pattern = %pattern, added, "added exclusion");
        Ok(ExclusionOutcome {
            pattern,
            added,
            persisted_to,
        })
    }
}
