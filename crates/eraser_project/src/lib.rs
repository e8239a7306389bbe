//! eraser_project: Checking and cleaning files on disk.
//!
//! A `Project` is a root directory, its settings, and the set of files
//! selected from the command line (directories are walked). Files are
//! processed in parallel; a failure on one file is recorded and never stops
//! the others.

mod discovery;
mod files;

pub use discovery::discover_source_files;
pub use files::{read_source, remove_emojis_from_file, write_atomically, FileError};

use eraser_checker::Checker;
use eraser_diagnostics::{Diagnostic, DiagnosticCollection};
use eraser_options::Settings;
use eraser_path::{language_id_for_path, ExcludeMatcher};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// A file selected for checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Forward-slash path relative to the project root.
    pub relative_path: String,
}

/// The outcome of checking every file in a project.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub diagnostics: DiagnosticCollection,
    /// Files that were read and checked.
    pub checked: usize,
    /// Files skipped because they are not UTF-8 text.
    pub skipped: usize,
    pub failures: Vec<FileError>,
}

/// The outcome of removing emoji from every file in a project.
#[derive(Debug, Default)]
pub struct RemovalSummary {
    pub attempted: usize,
    pub changed: usize,
    /// Files left alone because they are not UTF-8 text.
    pub skipped: usize,
    pub failures: Vec<FileError>,
}

impl RemovalSummary {
    /// A one-line summary for the user.
    pub fn message(&self) -> String {
        let mut message = if self.changed > 0 {
            format!("removed emojis in {}/{} file(s)", self.changed, self.attempted)
        } else {
            "no emojis found in selected file(s)".to_string()
        };
        if self.skipped > 0 {
            message.push_str(&format!(", skipped {} non-UTF-8 file(s)", self.skipped));
        }
        message
    }
}

/// The checking root, its settings and the selected files.
pub struct Project {
    root: PathBuf,
    settings: Settings,
    matcher: ExcludeMatcher,
    files: Vec<SourceFile>,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, settings: Settings) -> Self {
        let matcher = settings.exclude_matcher();
        Self {
            root: root.into(),
            settings,
            matcher,
            files: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Add files and directories. Excluded paths are dropped and duplicates
    /// are kept once.
    pub fn add_targets(&mut self, targets: &[PathBuf]) {
        for file in discover_source_files(&self.root, targets, &self.matcher) {
            if !self.files.contains(&file) {
                self.files.push(file);
            }
        }
    }

    /// Whether a project-relative path is excluded by the settings.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        self.matcher.is_match(relative_path)
    }

    /// Check every file. `language_id` overrides extension-based detection.
    pub fn check(&self, language_id: Option<&str>) -> CheckReport {
        let results: Vec<(&SourceFile, Result<Vec<Diagnostic>, FileError>)> = self
            .files
            .par_iter()
            .map(|file| (file, self.check_file(file, language_id)))
            .collect();

        let mut report = CheckReport::default();
        for (file, result) in results {
            match result {
                Ok(diagnostics) => {
                    report.checked += 1;
                    report.diagnostics.extend(diagnostics);
                }
                Err(FileError::NotUtf8 { .. }) => {
                    tracing::debug!(path = %file.relative_path, "skipping non-UTF-8 file");
                    report.skipped += 1;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to check file");
                    report.failures.push(err);
                }
            }
        }
        report.diagnostics.sort();
        report
    }

    fn check_file(
        &self,
        file: &SourceFile,
        language_id: Option<&str>,
    ) -> Result<Vec<Diagnostic>, FileError> {
        let text = read_source(&file.path)?;
        let language_id = language_id.unwrap_or_else(|| language_id_for_path(&file.relative_path));
        let mut checker = Checker::new(&self.settings);
        checker.check_document(Some(&file.relative_path), &text, language_id);
        Ok(checker.take_diagnostics().into_diagnostics())
    }

    /// Remove every emoji from every file, comments and strings included.
    pub fn remove_emojis(&self) -> RemovalSummary {
        let results: Vec<Result<bool, FileError>> = self
            .files
            .par_iter()
            .map(|file| remove_emojis_from_file(&file.path))
            .collect();

        let mut summary = RemovalSummary {
            attempted: results.len(),
            ..RemovalSummary::default()
        };
        for result in results {
            match result {
                Ok(true) => summary.changed += 1,
                Ok(false) => {}
                Err(FileError::NotUtf8 { path }) => {
                    tracing::debug!(path = %path.display(), "skipping non-UTF-8 file");
                    summary.skipped += 1;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to remove emojis");
                    summary.failures.push(err);
                }
            }
        }
        summary
    }
}
