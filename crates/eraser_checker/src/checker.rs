//! Diagnostic computation for one document at a time.

use eraser_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use eraser_emoji::{find_emojis, EmojiOccurrence};
use eraser_options::Settings;
use eraser_scanner::{build_ignore_ranges, IgnoreFlags};

/// The emoji in `text` that are not inside an ignored region, in order.
pub fn find_reportable_emojis(
    text: &str,
    language_id: &str,
    flags: IgnoreFlags,
) -> Vec<EmojiOccurrence> {
    let ignored = build_ignore_ranges(text, language_id, flags);
    find_emojis(text)
        .filter(|occurrence| ignored.is_empty() || !ignored.contains(occurrence.start))
        .collect()
}

/// Turns documents into emoji diagnostics using one set of settings.
pub struct Checker<'s> {
    settings: &'s Settings,
    diagnostics: DiagnosticCollection,
}

impl<'s> Checker<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        Self {
            settings,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Check one document and record its diagnostics.
    ///
    /// Returns the number of emoji reported for this document.
    pub fn check_document(&mut self, file: Option<&str>, text: &str, language_id: &str) -> usize {
        let occurrences = find_reportable_emojis(text, language_id, self.settings.ignore_flags());
        let count = occurrences.len();
        tracing::debug!(file, language_id, count, "checked document");

        for occurrence in occurrences {
            let diagnostic = Diagnostic::new(
                occurrence.span(),
                &messages::EMOJI_DETECTED,
                self.settings.severity,
            );
            self.diagnostics.add(match file {
                Some(file) => diagnostic.with_file(file),
                None => diagnostic,
            });
        }
        count
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }
}
