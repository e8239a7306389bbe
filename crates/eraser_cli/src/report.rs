//! Printing findings.
//!
//! On a terminal each finding is rendered by miette with the offending line
//! and a label under the emoji. Otherwise findings are printed one per line
//! as `file(line,col): severity EE1001: message`, with 1-based positions.

use eraser_core::text::LineMap;
use eraser_diagnostics::{Diagnostic, Severity};
use miette::{GraphicalReportHandler, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use std::fmt;

/// One finding, ready for miette to render against its file's text.
#[derive(Debug, thiserror::Error)]
#[error("{}", .diagnostic.message_text)]
pub struct EmojiReport<'a> {
    diagnostic: &'a Diagnostic,
    named_source: &'a NamedSource<String>,
}

impl<'a> EmojiReport<'a> {
    pub fn new(diagnostic: &'a Diagnostic, source: &'a NamedSource<String>) -> Self {
        Self {
            diagnostic,
            named_source: source,
        }
    }
}

impl miette::Diagnostic for EmojiReport<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        Some(Box::new(self.diagnostic.code_label()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diagnostic.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
            Severity::Information | Severity::Hint => miette::Severity::Advice,
        })
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        Some(Box::new("run with --fix to remove every emoji"))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.named_source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = SourceSpan::from(self.diagnostic.span.to_range());
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some("emoji here".to_string()),
            span,
        ))))
    }
}

/// Render one finding with miette's graphical handler.
pub fn render_fancy(diagnostic: &Diagnostic, source: &NamedSource<String>) -> String {
    let report = EmojiReport::new(diagnostic, source);
    let mut out = String::new();
    if GraphicalReportHandler::new()
        .render_report(&mut out, &report)
        .is_err()
    {
        return render_plain(diagnostic, source.inner(), &LineMap::new(source.inner()));
    }
    out
}

/// Render one finding as a single line.
pub fn render_plain(diagnostic: &Diagnostic, text: &str, line_map: &LineMap) -> String {
    let position = line_map.line_and_column_of(text, diagnostic.span.start);
    format!(
        "{}({},{}): {} {}: {}",
        diagnostic.file.as_deref().unwrap_or("<stdin>"),
        position.line + 1,
        position.character + 1,
        diagnostic.severity,
        diagnostic.code_label(),
        diagnostic.message_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use eraser_core::text::TextSpan;
    use eraser_diagnostics::messages;

    fn finding(start: u32) -> Diagnostic {
        Diagnostic::new(TextSpan::new(start, 4), &messages::EMOJI_DETECTED, Severity::Warning)
            .with_file("src/app.py")
    }

    #[test]
    fn test_plain_positions_are_one_based() {
        let text = "x = 1\ny = '\u{1F600}'\n";
        let start = text.find('\u{1F600}').unwrap() as u32;
        let line = render_plain(&finding(start), text, &LineMap::new(text));
        assert_eq!(line, "src/app.py(2,6): warning EE1001: Emoji detected");
    }

    #[test]
    fn test_fancy_report_names_code_and_file() {
        let text = "print('\u{1F600}')\n".to_string();
        let source = NamedSource::new("src/app.py", text);
        let rendered = render_fancy(&finding(7), &source);
        assert!(rendered.contains("EE1001"));
        assert!(rendered.contains("src/app.py"));
        assert!(rendered.contains("Emoji detected"));
    }
}
