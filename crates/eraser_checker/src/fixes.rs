//! Edits that remove emoji.

use eraser_core::text::{TextPos, TextSpan};
use eraser_diagnostics::Diagnostic;
use eraser_emoji::remove_emojis;
use std::borrow::Cow;

/// Replace `span` with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub span: TextSpan,
    pub new_text: String,
}

/// A quick fix deleting one reported emoji.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickFix {
    pub title: &'static str,
    pub edit: TextEdit,
    pub is_preferred: bool,
}

/// The quick fix for an emoji diagnostic: delete exactly its span.
pub fn quick_fix_for(diagnostic: &Diagnostic) -> QuickFix {
    QuickFix {
        title: "Remove this emoji",
        edit: TextEdit {
            span: diagnostic.span,
            new_text: String::new(),
        },
        is_preferred: true,
    }
}

/// A whole-document edit removing every emoji, ignored regions included.
///
/// `None` when the text has no emoji.
pub fn remove_all_edit(text: &str) -> Option<TextEdit> {
    match remove_emojis(text) {
        Cow::Borrowed(_) => None,
        Cow::Owned(new_text) => Some(TextEdit {
            span: TextSpan::new(0, text.len() as TextPos),
            new_text,
        }),
    }
}

/// Apply an edit to `text`. Spans past the end are clamped.
pub fn apply_edit(text: &str, edit: &TextEdit) -> String {
    let end = (edit.span.end() as usize).min(text.len());
    let start = (edit.span.start as usize).min(end);
    let mut out = String::with_capacity(text.len() - (end - start) + edit.new_text.len());
    out.push_str(&text[..start]);
    out.push_str(&edit.new_text);
    out.push_str(&text[end..]);
    out
}
