//! Checker integration tests.
//!
//! End-to-end: detector + scanner + filtering, and the quick fixes built
//! from the resulting diagnostics.

use eraser_checker::{apply_edit, find_reportable_emojis, quick_fix_for, Checker};
use eraser_options::Settings;
use eraser_scanner::IgnoreFlags;

/// Helper: the reported emoji as text slices.
fn reported<'t>(text: &'t str, language_id: &str, flags: IgnoreFlags) -> Vec<&'t str> {
    find_reportable_emojis(text, language_id, flags)
        .into_iter()
        .map(|o| &text[o.start as usize..o.end() as usize])
        .collect()
}

fn flags(comments: bool, strings: bool, markdown: bool) -> IgnoreFlags {
    IgnoreFlags {
        ignore_in_comments: comments,
        ignore_in_strings: strings,
        ignore_markdown: markdown,
    }
}

#[test]
fn test_python_comment_is_suppressed() {
    let text = "Hello \u{1F600} # \u{1F600} comment\n\u{1F600}";
    let found = find_reportable_emojis(text, "python", flags(true, false, true));
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].start, 6);
    assert_eq!(found[1].start as usize, text.rfind('\u{1F600}').unwrap());
}

#[test]
fn test_strings_reported_unless_ignored() {
    let text = "let s = \"\u{1F680}\"; // \u{2728}";
    assert_eq!(reported(text, "javascript", flags(true, false, true)), vec!["\u{1F680}"]);
    assert!(reported(text, "javascript", flags(true, true, true)).is_empty());
    assert_eq!(
        reported(text, "javascript", flags(false, false, true)),
        vec!["\u{1F680}", "\u{2728}"]
    );
}

#[test]
fn test_markdown_all_or_nothing() {
    let text = "# Notes \u{1F4DD}\n\n- done \u{2705}";
    assert!(reported(text, "markdown", flags(false, false, true)).is_empty());
    assert_eq!(reported(text, "markdown", flags(true, true, false)).len(), 2);
}

#[test]
fn test_html_comment_and_body() {
    let text = "<p>\u{1F44B}</p>\n<!-- \u{1F6A7} wip -->";
    assert_eq!(reported(text, "html", flags(true, false, true)), vec!["\u{1F44B}"]);
}

#[test]
fn test_quick_fix_deletes_exactly_one_emoji() {
    let text = "a\u{1F600}b\u{1F389}c";
    let settings = Settings::default();
    let mut checker = Checker::new(&settings);
    checker.check_document(Some("x.txt"), text, "plaintext");

    let diagnostics = checker.take_diagnostics();
    assert_eq!(diagnostics.len(), 2);

    let fix = quick_fix_for(&diagnostics.diagnostics()[1]);
    assert_eq!(fix.title, "Remove this emoji");
    assert!(fix.is_preferred);
    assert_eq!(apply_edit(text, &fix.edit), "a\u{1F600}bc");
}

#[test]
fn test_empty_document() {
    assert!(reported("", "rust", IgnoreFlags::default()).is_empty());
    assert!(reported("", "markdown", IgnoreFlags::default()).is_empty());
}
