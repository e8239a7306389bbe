//! Scanner integration tests.
//!
//! Verifies which parts of a buffer are classified as ignored for the
//! supported language families.

use eraser_scanner::{build_ignore_ranges, IgnoreFlags};

const COMMENTS: IgnoreFlags = IgnoreFlags {
    ignore_in_comments: true,
    ignore_in_strings: false,
    ignore_markdown: false,
};

const STRINGS: IgnoreFlags = IgnoreFlags {
    ignore_in_comments: false,
    ignore_in_strings: true,
    ignore_markdown: false,
};

const BOTH: IgnoreFlags = IgnoreFlags {
    ignore_in_comments: true,
    ignore_in_strings: true,
    ignore_markdown: false,
};

/// Helper: scan and return the merged ranges as `(start, end)` pairs.
fn scan(text: &str, language_id: &str, flags: IgnoreFlags) -> Vec<(u32, u32)> {
    build_ignore_ranges(text, language_id, flags)
        .iter()
        .map(|r| (r.start, r.end))
        .collect()
}

/// Helper: the ignored slices of `text`.
fn ignored<'t>(text: &'t str, language_id: &str, flags: IgnoreFlags) -> Vec<&'t str> {
    build_ignore_ranges(text, language_id, flags)
        .iter()
        .map(|r| &text[r.to_range()])
        .collect()
}

// ============================================================================
// Markdown
// ============================================================================

#[test]
fn test_markdown_is_ignored_as_a_whole() {
    let text = "# Title \u{1F600}\n\nBody";
    let flags = IgnoreFlags {
        ignore_in_comments: false,
        ignore_in_strings: false,
        ignore_markdown: true,
    };
    assert_eq!(scan(text, "markdown", flags), vec![(0, text.len() as u32)]);
    assert_eq!(scan(text, "MDX", flags), vec![(0, text.len() as u32)]);
}

#[test]
fn test_markdown_disabled_ignores_nothing() {
    // Comment and string flags do not apply to Markdown.
    let text = "<!-- note --> \"quoted\"";
    assert!(scan(text, "markdown", BOTH).is_empty());
}

#[test]
fn test_empty_markdown_has_no_ranges() {
    assert!(scan("", "markdown", IgnoreFlags::default()).is_empty());
}

// ============================================================================
// Flags
// ============================================================================

#[test]
fn test_no_flags_no_ranges() {
    let flags = IgnoreFlags {
        ignore_in_comments: false,
        ignore_in_strings: false,
        ignore_markdown: true,
    };
    assert!(scan("// comment \"string\"", "javascript", flags).is_empty());
}

#[test]
fn test_strings_not_ignored_when_only_comments_enabled() {
    assert_eq!(ignored("x = \"a\" // b", "javascript", COMMENTS), vec!["// b"]);
}

#[test]
fn test_comments_not_ignored_when_only_strings_enabled() {
    assert_eq!(ignored("x = \"a\" // b", "javascript", STRINGS), vec!["\"a\""]);
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_line_comment_stops_before_newline() {
    let text = "// \u{1F600}\ncode";
    let newline = text.find('\n').unwrap() as u32;
    assert_eq!(scan(text, "javascript", COMMENTS), vec![(0, newline)]);
}

#[test]
fn test_block_comment_includes_closing_marker() {
    assert_eq!(ignored("a /* b */ c", "c", COMMENTS), vec!["/* b */"]);
}

#[test]
fn test_block_comments_do_not_nest() {
    assert_eq!(ignored("/* a /* b */ c */", "c", COMMENTS), vec!["/* a /* b */"]);
}

#[test]
fn test_unterminated_block_comment_runs_to_end() {
    assert_eq!(ignored("x /* open", "c", COMMENTS), vec!["/* open"]);
}

#[test]
fn test_html_comments() {
    let text = "<p>hi</p><!-- \u{1F600} --><b>";
    assert_eq!(ignored(text, "html", COMMENTS), vec!["<!-- \u{1F600} -->"]);
    // No line comments in markup.
    assert!(scan("// not a comment", "xml", COMMENTS).is_empty());
}

#[test]
fn test_hash_comments() {
    assert_eq!(ignored("a: 1 # note\nb: 2", "yaml", COMMENTS), vec!["# note"]);
    assert_eq!(ignored("echo hi # note", "shellscript", COMMENTS), vec!["# note"]);
}

#[test]
fn test_sql_comments() {
    let text = "SELECT 1 -- one\n/* two */ SELECT 2";
    assert_eq!(ignored(text, "sql", COMMENTS), vec!["-- one", "/* two */"]);
}

#[test]
fn test_css_has_no_line_comments() {
    let text = "a { color: red; } /* c */ // d";
    assert_eq!(ignored(text, "css", COMMENTS), vec!["/* c */"]);
}

#[test]
fn test_lua_block_comment_takes_priority_over_line() {
    let text = "--[[ a\nb ]] x -- c";
    assert_eq!(ignored(text, "lua", COMMENTS), vec!["--[[ a\nb ]]", "-- c"]);
}

#[test]
fn test_haskell_comments() {
    let text = "{- a -} x = 1 -- b\ny = 2 // not a comment";
    assert_eq!(ignored(text, "haskell", COMMENTS), vec!["{- a -}", "-- b"]);
}

#[test]
fn test_unknown_language_uses_c_like_syntax() {
    assert_eq!(ignored("x // y", "some-new-language", COMMENTS), vec!["// y"]);
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_unterminated_string_runs_to_end() {
    assert_eq!(scan("\"abc", "javascript", STRINGS), vec![(0, 4)]);
}

#[test]
fn test_escaped_quote_does_not_close_string() {
    // ' \ ' ' <emoji>: the escaped quote is skipped, the next one closes.
    let text = "'\\''\u{1F600}";
    let ranges = build_ignore_ranges(text, "javascript", STRINGS);
    assert_eq!(ranges.as_slice().len(), 1);
    assert_eq!((ranges.as_slice()[0].start, ranges.as_slice()[0].end), (0, 4));
    assert!(!ranges.contains(4));

    // Without the escape rule the emoji would sit inside a second string.
    let text = "'\\'\u{1F600}'";
    let ranges = build_ignore_ranges(text, "javascript", STRINGS);
    assert!(ranges.contains(3));
    assert_eq!(ranges.as_slice()[0].end as usize, text.len());
}

#[test]
fn test_comment_marker_inside_string_is_not_a_comment() {
    let text = "s = \"http://x\" // real";
    assert_eq!(ignored(text, "javascript", BOTH), vec!["\"http://x\"", "// real"]);
}

#[test]
fn test_quote_inside_comment_is_not_a_string() {
    let text = "// don't\nx = 'y'";
    assert_eq!(ignored(text, "javascript", BOTH), vec!["// don't", "'y'"]);
}

#[test]
fn test_backticks_only_for_languages_that_have_them() {
    let text = "x = `a` + y";
    assert_eq!(ignored(text, "typescript", STRINGS), vec!["`a`"]);
    assert!(scan(text, "c", STRINGS).is_empty());
    assert_eq!(ignored("echo `date`", "bash", STRINGS), vec!["`date`"]);
}

#[test]
fn test_python_triple_quotes() {
    let text = "x = \"\"\"doc \"quoted\" \\\"\"\"\ny = '''a'''";
    assert_eq!(
        ignored(text, "python", STRINGS),
        vec!["\"\"\"doc \"quoted\" \\\"\"\"", "'''a'''"]
    );
}

#[test]
fn test_triple_quotes_only_when_strings_ignored() {
    // With only comments ignored the docstring is code, and '#' inside it
    // still opens a comment.
    let text = "'''a # b'''\nc";
    assert_eq!(ignored(text, "python", COMMENTS), vec!["# b'''"]);
}

#[test]
fn test_adjacent_regions_are_merged() {
    let text = "'a''b'";
    assert_eq!(scan(text, "javascript", STRINGS), vec![(0, 6)]);
}

#[test]
fn test_multibyte_text_keeps_char_boundaries() {
    let text = "\u{00E9}\u{1F600} // \u{1F389} caf\u{00E9}\n'\u{2764}\u{FE0F}'";
    for slice in ignored(text, "rust", BOTH) {
        assert!(slice.starts_with("//") || slice.starts_with('\''));
    }
}
