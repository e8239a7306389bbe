//! The span scanner: one pass over the text, one state at a time.

use crate::char_codes::*;
use crate::ranges::{merge_ranges, IgnoreRange, IgnoreRanges};
use crate::syntax::{comment_syntax_for, is_markdown_language, CommentSyntax};
use eraser_core::text::TextPos;
use memchr::{memchr, memchr2, memmem};

/// Which kinds of text are excluded from emoji reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgnoreFlags {
    pub ignore_in_comments: bool,
    pub ignore_in_strings: bool,
    /// Markdown documents are ignored as a whole, or not at all.
    pub ignore_markdown: bool,
}

impl Default for IgnoreFlags {
    fn default() -> Self {
        Self {
            ignore_in_comments: true,
            ignore_in_strings: false,
            ignore_markdown: true,
        }
    }
}

/// Scanner state. Every variant but `Code` remembers where its region began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    LineComment { start: usize },
    /// `close` is the marker paired with the opener that was matched.
    BlockComment { start: usize, close: &'static str },
    SingleQuoteString { start: usize },
    DoubleQuoteString { start: usize },
    BacktickString { start: usize },
    TripleSingleQuoteString { start: usize },
    TripleDoubleQuoteString { start: usize },
}

impl ScanState {
    fn region_start(self) -> Option<usize> {
        match self {
            ScanState::Code => None,
            ScanState::LineComment { start }
            | ScanState::BlockComment { start, .. }
            | ScanState::SingleQuoteString { start }
            | ScanState::DoubleQuoteString { start }
            | ScanState::BacktickString { start }
            | ScanState::TripleSingleQuoteString { start }
            | ScanState::TripleDoubleQuoteString { start } => Some(start),
        }
    }
}

/// Compute the merged ignore ranges of `text` for a language.
///
/// Markdown (`markdown`, `mdx`) is all-or-nothing and depends on
/// `ignore_markdown` alone. Every other language runs the comment/string
/// scanner. Offsets are byte offsets; the text must be shorter than 4 GiB.
pub fn build_ignore_ranges(text: &str, language_id: &str, flags: IgnoreFlags) -> IgnoreRanges {
    if is_markdown_language(language_id) {
        if flags.ignore_markdown && !text.is_empty() {
            return merge_ranges(vec![IgnoreRange::new(0, text.len() as TextPos)]);
        }
        return IgnoreRanges::new();
    }

    if !flags.ignore_in_comments && !flags.ignore_in_strings {
        return IgnoreRanges::new();
    }

    let syntax = comment_syntax_for(language_id);
    let raw = scan_regions(text.as_bytes(), &syntax, flags);
    let ranges = merge_ranges(raw);
    tracing::trace!(
        language_id,
        text_len = text.len(),
        ranges = ranges.len(),
        "built ignore ranges"
    );
    ranges
}

fn region(start: usize, end: usize) -> IgnoreRange {
    IgnoreRange::new(start as TextPos, end as TextPos)
}

/// Walk `text` once and collect the raw (unmerged) ignored regions.
fn scan_regions(text: &[u8], syntax: &CommentSyntax, flags: IgnoreFlags) -> Vec<IgnoreRange> {
    let mut ranges = Vec::new();
    let mut state = ScanState::Code;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        state = match state {
            ScanState::Code => match open_region(rest, pos, syntax, flags) {
                Some((next, opener_len)) => {
                    pos += opener_len;
                    next
                }
                None => {
                    pos += 1;
                    ScanState::Code
                }
            },

            // The line feed stays outside the comment.
            ScanState::LineComment { start } => match memchr(LINE_FEED, rest) {
                Some(n) => {
                    pos += n;
                    ranges.push(region(start, pos));
                    ScanState::Code
                }
                None => {
                    pos = text.len();
                    state
                }
            },

            ScanState::BlockComment { start, close } => {
                match find_closing(rest, close.as_bytes()) {
                    Some(end) => {
                        pos += end;
                        ranges.push(region(start, pos));
                        ScanState::Code
                    }
                    None => {
                        pos = text.len();
                        state
                    }
                }
            }

            ScanState::TripleSingleQuoteString { start }
            | ScanState::TripleDoubleQuoteString { start } => {
                let close = if matches!(state, ScanState::TripleSingleQuoteString { .. }) {
                    TRIPLE_SINGLE_QUOTE
                } else {
                    TRIPLE_DOUBLE_QUOTE
                };
                match find_closing(rest, close) {
                    Some(end) => {
                        pos += end;
                        ranges.push(region(start, pos));
                        ScanState::Code
                    }
                    None => {
                        pos = text.len();
                        state
                    }
                }
            }

            ScanState::SingleQuoteString { start }
            | ScanState::DoubleQuoteString { start }
            | ScanState::BacktickString { start } => {
                let quote = match state {
                    ScanState::SingleQuoteString { .. } => SINGLE_QUOTE,
                    ScanState::DoubleQuoteString { .. } => DOUBLE_QUOTE,
                    _ => BACKTICK,
                };
                match memchr2(BACKSLASH, quote, rest) {
                    // An escape swallows the next byte, even past the end.
                    Some(n) if rest[n] == BACKSLASH => {
                        pos += n + 2;
                        state
                    }
                    Some(n) => {
                        pos += n + 1;
                        ranges.push(region(start, pos));
                        ScanState::Code
                    }
                    None => {
                        pos = text.len();
                        state
                    }
                }
            }
        };
    }

    // Unterminated comments and strings run to the end of the text.
    if let Some(start) = state.region_start() {
        ranges.push(region(start, text.len()));
    }

    ranges
}

/// Offset just past the first occurrence of `marker` in `haystack`.
fn find_closing(haystack: &[u8], marker: &[u8]) -> Option<usize> {
    memmem::find(haystack, marker).map(|n| n + marker.len())
}

/// Try to open a region at `pos`. Returns the new state and the opener length.
///
/// Priority: triple quotes, block comments, line comments, single-character
/// quotes. Within a group, markers are tried in table order.
fn open_region(
    rest: &[u8],
    pos: usize,
    syntax: &CommentSyntax,
    flags: IgnoreFlags,
) -> Option<(ScanState, usize)> {
    if syntax.triple_quoted_strings && flags.ignore_in_strings {
        if rest.starts_with(TRIPLE_SINGLE_QUOTE) {
            return Some((ScanState::TripleSingleQuoteString { start: pos }, 3));
        }
        if rest.starts_with(TRIPLE_DOUBLE_QUOTE) {
            return Some((ScanState::TripleDoubleQuoteString { start: pos }, 3));
        }
    }

    if flags.ignore_in_comments {
        for &(open, close) in syntax.block {
            if !open.is_empty() && rest.starts_with(open.as_bytes()) {
                return Some((ScanState::BlockComment { start: pos, close }, open.len()));
            }
        }
        for open in syntax.line {
            if !open.is_empty() && rest.starts_with(open.as_bytes()) {
                return Some((ScanState::LineComment { start: pos }, open.len()));
            }
        }
    }

    if flags.ignore_in_strings {
        match rest[0] {
            SINGLE_QUOTE => return Some((ScanState::SingleQuoteString { start: pos }, 1)),
            DOUBLE_QUOTE => return Some((ScanState::DoubleQuoteString { start: pos }, 1)),
            BACKTICK if syntax.backtick_strings => {
                return Some((ScanState::BacktickString { start: pos }, 1))
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::C_LIKE;

    const ALL: IgnoreFlags = IgnoreFlags {
        ignore_in_comments: true,
        ignore_in_strings: true,
        ignore_markdown: true,
    };

    fn raw(text: &str) -> Vec<(usize, usize)> {
        scan_regions(text.as_bytes(), &C_LIKE, ALL)
            .into_iter()
            .map(|r| (r.start as usize, r.end as usize))
            .collect()
    }

    #[test]
    fn test_region_start() {
        assert_eq!(ScanState::Code.region_start(), None);
        let state = ScanState::BlockComment { start: 4, close: "*/" };
        assert_eq!(state.region_start(), Some(4));
    }

    #[test]
    fn test_raw_regions_are_emitted_in_order() {
        assert_eq!(raw("a /* b */ 'c' // d"), vec![(2, 9), (10, 13), (14, 18)]);
    }

    #[test]
    fn test_block_close_must_follow_open() {
        // "/*/" does not close itself.
        assert_eq!(raw("/*/ x"), vec![(0, 5)]);
    }

    #[test]
    fn test_trailing_backslash_runs_to_end() {
        assert_eq!(raw("\"ab\\"), vec![(0, 4)]);
    }
}
