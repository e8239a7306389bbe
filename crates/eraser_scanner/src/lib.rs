//! eraser_scanner: Classifies the parts of a text buffer where emoji are
//! tolerated.
//!
//! A single left-to-right pass over the text recognizes comments, string
//! literals and (as a whole) Markdown documents, and produces the merged,
//! sorted list of "ignored" byte ranges. Lookups against that list are a
//! binary search.
//!
//! The scanner approximates each language's lexical rules with a small
//! table of comment and string markers:
//! - line comments close before the line feed
//! - block comments close on the marker recorded when they opened (no nesting)
//! - quoted strings honor backslash escapes, triple-quoted strings do not
//! - anything unterminated is ignored through the end of the text

mod char_codes;
mod ranges;
mod scanner;
mod syntax;

pub use ranges::{is_offset_in_ranges, merge_ranges, IgnoreRange, IgnoreRanges};
pub use scanner::{build_ignore_ranges, IgnoreFlags};
pub use syntax::{comment_syntax_for, is_markdown_language, CommentSyntax};
