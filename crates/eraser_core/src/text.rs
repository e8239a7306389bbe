//! Text span and range types for source location tracking.
//!
//! Offsets are UTF-8 byte offsets into a single text buffer. Editors speak
//! in lines and UTF-16 columns; `LineMap` converts between the two.

use std::fmt;
use std::ops::Range;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: TextPos,
    /// The length of this span in bytes.
    pub length: TextPos,
}

impl TextSpan {
    /// Create a new text span.
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end positions.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    /// Whether this span is empty (zero-length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether this span contains the given position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// Whether this span shares at least one position with `other`, or
    /// touches it when either side is empty (an editor cursor).
    pub fn intersects(&self, other: &TextSpan) -> bool {
        self.start <= other.end() && other.start <= self.end()
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A half-open text range `[start, end)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TextRange {
    /// The byte offset where this range starts (inclusive).
    pub start: TextPos,
    /// The byte offset where this range ends (exclusive).
    pub end: TextPos,
}

impl TextRange {
    /// Create a new text range.
    #[inline]
    pub fn new(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self { start, end }
    }

    /// The length of this range in bytes.
    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.start
    }

    /// Whether this range is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Convert to a byte range.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Whether this range contains a position.
    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Line and column information derived from source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    /// 0-based line number.
    pub line: u32,
    /// 0-based column, in UTF-16 code units.
    pub character: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A map from byte offsets to line numbers, built from source text.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Get the line number (0-based) for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// Get the line and UTF-16 column for a byte offset.
    ///
    /// `text` must be the text the map was built from. Offsets past the end
    /// clamp to the end of the text.
    pub fn line_and_column_of(&self, text: &str, pos: TextPos) -> LineAndColumn {
        let pos = pos.min(text.len() as TextPos);
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize] as usize;
        let character = utf16_len(&text[line_start..floor_char_boundary(text, pos as usize)]);
        LineAndColumn { line, character }
    }

    /// Get the byte offset for a line and UTF-16 column.
    ///
    /// Columns past the end of a line clamp to the line end; lines past the
    /// end of the text clamp to the text end.
    pub fn offset_of(&self, text: &str, position: LineAndColumn) -> TextPos {
        let Some(&line_start) = self.line_starts.get(position.line as usize) else {
            return text.len() as TextPos;
        };
        let line_end = self
            .line_starts
            .get(position.line as usize + 1)
            .map(|&next| next as usize - 1)
            .unwrap_or(text.len());

        let mut units = 0u32;
        for (i, ch) in text[line_start as usize..line_end].char_indices() {
            if units >= position.character {
                return line_start + i as TextPos;
            }
            units += ch.len_utf16() as u32;
        }
        line_end as TextPos
    }
}

fn utf16_len(s: &str) -> u32 {
    s.chars().map(|ch| ch.len_utf16() as u32).sum()
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
