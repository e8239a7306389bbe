//! Byte constants recognized by the scanner.
//!
//! Only ASCII delimiters are matched, so scanning UTF-8 bytes is exact:
//! multi-byte sequences never contain an ASCII byte.

pub const LINE_FEED: u8 = b'\n';
pub const SINGLE_QUOTE: u8 = b'\'';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const BACKTICK: u8 = b'`';
pub const BACKSLASH: u8 = b'\\';

pub const TRIPLE_SINGLE_QUOTE: &[u8] = b"'''";
pub const TRIPLE_DOUBLE_QUOTE: &[u8] = b"\"\"\"";
