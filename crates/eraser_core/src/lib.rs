//! eraser_core: Core text types shared by every emoji-eraser crate.
//!
//! Provides byte-offset spans and ranges, plus the line map used to turn
//! offsets into editor positions.

pub mod text;

// Re-export commonly used types
pub use text::{LineAndColumn, LineMap, TextPos, TextRange, TextSpan};
