//! eraser_checker: Decides which emoji in a document get reported.
//!
//! Runs the detector over the whole text, builds the ignore ranges once,
//! and keeps every occurrence whose first byte is outside them.

mod checker;
mod fixes;

pub use checker::{find_reportable_emojis, Checker};
pub use fixes::{apply_edit, quick_fix_for, remove_all_edit, QuickFix, TextEdit};
