//! eraser_emoji: Finds emoji in text.
//!
//! The detector is a single Unicode-aware regular expression. It matches
//! whole emoji sequences (skin-tone modifiers, ZWJ sequences, keycaps,
//! flags and tag sequences) so that removing a match never leaves a
//! dangling joiner or variation selector behind.

use eraser_core::text::{TextPos, TextSpan};
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

/// One emoji base: a pictograph in either presentation (a bare text-default
/// symbol such as U+2764 counts), with an optional U+FE0F, followed by an
/// optional skin tone or tag sequence. The ASCII keycap bases are only
/// matched as part of a keycap sequence.
const EMOJI_BASE: &str = r"[\p{Emoji_Presentation}\p{Extended_Pictographic}]\x{FE0F}?(?:\p{Emoji_Modifier}|[\x{E0020}-\x{E007E}]+\x{E007F})?";

/// A pictograph that follows a zero-width joiner.
const ZWJ_ELEMENT: &str = r"\x{200D}\p{Extended_Pictographic}\x{FE0F}?\p{Emoji_Modifier}?";

lazy_static! {
    static ref EMOJI_RE: Regex = {
        let pattern = format!(
            r"\p{{Regional_Indicator}}{{2}}|[#*0-9]\x{{FE0F}}?\x{{20E3}}|{EMOJI_BASE}(?:{ZWJ_ELEMENT})*"
        );
        // The pattern is a compile-time constant; failure is a programming error.
        Regex::new(&pattern).expect("emoji pattern is valid")
    };
}

/// One detected emoji: its byte span in the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiOccurrence {
    pub start: TextPos,
    pub length: TextPos,
}

impl EmojiOccurrence {
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.start, self.length)
    }
}

/// Iterate over the emoji in `text`, left to right, non-overlapping.
pub fn find_emojis(text: &str) -> impl Iterator<Item = EmojiOccurrence> + '_ {
    EMOJI_RE.find_iter(text).map(|m| EmojiOccurrence {
        start: m.start() as TextPos,
        length: m.len() as TextPos,
    })
}

/// Delete every emoji in `text`.
///
/// Borrowed when nothing matched, so callers can tell "unchanged" apart
/// without comparing strings.
pub fn remove_emojis(text: &str) -> Cow<'_, str> {
    EMOJI_RE.replace_all(text, "")
}
