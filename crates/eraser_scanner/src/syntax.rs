//! Per-language comment and string syntax.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// Comment and string markers for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Line-comment openers, tried in order.
    pub line: &'static [&'static str],
    /// Block-comment `(open, close)` pairs, tried in order.
    pub block: &'static [(&'static str, &'static str)],
    /// Whether `` `...` `` is a string literal.
    pub backtick_strings: bool,
    /// Whether `'''...'''` and `"""..."""` are string literals.
    pub triple_quoted_strings: bool,
}

/// `//` and `/* */`, no backtick strings.
pub const C_LIKE: CommentSyntax = CommentSyntax {
    line: &["//"],
    block: &[("/*", "*/")],
    backtick_strings: false,
    triple_quoted_strings: false,
};

const JS_LIKE: CommentSyntax = CommentSyntax {
    backtick_strings: true,
    ..C_LIKE
};

const MARKUP: CommentSyntax = CommentSyntax {
    line: &[],
    block: &[("<!--", "-->")],
    backtick_strings: false,
    triple_quoted_strings: false,
};

const PYTHON: CommentSyntax = CommentSyntax {
    line: &["#"],
    block: &[],
    backtick_strings: false,
    triple_quoted_strings: true,
};

const HASH_COMMENTS: CommentSyntax = CommentSyntax {
    line: &["#"],
    block: &[],
    backtick_strings: true,
    triple_quoted_strings: false,
};

const SQL: CommentSyntax = CommentSyntax {
    line: &["--"],
    block: &[("/*", "*/")],
    backtick_strings: false,
    triple_quoted_strings: false,
};

const STYLESHEET: CommentSyntax = CommentSyntax {
    line: &[],
    block: &[("/*", "*/")],
    backtick_strings: false,
    triple_quoted_strings: false,
};

// Block openers are tried before line openers, so `--[[` wins over `--`.
const LUA: CommentSyntax = CommentSyntax {
    line: &["--"],
    block: &[("--[[", "]]")],
    backtick_strings: false,
    triple_quoted_strings: false,
};

const HASKELL: CommentSyntax = CommentSyntax {
    line: &["--"],
    block: &[("{-", "-}")],
    backtick_strings: false,
    triple_quoted_strings: false,
};

lazy_static! {
    static ref SYNTAX_TABLE: FxHashMap<&'static str, CommentSyntax> = {
        let entries: [(&[&'static str], CommentSyntax); 8] = [
            (&["html", "xml", "xhtml"], MARKUP),
            (&["python"], PYTHON),
            (&["shellscript", "bash", "sh", "yaml", "toml", "ruby"], HASH_COMMENTS),
            (&["sql"], SQL),
            (&["css", "scss", "less"], STYLESHEET),
            (
                &["javascript", "typescript", "javascriptreact", "typescriptreact"],
                JS_LIKE,
            ),
            (&["lua"], LUA),
            (&["haskell"], HASKELL),
        ];
        let mut table = FxHashMap::default();
        for (ids, syntax) in entries {
            for id in ids {
                table.insert(*id, syntax);
            }
        }
        table
    };
}

/// Whether a language identifier names a Markdown document.
pub fn is_markdown_language(language_id: &str) -> bool {
    language_id.eq_ignore_ascii_case("markdown") || language_id.eq_ignore_ascii_case("mdx")
}

/// Look up the syntax for a language identifier (case-insensitive).
///
/// Unknown identifiers get C-like syntax.
pub fn comment_syntax_for(language_id: &str) -> CommentSyntax {
    let id = language_id.to_ascii_lowercase();
    SYNTAX_TABLE.get(id.as_str()).copied().unwrap_or(C_LIKE)
}
