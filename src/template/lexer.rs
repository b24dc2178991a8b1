//! Lexer for template bodies using logos
//!
//! The body is split into literal runs and `[name]` placeholder candidates.
//! Whether a candidate is really substituted is decided by the document
//! parser, which knows the declared placeholder set.

use logos::Logos;

/// Byte range in a template body
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `[name]` with a name of letters, digits, `_`, `.` or `-`
    #[regex(r"\[[A-Za-z_][A-Za-z0-9_.-]*\]")]
    Placeholder,

    /// `\[`, `\]` or `\\`, rendered without the leading backslash
    #[regex(r"\\[\[\]\\]")]
    Escape,

    /// Anything up to the next bracket or backslash
    #[regex(r"[^\[\\]+")]
    Text,

    /// A bracket that does not open a placeholder (`[ ]`, `[]byte`)
    #[token("[")]
    OpenBracket,

    #[token("\\")]
    Backslash,
}

impl Token {
    /// Placeholder name for a `[name]` slice
    pub fn placeholder_name(slice: &str) -> &str {
        slice
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(slice)
    }
}

/// Tokenize a body into `(token, span)` pairs
///
/// Every byte of the input belongs to exactly one token, so concatenating
/// the slices reproduces the body.
pub fn lex(body: &str) -> Vec<(Token, Span)> {
    Token::lexer(body)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Text), span))
        .collect()
}
