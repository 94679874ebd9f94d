//! Lexical tokens produced by the tokenizer.

/// One lexical token.
///
/// `offset` is the byte position of the token's first byte in the input,
/// carried through to parse errors.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) offset: usize,
}

/// The kinds of token the DTXT grammar distinguishes.
///
/// Comments and whitespace are consumed by the scanner and never appear here.
/// The bare keywords `T`/`F`/`N` arrive as [`TokenKind::Identifier`]; only the
/// parser gives them literal meaning, and only in value position.
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum TokenKind {
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    Colon,
    Comma,
    /// String content with the delimiting backticks already stripped.
    String(String),
    /// The verbatim number lexeme; converted to `f64` by the parser.
    Number(String),
    /// A maximal run of ASCII letters, digits, and underscores.
    Identifier(String),
    /// A full `Name(payload)` span, split at the `(`.
    Constructor { name: String, payload: String },
    Eof,
}

impl TokenKind {
    /// Short description for error details.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            TokenKind::BraceOpen => "'{'",
            TokenKind::BraceClose => "'}'",
            TokenKind::BracketOpen => "'['",
            TokenKind::BracketClose => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::String(_) => "string",
            TokenKind::Number(_) => "number",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Constructor { .. } => "constructor",
            TokenKind::Eof => "end of input",
        }
    }
}
