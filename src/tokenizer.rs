//! The DTXT tokenizer.
//!
//! A stateless scanner constructed fresh for each parse. It turns a UTF-8
//! input into a stream of [`Token`]s, discarding whitespace and `//` comments
//! and failing fast on the first malformed byte. The parser pulls one token
//! at a time; the stream always ends with an explicit [`TokenKind::Eof`].
//!
//! The scanning rules are exact so independent implementations agree
//! byte-for-byte:
//!
//! - Strings run from one backtick to the next with no escapes; the closing
//!   backtick is purely a terminator.
//! - A number lexeme matches `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`
//!   and must not be immediately followed by an identifier character. This
//!   is what lets keys start with digits: `123abc` scans as an identifier,
//!   not a number with garbage after it.
//! - An identifier immediately followed by `(` becomes a constructor token
//!   spanning through the closing `)`. Whitespace or a second `(` inside the
//!   payload is a fatal scan error.

use crate::error::{Error, ErrorKind, Result};
use crate::options::Limits;
use crate::token::{Token, TokenKind};

#[inline]
pub(crate) fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[derive(Debug)]
pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    limits: Limits,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(input: &'a str, limits: Limits) -> Self {
        Tokenizer {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            limits,
        }
    }

    /// Scans and returns the next token. Idempotent at end of input: once
    /// exhausted it keeps returning `Eof`.
    pub(crate) fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;

        let offset = self.pos;
        let byte = match self.bytes.get(self.pos) {
            Some(&b) => b,
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    offset,
                })
            }
        };

        let kind = match byte {
            b'{' => {
                self.pos += 1;
                TokenKind::BraceOpen
            }
            b'}' => {
                self.pos += 1;
                TokenKind::BraceClose
            }
            b'[' => {
                self.pos += 1;
                TokenKind::BracketOpen
            }
            b']' => {
                self.pos += 1;
                TokenKind::BracketClose
            }
            b':' => {
                self.pos += 1;
                TokenKind::Colon
            }
            b',' => {
                self.pos += 1;
                TokenKind::Comma
            }
            b'`' => self.scan_string()?,
            b'-' | b'0'..=b'9' => match self.scan_number() {
                Some(end) => {
                    let lexeme = self.input[self.pos..end].to_string();
                    self.pos = end;
                    TokenKind::Number(lexeme)
                }
                // Digit-led runs that fail the number grammar (or its
                // trailing lookahead) are identifier candidates; a bare '-'
                // leads nowhere.
                None if byte != b'-' => self.scan_identifier()?,
                None => return Err(self.unexpected_character(offset)),
            },
            b if is_identifier_byte(b) => self.scan_identifier()?,
            _ => return Err(self.unexpected_character(offset)),
        };

        Ok(Token { kind, offset })
    }

    fn skip_trivia(&mut self) -> Result<()> {
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'/' if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    self.pos += 2;
                    while let Some(&c) = self.bytes.get(self.pos) {
                        self.pos += 1;
                        if c == b'\n' {
                            break;
                        }
                    }
                }
                b'/' => return Err(self.unexpected_character(self.pos)),
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_string(&mut self) -> Result<TokenKind> {
        let open = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'`' {
                let content = self.input[content_start..self.pos].to_string();
                self.pos += 1;
                return Ok(TokenKind::String(content));
            }
            self.pos += 1;
        }
        Err(Error::new(ErrorKind::UnterminatedString, open))
    }

    /// Matches the number grammar with its trailing negative lookahead.
    ///
    /// Returns the end offset of the longest grammar prefix (integer,
    /// integer+fraction, or integer+fraction+exponent) whose following byte
    /// is not an identifier character, mirroring how a backtracking regex
    /// resolves inputs like `1.5e` (number `1`, then an error at the dot).
    fn scan_number(&self) -> Option<usize> {
        let b = self.bytes;
        let mut i = self.pos;

        if b.get(i) == Some(&b'-') {
            i += 1;
        }
        match b.get(i) {
            Some(b'0') => i += 1,
            Some(b'1'..=b'9') => {
                while b.get(i).is_some_and(u8::is_ascii_digit) {
                    i += 1;
                }
            }
            _ => return None,
        }
        let int_end = i;

        let mut frac_end = None;
        if b.get(i) == Some(&b'.') && b.get(i + 1).is_some_and(u8::is_ascii_digit) {
            i += 2;
            while b.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
            frac_end = Some(i);
        }

        let mut exp_end = None;
        if matches!(b.get(i), Some(b'e') | Some(b'E')) {
            let mut j = i + 1;
            if matches!(b.get(j), Some(b'+') | Some(b'-')) {
                j += 1;
            }
            if b.get(j).is_some_and(u8::is_ascii_digit) {
                while b.get(j).is_some_and(u8::is_ascii_digit) {
                    j += 1;
                }
                exp_end = Some(j);
            }
        }

        [exp_end, frac_end, Some(int_end)]
            .into_iter()
            .flatten()
            .find(|&end| !b.get(end).copied().is_some_and(is_identifier_byte))
    }

    fn scan_identifier(&mut self) -> Result<TokenKind> {
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .copied()
            .is_some_and(is_identifier_byte)
        {
            self.pos += 1;
        }
        if self.pos - start > self.limits.max_identifier_bytes {
            return Err(Error::with_detail(
                ErrorKind::LimitExceeded,
                start,
                "identifier length",
            ));
        }
        let name = self.input[start..self.pos].to_string();

        if self.bytes.get(self.pos) == Some(&b'(') {
            return self.scan_constructor(start, name);
        }
        Ok(TokenKind::Identifier(name))
    }

    fn scan_constructor(&mut self, start: usize, name: String) -> Result<TokenKind> {
        self.pos += 1; // consume '('
        let payload_start = self.pos;
        loop {
            match self.bytes.get(self.pos) {
                None => return Err(Error::new(ErrorKind::UnterminatedStructure, start)),
                Some(b')') => break,
                Some(b'(') => return Err(Error::new(ErrorKind::NestedConstructor, self.pos)),
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    return Err(Error::with_detail(
                        ErrorKind::InvalidConstructorPayload,
                        self.pos,
                        "whitespace in constructor payload",
                    ))
                }
                Some(_) => self.pos += 1,
            }
        }
        if self.pos - payload_start > self.limits.max_payload_bytes {
            return Err(Error::with_detail(
                ErrorKind::LimitExceeded,
                start,
                "constructor payload length",
            ));
        }
        let payload = self.input[payload_start..self.pos].to_string();
        self.pos += 1; // consume ')'
        Ok(TokenKind::Constructor { name, payload })
    }

    fn unexpected_character(&self, offset: usize) -> Error {
        match self.input[offset..].chars().next() {
            Some(ch) => {
                Error::with_detail(ErrorKind::UnexpectedCharacter, offset, ch.to_string())
            }
            None => Error::new(ErrorKind::UnexpectedCharacter, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<TokenKind> {
        let mut tokenizer = Tokenizer::new(input, Limits::standard());
        let mut out = Vec::new();
        loop {
            let tok = tokenizer.next_token().unwrap();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                return out;
            }
        }
    }

    fn first_error(input: &str) -> Error {
        let mut tokenizer = Tokenizer::new(input, Limits::standard());
        loop {
            match tokenizer.next_token() {
                Ok(tok) if tok.kind == TokenKind::Eof => panic!("no error in {:?}", input),
                Ok(_) => continue,
                Err(e) => return e,
            }
        }
    }

    #[test]
    fn test_punctuation_and_eof() {
        assert_eq!(
            tokens("{}[],:"),
            vec![
                TokenKind::BraceOpen,
                TokenKind::BraceClose,
                TokenKind::BracketOpen,
                TokenKind::BracketClose,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_content_is_stripped() {
        assert_eq!(
            tokens("`hello world`"),
            vec![TokenKind::String("hello world".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            tokens("``"),
            vec![TokenKind::String(String::new()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_takes_anything_but_backtick() {
        // No escapes: braces, quotes, and non-ASCII all pass through.
        assert_eq!(
            tokens("`{\"a\": 1} \\n é`"),
            vec![
                TokenKind::String("{\"a\": 1} \\n é".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = first_error("  `abc");
        assert_eq!(err.kind(), ErrorKind::UnterminatedString);
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn test_number_lexemes() {
        for lexeme in ["0", "-0", "42", "-17", "3.25", "-0.5", "1e9", "2.5E-3", "6e+10"] {
            assert_eq!(
                tokens(lexeme),
                vec![TokenKind::Number(lexeme.to_string()), TokenKind::Eof],
                "lexeme {:?}",
                lexeme
            );
        }
    }

    #[test]
    fn test_digit_led_identifier_beats_number() {
        assert_eq!(
            tokens("123abc"),
            vec![TokenKind::Identifier("123abc".to_string()), TokenKind::Eof]
        );
        assert_eq!(
            tokens("0123"),
            vec![TokenKind::Identifier("0123".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_minus_without_number_is_rejected() {
        let err = first_error("-abc");
        assert_eq!(err.kind(), ErrorKind::UnexpectedCharacter);
        assert_eq!(err.offset(), 0);

        let err = first_error("-12abc");
        assert_eq!(err.kind(), ErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn test_partial_number_backtracks_like_the_grammar() {
        // "1.5e" cannot finish the exponent; the longest valid prefix whose
        // follow-byte passes the lookahead is "1", leaving the dot behind.
        let mut tokenizer = Tokenizer::new("1.5e", Limits::standard());
        let tok = tokenizer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Number("1".to_string()));
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedCharacter);
        assert_eq!(err.offset(), 1);
    }

    #[test]
    fn test_bare_keywords_are_plain_identifiers() {
        assert_eq!(
            tokens("T F N _"),
            vec![
                TokenKind::Identifier("T".to_string()),
                TokenKind::Identifier("F".to_string()),
                TokenKind::Identifier("N".to_string()),
                TokenKind::Identifier("_".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_constructor_capture() {
        assert_eq!(
            tokens("BN(-123)"),
            vec![
                TokenKind::Constructor {
                    name: "BN".to_string(),
                    payload: "-123".to_string(),
                },
                TokenKind::Eof,
            ]
        );
        // Empty payloads scan fine; the parser rejects them.
        assert_eq!(
            tokens("D()"),
            vec![
                TokenKind::Constructor {
                    name: "D".to_string(),
                    payload: String::new(),
                },
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_constructor_payload_rejects_whitespace_and_nesting() {
        let err = first_error("B(12 34)");
        assert_eq!(err.kind(), ErrorKind::InvalidConstructorPayload);
        assert_eq!(err.offset(), 4);

        let err = first_error("BN(BN(1))");
        assert_eq!(err.kind(), ErrorKind::NestedConstructor);

        let err = first_error("B(1234");
        assert_eq!(err.kind(), ErrorKind::UnterminatedStructure);
    }

    #[test]
    fn test_detached_paren_is_not_a_constructor() {
        // Whitespace between identifier and '(' breaks the constructor form.
        let mut tokenizer = Tokenizer::new("D (x)", Limits::standard());
        let tok = tokenizer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Identifier("D".to_string()));
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedCharacter);
    }

    #[test]
    fn test_comments_and_whitespace_are_discarded() {
        assert_eq!(
            tokens("// leading\n { // inner\n }\t\r\n// trailing"),
            vec![TokenKind::BraceOpen, TokenKind::BraceClose, TokenKind::Eof]
        );
    }

    #[test]
    fn test_lone_slash_is_rejected() {
        let err = first_error("{ / }");
        assert_eq!(err.kind(), ErrorKind::UnexpectedCharacter);
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn test_unexpected_byte_carries_offset_and_char() {
        let err = first_error("{a: @}");
        assert_eq!(err.kind(), ErrorKind::UnexpectedCharacter);
        assert_eq!(err.offset(), 4);
        assert_eq!(err.detail(), Some("@"));
    }

    #[test]
    fn test_identifier_length_limit() {
        let limits = Limits::standard().with_max_identifier_bytes(4);
        let mut tokenizer = Tokenizer::new("abcdef", limits);
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
        assert_eq!(err.detail(), Some("identifier length"));
    }

    #[test]
    fn test_payload_length_limit() {
        let limits = Limits::standard().with_max_payload_bytes(4);
        let mut tokenizer = Tokenizer::new("B(A1B2C3)", limits);
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LimitExceeded);
        assert_eq!(err.detail(), Some("constructor payload length"));
    }
}
