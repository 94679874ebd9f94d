//! The DTXT recursive-descent parser.
//!
//! Consumes the token stream with exactly one token of lookahead and no
//! backtracking; the tokenizer's one-token classification resolves every
//! grammar ambiguity up front. The first structural violation aborts the
//! parse with a typed [`Error`](crate::Error).
//!
//! Grammar highlights the token stream alone cannot express:
//!
//! - The document root must be a single object; anything after it is
//!   trailing data.
//! - Duplicate keys fail eagerly, at the second occurrence.
//! - `T`/`F`/`N` are boolean/null literals only in value position; in key
//!   position they are ordinary identifiers.
//! - Constructor names form a closed set (`D`, `BN`, `B`) with per-type
//!   payload rules; empty payloads are always invalid.
//! - Nesting depth is counted explicitly against the configured ceiling so
//!   hostile inputs get a clean error instead of a blown stack.

use crate::error::{Error, ErrorKind, Result};
use crate::options::Limits;
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use crate::value::{Timestamp, Value};
use crate::Map;
use num_bigint::BigInt;

#[derive(Debug)]
pub(crate) struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    token: Token,
    limits: Limits,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str, limits: Limits) -> Result<Self> {
        if input.len() > limits.max_document_bytes {
            return Err(Error::with_detail(
                ErrorKind::LimitExceeded,
                0,
                "document size",
            ));
        }
        let mut tokenizer = Tokenizer::new(input, limits);
        let token = tokenizer.next_token()?;
        Ok(Parser {
            tokenizer,
            token,
            limits,
            depth: 0,
        })
    }

    /// Parses the single root object and verifies nothing follows it.
    pub(crate) fn parse_document(&mut self) -> Result<Value> {
        if self.token.kind != TokenKind::BraceOpen {
            return Err(Error::with_detail(
                ErrorKind::RootNotObject,
                self.token.offset,
                self.token.kind.describe(),
            ));
        }
        let root = self.parse_object()?;
        if self.token.kind != TokenKind::Eof {
            return Err(Error::with_detail(
                ErrorKind::TrailingData,
                self.token.offset,
                self.token.kind.describe(),
            ));
        }
        Ok(root)
    }

    fn bump(&mut self) -> Result<Token> {
        let next = self.tokenizer.next_token()?;
        Ok(std::mem::replace(&mut self.token, next))
    }

    fn enter(&mut self, offset: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > self.limits.max_depth {
            return Err(Error::with_detail(
                ErrorKind::LimitExceeded,
                offset,
                "nesting depth",
            ));
        }
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        match &self.token.kind {
            TokenKind::BraceOpen => self.parse_object(),
            TokenKind::BracketOpen => self.parse_array(),
            TokenKind::String(_) => {
                let tok = self.bump()?;
                match tok.kind {
                    TokenKind::String(s) => Ok(Value::String(s)),
                    _ => unreachable!("lookahead was a string"),
                }
            }
            TokenKind::Number(_) => {
                let tok = self.bump()?;
                match tok.kind {
                    // `from_str` saturates to infinity on overflow, which has
                    // no representation; treat it as a bad literal.
                    TokenKind::Number(lexeme) => match lexeme.parse::<f64>() {
                        Ok(n) if n.is_finite() => Ok(Value::Number(n)),
                        _ => Err(Error::with_detail(
                            ErrorKind::InvalidNumber,
                            tok.offset,
                            lexeme,
                        )),
                    },
                    _ => unreachable!("lookahead was a number"),
                }
            }
            TokenKind::Identifier(name) => match name.as_str() {
                "T" => {
                    self.bump()?;
                    Ok(Value::Bool(true))
                }
                "F" => {
                    self.bump()?;
                    Ok(Value::Bool(false))
                }
                "N" => {
                    self.bump()?;
                    Ok(Value::Null)
                }
                other => Err(Error::with_detail(
                    ErrorKind::UnexpectedCharacter,
                    self.token.offset,
                    format!("identifier `{}` in value position", other),
                )),
            },
            TokenKind::Constructor { .. } => {
                let tok = self.bump()?;
                match tok.kind {
                    TokenKind::Constructor { name, payload } => {
                        self.parse_constructor(&name, &payload, tok.offset)
                    }
                    _ => unreachable!("lookahead was a constructor"),
                }
            }
            TokenKind::Eof => Err(Error::new(
                ErrorKind::UnterminatedStructure,
                self.token.offset,
            )),
            other => Err(Error::with_detail(
                ErrorKind::UnexpectedCharacter,
                self.token.offset,
                other.describe(),
            )),
        }
    }

    fn parse_object(&mut self) -> Result<Value> {
        let open = self.bump()?; // consume '{'
        self.enter(open.offset)?;
        let mut map = Map::new();

        loop {
            match &self.token.kind {
                TokenKind::BraceClose => break,
                TokenKind::Eof => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedStructure,
                        self.token.offset,
                    ))
                }
                TokenKind::Identifier(_) => {}
                // An all-digit key scans as a number token, since only the
                // byte after it separates the two grammars. It is still an
                // identifier; fractional, signed, or exponent lexemes are not.
                TokenKind::Number(lexeme)
                    if lexeme.bytes().all(|b| b.is_ascii_digit()) => {}
                other => {
                    return Err(Error::with_detail(
                        ErrorKind::InvalidIdentifier,
                        self.token.offset,
                        other.describe(),
                    ))
                }
            }

            let key_tok = self.bump()?;
            let key = match key_tok.kind {
                TokenKind::Identifier(name) | TokenKind::Number(name) => name,
                _ => unreachable!("lookahead was a key"),
            };
            if map.contains_key(&key) {
                return Err(Error::with_detail(
                    ErrorKind::DuplicateKey,
                    key_tok.offset,
                    key,
                ));
            }

            if self.token.kind != TokenKind::Colon {
                return Err(Error::with_detail(
                    ErrorKind::MissingColon,
                    self.token.offset,
                    self.token.kind.describe(),
                ));
            }
            self.bump()?;

            let value = self.parse_value()?;
            map.insert(key, value);

            match self.token.kind {
                TokenKind::Comma => {
                    self.bump()?;
                }
                TokenKind::BraceClose => break,
                TokenKind::Eof => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedStructure,
                        self.token.offset,
                    ))
                }
                _ => {
                    return Err(Error::with_detail(
                        ErrorKind::MissingCommaOrClose,
                        self.token.offset,
                        self.token.kind.describe(),
                    ))
                }
            }
        }

        self.bump()?; // consume '}'
        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value> {
        let open = self.bump()?; // consume '['
        self.enter(open.offset)?;
        let mut elements = Vec::new();

        loop {
            match self.token.kind {
                TokenKind::BracketClose => break,
                TokenKind::Eof => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedStructure,
                        self.token.offset,
                    ))
                }
                _ => {}
            }

            elements.push(self.parse_value()?);

            match self.token.kind {
                TokenKind::Comma => {
                    self.bump()?;
                }
                TokenKind::BracketClose => break,
                TokenKind::Eof => {
                    return Err(Error::new(
                        ErrorKind::UnterminatedStructure,
                        self.token.offset,
                    ))
                }
                _ => {
                    return Err(Error::with_detail(
                        ErrorKind::MissingCommaOrClose,
                        self.token.offset,
                        self.token.kind.describe(),
                    ))
                }
            }
        }

        self.bump()?; // consume ']'
        self.depth -= 1;
        Ok(Value::Array(elements))
    }

    fn parse_constructor(&mut self, name: &str, payload: &str, offset: usize) -> Result<Value> {
        if payload.is_empty() {
            return Err(Error::with_detail(
                ErrorKind::InvalidConstructorPayload,
                offset,
                format!("{}()", name),
            ));
        }
        match name {
            // Permissive: the format recognizes the two ISO-8601 shapes but
            // does not validate further; anything else stays a plain string.
            "D" => Ok(match Timestamp::parse(payload) {
                Some(ts) => Value::Timestamp(ts),
                None => Value::String(payload.to_string()),
            }),
            "BN" => parse_bigint(payload)
                .map(Value::BigInt)
                .ok_or_else(|| {
                    Error::with_detail(ErrorKind::InvalidConstructorPayload, offset, payload)
                }),
            "B" => decode_hex(payload).map(Value::Binary).ok_or_else(|| {
                Error::with_detail(ErrorKind::InvalidConstructorPayload, offset, payload)
            }),
            _ => Err(Error::with_detail(
                ErrorKind::UnknownConstructor,
                offset,
                name,
            )),
        }
    }
}

/// `BN` payloads must be exactly `-?[0-9]+`; `BigInt` itself would also take
/// a leading `+`, which the format does not.
fn parse_bigint(payload: &str) -> Option<BigInt> {
    let digits = payload.strip_prefix('-').unwrap_or(payload);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    payload.parse::<BigInt>().ok()
}

/// Case-insensitive hex, two digits per byte. Odd lengths are invalid; there
/// is no padding rule.
fn decode_hex(payload: &str) -> Option<Vec<u8>> {
    let bytes = payload.as_bytes();
    if bytes.len() % 2 != 0 {
        return None;
    }
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let hi = (pair[0] as char).to_digit(16)?;
        let lo = (pair[1] as char).to_digit(16)?;
        out.push((hi * 16 + lo) as u8);
    }
    Some(out)
}
