//! Error types for DTXT parsing and serialization.
//!
//! Every failure surfaces as an [`Error`] carrying one of a closed set of
//! [`ErrorKind`]s plus the byte offset where the violation was detected and,
//! where it helps, the offending text. Parsing stops at the first violation;
//! there is no recovery mode, and a failed parse never affects later calls.
//!
//! ## Examples
//!
//! ```rust
//! use dtxt::{parse, ErrorKind};
//!
//! let err = parse("{a: 1, a: 2}").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::DuplicateKey);
//! assert_eq!(err.detail(), Some("a"));
//! ```

use std::fmt;
use thiserror::Error;

/// The closed set of DTXT failure kinds.
///
/// Tokenizer, parser, and serializer all report through this one taxonomy so
/// callers can match on a stable set of variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Input bytes are not valid UTF-8.
    #[error("malformed UTF-8")]
    MalformedUtf8,
    /// A byte no lexical rule matches, or a token in an impossible position.
    #[error("unexpected character")]
    UnexpectedCharacter,
    /// A backtick string with no closing backtick before end of input.
    #[error("unterminated string")]
    UnterminatedString,
    /// Input ended inside an object, array, or constructor literal.
    #[error("unterminated structure")]
    UnterminatedStructure,
    /// The document root is not an object.
    #[error("root is not an object")]
    RootNotObject,
    /// The same key appeared twice within one object.
    #[error("duplicate key")]
    DuplicateKey,
    /// An object member key was not followed by `:`.
    #[error("missing ':' after key")]
    MissingColon,
    /// A member or element was not followed by `,` or the closing delimiter.
    #[error("missing ',' or closing delimiter")]
    MissingCommaOrClose,
    /// Something other than an identifier in key position.
    #[error("invalid identifier")]
    InvalidIdentifier,
    /// A number lexeme that does not convert to a finite IEEE-754 double,
    /// e.g. an exponent that overflows to infinity.
    #[error("invalid number")]
    InvalidNumber,
    /// A constructor type name outside the closed set (`D`, `BN`, `B`).
    #[error("unknown constructor")]
    UnknownConstructor,
    /// A constructor payload violating its type's payload rules, or empty.
    #[error("invalid constructor payload")]
    InvalidConstructorPayload,
    /// A `(` inside a constructor payload.
    #[error("nested constructor")]
    NestedConstructor,
    /// Tokens remaining after the root object closed.
    #[error("trailing data after root object")]
    TrailingData,
    /// A value tree the format cannot represent: NaN/infinite number, a
    /// string containing a backtick, or an object key that is not an
    /// identifier. Reported by serialization only.
    #[error("unsupported value")]
    UnsupportedValue,
    /// A configured resource ceiling was exceeded.
    #[error("resource limit exceeded")]
    LimitExceeded,
}

/// A DTXT parse or serialization error: kind, byte offset, optional detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
    detail: Option<String>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Error {
            kind,
            offset,
            detail: None,
        }
    }

    pub(crate) fn with_detail(kind: ErrorKind, offset: usize, detail: impl Into<String>) -> Self {
        Error {
            kind,
            offset,
            detail: Some(detail.into()),
        }
    }

    /// Serialization errors have no meaningful input offset.
    pub(crate) fn unsupported(detail: impl Into<String>) -> Self {
        Error::with_detail(ErrorKind::UnsupportedValue, 0, detail)
    }

    /// The kind of failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset into the input where the failure was detected.
    ///
    /// Zero for serialization errors, which have no input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The offending text, where one exists (e.g. the duplicated key or the
    /// unknown constructor name).
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.detail, self.kind) {
            (Some(d), ErrorKind::UnsupportedValue) => write!(f, "{}: {}", self.kind, d),
            (Some(d), _) => write!(f, "{} at byte {}: {}", self.kind, self.offset, d),
            (None, ErrorKind::UnsupportedValue) => write!(f, "{}", self.kind),
            (None, _) => write!(f, "{} at byte {}", self.kind, self.offset),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_offset_and_detail() {
        let err = Error::with_detail(ErrorKind::DuplicateKey, 7, "name");
        assert_eq!(err.to_string(), "duplicate key at byte 7: name");
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert_eq!(err.offset(), 7);
        assert_eq!(err.detail(), Some("name"));
    }

    #[test]
    fn test_unsupported_value_display_has_no_offset() {
        let err = Error::unsupported("number is NaN");
        assert_eq!(err.to_string(), "unsupported value: number is NaN");
    }
}
