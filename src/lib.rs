//! # dtxt
//!
//! Parser and canonical serializer for the DTXT data-interchange format.
//!
//! ## What is DTXT?
//!
//! DTXT is a compact, human-readable JSON superset with unquoted keys,
//! backtick-delimited strings, single-character boolean/null literals
//! (`T`/`F`/`N`), `//` comments, and typed constructor literals for values
//! JSON cannot carry losslessly:
//!
//! - `D(2024-03-15T10:30:00Z)` — ISO-8601 dates and date-times
//! - `BN(9007199254740993)` — arbitrary-precision integers
//! - `B(A7B2319E)` — binary blobs as hex
//!
//! Every document is a single object at the root. Strings have no escape
//! sequences: a backtick always terminates, so any other byte passes through
//! verbatim.
//!
//! ## Key Features
//!
//! - **Canonical form**: deterministic byte output (sorted keys, uppercase
//!   hex, normalized integers) suitable for hashing and signing
//! - **Exact numerics**: `BN(...)` values use [`num_bigint::BigInt`] and
//!   never round-trip through floating point
//! - **Typed errors**: a closed [`ErrorKind`] taxonomy, each error carrying
//!   the byte offset of the first violation
//! - **Bounded resources**: configurable [`Limits`] on document size,
//!   nesting depth, identifier length, and constructor payload size
//! - **No unsafe code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use dtxt::{parse, to_string, to_string_pretty};
//!
//! let doc = parse("{name: `Sample`, count: 42, active: T}").unwrap();
//! assert_eq!(doc.get("name").and_then(|v| v.as_str()), Some("Sample"));
//!
//! // Canonical form sorts keys and drops all whitespace.
//! assert_eq!(
//!     to_string(&doc).unwrap(),
//!     "{active:T,count:42,name:`Sample`}"
//! );
//!
//! // Pretty form is for humans; it round-trips through parse.
//! let pretty = to_string_pretty(&doc).unwrap();
//! assert_eq!(parse(&pretty).unwrap(), doc);
//! ```
//!
//! ## Building values programmatically
//!
//! ```rust
//! use dtxt::{dtxt, to_string};
//!
//! let doc = dtxt!({
//!     "active": true,
//!     "tags": ["a", "b"],
//! });
//! assert_eq!(to_string(&doc).unwrap(), "{active:T,tags:[`a`,`b`]}");
//! ```
//!
//! ## Concurrency
//!
//! Parsing and serialization are purely synchronous with no shared state:
//! each call owns its own scanner and its own tree, so independent calls may
//! run on any number of threads without coordination.

pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod value;

mod parser;
mod ser;
mod token;
mod tokenizer;

pub use error::{Error, ErrorKind, Result};
pub use map::Map;
pub use options::{Limits, WriteOptions};
pub use value::{Timestamp, Value};

use parser::Parser;
use ser::Serializer;

/// Parses one DTXT document into a [`Value`] tree rooted at an object.
///
/// # Examples
///
/// ```rust
/// use dtxt::parse;
///
/// let doc = parse("{greeting: `hi`}").unwrap();
/// assert!(doc.is_object());
/// ```
///
/// # Errors
///
/// Returns the first violation found, with its kind and byte offset. See
/// [`ErrorKind`] for the closed taxonomy.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(input: &str) -> Result<Value> {
    parse_with_limits(input, Limits::standard())
}

/// Parses one DTXT document with caller-supplied resource ceilings.
///
/// # Examples
///
/// ```rust
/// use dtxt::{parse_with_limits, ErrorKind, Limits};
///
/// let limits = Limits::standard().with_max_depth(2);
/// let err = parse_with_limits("{a: {b: {c: 1}}}", limits).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::LimitExceeded);
/// ```
///
/// # Errors
///
/// Syntax violations and exceeded limits are reported the same way; neither
/// panics, and a failed parse never affects later calls.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_limits(input: &str, limits: Limits) -> Result<Value> {
    Parser::new(input, limits)?.parse_document()
}

/// Parses one DTXT document from raw bytes, checking UTF-8 first.
///
/// # Examples
///
/// ```rust
/// use dtxt::{parse_slice, ErrorKind};
///
/// assert!(parse_slice(b"{a: 1}").is_ok());
/// let err = parse_slice(&[b'{', 0xFF, b'}']).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::MalformedUtf8);
/// ```
///
/// # Errors
///
/// Non-UTF-8 input fails with [`ErrorKind::MalformedUtf8`] at the offset of
/// the first invalid byte, before any token is produced.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(input: &[u8]) -> Result<Value> {
    let text = std::str::from_utf8(input)
        .map_err(|e| Error::new(ErrorKind::MalformedUtf8, e.valid_up_to()))?;
    parse(text)
}

/// Serializes a [`Value`] tree to canonical DTXT bytes.
///
/// Canonical form is deterministic: object keys are sorted by ascending
/// UTF-8 byte value, there is no whitespace, hex is uppercase, and
/// big-integer digits are normalized. Equal trees always produce identical
/// bytes regardless of insertion order.
///
/// # Errors
///
/// Fails with [`ErrorKind::UnsupportedValue`] on trees the format cannot
/// represent: NaN/infinite numbers, strings containing a backtick, or
/// object keys that are not identifiers.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(value: &Value) -> Result<String> {
    Serializer::canonical().serialize(value)
}

/// Serializes a [`Value`] tree as indented, human-editable DTXT.
///
/// Uses the default [`WriteOptions`]: two-space indent, sorted keys.
///
/// # Errors
///
/// Same unsupported-value rules as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty(value: &Value) -> Result<String> {
    to_string_with_options(value, &WriteOptions::default())
}

/// Serializes a [`Value`] tree as pretty DTXT with custom options.
///
/// # Examples
///
/// ```rust
/// use dtxt::{dtxt, to_string_with_options, WriteOptions};
///
/// let value = dtxt!({ "a": 1 });
/// let opts = WriteOptions::new().with_indent("    ");
/// assert_eq!(
///     to_string_with_options(&value, &opts).unwrap(),
///     "{\n    a: 1,\n}"
/// );
/// ```
///
/// # Errors
///
/// Same unsupported-value rules as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(value: &Value, options: &WriteOptions) -> Result<String> {
    Serializer::pretty(options).serialize(value)
}
