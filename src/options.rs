//! Configuration for DTXT serialization and parsing limits.
//!
//! - [`WriteOptions`]: pretty-printer configuration (indent unit, key sorting)
//! - [`Limits`]: resource ceilings enforced during parsing
//!
//! Canonical output takes no configuration at all; [`WriteOptions`] only
//! affects the non-canonical pretty mode.
//!
//! ## Examples
//!
//! ```rust
//! use dtxt::{dtxt, to_string_with_options, WriteOptions};
//!
//! let value = dtxt!({ "b": 1, "a": 2 });
//! let opts = WriteOptions::new().with_indent("    ");
//! let text = to_string_with_options(&value, &opts).unwrap();
//! assert!(text.starts_with("{\n    a: 2,\n"));
//! ```

/// Pretty-printer configuration.
///
/// The indent unit is applied once per nesting level. Keys are sorted by
/// default for stable output; set `sort_keys` to `false` to keep insertion
/// order (canonical mode always sorts regardless).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    pub indent: String,
    pub sort_keys: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            indent: "  ".to_string(),
            sort_keys: true,
        }
    }
}

impl WriteOptions {
    /// Creates default pretty options (two-space indent, sorted keys).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation unit applied per nesting level.
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Controls whether pretty output sorts object keys.
    #[must_use]
    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }
}

/// Resource ceilings enforced while parsing.
///
/// Adversarial input is bounded in four dimensions; exceeding any ceiling is
/// reported as an ordinary [`ErrorKind::LimitExceeded`](crate::ErrorKind)
/// error, never a panic or stack overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum total input size in bytes.
    pub max_document_bytes: usize,
    /// Maximum object/array nesting depth.
    pub max_depth: usize,
    /// Maximum length of one identifier (key or constructor name) in bytes.
    pub max_identifier_bytes: usize,
    /// Maximum length of one constructor payload in bytes.
    pub max_payload_bytes: usize,
}

impl Limits {
    /// Default ceilings, sized for ordinary documents.
    pub const fn standard() -> Self {
        Self {
            max_document_bytes: 16 * 1024 * 1024, // 16 MiB
            max_depth: 128,
            max_identifier_bytes: 1024,
            max_payload_bytes: 64 * 1024, // 64 KiB
        }
    }

    #[must_use]
    pub fn with_max_document_bytes(mut self, n: usize) -> Self {
        self.max_document_bytes = n;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, n: usize) -> Self {
        self.max_depth = n;
        self
    }

    #[must_use]
    pub fn with_max_identifier_bytes(mut self, n: usize) -> Self {
        self.max_identifier_bytes = n;
        self
    }

    #[must_use]
    pub fn with_max_payload_bytes(mut self, n: usize) -> Self {
        self.max_payload_bytes = n;
        self
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::standard()
    }
}
