//! DTXT serialization.
//!
//! Two modes share one per-variant encoding:
//!
//! - **Canonical**: no whitespace, object keys sorted by ascending UTF-8
//!   byte value, uppercase hex, normalized big-integer digits. Byte-identical
//!   for equal trees, which is what makes canonical form usable for hashing
//!   and signing.
//! - **Pretty**: one line per member/element, a caller-supplied indent unit
//!   per nesting level, trailing commas before closers, a space after each
//!   key's colon. Key sorting is on by default and configurable.
//!
//! Serialization fails only on trees the format cannot represent: NaN or
//! infinite numbers, strings containing a backtick, and object keys that are
//! not identifiers.

use crate::error::{Error, Result};
use crate::options::WriteOptions;
use crate::tokenizer::is_identifier_byte;
use crate::value::Value;
use std::fmt::Write;

pub(crate) struct Serializer<'o> {
    out: String,
    /// `None` is canonical mode; `Some` carries the pretty options.
    options: Option<&'o WriteOptions>,
}

impl<'o> Serializer<'o> {
    pub(crate) fn canonical() -> Self {
        Serializer {
            out: String::with_capacity(256),
            options: None,
        }
    }

    pub(crate) fn pretty(options: &'o WriteOptions) -> Self {
        Serializer {
            out: String::with_capacity(256),
            options: Some(options),
        }
    }

    pub(crate) fn serialize(mut self, value: &Value) -> Result<String> {
        self.write_value(value, 0)?;
        Ok(self.out)
    }

    fn push_indent(&mut self, level: usize) {
        if let Some(options) = self.options {
            for _ in 0..level {
                self.out.push_str(&options.indent);
            }
        }
    }

    /// Keys pass through bare, so a caller-built map can hold keys the
    /// grammar cannot spell. Those trees are unserializable, like backticked
    /// strings.
    fn write_key(&mut self, key: &str) -> Result<()> {
        if key.is_empty() || !key.bytes().all(is_identifier_byte) {
            return Err(Error::unsupported(format!(
                "key `{}` is not an identifier",
                key
            )));
        }
        self.out.push_str(key);
        Ok(())
    }

    fn sorted_keys<'v>(&self, obj: &'v crate::Map) -> Vec<&'v String> {
        let mut keys: Vec<&String> = obj.keys().collect();
        let sort = self.options.map_or(true, |o| o.sort_keys);
        if sort {
            // str ordering is bytewise over UTF-8, exactly the canonical rule.
            keys.sort();
        }
        keys
    }

    fn write_value(&mut self, value: &Value, level: usize) -> Result<()> {
        match value {
            Value::Null => self.out.push('N'),
            Value::Bool(true) => self.out.push('T'),
            Value::Bool(false) => self.out.push('F'),
            Value::Number(n) => {
                if !n.is_finite() {
                    return Err(Error::unsupported(format!(
                        "number {} has no DTXT representation",
                        n
                    )));
                }
                let _ = write!(self.out, "{}", n);
            }
            Value::String(s) => {
                if s.contains('`') {
                    return Err(Error::unsupported("string contains a backtick"));
                }
                self.out.push('`');
                self.out.push_str(s);
                self.out.push('`');
            }
            Value::BigInt(n) => {
                // BigInt's Display already strips leading zeros and folds -0.
                let _ = write!(self.out, "BN({})", n);
            }
            Value::Binary(bytes) => {
                self.out.push_str("B(");
                for b in bytes {
                    let _ = write!(self.out, "{:02X}", b);
                }
                self.out.push(')');
            }
            Value::Timestamp(ts) => {
                let _ = write!(self.out, "D({})", ts);
            }
            Value::Array(arr) => self.write_array(arr, level)?,
            Value::Object(obj) => self.write_object(obj, level)?,
        }
        Ok(())
    }

    fn write_array(&mut self, arr: &[Value], level: usize) -> Result<()> {
        if arr.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        if self.options.is_some() {
            self.out.push('\n');
            for element in arr {
                self.push_indent(level + 1);
                self.write_value(element, level + 1)?;
                self.out.push_str(",\n");
            }
            self.push_indent(level);
        } else {
            for (i, element) in arr.iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.write_value(element, level + 1)?;
            }
        }
        self.out.push(']');
        Ok(())
    }

    fn write_object(&mut self, obj: &crate::Map, level: usize) -> Result<()> {
        if obj.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        let keys = self.sorted_keys(obj);
        self.out.push('{');
        if self.options.is_some() {
            self.out.push('\n');
            for key in keys {
                self.push_indent(level + 1);
                self.write_key(key)?;
                self.out.push_str(": ");
                if let Some(value) = obj.get(key) {
                    self.write_value(value, level + 1)?;
                }
                self.out.push_str(",\n");
            }
            self.push_indent(level);
        } else {
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                self.write_key(key)?;
                self.out.push(':');
                if let Some(value) = obj.get(key) {
                    self.write_value(value, level + 1)?;
                }
            }
        }
        self.out.push('}');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        dtxt, to_string, to_string_pretty, to_string_with_options, ErrorKind, Map, Value,
        WriteOptions,
    };

    #[test]
    fn test_canonical_sorts_keys_bytewise() {
        let value = dtxt!({ "name": "Sample", "count": 42, "active": true });
        assert_eq!(
            to_string(&value).unwrap(),
            "{active:T,count:42,name:`Sample`}"
        );
    }

    #[test]
    fn test_canonical_scalars() {
        let value = dtxt!({ "n": null, "t": true, "f": false, "x": 2.5, "neg": (-3) });
        assert_eq!(to_string(&value).unwrap(), "{f:F,n:N,neg:-3,t:T,x:2.5}");
    }

    #[test]
    fn test_empty_containers_have_no_inner_whitespace() {
        let value = dtxt!({ "a": [], "o": {} });
        assert_eq!(to_string(&value).unwrap(), "{a:[],o:{}}");
        assert_eq!(
            to_string_pretty(&value).unwrap(),
            "{\n  a: [],\n  o: {},\n}"
        );
    }

    #[test]
    fn test_pretty_shape() {
        let value = dtxt!({ "b": [1, 2], "a": 1 });
        let expected = "{\n  a: 1,\n  b: [\n    1,\n    2,\n  ],\n}";
        assert_eq!(to_string_pretty(&value).unwrap(), expected);
    }

    #[test]
    fn test_pretty_can_keep_insertion_order() {
        let value = dtxt!({ "b": 1, "a": 2 });
        let opts = WriteOptions::new().with_sort_keys(false);
        assert_eq!(
            to_string_with_options(&value, &opts).unwrap(),
            "{\n  b: 1,\n  a: 2,\n}"
        );
    }

    #[test]
    fn test_custom_indent_unit() {
        let value = dtxt!({ "a": 1 });
        let opts = WriteOptions::new().with_indent("\t");
        assert_eq!(
            to_string_with_options(&value, &opts).unwrap(),
            "{\n\ta: 1,\n}"
        );
    }

    #[test]
    fn test_binary_always_uppercase() {
        let value = dtxt!({ "b": (Value::Binary(vec![0xA7, 0x00, 0xFF])) });
        assert_eq!(to_string(&value).unwrap(), "{b:B(A700FF)}");
    }

    #[test]
    fn test_nan_and_infinity_are_unsupported() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let value = dtxt!({ "x": bad });
            let err = to_string(&value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedValue);
        }
    }

    #[test]
    fn test_backtick_string_is_unsupported() {
        let value = dtxt!({ "s": "tick ` inside" });
        let err = to_string(&value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedValue);
    }

    #[test]
    fn test_non_identifier_keys_are_unsupported() {
        for key in ["user.name", "a b", "", "é"] {
            let mut map = Map::new();
            map.insert(key.to_string(), Value::Null);
            let value = Value::Object(map);
            for result in [to_string(&value), to_string_pretty(&value)] {
                let err = result.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::UnsupportedValue, "key {:?}", key);
            }
        }
    }
}
