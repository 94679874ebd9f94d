//! The DTXT value model.
//!
//! [`Value`] is a closed sum type covering everything a DTXT document can
//! hold. Beyond the JSON-shaped variants it carries three typed constructor
//! values: arbitrary-precision integers ([`num_bigint::BigInt`]), binary
//! blobs, and timestamps ([`Timestamp`]).
//!
//! A tree is built wholesale by one parse call, is rooted at an
//! [`Value::Object`], and is owned by the caller from then on. Equality is
//! structural: objects compare order-insensitively, `BigInt` by exact
//! magnitude and sign, `Binary` by exact bytes.
//!
//! ## Examples
//!
//! ```rust
//! use dtxt::{parse, Value};
//!
//! let doc = parse("{count: 42, name: `Sample`}").unwrap();
//! assert_eq!(doc.get("count").and_then(Value::as_f64), Some(42.0));
//! assert_eq!(doc.get("name").and_then(Value::as_str), Some("Sample"));
//! ```

use crate::Map;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A point on the calendar, with or without a time-of-day component.
///
/// `D(...)` payloads that parse as a full RFC 3339 date-time become
/// [`Timestamp::DateTime`]; payloads shaped `YYYY-MM-DD` become
/// [`Timestamp::Date`]. Anything else falls back to a plain string value at
/// parse time and never reaches this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timestamp {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl Timestamp {
    /// Attempts the two recognized ISO-8601 shapes, date-time first.
    #[must_use]
    pub fn parse(payload: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(payload) {
            return Some(Timestamp::DateTime(dt.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(payload, "%Y-%m-%d")
            .ok()
            .map(Timestamp::Date)
    }

    /// The calendar date, dropping any time-of-day component.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Timestamp::Date(d) => *d,
            Timestamp::DateTime(dt) => dt.date_naive(),
        }
    }
}

impl fmt::Display for Timestamp {
    /// Canonical ISO-8601 rendering: `YYYY-MM-DD` for date-only values, full
    /// date-time with trailing `Z` otherwise, whole-second instants without a
    /// fractional part.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Timestamp::DateTime(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

/// Any valid DTXT value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// IEEE-754 double. Exact integers beyond 2^53 belong in [`Value::BigInt`].
    Number(f64),
    /// Raw text between backticks; never contains a backtick itself.
    String(String),
    /// Exact signed integer of unbounded magnitude, from `BN(...)`.
    BigInt(BigInt),
    /// Arbitrary bytes, from `B(...)` hex.
    Binary(Vec<u8>),
    /// Calendar date or instant, from `D(...)`.
    Timestamp(Timestamp),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value is a boolean.
    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns `true` if the value is a number.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the value is a big integer.
    #[inline]
    #[must_use]
    pub const fn is_bigint(&self) -> bool {
        matches!(self, Value::BigInt(_))
    }

    /// Returns `true` if the value is a binary blob.
    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    /// Returns `true` if the value is a timestamp.
    #[inline]
    #[must_use]
    pub const fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    /// Returns `true` if the value is an array.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the value is an object.
    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// If the value is a boolean, returns it.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a number, returns it.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a big integer, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Value::BigInt(n) => Some(n),
            _ => None,
        }
    }

    /// If the value is a binary blob, returns its bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is a timestamp, returns it.
    #[inline]
    #[must_use]
    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// If the value is an object, returns a reference to it.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up `key` if the value is an object.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|obj| obj.get(key))
    }

    /// Maps the tree into a shape a language-agnostic conformance harness can
    /// compare: constructor values become tagged strings (`$bigint:<digits>`,
    /// `$date:<YYYY-MM-DD>`, `$binary:<UPPERHEX>`) and object keys are
    /// re-sorted bytewise. Everything else is cloned as-is.
    #[must_use]
    pub fn normalized(&self) -> Value {
        match self {
            Value::BigInt(n) => Value::String(format!("$bigint:{}", n)),
            Value::Timestamp(ts) => {
                Value::String(format!("$date:{}", ts.date().format("%Y-%m-%d")))
            }
            Value::Binary(bytes) => {
                let mut hex = String::with_capacity(bytes.len() * 2 + 8);
                hex.push_str("$binary:");
                for b in bytes {
                    use std::fmt::Write;
                    let _ = write!(hex, "{:02X}", b);
                }
                Value::String(hex)
            }
            Value::Array(arr) => Value::Array(arr.iter().map(Value::normalized).collect()),
            Value::Object(obj) => {
                let mut keys: Vec<&String> = obj.keys().collect();
                keys.sort();
                Value::Object(
                    keys.into_iter()
                        .filter_map(|k| obj.get(k).map(|v| (k.clone(), v.normalized())))
                        .collect(),
                )
            }
            other => other.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::BigInt(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::BigInt(n) => n.serialize(serializer),
            Value::Binary(bytes) => serializer.serialize_bytes(bytes),
            Value::Timestamp(ts) => serializer.serialize_str(&ts.to_string()),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid DTXT value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                // Beyond 2^53 a double would silently round; promote instead.
                if value.unsigned_abs() <= (1u64 << 53) {
                    Ok(Value::Number(value as f64))
                } else {
                    Ok(Value::BigInt(BigInt::from(value)))
                }
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                if value <= (1u64 << 53) {
                    Ok(Value::Number(value as f64))
                } else {
                    Ok(Value::BigInt(BigInt::from(value)))
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E> {
                Ok(Value::Binary(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Value::Binary(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
