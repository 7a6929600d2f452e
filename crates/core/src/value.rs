//! Shared value objects.
//!
//! A [`Value`] is the engine's generic string object: an immutable byte
//! payload with an optional cached integer encoding. Values are reference
//! counted; containers own one logical reference per contained element, so
//! `Clone` takes a reference and `Drop` releases one.
//!
//! ## Integer encoding
//!
//! [`Value::encoded`] stores a byte sequence as `Int` when (and only when)
//! the bytes are the canonical decimal form of an `i64`. Canonical means the
//! bytes round-trip through formatting: no leading zeros, no `+` sign, no
//! `-0`, no surrounding whitespace. `b"17"` encodes as `Int(17)`; `b"017"`
//! stays raw bytes and is a different value.
//!
//! ## Equality
//!
//! Equality and hashing are semantic over the decimal byte form, so
//! `Int(17)` equals a raw `b"17"` payload and hashes identically. This is
//! what makes a hash-encoded set behave the same whether a member arrived as
//! an integer or as its printed form.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Parse a byte sequence as a canonical decimal `i64`.
///
/// Returns `None` unless the bytes round-trip through formatting, which
/// rejects leading zeros, a leading `+`, `-0`, empty input and anything out
/// of the `i64` range.
pub fn parse_i64_strict(bytes: &[u8]) -> Option<i64> {
    // "-9223372036854775808" is 20 bytes; anything longer cannot round-trip.
    if bytes.is_empty() || bytes.len() > 20 {
        return None;
    }
    let text = std::str::from_utf8(bytes).ok()?;
    let value: i64 = text.parse().ok()?;
    if value.to_string().as_bytes() == bytes {
        Some(value)
    } else {
        None
    }
}

/// A shared, immutable value object.
///
/// `Clone` is a refcount increment for the byte payload; `Int` is plain
/// copy. There is no interior mutability: once created, a value never
/// changes, which is what lets containers hand out borrowed views of their
/// elements.
#[derive(Debug, Clone)]
pub enum Value {
    /// Cached integer encoding of a decimal payload.
    Int(i64),
    /// Raw byte payload.
    Bytes(Rc<[u8]>),
}

impl Value {
    /// Create a value from wire bytes, applying the integer encoding when
    /// the payload is a canonical decimal integer.
    pub fn encoded(bytes: &[u8]) -> Self {
        match parse_i64_strict(bytes) {
            Some(v) => Value::Int(v),
            None => Value::Bytes(Rc::from(bytes)),
        }
    }

    /// Create a raw byte value without attempting the integer encoding.
    pub fn raw(bytes: &[u8]) -> Self {
        Value::Bytes(Rc::from(bytes))
    }

    /// The integer this value represents, if any.
    ///
    /// An `Int` value returns its payload directly; a byte value is
    /// strict-parsed, so `b"017"` is not representable.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Bytes(b) => parse_i64_strict(b),
        }
    }

    /// The raw byte payload, when this value is not integer encoded.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Int(_) => None,
            Value::Bytes(b) => Some(b),
        }
    }

    /// The decoded byte form of this value: the payload itself for raw
    /// values, the printed decimal for integer-encoded ones.
    pub fn to_decoded(&self) -> Vec<u8> {
        match self {
            Value::Int(v) => v.to_string().into_bytes(),
            Value::Bytes(b) => b.to_vec(),
        }
    }

    /// Byte length of the decoded form.
    pub fn decoded_len(&self) -> usize {
        match self {
            Value::Int(v) => decimal_width(*v),
            Value::Bytes(b) => b.len(),
        }
    }

    /// Whether this value carries the cached integer encoding.
    pub fn is_int_encoded(&self) -> bool {
        matches!(self, Value::Int(_))
    }
}

fn decimal_width(v: i64) -> usize {
    // Cheap digit count; only used for threshold checks, not formatting.
    let mut n = if v < 0 { 1 } else { 0 };
    let mut m = v.unsigned_abs();
    loop {
        n += 1;
        m /= 10;
        if m == 0 {
            break;
        }
    }
    n
}

fn int_eq_bytes(v: i64, bytes: &[u8]) -> bool {
    // Compare against the canonical decimal form, so b"017" != Int(17).
    matches!(parse_i64_strict(bytes), Some(parsed) if parsed == v)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Int(a), Value::Bytes(b)) | (Value::Bytes(b), Value::Int(a)) => {
                int_eq_bytes(*a, b)
            }
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the decoded byte form so semantic equals hash equal.
        match self {
            Value::Int(v) => state.write(v.to_string().as_bytes()),
            Value::Bytes(b) => state.write(b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::encoded(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::encoded(s.as_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::encoded(&b)
    }
}
