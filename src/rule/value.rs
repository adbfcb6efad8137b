//! Scalar values and the data records rules are evaluated against

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use ahash::AHashMap;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

/// A literal in a comparison, or a value in a data record
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Coerce a literal token: integer first, then float, then a string with
    /// surrounding quote characters stripped
    ///
    /// Single underscores between digits are separators (`1_000`). `nan`,
    /// `inf` and `infinity` are floats.
    pub fn from_literal(token: &str) -> Self {
        let numeric = strip_digit_separators(token);

        if let Ok(i) = numeric.parse::<i64>() {
            return Scalar::Integer(i);
        }

        if let Ok(f) = numeric.parse::<f64>() {
            return Scalar::Float(f);
        }

        Scalar::String(token.trim_matches(|c| c == '\'' || c == '"').to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }

    /// Ordering of `self` relative to `other`
    ///
    /// The outer `None` means the pair is not comparable at all (string vs
    /// number). The inner `None` is an unordered float pair involving NaN.
    pub fn partial_order(&self, other: &Scalar) -> Option<Option<Ordering>> {
        let ordering = match (self, other) {
            (Scalar::Integer(a), Scalar::Integer(b)) => Some(a.cmp(b)),
            (Scalar::Integer(a), Scalar::Float(b)) => (*a as f64).partial_cmp(b),
            (Scalar::Float(a), Scalar::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Scalar::Float(a), Scalar::Float(b)) => a.partial_cmp(b),
            (Scalar::String(a), Scalar::String(b)) => Some(a.as_str().cmp(b.as_str())),
            _ => return None,
        };
        Some(ordering)
    }
}

/// `token` without its digit separators, or unchanged if any underscore is
/// not flanked by digits
fn strip_digit_separators(token: &str) -> Cow<'_, str> {
    if !token.contains('_') {
        return Cow::Borrowed(token);
    }

    let bytes = token.as_bytes();
    let is_digit_at = |i: Option<usize>| i.and_then(|i| bytes.get(i)).is_some_and(u8::is_ascii_digit);

    let mut stripped = String::with_capacity(token.len());
    for (i, c) in token.char_indices() {
        if c != '_' {
            stripped.push(c);
        } else if !(is_digit_at(i.checked_sub(1)) && is_digit_at(Some(i + 1))) {
            return Cow::Borrowed(token);
        }
    }
    Cow::Owned(stripped)
}

/// JSON has no NaN or infinity, so non-finite floats refuse to serialize
impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) if !f.is_finite() => Err(S::Error::custom(format!(
                "non-finite float {} has no JSON form",
                f
            ))),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{:?}", v),
            Scalar::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Integer(v.into())
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Integer(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::String(v)
    }
}

/// Key-value data a rule is evaluated against; read-only from the engine's side
pub trait Record {
    fn field(&self, name: &str) -> Option<&Scalar>;
}

impl<S: BuildHasher> Record for HashMap<String, Scalar, S> {
    #[inline]
    fn field(&self, name: &str) -> Option<&Scalar> {
        self.get(name)
    }
}

impl Record for AHashMap<String, Scalar> {
    #[inline]
    fn field(&self, name: &str) -> Option<&Scalar> {
        self.get(name)
    }
}

impl Record for BTreeMap<String, Scalar> {
    #[inline]
    fn field(&self, name: &str) -> Option<&Scalar> {
        self.get(name)
    }
}

impl<R: Record + ?Sized> Record for &R {
    #[inline]
    fn field(&self, name: &str) -> Option<&Scalar> {
        (**self).field(name)
    }
}
