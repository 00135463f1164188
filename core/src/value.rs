//! Field values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value of a single record field.
///
/// Section parsers emit [`Value::Text`] (or [`Value::Null`] for a column that
/// is known to be empty); normalization turns integer-typed fields into
/// [`Value::Int`] or [`Value::Null`].
///
/// Serialized untagged, so a record renders as plain JSON scalars.
///
/// # Examples
///
/// ```
/// use netstat_schema_core::Value;
///
/// assert_eq!(serde_json::to_string(&Value::Int(7)).unwrap(), "7");
/// assert_eq!(serde_json::to_string(&Value::from("tcp")).unwrap(), "\"tcp\"");
/// assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

impl Value {
    /// Returns the string content for [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the integer content for [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Coerces the value to an integer field value.
    ///
    /// Integers are kept, text is parsed with [`parse_int`], and anything
    /// that does not parse becomes [`Value::Null`].
    ///
    /// # Examples
    ///
    /// ```
    /// use netstat_schema_core::Value;
    ///
    /// assert_eq!(Value::from(" 1").to_int(), Value::Int(1));
    /// assert_eq!(Value::from("N/A").to_int(), Value::Null);
    /// assert_eq!(Value::Int(3).to_int(), Value::Int(3));
    /// ```
    pub fn to_int(&self) -> Value {
        match self {
            Value::Int(n) => Value::Int(*n),
            Value::Text(text) => parse_int(text).map_or(Value::Null, Value::Int),
            Value::Null => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(text) => f.write_str(text),
            Value::Null => f.write_str("-"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Parses a decimal integer literal.
///
/// Surrounding whitespace and a single leading sign are accepted; anything
/// else (service names, `*`, empty strings) yields `None`. Values are bounded
/// to `i64`: out-of-range literals and digit separators (`1_000`) also yield
/// `None`.
///
/// # Examples
///
/// ```
/// use netstat_schema_core::parse_int;
///
/// assert_eq!(parse_int("52186"), Some(52186));
/// assert_eq!(parse_int(" 1607"), Some(1607));
/// assert_eq!(parse_int("ssh"), None);
/// assert_eq!(parse_int("*"), None);
/// ```
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
