//! Strongly typed structured fields.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use serde_json::{Map, Number};

/// Value carried by a [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
    Duration(Duration),
}

impl Value {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::I64(n) => serde_json::Value::from(*n),
            Self::U64(n) => serde_json::Value::from(*n),
            Self::F64(f) => float_to_json(*f),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::Duration(d) => float_to_json(d.as_secs_f64()),
        }
    }
}

// JSON has no NaN or infinity.
fn float_to_json(f: f64) -> serde_json::Value {
    match Number::from_f64(f) {
        Some(n) => serde_json::Value::Number(n),
        None => serde_json::Value::String(f.to_string()),
    }
}

/// A key/value pair attached to a log record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: Cow<'static, str>,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    pub fn i64(key: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::new(key, Value::I64(value))
    }

    pub fn u64(key: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::new(key, Value::U64(value))
    }

    pub fn f64(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, Value::F64(value))
    }

    pub fn str(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, Value::Str(value.into()))
    }

    /// Encoded as float seconds.
    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    /// Stores the `Display` rendering of `value`.
    pub fn display(key: impl Into<Cow<'static, str>>, value: &dyn fmt::Display) -> Self {
        Self::new(key, Value::Str(value.to_string()))
    }

    /// An `error` field holding the error's message.
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::new("error", Value::Str(err.to_string()))
    }
}

/// Encode `fields` as one JSON object. Later keys replace earlier ones.
/// Empty input encodes as an empty string.
pub(crate) fn encode<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = &'a Field>,
{
    let mut map = Map::new();
    for field in fields {
        map.insert(field.key.to_string(), field.value.to_json());
    }
    if map.is_empty() {
        String::new()
    } else {
        serde_json::Value::Object(map).to_string()
    }
}
