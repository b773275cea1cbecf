//! Attribute value type for codelist entries.
//!
//! Definition files carry free-form attribute mappings whose values may be
//! strings, numbers, booleans, lists or null. Decoding is strict: a scalar
//! is a boolean only if the source document says so. The two-letter country
//! code `NO` must survive as the string `"NO"` and never collapse to `false`.

use serde::{Deserialize, Serialize};

/// A single attribute value on a [`Code`](crate::Code).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Borrow the value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Render the value as a tabular cell. Null becomes the empty string.
    pub fn to_cell(&self) -> String {
        match self {
            AttrValue::Null => String::new(),
            AttrValue::Bool(b) => b.to_string(),
            AttrValue::Int(i) => i.to_string(),
            AttrValue::Float(f) => f.to_string(),
            AttrValue::String(s) => s.clone(),
            AttrValue::List(items) => items
                .iter()
                .map(AttrValue::to_cell)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}
