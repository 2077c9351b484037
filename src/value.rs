//! Property values stored on placed components.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Property bag of a component, in declaration order.
pub type Properties = IndexMap<String, PropValue>;

/// A single property value.
///
/// Deserializes from any JSON value. Whole numbers serialize without a
/// fractional part so embedded JSON matches what a browser would print.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<PropValue>),
    Map(IndexMap<String, PropValue>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Missing values: `null` and the empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            PropValue::Null => true,
            PropValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Truthiness as a JavaScript engine sees it (collections are always truthy).
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Null => false,
            PropValue::Bool(b) => *b,
            PropValue::Number(n) => *n != 0.0 && !n.is_nan(),
            PropValue::String(s) => !s.is_empty(),
            PropValue::List(_) | PropValue::Map(_) => true,
        }
    }

    /// Compact JSON text of this value.
    pub fn to_json(&self) -> String {
        // Serializing a PropValue into a String cannot fail: keys are strings
        // and non-finite numbers are written as null.
        serde_json::to_string(self).unwrap_or_else(|_| "null".into())
    }

    /// Parse JSON text entered by a user.
    pub fn parse_json(text: &str) -> serde_json::Result<PropValue> {
        serde_json::from_str(text)
    }
}

/// Render a number the way JavaScript prints it: `2`, `0.5`, `-3`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "null".into();
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl Serialize for PropValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropValue::Null => serializer.serialize_unit(),
            PropValue::Bool(b) => serializer.serialize_bool(*b),
            PropValue::Number(n) => {
                if !n.is_finite() {
                    serializer.serialize_unit()
                } else if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            PropValue::String(s) => serializer.serialize_str(s),
            PropValue::List(items) => items.serialize(serializer),
            PropValue::Map(map) => map.serialize(serializer),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("null"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Number(n) => f.write_str(&format_number(*n)),
            PropValue::String(s) => f.write_str(s),
            PropValue::List(_) | PropValue::Map(_) => f.write_str(&self.to_json()),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::String(s.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::String(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(f64::from(n))
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(items: Vec<PropValue>) -> Self {
        PropValue::List(items)
    }
}
