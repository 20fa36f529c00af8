//! Attribute values.

use serde::{Deserialize, Serialize};

/// A named attribute's payload: a small self-describing value.
///
/// Attributes never contribute to bound computation; the cache treats them
/// as opaque serializable data keyed by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    FloatVec(Vec<f64>),
    StringVec(Vec<String>),
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::FloatVec(v) => write!(f, "float[{}]", v.len()),
            Self::StringVec(v) => write!(f, "string[{}]", v.len()),
        }
    }
}
