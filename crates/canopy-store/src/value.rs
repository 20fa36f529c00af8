//! Typed store values and entry kinds.

use serde::{Deserialize, Serialize};

/// The kind of an entry in the store tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// A directory holding further entries.
    Directory,
    /// A leaf value.
    Value,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::Value => write!(f, "value"),
        }
    }
}

/// A typed leaf value.
///
/// The two kinds cover everything the cache persists: fixed-size numeric
/// arrays (transform matrices, bounding boxes) and opaque serialized
/// payloads (shapes, attributes, headers).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StoreValue {
    /// A numeric array.
    Floats(Vec<f64>),
    /// An opaque serialized payload.
    Bytes(Vec<u8>),
}

impl StoreValue {
    /// The numeric array, if this is a `Floats` value.
    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Self::Floats(v) => Some(v),
            Self::Bytes(_) => None,
        }
    }

    /// The payload bytes, if this is a `Bytes` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            Self::Floats(_) => None,
        }
    }
}
