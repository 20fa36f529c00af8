//! Store-internal paths.

use serde::{Deserialize, Serialize};

/// A location inside the store: a sequence of entry names.
///
/// Distinct from an object handle — handles name nodes in the cache's
/// logical tree, store paths name entries in the persisted layout (the
/// codec in the cache crate maps one to the other). The empty sequence is
/// the store root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorePath(Vec<String>);

impl StorePath {
    /// The store root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build from segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if this is the store root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The entry names, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Append one entry name in place.
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    /// A new path with one more entry name appended.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.push(name);
        out
    }

    /// The containing directory and the leaf name; `None` for the root.
    pub fn split_last(&self) -> Option<(Self, &str)> {
        let (last, parent) = self.0.split_last()?;
        Some((Self(parent.to_vec()), last.as_str()))
    }
}

impl std::fmt::Display for StorePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
