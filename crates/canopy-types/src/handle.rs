//! Absolute object handles: slash-separated node identities.
//!
//! A handle names one node in the cached tree. Handles are always
//! root-anchored (`/a/b/c`); the root itself is the single-character handle
//! `/`. Handles are pure identifiers — they own no node data, compare by
//! value, and are cheap to clone.

use serde::{Deserialize, Serialize};

use crate::error::HandleError;

/// Result alias for handle operations.
pub type Result<T> = std::result::Result<T, HandleError>;

/// The root handle string.
const ROOT: &str = "/";

/// Absolute, slash-separated identity of a node in the cached tree.
///
/// A canonical handle carries no trailing separator except for the root
/// itself. Construction accepts a single trailing separator (`/a/b/`) for
/// compatibility with path-style callers; [`canonical`](Self::canonical)
/// strips it, and set-keyed consumers (the dirty set) must canonicalize
/// before keying.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectHandle(String);

impl ObjectHandle {
    /// The root handle, `/`.
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// Parse an absolute handle.
    ///
    /// Fails if the name is not root-anchored or contains an empty interior
    /// segment. A single trailing separator is accepted.
    pub fn parse(name: &str) -> Result<Self> {
        if !name.starts_with('/') {
            return Err(HandleError::NotAbsolute(name.to_string()));
        }
        if name != ROOT {
            let trimmed = name.strip_suffix('/').unwrap_or(name);
            if trimmed.is_empty() || trimmed[1..].split('/').any(str::is_empty) {
                return Err(HandleError::EmptySegment(name.to_string()));
            }
        }
        Ok(Self(name.to_string()))
    }

    /// The handle string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is the root handle.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    /// Canonical form: a single trailing separator is stripped. Root is
    /// already canonical.
    pub fn canonical(&self) -> Self {
        if self.is_root() {
            return self.clone();
        }
        match self.0.strip_suffix('/') {
            Some(stripped) => Self(stripped.to_string()),
            None => self.clone(),
        }
    }

    /// The parent handle. Fails for the root, which has no parent.
    pub fn parent(&self) -> Result<Self> {
        if self.is_root() {
            return Err(HandleError::RootHasNoParent);
        }
        let canonical = self.canonical();
        match canonical.0.rfind('/') {
            Some(0) => Ok(Self::root()),
            Some(idx) => Ok(Self(canonical.0[..idx].to_string())),
            None => Err(HandleError::NotAbsolute(self.0.clone())),
        }
    }

    /// The leaf component (the last path segment). Returns `/` for the root.
    pub fn leaf(&self) -> &str {
        if self.is_root() {
            return ROOT;
        }
        let trimmed = self.0.strip_suffix('/').unwrap_or(&self.0);
        match trimmed.rfind('/') {
            Some(idx) => &trimmed[idx + 1..],
            None => trimmed,
        }
    }

    /// Join a relative name onto this handle.
    ///
    /// Fails if `relative` is itself root-anchored (defends against
    /// accidental double-rooting) or empty.
    pub fn join(&self, relative: &str) -> Result<Self> {
        if relative.starts_with('/') {
            return Err(HandleError::NotRelative(relative.to_string()));
        }
        if relative.is_empty() || relative.split('/').any(str::is_empty) {
            return Err(HandleError::EmptySegment(relative.to_string()));
        }
        let base = self.canonical();
        if base.is_root() {
            Ok(Self(format!("/{relative}")))
        } else {
            Ok(Self(format!("{}/{relative}", base.0)))
        }
    }

    /// Iterator over the path segments, root first. Empty for the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Tree depth: 0 for the root, 1 for `/a`, and so on.
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Returns `true` if `self` is `other` or is parented (directly or
    /// indirectly) under `other`.
    pub fn is_self_or_descendant_of(&self, other: &Self) -> bool {
        let child = self.canonical();
        let ancestor = other.canonical();
        if ancestor.is_root() {
            return true;
        }
        match child.0.strip_prefix(ancestor.0.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }

    /// The chain of ancestors from the root's child down to `self`,
    /// inclusive. Empty for the root.
    pub fn ancestry(&self) -> Vec<Self> {
        let canonical = self.canonical();
        let mut out = Vec::with_capacity(canonical.depth());
        let mut prefix = String::new();
        for segment in canonical.segments() {
            prefix.push('/');
            prefix.push_str(segment);
            out.push(Self(prefix.clone()));
        }
        out
    }
}

impl std::fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ObjectHandle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
