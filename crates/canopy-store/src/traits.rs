use crate::error::{StoreError, StoreResult};
use crate::path::StorePath;
use crate::value::{EntryKind, StoreValue};

/// A hierarchical key/value store: a tree of named directories and typed
/// values, addressed purely by path.
///
/// All implementations must satisfy these invariants:
/// - There is no cursor state: every call names its target by full path and
///   calls are safe to interleave.
/// - Operations on a missing path fail with [`StoreError::NotFound`]; the
///   store never creates intermediate directories on its own.
/// - Directory listings are sorted by name.
/// - Removing a directory removes its entire subtree.
/// - Concurrent reads are always safe; a writer excludes other access.
pub trait HierarchyStore: Send + Sync {
    /// Create one directory level. The parent must already exist.
    ///
    /// Idempotent if the directory is already present; fails with
    /// [`StoreError::WrongKind`] if a value occupies the name.
    fn make_dir(&self, path: &StorePath) -> StoreResult<()>;

    /// The kind of the entry at `path`, or `None` if nothing is there.
    fn kind(&self, path: &StorePath) -> StoreResult<Option<EntryKind>>;

    /// Returns `true` if any entry exists at `path`.
    fn exists(&self, path: &StorePath) -> StoreResult<bool> {
        Ok(self.kind(path)?.is_some())
    }

    /// Sorted names of the entries of the given kind inside the directory
    /// at `path`. Fails with `NotFound` if the directory itself is missing.
    fn list(&self, path: &StorePath, filter: EntryKind) -> StoreResult<Vec<String>>;

    /// Read the value at `path`. Fails with `NotFound` if missing.
    fn read(&self, path: &StorePath) -> StoreResult<StoreValue>;

    /// Read the value at `path`, mapping a missing entry to `None`.
    fn try_read(&self, path: &StorePath) -> StoreResult<Option<StoreValue>> {
        match self.read(path) {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write (or overwrite) the value at `path`. The containing directory
    /// must already exist.
    fn write(&self, path: &StorePath, value: &StoreValue) -> StoreResult<()>;

    /// Remove the entry at `path` — a value, or a directory and its whole
    /// subtree. Fails with `NotFound` if missing.
    fn remove(&self, path: &StorePath) -> StoreResult<()>;

    /// Persist any buffered state. A no-op for purely in-memory backends.
    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl<T: HierarchyStore + ?Sized> HierarchyStore for &T {
    fn make_dir(&self, path: &StorePath) -> StoreResult<()> {
        (**self).make_dir(path)
    }

    fn kind(&self, path: &StorePath) -> StoreResult<Option<EntryKind>> {
        (**self).kind(path)
    }

    fn list(&self, path: &StorePath, filter: EntryKind) -> StoreResult<Vec<String>> {
        (**self).list(path, filter)
    }

    fn read(&self, path: &StorePath) -> StoreResult<StoreValue> {
        (**self).read(path)
    }

    fn write(&self, path: &StorePath, value: &StoreValue) -> StoreResult<()> {
        (**self).write(path, value)
    }

    fn remove(&self, path: &StorePath) -> StoreResult<()> {
        (**self).remove(path)
    }

    fn flush(&self) -> StoreResult<()> {
        (**self).flush()
    }
}
