use std::sync::RwLock;

use crate::error::StoreResult;
use crate::path::StorePath;
use crate::traits::HierarchyStore;
use crate::tree::{self, Entry};
use crate::value::{EntryKind, StoreValue};

/// In-memory hierarchy store.
///
/// Intended for tests and embedding. The entry tree lives behind a `RwLock`
/// so concurrent readers are safe; values are cloned on read/write.
pub struct MemoryHierarchyStore {
    root: RwLock<Entry>,
}

impl MemoryHierarchyStore {
    /// Create a new store containing only the empty root directory.
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Entry::empty_dir()),
        }
    }

}

impl Default for MemoryHierarchyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyStore for MemoryHierarchyStore {
    fn make_dir(&self, path: &StorePath) -> StoreResult<()> {
        let mut root = self.root.write().expect("lock poisoned");
        tree::make_dir(&mut root, path)
    }

    fn kind(&self, path: &StorePath) -> StoreResult<Option<EntryKind>> {
        let root = self.root.read().expect("lock poisoned");
        Ok(tree::kind(&root, path))
    }

    fn list(&self, path: &StorePath, filter: EntryKind) -> StoreResult<Vec<String>> {
        let root = self.root.read().expect("lock poisoned");
        tree::list(&root, path, filter)
    }

    fn read(&self, path: &StorePath) -> StoreResult<StoreValue> {
        let root = self.root.read().expect("lock poisoned");
        tree::read(&root, path)
    }

    fn write(&self, path: &StorePath, value: &StoreValue) -> StoreResult<()> {
        let mut root = self.root.write().expect("lock poisoned");
        tree::write(&mut root, path, value)
    }

    fn remove(&self, path: &StorePath) -> StoreResult<()> {
        let mut root = self.root.write().expect("lock poisoned");
        tree::remove(&mut root, path)
    }
}

impl std::fmt::Debug for MemoryHierarchyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHierarchyStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn path(segments: &[&str]) -> StorePath {
        StorePath::from_segments(segments.iter().copied())
    }

    // -----------------------------------------------------------------------
    // Directories
    // -----------------------------------------------------------------------

    #[test]
    fn make_dir_and_kind() {
        let store = MemoryHierarchyStore::new();
        store.make_dir(&path(&["a"])).unwrap();
        assert_eq!(
            store.kind(&path(&["a"])).unwrap(),
            Some(EntryKind::Directory)
        );
        assert_eq!(store.kind(&path(&["missing"])).unwrap(), None);
    }

    #[test]
    fn make_dir_is_idempotent() {
        let store = MemoryHierarchyStore::new();
        store.make_dir(&path(&["a"])).unwrap();
        store.make_dir(&path(&["a"])).unwrap();
        assert!(store.exists(&path(&["a"])).unwrap());
    }

    #[test]
    fn make_dir_requires_parent() {
        let store = MemoryHierarchyStore::new();
        let err = store.make_dir(&path(&["a", "b"])).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn make_dir_over_value_fails() {
        let store = MemoryHierarchyStore::new();
        store
            .write(&path(&["a"]), &StoreValue::Floats(vec![1.0]))
            .unwrap();
        let err = store.make_dir(&path(&["a"])).unwrap_err();
        assert!(matches!(err, StoreError::WrongKind { .. }));
    }

    #[test]
    fn root_always_exists() {
        let store = MemoryHierarchyStore::new();
        assert_eq!(
            store.kind(&StorePath::root()).unwrap(),
            Some(EntryKind::Directory)
        );
        store.make_dir(&StorePath::root()).unwrap();
    }

    // -----------------------------------------------------------------------
    // Values
    // -----------------------------------------------------------------------

    #[test]
    fn write_and_read_value() {
        let store = MemoryHierarchyStore::new();
        store.make_dir(&path(&["a"])).unwrap();
        let value = StoreValue::Floats(vec![1.0, 2.0, 3.0]);
        store.write(&path(&["a", "v"]), &value).unwrap();
        assert_eq!(store.read(&path(&["a", "v"])).unwrap(), value);
        assert_eq!(
            store.kind(&path(&["a", "v"])).unwrap(),
            Some(EntryKind::Value)
        );
    }

    #[test]
    fn overwrite_value() {
        let store = MemoryHierarchyStore::new();
        store
            .write(&path(&["v"]), &StoreValue::Floats(vec![1.0]))
            .unwrap();
        store
            .write(&path(&["v"]), &StoreValue::Bytes(vec![7]))
            .unwrap();
        assert_eq!(
            store.read(&path(&["v"])).unwrap(),
            StoreValue::Bytes(vec![7])
        );
    }

    #[test]
    fn read_missing_value() {
        let store = MemoryHierarchyStore::new();
        let err = store.read(&path(&["nope"])).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.try_read(&path(&["nope"])).unwrap().is_none());
    }

    #[test]
    fn read_directory_as_value_fails() {
        let store = MemoryHierarchyStore::new();
        store.make_dir(&path(&["d"])).unwrap();
        let err = store.read(&path(&["d"])).unwrap_err();
        assert!(matches!(err, StoreError::WrongKind { .. }));
    }

    #[test]
    fn write_over_directory_fails() {
        let store = MemoryHierarchyStore::new();
        store.make_dir(&path(&["d"])).unwrap();
        let err = store
            .write(&path(&["d"]), &StoreValue::Floats(vec![0.0]))
            .unwrap_err();
        assert!(matches!(err, StoreError::WrongKind { .. }));
    }

    #[test]
    fn write_requires_parent_directory() {
        let store = MemoryHierarchyStore::new();
        let err = store
            .write(&path(&["a", "v"]), &StoreValue::Floats(vec![0.0]))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    #[test]
    fn list_filters_by_kind_and_sorts() {
        let store = MemoryHierarchyStore::new();
        store.make_dir(&path(&["z"])).unwrap();
        store.make_dir(&path(&["a"])).unwrap();
        store
            .write(&path(&["v"]), &StoreValue::Floats(vec![0.0]))
            .unwrap();

        let dirs = store
            .list(&StorePath::root(), EntryKind::Directory)
            .unwrap();
        assert_eq!(dirs, vec!["a".to_string(), "z".to_string()]);

        let values = store.list(&StorePath::root(), EntryKind::Value).unwrap();
        assert_eq!(values, vec!["v".to_string()]);
    }

    #[test]
    fn list_missing_directory_fails() {
        let store = MemoryHierarchyStore::new();
        let err = store
            .list(&path(&["nope"]), EntryKind::Directory)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    #[test]
    fn remove_value() {
        let store = MemoryHierarchyStore::new();
        store
            .write(&path(&["v"]), &StoreValue::Floats(vec![0.0]))
            .unwrap();
        store.remove(&path(&["v"])).unwrap();
        assert!(!store.exists(&path(&["v"])).unwrap());
    }

    #[test]
    fn remove_directory_removes_subtree() {
        let store = MemoryHierarchyStore::new();
        store.make_dir(&path(&["a"])).unwrap();
        store.make_dir(&path(&["a", "b"])).unwrap();
        store
            .write(&path(&["a", "b", "v"]), &StoreValue::Floats(vec![0.0]))
            .unwrap();

        store.remove(&path(&["a"])).unwrap();
        assert!(!store.exists(&path(&["a"])).unwrap());
        assert!(!store.exists(&path(&["a", "b"])).unwrap());
        assert!(!store.exists(&path(&["a", "b", "v"])).unwrap());
    }

    #[test]
    fn remove_missing_fails() {
        let store = MemoryHierarchyStore::new();
        let err = store.remove(&path(&["nope"])).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryHierarchyStore::new());
        store
            .write(&path(&["v"]), &StoreValue::Floats(vec![1.0, 2.0]))
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let value = store.read(&path(&["v"])).unwrap();
                    assert_eq!(value.as_floats().unwrap().len(), 2);
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }
}
