//! File-backed hierarchy store.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::path::StorePath;
use crate::traits::HierarchyStore;
use crate::tree::{self, Entry};
use crate::value::{EntryKind, StoreValue};

/// A hierarchy store persisted as a single bincode image on disk.
///
/// The whole entry tree is loaded at open and held in memory; [`flush`]
/// rewrites the image. The cache flushes explicitly (and on drop), so there
/// is no incremental on-disk format to maintain.
///
/// [`flush`]: HierarchyStore::flush
pub struct FileHierarchyStore {
    path: PathBuf,
    root: RwLock<Entry>,
    read_only: bool,
}

impl FileHierarchyStore {
    /// Create a new store file, truncating any existing image.
    pub fn create(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            path: path.to_path_buf(),
            root: RwLock::new(Entry::empty_dir()),
            read_only: false,
        };
        store.flush()?;
        Ok(store)
    }

    /// Open an existing store file for reading and writing.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            root: RwLock::new(Self::load_image(path)?),
            read_only: false,
        })
    }

    /// Open an existing store file; every mutation fails with
    /// [`StoreError::ReadOnly`].
    pub fn open_read_only(path: &Path) -> StoreResult<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            root: RwLock::new(Self::load_image(path)?),
            read_only: true,
        })
    }

    fn load_image(path: &Path) -> StoreResult<Entry> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        bincode::deserialize_from(reader)
            .map_err(|e| StoreError::Corrupt(format!("bad store image {}: {e}", path.display())))
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

impl HierarchyStore for FileHierarchyStore {
    fn make_dir(&self, path: &StorePath) -> StoreResult<()> {
        self.ensure_writable()?;
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
        self.ensure_writable()?;
        let mut root = self.root.write().expect("lock poisoned");
        tree::write(&mut root, path, value)
    }

    fn remove(&self, path: &StorePath) -> StoreResult<()> {
        self.ensure_writable()?;
        let mut root = self.root.write().expect("lock poisoned");
        tree::remove(&mut root, path)
    }

    fn flush(&self) -> StoreResult<()> {
        self.ensure_writable()?;
        let root = self.root.read().expect("lock poisoned");
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, &*root)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        writer.flush()?;
        debug!(path = %self.path.display(), "store image written");
        Ok(())
    }
}

impl std::fmt::Debug for FileHierarchyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHierarchyStore")
            .field("path", &self.path)
            .field("read_only", &self.read_only)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> StorePath {
        StorePath::from_segments(segments.iter().copied())
    }

    #[test]
    fn create_flush_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.bin");

        let store = FileHierarchyStore::create(&file).unwrap();
        store.make_dir(&path(&["a"])).unwrap();
        store
            .write(&path(&["a", "v"]), &StoreValue::Floats(vec![1.0, 2.0]))
            .unwrap();
        store.flush().unwrap();
        drop(store);

        let reopened = FileHierarchyStore::open(&file).unwrap();
        assert_eq!(
            reopened.read(&path(&["a", "v"])).unwrap(),
            StoreValue::Floats(vec![1.0, 2.0])
        );
    }

    #[test]
    fn create_truncates_existing_image() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.bin");

        let store = FileHierarchyStore::create(&file).unwrap();
        store.make_dir(&path(&["old"])).unwrap();
        store.flush().unwrap();
        drop(store);

        let fresh = FileHierarchyStore::create(&file).unwrap();
        assert!(!fresh.exists(&path(&["old"])).unwrap());
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileHierarchyStore::open(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn open_corrupt_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.bin");
        std::fs::write(&file, b"not a bincode image at all").unwrap();
        let err = FileHierarchyStore::open(&file).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn read_only_rejects_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.bin");
        FileHierarchyStore::create(&file).unwrap();

        let store = FileHierarchyStore::open_read_only(&file).unwrap();
        assert!(matches!(
            store.make_dir(&path(&["a"])).unwrap_err(),
            StoreError::ReadOnly
        ));
        assert!(matches!(
            store
                .write(&path(&["v"]), &StoreValue::Bytes(vec![1]))
                .unwrap_err(),
            StoreError::ReadOnly
        ));
        assert!(matches!(
            store.remove(&path(&["v"])).unwrap_err(),
            StoreError::ReadOnly
        ));
        assert!(matches!(store.flush().unwrap_err(), StoreError::ReadOnly));
    }
}
