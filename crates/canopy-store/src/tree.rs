//! The entry tree shared by the memory and file backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::path::StorePath;
use crate::value::{EntryKind, StoreValue};

/// One entry in the store tree: a directory of further entries or a value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Entry {
    Directory(BTreeMap<String, Entry>),
    Value(StoreValue),
}

impl Entry {
    pub(crate) fn empty_dir() -> Self {
        Self::Directory(BTreeMap::new())
    }

    pub(crate) fn kind(&self) -> EntryKind {
        match self {
            Self::Directory(_) => EntryKind::Directory,
            Self::Value(_) => EntryKind::Value,
        }
    }
}

/// Walk down from `root` to the entry at `path`.
fn lookup<'a>(root: &'a Entry, path: &StorePath) -> Option<&'a Entry> {
    let mut current = root;
    for segment in path.segments() {
        match current {
            Entry::Directory(entries) => current = entries.get(segment)?,
            Entry::Value(_) => return None,
        }
    }
    Some(current)
}

/// Walk down to the directory containing `path`'s leaf, erroring precisely.
fn lookup_parent_dir<'a>(
    root: &'a mut Entry,
    path: &StorePath,
) -> StoreResult<(&'a mut BTreeMap<String, Entry>, String)> {
    let (parent, leaf) = path
        .split_last()
        .ok_or_else(|| StoreError::NotFound(path.clone()))?;
    let mut current = root;
    let mut walked = StorePath::root();
    for segment in parent.segments() {
        walked.push(segment.clone());
        current = match current {
            Entry::Directory(entries) => entries
                .get_mut(segment)
                .ok_or_else(|| StoreError::NotFound(walked.clone()))?,
            Entry::Value(_) => {
                return Err(StoreError::WrongKind {
                    path: walked,
                    expected: EntryKind::Directory,
                    actual: EntryKind::Value,
                })
            }
        };
    }
    match current {
        Entry::Directory(entries) => Ok((entries, leaf.to_string())),
        Entry::Value(_) => Err(StoreError::WrongKind {
            path: parent,
            expected: EntryKind::Directory,
            actual: EntryKind::Value,
        }),
    }
}

pub(crate) fn kind(root: &Entry, path: &StorePath) -> Option<EntryKind> {
    lookup(root, path).map(Entry::kind)
}

pub(crate) fn make_dir(root: &mut Entry, path: &StorePath) -> StoreResult<()> {
    if path.is_root() {
        return Ok(());
    }
    let (entries, leaf) = lookup_parent_dir(root, path)?;
    match entries.get(&leaf) {
        None => {
            entries.insert(leaf, Entry::empty_dir());
            Ok(())
        }
        Some(Entry::Directory(_)) => Ok(()),
        Some(Entry::Value(_)) => Err(StoreError::WrongKind {
            path: path.clone(),
            expected: EntryKind::Directory,
            actual: EntryKind::Value,
        }),
    }
}

pub(crate) fn list(root: &Entry, path: &StorePath, filter: EntryKind) -> StoreResult<Vec<String>> {
    match lookup(root, path) {
        Some(Entry::Directory(entries)) => Ok(entries
            .iter()
            .filter(|(_, e)| e.kind() == filter)
            .map(|(name, _)| name.clone())
            .collect()),
        Some(Entry::Value(_)) => Err(StoreError::WrongKind {
            path: path.clone(),
            expected: EntryKind::Directory,
            actual: EntryKind::Value,
        }),
        None => Err(StoreError::NotFound(path.clone())),
    }
}

pub(crate) fn read(root: &Entry, path: &StorePath) -> StoreResult<StoreValue> {
    match lookup(root, path) {
        Some(Entry::Value(value)) => Ok(value.clone()),
        Some(Entry::Directory(_)) => Err(StoreError::WrongKind {
            path: path.clone(),
            expected: EntryKind::Value,
            actual: EntryKind::Directory,
        }),
        None => Err(StoreError::NotFound(path.clone())),
    }
}

pub(crate) fn write(root: &mut Entry, path: &StorePath, value: &StoreValue) -> StoreResult<()> {
    let (entries, leaf) = lookup_parent_dir(root, path)?;
    match entries.get(&leaf) {
        Some(Entry::Directory(_)) => Err(StoreError::WrongKind {
            path: path.clone(),
            expected: EntryKind::Value,
            actual: EntryKind::Directory,
        }),
        _ => {
            entries.insert(leaf, Entry::Value(value.clone()));
            Ok(())
        }
    }
}

pub(crate) fn remove(root: &mut Entry, path: &StorePath) -> StoreResult<()> {
    let (entries, leaf) = lookup_parent_dir(root, path)?;
    match entries.remove(&leaf) {
        Some(_) => Ok(()),
        None => Err(StoreError::NotFound(path.clone())),
    }
}
