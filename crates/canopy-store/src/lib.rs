//! Hierarchical key/value storage for the canopy cache.
//!
//! This crate implements the store the cache is layered on: a tree of named
//! entries where every entry is either a directory (holding further entries)
//! or a typed value. The cache addresses the store purely by path — there is
//! no "current directory" cursor, so calls are reentrant and safe to
//! interleave.
//!
//! # Storage Backends
//!
//! All backends implement the [`HierarchyStore`] trait:
//!
//! - [`MemoryHierarchyStore`] -- `RwLock`-guarded entry tree for tests and
//!   embedding
//! - [`FileHierarchyStore`] -- the same tree persisted as a single bincode
//!   image on disk, loaded at open and written on [`HierarchyStore::flush`]
//!
//! # Design Rules
//!
//! 1. Operations on a missing path fail with [`StoreError::NotFound`]; the
//!    store never invents intermediate directories on its own.
//! 2. Directory listings are sorted and filtered by [`EntryKind`].
//! 3. Removing a directory removes its whole subtree.
//! 4. The store never interprets value contents -- payload bytes are opaque.
//! 5. Concurrent reads are always safe; writers take the tree lock.

pub mod error;
pub mod file;
pub mod memory;
pub mod path;
pub mod traits;
pub mod value;

mod tree;

pub use error::{StoreError, StoreResult};
pub use file::FileHierarchyStore;
pub use memory::MemoryHierarchyStore;
pub use path::StorePath;
pub use traits::HierarchyStore;
pub use value::{EntryKind, StoreValue};
