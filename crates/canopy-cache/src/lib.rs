//! A hierarchical object cache with dependency-driven bound maintenance.
//!
//! Objects form a tree named by [`ObjectHandle`]s. Each object may carry a
//! shape, a local transform and named attributes, and the cache maintains a
//! per-object bounding box covering the object and everything beneath it.
//! Bounds are kept incrementally: a write marks the affected object stale and
//! returns; a bound query revalidates just the queried subtree, deepest
//! object first, so localized edits never touch sibling subtrees.
//!
//! Everything is persisted through a [`HierarchyStore`], so a cache survives
//! process restarts with its validated bounds intact.
//!
//! # Example
//!
//! ```
//! use canopy_cache::{HierarchicalCache, OpenMode};
//! use canopy_store::MemoryHierarchyStore;
//! use canopy_types::{Box3, Matrix4, ObjectHandle, Shape, Vec3};
//!
//! # fn main() -> Result<(), canopy_cache::CacheError> {
//! let mut cache = HierarchicalCache::open(MemoryHierarchyStore::new(), OpenMode::Write)?;
//!
//! let ball = ObjectHandle::parse("/scene/ball")?;
//! cache.write_shape(&ball, &Shape::Sphere {
//!     center: Vec3::new(0.0, 0.0, 0.0),
//!     radius: 1.0,
//! })?;
//! cache.write_transform(&ball, &Matrix4::translation(5.0, 0.0, 0.0))?;
//!
//! let bound = cache.bound(&ObjectHandle::root())?;
//! assert_eq!(bound.min, Vec3::new(4.0, -1.0, -1.0));
//! assert_eq!(bound.max, Vec3::new(6.0, 1.0, 1.0));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod node;
pub mod paths;
pub mod tracker;

mod pattern;

pub use cache::{HierarchicalCache, OpenMode};
pub use error::{CacheError, CacheResult};

// Re-exported so downstream users need only this crate for common usage.
pub use canopy_store::{FileHierarchyStore, HierarchyStore, MemoryHierarchyStore};
pub use canopy_types::{AttributeValue, Box3, Matrix4, ObjectHandle, Shape, Vec3};
