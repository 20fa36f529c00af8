//! The hierarchical cache facade.

use std::collections::BTreeMap;

use tracing::{debug, error};

use canopy_store::{EntryKind, HierarchyStore, StoreError, StorePath, StoreValue};
use canopy_types::{AttributeValue, Box3, Matrix4, ObjectHandle, Shape};

use crate::error::{CacheError, CacheResult};
use crate::node;
use crate::paths::{self, ATTRIBUTES_DIR, CHILDREN_DIR};
use crate::pattern;
use crate::tracker::DependencyTracker;

/// Header naming the on-disk format.
const FORMAT_HEADER: &str = "cacheFormat";
/// Header carrying the format version.
const VERSION_HEADER: &str = "formatVersion";
/// Header carrying the creation timestamp, RFC 3339.
const CREATED_HEADER: &str = "createdAt";

const FORMAT_NAME: &str = "HierarchicalCache";
const FORMAT_VERSION: i64 = 1;

/// How a cache is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    /// Read an existing cache; every mutation fails with
    /// [`CacheError::ReadOnly`].
    Read,
    /// Start a fresh cache, initializing the store layout.
    Write,
    /// Open an existing cache for further writes, initializing any missing
    /// layout.
    Append,
}

/// A hierarchical object cache with lazily recomputed bounds.
///
/// Objects are named by [`ObjectHandle`] and form a tree rooted at `/`. Each
/// node may carry a shape, a local transform and named attributes; the cache
/// maintains a per-node bounding box covering the node's shape and all of its
/// descendants, expressed in the node's parent space.
///
/// Bounds are maintained incrementally: writes mark the affected node stale
/// and return immediately, and [`bound`](Self::bound) revalidates just the
/// queried subtree, deepest node first. Sibling subtrees are never touched
/// by a localized edit.
pub struct HierarchicalCache<S: HierarchyStore> {
    store: S,
    tracker: DependencyTracker,
    mode: OpenMode,
}

impl<S: HierarchyStore> HierarchicalCache<S> {
    /// Open a cache over `store`.
    ///
    /// `Write` and `Append` initialize the layout (header and root children
    /// directories) and seed any missing standard headers. `Read` requires
    /// the layout to already be present and fails with
    /// [`CacheError::NotACache`] otherwise.
    pub fn open(store: S, mode: OpenMode) -> CacheResult<Self> {
        let mut cache = Self {
            store,
            tracker: DependencyTracker::new(),
            mode,
        };
        match mode {
            OpenMode::Write | OpenMode::Append => {
                cache.store.make_dir(&paths::header_path())?;
                cache
                    .store
                    .make_dir(&StorePath::root().child(CHILDREN_DIR))?;
                cache.seed_headers()?;
            }
            OpenMode::Read => {
                let header_ok =
                    cache.store.kind(&paths::header_path())? == Some(EntryKind::Directory);
                let children_ok = cache
                    .store
                    .kind(&StorePath::root().child(CHILDREN_DIR))?
                    == Some(EntryKind::Directory);
                if !header_ok || !children_ok {
                    return Err(CacheError::NotACache);
                }
            }
        }
        Ok(cache)
    }

    /// Write any missing standard headers. Existing values (an appended
    /// cache's original creation timestamp, say) are left alone.
    fn seed_headers(&mut self) -> CacheResult<()> {
        let defaults = [
            (
                FORMAT_HEADER,
                AttributeValue::String(FORMAT_NAME.to_string()),
            ),
            (VERSION_HEADER, AttributeValue::Int(FORMAT_VERSION)),
            (
                CREATED_HEADER,
                AttributeValue::String(chrono::Utc::now().to_rfc3339()),
            ),
        ];
        for (name, value) in defaults {
            let path = paths::header_entry_path(name);
            if !self.store.exists(&path)? {
                self.store.write(&path, &encode_attribute(&value)?)?;
            }
        }
        Ok(())
    }

    fn ensure_writable(&self) -> CacheResult<()> {
        if self.mode == OpenMode::Read {
            return Err(CacheError::ReadOnly);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Object creation and writes
    // -----------------------------------------------------------------------

    /// Create every node on the way to `handle` that does not yet exist,
    /// marking each created node stale. Returns the node's store directory.
    fn guarantee_object(&mut self, handle: &ObjectHandle) -> CacheResult<StorePath> {
        for ancestor in handle.ancestry() {
            let path = paths::object_path(&ancestor);
            if self.store.kind(&path)? != Some(EntryKind::Directory) {
                let parent_path = paths::object_path(&ancestor.parent()?);
                self.store.make_dir(&parent_path.child(CHILDREN_DIR))?;
                self.store.make_dir(&path)?;
                self.tracker.mark(ancestor);
            }
        }
        Ok(paths::object_path(handle))
    }

    /// Store `shape` on the object, creating the object if needed.
    ///
    /// Fails with [`CacheError::RootShape`] for the root, leaving the store
    /// untouched. For a leaf the new bound is written directly; a node with
    /// children is marked stale instead.
    pub fn write_shape(&mut self, handle: &ObjectHandle, shape: &Shape) -> CacheResult<()> {
        self.ensure_writable()?;
        if handle.is_root() {
            return Err(CacheError::RootShape);
        }
        let handle = handle.canonical();
        let path = self.guarantee_object(&handle)?;
        node::write_shape(&self.store, &path, shape)?;

        if self.store.exists(&path.child(CHILDREN_DIR))? {
            self.tracker.mark(handle);
        } else {
            // Leaf: the bound is fully determined right now, so skip the
            // deferred recomputation and propagate upward directly.
            let mut bound = shape.bound();
            if let Some(m) = node::load_transform(&self.store, &path)? {
                bound = bound.transformed(&m);
            }
            self.update_bound(&handle, bound)?;
        }
        Ok(())
    }

    /// Store a local transform on the object, creating the object if needed.
    ///
    /// Fails with [`CacheError::RootTransform`] for the root, leaving the
    /// store untouched.
    pub fn write_transform(&mut self, handle: &ObjectHandle, matrix: &Matrix4) -> CacheResult<()> {
        self.ensure_writable()?;
        if handle.is_root() {
            return Err(CacheError::RootTransform);
        }
        let handle = handle.canonical();
        let path = self.guarantee_object(&handle)?;
        node::write_transform(&self.store, &path, matrix)?;
        self.tracker.mark(handle);
        Ok(())
    }

    /// Store a named attribute on the object, creating the object if needed.
    /// Attributes never affect bounds, so nothing is marked stale.
    pub fn write_attribute(
        &mut self,
        handle: &ObjectHandle,
        name: &str,
        value: &AttributeValue,
    ) -> CacheResult<()> {
        self.ensure_writable()?;
        validate_name(name)?;
        let handle = handle.canonical();
        let path = self.guarantee_object(&handle)?;
        self.store.make_dir(&path.child(ATTRIBUTES_DIR))?;
        self.store
            .write(&paths::attribute_path(&handle, name), &encode_attribute(value)?)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Remove the object and its whole subtree.
    ///
    /// Fails with [`CacheError::RootRemove`] for the root and
    /// [`CacheError::ObjectNotFound`] if the object does not exist.
    pub fn remove(&mut self, handle: &ObjectHandle) -> CacheResult<()> {
        self.ensure_writable()?;
        if handle.is_root() {
            return Err(CacheError::RootRemove);
        }
        let handle = handle.canonical();
        let path = paths::object_path(&handle);
        if !self.store.exists(&path)? {
            return Err(CacheError::ObjectNotFound(handle));
        }
        self.store.remove(&path)?;
        self.tracker.clear(&handle);
        self.tracker.mark(handle.parent()?);
        Ok(())
    }

    /// Remove one named attribute from the object.
    pub fn remove_attribute(&mut self, handle: &ObjectHandle, name: &str) -> CacheResult<()> {
        self.ensure_writable()?;
        let handle = handle.canonical();
        if !self.contains(&handle)? {
            return Err(CacheError::ObjectNotFound(handle));
        }
        match self.store.remove(&paths::attribute_path(&handle, name)) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound(_)) => Err(CacheError::AttributeNotFound {
                object: handle,
                attribute: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    // -----------------------------------------------------------------------
    // Bound maintenance
    // -----------------------------------------------------------------------

    /// Write the node's cached bound if it changed, marking the parent stale
    /// on change. Writing an identical bound (or an empty bound where none
    /// was stored) is a no-op, which is what keeps edits localized.
    fn update_bound(&mut self, handle: &ObjectHandle, bound: Box3) -> CacheResult<()> {
        let path = paths::object_path(handle);
        match node::load_bound(&self.store, &path)? {
            Some(old) if old == bound => return Ok(()),
            None if bound.is_empty() => return Ok(()),
            _ => {}
        }
        node::write_bound(&self.store, &path, &bound)?;
        if !handle.is_root() {
            self.tracker.mark(handle.parent()?);
        }
        Ok(())
    }

    /// Recompute one node's bound from its shape and its children's cached
    /// bounds, then apply the node's local transform. A node that has been
    /// removed since it was marked contributes nothing.
    fn recompute_node(&mut self, handle: &ObjectHandle) -> CacheResult<()> {
        let path = paths::object_path(handle);
        if self.store.kind(&path)? != Some(EntryKind::Directory) {
            return Ok(());
        }
        let mut bound = Box3::empty();
        if let Some(shape) = node::load_shape(&self.store, &path)? {
            bound.extend_by(&shape.bound());
        }
        for child in node::children_names(&self.store, &path)? {
            let child_path = path.child(CHILDREN_DIR).child(child);
            if let Some(child_bound) = node::load_bound(&self.store, &child_path)? {
                bound.extend_by(&child_bound);
            }
        }
        if !bound.is_empty() {
            if let Some(m) = node::load_transform(&self.store, &path)? {
                bound = bound.transformed(&m);
            }
        }
        self.tracker.note_recomputation();
        debug!(node = %handle, "bound recomputed");
        self.update_bound(handle, bound)
    }

    /// Bring every cached bound in `handle`'s subtree (and `handle` itself)
    /// up to date.
    ///
    /// Stale nodes are drained deepest-first, so each recomputation reads
    /// already-valid child bounds; a recomputation can only re-mark the
    /// node's parent, which is strictly shallower, so the drain terminates.
    fn validate(&mut self, handle: &ObjectHandle) -> CacheResult<()> {
        while let Some(next) = self.tracker.deepest_under(handle) {
            self.recompute_node(&next)?;
            self.tracker.clear(&next);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// The object's bounding box in its parent's space, covering its shape
    /// and every descendant. Validates the subtree first; an object with no
    /// geometry anywhere beneath it has an empty bound.
    pub fn bound(&mut self, handle: &ObjectHandle) -> CacheResult<Box3> {
        let handle = handle.canonical();
        let path = paths::object_path(&handle);
        if self.store.kind(&path)? != Some(EntryKind::Directory) {
            return Err(CacheError::ObjectNotFound(handle));
        }
        self.validate(&handle)?;
        Ok(node::load_bound(&self.store, &path)?.unwrap_or_else(Box3::empty))
    }

    /// The object's local transform.
    pub fn transform_matrix(&self, handle: &ObjectHandle) -> CacheResult<Matrix4> {
        if handle.is_root() {
            return Err(CacheError::RootTransform);
        }
        let handle = handle.canonical();
        let path = paths::object_path(&handle);
        if !self.store.exists(&path)? {
            return Err(CacheError::ObjectNotFound(handle));
        }
        node::load_transform(&self.store, &path)?.ok_or(CacheError::NoTransform(handle))
    }

    /// The object's transform concatenated with all its ancestors', mapping
    /// the object's local space to world space. Identity for the root;
    /// ancestors without a stored transform contribute identity.
    pub fn global_transform_matrix(&self, handle: &ObjectHandle) -> CacheResult<Matrix4> {
        let handle = handle.canonical();
        if handle.is_root() {
            return Ok(Matrix4::identity());
        }
        if !self.contains(&handle)? {
            return Err(CacheError::ObjectNotFound(handle));
        }
        let mut out = Matrix4::identity();
        for ancestor in handle.ancestry() {
            if let Some(local) =
                node::load_transform(&self.store, &paths::object_path(&ancestor))?
            {
                out = out * local;
            }
        }
        Ok(out)
    }

    /// The object's stored shape.
    pub fn shape(&self, handle: &ObjectHandle) -> CacheResult<Shape> {
        if handle.is_root() {
            return Err(CacheError::RootShape);
        }
        let handle = handle.canonical();
        let path = paths::object_path(&handle);
        if !self.store.exists(&path)? {
            return Err(CacheError::ObjectNotFound(handle));
        }
        node::load_shape(&self.store, &path)?.ok_or(CacheError::NoShape(handle))
    }

    /// Read one named attribute.
    pub fn read_attribute(&self, handle: &ObjectHandle, name: &str) -> CacheResult<AttributeValue> {
        let handle = handle.canonical();
        match self.store.try_read(&paths::attribute_path(&handle, name))? {
            Some(value) => decode_attribute(&handle, name, &value),
            None => {
                if self.contains(&handle)? {
                    Err(CacheError::AttributeNotFound {
                        object: handle,
                        attribute: name.to_string(),
                    })
                } else {
                    Err(CacheError::ObjectNotFound(handle))
                }
            }
        }
    }

    /// Read all of the object's attributes, keyed by name.
    pub fn read_attributes(
        &self,
        handle: &ObjectHandle,
    ) -> CacheResult<BTreeMap<String, AttributeValue>> {
        let handle = handle.canonical();
        if !self.contains(&handle)? {
            return Err(CacheError::ObjectNotFound(handle));
        }
        let path = paths::object_path(&handle);
        let mut out = BTreeMap::new();
        for name in node::attribute_names(&self.store, &path)? {
            let value = self.store.read(&paths::attribute_path(&handle, &name))?;
            out.insert(name.clone(), decode_attribute(&handle, &name, &value)?);
        }
        Ok(out)
    }

    /// Returns `true` if the object exists.
    pub fn contains(&self, handle: &ObjectHandle) -> CacheResult<bool> {
        Ok(self.store.exists(&paths::object_path(&handle.canonical()))?)
    }

    /// Returns `true` if the object exists and has the named attribute.
    pub fn contains_attribute(&self, handle: &ObjectHandle, name: &str) -> CacheResult<bool> {
        Ok(self
            .store
            .exists(&paths::attribute_path(&handle.canonical(), name))?)
    }

    /// Returns `true` if the object exists and stores a shape.
    pub fn is_shape(&self, handle: &ObjectHandle) -> CacheResult<bool> {
        node::has_shape(&self.store, &paths::object_path(&handle.canonical()))
    }

    /// Returns `true` if the object exists and stores a local transform.
    pub fn is_transform(&self, handle: &ObjectHandle) -> CacheResult<bool> {
        node::has_transform(&self.store, &paths::object_path(&handle.canonical()))
    }

    /// The object's direct children, sorted by name. Empty for a missing
    /// object or one with no children.
    pub fn children(&self, handle: &ObjectHandle) -> CacheResult<Vec<ObjectHandle>> {
        let handle = handle.canonical();
        let path = paths::object_path(&handle);
        let mut out = Vec::new();
        for name in node::children_names(&self.store, &path)? {
            out.push(handle.join(&name)?);
        }
        Ok(out)
    }

    /// The object's attribute names, sorted. Empty for a missing object or
    /// one with no attributes.
    pub fn attributes(&self, handle: &ObjectHandle) -> CacheResult<Vec<String>> {
        node::attribute_names(&self.store, &paths::object_path(&handle.canonical()))
    }

    /// The object's attribute names matching a glob pattern (`*` and `?`),
    /// sorted.
    pub fn attributes_matching(
        &self,
        handle: &ObjectHandle,
        glob: &str,
    ) -> CacheResult<Vec<String>> {
        let mut names = self.attributes(handle)?;
        names.retain(|name| pattern::matches(glob, name));
        Ok(names)
    }

    /// Every object in the cache, depth-first with sorted siblings. The
    /// root is not listed.
    pub fn objects(&self) -> CacheResult<Vec<ObjectHandle>> {
        let mut out = Vec::new();
        let mut stack = vec![ObjectHandle::root()];
        while let Some(current) = stack.pop() {
            if !current.is_root() {
                out.push(current.clone());
            }
            let names = node::children_names(&self.store, &paths::object_path(&current))?;
            for name in names.iter().rev() {
                stack.push(current.join(name)?);
            }
        }
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Headers
    // -----------------------------------------------------------------------

    /// Cache-level header names, sorted.
    pub fn headers(&self) -> CacheResult<Vec<String>> {
        Ok(self.store.list(&paths::header_path(), EntryKind::Value)?)
    }

    /// Read one named header.
    pub fn read_header(&self, name: &str) -> CacheResult<AttributeValue> {
        match self.store.try_read(&paths::header_entry_path(name))? {
            Some(value) => decode_attribute(&ObjectHandle::root(), name, &value),
            None => Err(CacheError::HeaderNotFound(name.to_string())),
        }
    }

    /// Read all headers, keyed by name.
    pub fn read_headers(&self) -> CacheResult<BTreeMap<String, AttributeValue>> {
        let mut out = BTreeMap::new();
        for name in self.headers()? {
            out.insert(name.clone(), self.read_header(&name)?);
        }
        Ok(out)
    }

    /// Write one named header.
    pub fn write_header(&mut self, name: &str, value: &AttributeValue) -> CacheResult<()> {
        self.ensure_writable()?;
        validate_name(name)?;
        self.store
            .write(&paths::header_entry_path(name), &encode_attribute(value)?)?;
        Ok(())
    }

    /// Remove one named header.
    pub fn remove_header(&mut self, name: &str) -> CacheResult<()> {
        self.ensure_writable()?;
        match self.store.remove(&paths::header_entry_path(name)) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound(_)) => Err(CacheError::HeaderNotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle and instrumentation
    // -----------------------------------------------------------------------

    /// Validate every outstanding bound and persist the store. A no-op for
    /// a cache opened read-only.
    pub fn flush(&mut self) -> CacheResult<()> {
        if self.mode == OpenMode::Read {
            return Ok(());
        }
        self.validate(&ObjectHandle::root())?;
        self.store.flush()?;
        Ok(())
    }

    /// Total bound recomputations performed by this cache instance.
    pub fn recomputations(&self) -> u64 {
        self.tracker.recomputations()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: HierarchyStore> Drop for HierarchicalCache<S> {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            error!(error = %e, "cache flush failed during close");
        }
    }
}

impl<S: HierarchyStore> std::fmt::Debug for HierarchicalCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchicalCache")
            .field("mode", &self.mode)
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

/// Names must be storable as a single entry.
fn validate_name(name: &str) -> CacheResult<()> {
    if name.is_empty() || name.contains('/') {
        return Err(CacheError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn encode_attribute(value: &AttributeValue) -> CacheResult<StoreValue> {
    let bytes =
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(StoreValue::Bytes(bytes))
}

fn decode_attribute(
    handle: &ObjectHandle,
    name: &str,
    value: &StoreValue,
) -> CacheResult<AttributeValue> {
    let bytes = value.as_bytes().ok_or_else(|| {
        StoreError::Corrupt(format!("attribute {name:?} on {handle} is not a byte entry"))
    })?;
    let decoded = serde_json::from_slice(bytes).map_err(|e| {
        StoreError::Corrupt(format!("undecodable attribute {name:?} on {handle}: {e}"))
    })?;
    Ok(decoded)
}
