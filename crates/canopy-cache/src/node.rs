//! Typed accessors over the reserved entries of one node directory.
//!
//! These read and write the `transformMatrix`, `shape` and `boundingBox`
//! entries and list the `children` and `attributes` directories. They do no
//! dependency bookkeeping; the facade layers that on top.

use canopy_store::{EntryKind, HierarchyStore, StoreError, StorePath, StoreValue};
use canopy_types::{Box3, Matrix4, Shape};

use crate::error::CacheResult;
use crate::paths::{ATTRIBUTES_DIR, BOUND_ENTRY, CHILDREN_DIR, SHAPE_ENTRY, TRANSFORM_ENTRY};

/// Decode a fixed-length float entry, surfacing bad kinds or lengths as
/// corruption.
fn float_array<const N: usize>(path: &StorePath, value: &StoreValue) -> Result<[f64; N], StoreError> {
    let floats = value
        .as_floats()
        .ok_or_else(|| StoreError::Corrupt(format!("{path} is not a float entry")))?;
    <[f64; N]>::try_from(floats).map_err(|_| {
        StoreError::Corrupt(format!(
            "{path} holds {} floats, expected {N}",
            floats.len()
        ))
    })
}

/// The node's local transform, if one is stored.
pub fn load_transform<S: HierarchyStore>(
    store: &S,
    node: &StorePath,
) -> CacheResult<Option<Matrix4>> {
    let path = node.child(TRANSFORM_ENTRY);
    match store.try_read(&path)? {
        None => Ok(None),
        Some(value) => Ok(Some(Matrix4::from_array(float_array(&path, &value)?))),
    }
}

/// Store the node's local transform as 16 floats.
pub fn write_transform<S: HierarchyStore>(
    store: &S,
    node: &StorePath,
    matrix: &Matrix4,
) -> CacheResult<()> {
    let value = StoreValue::Floats(matrix.to_array().to_vec());
    store.write(&node.child(TRANSFORM_ENTRY), &value)?;
    Ok(())
}

/// The node's shape, if one is stored. An undecodable payload is surfaced
/// as [`StoreError::Corrupt`], never silently treated as empty.
pub fn load_shape<S: HierarchyStore>(store: &S, node: &StorePath) -> CacheResult<Option<Shape>> {
    let path = node.child(SHAPE_ENTRY);
    match store.try_read(&path)? {
        None => Ok(None),
        Some(value) => {
            let bytes = value
                .as_bytes()
                .ok_or_else(|| StoreError::Corrupt(format!("{path} is not a byte entry")))?;
            let shape = bincode::deserialize(bytes)
                .map_err(|e| StoreError::Corrupt(format!("undecodable shape at {path}: {e}")))?;
            Ok(Some(shape))
        }
    }
}

/// Store the node's shape as an opaque serialized payload.
pub fn write_shape<S: HierarchyStore>(store: &S, node: &StorePath, shape: &Shape) -> CacheResult<()> {
    let bytes = bincode::serialize(shape).map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.write(&node.child(SHAPE_ENTRY), &StoreValue::Bytes(bytes))?;
    Ok(())
}

/// The node's cached bound, if one is stored.
pub fn load_bound<S: HierarchyStore>(store: &S, node: &StorePath) -> CacheResult<Option<Box3>> {
    let path = node.child(BOUND_ENTRY);
    match store.try_read(&path)? {
        None => Ok(None),
        Some(value) => Ok(Some(Box3::from_array(float_array(&path, &value)?))),
    }
}

/// Store the node's cached bound as 6 floats.
pub fn write_bound<S: HierarchyStore>(store: &S, node: &StorePath, bound: &Box3) -> CacheResult<()> {
    let value = StoreValue::Floats(bound.to_array().to_vec());
    store.write(&node.child(BOUND_ENTRY), &value)?;
    Ok(())
}

/// Sorted child names. A node without a `children` directory has none.
pub fn children_names<S: HierarchyStore>(store: &S, node: &StorePath) -> CacheResult<Vec<String>> {
    match store.list(&node.child(CHILDREN_DIR), EntryKind::Directory) {
        Ok(names) => Ok(names),
        Err(StoreError::NotFound(_)) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Sorted attribute names. A node without an `attributes` directory has none.
pub fn attribute_names<S: HierarchyStore>(store: &S, node: &StorePath) -> CacheResult<Vec<String>> {
    match store.list(&node.child(ATTRIBUTES_DIR), EntryKind::Value) {
        Ok(names) => Ok(names),
        Err(StoreError::NotFound(_)) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

/// Whether the node stores a shape.
pub fn has_shape<S: HierarchyStore>(store: &S, node: &StorePath) -> CacheResult<bool> {
    Ok(store.exists(&node.child(SHAPE_ENTRY))?)
}

/// Whether the node stores a local transform.
pub fn has_transform<S: HierarchyStore>(store: &S, node: &StorePath) -> CacheResult<bool> {
    Ok(store.exists(&node.child(TRANSFORM_ENTRY))?)
}
