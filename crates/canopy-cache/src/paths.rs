//! The persisted layout: mapping object handles to store paths.
//!
//! Every cached node is a store directory. A node's children live under its
//! `children` directory, keyed by leaf name, and its attributes under
//! `attributes`. Three reserved value entries sit directly inside the node
//! directory: `transformMatrix` (16 floats), `shape` (opaque bytes) and
//! `boundingBox` (6 floats). Cache-level headers live in a `HierarchicalCache`
//! directory at the store root, which doubles as the format marker.

use canopy_store::StorePath;
use canopy_types::ObjectHandle;

/// Directory holding a node's children.
pub const CHILDREN_DIR: &str = "children";
/// Directory holding a node's attributes.
pub const ATTRIBUTES_DIR: &str = "attributes";
/// Root directory holding cache-level headers.
pub const HEADER_DIR: &str = "HierarchicalCache";
/// Value entry holding a node's local transform, 16 floats.
pub const TRANSFORM_ENTRY: &str = "transformMatrix";
/// Value entry holding a node's serialized shape.
pub const SHAPE_ENTRY: &str = "shape";
/// Value entry holding a node's cached bound, 6 floats.
pub const BOUND_ENTRY: &str = "boundingBox";

/// The store directory of the node named by `handle`.
///
/// The root handle maps to the store root; `/a/b` maps to
/// `/children/a/children/b`.
pub fn object_path(handle: &ObjectHandle) -> StorePath {
    let mut path = StorePath::root();
    for segment in handle.segments() {
        path.push(CHILDREN_DIR);
        path.push(segment);
    }
    path
}

/// The store directory holding the node's attributes.
pub fn attributes_path(handle: &ObjectHandle) -> StorePath {
    object_path(handle).child(ATTRIBUTES_DIR)
}

/// The store entry of one named attribute on the node.
pub fn attribute_path(handle: &ObjectHandle, name: &str) -> StorePath {
    attributes_path(handle).child(name)
}

/// The store directory holding cache-level headers.
pub fn header_path() -> StorePath {
    StorePath::root().child(HEADER_DIR)
}

/// The store entry of one named header.
pub fn header_entry_path(name: &str) -> StorePath {
    header_path().child(name)
}
