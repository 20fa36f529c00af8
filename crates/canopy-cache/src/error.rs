use canopy_store::StoreError;
use canopy_types::{HandleError, ObjectHandle};

/// Errors from cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A malformed or misused object handle.
    #[error(transparent)]
    Handle(#[from] HandleError),

    /// A failure surfaced by the store adapter, propagated as-is.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The referenced object does not exist in the cache.
    #[error("no object at {0}")]
    ObjectNotFound(ObjectHandle),

    /// The referenced attribute does not exist on the object.
    #[error("object {object} has no attribute {attribute:?}")]
    AttributeNotFound {
        object: ObjectHandle,
        attribute: String,
    },

    /// The referenced header does not exist.
    #[error("no header named {0:?}")]
    HeaderNotFound(String),

    /// The object exists but holds no transform.
    #[error("object {0} has no stored transform")]
    NoTransform(ObjectHandle),

    /// The object exists but holds no shape.
    #[error("object {0} has no stored shape")]
    NoShape(ObjectHandle),

    /// The root node cannot hold a transform.
    #[error("root node cannot have a transform")]
    RootTransform,

    /// The root node cannot hold a shape.
    #[error("root node cannot have a shape")]
    RootShape,

    /// The root node cannot be removed.
    #[error("root node is not removable")]
    RootRemove,

    /// The opened store does not contain a hierarchical cache.
    #[error("not a hierarchical cache store")]
    NotACache,

    /// A mutating operation on a cache opened read-only.
    #[error("cache was opened read-only")]
    ReadOnly,

    /// An attribute or header name that cannot be stored.
    #[error("invalid attribute or header name: {0:?}")]
    InvalidName(String),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
