use thiserror::Error;

/// Errors produced by object handle operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// The name was expected to be absolute (root-anchored) but is not.
    #[error("invalid object name (must be absolute): {0:?}")]
    NotAbsolute(String),

    /// The name was expected to be relative but is root-anchored.
    #[error("invalid relative name (must not be absolute): {0:?}")]
    NotRelative(String),

    /// The name contains an empty path segment (`//` or a bare separator).
    #[error("object name contains an empty segment: {0:?}")]
    EmptySegment(String),

    /// The root node has no parent.
    #[error("root node has no parent")]
    RootHasNoParent,
}
