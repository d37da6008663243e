/// Convenience result type used across canopy.
pub type CanopyResult<T> = Result<T, CanopyError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Per-node problems are mostly recovered from (logged and skipped) so one bad
/// node never aborts a whole render; only structurally invalid tree operations
/// and stale handles surface as hard errors.
#[derive(thiserror::Error, Debug)]
pub enum CanopyError {
    /// A child/group operation was attempted on a leaf node.
    #[error("invalid tree shape: {0}")]
    InvalidTreeShape(String),

    /// A factory was given a shape kind it does not know.
    #[error("unknown shape kind: {0}")]
    UnknownShapeKind(String),

    /// A node handle that no longer refers to a live node.
    #[error("stale node reference: {0}")]
    StaleNode(String),

    /// A task id that is no longer scheduled.
    #[error("stale task reference: {0}")]
    StaleTaskReference(u64),

    /// A backend received a transform matrix it cannot decompose.
    #[error("non-square transform matrix: {0}")]
    NonSquareTransformMatrix(String),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or backends.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CanopyError {
    /// Build a [`CanopyError::InvalidTreeShape`] value.
    pub fn invalid_tree_shape(msg: impl Into<String>) -> Self {
        Self::InvalidTreeShape(msg.into())
    }

    /// Build a [`CanopyError::UnknownShapeKind`] value.
    pub fn unknown_shape_kind(msg: impl Into<String>) -> Self {
        Self::UnknownShapeKind(msg.into())
    }

    /// Build a [`CanopyError::StaleNode`] value.
    pub fn stale_node(msg: impl Into<String>) -> Self {
        Self::StaleNode(msg.into())
    }

    /// Build a [`CanopyError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CanopyError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
