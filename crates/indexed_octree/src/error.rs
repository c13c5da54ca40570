//! Error types for octree construction and queries.

use thiserror::Error;

/// Errors that can occur while building or querying an octree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OctreeError {
  /// Adapter produced a malformed box, non-finite coordinates, or an
  /// inconsistent shape count. Fatal at construction.
  #[error("invalid geometry: {details}")]
  InvalidGeometry {
    /// Description of the malformed data.
    details: String,
  },

  /// Shape index outside the adapter's collection.
  #[error("index {index} out of range for collection of {size}")]
  IndexOutOfRange {
    /// Offending index.
    index: usize,
    /// Size of the collection it was checked against.
    size: usize,
  },

  /// Query has no meaning for this primitive kind (e.g. ray hits on bare
  /// edges). Callers should check the capability or fall back.
  #[error("{operation} is not supported for {shape_kind} shapes")]
  NotSupported {
    /// Name of the rejected operation.
    operation: &'static str,
    /// Primitive kind of the adapter.
    shape_kind: &'static str,
  },

  /// Build parameters are out of range.
  #[error("invalid octree configuration: {details}")]
  InvalidConfig {
    /// Description of the bad parameter.
    details: String,
  },

  /// Registry lookup for a tag with no constructor.
  #[error("no shape constructor registered for `{kind}`")]
  UnknownShapeKind {
    /// The unresolved tag.
    kind: String,
  },
}

impl OctreeError {
  /// Shorthand for [`OctreeError::InvalidGeometry`].
  pub fn invalid_geometry(details: impl Into<String>) -> Self {
    Self::InvalidGeometry {
      details: details.into(),
    }
  }

  /// Shorthand for [`OctreeError::InvalidConfig`].
  pub fn invalid_config(details: impl Into<String>) -> Self {
    Self::InvalidConfig {
      details: details.into(),
    }
  }

  /// Check an index against a collection size.
  #[inline]
  pub fn check_index(index: usize, size: usize) -> OctreeResult<()> {
    if index < size {
      Ok(())
    } else {
      Err(Self::IndexOutOfRange { index, size })
    }
  }
}

/// Result type for octree operations.
pub type OctreeResult<T> = Result<T, OctreeError>;
