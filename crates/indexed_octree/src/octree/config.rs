//! OctreeConfig - subdivision limits and root box control.

use crate::bounds::BoundBox;
use crate::constants::{
  DEFAULT_MAX_DEPTH, DEFAULT_MAX_DUPLICITY, DEFAULT_MAX_LEAF_SIZE, DEFAULT_ROOT_EXPANSION,
  MAX_SUPPORTED_DEPTH,
};
use crate::error::{OctreeError, OctreeResult};

/// Build parameters for [`IndexedOctree`](super::IndexedOctree).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OctreeConfig {
  /// A node with at most this many shapes stays a leaf.
  pub max_leaf_size: usize,

  /// Nodes at this depth are always leaves. The root is depth 0.
  pub max_depth: u32,

  /// Split only if the children together hold at most
  /// `max_duplicity * count` indices.
  pub max_duplicity: f64,

  /// Fixed root box, grown if needed to cover every shape. `None` derives it
  /// from the shapes.
  pub root_bounds: Option<BoundBox>,

  /// Relative padding added to the derived root box.
  pub root_expansion: f64,
}

impl OctreeConfig {
  /// Set the leaf size limit.
  pub fn with_max_leaf_size(mut self, max_leaf_size: usize) -> Self {
    self.max_leaf_size = max_leaf_size;
    self
  }

  /// Set the depth limit.
  pub fn with_max_depth(mut self, max_depth: u32) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Set the duplicity limit.
  pub fn with_max_duplicity(mut self, max_duplicity: f64) -> Self {
    self.max_duplicity = max_duplicity;
    self
  }

  /// Use a fixed root box.
  pub fn with_root_bounds(mut self, root_bounds: BoundBox) -> Self {
    self.root_bounds = Some(root_bounds);
    self
  }

  /// Set the relative root padding.
  pub fn with_root_expansion(mut self, root_expansion: f64) -> Self {
    self.root_expansion = root_expansion;
    self
  }

  /// Check every parameter is in range.
  pub fn validate(&self) -> OctreeResult<()> {
    if self.max_leaf_size == 0 {
      return Err(OctreeError::invalid_config("max_leaf_size must be at least 1"));
    }
    if self.max_depth > MAX_SUPPORTED_DEPTH {
      return Err(OctreeError::invalid_config(format!(
        "max_depth {} exceeds {}",
        self.max_depth, MAX_SUPPORTED_DEPTH
      )));
    }
    if !(self.max_duplicity.is_finite() && self.max_duplicity >= 1.0) {
      return Err(OctreeError::invalid_config(format!(
        "max_duplicity must be finite and >= 1, got {}",
        self.max_duplicity
      )));
    }
    if !(self.root_expansion.is_finite() && self.root_expansion >= 0.0) {
      return Err(OctreeError::invalid_config(format!(
        "root_expansion must be finite and >= 0, got {}",
        self.root_expansion
      )));
    }
    if let Some(bounds) = &self.root_bounds {
      if !bounds.is_valid() {
        return Err(OctreeError::invalid_config(format!(
          "root_bounds is not a valid box: {:?}",
          bounds
        )));
      }
    }
    Ok(())
  }
}

impl Default for OctreeConfig {
  fn default() -> Self {
    Self {
      max_leaf_size: DEFAULT_MAX_LEAF_SIZE,
      max_depth: DEFAULT_MAX_DEPTH,
      max_duplicity: DEFAULT_MAX_DUPLICITY,
      root_bounds: None,
      root_expansion: DEFAULT_ROOT_EXPANSION,
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
