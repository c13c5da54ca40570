//! Build statistics.

use std::time::Duration;

/// Counters collected while building a tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildStats {
  /// Shapes indexed.
  pub shape_count: usize,
  /// Total nodes.
  pub node_count: usize,
  /// Nodes with children.
  pub internal_count: usize,
  /// Leaf nodes.
  pub leaf_count: usize,
  /// Sum of leaf sizes (shapes spanning leaves count once per leaf).
  pub stored_indices: usize,
  /// Depth of the deepest leaf.
  pub max_leaf_depth: u32,
  /// Leaves that stopped splitting at `max_depth`.
  pub depth_limited_leaves: usize,
  /// Leaves that stopped splitting at `max_duplicity`.
  pub duplicity_limited_leaves: usize,
  /// Wall time of the build.
  pub elapsed: Duration,
}

impl BuildStats {
  /// Average number of leaves each shape lands in.
  pub fn average_duplicity(&self) -> f64 {
    if self.shape_count == 0 {
      0.0
    } else {
      self.stored_indices as f64 / self.shape_count as f64
    }
  }

  /// Build time in microseconds.
  pub fn elapsed_us(&self) -> u64 {
    self.elapsed.as_micros() as u64
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_average_duplicity() {
    let stats = BuildStats {
      shape_count: 4,
      stored_indices: 10,
      ..Default::default()
    };
    assert_eq!(stats.average_duplicity(), 2.5);
    assert_eq!(BuildStats::default().average_duplicity(), 0.0);
  }

  #[test]
  fn test_elapsed_us() {
    let stats = BuildStats {
      elapsed: Duration::from_millis(3),
      ..Default::default()
    };
    assert_eq!(stats.elapsed_us(), 3000);
  }
}
