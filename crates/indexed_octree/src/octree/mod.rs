//! Octree module: construction and queries over a shape adapter.
//!
//! The tree is an explicit arena of nodes. Each node covers one octant of its
//! parent's box; leaves list the shapes whose boxes overlap them, so a shape
//! spanning several octants appears in several leaves.
//!
//! # Module Structure
//!
//! - [`config`]: `OctreeConfig` - subdivision limits and root box control
//! - [`node`]: `NodeStore` - node arena and shared leaf index list
//! - [`build`]: depth-first builder
//! - [`stats`]: `BuildStats` - counters from the last build
//! - [`query`]: traversals (nearest, line, ray, box, classification)

pub mod build;
pub mod config;
pub mod node;
pub mod query;
pub mod stats;

// Re-exports
pub use config::OctreeConfig;
pub use node::{Node, NodeId, NodeKind, NodeStore};
pub use query::SegmentStep;
pub use stats::BuildStats;

use glam::DVec3;

use crate::bounds::BoundBox;
use crate::error::OctreeResult;
use crate::geometry::LineSegment;
use crate::shapes::ShapeAdapter;
use crate::types::{LineHit, PointHit, RayHit, VolumeType};

/// Read-only octree over the shapes of adapter `S`.
///
/// Immutable after [`IndexedOctree::build`]; to index changed geometry, take
/// the adapter back with [`IndexedOctree::into_shapes`] and rebuild.
#[derive(Clone, Debug)]
pub struct IndexedOctree<S> {
  shapes: S,
  nodes: NodeStore,
  config: OctreeConfig,
  stats: BuildStats,
}

impl<S: ShapeAdapter> IndexedOctree<S> {
  /// Build a tree over every shape of `shapes`.
  ///
  /// # Errors
  /// - `InvalidConfig` if `config` is out of range
  /// - `InvalidGeometry` if a shape box is malformed or the representative
  ///   points are missing or non-finite
  pub fn build(shapes: S, config: &OctreeConfig) -> OctreeResult<Self> {
    let (nodes, stats) = build::build_nodes(&shapes, config)?;
    Ok(Self {
      shapes,
      nodes,
      config: config.clone(),
      stats,
    })
  }

  /// The adapter.
  #[inline]
  pub fn shapes(&self) -> &S {
    &self.shapes
  }

  /// The node arena.
  #[inline]
  pub fn nodes(&self) -> &NodeStore {
    &self.nodes
  }

  /// Parameters the tree was built with.
  #[inline]
  pub fn config(&self) -> &OctreeConfig {
    &self.config
  }

  /// Counters from the build.
  #[inline]
  pub fn stats(&self) -> &BuildStats {
    &self.stats
  }

  /// Root box, `None` for a tree over zero shapes.
  #[inline]
  pub fn bounds(&self) -> Option<BoundBox> {
    self.nodes.root_bounds()
  }

  /// True if the tree indexes no shapes.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Give the adapter back.
  pub fn into_shapes(self) -> S {
    self.shapes
  }

  /// Nearest shape to `sample`. `None` for an empty tree or a non-finite
  /// sample.
  pub fn find_nearest(&self, sample: DVec3) -> Option<PointHit> {
    self.nodes.find_nearest(&self.shapes, sample)
  }

  /// Nearest shape with squared distance below `max_distance_squared`.
  pub fn find_nearest_within(&self, sample: DVec3, max_distance_squared: f64) -> Option<PointHit> {
    self
      .nodes
      .find_nearest_within(&self.shapes, sample, max_distance_squared)
  }

  /// Nearest shape to a line segment.
  pub fn find_nearest_to_line(&self, line: &LineSegment) -> Option<LineHit> {
    self.nodes.find_nearest_to_line(&self.shapes, line)
  }

  /// Nearest shape to a line segment, searching only nodes that overlap
  /// `tightest`. Returns the hit and the shrunk pruning box.
  pub fn find_nearest_to_line_within(
    &self,
    line: &LineSegment,
    tightest: BoundBox,
  ) -> (Option<LineHit>, BoundBox) {
    self
      .nodes
      .find_nearest_to_line_within(&self.shapes, line, tightest)
  }

  /// Nearest intersection of segment `start..end`.
  ///
  /// # Errors
  /// `NotSupported` if the adapter has no ray test.
  pub fn find_line(&self, start: DVec3, end: DVec3) -> OctreeResult<Option<RayHit>> {
    self.nodes.find_line(&self.shapes, start, end)
  }

  /// Any intersection of segment `start..end`.
  ///
  /// # Errors
  /// `NotSupported` if the adapter has no ray test.
  pub fn find_line_any(&self, start: DVec3, end: DVec3) -> OctreeResult<Option<RayHit>> {
    self.nodes.find_line_any(&self.shapes, start, end)
  }

  /// Shapes whose boxes overlap `bounds`, sorted and deduplicated.
  pub fn find_box(&self, bounds: &BoundBox) -> Vec<usize> {
    self.nodes.find_box(&self.shapes, bounds)
  }

  /// Inside/outside classification of `sample`.
  pub fn get_volume_type(&self, sample: DVec3) -> VolumeType {
    self.nodes.get_volume_type(&self.shapes, sample)
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
