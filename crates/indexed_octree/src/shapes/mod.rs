//! Shape adapters: the bridge between caller geometry and the octree.
//!
//! The octree only knows shape indices and bounding boxes. Everything
//! primitive-specific (closest points, ray hits, inside/outside tests) lives
//! behind [`ShapeAdapter`].
//!
//! # Module Structure
//!
//! - [`bound_cache`]: `BoundCache` - optional per-shape box precomputation
//! - [`edges`]: `EdgeShapes` - line segments, 2D loop classification
//! - [`triangles`]: `TriangleShapes` - surface triangles, ray parity
//! - [`points`]: `PointShapes` - bare points

pub mod bound_cache;
pub mod edges;
pub mod points;
pub mod triangles;

pub use bound_cache::BoundCache;
pub use edges::EdgeShapes;
pub use points::PointShapes;
pub use triangles::TriangleShapes;

use glam::DVec3;

use crate::bounds::BoundBox;
use crate::error::{OctreeError, OctreeResult};
use crate::octree::NodeStore;
use crate::types::{LineQuery, PointQuery, VolumeType};

/// A fixed, indexed collection of geometric primitives.
///
/// Shape indices run over `0..size()`. Query methods receive the candidate
/// indices of one leaf and feed every evaluated candidate to the query state;
/// the state keeps the best one.
pub trait ShapeAdapter {
  /// Primitive kind, used in error messages.
  fn kind(&self) -> &'static str;

  /// Number of shapes.
  fn size(&self) -> usize;

  /// Axis-aligned box enclosing shape `index`.
  fn bounding_box(&self, index: usize) -> OctreeResult<BoundBox>;

  /// Whether shape `index` may touch `bounds`. Conservative: false positives
  /// only cost time.
  fn overlaps(&self, index: usize, bounds: &BoundBox) -> bool {
    self
      .bounding_box(index)
      .map_or(false, |shape_bounds| shape_bounds.overlaps(bounds))
  }

  /// One point per shape, used to seed the root box.
  fn representative_points(&self) -> Vec<DVec3>;

  /// Offer the closest point of each candidate to `query`.
  fn find_nearest_point(&self, indices: &[usize], query: &mut PointQuery);

  /// Offer the closest pair between `query.line` and each candidate.
  fn find_nearest_to_line(&self, indices: &[usize], query: &mut LineQuery);

  /// Whether [`ShapeAdapter::intersects_ray`] is meaningful.
  fn supports_ray_intersection(&self) -> bool {
    false
  }

  /// Intersection of segment `start..end` with shape `index`, if any.
  fn intersects_ray(&self, index: usize, start: DVec3, end: DVec3) -> OctreeResult<Option<DVec3>> {
    let _ = (index, start, end);
    Err(OctreeError::NotSupported {
      operation: "ray intersection",
      shape_kind: self.kind(),
    })
  }

  /// Inside/outside classification of `sample`, using `nodes` for probes.
  fn classify_point(&self, nodes: &NodeStore, sample: DVec3) -> VolumeType;
}

/// Per-adapter cache of shape boxes, or recompute on demand.
pub(crate) fn cached_or<F>(cache: &Option<BoundCache>, index: usize, compute: F) -> OctreeResult<BoundBox>
where
  F: FnOnce(usize) -> OctreeResult<BoundBox>,
{
  match cache {
    Some(cache) => cache.get(index),
    None => compute(index),
  }
}

/// Checks a label subset against the primitive count.
pub(crate) fn validate_labels(labels: &[usize], primitive_count: usize) -> OctreeResult<()> {
  labels
    .iter()
    .try_for_each(|&label| OctreeError::check_index(label, primitive_count))
}

/// Checks every vertex reference of a primitive list against the point count.
pub(crate) fn validate_vertices<const N: usize>(
  primitives: &[[usize; N]],
  labels: &[usize],
  point_count: usize,
) -> OctreeResult<()> {
  labels
    .iter()
    .filter_map(|&label| primitives.get(label))
    .flatten()
    .try_for_each(|&vertex| OctreeError::check_index(vertex, point_count))
}
