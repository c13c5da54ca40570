//! Point adapter: bare points, no volume.

use glam::DVec3;

use super::{cached_or, validate_labels, BoundCache, ShapeAdapter};
use crate::bounds::BoundBox;
use crate::error::{OctreeError, OctreeResult};
use crate::octree::NodeStore;
use crate::types::{LineQuery, PointQuery, VolumeType};

/// Points `points[labels[i]]`.
#[derive(Clone, Debug)]
pub struct PointShapes<'a> {
  points: &'a [DVec3],
  labels: Vec<usize>,
  bounds: Option<BoundCache>,
}

impl<'a> PointShapes<'a> {
  /// Adapter over the points named by `labels`.
  pub fn new(points: &'a [DVec3], labels: Vec<usize>, cache_bounds: bool) -> OctreeResult<Self> {
    validate_labels(&labels, points.len())?;
    let mut shapes = Self {
      points,
      labels,
      bounds: None,
    };
    if cache_bounds {
      shapes.bounds = Some(BoundCache::from_fn(shapes.labels.len(), |i| {
        shapes.point(i).map(|p| BoundBox { min: p, max: p })
      })?);
    }
    Ok(shapes)
  }

  /// Adapter over every point.
  pub fn all(points: &'a [DVec3], cache_bounds: bool) -> OctreeResult<Self> {
    Self::new(points, (0..points.len()).collect(), cache_bounds)
  }

  /// Position of shape `index`.
  pub fn point(&self, index: usize) -> OctreeResult<DVec3> {
    let label = self
      .labels
      .get(index)
      .copied()
      .ok_or(OctreeError::IndexOutOfRange {
        index,
        size: self.labels.len(),
      })?;
    Ok(self.points[label])
  }
}

impl ShapeAdapter for PointShapes<'_> {
  fn kind(&self) -> &'static str {
    "point"
  }

  fn size(&self) -> usize {
    self.labels.len()
  }

  fn bounding_box(&self, index: usize) -> OctreeResult<BoundBox> {
    cached_or(&self.bounds, index, |i| {
      self.point(i).map(|p| BoundBox { min: p, max: p })
    })
  }

  fn representative_points(&self) -> Vec<DVec3> {
    self.labels.iter().map(|&label| self.points[label]).collect()
  }

  fn find_nearest_point(&self, indices: &[usize], query: &mut PointQuery) {
    for &index in indices {
      if let Ok(point) = self.point(index) {
        query.offer(index, point);
      }
    }
  }

  fn find_nearest_to_line(&self, indices: &[usize], query: &mut LineQuery) {
    for &index in indices {
      if let Ok(point) = self.point(index) {
        let (_, line_point) = query.line.closest_point(point);
        query.offer(index, line_point, point);
      }
    }
  }

  /// Points enclose nothing.
  fn classify_point(&self, _nodes: &NodeStore, _sample: DVec3) -> VolumeType {
    VolumeType::Unknown
  }
}

#[cfg(test)]
#[path = "points_test.rs"]
mod points_test;
