//! Triangle adapter: surface faces over indexed points.
//!
//! Supports ray intersection, and classifies points by ray parity when the
//! triangle subset forms a closed surface.

use std::collections::HashMap;

use glam::DVec3;

use super::{cached_or, validate_labels, validate_vertices, BoundCache, ShapeAdapter};
use crate::bounds::BoundBox;
use crate::constants::{CLASSIFY_TOLERANCE, PROBE_BARYCENTRIC_TOLERANCE, PROBE_DIRECTIONS};
use crate::error::{OctreeError, OctreeResult};
use crate::geometry::{
  closest_point_on_triangle, is_degenerate_triangle, ray_triangle_crossing,
  segment_triangle_closest_points, segment_triangle_intersection,
};
use crate::octree::{NodeStore, SegmentStep};
use crate::types::{LineQuery, PointQuery, VolumeType};

/// Triangles `points[faces[labels[i]]]`.
#[derive(Clone, Debug)]
pub struct TriangleShapes<'a> {
  faces: &'a [[usize; 3]],
  points: &'a [DVec3],
  labels: Vec<usize>,
  bounds: Option<BoundCache>,
  closed: bool,
}

impl<'a> TriangleShapes<'a> {
  /// Adapter over the faces named by `labels`.
  ///
  /// # Errors
  /// `IndexOutOfRange` if a label is not a face or a corner is not a point.
  pub fn new(
    faces: &'a [[usize; 3]],
    points: &'a [DVec3],
    labels: Vec<usize>,
    cache_bounds: bool,
  ) -> OctreeResult<Self> {
    validate_labels(&labels, faces.len())?;
    validate_vertices(faces, &labels, points.len())?;

    let closed = is_closed_surface(faces, &labels);
    let mut shapes = Self {
      faces,
      points,
      labels,
      bounds: None,
      closed,
    };
    if cache_bounds {
      shapes.bounds = Some(BoundCache::from_fn(shapes.labels.len(), |i| {
        shapes.corner_bounds(i)
      })?);
    }
    Ok(shapes)
  }

  /// Adapter over every face.
  pub fn all(faces: &'a [[usize; 3]], points: &'a [DVec3], cache_bounds: bool) -> OctreeResult<Self> {
    Self::new(faces, points, (0..faces.len()).collect(), cache_bounds)
  }

  /// Face index in the caller's array for shape `index`.
  pub fn label(&self, index: usize) -> OctreeResult<usize> {
    self
      .labels
      .get(index)
      .copied()
      .ok_or(OctreeError::IndexOutOfRange {
        index,
        size: self.labels.len(),
      })
  }

  /// Corner positions of shape `index`.
  pub fn corners(&self, index: usize) -> OctreeResult<[DVec3; 3]> {
    let [a, b, c] = self.faces[self.label(index)?];
    Ok([self.points[a], self.points[b], self.points[c]])
  }

  /// Every undirected edge of the subset is shared by exactly two faces.
  pub fn is_closed(&self) -> bool {
    self.closed
  }

  fn corner_bounds(&self, index: usize) -> OctreeResult<BoundBox> {
    let [a, b, c] = self.corners(index)?;
    Ok(BoundBox {
      min: a.min(b).min(c),
      max: a.max(b).max(c),
    })
  }

  /// Count probe crossings from `sample` towards `end`, or `None` if the
  /// probe grazes an edge or runs inside a face plane.
  fn probe_crossings(&self, nodes: &NodeStore, sample: DVec3, end: DVec3, tolerance: f64) -> Option<usize> {
    let dir = end - sample;
    let mut seen = vec![false; self.labels.len()];
    let mut crossings = 0usize;
    let mut degenerate = false;

    nodes.walk_segment(sample, end, |indices| {
      for &index in indices {
        // Skip repeats and indices this adapter does not own.
        match seen.get_mut(index) {
          Some(visited) if !*visited => *visited = true,
          _ => continue,
        }
        let Ok([a, b, c]) = self.corners(index) else {
          continue;
        };
        if is_degenerate_triangle(a, b, c) {
          continue;
        }
        match ray_triangle_crossing(sample, dir, a, b, c) {
          None => {
            // Parallel: degenerate only if the probe lies in the face plane.
            let normal = (b - a).cross(c - a).normalize_or_zero();
            if (sample - a).dot(normal).abs() <= tolerance {
              degenerate = true;
            }
          }
          Some(crossing) => {
            if crossing.t < 0.0 || crossing.t > 1.0 {
              continue;
            }
            let weight = crossing.min_weight();
            if weight < -PROBE_BARYCENTRIC_TOLERANCE {
              continue;
            }
            if weight < PROBE_BARYCENTRIC_TOLERANCE {
              degenerate = true;
            } else {
              crossings += 1;
            }
          }
        }
        if degenerate {
          return SegmentStep::Stop;
        }
      }
      SegmentStep::Continue
    });

    (!degenerate).then_some(crossings)
  }
}

/// Closed when every undirected edge of the face subset is used exactly twice.
fn is_closed_surface(faces: &[[usize; 3]], labels: &[usize]) -> bool {
  let mut uses: HashMap<(usize, usize), u32> = HashMap::new();
  for &[a, b, c] in labels.iter().filter_map(|&label| faces.get(label)) {
    for (p, q) in [(a, b), (b, c), (c, a)] {
      *uses.entry((p.min(q), p.max(q))).or_insert(0) += 1;
    }
  }
  !labels.is_empty() && uses.values().all(|&n| n == 2)
}

impl ShapeAdapter for TriangleShapes<'_> {
  fn kind(&self) -> &'static str {
    "triangle"
  }

  fn size(&self) -> usize {
    self.labels.len()
  }

  fn bounding_box(&self, index: usize) -> OctreeResult<BoundBox> {
    cached_or(&self.bounds, index, |i| self.corner_bounds(i))
  }

  fn representative_points(&self) -> Vec<DVec3> {
    (0..self.labels.len())
      .filter_map(|i| self.corners(i).ok())
      .map(|[a, b, c]| (a + b + c) / 3.0)
      .collect()
  }

  fn find_nearest_point(&self, indices: &[usize], query: &mut PointQuery) {
    for &index in indices {
      if let Ok([a, b, c]) = self.corners(index) {
        let point = closest_point_on_triangle(query.sample, a, b, c);
        query.offer(index, point);
      }
    }
  }

  fn find_nearest_to_line(&self, indices: &[usize], query: &mut LineQuery) {
    for &index in indices {
      if let Ok([a, b, c]) = self.corners(index) {
        let (line_point, shape_point) = segment_triangle_closest_points(&query.line, a, b, c);
        query.offer(index, line_point, shape_point);
      }
    }
  }

  fn supports_ray_intersection(&self) -> bool {
    true
  }

  fn intersects_ray(&self, index: usize, start: DVec3, end: DVec3) -> OctreeResult<Option<DVec3>> {
    let [a, b, c] = self.corners(index)?;
    Ok(segment_triangle_intersection(start, end, a, b, c).map(|(_, point)| point))
  }

  fn classify_point(&self, nodes: &NodeStore, sample: DVec3) -> VolumeType {
    let Some(root) = nodes.root_bounds() else {
      return VolumeType::Unknown;
    };
    if self.labels.is_empty() || !sample.is_finite() {
      return VolumeType::Unknown;
    }
    if !self.closed {
      return VolumeType::Mixed;
    }
    if !root.contains_point(sample) {
      return VolumeType::Outside;
    }

    let tolerance = CLASSIFY_TOLERANCE * root.diagonal();
    if nodes
      .find_nearest_within(self, sample, tolerance * tolerance)
      .is_some()
    {
      return VolumeType::Mixed;
    }

    let reach = 2.0 * root.diagonal() + sample.distance(root.center());
    PROBE_DIRECTIONS
      .iter()
      .find_map(|&dir| {
        let end = sample + DVec3::from_array(dir).normalize() * reach;
        self.probe_crossings(nodes, sample, end, tolerance)
      })
      .map_or(VolumeType::Unknown, VolumeType::from_crossings)
  }
}

#[cfg(test)]
#[path = "triangles_test.rs"]
mod triangles_test;
