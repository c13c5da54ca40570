//! Edge adapter: line segments between indexed points.
//!
//! # Classification
//!
//! Edges enclose an area, not a volume, so classification is the planar
//! analogue of ray parity. The edge subset must form closed loops (every used
//! vertex has even degree) lying in one plane. A probe is cast from the sample
//! inside that plane and the edges it crosses are counted.
//!
//! ```text
//!   +-----------+
//!   |           |      odd crossings  -> Inside
//!   |   s ------+--->  even crossings -> Outside
//!   |           |      grazes vertex  -> retry next angle
//!   +-----------+
//! ```

use std::collections::HashMap;

use glam::{DVec2, DVec3};

use super::{cached_or, validate_labels, validate_vertices, BoundCache, ShapeAdapter};
use crate::bounds::BoundBox;
use crate::constants::{
  CLASSIFY_TOLERANCE, DEGENERATE_LENGTH_SQ, PARALLEL_TOLERANCE, PROBE_ANGLES,
  PROBE_BARYCENTRIC_TOLERANCE,
};
use crate::error::{OctreeError, OctreeResult};
use crate::geometry::LineSegment;
use crate::octree::{NodeStore, SegmentStep};
use crate::types::{LineQuery, PointQuery, VolumeType};

/// Plane holding every vertex of a loop set, with an in-plane frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopPlane {
  /// A vertex on the plane.
  pub origin: DVec3,
  /// Unit normal.
  pub normal: DVec3,
  /// First in-plane unit axis.
  pub axis_u: DVec3,
  /// Second in-plane unit axis (`normal x axis_u`).
  pub axis_v: DVec3,
}

impl LoopPlane {
  /// Signed distance from the plane.
  #[inline]
  pub fn signed_distance(&self, point: DVec3) -> f64 {
    (point - self.origin).dot(self.normal)
  }

  /// In-plane coordinates of `point` (its normal component is dropped).
  #[inline]
  pub fn project(&self, point: DVec3) -> DVec2 {
    let rel = point - self.origin;
    DVec2::new(rel.dot(self.axis_u), rel.dot(self.axis_v))
  }

  /// Unit direction in the plane at `angle` from `axis_u`.
  #[inline]
  pub fn direction(&self, angle: f64) -> DVec3 {
    self.axis_u * angle.cos() + self.axis_v * angle.sin()
  }

  /// Fit a plane through `points`. `None` if they are collinear or do not
  /// share a plane within `tolerance`.
  pub fn fit(points: &[DVec3], tolerance: f64) -> Option<Self> {
    let origin = *points.first()?;
    let far = points
      .iter()
      .copied()
      .max_by(|a, b| a.distance_squared(origin).total_cmp(&b.distance_squared(origin)))?;
    let axis = far - origin;
    if axis.length_squared() <= DEGENERATE_LENGTH_SQ {
      return None;
    }
    let normal = points
      .iter()
      .map(|&p| axis.cross(p - origin))
      .max_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))?;
    if normal.length_squared() <= axis.length_squared() * tolerance * tolerance {
      return None;
    }

    let normal = normal.normalize();
    let axis_u = axis.normalize();
    let plane = Self {
      origin,
      normal,
      axis_u,
      axis_v: normal.cross(axis_u),
    };
    points
      .iter()
      .all(|&p| plane.signed_distance(p).abs() <= tolerance)
      .then_some(plane)
  }
}

/// Loop structure of an edge subset, computed once at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopTopology {
  /// Every used vertex has even degree (and there is at least one edge).
  pub closed: bool,
  /// Common plane of the used vertices, if any.
  pub plane: Option<LoopPlane>,
}

impl LoopTopology {
  fn analyze(edges: &[[usize; 2]], points: &[DVec3], labels: &[usize]) -> Self {
    let mut degree: HashMap<usize, u32> = HashMap::new();
    let mut used = Vec::new();
    for edge in labels.iter().filter_map(|&label| edges.get(label)) {
      for &vertex in edge {
        let count = degree.entry(vertex).or_insert(0);
        if *count == 0 {
          used.push(vertex);
        }
        *count += 1;
      }
    }
    let closed = !labels.is_empty() && degree.values().all(|d| d % 2 == 0);

    let used_points: Vec<DVec3> = used.iter().filter_map(|&v| points.get(v).copied()).collect();
    let extent = BoundBox::from_points(used_points.iter().copied())
      .map_or(0.0, |b| b.diagonal());
    let plane = LoopPlane::fit(&used_points, CLASSIFY_TOLERANCE * extent.max(f64::MIN_POSITIVE));

    Self { closed, plane }
  }
}

/// Line segments `points[edges[labels[i]]]`.
#[derive(Clone, Debug)]
pub struct EdgeShapes<'a> {
  edges: &'a [[usize; 2]],
  points: &'a [DVec3],
  labels: Vec<usize>,
  bounds: Option<BoundCache>,
  topology: LoopTopology,
}

impl<'a> EdgeShapes<'a> {
  /// Adapter over the edges named by `labels`.
  ///
  /// # Errors
  /// `IndexOutOfRange` if a label is not an edge or an edge endpoint is not
  /// a point.
  pub fn new(
    edges: &'a [[usize; 2]],
    points: &'a [DVec3],
    labels: Vec<usize>,
    cache_bounds: bool,
  ) -> OctreeResult<Self> {
    validate_labels(&labels, edges.len())?;
    validate_vertices(edges, &labels, points.len())?;

    let topology = LoopTopology::analyze(edges, points, &labels);
    let mut shapes = Self {
      edges,
      points,
      labels,
      bounds: None,
      topology,
    };
    if cache_bounds {
      shapes.bounds = Some(BoundCache::from_fn(shapes.labels.len(), |i| {
        shapes.segment(i).map(|s| s.bounds())
      })?);
    }
    Ok(shapes)
  }

  /// Adapter over every edge.
  pub fn all(edges: &'a [[usize; 2]], points: &'a [DVec3], cache_bounds: bool) -> OctreeResult<Self> {
    Self::new(edges, points, (0..edges.len()).collect(), cache_bounds)
  }

  /// Edge index in the caller's array for shape `index`.
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

  /// Segment of shape `index`.
  pub fn segment(&self, index: usize) -> OctreeResult<LineSegment> {
    let [a, b] = self.edges[self.label(index)?];
    Ok(LineSegment::new(self.points[a], self.points[b]))
  }

  /// Loop structure used for classification.
  pub fn topology(&self) -> &LoopTopology {
    &self.topology
  }

  /// Count in-plane probe crossings, or `None` if the probe is degenerate.
  fn probe_crossings(
    &self,
    nodes: &NodeStore,
    plane: &LoopPlane,
    sample: DVec3,
    angle: f64,
    reach: f64,
  ) -> Option<usize> {
    let start = plane.project(sample);
    let dir = DVec2::new(angle.cos(), angle.sin());
    let end = sample + plane.direction(angle) * reach;

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
        let Ok(segment) = self.segment(index) else {
          continue;
        };
        let a = plane.project(segment.start);
        let b = plane.project(segment.end);
        match planar_crossing(start, dir, a, b) {
          Crossing::Miss => {}
          Crossing::Hit => crossings += 1,
          Crossing::Degenerate => {
            degenerate = true;
            return SegmentStep::Stop;
          }
        }
      }
      SegmentStep::Continue
    });

    (!degenerate).then_some(crossings)
  }
}

/// Outcome of a planar ray/edge test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Crossing {
  Miss,
  Hit,
  Degenerate,
}

/// Ray `start + t * dir` (`t >= 0`, `dir` unit) against edge `a..b`.
pub(crate) fn planar_crossing(start: DVec2, dir: DVec2, a: DVec2, b: DVec2) -> Crossing {
  let edge = b - a;
  let rel = a - start;
  let denom = dir.perp_dot(edge);
  let edge_len = edge.length();

  if denom.abs() <= PARALLEL_TOLERANCE * edge_len.max(f64::MIN_POSITIVE) {
    // Parallel: only matters if the edge lies on the probe line ahead.
    let off_line = rel.perp_dot(dir).abs();
    let ahead = rel.dot(dir) >= 0.0 || (b - start).dot(dir) >= 0.0;
    let scale = rel.length().max(edge_len).max(f64::MIN_POSITIVE);
    return if off_line <= PROBE_BARYCENTRIC_TOLERANCE * scale && ahead {
      Crossing::Degenerate
    } else {
      Crossing::Miss
    };
  }

  let t = rel.perp_dot(edge) / denom;
  let s = rel.perp_dot(dir) / denom;
  if t < 0.0 || s < -PROBE_BARYCENTRIC_TOLERANCE || s > 1.0 + PROBE_BARYCENTRIC_TOLERANCE {
    return Crossing::Miss;
  }
  if s <= PROBE_BARYCENTRIC_TOLERANCE || s >= 1.0 - PROBE_BARYCENTRIC_TOLERANCE {
    return Crossing::Degenerate;
  }
  Crossing::Hit
}

impl ShapeAdapter for EdgeShapes<'_> {
  fn kind(&self) -> &'static str {
    "edge"
  }

  fn size(&self) -> usize {
    self.labels.len()
  }

  fn bounding_box(&self, index: usize) -> OctreeResult<BoundBox> {
    cached_or(&self.bounds, index, |i| self.segment(i).map(|s| s.bounds()))
  }

  fn representative_points(&self) -> Vec<DVec3> {
    (0..self.labels.len())
      .filter_map(|i| self.segment(i).ok())
      .map(|s| s.midpoint())
      .collect()
  }

  fn find_nearest_point(&self, indices: &[usize], query: &mut PointQuery) {
    for &index in indices {
      if let Ok(segment) = self.segment(index) {
        let (_, point) = segment.closest_point(query.sample);
        query.offer(index, point);
      }
    }
  }

  fn find_nearest_to_line(&self, indices: &[usize], query: &mut LineQuery) {
    for &index in indices {
      if let Ok(segment) = self.segment(index) {
        let (line_point, shape_point) = query.line.closest_points(&segment);
        query.offer(index, line_point, shape_point);
      }
    }
  }

  fn classify_point(&self, nodes: &NodeStore, sample: DVec3) -> VolumeType {
    let Some(root) = nodes.root_bounds() else {
      return VolumeType::Unknown;
    };
    if self.labels.is_empty() || !sample.is_finite() {
      return VolumeType::Unknown;
    }
    let (true, Some(plane)) = (self.topology.closed, self.topology.plane) else {
      return VolumeType::Mixed;
    };

    let tolerance = CLASSIFY_TOLERANCE * root.diagonal();
    let height = plane.signed_distance(sample);
    if height.abs() > tolerance || !root.contains_point(sample) {
      return VolumeType::Outside;
    }

    let in_plane = sample - plane.normal * height;
    if nodes
      .find_nearest_within(self, in_plane, tolerance * tolerance)
      .is_some()
    {
      return VolumeType::Mixed;
    }

    let reach = 2.0 * root.diagonal() + in_plane.distance(root.center());
    PROBE_ANGLES
      .iter()
      .find_map(|&angle| self.probe_crossings(nodes, &plane, in_plane, angle, reach))
      .map_or(VolumeType::Unknown, VolumeType::from_crossings)
  }
}

#[cfg(test)]
#[path = "edges_test.rs"]
mod edges_test;
