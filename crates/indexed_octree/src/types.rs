//! Query results and per-call search state.

use glam::DVec3;

use crate::bounds::BoundBox;
use crate::geometry::LineSegment;

/// Position of a point relative to a closed shape set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VolumeType {
  /// The probe was ambiguous after every retry, or there is nothing to test
  /// against. Treat conservatively (e.g. as `Mixed`) or retry elsewhere.
  Unknown,
  /// The shape set is not closed, or the point lies on the boundary.
  Mixed,
  /// Enclosed by the shape set.
  Inside,
  /// Not enclosed by the shape set.
  Outside,
}

impl VolumeType {
  /// Inside/outside from a crossing count.
  #[inline]
  pub fn from_crossings(crossings: usize) -> Self {
    if crossings % 2 == 1 {
      VolumeType::Inside
    } else {
      VolumeType::Outside
    }
  }
}

/// Nearest shape to a sample point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointHit {
  /// Shape index in the adapter.
  pub index: usize,
  /// Nearest point on the shape.
  pub point: DVec3,
  /// Squared distance from the sample to `point`.
  pub distance_squared: f64,
}

impl PointHit {
  /// Distance from the sample to the shape.
  #[inline]
  pub fn distance(&self) -> f64 {
    self.distance_squared.sqrt()
  }
}

/// Nearest shape to a line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineHit {
  /// Shape index in the adapter.
  pub index: usize,
  /// Nearest point on the query line.
  pub line_point: DVec3,
  /// Nearest point on the shape.
  pub shape_point: DVec3,
  /// Distance between `line_point` and `shape_point`.
  pub distance: f64,
}

/// Ray (segment) intersection with a shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
  /// Shape index in the adapter.
  pub index: usize,
  /// Intersection point, on the queried segment.
  pub point: DVec3,
  /// Segment parameter of `point` in `[0, 1]`.
  pub fraction: f64,
}

/// Running state of one nearest-point search.
///
/// Adapters call [`PointQuery::offer`] for every candidate they evaluate;
/// only a strictly closer candidate replaces the current best, so the first
/// shape seen in traversal order wins ties.
#[derive(Clone, Debug)]
pub struct PointQuery {
  /// The query point.
  pub sample: DVec3,
  /// Current search radius squared (shrinks as hits are found).
  pub best_distance_squared: f64,
  /// Best hit so far.
  pub best: Option<PointHit>,
}

impl PointQuery {
  /// Unbounded search around `sample`.
  pub fn new(sample: DVec3) -> Self {
    Self::within(sample, f64::INFINITY)
  }

  /// Search only shapes closer than `max_distance_squared`.
  pub fn within(sample: DVec3, max_distance_squared: f64) -> Self {
    Self {
      sample,
      best_distance_squared: max_distance_squared,
      best: None,
    }
  }

  /// Offer a candidate point on shape `index`. Returns true if it became the
  /// new best.
  #[inline]
  pub fn offer(&mut self, index: usize, point: DVec3) -> bool {
    let distance_squared = point.distance_squared(self.sample);
    if distance_squared < self.best_distance_squared {
      self.best_distance_squared = distance_squared;
      self.best = Some(PointHit {
        index,
        point,
        distance_squared,
      });
      true
    } else {
      false
    }
  }
}

/// Running state of one nearest-to-line search.
///
/// `tightest` bounds the region that can still hold a closer shape; the
/// traversal skips nodes that do not overlap it.
#[derive(Clone, Debug)]
pub struct LineQuery {
  /// The query segment.
  pub line: LineSegment,
  /// Pruning box, shrunk on every improvement.
  pub tightest: BoundBox,
  /// Current best distance.
  pub best_distance: f64,
  /// Best hit so far.
  pub best: Option<LineHit>,
}

impl LineQuery {
  /// Start a search that only considers nodes overlapping `tightest`.
  pub fn new(line: LineSegment, tightest: BoundBox) -> Self {
    Self {
      line,
      tightest,
      best_distance: f64::INFINITY,
      best: None,
    }
  }

  /// Offer a candidate pair. Returns true if it became the new best.
  ///
  /// On improvement `tightest` is clipped to the line's box inflated by the
  /// new distance: anything closer must lie inside it. It never grows.
  pub fn offer(&mut self, index: usize, line_point: DVec3, shape_point: DVec3) -> bool {
    let distance = line_point.distance(shape_point);
    if distance < self.best_distance {
      self.best_distance = distance;
      self.best = Some(LineHit {
        index,
        line_point,
        shape_point,
        distance,
      });
      self.tightest = self.tightest.intersection(&self.line.bounds().inflated(distance));
      true
    } else {
      false
    }
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
