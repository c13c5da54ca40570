//! Exact geometric primitives used by the shape adapters.
//!
//! Everything here is degenerate-safe: zero-length segments behave as points
//! and zero-area triangles behave as their edges, so no query divides by zero.

use glam::DVec3;

use crate::bounds::BoundBox;
use crate::constants::{DEGENERATE_LENGTH_SQ, PARALLEL_TOLERANCE};

/// Line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
  /// Start point (parameter 0).
  pub start: DVec3,
  /// End point (parameter 1).
  pub end: DVec3,
}

impl LineSegment {
  /// Create a new segment.
  pub fn new(start: DVec3, end: DVec3) -> Self {
    Self { start, end }
  }

  /// Vector from start to end.
  #[inline]
  pub fn vector(&self) -> DVec3 {
    self.end - self.start
  }

  /// Segment length.
  #[inline]
  pub fn length(&self) -> f64 {
    self.vector().length()
  }

  /// Midpoint of the segment.
  #[inline]
  pub fn midpoint(&self) -> DVec3 {
    (self.start + self.end) * 0.5
  }

  /// Point at parameter `t` (not clamped).
  #[inline]
  pub fn point_at(&self, t: f64) -> DVec3 {
    self.start + self.vector() * t
  }

  /// Bounding box of the two endpoints.
  #[inline]
  pub fn bounds(&self) -> BoundBox {
    BoundBox {
      min: self.start.min(self.end),
      max: self.start.max(self.end),
    }
  }

  /// Check both endpoints are finite.
  #[inline]
  pub fn is_finite(&self) -> bool {
    self.start.is_finite() && self.end.is_finite()
  }

  /// Parameter and position of the closest point on the segment to `point`.
  ///
  /// A zero-length segment returns its start point.
  pub fn closest_point(&self, point: DVec3) -> (f64, DVec3) {
    let d = self.vector();
    let len_sq = d.length_squared();
    if len_sq <= DEGENERATE_LENGTH_SQ {
      return (0.0, self.start);
    }
    let t = ((point - self.start).dot(d) / len_sq).clamp(0.0, 1.0);
    (t, self.start + d * t)
  }

  /// Closest pair of points between this segment and `other`.
  ///
  /// Returns `(point_on_self, point_on_other)`.
  pub fn closest_points(&self, other: &LineSegment) -> (DVec3, DVec3) {
    let d1 = self.vector();
    let d2 = other.vector();
    let r = self.start - other.start;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t) = if a <= DEGENERATE_LENGTH_SQ && e <= DEGENERATE_LENGTH_SQ {
      (0.0, 0.0)
    } else if a <= DEGENERATE_LENGTH_SQ {
      (0.0, (f / e).clamp(0.0, 1.0))
    } else {
      let c = d1.dot(r);
      if e <= DEGENERATE_LENGTH_SQ {
        ((-c / a).clamp(0.0, 1.0), 0.0)
      } else {
        let b = d1.dot(d2);
        let denom = a * e - b * b;
        // Parallel segments: any s works, pick the start and let t resolve.
        let mut s = if denom > 0.0 {
          ((b * f - c * e) / denom).clamp(0.0, 1.0)
        } else {
          0.0
        };
        let mut t = (b * s + f) / e;
        if t < 0.0 {
          t = 0.0;
          s = (-c / a).clamp(0.0, 1.0);
        } else if t > 1.0 {
          t = 1.0;
          s = ((b - c) / a).clamp(0.0, 1.0);
        }
        (s, t)
      }
    };

    (self.start + d1 * s, other.start + d2 * t)
  }
}

/// Check whether a triangle has (numerically) zero area.
#[inline]
pub fn is_degenerate_triangle(a: DVec3, b: DVec3, c: DVec3) -> bool {
  let scale = (b - a).length_squared().max((c - a).length_squared());
  (b - a).cross(c - a).length_squared() <= scale * scale * 1e-24 || scale <= DEGENERATE_LENGTH_SQ
}

/// Closest point on triangle `abc` to `point`.
///
/// Region-based (vertex, edge, face) projection. Zero-area triangles fall
/// back to the nearest of their three edges.
pub fn closest_point_on_triangle(point: DVec3, a: DVec3, b: DVec3, c: DVec3) -> DVec3 {
  if is_degenerate_triangle(a, b, c) {
    return [
      LineSegment::new(a, b),
      LineSegment::new(b, c),
      LineSegment::new(c, a),
    ]
    .iter()
    .map(|edge| edge.closest_point(point).1)
    .min_by(|p, q| {
      p.distance_squared(point)
        .total_cmp(&q.distance_squared(point))
    })
    .unwrap_or(a);
  }

  let ab = b - a;
  let ac = c - a;

  // Vertex region A
  let ap = point - a;
  let d1 = ab.dot(ap);
  let d2 = ac.dot(ap);
  if d1 <= 0.0 && d2 <= 0.0 {
    return a;
  }

  // Vertex region B
  let bp = point - b;
  let d3 = ab.dot(bp);
  let d4 = ac.dot(bp);
  if d3 >= 0.0 && d4 <= d3 {
    return b;
  }

  // Edge region AB
  let vc = d1 * d4 - d3 * d2;
  if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
    let v = d1 / (d1 - d3);
    return a + ab * v;
  }

  // Vertex region C
  let cp = point - c;
  let d5 = ab.dot(cp);
  let d6 = ac.dot(cp);
  if d6 >= 0.0 && d5 <= d6 {
    return c;
  }

  // Edge region AC
  let vb = d5 * d2 - d1 * d6;
  if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
    let w = d2 / (d2 - d6);
    return a + ac * w;
  }

  // Edge region BC
  let va = d3 * d6 - d5 * d4;
  if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
    let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
    return b + (c - b) * w;
  }

  // Face region
  let denom = 1.0 / (va + vb + vc);
  let v = vb * denom;
  let w = vc * denom;
  a + ab * v + ac * w
}

/// Unclamped ray/triangle parameters.
///
/// The ray is `origin + t * dir`; the hit is `a + u * (b - a) + v * (c - a)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleCrossing {
  /// Ray parameter.
  pub t: f64,
  /// Barycentric weight of `b`.
  pub u: f64,
  /// Barycentric weight of `c`.
  pub v: f64,
}

impl TriangleCrossing {
  /// Barycentric weight of `a`.
  #[inline]
  pub fn w(&self) -> f64 {
    1.0 - self.u - self.v
  }

  /// Smallest barycentric weight; negative means outside the triangle.
  #[inline]
  pub fn min_weight(&self) -> f64 {
    self.u.min(self.v).min(self.w())
  }
}

/// Solve the ray/plane crossing of triangle `abc` (Moller-Trumbore).
///
/// Returns `None` when the ray is parallel to the triangle's plane or the
/// triangle is degenerate. The parameters are not range-checked.
pub fn ray_triangle_crossing(
  origin: DVec3,
  dir: DVec3,
  a: DVec3,
  b: DVec3,
  c: DVec3,
) -> Option<TriangleCrossing> {
  let e1 = b - a;
  let e2 = c - a;
  let pvec = dir.cross(e2);
  let det = e1.dot(pvec);
  let scale = e1.length() * e2.length() * dir.length();
  if !(det.abs() > PARALLEL_TOLERANCE * scale) {
    return None;
  }

  let inv = 1.0 / det;
  let tvec = origin - a;
  let u = tvec.dot(pvec) * inv;
  let qvec = tvec.cross(e1);
  let v = dir.dot(qvec) * inv;
  let t = e2.dot(qvec) * inv;
  Some(TriangleCrossing { t, u, v })
}

/// Intersection point of segment `start..end` with triangle `abc`.
///
/// Edges and vertices count as hits. The returned parameter is in `[0, 1]`.
pub fn segment_triangle_intersection(
  start: DVec3,
  end: DVec3,
  a: DVec3,
  b: DVec3,
  c: DVec3,
) -> Option<(f64, DVec3)> {
  let dir = end - start;
  let crossing = ray_triangle_crossing(start, dir, a, b, c)?;
  if crossing.t < 0.0 || crossing.t > 1.0 || crossing.min_weight() < 0.0 {
    return None;
  }
  Some((crossing.t, start + dir * crossing.t))
}

/// Closest pair between a segment and triangle `abc`.
///
/// Returns `(point_on_segment, point_on_triangle)`. If the segment pierces
/// the triangle both points are the piercing point.
pub fn segment_triangle_closest_points(
  segment: &LineSegment,
  a: DVec3,
  b: DVec3,
  c: DVec3,
) -> (DVec3, DVec3) {
  if let Some((_, hit)) = segment_triangle_intersection(segment.start, segment.end, a, b, c) {
    return (hit, hit);
  }

  // Without a piercing point the minimum lies on the triangle boundary or at
  // a segment endpoint.
  let mut best = (segment.start, closest_point_on_triangle(segment.start, a, b, c));
  let mut best_dist = best.0.distance_squared(best.1);

  let end_on_tri = closest_point_on_triangle(segment.end, a, b, c);
  let d = segment.end.distance_squared(end_on_tri);
  if d < best_dist {
    best = (segment.end, end_on_tri);
    best_dist = d;
  }

  for edge in [
    LineSegment::new(a, b),
    LineSegment::new(b, c),
    LineSegment::new(c, a),
  ] {
    let (on_segment, on_edge) = segment.closest_points(&edge);
    let d = on_segment.distance_squared(on_edge);
    if d < best_dist {
      best = (on_segment, on_edge);
      best_dist = d;
    }
  }

  best
}

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;
