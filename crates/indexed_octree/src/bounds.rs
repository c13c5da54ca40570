//! Axis-aligned bounding box with double precision.

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
///
/// Used both for per-shape bounds and for octree node bounds. A box with
/// `min == max` on some axis (a flat or point-like shape) is valid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundBox {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Maximum corner (inclusive).
  pub max: DVec3,
}

impl BoundBox {
  /// Create a new box from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: DVec3, max: DVec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "BoundBox min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create a box with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: DVec3::splat(f64::INFINITY),
      max: DVec3::splat(f64::NEG_INFINITY),
    }
  }

  /// Smallest box enclosing all points, or `None` for an empty iterator.
  pub fn from_points<I: IntoIterator<Item = DVec3>>(points: I) -> Option<Self> {
    let mut bounds = Self::empty();
    let mut any = false;
    for p in points {
      bounds.encapsulate(p);
      any = true;
    }
    any.then_some(bounds)
  }

  /// Expand the box to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: DVec3) {
    self.min = self.min.min(point);
    self.max = self.max.max(point);
  }

  /// Smallest box enclosing both boxes.
  #[inline]
  pub fn union(&self, other: &BoundBox) -> BoundBox {
    BoundBox {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// Overlap of both boxes. Disjoint boxes give an inverted (invalid) box,
  /// which overlaps nothing.
  #[inline]
  pub fn intersection(&self, other: &BoundBox) -> BoundBox {
    BoundBox {
      min: self.min.max(other.min),
      max: self.max.min(other.max),
    }
  }

  /// Check if the box is usable: finite corners and min <= max on all axes.
  pub fn is_valid(&self) -> bool {
    self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
  }

  /// Check if this box overlaps another.
  ///
  /// Two boxes overlap if they share any interior or boundary points.
  #[inline]
  pub fn overlaps(&self, other: &BoundBox) -> bool {
    self.min.x <= other.max.x
      && self.max.x >= other.min.x
      && self.min.y <= other.max.y
      && self.max.y >= other.min.y
      && self.min.z <= other.max.z
      && self.max.z >= other.min.z
  }

  /// Check if this box contains a point (boundary included).
  #[inline]
  pub fn contains_point(&self, point: DVec3) -> bool {
    point.cmpge(self.min).all() && point.cmple(self.max).all()
  }

  /// Get the size of the box (max - min).
  #[inline]
  pub fn size(&self) -> DVec3 {
    self.max - self.min
  }

  /// Get the center of the box.
  #[inline]
  pub fn center(&self) -> DVec3 {
    (self.min + self.max) * 0.5
  }

  /// Length of the main diagonal.
  #[inline]
  pub fn diagonal(&self) -> f64 {
    self.size().length()
  }

  /// Grow the box by `pad` on every side.
  #[inline]
  pub fn inflated(&self, pad: f64) -> BoundBox {
    BoundBox {
      min: self.min - DVec3::splat(pad),
      max: self.max + DVec3::splat(pad),
    }
  }

  /// Grow the box by a fraction of its largest extent.
  ///
  /// A zero-extent box (single point) is padded relative to its coordinate
  /// magnitude instead, so the result always has positive volume.
  pub fn expanded_relative(&self, fraction: f64) -> BoundBox {
    let span = self.size().max_element();
    let scale = if span > 0.0 {
      span
    } else {
      self.min.abs().max(self.max.abs()).max_element().max(1.0)
    };
    self.inflated(scale * fraction)
  }

  /// Box of the given octant after splitting at the center.
  ///
  /// Octant bits: bit 0 = +X half, bit 1 = +Y half, bit 2 = +Z half.
  pub fn octant(&self, octant: u8) -> BoundBox {
    let mid = self.center();
    let mut min = self.min;
    let mut max = mid;
    if octant & 1 != 0 {
      min.x = mid.x;
      max.x = self.max.x;
    }
    if octant & 2 != 0 {
      min.y = mid.y;
      max.y = self.max.y;
    }
    if octant & 4 != 0 {
      min.z = mid.z;
      max.z = self.max.z;
    }
    BoundBox { min, max }
  }

  /// Octant of the center split that holds `point` (ties go to the + half).
  pub fn octant_of(&self, point: DVec3) -> u8 {
    let mid = self.center();
    (point.x >= mid.x) as u8 | ((point.y >= mid.y) as u8) << 1 | ((point.z >= mid.z) as u8) << 2
  }

  /// Closest point of the box to `point` (the point itself if inside).
  #[inline]
  pub fn nearest_point(&self, point: DVec3) -> DVec3 {
    point.clamp(self.min, self.max)
  }

  /// Squared distance from the box to a point; zero inside.
  ///
  /// A lower bound on the distance to anything the box contains.
  #[inline]
  pub fn distance_squared_to_point(&self, point: DVec3) -> f64 {
    self.nearest_point(point).distance_squared(point)
  }

  /// Squared gap between two boxes; zero when they overlap.
  #[inline]
  pub fn distance_squared_to_box(&self, other: &BoundBox) -> f64 {
    let gap = (self.min - other.max).max(other.min - self.max).max(DVec3::ZERO);
    gap.length_squared()
  }

  /// Slab test of the segment `start + t * (end - start)`, `t` in `[0, t_max]`.
  ///
  /// Returns the entry and exit parameters of the clipped segment, or `None`
  /// if it misses the box. Touching the boundary counts as a hit.
  pub fn intersect_segment(&self, start: DVec3, end: DVec3, t_max: f64) -> Option<(f64, f64)> {
    let dir = end - start;
    let mut t_enter = 0.0f64;
    let mut t_exit = t_max;

    for axis in 0..3 {
      let origin = start[axis];
      let d = dir[axis];
      let (lo, hi) = (self.min[axis], self.max[axis]);

      if d == 0.0 {
        // Parallel to this slab: inside it or never.
        if origin < lo || origin > hi {
          return None;
        }
        continue;
      }

      let inv = 1.0 / d;
      let mut t0 = (lo - origin) * inv;
      let mut t1 = (hi - origin) * inv;
      if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
      }
      t_enter = t_enter.max(t0);
      t_exit = t_exit.min(t1);
      if t_enter > t_exit {
        return None;
      }
    }

    Some((t_enter, t_exit))
  }
}

impl Default for BoundBox {
  fn default() -> Self {
    Self::empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn unit() -> BoundBox {
    BoundBox::new(DVec3::ZERO, DVec3::ONE)
  }

  #[test]
  fn test_from_points() {
    let bounds = BoundBox::from_points([
      DVec3::new(1.0, 2.0, 3.0),
      DVec3::new(-1.0, -2.0, -3.0),
    ])
    .unwrap();
    assert_eq!(bounds.min, DVec3::new(-1.0, -2.0, -3.0));
    assert_eq!(bounds.max, DVec3::new(1.0, 2.0, 3.0));
    assert!(BoundBox::from_points(std::iter::empty()).is_none());
  }

  #[test]
  fn test_empty_is_invalid() {
    assert!(!BoundBox::empty().is_valid());
    assert!(unit().is_valid());
  }

  #[test]
  fn test_nan_is_invalid() {
    let bounds = BoundBox {
      min: DVec3::new(f64::NAN, 0.0, 0.0),
      max: DVec3::ONE,
    };
    assert!(!bounds.is_valid());
  }

  #[test]
  fn test_inverted_is_invalid() {
    let bounds = BoundBox {
      min: DVec3::ONE,
      max: DVec3::ZERO,
    };
    assert!(!bounds.is_valid());
  }

  #[test]
  fn test_degenerate_extent_is_valid() {
    // An axis-aligned edge has zero extent on two axes.
    let bounds = BoundBox::new(DVec3::ZERO, DVec3::X);
    assert!(bounds.is_valid());
  }

  #[test]
  fn test_overlaps_touching() {
    // Touching at boundary should count as overlapping
    let a = unit();
    let b = BoundBox::new(DVec3::ONE, DVec3::splat(2.0));
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
  }

  #[test]
  fn test_overlaps_false() {
    let a = unit();
    let b = BoundBox::new(DVec3::splat(1.5), DVec3::splat(2.0));
    assert!(!a.overlaps(&b));
  }

  #[test]
  fn test_octants_partition_parent() {
    let parent = BoundBox::new(DVec3::ZERO, DVec3::splat(2.0));
    let mut volume = 0.0;
    for octant in 0u8..8 {
      let child = parent.octant(octant);
      assert!(child.is_valid());
      assert_eq!(child.size(), DVec3::ONE, "Octant {} size", octant);
      assert_eq!(parent.octant_of(child.center()), octant);
      volume += child.size().x * child.size().y * child.size().z;
    }
    assert_eq!(volume, 8.0);
  }

  #[test]
  fn test_octant_bit_convention() {
    let parent = BoundBox::new(DVec3::ZERO, DVec3::splat(2.0));
    assert_eq!(parent.octant(0).min, DVec3::ZERO);
    assert_eq!(parent.octant(1).min, DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(parent.octant(2).min, DVec3::new(0.0, 1.0, 0.0));
    assert_eq!(parent.octant(4).min, DVec3::new(0.0, 0.0, 1.0));
    assert_eq!(parent.octant(7).max, DVec3::splat(2.0));
  }

  #[test]
  fn test_distance_squared_to_point() {
    let bounds = unit();
    assert_eq!(bounds.distance_squared_to_point(DVec3::splat(0.5)), 0.0);
    assert_eq!(bounds.distance_squared_to_point(DVec3::new(3.0, 0.5, 0.5)), 4.0);
    assert_eq!(bounds.distance_squared_to_point(DVec3::new(2.0, 2.0, 0.5)), 2.0);
  }

  #[test]
  fn test_distance_squared_to_box() {
    let a = unit();
    let b = BoundBox::new(DVec3::new(3.0, 0.0, 0.0), DVec3::new(4.0, 1.0, 1.0));
    assert_eq!(a.distance_squared_to_box(&b), 4.0);
    assert_eq!(b.distance_squared_to_box(&a), 4.0);
    assert_eq!(a.distance_squared_to_box(&a), 0.0);
  }

  #[test]
  fn test_expanded_relative() {
    let bounds = BoundBox::new(DVec3::ZERO, DVec3::new(10.0, 1.0, 1.0));
    let grown = bounds.expanded_relative(0.1);
    assert_eq!(grown.min, DVec3::splat(-1.0));
    assert_eq!(grown.max, DVec3::new(11.0, 2.0, 2.0));
  }

  #[test]
  fn test_expanded_relative_point_box() {
    let bounds = BoundBox::new(DVec3::splat(5.0), DVec3::splat(5.0));
    let grown = bounds.expanded_relative(0.1);
    assert!(grown.size().min_element() > 0.0);
    assert!(grown.contains_point(DVec3::splat(5.0)));
  }

  #[test]
  fn test_intersect_segment_through() {
    let bounds = unit();
    let (t0, t1) = bounds
      .intersect_segment(DVec3::new(-1.0, 0.5, 0.5), DVec3::new(3.0, 0.5, 0.5), 1.0)
      .unwrap();
    assert!((t0 - 0.25).abs() < 1e-12);
    assert!((t1 - 0.5).abs() < 1e-12);
  }

  #[test]
  fn test_intersection() {
    let a = unit();
    let b = BoundBox::new(DVec3::splat(0.5), DVec3::splat(2.0));
    assert_eq!(
      a.intersection(&b),
      BoundBox::new(DVec3::splat(0.5), DVec3::ONE)
    );

    let far = BoundBox::new(DVec3::splat(3.0), DVec3::splat(4.0));
    let empty = a.intersection(&far);
    assert!(!empty.is_valid());
    assert!(!empty.overlaps(&a));
  }

  #[test]
  fn test_intersect_segment_starts_inside() {
    let bounds = unit();
    let (t0, _) = bounds
      .intersect_segment(DVec3::splat(0.5), DVec3::splat(5.0), 1.0)
      .unwrap();
    assert_eq!(t0, 0.0);
  }

  #[test]
  fn test_intersect_segment_miss_and_short() {
    let bounds = unit();
    // Parallel to an axis, outside the slab.
    assert!(bounds
      .intersect_segment(DVec3::new(-1.0, 2.0, 0.5), DVec3::new(3.0, 2.0, 0.5), 1.0)
      .is_none());
    // Stops before reaching the box.
    assert!(bounds
      .intersect_segment(DVec3::new(-3.0, 0.5, 0.5), DVec3::new(-2.0, 0.5, 0.5), 1.0)
      .is_none());
    // Clipped by t_max.
    assert!(bounds
      .intersect_segment(DVec3::new(-1.0, 0.5, 0.5), DVec3::new(3.0, 0.5, 0.5), 0.2)
      .is_none());
  }

  #[test]
  fn test_intersect_segment_flat_box() {
    // Zero-thickness box (e.g. edge bounds) still intersects a crossing segment.
    let flat = BoundBox::new(DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0));
    assert!(flat
      .intersect_segment(DVec3::new(0.5, 0.5, -1.0), DVec3::new(0.5, 0.5, 1.0), 1.0)
      .is_some());
  }
}
