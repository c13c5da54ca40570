//! Precomputed per-shape bounding boxes.

use crate::bounds::BoundBox;
use crate::error::{OctreeError, OctreeResult};

/// One box per shape, computed once at adapter construction.
///
/// Trades memory for speed in `bounding_box`/`overlaps`, which the builder
/// calls for every shape at every level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundCache {
  boxes: Vec<BoundBox>,
}

impl BoundCache {
  /// Compute the box of shapes `0..count`. Fails on the first error.
  pub fn from_fn<F>(count: usize, compute: F) -> OctreeResult<Self>
  where
    F: FnMut(usize) -> OctreeResult<BoundBox>,
  {
    let boxes = (0..count).map(compute).collect::<OctreeResult<Vec<_>>>()?;
    Ok(Self { boxes })
  }

  /// Cached box of shape `index`.
  #[inline]
  pub fn get(&self, index: usize) -> OctreeResult<BoundBox> {
    self
      .boxes
      .get(index)
      .copied()
      .ok_or(OctreeError::IndexOutOfRange {
        index,
        size: self.boxes.len(),
      })
  }

  /// Number of cached boxes.
  #[inline]
  pub fn len(&self) -> usize {
    self.boxes.len()
  }

  /// True if nothing is cached.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.boxes.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use glam::DVec3;

  use super::*;

  #[test]
  fn test_from_fn_and_get() {
    let cache = BoundCache::from_fn(3, |i| {
      let p = DVec3::splat(i as f64);
      Ok(BoundBox::new(p, p + DVec3::ONE))
    })
    .unwrap();

    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get(2).unwrap().min, DVec3::splat(2.0));
    assert_eq!(
      cache.get(3),
      Err(OctreeError::IndexOutOfRange { index: 3, size: 3 })
    );
  }

  #[test]
  fn test_from_fn_propagates_error() {
    let result = BoundCache::from_fn(4, |i| {
      if i == 2 {
        Err(OctreeError::invalid_geometry("bad shape"))
      } else {
        Ok(BoundBox::new(DVec3::ZERO, DVec3::ONE))
      }
    });
    assert!(matches!(result, Err(OctreeError::InvalidGeometry { .. })));
  }
}
