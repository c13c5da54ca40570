//! Test fixtures shared across module tests.
//!
//! Cube corners use bit order: bit 0 = +X, bit 1 = +Y, bit 2 = +Z, matching
//! the octant numbering.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shapes::ShapeAdapter;
use crate::types::{PointHit, PointQuery};

// =============================================================================
// Unit cube
// =============================================================================

/// The 8 corners of the unit cube `[0, 1]^3`.
pub fn cube_points() -> Vec<DVec3> {
  (0..8)
    .map(|i| {
      DVec3::new(
        (i & 1) as f64,
        ((i >> 1) & 1) as f64,
        ((i >> 2) & 1) as f64,
      )
    })
    .collect()
}

/// The 12 cube edges. Edges 0, 1, 2 meet at the origin.
pub fn cube_edges() -> Vec<[usize; 2]> {
  let mut edges = Vec::with_capacity(12);
  for corner in 0..8 {
    for bit in [1, 2, 4] {
      if corner & bit == 0 {
        edges.push([corner, corner | bit]);
      }
    }
  }
  edges
}

/// The 12 triangles of the closed cube surface, two per face.
pub fn cube_triangles() -> Vec<[usize; 3]> {
  vec![
    // -X
    [0, 4, 6],
    [0, 6, 2],
    // +X
    [1, 3, 7],
    [1, 7, 5],
    // -Y
    [0, 1, 5],
    [0, 5, 4],
    // +Y
    [2, 6, 7],
    [2, 7, 3],
    // -Z
    [0, 2, 3],
    [0, 3, 1],
    // +Z
    [4, 5, 7],
    [4, 7, 6],
  ]
}

// =============================================================================
// Planar loops
// =============================================================================

/// Unit square in the z = 0 plane.
pub fn square_points() -> Vec<DVec3> {
  vec![
    DVec3::new(0.0, 0.0, 0.0),
    DVec3::new(1.0, 0.0, 0.0),
    DVec3::new(1.0, 1.0, 0.0),
    DVec3::new(0.0, 1.0, 0.0),
  ]
}

/// Closed loop around [`square_points`].
pub fn square_edges() -> Vec<[usize; 2]> {
  vec![[0, 1], [1, 2], [2, 3], [3, 0]]
}

/// Open two-edge polyline over [`square_points`] (0 -> 1 -> 2).
pub fn open_polyline_edges() -> Vec<[usize; 2]> {
  vec![[0, 1], [1, 2]]
}

// =============================================================================
// Random geometry
// =============================================================================

/// `count` random edges inside `[-1, 1]^3`, deterministic per seed.
pub fn random_edges(seed: u64, count: usize) -> (Vec<DVec3>, Vec<[usize; 2]>) {
  let mut rng = StdRng::seed_from_u64(seed);
  let points: Vec<DVec3> = (0..count * 2)
    .map(|_| {
      DVec3::new(
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
        rng.random_range(-1.0..1.0),
      )
    })
    .collect();
  let edges = (0..count).map(|i| [2 * i, 2 * i + 1]).collect();
  (points, edges)
}

/// Random sample points inside `[-1.5, 1.5]^3`.
pub fn random_samples(seed: u64, count: usize) -> Vec<DVec3> {
  let mut rng = StdRng::seed_from_u64(seed);
  (0..count)
    .map(|_| {
      DVec3::new(
        rng.random_range(-1.5..1.5),
        rng.random_range(-1.5..1.5),
        rng.random_range(-1.5..1.5),
      )
    })
    .collect()
}

/// Linear scan over every shape, for checking tree queries.
pub fn brute_force_nearest<S: ShapeAdapter>(shapes: &S, sample: DVec3) -> Option<PointHit> {
  let all: Vec<usize> = (0..shapes.size()).collect();
  let mut query = PointQuery::new(sample);
  shapes.find_nearest_point(&all, &mut query);
  query.best
}
