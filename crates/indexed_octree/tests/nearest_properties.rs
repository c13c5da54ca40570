//! Property-based tests for tree queries.
//!
//! Random edge soups and triangle fans are checked against linear scans.
//!
//! Run with: cargo test -p indexed_octree --test nearest_properties

use glam::DVec3;
use indexed_octree::{
  EdgeShapes, IndexedOctree, OctreeConfig, PointQuery, ShapeAdapter, TriangleShapes,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = DVec3> {
  prop::array::uniform3(-10.0..10.0f64).prop_map(DVec3::from_array)
}

/// Points plus edges that index them.
fn arb_edge_soup(max_edges: usize) -> impl Strategy<Value = (Vec<DVec3>, Vec<[usize; 2]>)> {
  prop::collection::vec((arb_point(), arb_point()), 1..=max_edges).prop_map(|pairs| {
    let points: Vec<DVec3> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
    let edges = (0..pairs.len()).map(|i| [2 * i, 2 * i + 1]).collect();
    (points, edges)
  })
}

/// Independent triangles over random corners.
fn arb_triangle_soup(max_faces: usize) -> impl Strategy<Value = (Vec<DVec3>, Vec<[usize; 3]>)> {
  prop::collection::vec((arb_point(), arb_point(), arb_point()), 1..=max_faces).prop_map(|tris| {
    let points: Vec<DVec3> = tris.iter().flat_map(|&(a, b, c)| [a, b, c]).collect();
    let faces = (0..tris.len()).map(|i| [3 * i, 3 * i + 1, 3 * i + 2]).collect();
    (points, faces)
  })
}

fn arb_config() -> impl Strategy<Value = OctreeConfig> {
  (1usize..8, 1u32..8).prop_map(|(leaf, depth)| {
    OctreeConfig::default()
      .with_max_leaf_size(leaf)
      .with_max_depth(depth)
  })
}

fn brute_force<S: ShapeAdapter>(shapes: &S, sample: DVec3) -> f64 {
  let all: Vec<usize> = (0..shapes.size()).collect();
  let mut query = PointQuery::new(sample);
  shapes.find_nearest_point(&all, &mut query);
  query.best_distance_squared
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  /// The tree finds the same distance as a linear scan.
  #[test]
  fn nearest_matches_brute_force(
    (points, edges) in arb_edge_soup(60),
    config in arb_config(),
    samples in prop::collection::vec(arb_point(), 1..16),
  ) {
    let shapes = EdgeShapes::all(&edges, &points, true).unwrap();
    let tree = IndexedOctree::build(shapes, &config).unwrap();

    for sample in samples {
      let hit = tree.find_nearest(sample).unwrap();
      let expected = brute_force(tree.shapes(), sample);
      prop_assert!(
        (hit.distance_squared - expected).abs() <= 1e-9 * expected.max(1.0),
        "tree {} vs scan {}", hit.distance_squared, expected
      );
    }
  }

  /// Reported ray hits lie on the queried segment.
  #[test]
  fn ray_hits_lie_on_segment(
    (points, faces) in arb_triangle_soup(40),
    start in arb_point(),
    end in arb_point(),
  ) {
    let shapes = TriangleShapes::all(&faces, &points, true).unwrap();
    let tree = IndexedOctree::build(shapes, &OctreeConfig::default().with_max_leaf_size(3)).unwrap();

    if let Some(hit) = tree.find_line(start, end).unwrap() {
      prop_assert!((0.0..=1.0).contains(&hit.fraction));
      let on_segment = start + (end - start) * hit.fraction;
      prop_assert!(on_segment.distance(hit.point) <= 1e-9 * (1.0 + (end - start).length()));
    }
  }

  /// The nearest ray hit is never farther than any single-shape hit.
  #[test]
  fn ray_hit_is_nearest(
    (points, faces) in arb_triangle_soup(30),
    start in arb_point(),
    end in arb_point(),
  ) {
    let shapes = TriangleShapes::all(&faces, &points, false).unwrap();
    let tree = IndexedOctree::build(shapes, &OctreeConfig::default().with_max_leaf_size(2)).unwrap();

    let scan = (0..faces.len())
      .filter_map(|i| tree.shapes().intersects_ray(i, start, end).unwrap())
      .map(|p| p.distance(start))
      .fold(f64::INFINITY, f64::min);

    match tree.find_line(start, end).unwrap() {
      Some(hit) => prop_assert!(hit.point.distance(start) <= scan + 1e-9),
      None => prop_assert!(scan.is_infinite()),
    }
  }

  /// Building twice from the same input gives identical stores.
  #[test]
  fn rebuild_is_identical(
    (points, edges) in arb_edge_soup(80),
    config in arb_config(),
  ) {
    let a = IndexedOctree::build(EdgeShapes::all(&edges, &points, true).unwrap(), &config).unwrap();
    let b = IndexedOctree::build(EdgeShapes::all(&edges, &points, false).unwrap(), &config).unwrap();
    prop_assert_eq!(a.nodes(), b.nodes());
  }
}
