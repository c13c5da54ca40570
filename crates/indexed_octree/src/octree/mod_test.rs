use super::*;
use crate::shapes::{EdgeShapes, TriangleShapes};
use crate::test_utils::*;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_tree_is_send_sync() {
  assert_send_sync::<IndexedOctree<EdgeShapes<'static>>>();
  assert_send_sync::<IndexedOctree<TriangleShapes<'static>>>();
}

#[test]
fn test_accessors() {
  let points = cube_points();
  let edges = cube_edges();
  let shapes = EdgeShapes::all(&edges, &points, true).unwrap();
  let config = OctreeConfig::default().with_max_leaf_size(5);
  let tree = IndexedOctree::build(shapes, &config).unwrap();

  assert_eq!(tree.config(), &config);
  assert_eq!(tree.shapes().size(), 12);
  assert!(!tree.is_empty());
  assert_eq!(tree.bounds(), tree.nodes().root_bounds());
}

#[test]
fn test_stats_match_store() {
  let (points, edges) = random_edges(3, 400);
  let shapes = EdgeShapes::all(&edges, &points, true).unwrap();
  let tree = IndexedOctree::build(shapes, &OctreeConfig::default().with_max_leaf_size(6)).unwrap();

  let stats = tree.stats();
  let nodes = tree.nodes();
  assert_eq!(stats.shape_count, 400);
  assert_eq!(stats.node_count, nodes.len());
  assert_eq!(stats.leaf_count, nodes.leaf_count());
  assert_eq!(stats.internal_count + stats.leaf_count, stats.node_count);
  assert_eq!(stats.stored_indices, nodes.indices().len());
  assert_eq!(Some(stats.max_leaf_depth), nodes.max_depth());
  assert!(stats.average_duplicity() >= 1.0);
}

/// Taking the adapter back and rebuilding yields the same tree.
#[test]
fn test_into_shapes_rebuild_is_identical() {
  let points = cube_points();
  let faces = cube_triangles();
  let shapes = TriangleShapes::all(&faces, &points, true).unwrap();
  let config = OctreeConfig::default().with_max_leaf_size(2);
  let tree = IndexedOctree::build(shapes, &config).unwrap();
  let first = tree.nodes().clone();

  let rebuilt = IndexedOctree::build(tree.into_shapes(), &config).unwrap();
  assert_eq!(rebuilt.nodes(), &first);
}

#[test]
fn test_build_errors_propagate() {
  let points = cube_points();
  let edges = cube_edges();
  let shapes = EdgeShapes::all(&edges, &points, false).unwrap();
  let err = IndexedOctree::build(shapes, &OctreeConfig::default().with_max_depth(99)).unwrap_err();
  assert!(matches!(err, crate::error::OctreeError::InvalidConfig { .. }));
}
