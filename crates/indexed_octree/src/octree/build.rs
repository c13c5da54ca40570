//! Depth-first octree construction.
//!
//! # Algorithm
//!
//! 1. Validate the config and every shape (all-or-nothing).
//! 2. Root box = union of shape boxes and representative points, padded by
//!    `root_expansion`. A configured `root_bounds` is used instead, grown to
//!    cover that union so every shape overlaps at least one octant.
//! 3. Divide recursively. A node holding `count` shapes becomes a leaf when:
//!    - `count <= max_leaf_size`
//!    - `depth == max_depth`
//!    - its octant subsets would hold more than `max_duplicity * count`
//!      indices in total
//!
//!    Otherwise each octant receives, in parent order, the shapes that
//!    overlap it. Empty octants get no node.
//!
//! Nodes are pushed before their children, so ids are preorder and two builds
//! over the same input produce identical stores.

use web_time::Instant;

use super::config::OctreeConfig;
use super::node::{Node, NodeId, NodeKind, NodeStore};
use super::stats::BuildStats;
use crate::bounds::BoundBox;
use crate::error::{OctreeError, OctreeResult};
use crate::shapes::ShapeAdapter;

/// Why a node stopped splitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LeafReason {
  Size,
  Depth,
  Duplicity,
}

enum Split {
  Leaf(LeafReason),
  Octants([Vec<usize>; 8]),
}

struct Builder<'a, S: ?Sized> {
  shapes: &'a S,
  config: &'a OctreeConfig,
  store: NodeStore,
  stats: BuildStats,
}

/// Build the node store for `shapes`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::build"))]
pub fn build_nodes<S: ShapeAdapter + ?Sized>(
  shapes: &S,
  config: &OctreeConfig,
) -> OctreeResult<(NodeStore, BuildStats)> {
  let started = Instant::now();

  let root = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("validate").entered();

    config.validate()?;
    validate_shapes(shapes, config)?
  };

  let mut builder = Builder {
    shapes,
    config,
    store: NodeStore::new(),
    stats: BuildStats {
      shape_count: shapes.size(),
      ..Default::default()
    },
  };

  if let Some(root) = root {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("divide").entered();

    builder.divide(root, 0, (0..shapes.size()).collect());
  }

  let Builder {
    store, mut stats, ..
  } = builder;
  stats.node_count = store.len();
  stats.elapsed = started.elapsed();

  #[cfg(feature = "tracing")]
  tracing::debug!(
    shapes = stats.shape_count,
    nodes = stats.node_count,
    leaves = stats.leaf_count,
    elapsed_us = stats.elapsed_us(),
    "octree built"
  );

  Ok((store, stats))
}

/// Check every shape and compute the root box. `None` for zero shapes.
fn validate_shapes<S: ShapeAdapter + ?Sized>(
  shapes: &S,
  config: &OctreeConfig,
) -> OctreeResult<Option<BoundBox>> {
  let count = shapes.size();
  let mut bounds = BoundBox::empty();

  for index in 0..count {
    let shape_bounds = shapes.bounding_box(index)?;
    if !shape_bounds.is_valid() {
      return Err(OctreeError::invalid_geometry(format!(
        "shape {} has invalid bounding box {:?}",
        index, shape_bounds
      )));
    }
    bounds = bounds.union(&shape_bounds);
  }

  let points = shapes.representative_points();
  if points.len() != count {
    return Err(OctreeError::invalid_geometry(format!(
      "{} representative points for {} shapes",
      points.len(),
      count
    )));
  }
  if let Some(index) = points.iter().position(|p| !p.is_finite()) {
    return Err(OctreeError::invalid_geometry(format!(
      "representative point {} is not finite: {:?}",
      index, points[index]
    )));
  }
  for &point in &points {
    bounds.encapsulate(point);
  }

  if count == 0 {
    return Ok(None);
  }
  Ok(Some(match config.root_bounds {
    Some(root) => root.union(&bounds),
    None => bounds.expanded_relative(config.root_expansion),
  }))
}

impl<S: ShapeAdapter + ?Sized> Builder<'_, S> {
  fn divide(&mut self, bounds: BoundBox, depth: u32, indices: Vec<usize>) -> NodeId {
    // Reserve the slot so the parent precedes its children.
    let id = self.store.push(Node {
      bounds,
      depth,
      kind: NodeKind::Leaf { start: 0, len: 0 },
    });

    let kind = match self.split(&bounds, depth, &indices) {
      Split::Leaf(reason) => self.leaf(&indices, depth, reason),
      Split::Octants(subsets) => {
        let mut children = [None; 8];
        for (octant, subset) in subsets.into_iter().enumerate() {
          if !subset.is_empty() {
            children[octant] = Some(self.divide(bounds.octant(octant as u8), depth + 1, subset));
          }
        }
        self.stats.internal_count += 1;
        NodeKind::Internal { children }
      }
    };

    self.store.set_kind(id, kind);
    id
  }

  fn split(&self, bounds: &BoundBox, depth: u32, indices: &[usize]) -> Split {
    let count = indices.len();
    if count <= self.config.max_leaf_size {
      return Split::Leaf(LeafReason::Size);
    }
    if depth >= self.config.max_depth {
      return Split::Leaf(LeafReason::Depth);
    }

    let subsets: [Vec<usize>; 8] = std::array::from_fn(|octant| {
      let octant_bounds = bounds.octant(octant as u8);
      indices
        .iter()
        .copied()
        .filter(|&index| self.shapes.overlaps(index, &octant_bounds))
        .collect()
    });

    let total: usize = subsets.iter().map(Vec::len).sum();
    if total as f64 > self.config.max_duplicity * count as f64 {
      return Split::Leaf(LeafReason::Duplicity);
    }
    Split::Octants(subsets)
  }

  fn leaf(&mut self, indices: &[usize], depth: u32, reason: LeafReason) -> NodeKind {
    match reason {
      LeafReason::Depth => self.stats.depth_limited_leaves += 1,
      LeafReason::Duplicity => self.stats.duplicity_limited_leaves += 1,
      LeafReason::Size => {}
    }
    self.stats.leaf_count += 1;
    self.stats.stored_indices += indices.len();
    self.stats.max_leaf_depth = self.stats.max_leaf_depth.max(depth);
    self.store.push_leaf(indices)
  }
}

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;
