//! Query traversals over a [`NodeStore`].
//!
//! Every traversal is generic over the adapter and keeps its state on the
//! stack, so concurrent queries on one tree never interact.
//!
//! # Child ordering
//!
//! | Query            | Order key                          | Prune                         |
//! |------------------|------------------------------------|-------------------------------|
//! | nearest point    | box distance to sample             | key >= best distance          |
//! | nearest to line  | box distance to line's box         | box misses `tightest`         |
//! | segment walk     | slab entry parameter               | entry beyond clip parameter   |
//! | box search       | octant order                       | box misses query box          |
//!
//! Sorts are stable, so equal keys keep octant order and results are
//! deterministic.

use std::ops::ControlFlow;

use glam::DVec3;
use smallvec::SmallVec;

use super::node::{NodeId, NodeKind, NodeStore};
use crate::bounds::BoundBox;
use crate::constants::DEGENERATE_LENGTH_SQ;
use crate::error::{OctreeError, OctreeResult};
use crate::geometry::LineSegment;
use crate::shapes::ShapeAdapter;
use crate::types::{LineHit, LineQuery, PointHit, PointQuery, RayHit, VolumeType};

/// Visitor verdict for [`NodeStore::walk_segment`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentStep {
  /// Keep walking.
  Continue,
  /// Skip nodes entered beyond this segment parameter.
  Clip(f64),
  /// End the walk.
  Stop,
}

type ChildOrder = SmallVec<[(f64, NodeId); 8]>;

impl NodeStore {
  // ===========================================================================
  // Nearest point
  // ===========================================================================

  /// Nearest shape to `sample`.
  pub fn find_nearest<S: ShapeAdapter + ?Sized>(&self, shapes: &S, sample: DVec3) -> Option<PointHit> {
    self.find_nearest_within(shapes, sample, f64::INFINITY)
  }

  /// Nearest shape strictly closer than `sqrt(max_distance_squared)`.
  pub fn find_nearest_within<S: ShapeAdapter + ?Sized>(
    &self,
    shapes: &S,
    sample: DVec3,
    max_distance_squared: f64,
  ) -> Option<PointHit> {
    if !sample.is_finite() || self.is_empty() {
      return None;
    }
    let mut query = PointQuery::within(sample, max_distance_squared);
    self.nearest_in(shapes, NodeId::ROOT, &mut query);
    query.best
  }

  fn nearest_in<S: ShapeAdapter + ?Sized>(&self, shapes: &S, id: NodeId, query: &mut PointQuery) {
    let Some(node) = self.node(id) else {
      return;
    };
    if node.bounds.distance_squared_to_point(query.sample) >= query.best_distance_squared {
      return;
    }
    match node.kind {
      NodeKind::Leaf { .. } => shapes.find_nearest_point(self.leaf_indices(node), query),
      NodeKind::Internal { .. } => {
        let mut order: ChildOrder = node
          .children()
          .filter_map(|(_, child)| {
            self
              .node(child)
              .map(|n| (n.bounds.distance_squared_to_point(query.sample), child))
          })
          .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (lower_bound, child) in order {
          if lower_bound >= query.best_distance_squared {
            break;
          }
          self.nearest_in(shapes, child, query);
        }
      }
    }
  }

  // ===========================================================================
  // Nearest to line
  // ===========================================================================

  /// Nearest shape to `line`.
  pub fn find_nearest_to_line<S: ShapeAdapter + ?Sized>(
    &self,
    shapes: &S,
    line: &LineSegment,
  ) -> Option<LineHit> {
    let root = self.root_bounds()?;
    self.find_nearest_to_line_within(shapes, line, root).0
  }

  /// Nearest shape to `line` among nodes overlapping `tightest`.
  ///
  /// Returns the hit and the final pruning box.
  pub fn find_nearest_to_line_within<S: ShapeAdapter + ?Sized>(
    &self,
    shapes: &S,
    line: &LineSegment,
    tightest: BoundBox,
  ) -> (Option<LineHit>, BoundBox) {
    if !line.is_finite() || self.is_empty() {
      return (None, tightest);
    }
    let mut query = LineQuery::new(*line, tightest);
    self.line_in(shapes, NodeId::ROOT, &mut query);
    (query.best, query.tightest)
  }

  fn line_in<S: ShapeAdapter + ?Sized>(&self, shapes: &S, id: NodeId, query: &mut LineQuery) {
    let Some(node) = self.node(id) else {
      return;
    };
    if !node.bounds.overlaps(&query.tightest) {
      return;
    }
    match node.kind {
      NodeKind::Leaf { .. } => shapes.find_nearest_to_line(self.leaf_indices(node), query),
      NodeKind::Internal { .. } => {
        let line_bounds = query.line.bounds();
        let mut order: ChildOrder = node
          .children()
          .filter_map(|(_, child)| {
            self
              .node(child)
              .map(|n| (n.bounds.distance_squared_to_box(&line_bounds), child))
          })
          .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, child) in order {
          self.line_in(shapes, child, query);
        }
      }
    }
  }

  // ===========================================================================
  // Segment walk and rays
  // ===========================================================================

  /// Visit the leaves crossed by segment `start..end` in order of entry.
  ///
  /// The visitor gets each leaf's shape indices and may clip the walk to a
  /// segment parameter (nodes entered later are skipped) or stop it.
  pub fn walk_segment<F>(&self, start: DVec3, end: DVec3, mut visit: F)
  where
    F: FnMut(&[usize]) -> SegmentStep,
  {
    if !start.is_finite() || !end.is_finite() {
      return;
    }
    let Some(root) = self.root_bounds() else {
      return;
    };
    if root.intersect_segment(start, end, 1.0).is_none() {
      return;
    }
    let mut t_max = 1.0;
    let _ = self.walk_in(NodeId::ROOT, start, end, &mut t_max, &mut visit);
  }

  fn walk_in<F>(
    &self,
    id: NodeId,
    start: DVec3,
    end: DVec3,
    t_max: &mut f64,
    visit: &mut F,
  ) -> ControlFlow<()>
  where
    F: FnMut(&[usize]) -> SegmentStep,
  {
    let Some(node) = self.node(id) else {
      return ControlFlow::Continue(());
    };
    match node.kind {
      NodeKind::Leaf { .. } => match visit(self.leaf_indices(node)) {
        SegmentStep::Continue => ControlFlow::Continue(()),
        SegmentStep::Clip(t) => {
          *t_max = t_max.min(t);
          ControlFlow::Continue(())
        }
        SegmentStep::Stop => ControlFlow::Break(()),
      },
      NodeKind::Internal { .. } => {
        let limit = *t_max;
        let mut order: ChildOrder = node
          .children()
          .filter_map(|(_, child)| {
            let bounds = self.node(child)?.bounds;
            let (enter, _) = bounds.intersect_segment(start, end, limit)?;
            Some((enter, child))
          })
          .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (enter, child) in order {
          if enter > *t_max {
            break;
          }
          self.walk_in(child, start, end, t_max, visit)?;
        }
        ControlFlow::Continue(())
      }
    }
  }

  /// Nearest intersection of segment `start..end` with any shape.
  ///
  /// # Errors
  /// `NotSupported` if the adapter has no ray test, before any traversal.
  pub fn find_line<S: ShapeAdapter + ?Sized>(
    &self,
    shapes: &S,
    start: DVec3,
    end: DVec3,
  ) -> OctreeResult<Option<RayHit>> {
    self.ray_query(shapes, start, end, "find_line", false)
  }

  /// First intersection found in traversal order (not necessarily nearest).
  ///
  /// # Errors
  /// `NotSupported` if the adapter has no ray test.
  pub fn find_line_any<S: ShapeAdapter + ?Sized>(
    &self,
    shapes: &S,
    start: DVec3,
    end: DVec3,
  ) -> OctreeResult<Option<RayHit>> {
    self.ray_query(shapes, start, end, "find_line_any", true)
  }

  fn ray_query<S: ShapeAdapter + ?Sized>(
    &self,
    shapes: &S,
    start: DVec3,
    end: DVec3,
    operation: &'static str,
    first_hit: bool,
  ) -> OctreeResult<Option<RayHit>> {
    if !shapes.supports_ray_intersection() {
      return Err(OctreeError::NotSupported {
        operation,
        shape_kind: shapes.kind(),
      });
    }

    let mut best: Option<RayHit> = None;
    let mut failure = None;
    self.walk_segment(start, end, |indices| {
      for &index in indices {
        match shapes.intersects_ray(index, start, end) {
          Ok(Some(point)) => {
            let fraction = segment_fraction(start, end, point);
            if best.map_or(true, |b| fraction < b.fraction) {
              best = Some(RayHit {
                index,
                point,
                fraction,
              });
            }
            if first_hit {
              return SegmentStep::Stop;
            }
          }
          Ok(None) => {}
          Err(err) => {
            failure = Some(err);
            return SegmentStep::Stop;
          }
        }
      }
      best.map_or(SegmentStep::Continue, |b| SegmentStep::Clip(b.fraction))
    });

    match failure {
      Some(err) => Err(err),
      None => Ok(best),
    }
  }

  // ===========================================================================
  // Box search and classification
  // ===========================================================================

  /// Every shape whose box overlaps `bounds`, sorted and deduplicated.
  pub fn find_box<S: ShapeAdapter + ?Sized>(&self, shapes: &S, bounds: &BoundBox) -> Vec<usize> {
    let mut found = Vec::new();
    if !self.is_empty() {
      self.box_in(shapes, NodeId::ROOT, bounds, &mut found);
    }
    found.sort_unstable();
    found.dedup();
    found
  }

  fn box_in<S: ShapeAdapter + ?Sized>(
    &self,
    shapes: &S,
    id: NodeId,
    bounds: &BoundBox,
    found: &mut Vec<usize>,
  ) {
    let Some(node) = self.node(id) else {
      return;
    };
    if !node.bounds.overlaps(bounds) {
      return;
    }
    match node.kind {
      NodeKind::Leaf { .. } => found.extend(
        self
          .leaf_indices(node)
          .iter()
          .copied()
          .filter(|&index| shapes.overlaps(index, bounds)),
      ),
      NodeKind::Internal { .. } => {
        for (_, child) in node.children() {
          self.box_in(shapes, child, bounds, found);
        }
      }
    }
  }

  /// Inside/outside classification of `sample`.
  pub fn get_volume_type<S: ShapeAdapter + ?Sized>(&self, shapes: &S, sample: DVec3) -> VolumeType {
    shapes.classify_point(self, sample)
  }
}

/// Parameter of `point` along `start..end`, clamped to `[0, 1]`.
fn segment_fraction(start: DVec3, end: DVec3, point: DVec3) -> f64 {
  let dir = end - start;
  let len_sq = dir.length_squared();
  if len_sq <= DEGENERATE_LENGTH_SQ {
    return 0.0;
  }
  ((point - start).dot(dir) / len_sq).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;
