//! Parallel batch queries and builds using rayon.
//!
//! A built tree is read-only, so any number of queries can run on it at
//! once. Results come back in input order.

use glam::DVec3;
use rayon::prelude::*;

use crate::error::OctreeResult;
use crate::octree::{IndexedOctree, OctreeConfig};
use crate::shapes::ShapeAdapter;
use crate::types::{PointHit, VolumeType};

/// Nearest shape for every sample, in parallel.
pub fn find_nearest_batch<S>(tree: &IndexedOctree<S>, samples: &[DVec3]) -> Vec<Option<PointHit>>
where
  S: ShapeAdapter + Sync,
{
  if samples.is_empty() {
    return Vec::new();
  }

  samples
    .par_iter()
    .map(|&sample| tree.find_nearest(sample))
    .collect()
}

/// Volume type of every sample, in parallel.
pub fn volume_type_batch<S>(tree: &IndexedOctree<S>, samples: &[DVec3]) -> Vec<VolumeType>
where
  S: ShapeAdapter + Sync,
{
  if samples.is_empty() {
    return Vec::new();
  }

  samples
    .par_iter()
    .map(|&sample| tree.get_volume_type(sample))
    .collect()
}

/// Build independent trees in parallel, one per adapter.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::build_batch"))]
pub fn build_batch<S>(shapes: Vec<S>, config: &OctreeConfig) -> Vec<OctreeResult<IndexedOctree<S>>>
where
  S: ShapeAdapter + Send,
{
  if shapes.is_empty() {
    return Vec::new();
  }

  shapes
    .into_par_iter()
    .map(|shapes| IndexedOctree::build(shapes, config))
    .collect()
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;
