//! indexed_octree - read-only spatial index over caller-owned geometry
//!
//! This crate provides a bounding-volume octree that is generic over a
//! pluggable [`ShapeAdapter`]. The adapter describes a fixed collection of
//! primitives (edges, triangles, points) and answers the exact geometric
//! tests; the octree only prunes by bounding box.
//!
//! # Features
//!
//! - **Nearest point**: branch-and-bound search, ties go to the first shape
//!   in traversal order
//! - **Nearest to line**: tightest-box pruning for segment proximity
//! - **Ray intersection**: slab-ordered traversal, nearest or any hit
//! - **Volume classification**: inside/outside via ray parity
//! - **Box search**: deduplicated shape lists for overlap queries
//!
//! # Example
//!
//! ```ignore
//! use glam::DVec3;
//! use indexed_octree::{EdgeShapes, IndexedOctree, OctreeConfig};
//!
//! let points = [DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0)];
//! let edges = [[0, 1], [1, 2]];
//!
//! let shapes = EdgeShapes::all(&edges, &points, true)?;
//! let tree = IndexedOctree::build(shapes, &OctreeConfig::default())?;
//!
//! if let Some(hit) = tree.find_nearest(DVec3::new(0.5, 0.2, 0.0)) {
//!     println!("edge {} at distance {}", hit.index, hit.distance());
//! }
//! ```

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{OctreeError, OctreeResult};
pub use types::{LineHit, LineQuery, PointHit, PointQuery, RayHit, VolumeType};

// Geometry primitives
pub mod bounds;
pub mod geometry;
pub use bounds::BoundBox;
pub use geometry::LineSegment;

// Shape adapters
pub mod shapes;
pub use shapes::{BoundCache, EdgeShapes, PointShapes, ShapeAdapter, TriangleShapes};

// Octree construction and queries
pub mod octree;
pub use octree::{BuildStats, IndexedOctree, NodeId, NodeStore, OctreeConfig, SegmentStep};

// Primitive-kind registry
pub mod registry;
pub use registry::{AnyShapes, ShapeKind, ShapeRegistry, SurfaceGeometry};

// Parallel batch queries
pub mod batch;

#[cfg(test)]
mod test_utils;
