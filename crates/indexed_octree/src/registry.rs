//! Registry of shape adapters by primitive kind.
//!
//! Lets callers pick an adapter from a string tag (e.g. read from a config
//! file) instead of naming the type. Built-in kinds:
//!
//! | Tag                     | Adapter          |
//! |-------------------------|------------------|
//! | `edges`                 | `EdgeShapes`     |
//! | `triangles` / `faces`   | `TriangleShapes` |
//! | `points`                | `PointShapes`    |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use glam::DVec3;

use crate::bounds::BoundBox;
use crate::error::{OctreeError, OctreeResult};
use crate::octree::NodeStore;
use crate::shapes::{EdgeShapes, PointShapes, ShapeAdapter, TriangleShapes};
use crate::types::{LineQuery, PointQuery, VolumeType};

/// Primitive kind of an adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShapeKind {
  /// Line segments.
  Edges,
  /// Surface triangles.
  Triangles,
  /// Bare points.
  Points,
}

impl ShapeKind {
  /// Every built-in kind.
  pub const ALL: [ShapeKind; 3] = [ShapeKind::Edges, ShapeKind::Triangles, ShapeKind::Points];

  /// Canonical tag.
  pub fn as_str(self) -> &'static str {
    match self {
      ShapeKind::Edges => "edges",
      ShapeKind::Triangles => "triangles",
      ShapeKind::Points => "points",
    }
  }
}

impl fmt::Display for ShapeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ShapeKind {
  type Err = OctreeError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    Ok(match value.trim().to_ascii_lowercase().as_str() {
      "edges" | "edge" => ShapeKind::Edges,
      "triangles" | "triangle" | "faces" | "face" => ShapeKind::Triangles,
      "points" | "point" => ShapeKind::Points,
      _ => {
        return Err(OctreeError::UnknownShapeKind {
          kind: value.to_string(),
        })
      }
    })
  }
}

/// Borrowed caller geometry an adapter can be built from.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceGeometry<'a> {
  /// Vertex positions.
  pub points: &'a [DVec3],
  /// Edges as point index pairs.
  pub edges: &'a [[usize; 2]],
  /// Triangles as point index triples.
  pub faces: &'a [[usize; 3]],
}

impl<'a> SurfaceGeometry<'a> {
  /// Geometry with points only.
  pub fn new(points: &'a [DVec3]) -> Self {
    Self {
      points,
      ..Default::default()
    }
  }

  /// Attach edges.
  pub fn with_edges(mut self, edges: &'a [[usize; 2]]) -> Self {
    self.edges = edges;
    self
  }

  /// Attach triangles.
  pub fn with_faces(mut self, faces: &'a [[usize; 3]]) -> Self {
    self.faces = faces;
    self
  }
}

/// Any built-in adapter.
#[derive(Clone, Debug)]
pub enum AnyShapes<'a> {
  /// Edge adapter.
  Edges(EdgeShapes<'a>),
  /// Triangle adapter.
  Triangles(TriangleShapes<'a>),
  /// Point adapter.
  Points(PointShapes<'a>),
}

impl AnyShapes<'_> {
  /// Kind of the wrapped adapter.
  pub fn shape_kind(&self) -> ShapeKind {
    match self {
      AnyShapes::Edges(_) => ShapeKind::Edges,
      AnyShapes::Triangles(_) => ShapeKind::Triangles,
      AnyShapes::Points(_) => ShapeKind::Points,
    }
  }
}

macro_rules! dispatch {
  ($self:ident, $shapes:ident => $body:expr) => {
    match $self {
      AnyShapes::Edges($shapes) => $body,
      AnyShapes::Triangles($shapes) => $body,
      AnyShapes::Points($shapes) => $body,
    }
  };
}

impl ShapeAdapter for AnyShapes<'_> {
  fn kind(&self) -> &'static str {
    dispatch!(self, s => s.kind())
  }

  fn size(&self) -> usize {
    dispatch!(self, s => s.size())
  }

  fn bounding_box(&self, index: usize) -> OctreeResult<BoundBox> {
    dispatch!(self, s => s.bounding_box(index))
  }

  fn overlaps(&self, index: usize, bounds: &BoundBox) -> bool {
    dispatch!(self, s => s.overlaps(index, bounds))
  }

  fn representative_points(&self) -> Vec<DVec3> {
    dispatch!(self, s => s.representative_points())
  }

  fn find_nearest_point(&self, indices: &[usize], query: &mut PointQuery) {
    dispatch!(self, s => s.find_nearest_point(indices, query))
  }

  fn find_nearest_to_line(&self, indices: &[usize], query: &mut LineQuery) {
    dispatch!(self, s => s.find_nearest_to_line(indices, query))
  }

  fn supports_ray_intersection(&self) -> bool {
    dispatch!(self, s => s.supports_ray_intersection())
  }

  fn intersects_ray(&self, index: usize, start: DVec3, end: DVec3) -> OctreeResult<Option<DVec3>> {
    dispatch!(self, s => s.intersects_ray(index, start, end))
  }

  fn classify_point(&self, nodes: &NodeStore, sample: DVec3) -> VolumeType {
    dispatch!(self, s => s.classify_point(nodes, sample))
  }
}

/// Builds an adapter from geometry and the `cache_bounds` flag.
pub type ShapeConstructor = for<'a> fn(&SurfaceGeometry<'a>, bool) -> OctreeResult<AnyShapes<'a>>;

fn construct_edges<'a>(geometry: &SurfaceGeometry<'a>, cache_bounds: bool) -> OctreeResult<AnyShapes<'a>> {
  EdgeShapes::all(geometry.edges, geometry.points, cache_bounds).map(AnyShapes::Edges)
}

fn construct_triangles<'a>(
  geometry: &SurfaceGeometry<'a>,
  cache_bounds: bool,
) -> OctreeResult<AnyShapes<'a>> {
  TriangleShapes::all(geometry.faces, geometry.points, cache_bounds).map(AnyShapes::Triangles)
}

fn construct_points<'a>(geometry: &SurfaceGeometry<'a>, cache_bounds: bool) -> OctreeResult<AnyShapes<'a>> {
  PointShapes::all(geometry.points, cache_bounds).map(AnyShapes::Points)
}

/// Map from primitive kind to adapter constructor.
#[derive(Clone, Default)]
pub struct ShapeRegistry {
  constructors: HashMap<ShapeKind, ShapeConstructor>,
}

impl fmt::Debug for ShapeRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ShapeRegistry")
      .field("kinds", &self.kinds())
      .finish()
  }
}

impl ShapeRegistry {
  /// Registry with no constructors.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry with the three built-in kinds.
  pub fn with_defaults() -> Self {
    let mut registry = Self::new();
    registry.register(ShapeKind::Edges, construct_edges);
    registry.register(ShapeKind::Triangles, construct_triangles);
    registry.register(ShapeKind::Points, construct_points);
    registry
  }

  /// Set the constructor for `kind`, returning the one it replaces.
  pub fn register(&mut self, kind: ShapeKind, constructor: ShapeConstructor) -> Option<ShapeConstructor> {
    self.constructors.insert(kind, constructor)
  }

  /// Whether `kind` has a constructor.
  pub fn contains(&self, kind: ShapeKind) -> bool {
    self.constructors.contains_key(&kind)
  }

  /// Registered kinds in declaration order.
  pub fn kinds(&self) -> Vec<ShapeKind> {
    let mut kinds: Vec<_> = self.constructors.keys().copied().collect();
    kinds.sort();
    kinds
  }

  /// Build the adapter named by `tag`.
  ///
  /// # Errors
  /// `UnknownShapeKind` if the tag does not parse or has no constructor;
  /// otherwise whatever the constructor returns.
  pub fn construct<'a>(
    &self,
    tag: &str,
    geometry: &SurfaceGeometry<'a>,
    cache_bounds: bool,
  ) -> OctreeResult<AnyShapes<'a>> {
    let kind: ShapeKind = tag.parse()?;
    let constructor = self
      .constructors
      .get(&kind)
      .ok_or_else(|| OctreeError::UnknownShapeKind {
        kind: tag.to_string(),
      })?;
    constructor(geometry, cache_bounds)
  }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;
