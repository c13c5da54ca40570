//! Build defaults and geometric tolerances.
//!
//! Tolerances named `*_TOLERANCE` are relative: they are scaled by the
//! diagonal of the tree's root box before use, so the same constant works for
//! millimetre meshes and kilometre terrains.

// =============================================================================
// Build defaults
// =============================================================================

/// Leaf occupancy before a node is split.
pub const DEFAULT_MAX_LEAF_SIZE: usize = 10;

/// Depth limit for subdivision (root = depth 0).
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Hard ceiling on `max_depth`. Octant sizes shrink by 2^depth, and beyond
/// this the midpoints of an f64 box stop being distinct.
pub const MAX_SUPPORTED_DEPTH: u32 = 32;

/// Maximum replication factor accepted when splitting a node.
///
/// If the eight octant subsets together hold more than
/// `max_duplicity * count` indices, the node stays a leaf.
pub const DEFAULT_MAX_DUPLICITY: f64 = 3.0;

/// Relative padding applied to the computed root box.
pub const DEFAULT_ROOT_EXPANSION: f64 = 1e-4;

// =============================================================================
// Query tolerances
// =============================================================================

/// Squared lengths at or below this are treated as zero (degenerate edges,
/// coincident triangle corners).
pub const DEGENERATE_LENGTH_SQ: f64 = 1e-300;

/// Relative distance under which a sample counts as lying on the boundary,
/// and a loop vertex counts as lying on the loop plane.
pub const CLASSIFY_TOLERANCE: f64 = 1e-6;

/// Barycentric margin for probe hits. A hit closer than this to a triangle
/// edge is ambiguous (the ray may be crossing two faces at once).
pub const PROBE_BARYCENTRIC_TOLERANCE: f64 = 1e-6;

/// Relative determinant under which a ray is parallel to a triangle.
pub const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Probe directions for surface classification, tried in order until one
/// gives an unambiguous crossing count. Deliberately off-axis so that
/// axis-aligned meshes are not grazed.
pub const PROBE_DIRECTIONS: [[f64; 3]; 4] = [
  [1.0, 0.318_309_886, 0.141_592_654],
  [0.271_828_183, 1.0, 0.577_215_665],
  [0.693_147_181, 0.161_803_399, 1.0],
  [-0.414_213_562, 0.732_050_808, -0.236_067_977],
];

/// In-plane probe angles (radians) for planar edge-loop classification.
pub const PROBE_ANGLES: [f64; 4] = [0.318_309_886, 1.107_148_718, 2.034_443_936, 2.718_281_828];

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
