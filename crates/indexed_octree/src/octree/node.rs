//! Node store - arena of octree nodes plus the shared leaf index list.
//!
//! Nodes are addressed by [`NodeId`] and laid out in depth-first preorder,
//! root first. Leaves own a contiguous range of one shared `Vec<usize>`, so a
//! whole tree is two allocations.

use crate::bounds::BoundBox;

/// Index of a node in a [`NodeStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  /// The root node of a non-empty store.
  pub const ROOT: NodeId = NodeId(0);

  /// Position in the node arena.
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Interior or leaf payload of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
  /// Up to eight children, indexed by octant. Octants no shape overlaps are
  /// `None`.
  Internal {
    /// Child per octant (bit 0 = +X, bit 1 = +Y, bit 2 = +Z).
    children: [Option<NodeId>; 8],
  },
  /// Range `start..start + len` of the store's index list.
  Leaf {
    /// First index position.
    start: usize,
    /// Number of shape indices.
    len: usize,
  },
}

/// One octree node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
  /// Octant box (not shrunk to the contents).
  pub bounds: BoundBox,
  /// Depth below the root (root = 0).
  pub depth: u32,
  /// Children or shape range.
  pub kind: NodeKind,
}

impl Node {
  /// True for leaves.
  #[inline]
  pub fn is_leaf(&self) -> bool {
    matches!(self.kind, NodeKind::Leaf { .. })
  }

  /// Present children as `(octant, id)`, in octant order.
  pub fn children(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
    let children: &[Option<NodeId>] = match &self.kind {
      NodeKind::Internal { children } => children,
      NodeKind::Leaf { .. } => &[],
    };
    children
      .iter()
      .enumerate()
      .filter_map(|(octant, child)| child.map(|id| (octant as u8, id)))
  }
}

/// Arena of nodes plus the concatenated leaf contents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStore {
  nodes: Vec<Node>,
  indices: Vec<usize>,
}

impl NodeStore {
  /// Store with no nodes (tree over zero shapes).
  pub fn new() -> Self {
    Self::default()
  }

  /// True if there is no root.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Number of nodes.
  #[inline]
  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  /// All nodes in preorder.
  #[inline]
  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  /// Concatenated leaf contents. Shapes spanning several leaves repeat.
  #[inline]
  pub fn indices(&self) -> &[usize] {
    &self.indices
  }

  /// Node by id.
  #[inline]
  pub fn node(&self, id: NodeId) -> Option<&Node> {
    self.nodes.get(id.index())
  }

  /// Root node, if any.
  #[inline]
  pub fn root(&self) -> Option<&Node> {
    self.nodes.first()
  }

  /// Root box, if any.
  #[inline]
  pub fn root_bounds(&self) -> Option<BoundBox> {
    self.root().map(|node| node.bounds)
  }

  /// Shape indices of a leaf, in parent order. Empty for internal nodes.
  #[inline]
  pub fn leaf_indices(&self, node: &Node) -> &[usize] {
    match node.kind {
      NodeKind::Leaf { start, len } => self.indices.get(start..start + len).unwrap_or(&[]),
      NodeKind::Internal { .. } => &[],
    }
  }

  /// Leaves in preorder.
  pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
    self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, node)| node.is_leaf())
      .map(|(i, node)| (NodeId(i as u32), node))
  }

  /// Number of leaves.
  pub fn leaf_count(&self) -> usize {
    self.leaves().count()
  }

  /// Deepest node depth, `None` when empty.
  pub fn max_depth(&self) -> Option<u32> {
    self.nodes.iter().map(|node| node.depth).max()
  }

  /// Append a node, returning its id.
  pub(crate) fn push(&mut self, node: Node) -> NodeId {
    debug_assert!(self.nodes.len() < u32::MAX as usize, "node arena overflow");
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(node);
    id
  }

  /// Replace the payload of a reserved node.
  pub(crate) fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
    if let Some(node) = self.nodes.get_mut(id.index()) {
      node.kind = kind;
    }
  }

  /// Append leaf contents, returning the leaf payload.
  pub(crate) fn push_leaf(&mut self, indices: &[usize]) -> NodeKind {
    let start = self.indices.len();
    self.indices.extend_from_slice(indices);
    NodeKind::Leaf {
      start,
      len: indices.len(),
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
