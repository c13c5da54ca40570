use glam::DVec3;

use super::*;

fn unit() -> BoundBox {
  BoundBox::new(DVec3::ZERO, DVec3::ONE)
}

/// Root with two leaf children in octants 0 and 5.
fn small_store() -> NodeStore {
  let mut store = NodeStore::new();
  let root = store.push(Node {
    bounds: unit(),
    depth: 0,
    kind: NodeKind::Leaf { start: 0, len: 0 },
  });

  let kind = store.push_leaf(&[0, 1]);
  let a = store.push(Node {
    bounds: unit().octant(0),
    depth: 1,
    kind,
  });
  let kind = store.push_leaf(&[1, 2, 3]);
  let b = store.push(Node {
    bounds: unit().octant(5),
    depth: 1,
    kind,
  });

  let mut children = [None; 8];
  children[0] = Some(a);
  children[5] = Some(b);
  store.set_kind(root, NodeKind::Internal { children });
  store
}

#[test]
fn test_empty_store() {
  let store = NodeStore::new();
  assert!(store.is_empty());
  assert!(store.root().is_none());
  assert!(store.root_bounds().is_none());
  assert_eq!(store.leaf_count(), 0);
  assert_eq!(store.max_depth(), None);
}

#[test]
fn test_root_is_first() {
  let store = small_store();
  assert_eq!(store.len(), 3);
  assert_eq!(store.root_bounds(), Some(unit()));
  assert!(!store.root().unwrap().is_leaf());
  assert_eq!(NodeId::ROOT.index(), 0);
}

#[test]
fn test_children_in_octant_order() {
  let store = small_store();
  let root = store.root().unwrap();
  let children: Vec<_> = root.children().collect();
  assert_eq!(children, vec![(0, NodeId(1)), (5, NodeId(2))]);

  let leaf = store.node(NodeId(1)).unwrap();
  assert_eq!(leaf.children().count(), 0);
}

#[test]
fn test_leaf_indices_share_one_list() {
  let store = small_store();
  assert_eq!(store.indices(), &[0, 1, 1, 2, 3]);

  let leaves: Vec<_> = store.leaves().map(|(id, _)| id).collect();
  assert_eq!(leaves, vec![NodeId(1), NodeId(2)]);
  assert_eq!(store.leaf_indices(store.node(NodeId(2)).unwrap()), &[1, 2, 3]);
  assert!(store.leaf_indices(store.root().unwrap()).is_empty());
  assert_eq!(store.max_depth(), Some(1));
}

#[test]
fn test_missing_node() {
  let store = small_store();
  assert!(store.node(NodeId(3)).is_none());
}
