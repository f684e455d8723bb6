//! Dynamic AABB tree (incremental bounding-volume hierarchy).
//!
//! Broadphase index over "fat" boxes: every leaf stores the bounds of one
//! object padded by a margin, so an object that moves a little keeps its leaf
//! untouched and only pays for a reinsertion once it escapes its padding.
//!
//! Nodes live in an arena and refer to each other by index. Freed slots go on
//! a free list and are reused, so detaching a node can never leave a dangling
//! reference behind.
//!
//! Insertion descends greedily, picking at each internal node the child whose
//! union with the new leaf has the smaller area. There is no rebalancing, so
//! depth is O(log n) only in expectation.

use std::collections::HashMap;

use tracing::trace;

use super::aabb::AABB;
use crate::error::{PhysicsError, Result};

/// Null node sentinel
pub const NULL_NODE: u32 = u32::MAX;

#[derive(Clone, Debug)]
struct TreeNode {
    /// Fat box for leaves, union of both children for internal nodes.
    aabb: AABB,
    parent: u32,
    /// Both `NULL_NODE` for leaves, both valid for internal nodes.
    children: [u32; 2],
    /// External object id, only meaningful for leaves.
    object_id: u32,
    live: bool,
}

impl TreeNode {
    fn leaf(aabb: AABB, object_id: u32) -> Self {
        Self {
            aabb,
            parent: NULL_NODE,
            children: [NULL_NODE, NULL_NODE],
            object_id,
            live: true,
        }
    }

    fn internal(parent: u32, children: [u32; 2]) -> Self {
        Self {
            aabb: AABB::default(),
            parent,
            children,
            object_id: NULL_NODE,
            live: true,
        }
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.children[0] == NULL_NODE
    }
}

/// Dynamic AABB tree keyed by external object id.
#[derive(Debug)]
pub struct AabbTree {
    nodes: Vec<TreeNode>,
    free_list: Vec<u32>,
    root: u32,
    leaf_map: HashMap<u32, u32>,
}

impl AabbTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            root: NULL_NODE,
            leaf_map: HashMap::new(),
        }
    }

    /// Number of objects stored in the tree.
    pub fn len(&self) -> usize {
        self.leaf_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root == NULL_NODE
    }

    pub fn contains(&self, id: u32) -> bool {
        self.leaf_map.contains_key(&id)
    }

    /// Stored (fat) box of an object.
    pub fn fat_aabb(&self, id: u32) -> Option<AABB> {
        self.leaf_map.get(&id).map(|&leaf| self.nodes[leaf as usize].aabb)
    }

    /// Live node count, leaves plus internal nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        if self.root == NULL_NODE {
            return 0;
        }
        let mut deepest = 0;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((node_id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[node_id as usize];
            if !node.is_leaf() {
                stack.push((node.children[0], depth + 1));
                stack.push((node.children[1], depth + 1));
            }
        }
        deepest
    }

    /// Inserts `id` with the given (already fattened) box.
    ///
    /// An id that is already present is moved to the new box, so every object
    /// owns at most one leaf.
    pub fn insert(&mut self, id: u32, aabb: AABB) {
        if self.leaf_map.contains_key(&id) {
            self.remove(id);
        }
        let leaf = self.alloc_node(TreeNode::leaf(aabb, id));
        self.leaf_map.insert(id, leaf);
        self.insert_leaf(leaf);
    }

    /// Removes `id`. Unknown ids are ignored; returns whether a leaf was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let Some(leaf) = self.leaf_map.remove(&id) else {
            return false;
        };
        self.remove_leaf(leaf);
        self.free_node(leaf);
        true
    }

    /// Lazily refits an object's leaf.
    ///
    /// When `tight` still fits inside the stored fat box nothing happens.
    /// Otherwise the leaf is pulled out and reinserted with `tight` padded by
    /// `margin`. Returns whether the tree changed.
    pub fn update(&mut self, id: u32, tight: AABB, margin: f64) -> bool {
        let Some(&leaf) = self.leaf_map.get(&id) else {
            return false;
        };
        if self.nodes[leaf as usize].aabb.contains(&tight) {
            return false;
        }

        trace!(id, margin, "reinserting escaped leaf");
        self.remove_leaf(leaf);
        self.nodes[leaf as usize].aabb = tight.fattened(margin);
        self.insert_leaf(leaf);
        true
    }

    /// Appends every object whose fat box overlaps `aabb` to `out`.
    ///
    /// Results come in no particular order and never repeat.
    pub fn query(&self, aabb: &AABB, out: &mut Vec<u32>) {
        if self.root == NULL_NODE {
            return;
        }

        let mut stack = Vec::with_capacity(64);
        stack.push(self.root);

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            if !node.aabb.overlaps(aabb) {
                continue;
            }

            if node.is_leaf() {
                out.push(node.object_id);
            } else {
                stack.push(node.children[0]);
                stack.push(node.children[1]);
            }
        }
    }

    /// Calls `visit` once per node, depth first, with the node's box and
    /// whether it is a leaf.
    pub fn visit<F: FnMut(&AABB, bool)>(&self, mut visit: F) {
        if self.root == NULL_NODE {
            return;
        }
        let mut stack = vec![self.root];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            visit(&node.aabb, node.is_leaf());
            if !node.is_leaf() {
                stack.push(node.children[1]);
                stack.push(node.children[0]);
            }
        }
    }

    /// Drops every node and object.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.leaf_map.clear();
        self.root = NULL_NODE;
    }

    /// Walks the whole tree and checks its structural invariants: parent and
    /// child links agree, internal boxes are exact unions, every leaf is
    /// registered under its own id and nothing is unreachable.
    pub fn validate(&self) -> Result<()> {
        let corrupt = |msg: String| Err(PhysicsError::CorruptTree(msg));

        if self.root == NULL_NODE {
            if !self.leaf_map.is_empty() {
                return corrupt(format!("empty tree maps {} leaves", self.leaf_map.len()));
            }
            return Ok(());
        }
        if self.nodes[self.root as usize].parent != NULL_NODE {
            return corrupt("root has a parent".to_string());
        }

        let mut reached = 0usize;
        let mut leaves = 0usize;
        let mut stack = vec![self.root];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            reached += 1;
            if reached > self.nodes.len() {
                return corrupt("cycle detected".to_string());
            }
            if !node.live {
                return corrupt(format!("node {node_id} reachable after release"));
            }

            if node.is_leaf() {
                leaves += 1;
                if node.children[1] != NULL_NODE {
                    return corrupt(format!("node {node_id} has a single child"));
                }
                match self.leaf_map.get(&node.object_id) {
                    Some(&mapped) if mapped == node_id => {}
                    _ => return corrupt(format!("leaf {node_id} not registered")),
                }
                continue;
            }

            for child in node.children {
                if child == NULL_NODE {
                    return corrupt(format!("internal node {node_id} missing a child"));
                }
                if self.nodes[child as usize].parent != node_id {
                    return corrupt(format!("child {child} does not point back to {node_id}"));
                }
                stack.push(child);
            }
            let [a, b] = node.children;
            let union = self.nodes[a as usize].aabb.union(&self.nodes[b as usize].aabb);
            if union != node.aabb {
                return corrupt(format!("node {node_id} box is not the union of its children"));
            }
        }

        if leaves != self.leaf_map.len() {
            return corrupt(format!("{} leaves reachable, {} mapped", leaves, self.leaf_map.len()));
        }
        if reached != self.node_count() {
            return corrupt(format!("{} nodes reachable, {} live", reached, self.node_count()));
        }
        Ok(())
    }

    // =========== Internal methods ===========

    fn alloc_node(&mut self, node: TreeNode) -> u32 {
        if let Some(id) = self.free_list.pop() {
            self.nodes[id as usize] = node;
            id
        } else {
            let id = self.nodes.len() as u32;
            self.nodes.push(node);
            id
        }
    }

    fn free_node(&mut self, node_id: u32) {
        let node = &mut self.nodes[node_id as usize];
        debug_assert!(node.live, "node {node_id} released twice");
        node.live = false;
        node.parent = NULL_NODE;
        node.children = [NULL_NODE, NULL_NODE];
        node.object_id = NULL_NODE;
        self.free_list.push(node_id);
    }

    fn insert_leaf(&mut self, leaf: u32) {
        if self.root == NULL_NODE {
            self.root = leaf;
            self.nodes[leaf as usize].parent = NULL_NODE;
            return;
        }

        let leaf_aabb = self.nodes[leaf as usize].aabb;
        let mut sibling = self.root;
        while !self.nodes[sibling as usize].is_leaf() {
            let [left, right] = self.nodes[sibling as usize].children;
            let area_left = self.nodes[left as usize].aabb.union(&leaf_aabb).area();
            let area_right = self.nodes[right as usize].aabb.union(&leaf_aabb).area();
            sibling = if area_left < area_right { left } else { right };
        }

        let old_parent = self.nodes[sibling as usize].parent;
        let new_parent = self.alloc_node(TreeNode::internal(old_parent, [sibling, leaf]));

        if old_parent == NULL_NODE {
            self.root = new_parent;
        } else {
            let slot = self.child_slot(old_parent, sibling);
            self.nodes[old_parent as usize].children[slot] = new_parent;
        }
        self.nodes[sibling as usize].parent = new_parent;
        self.nodes[leaf as usize].parent = new_parent;

        self.refit_upwards(new_parent);
    }

    /// Detaches `leaf` and releases its parent. The leaf itself stays allocated.
    fn remove_leaf(&mut self, leaf: u32) {
        debug_assert!(self.nodes[leaf as usize].is_leaf(), "node {leaf} is not a leaf");

        if leaf == self.root {
            self.root = NULL_NODE;
            return;
        }

        let parent = self.nodes[leaf as usize].parent;
        debug_assert!(parent != NULL_NODE, "non-root leaf {leaf} has no parent");
        let grand_parent = self.nodes[parent as usize].parent;
        let sibling = {
            let [a, b] = self.nodes[parent as usize].children;
            if a == leaf {
                b
            } else {
                a
            }
        };

        if grand_parent == NULL_NODE {
            self.root = sibling;
            self.nodes[sibling as usize].parent = NULL_NODE;
            self.free_node(parent);
        } else {
            let slot = self.child_slot(grand_parent, parent);
            self.nodes[grand_parent as usize].children[slot] = sibling;
            self.nodes[sibling as usize].parent = grand_parent;
            self.free_node(parent);
            self.refit_upwards(grand_parent);
        }
        self.nodes[leaf as usize].parent = NULL_NODE;
    }

    fn child_slot(&self, parent: u32, child: u32) -> usize {
        let children = self.nodes[parent as usize].children;
        debug_assert!(
            children.contains(&child),
            "node {child} is not a child of {parent}"
        );
        usize::from(children[0] != child)
    }

    fn refit_upwards(&mut self, start: u32) {
        let mut node_id = start;
        while node_id != NULL_NODE {
            let [a, b] = self.nodes[node_id as usize].children;
            self.nodes[node_id as usize].aabb =
                self.nodes[a as usize].aabb.union(&self.nodes[b as usize].aabb);
            node_id = self.nodes[node_id as usize].parent;
        }
    }
}

impl Default for AabbTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2::Vec2;
    use proptest::prelude::*;

    fn square(x: f64, y: f64, half: f64) -> AABB {
        AABB::from_center_half_extents(Vec2::new(x, y), Vec2::splat(half))
    }

    fn query_sorted(tree: &AabbTree, aabb: &AABB) -> Vec<u32> {
        let mut out = Vec::new();
        tree.query(aabb, &mut out);
        out.sort_unstable();
        out
    }

    #[test]
    fn test_empty_tree() {
        let mut tree = AabbTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(query_sorted(&tree, &square(0.0, 0.0, 100.0)).is_empty());
        // Removing from an empty tree is a no-op
        assert!(!tree.remove(7));
        assert!(!tree.update(7, square(0.0, 0.0, 1.0), 1.0));
        tree.validate().unwrap();
    }

    #[test]
    fn test_insert_and_query() {
        let mut tree = AabbTree::new();
        tree.insert(0, square(0.0, 0.0, 1.0));
        tree.insert(1, square(10.0, 0.0, 1.0));
        tree.insert(2, square(0.5, 0.5, 1.0));

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(query_sorted(&tree, &square(0.0, 0.0, 0.5)), vec![0, 2]);
        assert_eq!(query_sorted(&tree, &square(10.0, 0.0, 0.1)), vec![1]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_first_insert_becomes_root() {
        let mut tree = AabbTree::new();
        tree.insert(42, square(0.0, 0.0, 1.0));
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node_count(), 1);
        let mut visited = Vec::new();
        tree.visit(|aabb, leaf| visited.push((*aabb, leaf)));
        assert_eq!(visited, vec![(square(0.0, 0.0, 1.0), true)]);
    }

    #[test]
    fn test_remove_root_empties_tree() {
        let mut tree = AabbTree::new();
        tree.insert(3, square(0.0, 0.0, 1.0));
        assert!(tree.remove(3));
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_splices_parent() {
        let mut tree = AabbTree::new();
        for i in 0..4 {
            tree.insert(i, square(i as f64 * 5.0, 0.0, 1.0));
        }
        assert!(tree.remove(1));
        assert_eq!(tree.len(), 3);
        // Leaf and its former parent are both released
        assert_eq!(tree.node_count(), 5);
        assert!(query_sorted(&tree, &square(5.0, 0.0, 0.5)).is_empty());
        tree.validate().unwrap();

        // Freed slots are reused
        tree.insert(9, square(5.0, 0.0, 1.0));
        assert_eq!(tree.nodes.len(), 7);
        tree.validate().unwrap();
    }

    #[test]
    fn test_internal_box_is_union_of_children() {
        let mut tree = AabbTree::new();
        tree.insert(0, square(0.0, 0.0, 1.0));
        tree.insert(1, square(10.0, 10.0, 1.0));
        let mut boxes = Vec::new();
        tree.visit(|aabb, leaf| boxes.push((*aabb, leaf)));
        assert_eq!(boxes.len(), 3);
        let (root_box, root_is_leaf) = boxes[0];
        assert!(!root_is_leaf);
        assert_eq!(root_box, square(0.0, 0.0, 1.0).union(&square(10.0, 10.0, 1.0)));
    }

    #[test]
    fn test_insert_existing_id_replaces_leaf() {
        let mut tree = AabbTree::new();
        tree.insert(0, square(0.0, 0.0, 1.0));
        tree.insert(1, square(3.0, 0.0, 1.0));
        tree.insert(0, square(50.0, 0.0, 1.0));
        assert_eq!(tree.len(), 2);
        assert!(query_sorted(&tree, &square(0.0, 0.0, 0.5)).is_empty());
        assert_eq!(query_sorted(&tree, &square(50.0, 0.0, 0.5)), vec![0]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_update_inside_margin_keeps_leaf() {
        let mut tree = AabbTree::new();
        tree.insert(0, square(0.0, 0.0, 1.0).fattened(2.0));
        let changed = tree.update(0, square(1.5, 0.0, 1.0), 2.0);
        assert!(!changed);
        assert_eq!(tree.fat_aabb(0), Some(square(0.0, 0.0, 3.0)));
    }

    #[test]
    fn test_update_outside_margin_reinserts() {
        let mut tree = AabbTree::new();
        tree.insert(0, square(0.0, 0.0, 1.0).fattened(2.0));
        tree.insert(1, square(20.0, 0.0, 1.0).fattened(2.0));
        let changed = tree.update(0, square(10.0, 0.0, 1.0), 4.0);
        assert!(changed);
        assert_eq!(tree.fat_aabb(0), Some(square(10.0, 0.0, 5.0)));
        assert_eq!(tree.node_count(), 3);
        tree.validate().unwrap();
    }

    #[test]
    fn test_clear() {
        let mut tree = AabbTree::new();
        for i in 0..10 {
            tree.insert(i, square(i as f64, 0.0, 1.0));
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.node_count(), 0);
        tree.validate().unwrap();
    }

    #[test]
    fn test_visit_counts_every_node() {
        let mut tree = AabbTree::new();
        for i in 0..8 {
            tree.insert(i, square(i as f64 * 3.0, (i % 3) as f64, 1.0));
        }
        let mut leaves = 0;
        let mut internal = 0;
        tree.visit(|_, leaf| if leaf { leaves += 1 } else { internal += 1 });
        assert_eq!(leaves, 8);
        assert_eq!(internal, 7);
    }

    fn arb_box() -> impl Strategy<Value = AABB> {
        (-100.0..100.0f64, -100.0..100.0f64, 0.0..10.0f64, 0.0..10.0f64)
            .prop_map(|(x, y, hw, hh)| {
                AABB::from_center_half_extents(Vec2::new(x, y), Vec2::new(hw, hh))
            })
    }

    proptest! {
        #[test]
        fn prop_query_matches_brute_force(
            boxes in prop::collection::vec(arb_box(), 1..48),
            removed in prop::collection::vec(any::<prop::sample::Index>(), 0..16),
            probe in arb_box(),
        ) {
            let mut tree = AabbTree::new();
            for (i, b) in boxes.iter().enumerate() {
                tree.insert(i as u32, *b);
            }

            let mut gone = std::collections::HashSet::new();
            for index in removed {
                let id = index.index(boxes.len()) as u32;
                tree.remove(id);
                gone.insert(id);
            }
            prop_assert!(tree.validate().is_ok());

            let expected: Vec<u32> = boxes
                .iter()
                .enumerate()
                .filter(|(i, b)| !gone.contains(&(*i as u32)) && b.overlaps(&probe))
                .map(|(i, _)| i as u32)
                .collect();
            prop_assert_eq!(query_sorted(&tree, &probe), expected);
        }

        #[test]
        fn prop_updates_keep_structure(
            boxes in prop::collection::vec(arb_box(), 1..32),
            moves in prop::collection::vec((any::<prop::sample::Index>(), arb_box()), 0..32),
        ) {
            let mut tree = AabbTree::new();
            for (i, b) in boxes.iter().enumerate() {
                tree.insert(i as u32, b.fattened(2.0));
            }
            for (index, target) in moves {
                let id = index.index(boxes.len()) as u32;
                tree.update(id, target, 2.0);
                let fat = tree.fat_aabb(id).unwrap();
                prop_assert!(fat.contains(&target));
            }
            prop_assert!(tree.validate().is_ok());
            prop_assert_eq!(tree.len(), boxes.len());
        }
    }
}
