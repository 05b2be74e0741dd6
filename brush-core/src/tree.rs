use crate::types::BranchId;
use glam::Vec2;

#[derive(Debug, Clone)]
pub struct BranchNode {
    /// Non-owning back link; `None` for the root or once the parent was pruned.
    pub parent: Option<BranchId>,
    pub children: Vec<BranchId>,
    /// The parent's origin at spawn time, first control point of the curve.
    pub anchor: Option<Vec2>,
    pub origin: Vec2,
    pub tip: Vec2,
    pub level: u32,
    pub life: i32,
    pub velocity: Vec2,
    pub angle: f32,
}

#[derive(Debug)]
pub struct Tree {
    pub nodes: Vec<BranchNode>,
    pub root: BranchId,
}

impl BranchNode {
    pub fn new_root(pos: Vec2, level: u32, life: i32) -> Self {
        Self {
            parent: None,
            children: Vec::with_capacity(2),
            anchor: None,
            origin: pos,
            tip: pos,
            level,
            life,
            velocity: Vec2::ZERO,
            angle: 0.0,
        }
    }

    /// A node growing out of `parent`'s current tip.
    ///
    /// Velocity and angle start at zero; the factory fills them in for
    /// randomized branches.
    pub fn new_child(parent_id: BranchId, parent: &BranchNode, level: u32, life: i32) -> Self {
        Self {
            parent: Some(parent_id),
            children: Vec::with_capacity(2),
            anchor: Some(parent.origin),
            origin: parent.tip,
            tip: parent.tip,
            level,
            life,
            velocity: Vec2::ZERO,
            angle: 0.0,
        }
    }

    /// Heading of the segment from origin to tip, in radians.
    #[inline]
    pub fn heading(&self) -> f32 {
        let d = self.tip - self.origin;
        d.y.atan2(d.x)
    }
}

impl Tree {
    pub fn new(root_pos: Vec2, root_level: u32, root_life: i32) -> Self {
        Self {
            nodes: vec![BranchNode::new_root(root_pos, root_level, root_life)],
            root: 0,
        }
    }

    /// Appends `node` as the last child of `parent` and returns its id.
    pub fn push_child(&mut self, parent: BranchId, mut node: BranchNode) -> BranchId {
        let id: usize = self.nodes.len();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Ids reachable from the current root, parents before children and
    /// siblings in spawn order.
    pub fn reachable(&self) -> Vec<BranchId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        out
    }

    pub fn active_count(&self) -> usize {
        self.reachable().len()
    }

    /// Replaces the root with its first child, discarding the old root and
    /// every other subtree hanging from it.
    ///
    /// ### Returns
    /// The new root id, or `None` if the root has no children (the tree is
    /// left untouched in that case).
    pub fn advance_root(&mut self) -> Option<BranchId> {
        let next = *self.nodes[self.root].children.first()?;
        self.root = next;
        Some(next)
    }

    /// Rebuilds the arena from the current root, dropping unreachable nodes.
    ///
    /// Child order is preserved. Parent links that pointed at dropped nodes
    /// become `None`; anchors are kept so surviving nodes still draw the
    /// same curves.
    ///
    /// ### Returns
    /// A map from old ids to new ids (`None` for dropped nodes).
    pub fn compact(&mut self) -> Vec<Option<BranchId>> {
        let order = self.reachable();
        let mut remap = vec![None; self.nodes.len()];
        for (new_id, &old_id) in order.iter().enumerate() {
            remap[old_id] = Some(new_id);
        }

        let mut old: Vec<Option<BranchNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for &old_id in &order {
            let Some(mut node) = old[old_id].take() else {
                continue;
            };
            node.parent = node.parent.and_then(|p| remap[p]);
            for child in &mut node.children {
                // Children of a reachable node are reachable.
                *child = remap[*child].unwrap_or(*child);
            }
            nodes.push(node);
        }

        self.nodes = nodes;
        self.root = 0;
        remap
    }

    /// Number of generations between the root and `id` (root is 0).
    pub fn depth_of(&self, id: BranchId) -> usize {
        let mut depth = 0;
        let mut cur = self.nodes[id].parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.nodes[p].parent;
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(len: usize) -> Tree {
        let mut tree = Tree::new(Vec2::ZERO, 3, 20);
        let mut cur = tree.root;
        for i in 1..len {
            tree.nodes[cur].tip = Vec2::new(i as f32, 0.0);
            let node = BranchNode::new_child(cur, &tree.nodes[cur], 3, 20);
            cur = tree.push_child(cur, node);
        }
        tree
    }

    #[test]
    fn push_child_links_both_directions() {
        let mut tree = Tree::new(Vec2::new(1.0, 2.0), 5, 20);
        tree.nodes[0].tip = Vec2::new(4.0, 6.0);

        let node = BranchNode::new_child(0, &tree.nodes[0], 4, 5);
        let id = tree.push_child(0, node);

        assert_eq!(id, 1);
        assert_eq!(tree.nodes[0].children, vec![1]);
        let child = &tree.nodes[1];
        assert_eq!(child.parent, Some(0));
        assert_eq!(child.origin, Vec2::new(4.0, 6.0));
        assert_eq!(child.tip, child.origin);
        assert_eq!(child.anchor, Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn heading_points_from_origin_to_tip() {
        let mut node = BranchNode::new_root(Vec2::ZERO, 1, 1);
        node.tip = Vec2::new(0.0, 2.0);
        assert!((node.heading() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn advance_root_moves_to_first_child() {
        let mut tree = chain(3);
        assert_eq!(tree.advance_root(), Some(1));
        assert_eq!(tree.root, 1);
        assert_eq!(tree.active_count(), 2);
    }

    #[test]
    fn advance_root_without_children_is_a_no_op() {
        let mut tree = Tree::new(Vec2::ZERO, 1, 1);
        assert_eq!(tree.advance_root(), None);
        assert_eq!(tree.root, 0);
    }

    #[test]
    fn compact_drops_unreachable_nodes_and_remaps_links() {
        let mut tree = chain(4);
        // Side branch off the old root, which will be discarded.
        let side = BranchNode::new_child(0, &tree.nodes[0], 2, 5);
        tree.push_child(0, side);
        assert_eq!(tree.nodes.len(), 5);

        tree.advance_root();
        let remap = tree.compact();

        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.root, 0);
        assert_eq!(remap[0], None);
        assert_eq!(remap[4], None);
        assert_eq!(remap[1], Some(0));
        assert_eq!(remap[3], Some(2));

        // The new root lost its parent but kept its curve anchor.
        assert_eq!(tree.nodes[0].parent, None);
        assert_eq!(tree.nodes[0].anchor, Some(Vec2::ZERO));
        assert_eq!(tree.nodes[0].children, vec![1]);
        assert_eq!(tree.nodes[1].parent, Some(0));
        assert_eq!(tree.nodes[2].parent, Some(1));
    }

    #[test]
    fn compact_moves_surviving_nodes() {
        let mut tree = chain(4);
        let children_buf = tree.nodes[2].children.as_ptr();

        tree.advance_root();
        tree.compact();

        assert_eq!(tree.nodes[1].children, vec![2]);
        assert_eq!(tree.nodes[1].children.as_ptr(), children_buf);
    }

    #[test]
    fn depth_of_counts_generations() {
        let tree = chain(4);
        assert_eq!(tree.depth_of(0), 0);
        assert_eq!(tree.depth_of(3), 3);
    }
}
