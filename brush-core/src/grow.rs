//! The per-tick growth pass over a branch subtree.
//!
//! A growth pass on a node works like this:
//! 1. Every child, in spawn order, runs its own growth pass first.
//! 2. If the node still has more than one tick of life, its tip moves by
//!    its velocity and it emits a segment (or a leaf at level 0).
//! 3. At exactly one remaining tick of life, a branch strictly between
//!    the leaves and the trunk splits into two new children.
//! 4. Life drops by one; while it is not negative the whole pass repeats
//!    on the same node, so young branches catch up within a single tick.
//!
//! The pass walks the tree with an explicit frame stack, so the depth of
//! the tree never turns into host call depth.

use tracing::trace;

use crate::{
    config::Config,
    factory::spawn_branch,
    primitive::{Primitive, Segment, StrokeStyle},
    random::RandomSource,
    tree::{BranchNode, Tree},
    types::BranchId,
};

/// Counters for one growth pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthReport {
    /// Node steps executed (one per life decrement).
    pub steps: usize,
    /// Split events, each of which added two children.
    pub splits: usize,
}

struct Frame {
    id: BranchId,
    next_child: usize,
}

/// Runs one growth tick over the subtree rooted at `start`.
///
/// ### Parameters
/// - `tree` - The tree to grow; tips, lives and children are mutated.
/// - `start` - Root of the subtree to grow (usually `tree.root`).
/// - `cfg` - Level limits, stroke styling and factory parameters.
/// - `rnd` - Random source for branches spawned by split events.
/// - `leaf_fn` - Called once per active tick of every level-0 node.
/// - `out` - Output collector; primitives are appended in emission order.
///
/// ### Returns
/// A [`GrowthReport`] with the number of node steps and split events.
pub fn grow<L>(
    tree: &mut Tree,
    start: BranchId,
    cfg: &Config,
    rnd: &mut dyn RandomSource,
    leaf_fn: &mut dyn FnMut(&BranchNode) -> L,
    out: &mut Vec<Primitive<L>>,
) -> GrowthReport {
    let mut report = GrowthReport::default();
    let mut stack = vec![Frame {
        id: start,
        next_child: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let id = frame.id;

        // Children first. The list is re-read every time, so children
        // spawned by an earlier step of this node are visited on the rerun.
        if let Some(&child) = tree.nodes[id].children.get(frame.next_child) {
            frame.next_child += 1;
            stack.push(Frame {
                id: child,
                next_child: 0,
            });
            continue;
        }

        if step(tree, id, cfg, rnd, leaf_fn, out) {
            report.splits += 1;
        }
        report.steps += 1;

        if tree.nodes[id].life >= 0 {
            if let Some(frame) = stack.last_mut() {
                frame.next_child = 0;
            }
        } else {
            stack.pop();
        }
    }

    report
}

/// Advances a single node by one life tick, without touching its children.
///
/// Returns `true` if the node split.
fn step<L>(
    tree: &mut Tree,
    id: BranchId,
    cfg: &Config,
    rnd: &mut dyn RandomSource,
    leaf_fn: &mut dyn FnMut(&BranchNode) -> L,
    out: &mut Vec<Primitive<L>>,
) -> bool {
    let node = &mut tree.nodes[id];

    if node.life > 1 {
        node.tip += node.velocity;

        if node.level > 0 {
            if let Some(anchor) = node.anchor {
                out.push(Primitive::Segment(Segment {
                    start: anchor,
                    control: node.origin,
                    end: node.tip,
                    style: StrokeStyle {
                        color: cfg.branch_color,
                        width: cfg.stroke_width(node.level),
                        round: true,
                    },
                }));
            }
        } else {
            out.push(Primitive::Leaf(leaf_fn(node)));
        }
    }

    let split = node.life == 1 && node.level > 0 && node.level < cfg.max_levels;
    if split {
        let a = spawn_branch(tree, id, cfg, rnd);
        let b = spawn_branch(tree, id, cfg, rnd);
        trace!(branch = id, level = tree.nodes[id].level, a, b, "split");
    }

    tree.nodes[id].life -= 1;
    split
}
