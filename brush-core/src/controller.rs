//! Stroke-driven construction of a branch tree.
//!
//! [`TreeController`] advances the simulation one input point at a time:
//! 1. The current growth tip is dragged to the new point.
//! 2. The whole tree runs one growth tick ([`crate::grow::grow`]).
//! 3. A random gate, or enough accumulated stroke distance, forks the
//!    growth tip; sometimes a randomized sibling sprouts next to it.
//! 4. The last point always sprouts one more branch so the stroke ends
//!    with a living tip.
//! 5. Once more forced forks exist than the budget allows, the oldest
//!    trunk segment is pruned together with everything hanging off it.
//!
//! [`TreeBrush`] wraps the controller with input and configuration
//! checks and runs a whole stroke in one call.

use tracing::{debug, trace};

use crate::{
    config::Config,
    error::BrushError,
    factory::{fork_branch, spawn_branch},
    grow::grow,
    point::VectorPoint,
    primitive::Primitive,
    random::RandomSource,
    tree::{BranchNode, Tree},
    types::BranchId,
};

/// Fewest input points a construction accepts.
pub const MIN_POINTS: usize = 3;

/// What happened during one controller tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub splits: usize,
    pub forked: bool,
    pub sibling: bool,
    pub pruned: bool,
}

/// Counters for a whole construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConstructionStats {
    pub ticks: usize,
    pub forced_forks: usize,
    pub siblings: usize,
    pub splits: usize,
    pub prunes: usize,
    /// Nodes reachable from the root when the stroke ended.
    pub active_nodes: usize,
    /// Largest active node count seen at the end of any tick.
    pub peak_active_nodes: usize,
}

/// Output of [`TreeBrush::construct`].
#[derive(Clone, Debug)]
pub struct Construction<L> {
    pub primitives: Vec<Primitive<L>>,
    pub stats: ConstructionStats,
}

#[derive(Debug)]
pub struct TreeController {
    tree: Tree,
    current: BranchId,
    branch_count: usize,
    accumulated: f32,
    stats: ConstructionStats,
}

impl TreeController {
    /// Plants the root at the first point of a stroke.
    pub fn start(first: &VectorPoint, cfg: &Config) -> Self {
        let tree = Tree::new(first.pos, cfg.max_levels, cfg.trunk_life);
        let current = tree.root;
        Self {
            tree,
            current,
            branch_count: 0,
            accumulated: 0.0,
            stats: ConstructionStats {
                active_nodes: 1,
                peak_active_nodes: 1,
                ..ConstructionStats::default()
            },
        }
    }

    /// Advances the simulation by one input point.
    ///
    /// ### Parameters
    /// - `point` - The next stroke sample.
    /// - `is_last` - Whether this is the final sample of the stroke.
    /// - `cfg` - Growth parameters.
    /// - `rnd` - Random source for every gate and spawned branch.
    /// - `leaf_fn` - Leaf callback forwarded to the growth pass.
    /// - `out` - Output collector.
    ///
    /// ### Returns
    /// A [`TickReport`] describing forks and prunes of this tick.
    pub fn step<L>(
        &mut self,
        point: &VectorPoint,
        is_last: bool,
        cfg: &Config,
        rnd: &mut dyn RandomSource,
        leaf_fn: &mut dyn FnMut(&BranchNode) -> L,
        out: &mut Vec<Primitive<L>>,
    ) -> TickReport {
        let mut tick = TickReport::default();

        self.tree.nodes[self.current].tip = point.pos;
        self.accumulated += point.move_distance;

        let root = self.tree.root;
        tick.splits = grow(&mut self.tree, root, cfg, rnd, leaf_fn, out).splits;

        if rnd.fork_roll() > cfg.fork_threshold || self.accumulated > cfg.max_distance {
            self.accumulated = 0.0;
            let branch = fork_branch(&mut self.tree, self.current, cfg);

            if rnd.sibling_roll() > cfg.sibling_threshold {
                spawn_branch(&mut self.tree, self.current, cfg, rnd);
                tick.sibling = true;
            }

            trace!(from = self.current, branch, sibling = tick.sibling, "forced fork");
            self.current = branch;
            self.branch_count += 1;
            tick.forked = true;
        }

        if is_last {
            spawn_branch(&mut self.tree, self.current, cfg, rnd);
        }

        if self.branch_count > cfg.max_branches && self.tree.advance_root().is_some() {
            let remap = self.tree.compact();
            self.current = remap[self.current].unwrap_or(self.tree.root);
            self.branch_count -= 1;
            tick.pruned = true;
            trace!(active = self.tree.nodes.len(), "pruned oldest trunk segment");
        }

        self.record(&tick);
        tick
    }

    fn record(&mut self, tick: &TickReport) {
        let s = &mut self.stats;
        s.ticks += 1;
        s.splits += tick.splits;
        s.forced_forks += tick.forked as usize;
        s.siblings += tick.sibling as usize;
        s.prunes += tick.pruned as usize;
        // The arena is compacted on every prune, so it holds exactly the
        // reachable nodes.
        s.active_nodes = self.tree.nodes.len();
        s.peak_active_nodes = s.peak_active_nodes.max(s.active_nodes);
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The branch currently dragged along by the stroke.
    pub fn current(&self) -> BranchId {
        self.current
    }

    /// Forced forks still alive (created minus pruned).
    pub fn branch_count(&self) -> usize {
        self.branch_count
    }

    pub fn accumulated_distance(&self) -> f32 {
        self.accumulated
    }

    pub fn stats(&self) -> ConstructionStats {
        self.stats
    }
}

/// Turns whole strokes into primitive streams.
///
/// A leaf callback must be supplied with [`TreeBrush::leaf_fn`] before
/// [`TreeBrush::construct`] will run.
pub struct TreeBrush<'a, L> {
    config: Config,
    leaf_fn: Option<Box<dyn FnMut(&BranchNode) -> L + 'a>>,
}

impl<'a, L> TreeBrush<'a, L> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            leaf_fn: None,
        }
    }

    pub fn leaf_fn(mut self, f: impl FnMut(&BranchNode) -> L + 'a) -> Self {
        self.leaf_fn = Some(Box::new(f));
        self
    }

    /// Grows a tree along `points` and collects everything it draws.
    ///
    /// ### Returns
    /// - `Ok(Construction)` with primitives in emission order.
    /// - `Err(BrushError::InsufficientPoints)` for fewer than [`MIN_POINTS`].
    /// - `Err(BrushError::MissingLeafFn)` if no leaf callback was supplied.
    /// - `Err(BrushError::InvalidConfig)` if the config fails validation.
    pub fn construct(
        &mut self,
        points: &[VectorPoint],
        rnd: &mut dyn RandomSource,
    ) -> Result<Construction<L>, BrushError> {
        if points.len() < MIN_POINTS {
            return Err(BrushError::InsufficientPoints {
                got: points.len(),
                min: MIN_POINTS,
            });
        }
        let leaf_fn = self.leaf_fn.as_mut().ok_or(BrushError::MissingLeafFn)?;
        self.config.validate()?;

        let cfg = &self.config;
        debug!(points = points.len(), max_levels = cfg.max_levels, "constructing tree");

        let mut out = Vec::new();
        let mut controller = TreeController::start(&points[0], cfg);
        let last = points.len() - 1;
        for (i, point) in points.iter().enumerate().skip(1) {
            controller.step(point, i == last, cfg, rnd, &mut **leaf_fn, &mut out);
        }

        let stats = controller.stats();
        debug!(
            primitives = out.len(),
            forks = stats.forced_forks,
            prunes = stats.prunes,
            active = stats.active_nodes,
            "tree constructed"
        );

        Ok(Construction {
            primitives: out,
            stats,
        })
    }
}

/// One-shot form of [`TreeBrush::construct`].
pub fn construct<L>(
    points: &[VectorPoint],
    cfg: &Config,
    leaf_fn: impl FnMut(&BranchNode) -> L,
    rnd: &mut dyn RandomSource,
) -> Result<Construction<L>, BrushError> {
    TreeBrush::new(cfg.clone()).leaf_fn(leaf_fn).construct(points, rnd)
}
