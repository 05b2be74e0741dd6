//! Spawning of new branches.
//!
//! Two kinds of branch grow out of an existing node:
//! - [`spawn_branch`] — a randomized branch one level below its parent,
//!   continuing the parent's heading with a bounded deflection.
//! - [`fork_branch`] — a forced fork at the parent's own level that does
//!   not move by itself; the controller drags its tip along the stroke.

use crate::{
    config::Config,
    random::RandomSource,
    tree::{BranchNode, Tree},
    types::BranchId,
};
use glam::Vec2;

/// Life given to every branch that ends up one level above the leaves.
pub const PRE_LEAF_LIFE: i32 = 5;

/// Lifespan of a freshly spawned branch at `level`.
///
/// Branches right above the leaves live a fixed [`PRE_LEAF_LIFE`] ticks;
/// the others get `round(roll * level * 2) + 2`, so branches closer to the
/// trunk draw from a wider range.
pub fn branch_life(level: u32, roll: f32) -> i32 {
    if level == 1 {
        PRE_LEAF_LIFE
    } else {
        (roll * (level as f32) * 2.0).round() as i32 + 2
    }
}

/// Builds a randomized child of `parent` without attaching it.
///
/// ### Parameters
/// - `tree` - Tree holding the parent; only read access is required.
/// - `parent` - Node the new branch grows out of.
/// - `cfg` - Provides the branch speed and the heading jitter.
/// - `rnd` - Source of the deflection and lifespan draws.
///
/// ### Returns
/// A detached [`BranchNode`] whose origin and tip equal the parent's tip.
pub fn new_branch(
    tree: &Tree,
    parent: BranchId,
    cfg: &Config,
    rnd: &mut dyn RandomSource,
) -> BranchNode {
    let p = &tree.nodes[parent];
    let level = p.level.saturating_sub(1);

    let angle = p.heading() + rnd.deflection(cfg.angle_jitter);
    // Pre-leaf lifespans are fixed, so no roll is drawn for them.
    let life = if level == 1 {
        PRE_LEAF_LIFE
    } else {
        branch_life(level, rnd.life_roll())
    };

    let mut node = BranchNode::new_child(parent, p, level, life);
    node.angle = angle;
    node.velocity = Vec2::new(angle.cos(), angle.sin()) * cfg.speed;
    node
}

/// Spawns a randomized branch and appends it to `parent`'s children.
///
/// ### Returns
/// The id of the new branch.
pub fn spawn_branch(
    tree: &mut Tree,
    parent: BranchId,
    cfg: &Config,
    rnd: &mut dyn RandomSource,
) -> BranchId {
    let node = new_branch(tree, parent, cfg, rnd);
    tree.push_child(parent, node)
}

/// Appends a forced fork to `parent`: same level, `cfg.trunk_life` life,
/// zero velocity.
///
/// ### Returns
/// The id of the new branch.
pub fn fork_branch(tree: &mut Tree, parent: BranchId, cfg: &Config) -> BranchId {
    let p = &tree.nodes[parent];
    let node = BranchNode::new_child(parent, p, p.level, cfg.trunk_life);
    tree.push_child(parent, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RandomSource, RngSource, ScriptedSource};

    #[derive(Default)]
    struct CountingSource {
        draws: usize,
    }

    impl RandomSource for CountingSource {
        fn fork_roll(&mut self) -> f32 {
            self.draws += 1;
            0.0
        }

        fn sibling_roll(&mut self) -> f32 {
            self.draws += 1;
            0.0
        }

        fn deflection(&mut self, _limit: f32) -> f32 {
            self.draws += 1;
            0.0
        }

        fn life_roll(&mut self) -> f32 {
            self.draws += 1;
            0.5
        }
    }

    fn tree_heading_east() -> Tree {
        let mut tree = Tree::new(Vec2::new(0.0, 0.0), 5, 20);
        tree.nodes[0].tip = Vec2::new(10.0, 0.0);
        tree
    }

    #[test]
    fn spawned_branch_continues_parent_heading() {
        let mut tree = tree_heading_east();
        let cfg = Config::default();
        let mut rnd = ScriptedSource::never_fork();

        let id = spawn_branch(&mut tree, 0, &cfg, &mut rnd);
        let b = &tree.nodes[id];

        assert_eq!(tree.nodes[0].children, vec![id]);
        assert_eq!(b.level, 4);
        assert_eq!(b.origin, Vec2::new(10.0, 0.0));
        assert_eq!(b.tip, b.origin);
        assert_eq!(b.angle, 0.0);
        assert_eq!(b.velocity, Vec2::new(8.0, 0.0));
        // round(0.5 * 4 * 2) + 2
        assert_eq!(b.life, 6);
    }

    #[test]
    fn high_life_roll_gives_longest_lifespan() {
        let mut tree = tree_heading_east();
        let cfg = Config::default();
        let mut rnd = ScriptedSource::never_fork().with_life(0.99);

        let id = spawn_branch(&mut tree, 0, &cfg, &mut rnd);
        assert_eq!(tree.nodes[id].life, 10);
    }

    #[test]
    fn deflection_rotates_the_velocity() {
        let mut tree = tree_heading_east();
        let cfg = Config::default();
        let mut rnd = ScriptedSource::never_fork().with_deflection(1.0);

        let id = spawn_branch(&mut tree, 0, &cfg, &mut rnd);
        let b = &tree.nodes[id];

        assert!((b.angle - 0.7).abs() < 1e-6);
        assert!((b.velocity.length() - cfg.speed).abs() < 1e-4);
        assert!(b.velocity.y > 0.0);
    }

    #[test]
    fn random_angles_stay_within_jitter() {
        let mut tree = tree_heading_east();
        let cfg = Config::default();
        let mut rnd = RngSource::seeded(5);

        for _ in 0..200 {
            let id = spawn_branch(&mut tree, 0, &cfg, &mut rnd);
            let b = &tree.nodes[id];
            assert!(b.angle.abs() <= cfg.angle_jitter);
            assert!(b.life >= 2 && b.life <= 2 + 8);
        }
    }

    #[test]
    fn pre_leaf_spawn_draws_no_life_roll() {
        let cfg = Config::default();

        let mut tree = Tree::new(Vec2::ZERO, 2, 20);
        let mut rnd = CountingSource::default();
        let id = spawn_branch(&mut tree, 0, &cfg, &mut rnd);
        assert_eq!(tree.nodes[id].level, 1);
        assert_eq!(tree.nodes[id].life, PRE_LEAF_LIFE);
        assert_eq!(rnd.draws, 1);

        let mut tree = Tree::new(Vec2::ZERO, 3, 20);
        let mut rnd = CountingSource::default();
        let id = spawn_branch(&mut tree, 0, &cfg, &mut rnd);
        assert_eq!(tree.nodes[id].level, 2);
        assert_eq!(rnd.draws, 2);
    }

    #[test]
    fn branch_life_rules() {
        assert_eq!(branch_life(1, 0.99), PRE_LEAF_LIFE);
        assert_eq!(branch_life(0, 0.7), 2);
        assert_eq!(branch_life(4, 0.0), 2);
        assert_eq!(branch_life(4, 0.99), 10);
        assert_eq!(branch_life(3, 0.5), 5);
    }

    #[test]
    fn fork_keeps_parent_level_and_does_not_move() {
        let mut tree = tree_heading_east();
        let cfg = Config::default();

        let id = fork_branch(&mut tree, 0, &cfg);
        let b = &tree.nodes[id];

        assert_eq!(b.level, tree.nodes[0].level);
        assert_eq!(b.life, cfg.trunk_life);
        assert_eq!(b.velocity, Vec2::ZERO);
        assert_eq!(b.origin, Vec2::new(10.0, 0.0));
        assert_eq!(b.anchor, Some(Vec2::ZERO));
    }
}
