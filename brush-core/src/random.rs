//! Random decision points of the growth simulation.
//!
//! Every stochastic choice the engine makes goes through [`RandomSource`],
//! one method per decision, so a run can be driven either by a real
//! generator ([`RngSource`]) or by fixed values ([`ScriptedSource`]).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform draw in `[0, 1)` compared against `Config::fork_threshold`.
    fn fork_roll(&mut self) -> f32;

    /// Uniform draw in `[0, 1)` compared against `Config::sibling_threshold`.
    fn sibling_roll(&mut self) -> f32;

    /// Uniform heading deflection in `[-limit, limit)`, in radians.
    fn deflection(&mut self, limit: f32) -> f32;

    /// Uniform draw in `[0, 1)` scaling a new branch's lifespan.
    fn life_roll(&mut self) -> f32;
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// A reproducible source: the same seed yields the same growth.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn fork_roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn sibling_roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn deflection(&mut self, limit: f32) -> f32 {
        if limit <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(-limit..limit)
    }

    fn life_roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// A [`RandomSource`] that answers from fixed values.
///
/// `fork` and `sibling` are returned for the two gates; when `fork_script`
/// is non-empty its values are consumed first, one per fork decision, and
/// `fork` is used once it runs out. `deflection` is a fraction in `[-1, 1]`
/// of the requested limit.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    pub fork: f32,
    pub fork_script: Vec<f32>,
    pub sibling: f32,
    pub deflection: f32,
    pub life: f32,
    fork_cursor: usize,
}

impl ScriptedSource {
    /// Every gate stays closed, no deflection, mid-range lifespans.
    pub fn never_fork() -> Self {
        Self {
            fork: 0.0,
            fork_script: Vec::new(),
            sibling: 0.0,
            deflection: 0.0,
            life: 0.5,
            fork_cursor: 0,
        }
    }

    /// Both random gates open on every decision.
    pub fn always_fork() -> Self {
        Self {
            fork: 0.99,
            sibling: 0.99,
            ..Self::never_fork()
        }
    }

    pub fn with_deflection(mut self, fraction: f32) -> Self {
        self.deflection = fraction;
        self
    }

    pub fn with_life(mut self, roll: f32) -> Self {
        self.life = roll;
        self
    }

    pub fn with_fork_script(mut self, script: Vec<f32>) -> Self {
        self.fork_script = script;
        self.fork_cursor = 0;
        self
    }
}

impl RandomSource for ScriptedSource {
    fn fork_roll(&mut self) -> f32 {
        match self.fork_script.get(self.fork_cursor) {
            Some(&v) => {
                self.fork_cursor += 1;
                v
            }
            None => self.fork,
        }
    }

    fn sibling_roll(&mut self) -> f32 {
        self.sibling
    }

    fn deflection(&mut self, limit: f32) -> f32 {
        self.deflection.clamp(-1.0, 1.0) * limit
    }

    fn life_roll(&mut self) -> f32 {
        self.life
    }
}
