//! Core stroke-to-tree growth library.
//!
//! Main components:
//! - [`point`] — stroke samples and the stroke-to-points adapter.
//! - [`tree`] — branch nodes and the index arena holding them.
//! - [`factory`] — spawning of randomized branches and forced forks.
//! - [`grow`] — the per-tick growth pass.
//! - [`controller`] — stroke-driven construction and budget pruning.
//! - [`primitive`] — drawable output (quadratic segments, leaves).
//! - [`random`] — injectable random decision points.
//! - [`svg`] — SVG serialization of primitive streams.
//! - [`config`] — growth parameters.
//! - [`error`] — construction errors.
//! - [`types`] — shared type aliases and IDs.

pub mod config;
pub mod controller;
pub mod error;
pub mod factory;
pub mod grow;
pub mod point;
pub mod primitive;
pub mod random;
pub mod svg;
pub mod tree;
pub mod types;

pub use config::{Color, Config, MAX_LEVELS};
pub use controller::{Construction, ConstructionStats, TreeBrush, TreeController, construct};
pub use error::BrushError;
pub use point::{VectorPoint, track};
pub use primitive::{Primitive, Segment, StrokeStyle};
pub use random::{RandomSource, RngSource, ScriptedSource};
pub use tree::{BranchNode, Tree};
