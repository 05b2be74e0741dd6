use serde::{Deserialize, Serialize};

use crate::error::BrushError;

/// Largest accepted `max_levels`; every sibling subtree holds up to
/// `2^max_levels` nodes.
pub const MAX_LEVELS: u32 = 8;

/// An sRGB color with alpha, used for branch strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Formats the color as a `#rrggbb` hex string (alpha is dropped).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Growth parameters for one construction.
///
/// The leaf callback is not part of this struct; it is handed to
/// [`crate::controller::TreeBrush`] separately.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Branch-depth generations. The trunk carries this level.
    pub max_levels: u32,
    /// Accumulated stroke distance that forces a fork of the growth tip.
    pub max_distance: f32,
    pub branch_color: Color,
    /// Stroke width multiplier per level.
    pub branch_size: f32,
    /// Tip displacement per tick for factory-spawned branches.
    pub speed: f32,
    /// Half-width, in radians, of the random heading deflection.
    pub angle_jitter: f32,
    /// A forced fork happens when a uniform draw exceeds this value.
    pub fork_threshold: f32,
    /// A forced fork also spawns a sibling when a draw exceeds this value.
    pub sibling_threshold: f32,
    /// Forced forks kept alive before the oldest trunk segment is pruned.
    pub max_branches: usize,
    /// Starting life of the root and of forced forks.
    pub trunk_life: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_levels: 5,
            max_distance: 20.0,
            branch_color: Color::BLACK,
            branch_size: 3.0,
            speed: 8.0,
            angle_jitter: 0.7,
            fork_threshold: 0.8,
            sibling_threshold: 0.8,
            max_branches: 200,
            trunk_life: 20,
        }
    }
}

impl Config {
    /// Checks that the parameters describe a usable growth setup.
    ///
    /// ### Returns
    /// - `Ok(())` if every field is in range.
    /// - `Err(BrushError::InvalidConfig)` naming the first bad field.
    pub fn validate(&self) -> Result<(), BrushError> {
        if self.max_levels == 0 {
            return Err(BrushError::InvalidConfig("max_levels must be at least 1"));
        }
        if self.max_levels > MAX_LEVELS {
            return Err(BrushError::InvalidConfig("max_levels must be at most 8"));
        }
        if !(self.max_distance.is_finite() && self.max_distance >= 0.0) {
            return Err(BrushError::InvalidConfig(
                "max_distance must be finite and non-negative",
            ));
        }
        if !(self.branch_size.is_finite() && self.branch_size >= 0.0) {
            return Err(BrushError::InvalidConfig(
                "branch_size must be finite and non-negative",
            ));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(BrushError::InvalidConfig(
                "speed must be finite and non-negative",
            ));
        }
        if !(self.angle_jitter.is_finite() && self.angle_jitter >= 0.0) {
            return Err(BrushError::InvalidConfig(
                "angle_jitter must be finite and non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.fork_threshold) {
            return Err(BrushError::InvalidConfig("fork_threshold must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.sibling_threshold) {
            return Err(BrushError::InvalidConfig(
                "sibling_threshold must be within [0, 1]",
            ));
        }
        if self.trunk_life < 1 {
            return Err(BrushError::InvalidConfig("trunk_life must be at least 1"));
        }
        Ok(())
    }

    /// Stroke width for a segment emitted by a branch at `level`.
    #[inline]
    pub fn stroke_width(&self, level: u32) -> f32 {
        level as f32 * self.branch_size - 1.0
    }
}
