use glam::Vec2;

use crate::config::Color;

/// Stroke styling attached to every emitted segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// Round line caps and joins.
    pub round: bool,
}

/// A quadratic curve from `start` to `end`, bent towards `control`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
    pub style: StrokeStyle,
}

impl Segment {
    /// Evaluates the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// Samples the curve into `steps + 1` evenly parameterized points.
    ///
    /// With `steps == 0` only the start point is returned.
    pub fn sample(&self, steps: usize) -> Vec<Vec2> {
        if steps == 0 {
            return vec![self.start];
        }
        (0..=steps)
            .map(|i| self.point_at(i as f32 / steps as f32))
            .collect()
    }

    /// SVG path data for this curve: `M x,y Q cx,cy ex,ey`.
    pub fn path_data(&self) -> String {
        format!(
            "M{},{} Q{},{} {},{}",
            self.start.x, self.start.y, self.control.x, self.control.y, self.end.x, self.end.y
        )
    }
}

/// One drawable item produced by the growth engine.
///
/// `L` is whatever the caller's leaf callback returns.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive<L> {
    Segment(Segment),
    Leaf(L),
}

impl<L> Primitive<L> {
    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            Primitive::Segment(s) => Some(s),
            Primitive::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Primitive::Leaf(l) => Some(l),
            Primitive::Segment(_) => None,
        }
    }
}
