use glam::Vec2;

/// One sample of an input stroke.
///
/// `move_distance` is the Euclidean distance from the previous sample of
/// the same stroke, and `0.0` for the first one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorPoint {
    pub pos: Vec2,
    pub move_distance: f32,
}

impl VectorPoint {
    pub fn new(x: f32, y: f32, move_distance: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            move_distance,
        }
    }
}

/// Converts raw stroke positions into [`VectorPoint`]s.
///
/// Each point carries the distance travelled since the previous
/// position, which the controller accumulates to decide forced forks.
///
/// ### Parameters
/// - `positions` - Pointer positions in capture order.
///
/// ### Returns
/// One [`VectorPoint`] per input position, in the same order.
pub fn track(positions: &[Vec2]) -> Vec<VectorPoint> {
    let mut prev: Option<Vec2> = None;
    positions
        .iter()
        .map(|&pos| {
            let move_distance = prev.map_or(0.0, |p| p.distance(pos));
            prev = Some(pos);
            VectorPoint { pos, move_distance }
        })
        .collect()
}
