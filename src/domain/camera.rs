// Camera view computation: follow a focus point while staying inside the map.

use super::geometry::{Range, Vector2D};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Visible area size in world units.
    pub viewport: Vector2D,
}

impl Camera {
    pub fn new(viewport: Vector2D) -> Self {
        Self { viewport }
    }

    /// Visible rectangle centered on `focus`, clamped to `bounds`.
    pub fn view(&self, focus: Vector2D, bounds: &Range) -> Range {
        let half = self.viewport * 0.5;
        let x = clamp_axis(focus.x, half.x, bounds.min.x, bounds.max.x);
        let y = clamp_axis(focus.y, half.y, bounds.min.y, bounds.max.y);
        Range::new(
            Vector2D::new(x - half.x, y - half.y),
            Vector2D::new(x + half.x, y + half.y),
        )
    }
}

fn clamp_axis(focus: f64, half: f64, min: f64, max: f64) -> f64 {
    // A viewport wider than the map just centers on it.
    if max - min <= half * 2.0 {
        return (min + max) * 0.5;
    }
    focus.clamp(min + half, max - half)
}
