use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in scene pixels marking geometry decorations must keep clear of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExclusionRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ExclusionRect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive containment test against the rectangle grown by `radius` on every side.
    pub fn contains_inflated(&self, x: f64, y: f64, radius: f64) -> bool {
        x >= self.x - radius
            && x <= self.x + self.w + radius
            && y >= self.y - radius
            && y <= self.y + self.h + radius
    }
}

/// True when `(x, y)` falls inside any rectangle inflated by `radius`.
pub fn is_blocked(x: f64, y: f64, rects: &[ExclusionRect], radius: f64) -> bool {
    rects.iter().any(|r| r.contains_inflated(x, y, radius))
}

#[cfg(test)]
#[path = "../../tests/unit/scatter/mask.rs"]
mod tests;
