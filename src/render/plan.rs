use std::sync::Arc;

use crate::assets::store::Sprite;
use crate::foundation::core::{Affine, Rgba8, Vec2};

/// How a pass is combined with what is already on the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Regular alpha compositing.
    #[default]
    SourceOver,
    /// Additive, saturating.
    Lighter,
    Screen,
    Multiply,
}

impl BlendMode {
    /// Parse a canvas-style composite operation name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "source-over" => Some(Self::SourceOver),
            "lighter" => Some(Self::Lighter),
            "screen" => Some(Self::Screen),
            "multiply" => Some(Self::Multiply),
            _ => None,
        }
    }
}

/// Soft drop shadow painted beneath a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowStyle {
    /// Shadow alpha in `[0,1]`; the shadow color is black.
    pub opacity: f64,
    /// Blur radius in target pixels.
    pub blur_px: f64,
    /// Offset in target pixels, unaffected by the pass transforms.
    pub offset: Vec2,
}

/// One sprite stamp.
#[derive(Clone, Debug)]
pub struct SpriteOp {
    pub sprite: Arc<Sprite>,
    /// Maps sprite pixel space (`0..width`, `0..height`) to target pixels.
    pub transform: Affine,
    /// Clamped to `[0,1]`.
    pub opacity: f64,
}

/// A group of stamps composited onto the target as one unit.
#[derive(Clone, Debug, Default)]
pub struct SpritePass {
    pub blend: BlendMode,
    pub shadow: Option<ShadowStyle>,
    pub ops: Vec<SpriteOp>,
}

/// Elliptical radial darkening centred on the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VignettePass {
    /// Fully transparent inside `inner * width / 2`.
    pub inner: f64,
    /// Reaches `color` at `opacity` from `outer * width / 2`.
    pub outer: f64,
    pub opacity: f64,
    pub color: Rgba8,
}

impl VignettePass {
    /// Gradient alpha at target point `(x, y)` on a `width x height` target.
    ///
    /// Vertical distances are stretched by `width / height` so the gradient follows the target's
    /// aspect ratio. Linear between the inner and outer radii.
    pub fn alpha_at(&self, x: f64, y: f64, width: f64, height: f64) -> f64 {
        let opacity = self.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 || width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        let dx = x - width / 2.0;
        let dy = (y - height / 2.0) * (width / height);
        let d = dx.hypot(dy);
        let r_in = self.inner * width / 2.0;
        let r_out = self.outer * width / 2.0;
        let t = if r_out > r_in {
            ((d - r_in) / (r_out - r_in)).clamp(0.0, 1.0)
        } else if d >= r_out {
            1.0
        } else {
            0.0
        };
        t * opacity
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
