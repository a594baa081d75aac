use std::sync::Arc;

use crate::assets::store::Sprite;
use crate::config::model::{AnimateDef, ShadowDef};
use crate::foundation::core::Point;

/// Named draw pass, ordered relative to the game board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    BelowTracks,
    AboveTracks,
    AboveTrain,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::BelowTracks, Bucket::AboveTracks, Bucket::AboveTrain];

    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::BelowTracks => "belowTracks",
            Bucket::AboveTracks => "aboveTracks",
            Bucket::AboveTrain => "aboveTrain",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == name)
    }
}

impl std::str::FromStr for Bucket {
    type Err = crate::foundation::error::DecorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            crate::foundation::error::DecorError::validation(format!("unknown bucket '{s}'"))
        })
    }
}

/// Continuous positional sway around an item's base position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wobble {
    pub amp_x: f64,
    pub amp_y: f64,
    pub speed: f64,
    pub phase: f64,
}

impl Wobble {
    /// Position at clock time `t` seconds. A pure function of `t`, so pauses and frame-rate
    /// changes never accumulate drift.
    pub fn position_at(&self, base: Point, t: f64) -> Point {
        Point::new(
            base.x + (t * self.speed + self.phase).sin() * self.amp_x,
            base.y + (t * self.speed * 0.9 + self.phase * 1.37).cos() * self.amp_y,
        )
    }
}

const FRAME_EPSILON_SECS: f64 = 1e-9;

/// Flip-book animation over a shared frame list.
#[derive(Clone, Debug)]
pub struct FrameCycle {
    pub frames: Arc<[Arc<Sprite>]>,
    pub fps: f64,
    /// Seconds accumulated towards the next frame.
    pub timer: f64,
    pub index: usize,
}

impl FrameCycle {
    /// Accumulate `dt` seconds, stepping once per whole frame period.
    pub fn advance(&mut self, dt: f64) {
        if self.frames.is_empty() {
            return;
        }
        self.timer += dt;
        let fps = if self.fps > 0.0 && self.fps.is_finite() {
            self.fps
        } else {
            1.0
        };
        let step = 1.0 / fps;
        // Periods such as 1/10 s are inexact in binary; absorb the rounding residue.
        while self.timer + FRAME_EPSILON_SECS >= step {
            self.timer = (self.timer - step).max(0.0);
            self.index = (self.index + 1) % self.frames.len();
        }
    }

    pub fn current(&self) -> Option<&Arc<Sprite>> {
        self.frames.get(self.index)
    }
}

/// Per-item animation state.
#[derive(Clone, Debug, Default)]
pub enum Motion {
    #[default]
    Still,
    Wobble(Wobble),
    Frames(FrameCycle),
}

/// One placed decoration.
#[derive(Clone, Debug)]
pub struct Item {
    /// Current position; moves with wobble.
    pub pos: Point,
    /// Placement position, never modified after build.
    pub base: Point,
    pub rotation_rad: f64,
    pub scale: f64,
    pub alpha: f64,
    pub sprite: Arc<Sprite>,
    pub motion: Motion,
    pub draw_w: f64,
    pub draw_h: f64,
}

impl Item {
    /// Sprite to paint this frame.
    pub fn current_sprite(&self) -> Option<&Arc<Sprite>> {
        match &self.motion {
            Motion::Frames(cycle) => cycle.current(),
            _ => Some(&self.sprite),
        }
    }

    /// Draw size, falling back to the natural sprite size times scale when none was cached.
    pub fn draw_size(&self, sprite: &Sprite) -> (f64, f64) {
        let w = if self.draw_w > 0.0 {
            self.draw_w
        } else {
            f64::from(sprite.width()) * self.scale
        };
        let h = if self.draw_h > 0.0 {
            self.draw_h
        } else {
            f64::from(sprite.height()) * self.scale
        };
        (w, h)
    }
}

/// A layer after placement.
#[derive(Clone, Debug)]
pub struct BuiltLayer {
    pub id: String,
    pub z: f64,
    /// `None` when the configured bucket name is unknown; such layers are never drawn.
    pub bucket: Option<Bucket>,
    pub animate: Option<AnimateDef>,
    pub shadow: Option<ShadowDef>,
    pub items: Vec<Item>,
}

impl BuiltLayer {
    /// Whether this layer needs per-tick updates.
    pub fn is_animated(&self) -> bool {
        matches!(
            self.animate,
            Some(AnimateDef::Wobble(_) | AnimateDef::Frames(_))
        ) && !self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scatter/item.rs"]
mod tests;
