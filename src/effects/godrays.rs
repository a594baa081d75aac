use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use crate::{
    assets::paths::join_base,
    assets::store::{AssetCache, Sprite},
    config::model::GodraysDef,
    foundation::core::{Affine, Canvas},
    foundation::math::lerp,
    render::plan::{BlendMode, SpriteOp, SpritePass},
    scatter::rng::SceneRng,
};

const MIN_TILE_STEP_PX: f64 = 1.0;

/// One drifting light beam.
#[derive(Clone, Debug)]
pub struct GodrayInstance {
    pub sprite: Arc<Sprite>,
    pub base_x: f64,
    pub scale: f64,
    pub sway_speed: f64,
    pub opacity_speed: f64,
    pub phase: f64,
}

/// Godrays overlay state for one scene.
#[derive(Clone, Debug)]
pub struct Godrays {
    pub instances: Vec<GodrayInstance>,
    pub tilt_rad: f64,
    pub tile_vertical: bool,
    pub sway_amp_px: f64,
    pub opacity_min: f64,
    pub opacity_max: f64,
    pub blend: BlendMode,
}

/// Blend mode named by `blend` (or the older `composite` key). Additive when unset or unknown.
pub(crate) fn beam_blend(def: &GodraysDef) -> BlendMode {
    let name = def
        .blend
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(def.composite.as_deref().filter(|s| !s.is_empty()));
    match name {
        None => BlendMode::Lighter,
        Some(name) => BlendMode::parse(name).unwrap_or_else(|| {
            tracing::warn!(blend = name, "unsupported godrays blend mode, using lighter");
            BlendMode::Lighter
        }),
    }
}

/// Resolve the beam sprites of an enabled godrays config, dropping unavailable ones.
pub(crate) fn load_beam_sprites(def: &GodraysDef, cache: &AssetCache, base: &str) -> Vec<Arc<Sprite>> {
    if !def.enabled {
        return Vec::new();
    }
    def.images
        .iter()
        .filter_map(|name| cache.get(&join_base(base, name)))
        .collect()
}

impl Godrays {
    /// Instantiate the beam pool. Consumes `rng` only when there is at least one sprite.
    pub(crate) fn build(
        def: &GodraysDef,
        sprites: &[Arc<Sprite>],
        canvas: Canvas,
        rng: &mut SceneRng,
    ) -> Option<Self> {
        if !def.enabled {
            return None;
        }
        let mut instances = Vec::new();
        if !sprites.is_empty() {
            for _ in 0..def.count {
                let sprite = sprites[rng.index(sprites.len())].clone();
                let base_x = rng.next_f64() * f64::from(canvas.width);
                let scale = lerp(def.scale_range[0], def.scale_range[1], rng.next_f64());
                let sway_speed = rng.range(def.sway.speed_range[0], def.sway.speed_range[1]);
                let opacity_speed =
                    rng.range(def.opacity.speed_range[0], def.opacity.speed_range[1]);
                let phase = rng.next_f64() * TAU;
                instances.push(GodrayInstance {
                    sprite,
                    base_x,
                    scale,
                    sway_speed,
                    opacity_speed,
                    phase,
                });
            }
        }
        Some(Self {
            instances,
            tilt_rad: def.tilt_deg * PI / 180.0,
            tile_vertical: def.tile_vertical,
            sway_amp_px: def.sway.amp_px,
            opacity_min: def.opacity.min,
            opacity_max: def.opacity.max,
            blend: beam_blend(def),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Beam opacity at time `t`, clamped to `[0,1]`.
    pub fn opacity_at(&self, ins: &GodrayInstance, t: f64) -> f64 {
        let wave = (t * ins.opacity_speed + ins.phase * 1.33).sin() * 0.5 + 0.5;
        (self.opacity_min + wave * (self.opacity_max - self.opacity_min)).clamp(0.0, 1.0)
    }

    /// Horizontal sway offset at time `t`.
    pub fn sway_at(&self, ins: &GodrayInstance, t: f64) -> f64 {
        (t * ins.sway_speed + ins.phase).sin() * self.sway_amp_px
    }

    /// One pass per beam at clock time `t`.
    pub fn passes(&self, canvas: Canvas, t: f64) -> Vec<SpritePass> {
        let span = f64::from(canvas.width).hypot(f64::from(canvas.height)) + 200.0;
        self.instances
            .iter()
            .map(|ins| {
                let opacity = self.opacity_at(ins, t);
                let (iw, ih) = (f64::from(ins.sprite.width()), f64::from(ins.sprite.height()));
                let (sw, sh) = (iw * ins.scale, ih * ins.scale);
                let beam = Affine::translate((ins.base_x + self.sway_at(ins, t), 0.0))
                    * Affine::rotate(self.tilt_rad);
                let stamp = |y: f64| SpriteOp {
                    sprite: ins.sprite.clone(),
                    transform: beam
                        * Affine::translate((-sw / 2.0, y))
                        * Affine::scale(ins.scale),
                    opacity,
                };

                let ops = if sh <= 0.0 || sw <= 0.0 {
                    Vec::new()
                } else if self.tile_vertical {
                    // Sub-pixel beams are stepped at whole pixels so the stamp count stays
                    // bounded by the canvas diagonal.
                    let step = sh.max(MIN_TILE_STEP_PX);
                    let total = span + step * 2.0;
                    let n = (total / step).ceil() as usize + 2;
                    let top = -total / 2.0;
                    (0..n).map(|i| stamp(top + i as f64 * step)).collect()
                } else {
                    vec![stamp(-sh / 2.0)]
                };

                SpritePass {
                    blend: self.blend,
                    shadow: None,
                    ops,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/godrays.rs"]
mod tests;
