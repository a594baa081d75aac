//! Per-bucket painting of built layers.

use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::{Affine, Vec2},
    foundation::error::DecorResult,
    render::backend::PaintBackend,
    render::plan::{BlendMode, ShadowStyle, SpriteOp, SpritePass},
    scatter::builder::BucketIndex,
    scatter::item::{Bucket, BuiltLayer, Item},
    scatter::mask::ExclusionRect,
};

/// Which items survive a clip rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipMode {
    /// Keep items whose position is inside the rectangle.
    Inside,
    /// Keep items whose position is outside the rectangle.
    Outside,
}

/// Caller view transform: `scale(sx, sy)` followed by `translate(tx, ty)` in scaled space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewTransform {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn to_affine(self) -> Affine {
        Affine::scale_non_uniform(self.sx, self.sy) * Affine::translate((self.tx, self.ty))
    }
}

/// Options for one bucket draw. Clipping applies only when both `clip` and `rect` are set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOpts {
    pub clip: Option<ClipMode>,
    pub rect: Option<ExclusionRect>,
    pub transform: Option<ViewTransform>,
}

impl DrawOpts {
    fn keeps(&self, item: &Item) -> bool {
        let (Some(mode), Some(rect)) = (self.clip, self.rect) else {
            return true;
        };
        let inside = rect.contains_inflated(item.pos.x, item.pos.y, 0.0);
        match mode {
            ClipMode::Inside => inside,
            ClipMode::Outside => !inside,
        }
    }
}

/// Shadow style for a layer, or `None` when disabled.
fn layer_shadow(layer: &BuiltLayer) -> Option<ShadowStyle> {
    let s = layer.shadow.filter(|s| s.enabled)?;
    Some(ShadowStyle {
        opacity: s.opacity.clamp(0.0, 1.0),
        blur_px: s.blur_px.max(0.0),
        offset: Vec2::new(s.offset_x, s.offset_y),
    })
}

/// Sprite-space to target transform for one item: centred on its position, rotated, stretched
/// to its draw size.
pub(crate) fn item_transform(
    view: Affine,
    item: &Item,
    sprite_w: u32,
    sprite_h: u32,
    draw: (f64, f64),
) -> Affine {
    let (dw, dh) = draw;
    let kx = if sprite_w == 0 { 0.0 } else { dw / f64::from(sprite_w) };
    let ky = if sprite_h == 0 { 0.0 } else { dh / f64::from(sprite_h) };
    view * Affine::translate(item.pos.to_vec2())
        * Affine::rotate(item.rotation_rad)
        * Affine::translate((-dw / 2.0, -dh / 2.0))
        * Affine::scale_non_uniform(kx, ky)
}

/// One pass per layer, in paint order.
pub(crate) fn layer_pass(layer: &BuiltLayer, opts: &DrawOpts) -> SpritePass {
    let view = opts.transform.unwrap_or_default().to_affine();
    let ops = layer
        .items
        .iter()
        .filter(|it| opts.keeps(it))
        .filter_map(|it| {
            let sprite = it.current_sprite()?;
            let draw = it.draw_size(sprite);
            Some(SpriteOp {
                sprite: sprite.clone(),
                transform: item_transform(view, it, sprite.width(), sprite.height(), draw),
                opacity: it.alpha.clamp(0.0, 1.0),
            })
        })
        .collect();
    SpritePass {
        blend: BlendMode::SourceOver,
        shadow: layer_shadow(layer),
        ops,
    }
}

/// Passes for every layer of `bucket`, lowest `z` first.
pub fn plan_bucket(
    layers: &[BuiltLayer],
    index: &BucketIndex,
    bucket: Bucket,
    opts: &DrawOpts,
) -> Vec<SpritePass> {
    index
        .get(bucket)
        .iter()
        .filter_map(|&i| layers.get(i))
        .map(|layer| layer_pass(layer, opts))
        .collect()
}

#[tracing::instrument(level = "trace", skip(backend, layers, index, opts))]
pub fn draw_bucket<B: PaintBackend + ?Sized>(
    backend: &mut B,
    layers: &[BuiltLayer],
    index: &BucketIndex,
    bucket: Bucket,
    opts: &DrawOpts,
) -> DecorResult<()> {
    for pass in plan_bucket(layers, index, bucket, opts) {
        backend.draw_sprites(&pass)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
