use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use rayon::prelude::*;

use crate::assets::paths::layer_asset_paths;
use crate::assets::store::{AssetCache, Sprite};
use crate::config::model::{AnimateDef, LayerDef, MaskKind, SizePolicy};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::math::lerp;
use crate::scatter::item::{Bucket, BuiltLayer, FrameCycle, Item, Motion, Wobble};
use crate::scatter::mask::{ExclusionRect, is_blocked};
use crate::scatter::rng::SceneRng;

/// Grid tile size assumed when the scene source does not report one.
pub const DEFAULT_TILE_SIZE: f64 = 96.0;

const MAX_PREALLOCATED_ITEMS: usize = 4096;

/// Scene geometry a layer is placed against.
#[derive(Clone, Copy, Debug)]
pub struct Placement<'a> {
    pub canvas: Canvas,
    pub tile_size: f64,
    pub track_mask: &'a [ExclusionRect],
}

/// Items a layer should try to place on a canvas.
pub fn target_count(canvas: Canvas, density_per_100k_px: f64) -> usize {
    let density = density_per_100k_px.max(0.0);
    ((canvas.area() / 100_000.0) * density).floor() as usize
}

/// Attempt budget before a layer gives up on reaching its target.
pub fn max_attempts(target: usize) -> usize {
    target.saturating_mul(8).max(50)
}

/// Up-front item storage for a layer; the target comes from config and is not trusted.
fn item_capacity(target: usize) -> usize {
    target.min(MAX_PREALLOCATED_ITEMS)
}

/// Load every sprite of every layer, in parallel, preserving configuration order.
///
/// Missing or undecodable assets are dropped.
pub(crate) fn load_layer_sprites(
    layers: &[LayerDef],
    cache: &AssetCache,
    base: &str,
    theme_folder: &str,
) -> Vec<Vec<Arc<Sprite>>> {
    layers
        .par_iter()
        .map(|def| {
            layer_asset_paths(def, base, theme_folder)
                .par_iter()
                .filter_map(|p| cache.get(p))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Candidate visuals for a layer: one flip-book for `frames` layers, otherwise one per sprite.
fn choices(def: &LayerDef, sprites: &[Arc<Sprite>]) -> Vec<Arc<[Arc<Sprite>]>> {
    if sprites.is_empty() {
        return Vec::new();
    }
    match def.animate {
        Some(AnimateDef::Frames(_)) => vec![sprites.to_vec().into()],
        _ => sprites.iter().map(|s| Arc::from(vec![s.clone()])).collect(),
    }
}

/// Scale `(iw, ih)` so its longest side equals `max_px`.
pub(crate) fn fit_by_max(iw: u32, ih: u32, max_px: f64) -> (f64, f64) {
    let iw = if iw == 0 { 64.0 } else { f64::from(iw) };
    let ih = if ih == 0 { 64.0 } else { f64::from(ih) };
    let k = max_px / iw.max(ih);
    (iw * k, ih * k)
}

fn draw_size(size: SizePolicy, sprite: &Sprite, tile_size: f64, scale: f64) -> (f64, f64) {
    let max_px = match size {
        SizePolicy::Tile { tile_factor } => (tile_size * tile_factor * scale).max(4.0),
        SizePolicy::Pixel { max_px } => (max_px * scale).max(4.0),
        SizePolicy::FitTile => tile_size * scale,
    };
    fit_by_max(sprite.width(), sprite.height(), max_px)
}

/// Scatter one layer's items. Draws from `rng` in a fixed order, so the result is a pure
/// function of the configuration, the sprites and the stream position.
#[tracing::instrument(skip_all, fields(layer = %def.id))]
pub(crate) fn build_layer(
    def: &LayerDef,
    sprites: &[Arc<Sprite>],
    placement: Placement<'_>,
    rng: &mut SceneRng,
) -> BuiltLayer {
    let bucket = Bucket::parse(&def.draw_where);
    if bucket.is_none() {
        tracing::warn!(draw_where = %def.draw_where, "unknown decor bucket, layer will not be drawn");
    }

    let canvas = placement.canvas;
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let target = target_count(canvas, def.density_per_100k_px);
    let budget = max_attempts(target);
    let choices = choices(def, sprites);
    let pixel_scale = if def.pixel_scale == 0.0 {
        1.0
    } else {
        def.pixel_scale
    };
    let avoid_tracks = def.distribution.mask == MaskKind::AvoidTracks;
    let radius = def.distribution.avoid_tracks_radius_px;

    let mut items = Vec::with_capacity(item_capacity(target));
    let mut attempts = 0usize;
    while items.len() < target && attempts < budget {
        attempts += 1;

        let x_norm = rng.next_f64();
        let y_norm = rng.next_f64();
        let (x, y) = (x_norm * w, y_norm * h);

        let weight = def.distribution.bias.weight(x_norm, y_norm);
        if rng.next_f64() > weight {
            continue;
        }
        if avoid_tracks && is_blocked(x, y, placement.track_mask, radius) {
            continue;
        }
        if choices.is_empty() {
            continue;
        }
        let frames = choices[rng.index(choices.len())].clone();
        let Some(first) = frames.first().cloned() else {
            continue;
        };

        let rotation_rad =
            lerp(def.rotation_range[0], def.rotation_range[1], rng.next_f64()) * PI / 180.0;
        let scale = lerp(def.scale_range[0], def.scale_range[1], rng.next_f64()) * pixel_scale;
        let alpha = match def.opacity_range {
            Some([lo, hi]) => lerp(lo, hi, rng.next_f64()),
            None => 1.0,
        };
        let (draw_w, draw_h) = draw_size(def.size, &first, placement.tile_size, scale);

        let motion = match def.animate {
            Some(AnimateDef::Wobble(wb)) => Motion::Wobble(Wobble {
                amp_x: rng.range(wb.amp_px_range[0], wb.amp_px_range[1]),
                amp_y: rng.range(wb.amp_px_range[0], wb.amp_px_range[1]),
                speed: rng.range(wb.speed_range[0], wb.speed_range[1]),
                phase: rng.next_f64() * TAU,
            }),
            Some(AnimateDef::Frames(fr)) => {
                let fps = rng.range(fr.fps_range[0], fr.fps_range[1]);
                let index = if fr.start_frame_random {
                    rng.index(frames.len())
                } else {
                    0
                };
                Motion::Frames(FrameCycle {
                    frames,
                    fps,
                    timer: 0.0,
                    index,
                })
            }
            Some(AnimateDef::Still) | None => Motion::Still,
        };

        let pos = Point::new(x, y);
        items.push(Item {
            pos,
            base: pos,
            rotation_rad,
            scale,
            alpha,
            sprite: first,
            motion,
            draw_w,
            draw_h,
        });
    }

    if items.len() < target {
        tracing::debug!(
            placed = items.len(),
            target,
            attempts,
            "decor layer under-filled"
        );
    }

    BuiltLayer {
        id: def.id.clone(),
        z: def.z,
        bucket,
        animate: def.animate,
        shadow: def.shadow,
        items,
    }
}

/// Layer indices per bucket, each sorted by ascending `z` with ties in configuration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BucketIndex {
    below_tracks: Vec<usize>,
    above_tracks: Vec<usize>,
    above_train: Vec<usize>,
}

impl BucketIndex {
    pub fn new(layers: &[BuiltLayer]) -> Self {
        let mut out = Self::default();
        for (i, layer) in layers.iter().enumerate() {
            if let Some(b) = layer.bucket {
                out.slot_mut(b).push(i);
            }
        }
        for b in Bucket::ALL {
            out.slot_mut(b)
                .sort_by(|&a, &c| layers[a].z.total_cmp(&layers[c].z));
        }
        out
    }

    pub fn get(&self, bucket: Bucket) -> &[usize] {
        match bucket {
            Bucket::BelowTracks => &self.below_tracks,
            Bucket::AboveTracks => &self.above_tracks,
            Bucket::AboveTrain => &self.above_train,
        }
    }

    fn slot_mut(&mut self, bucket: Bucket) -> &mut Vec<usize> {
        match bucket {
            Bucket::BelowTracks => &mut self.below_tracks,
            Bucket::AboveTracks => &mut self.above_tracks,
            Bucket::AboveTrain => &mut self.above_train,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scatter/builder.rs"]
mod tests;
