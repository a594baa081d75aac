use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    assets::store::{Sprite, SpriteId},
    foundation::core::{Affine, Canvas, Rgba8},
    foundation::error::{DecorError, DecorResult},
    render::backend::{FrameRGBA, PaintBackend},
    render::blur::{blur_rgba8_premul, radius_for_sigma, sigma_for_blur_px},
    render::composite::{self, PremulRgba8},
    render::plan::{BlendMode, SpritePass, VignettePass},
};

/// Software paint target backed by `vello_cpu`.
///
/// Each [`SpritePass`] is rasterized into a scratch pixmap and then composited onto the target
/// with the pass blend mode. Converted sprite paints are cached by [`SpriteId`].
pub struct CpuSurface {
    width: u16,
    height: u16,
    target: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    ctx: Option<vello_cpu::RenderContext>,
    image_cache: HashMap<SpriteId, vello_cpu::Image>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cached_images", &self.image_cache.len())
            .finish()
    }
}

impl CpuSurface {
    /// Transparent surface of the given size. Both sides must be in `1..=65535`.
    pub fn new(width: u32, height: u32) -> DecorResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| DecorError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| DecorError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(DecorError::render("surface must be at least 1x1"));
        }
        Ok(Self {
            width: w,
            height: h,
            target: vello_cpu::Pixmap::new(w, h),
            scratch: vello_cpu::Pixmap::new(w, h),
            ctx: None,
            image_cache: HashMap::new(),
        })
    }

    /// Fill the whole target with one color.
    pub fn clear(&mut self, color: Rgba8) {
        clear_pixmap(&mut self.target, color.to_premul());
    }

    /// Target pixels, premultiplied RGBA8, row-major.
    pub fn data_premul(&self) -> &[u8] {
        self.target.data_as_u8_slice()
    }

    pub fn data_premul_mut(&mut self) -> &mut [u8] {
        self.target.data_as_u8_slice_mut()
    }

    /// Premultiplied copy of the target.
    pub fn readback(&self) -> FrameRGBA {
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.target.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> DecorResult<R>,
    ) -> DecorResult<R> {
        let (width, height) = (self.width, self.height);
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn image_paint_for(&mut self, sprite: &Sprite) -> DecorResult<vello_cpu::Image> {
        if let Some(paint) = self.image_cache.get(&sprite.id()) {
            return Ok(paint.clone());
        }
        let pixmap =
            sprite_premul_bytes_to_pixmap(sprite.rgba8_premul(), sprite.width(), sprite.height())?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(sprite.id(), paint.clone());
        Ok(paint)
    }

    /// Rasterize every op of `pass` into the scratch pixmap with source-over.
    fn rasterize_pass(&mut self, pass: &SpritePass) -> DecorResult<()> {
        clear_pixmap(&mut self.scratch, [0, 0, 0, 0]);
        self.with_ctx_mut(|this, ctx| {
            for op in &pass.ops {
                let opacity = op.opacity.clamp(0.0, 1.0) as f32;
                if opacity <= 0.0 || op.sprite.width() == 0 || op.sprite.height() == 0 {
                    continue;
                }
                let paint = this.image_paint_for(&op.sprite)?;
                ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
                ctx.set_transform(affine_to_cpu(op.transform));
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(paint);
                if opacity < 1.0 {
                    ctx.push_opacity_layer(opacity);
                }
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(op.sprite.width()),
                    f64::from(op.sprite.height()),
                ));
                if opacity < 1.0 {
                    ctx.pop_layer();
                }
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut this.scratch);
            Ok(())
        })
    }
}

impl PaintBackend for CpuSurface {
    fn size(&self) -> Canvas {
        Canvas::new(u32::from(self.width), u32::from(self.height))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(ops = pass.ops.len()))]
    fn draw_sprites(&mut self, pass: &SpritePass) -> DecorResult<()> {
        if pass.ops.is_empty() {
            return Ok(());
        }
        self.rasterize_pass(pass)?;
        let (w, h) = (u32::from(self.width), u32::from(self.height));

        if let Some(shadow) = pass.shadow.filter(|s| s.opacity > 0.0) {
            let silhouette = composite::shadow_silhouette(
                self.scratch.data_as_u8_slice(),
                w,
                h,
                shadow.offset.x.round() as i32,
                shadow.offset.y.round() as i32,
                shadow.opacity.clamp(0.0, 1.0) as f32,
            )?;
            let sigma = sigma_for_blur_px(shadow.blur_px);
            let blurred = blur_rgba8_premul(&silhouette, w, h, radius_for_sigma(sigma), sigma)?;
            composite::blend_in_place(
                self.target.data_as_u8_slice_mut(),
                &blurred,
                BlendMode::SourceOver,
                1.0,
            )?;
        }

        composite::blend_in_place(
            self.target.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
            pass.blend,
            1.0,
        )
    }

    fn draw_vignette(&mut self, pass: &VignettePass) -> DecorResult<()> {
        if pass.opacity <= 0.0 {
            return Ok(());
        }
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let row = usize::from(self.width);
        for (i, px) in self
            .target
            .data_as_u8_slice_mut()
            .chunks_exact_mut(4)
            .enumerate()
        {
            let x = (i % row) as f64 + 0.5;
            let y = (i / row) as f64 + 0.5;
            let alpha = pass.alpha_at(x, y, w, h);
            if alpha <= 0.0 {
                continue;
            }
            let src: PremulRgba8 = pass.color.with_opacity(alpha).to_premul();
            let out = composite::over([px[0], px[1], px[2], px[3]], src, 1.0);
            px.copy_from_slice(&out);
        }
        Ok(())
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn sprite_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> DecorResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| DecorError::render("sprite width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| DecorError::render("sprite height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(DecorError::render("sprite byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
