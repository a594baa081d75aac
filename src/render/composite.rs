use crate::foundation::error::{DecorError, DecorResult};
use crate::foundation::math::{add_sat_u8, mul_div255};
use crate::render::plan::BlendMode;

pub type PremulRgba8 = [u8; 4];

fn opacity_u8(opacity: f32) -> u16 {
    ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}

fn scale(px: PremulRgba8, op: u16) -> PremulRgba8 {
    [
        mul_div255(u16::from(px[0]), op),
        mul_div255(u16::from(px[1]), op),
        mul_div255(u16::from(px[2]), op),
        mul_div255(u16::from(px[3]), op),
    ]
}

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let s = scale(src, op);
    if s[3] == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(s[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(s[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Additive blend, saturating per channel.
pub fn plus(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 {
        return dst;
    }
    let s = scale(src, op);
    [
        add_sat_u8(dst[0], s[0]),
        add_sat_u8(dst[1], s[1]),
        add_sat_u8(dst[2], s[2]),
        add_sat_u8(dst[3], s[3]),
    ]
}

/// `s + d - s*d` on every premultiplied channel.
pub fn screen(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let s = scale(src, op);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let prod = mul_div255(u16::from(s[i]), u16::from(dst[i]));
        out[i] = (u16::from(s[i]) + u16::from(dst[i]) - u16::from(prod)).min(255) as u8;
    }
    out
}

/// Separable multiply: `s*d + s*(1-da) + d*(1-sa)`, alpha composited as `over`.
pub fn multiply(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let op = opacity_u8(opacity);
    if op == 0 || src[3] == 0 {
        return dst;
    }
    let s = scale(src, op);
    let inv_sa = 255u16 - u16::from(s[3]);
    let inv_da = 255u16 - u16::from(dst[3]);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let sd = u16::from(mul_div255(u16::from(s[i]), u16::from(dst[i])));
        let s_only = u16::from(mul_div255(u16::from(s[i]), inv_da));
        let d_only = u16::from(mul_div255(u16::from(dst[i]), inv_sa));
        out[i] = (sd + s_only + d_only).min(255) as u8;
    }
    out[3] = add_sat_u8(s[3], mul_div255(u16::from(dst[3]), inv_sa));
    out
}

pub fn blend(dst: PremulRgba8, src: PremulRgba8, mode: BlendMode, opacity: f32) -> PremulRgba8 {
    match mode {
        BlendMode::SourceOver => over(dst, src, opacity),
        BlendMode::Lighter => plus(dst, src, opacity),
        BlendMode::Screen => screen(dst, src, opacity),
        BlendMode::Multiply => multiply(dst, src, opacity),
    }
}

pub fn blend_in_place(dst: &mut [u8], src: &[u8], mode: BlendMode, opacity: f32) -> DecorResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DecorError::render(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 && mode != BlendMode::Lighter {
            continue;
        }
        let out = blend([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], mode, opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Black silhouette of `src` at `opacity`, shifted by whole pixels `(dx, dy)`.
///
/// Pixels shifted in from outside the buffer are transparent.
pub fn shadow_silhouette(
    src: &[u8],
    width: u32,
    height: u32,
    dx: i32,
    dy: i32,
    opacity: f32,
) -> DecorResult<Vec<u8>> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| DecorError::render("shadow buffer size overflow"))?;
    if src.len() != expected {
        return Err(DecorError::render(
            "shadow_silhouette expects src matching width*height*4",
        ));
    }
    let op = opacity_u8(opacity);
    let mut out = vec![0u8; expected];
    if op == 0 {
        return Ok(out);
    }
    let (w, h) = (width as i64, height as i64);
    for y in 0..h {
        let sy = y - i64::from(dy);
        if sy < 0 || sy >= h {
            continue;
        }
        for x in 0..w {
            let sx = x - i64::from(dx);
            if sx < 0 || sx >= w {
                continue;
            }
            let a = src[((sy * w + sx) as usize) * 4 + 3];
            out[((y * w + x) as usize) * 4 + 3] = mul_div255(u16::from(a), op);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
