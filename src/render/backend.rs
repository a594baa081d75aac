use crate::{
    foundation::core::Canvas,
    foundation::error::DecorResult,
    render::plan::{SpritePass, VignettePass},
};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Same frame with straight (non-premultiplied) alpha, as image encoders expect.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            crate::assets::decode::unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }
}

/// Paint target the compositor and post-effects draw into.
///
/// The engine never owns the target; callers pass it to every draw call. Passes arrive in
/// paint order and each one is fully composited before the next.
pub trait PaintBackend {
    /// Target size in pixels.
    fn size(&self) -> Canvas;

    fn draw_sprites(&mut self, pass: &SpritePass) -> DecorResult<()>;

    fn draw_vignette(&mut self, pass: &VignettePass) -> DecorResult<()>;
}
