use crate::config::model::VignetteDef;
use crate::foundation::core::Rgba8;
use crate::render::plan::VignettePass;

/// Paint description for an enabled vignette. Opacity is clamped to `[0,1]` and an unparsable
/// color falls back to black.
pub(crate) fn vignette_pass(def: &VignetteDef) -> Option<VignettePass> {
    if !def.enabled {
        return None;
    }
    let color = Rgba8::from_hex(&def.color).unwrap_or_else(|err| {
        tracing::warn!(color = %def.color, %err, "invalid vignette color, using black");
        Rgba8::BLACK
    });
    Some(VignettePass {
        inner: def.inner,
        outer: def.outer,
        opacity: def.opacity.clamp(0.0, 1.0),
        color,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/vignette.rs"]
mod tests;
