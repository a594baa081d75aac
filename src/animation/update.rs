use crate::scatter::item::{BuiltLayer, Motion};

/// Advance every animated item of `layers`.
///
/// Wobble is evaluated at absolute clock time `t`; frame cycles accumulate `dt`. A `dt` that is
/// not a positive finite number leaves frame cycles untouched.
pub(crate) fn advance_layers(layers: &mut [BuiltLayer], t: f64, dt: f64) {
    let step_frames = dt.is_finite() && dt > 0.0;
    for layer in layers.iter_mut().filter(|l| l.is_animated()) {
        for item in &mut layer.items {
            match &mut item.motion {
                Motion::Wobble(w) => item.pos = w.position_at(item.base, t),
                Motion::Frames(cycle) if step_frames => cycle.advance(dt),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/update.rs"]
mod tests;
