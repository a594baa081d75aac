use super::*;

fn vignette(opacity: f64) -> VignettePass {
    VignettePass {
        inner: 0.55,
        outer: 1.0,
        opacity,
        color: Rgba8::BLACK,
    }
}

#[test]
fn blend_names_parse() {
    assert_eq!(BlendMode::parse("source-over"), Some(BlendMode::SourceOver));
    assert_eq!(BlendMode::parse("lighter"), Some(BlendMode::Lighter));
    assert_eq!(BlendMode::parse("screen"), Some(BlendMode::Screen));
    assert_eq!(BlendMode::parse("multiply"), Some(BlendMode::Multiply));
    assert_eq!(BlendMode::parse("overlay"), None);
}

#[test]
fn vignette_is_clear_in_the_centre_and_full_in_the_corners() {
    let v = vignette(0.42);
    assert_eq!(v.alpha_at(400.0, 300.0, 800.0, 600.0), 0.0);
    assert!((v.alpha_at(0.0, 0.0, 800.0, 600.0) - 0.42).abs() < 1e-12);
    let mid = v.alpha_at(400.0 + 0.775 * 400.0, 300.0, 800.0, 600.0);
    assert!((mid - 0.21).abs() < 1e-9);
}

#[test]
fn vignette_follows_aspect_ratio() {
    let v = vignette(1.0);
    // Top edge centre of a wide target is as far out as the right edge centre.
    let top = v.alpha_at(400.0, 0.0, 800.0, 400.0);
    let right = v.alpha_at(800.0, 200.0, 800.0, 400.0);
    assert!((top - right).abs() < 1e-12);
}

#[test]
fn zero_opacity_vignette_has_no_alpha_anywhere() {
    let v = vignette(0.0);
    for (x, y) in [(0.0, 0.0), (10.0, 590.0), (799.0, 1.0)] {
        assert_eq!(v.alpha_at(x, y, 800.0, 600.0), 0.0);
    }
}

#[test]
fn degenerate_radii_form_a_hard_edge() {
    let v = VignettePass {
        inner: 0.5,
        outer: 0.5,
        opacity: 1.0,
        color: Rgba8::BLACK,
    };
    assert_eq!(v.alpha_at(50.0, 50.0, 100.0, 100.0), 0.0);
    assert_eq!(v.alpha_at(0.0, 0.0, 100.0, 100.0), 1.0);
}
