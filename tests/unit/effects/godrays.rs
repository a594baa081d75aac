use super::*;
use crate::assets::store::MemoryAssetLoader;
use crate::foundation::core::{Point, Rgba8};

fn def(json: &str) -> GodraysDef {
    serde_json::from_str(json).unwrap()
}

fn beam(w: u32, h: u32) -> Arc<Sprite> {
    Arc::new(Sprite::solid(w, h, Rgba8::opaque(255, 240, 200)))
}

#[test]
fn blend_prefers_blend_then_composite_then_lighter() {
    assert_eq!(beam_blend(&def(r#"{}"#)), BlendMode::Lighter);
    assert_eq!(beam_blend(&def(r#"{"composite":"screen"}"#)), BlendMode::Screen);
    assert_eq!(
        beam_blend(&def(r#"{"blend":"multiply","composite":"screen"}"#)),
        BlendMode::Multiply
    );
    assert_eq!(beam_blend(&def(r#"{"blend":"source-over"}"#)), BlendMode::SourceOver);
    assert_eq!(beam_blend(&def(r#"{"blend":"hue"}"#)), BlendMode::Lighter);
}

#[test]
fn disabled_godrays_build_nothing() {
    let mut rng = SceneRng::from_seed_str("g");
    assert!(Godrays::build(&def(r#"{"count":3}"#), &[beam(4, 4)], Canvas::new(100, 100), &mut rng).is_none());
}

#[test]
fn no_sprites_means_no_instances_and_no_draws() {
    let mut rng = SceneRng::from_seed_str("g");
    let mut probe = rng.clone();
    let g = Godrays::build(&def(r#"{"enabled":true,"count":5}"#), &[], Canvas::new(100, 100), &mut rng)
        .unwrap();
    assert!(g.is_empty());
    assert_eq!(rng.next_u32(), probe.next_u32());
}

#[test]
fn instances_sample_their_ranges() {
    let d = def(
        r#"{"enabled":true,"count":16,"scaleRange":[1,2],"tiltDeg":20,
            "sway":{"ampPx":10,"speedRange":[0.5,0.6]},
            "opacity":{"min":0.1,"max":0.4,"speedRange":[1,2]}}"#,
    );
    let mut rng = SceneRng::from_seed_str("rays");
    let g = Godrays::build(&d, &[beam(8, 64), beam(16, 64)], Canvas::new(300, 200), &mut rng).unwrap();
    assert_eq!(g.instances.len(), 16);
    assert!((g.tilt_rad - 20f64.to_radians()).abs() < 1e-12);
    for ins in &g.instances {
        assert!((0.0..300.0).contains(&ins.base_x));
        assert!((1.0..=2.0).contains(&ins.scale));
        assert!((0.5..=0.6).contains(&ins.sway_speed));
        assert!((1.0..=2.0).contains(&ins.opacity_speed));
        for t in [0.0, 1.3, 17.0, 250.0] {
            let op = g.opacity_at(ins, t);
            assert!((0.1 - 1e-12..=0.4 + 1e-12).contains(&op));
            assert!(g.sway_at(ins, t).abs() <= 10.0);
        }
    }
}

#[test]
fn single_stamp_is_centred_on_the_beam_origin() {
    let d = def(r#"{"enabled":true,"count":1,"sway":{"ampPx":0}}"#);
    let mut rng = SceneRng::from_seed_str("one");
    let g = Godrays::build(&d, &[beam(10, 40)], Canvas::new(200, 100), &mut rng).unwrap();
    let passes = g.passes(Canvas::new(200, 100), 3.0);
    assert_eq!(passes.len(), 1);
    assert_eq!(passes[0].blend, BlendMode::Lighter);
    assert_eq!(passes[0].ops.len(), 1);
    let centre = passes[0].ops[0].transform * Point::new(5.0, 20.0);
    assert!((centre - Point::new(g.instances[0].base_x, 0.0)).hypot() < 1e-9);
}

#[test]
fn vertical_tiling_covers_the_diagonal() {
    let d = def(r#"{"enabled":true,"count":1,"tileVertical":true}"#);
    let mut rng = SceneRng::from_seed_str("tile");
    let g = Godrays::build(&d, &[beam(10, 50)], Canvas::new(300, 400), &mut rng).unwrap();
    let pass = &g.passes(Canvas::new(300, 400), 0.0)[0];
    // span = 500 + 200, total = 700 + 100.
    assert_eq!(pass.ops.len(), 16 + 2);
    let first = pass.ops[0].transform * Point::ORIGIN;
    let last = pass.ops[pass.ops.len() - 1].transform * Point::new(0.0, 50.0);
    assert!(first.y <= -350.0 && last.y >= 400.0);
}

#[test]
fn tiny_beams_tile_at_whole_pixel_steps() {
    let d = def(r#"{"enabled":true,"count":1,"tileVertical":true,"scaleRange":[1e-9,1e-9]}"#);
    let mut rng = SceneRng::from_seed_str("tiny");
    let g = Godrays::build(&d, &[beam(10, 50)], Canvas::new(300, 400), &mut rng).unwrap();
    let pass = &g.passes(Canvas::new(300, 400), 0.0)[0];
    // span = 700, stepped at 1 px with one step of margin each side.
    assert_eq!(pass.ops.len(), 702 + 2);
}

#[test]
fn beam_sprites_resolve_under_base() {
    let loader = MemoryAssetLoader::new().with_sprite("decor/rays/a.png", Sprite::solid(2, 2, Rgba8::BLACK));
    let cache = AssetCache::new(Arc::new(loader));
    let d = def(r#"{"enabled":true,"images":["rays/a.png","rays/missing.png"]}"#);
    assert_eq!(load_beam_sprites(&d, &cache, "decor").len(), 1);
    let off = def(r#"{"images":["rays/a.png"]}"#);
    assert!(load_beam_sprites(&off, &cache, "decor").is_empty());
}
