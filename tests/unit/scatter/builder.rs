use super::*;
use crate::foundation::core::Rgba8;

fn sprite(w: u32, h: u32) -> Arc<Sprite> {
    Arc::new(Sprite::solid(w, h, Rgba8::BLACK))
}

fn layer(json: &str) -> LayerDef {
    serde_json::from_str(json).unwrap()
}

fn place(canvas: Canvas) -> Placement<'static> {
    Placement {
        canvas,
        tile_size: DEFAULT_TILE_SIZE,
        track_mask: &[],
    }
}

#[test]
fn target_count_floors_and_clamps_density() {
    assert_eq!(target_count(Canvas::new(1000, 1000), 100.0), 1000);
    assert_eq!(target_count(Canvas::new(800, 600), 1.0), 4);
    assert_eq!(target_count(Canvas::new(800, 600), -3.0), 0);
    assert_eq!(target_count(Canvas::new(0, 600), 10.0), 0);
    assert_eq!(max_attempts(0), 50);
    assert_eq!(max_attempts(100), 800);
}

#[test]
fn item_storage_is_not_sized_by_untrusted_density() {
    let huge = target_count(Canvas::new(4000, 4000), 1e15);
    assert!(huge > 1_000_000);
    assert_eq!(item_capacity(huge), 4096);
    assert_eq!(item_capacity(12), 12);
}

#[test]
fn fit_by_max_keeps_aspect() {
    assert_eq!(fit_by_max(200, 100, 50.0), (50.0, 25.0));
    assert_eq!(fit_by_max(10, 40, 20.0), (5.0, 20.0));
    assert_eq!(fit_by_max(0, 0, 32.0), (32.0, 32.0));
}

#[test]
fn uniform_layer_fills_exactly_to_target() {
    let def = layer(r#"{"id":"grass","densityPer100kPx":100}"#);
    let mut rng = SceneRng::from_seed_str("fill");
    let built = build_layer(&def, &[sprite(8, 8)], place(Canvas::new(1000, 1000)), &mut rng);
    assert_eq!(built.items.len(), 1000);
    for it in &built.items {
        assert!((0.0..1000.0).contains(&it.pos.x));
        assert!((0.0..1000.0).contains(&it.pos.y));
        assert_eq!(it.pos, it.base);
    }
}

#[test]
fn layers_without_sprites_place_nothing() {
    let def = layer(r#"{"densityPer100kPx":50}"#);
    let mut rng = SceneRng::from_seed_str("empty");
    let built = build_layer(&def, &[], place(Canvas::new(400, 400)), &mut rng);
    assert!(built.items.is_empty());
    assert!(!built.is_animated());
}

#[test]
fn avoid_tracks_keeps_items_outside_inflated_rects() {
    let rects = [
        ExclusionRect::new(100.0, 100.0, 200.0, 50.0),
        ExclusionRect::new(0.0, 300.0, 400.0, 20.0),
    ];
    let def = layer(
        r#"{"densityPer100kPx":200,"distribution":{"mask":"avoidTracks","avoidTracksRadiusPx":12}}"#,
    );
    let mut rng = SceneRng::from_seed_str("tracks");
    let built = build_layer(
        &def,
        &[sprite(4, 4)],
        Placement {
            canvas: Canvas::new(400, 400),
            tile_size: 48.0,
            track_mask: &rects,
        },
        &mut rng,
    );
    assert!(!built.items.is_empty());
    for it in &built.items {
        assert!(!is_blocked(it.pos.x, it.pos.y, &rects, 12.0));
    }
}

#[test]
fn same_stream_same_layer() {
    let def = layer(
        r#"{"densityPer100kPx":20,"rotationRange":[-30,30],"scaleRange":[0.5,1.5],
            "opacityRange":[0.4,0.9],"animate":{"type":"wobble"}}"#,
    );
    let sprites = [sprite(10, 20), sprite(30, 10)];
    let a = build_layer(&def, &sprites, place(Canvas::new(640, 480)), &mut SceneRng::from_seed_str("s"));
    let b = build_layer(&def, &sprites, place(Canvas::new(640, 480)), &mut SceneRng::from_seed_str("s"));
    assert_eq!(a.items.len(), b.items.len());
    for (x, y) in a.items.iter().zip(&b.items) {
        assert_eq!(x.pos, y.pos);
        assert_eq!(x.rotation_rad, y.rotation_rad);
        assert_eq!(x.alpha, y.alpha);
        assert_eq!(x.sprite.id(), y.sprite.id());
        assert!(matches!((&x.motion, &y.motion), (Motion::Wobble(p), Motion::Wobble(q)) if p == q));
    }
    assert!(a.is_animated());
}

#[test]
fn sampled_values_respect_ranges() {
    let def = layer(
        r#"{"densityPer100kPx":50,"rotationRange":[10,20],"scaleRange":[2,3],"pixelScale":0,
            "opacityRange":[0.25,0.5],"size":{"mode":"pixel","maxPx":10},
            "animate":{"type":"wobble","ampPxRange":[2,4],"speedRange":[1,2]}}"#,
    );
    let mut rng = SceneRng::from_seed_str("ranges");
    let built = build_layer(&def, &[sprite(20, 10)], place(Canvas::new(500, 500)), &mut rng);
    assert!(!built.items.is_empty());
    for it in &built.items {
        assert!(it.rotation_rad >= 10f64.to_radians() - 1e-12);
        assert!(it.rotation_rad <= 20f64.to_radians() + 1e-12);
        assert!((2.0..=3.0).contains(&it.scale));
        assert!((0.25..=0.5).contains(&it.alpha));
        assert!((it.draw_w - 10.0 * it.scale).abs() < 1e-9);
        assert!((it.draw_h - 5.0 * it.scale).abs() < 1e-9);
        let Motion::Wobble(w) = it.motion else {
            panic!("expected wobble");
        };
        assert!((2.0..=4.0).contains(&w.amp_x) && (2.0..=4.0).contains(&w.amp_y));
        assert!((1.0..=2.0).contains(&w.speed));
        assert!((0.0..std::f64::consts::TAU).contains(&w.phase));
    }
}

#[test]
fn tile_sizing_has_a_floor() {
    let def = layer(r#"{"densityPer100kPx":10,"scaleRange":[0.01,0.01]}"#);
    let mut rng = SceneRng::from_seed_str("floor");
    let built = build_layer(&def, &[sprite(8, 8)], place(Canvas::new(500, 500)), &mut rng);
    assert!(built.items.iter().all(|it| it.draw_w == 4.0 && it.draw_h == 4.0));
}

#[test]
fn frames_layers_use_the_whole_list_as_one_sequence() {
    let def = layer(
        r#"{"densityPer100kPx":30,"animate":{"type":"frames","fpsRange":[3,3],"startFrameRandom":true}}"#,
    );
    let sprites = [sprite(4, 4), sprite(4, 4), sprite(4, 4)];
    let mut rng = SceneRng::from_seed_str("frames");
    let built = build_layer(&def, &sprites, place(Canvas::new(500, 500)), &mut rng);
    assert!(!built.items.is_empty());
    let mut starts = std::collections::HashSet::new();
    for it in &built.items {
        let Motion::Frames(c) = &it.motion else {
            panic!("expected frames");
        };
        assert_eq!(c.frames.len(), 3);
        assert_eq!(c.fps, 3.0);
        assert_eq!(it.sprite.id(), sprites[0].id());
        starts.insert(c.index);
    }
    assert!(starts.len() > 1);
}

#[test]
fn unknown_animation_kind_stays_still() {
    let def = layer(r#"{"densityPer100kPx":10,"animate":{"type":"spin"}}"#);
    let mut rng = SceneRng::from_seed_str("still");
    let built = build_layer(&def, &[sprite(4, 4)], place(Canvas::new(500, 500)), &mut rng);
    assert!(!built.items.is_empty());
    assert!(built.items.iter().all(|it| matches!(it.motion, Motion::Still)));
    assert!(!built.is_animated());
}

#[test]
fn unknown_bucket_is_built_but_unindexed() {
    let def = layer(r#"{"drawWhere":"sky","densityPer100kPx":10}"#);
    let mut rng = SceneRng::from_seed_str("sky");
    let built = build_layer(&def, &[sprite(4, 4)], place(Canvas::new(500, 500)), &mut rng);
    assert!(built.bucket.is_none());
    assert!(!built.items.is_empty());
    let idx = BucketIndex::new(&[built]);
    assert!(Bucket::ALL.iter().all(|b| idx.get(*b).is_empty()));
}

#[test]
fn buckets_sort_by_z_and_keep_ties_stable() {
    let mk = |z: f64, bucket: Bucket| BuiltLayer {
        id: String::new(),
        z,
        bucket: Some(bucket),
        animate: None,
        shadow: None,
        items: Vec::new(),
    };
    let layers = [
        mk(5.0, Bucket::BelowTracks),
        mk(1.0, Bucket::BelowTracks),
        mk(5.0, Bucket::BelowTracks),
        mk(0.0, Bucket::AboveTrain),
        mk(-2.0, Bucket::BelowTracks),
    ];
    let idx = BucketIndex::new(&layers);
    assert_eq!(idx.get(Bucket::BelowTracks), &[4, 1, 0, 2]);
    assert_eq!(idx.get(Bucket::AboveTrain), &[3]);
    assert!(idx.get(Bucket::AboveTracks).is_empty());
}

#[test]
fn sprites_load_in_config_order_and_drop_failures() {
    use crate::assets::store::MemoryAssetLoader;

    let a = Sprite::solid(1, 1, Rgba8::BLACK);
    let b = Sprite::solid(2, 2, Rgba8::BLACK);
    let (a_id, b_id) = (a.id(), b.id());
    let loader = MemoryAssetLoader::new()
        .with_sprite("decor/a.png", a)
        .with_sprite("decor/01_green/b.png", b);
    let cache = AssetCache::new(Arc::new(loader));
    let layers = [
        layer(r#"{"assets":["a.png","missing.png"]}"#),
        layer(r#"{"theme":true,"assets":["b.png"]}"#),
    ];
    let loaded = load_layer_sprites(&layers, &cache, "decor", "01_green");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].iter().map(|s| s.id()).collect::<Vec<_>>(), vec![a_id]);
    assert_eq!(loaded[1].iter().map(|s| s.id()).collect::<Vec<_>>(), vec![b_id]);
}
