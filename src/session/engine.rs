use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    animation::clock::{Clock, SystemClock},
    animation::update::advance_layers,
    assets::store::{AssetCache, AssetLoader},
    compositor::{DrawOpts, draw_bucket},
    config::model::DecorConfig,
    effects::godrays::{Godrays, load_beam_sprites},
    effects::vignette::vignette_pass,
    foundation::core::Canvas,
    foundation::error::DecorResult,
    render::backend::PaintBackend,
    render::plan::VignettePass,
    scatter::builder::{BucketIndex, DEFAULT_TILE_SIZE, Placement, build_layer, load_layer_sprites},
    scatter::item::{Bucket, BuiltLayer},
    scatter::mask::ExclusionRect,
    scatter::rng::SceneRng,
};

/// Asset base used when none is configured.
pub const DEFAULT_ASSET_BASE: &str = "decor";

/// Host-side scene queries the engine makes at rebuild time.
pub trait SceneSource: Send + Sync {
    /// Current scene size in pixels.
    fn canvas(&self) -> Canvas;

    /// Grid tile size in pixels, if the scene has a grid.
    fn grid(&self) -> Option<f64> {
        None
    }

    /// Rectangles covered by track geometry.
    fn track_mask(&self) -> Vec<ExclusionRect> {
        Vec::new()
    }

    /// Discrete error tier selecting the theme folder.
    fn error_tier(&self) -> i32 {
        0
    }
}

/// Plain-data [`SceneSource`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticScene {
    pub canvas: Canvas,
    pub tile_size: Option<f64>,
    pub track_mask: Vec<ExclusionRect>,
    pub error_tier: i32,
}

impl StaticScene {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }
}

impl SceneSource for StaticScene {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn grid(&self) -> Option<f64> {
        self.tile_size
    }

    fn track_mask(&self) -> Vec<ExclusionRect> {
        self.track_mask.clone()
    }

    fn error_tier(&self) -> i32 {
        self.error_tier
    }
}

/// Where the layer configuration comes from.
#[derive(Clone, Debug)]
pub enum ConfigSource {
    /// JSON file, replaced by the built-in defaults if it cannot be read or parsed.
    Path(PathBuf),
    Inline(DecorConfig),
}

/// Everything [`DecorEngine::init`] needs.
#[derive(Clone)]
pub struct EngineOpts {
    pub source: Arc<dyn SceneSource>,
    pub loader: Arc<dyn AssetLoader>,
    pub config: ConfigSource,
    /// Prefix for relative asset names.
    pub asset_base: String,
    pub clock: Arc<dyn Clock>,
}

impl EngineOpts {
    /// Options with an empty inline config, the default asset base and the system clock.
    pub fn new(source: Arc<dyn SceneSource>, loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            source,
            loader,
            config: ConfigSource::Inline(DecorConfig::default()),
            asset_base: DEFAULT_ASSET_BASE.to_string(),
            clock: Arc::new(SystemClock::new()),
        }
    }

    pub fn with_config(mut self, config: DecorConfig) -> Self {
        self.config = ConfigSource::Inline(config);
        self
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = ConfigSource::Path(path.into());
        self
    }

    pub fn with_asset_base(mut self, base: impl Into<String>) -> Self {
        self.asset_base = base.into();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for EngineOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineOpts")
            .field("config", &self.config)
            .field("asset_base", &self.asset_base)
            .finish_non_exhaustive()
    }
}

struct Session {
    source: Arc<dyn SceneSource>,
    config: Arc<DecorConfig>,
    cache: Arc<AssetCache>,
    asset_base: String,
    clock: Arc<dyn Clock>,
}

/// A fully placed scene, ready to be committed.
#[derive(Clone, Debug)]
pub struct BuiltScene {
    generation: u64,
    seed: String,
    canvas: Canvas,
    layers: Vec<BuiltLayer>,
    index: BucketIndex,
    godrays: Option<Godrays>,
    vignette: Option<VignettePass>,
}

impl BuiltScene {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Layers in configuration order.
    pub fn layers(&self) -> &[BuiltLayer] {
        &self.layers
    }

    /// Layers of one bucket in paint order.
    pub fn bucket_layers(&self, bucket: Bucket) -> impl Iterator<Item = &BuiltLayer> + '_ {
        self.index
            .get(bucket)
            .iter()
            .filter_map(|&i| self.layers.get(i))
    }

    pub fn godrays(&self) -> Option<&Godrays> {
        self.godrays.as_ref()
    }

    pub fn vignette(&self) -> Option<&VignettePass> {
        self.vignette.as_ref()
    }

    fn has_animated_layers(&self) -> bool {
        self.layers.iter().any(BuiltLayer::is_animated)
    }
}

/// Snapshot of everything a scene build needs. Building is pure and may run on any thread.
#[derive(Debug)]
pub struct RebuildTicket {
    generation: u64,
    seed: String,
    canvas: Canvas,
    tile_size: f64,
    track_mask: Vec<ExclusionRect>,
    theme_folder: String,
    config: Arc<DecorConfig>,
    cache: Arc<AssetCache>,
    asset_base: String,
}

impl RebuildTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Load assets and place every layer. Asset loads fan out over the rayon pool; placement
    /// runs in configuration order on one seeded stream.
    #[tracing::instrument(skip(self), fields(seed = %self.seed, generation = self.generation))]
    pub fn build(self) -> BuiltScene {
        let godrays_def = self.config.postfx.godrays.as_ref();
        let (layer_sprites, beam_sprites) = rayon::join(
            || {
                load_layer_sprites(
                    &self.config.layers,
                    &self.cache,
                    &self.asset_base,
                    &self.theme_folder,
                )
            },
            || {
                godrays_def
                    .map(|d| load_beam_sprites(d, &self.cache, &self.asset_base))
                    .unwrap_or_default()
            },
        );

        let mut rng = SceneRng::from_seed_str(&self.seed);
        let placement = Placement {
            canvas: self.canvas,
            tile_size: self.tile_size,
            track_mask: &self.track_mask,
        };
        let layers: Vec<BuiltLayer> = self
            .config
            .layers
            .iter()
            .zip(&layer_sprites)
            .map(|(def, sprites)| build_layer(def, sprites, placement, &mut rng))
            .collect();
        let godrays =
            godrays_def.and_then(|d| Godrays::build(d, &beam_sprites, self.canvas, &mut rng));
        let vignette = self.config.postfx.vignette.as_ref().and_then(vignette_pass);
        let index = BucketIndex::new(&layers);

        tracing::debug!(
            layers = layers.len(),
            items = layers.iter().map(|l| l.items.len()).sum::<usize>(),
            "decor scene built"
        );

        BuiltScene {
            generation: self.generation,
            seed: self.seed,
            canvas: self.canvas,
            layers,
            index,
            godrays,
            vignette,
        }
    }
}

/// Procedural decoration engine for one paint surface.
///
/// Construct with [`DecorEngine::new`], then [`init`](Self::init) once and
/// [`rebuild`](Self::rebuild) whenever the scene changes. Per frame, call
/// [`update`](Self::update), then [`draw`](Self::draw) for each bucket and
/// [`draw_post`](Self::draw_post) last. Every call before init and rebuild is a no-op.
#[derive(Default)]
pub struct DecorEngine {
    session: Option<Session>,
    scene: Option<BuiltScene>,
    generation: u64,
}

impl std::fmt::Debug for DecorEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecorEngine")
            .field("initialized", &self.session.is_some())
            .field("generation", &self.generation)
            .field("scene", &self.scene.as_ref().map(BuiltScene::seed))
            .finish()
    }
}

impl DecorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration and wire the engine to its host. Returns `false`, changing nothing,
    /// when the engine is already initialized.
    pub fn init(&mut self, opts: EngineOpts) -> bool {
        if self.session.is_some() {
            tracing::debug!("decor engine already initialized");
            return false;
        }
        let config = match opts.config {
            ConfigSource::Path(path) => DecorConfig::load_or_default(path),
            ConfigSource::Inline(cfg) => cfg,
        };
        tracing::info!(
            layers = config.layers.len(),
            asset_base = %opts.asset_base,
            "decor engine initialized"
        );
        self.session = Some(Session {
            source: opts.source,
            config: Arc::new(config),
            cache: Arc::new(AssetCache::new(opts.loader)),
            asset_base: opts.asset_base,
            clock: opts.clock,
        });
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Active configuration, once initialized.
    pub fn config(&self) -> Option<&DecorConfig> {
        self.session.as_ref().map(|s| s.config.as_ref())
    }

    /// Snapshot the scene inputs for a build. Invalidates any ticket issued earlier.
    pub fn begin_rebuild(&mut self, seed: &str) -> Option<RebuildTicket> {
        let Some(session) = self.session.as_ref() else {
            tracing::debug!("decor rebuild requested before init");
            return None;
        };
        self.generation += 1;
        let seed = if seed.is_empty() { "seed" } else { seed };
        let tile_size = session
            .source
            .grid()
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(DEFAULT_TILE_SIZE);
        Some(RebuildTicket {
            generation: self.generation,
            seed: seed.to_string(),
            canvas: session.source.canvas(),
            tile_size,
            track_mask: session.source.track_mask(),
            theme_folder: session
                .config
                .tier_folder(session.source.error_tier())
                .to_string(),
            config: session.config.clone(),
            cache: session.cache.clone(),
            asset_base: session.asset_base.clone(),
        })
    }

    /// Install a built scene if no newer rebuild has begun since its ticket was issued.
    pub fn commit(&mut self, scene: BuiltScene) -> bool {
        if scene.generation != self.generation {
            tracing::debug!(
                built = scene.generation,
                current = self.generation,
                "discarding stale decor scene"
            );
            return false;
        }
        self.scene = Some(scene);
        true
    }

    /// Rebuild the scene synchronously from `seed`.
    #[tracing::instrument(skip(self))]
    pub fn rebuild(&mut self, seed: &str) {
        if let Some(ticket) = self.begin_rebuild(seed) {
            let scene = ticket.build();
            self.commit(scene);
        }
    }

    /// Currently installed scene.
    pub fn scene(&self) -> Option<&BuiltScene> {
        self.scene.as_ref()
    }

    /// Whether per-frame `update`/`draw_post` calls can change the picture.
    pub fn has_animated_content(&self) -> bool {
        self.scene.as_ref().is_some_and(|s| {
            s.has_animated_layers() || s.godrays.as_ref().is_some_and(|g| !g.is_empty())
        })
    }

    /// Advance animation by `dt` seconds. Wobble is taken from the clock, frame cycles from `dt`.
    pub fn update(&mut self, dt: f64) {
        let (Some(session), Some(scene)) = (self.session.as_ref(), self.scene.as_mut()) else {
            return;
        };
        if !scene.has_animated_layers() {
            return;
        }
        advance_layers(&mut scene.layers, session.clock.now_secs(), dt);
    }

    /// Paint one bucket.
    pub fn draw<B: PaintBackend + ?Sized>(
        &self,
        backend: &mut B,
        bucket: Bucket,
        opts: &DrawOpts,
    ) -> DecorResult<()> {
        let Some(scene) = self.scene.as_ref() else {
            return Ok(());
        };
        draw_bucket(backend, &scene.layers, &scene.index, bucket, opts)
    }

    /// Paint post-effects over the whole target: vignette, then godrays.
    pub fn draw_post<B: PaintBackend + ?Sized>(&self, backend: &mut B) -> DecorResult<()> {
        let (Some(session), Some(scene)) = (self.session.as_ref(), self.scene.as_ref()) else {
            return Ok(());
        };
        if let Some(v) = &scene.vignette {
            backend.draw_vignette(v)?;
        }
        if let Some(g) = scene.godrays.as_ref().filter(|g| !g.is_empty()) {
            let t = session.clock.now_secs();
            for pass in g.passes(backend.size(), t) {
                backend.draw_sprites(&pass)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
