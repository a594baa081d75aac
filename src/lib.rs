//! Procedural scenery decoration for 2D game boards.
//!
//! The engine scatters sprite decorations (grass, rocks, bushes, trees) over a scene using a
//! seeded, reproducible placement process, animates them, and paints them in three buckets
//! ordered relative to the board, followed by post-effects:
//!
//! - Create a [`DecorEngine`] and [`init`](DecorEngine::init) it with [`EngineOpts`]
//! - [`rebuild`](DecorEngine::rebuild) from a seed whenever the scene changes
//! - Per frame: [`update`](DecorEngine::update), [`draw`](DecorEngine::draw) each [`Bucket`],
//!   then [`draw_post`](DecorEngine::draw_post) into any [`PaintBackend`] such as [`CpuSurface`]
//!
//! The same seed, configuration, canvas size and assets always produce the same layout.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod assets;
pub mod compositor;
pub(crate) mod config;
pub(crate) mod effects;
pub(crate) mod render;
pub(crate) mod scatter;
pub(crate) mod session;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{DecorError, DecorResult};

pub use crate::animation::clock::{Clock, ManualClock, SystemClock};
pub use crate::assets::decode::decode_image;
pub use crate::assets::store::{
    AssetCache, AssetLoader, FsAssetLoader, MemoryAssetLoader, Sprite, SpriteId,
};
pub use crate::compositor::{ClipMode, DrawOpts, ViewTransform};
pub use crate::config::model::{
    AnimateDef, AssetsRange, BeamOpacityDef, DEFAULT_TIER_MAP, DecorConfig, DistributionDef,
    FramesDef, GodraysDef, LayerDef, MaskKind, PostFxDef, ShadowDef, SizePolicy, SwayDef,
    ThemeDef, VignetteDef, WobbleDef,
};
pub use crate::effects::godrays::{GodrayInstance, Godrays};
pub use crate::render::backend::{FrameRGBA, PaintBackend};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::plan::{BlendMode, ShadowStyle, SpriteOp, SpritePass, VignettePass};
pub use crate::scatter::bias::{Bias, BiasAxis, CenterAvoid};
pub use crate::scatter::builder::{BucketIndex, DEFAULT_TILE_SIZE, max_attempts, target_count};
pub use crate::scatter::item::{Bucket, BuiltLayer, FrameCycle, Item, Motion, Wobble};
pub use crate::scatter::mask::{ExclusionRect, is_blocked};
pub use crate::scatter::rng::{SceneRng, final_seed, scene_seed};
pub use crate::session::engine::{
    BuiltScene, ConfigSource, DEFAULT_ASSET_BASE, DecorEngine, EngineOpts, RebuildTicket,
    SceneSource, StaticScene,
};
