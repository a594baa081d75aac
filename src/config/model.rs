use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{DecorError, DecorResult};
use crate::scatter::bias::Bias;

/// Theme folders used when the config has no usable `theme.tierMap`.
pub const DEFAULT_TIER_MAP: [&str; 4] = ["01_green", "02_pale_green", "03_orange", "04_brown"];

/// Root of the decoration JSON configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorConfig {
    pub layers: Vec<LayerDef>,
    pub postfx: PostFxDef,
    pub theme: ThemeDef,
}

impl DecorConfig {
    /// Parse a configuration from JSON text.
    ///
    /// `null` members are treated as absent, so they take the field default.
    pub fn from_json_str(s: &str) -> DecorResult<Self> {
        let mut value: serde_json::Value = serde_json::from_str(s)?;
        drop_nulls(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> DecorResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read decor config '{}'", path.display()))?;
        Self::from_json_str(&text)
            .map_err(|e| DecorError::config(format!("'{}': {e}", path.display())))
    }

    /// Read a configuration file, falling back to the built-in defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %path.as_ref().display(), %err, "decor config unavailable, using defaults");
                Self::default()
            }
        }
    }

    /// Theme folder for a discrete tier, clamped to `0..=3`.
    pub fn tier_folder(&self, tier: i32) -> &str {
        let idx = tier.clamp(0, 3) as usize;
        if self.theme.tier_map.is_empty() {
            return DEFAULT_TIER_MAP[idx];
        }
        self.theme
            .tier_map
            .get(idx)
            .or_else(|| self.theme.tier_map.first())
            .map(String::as_str)
            .unwrap_or(DEFAULT_TIER_MAP[idx])
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeDef {
    pub tier_map: Vec<String>,
}

impl Default for ThemeDef {
    fn default() -> Self {
        Self {
            tier_map: DEFAULT_TIER_MAP.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// One configured decoration layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerDef {
    pub id: String,
    pub z: f64,
    /// Bucket name; see [`crate::Bucket`]. Unknown names are built but never drawn.
    pub draw_where: String,
    #[serde(rename = "densityPer100kPx")]
    pub density_per_100k_px: f64,
    pub scale_range: [f64; 2],
    pub rotation_range: [f64; 2],
    pub size: SizePolicy,
    pub pixel_scale: f64,
    pub animate: Option<AnimateDef>,
    pub distribution: DistributionDef,
    pub theme: bool,
    pub assets_folder: Option<String>,
    pub assets_range: Option<AssetsRange>,
    pub assets: Vec<String>,
    pub opacity_range: Option<[f64; 2]>,
    pub shadow: Option<ShadowDef>,
}

impl Default for LayerDef {
    fn default() -> Self {
        Self {
            id: String::new(),
            z: 0.0,
            draw_where: "belowTracks".to_string(),
            density_per_100k_px: 0.0,
            scale_range: [1.0, 1.0],
            rotation_range: [0.0, 0.0],
            size: SizePolicy::default(),
            pixel_scale: 1.0,
            animate: None,
            distribution: DistributionDef::default(),
            theme: false,
            assets_folder: None,
            assets_range: None,
            assets: Vec::new(),
            opacity_range: None,
            shadow: None,
        }
    }
}

fn drop_nulls(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(drop_nulls);
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(drop_nulls),
        _ => {}
    }
}

/// How an item's draw size is derived from its sprite.
///
/// A missing or unrecognised `mode` means [`SizePolicy::FitTile`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase", from = "SizeRepr")]
pub enum SizePolicy {
    /// Longest side is `tileSize * tileFactor * scale`, at least 4 px.
    Tile {
        #[serde(rename = "tileFactor")]
        tile_factor: f64,
    },
    /// Longest side is `maxPx * scale`, at least 4 px.
    Pixel {
        #[serde(rename = "maxPx")]
        max_px: f64,
    },
    /// Longest side is `tileSize * scale`.
    FitTile,
}

#[derive(Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SizeRepr {
    mode: Option<String>,
    tile_factor: f64,
    max_px: f64,
}

impl Default for SizeRepr {
    fn default() -> Self {
        Self {
            mode: None,
            tile_factor: 1.0,
            max_px: 64.0,
        }
    }
}

impl From<SizeRepr> for SizePolicy {
    fn from(r: SizeRepr) -> Self {
        match r.mode.as_deref() {
            Some("tile") => Self::Tile {
                tile_factor: r.tile_factor,
            },
            Some("pixel") => Self::Pixel { max_px: r.max_px },
            _ => Self::FitTile,
        }
    }
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self::Tile { tile_factor: 1.0 }
    }
}

/// Per-item animation kind.
///
/// A missing or unrecognised `type` means [`AnimateDef::Still`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", from = "AnimateRepr")]
pub enum AnimateDef {
    Wobble(WobbleDef),
    Frames(FramesDef),
    Still,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnimateRepr {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(flatten)]
    params: serde_json::Value,
}

impl From<AnimateRepr> for AnimateDef {
    fn from(r: AnimateRepr) -> Self {
        let parsed = match r.kind.as_deref() {
            Some("wobble") => serde_json::from_value(r.params).map(Self::Wobble),
            Some("frames") => serde_json::from_value(r.params).map(Self::Frames),
            _ => return Self::Still,
        };
        parsed.unwrap_or_else(|err| {
            tracing::warn!(%err, "malformed decor animation, items stay static");
            Self::Still
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WobbleDef {
    pub amp_px_range: [f64; 2],
    pub speed_range: [f64; 2],
}

impl Default for WobbleDef {
    fn default() -> Self {
        Self {
            amp_px_range: [1.0, 3.0],
            speed_range: [0.2, 0.6],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FramesDef {
    pub fps_range: [f64; 2],
    pub start_frame_random: bool,
}

impl Default for FramesDef {
    fn default() -> Self {
        Self {
            fps_range: [1.0, 2.0],
            start_frame_random: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaskKind {
    AvoidTracks,
    #[default]
    #[serde(other)]
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DistributionDef {
    pub mask: MaskKind,
    pub bias: Bias,
    pub avoid_tracks_radius_px: f64,
}

/// Zero-padded numeric asset name expansion: `base + pad(i) + ext` for `i in from..=to`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsRange {
    pub base: String,
    pub from: u32,
    pub to: u32,
    pub ext: String,
    pub pad: usize,
}

impl Default for AssetsRange {
    fn default() -> Self {
        Self {
            base: String::new(),
            from: 1,
            to: 0,
            ext: ".png".to_string(),
            pad: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadowDef {
    pub enabled: bool,
    pub opacity: f64,
    pub blur_px: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ShadowDef {
    fn default() -> Self {
        Self {
            enabled: false,
            opacity: 0.2,
            blur_px: 6.0,
            offset_x: 6.0,
            offset_y: 8.0,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFxDef {
    pub vignette: Option<VignetteDef>,
    pub godrays: Option<GodraysDef>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteDef {
    pub enabled: bool,
    pub inner: f64,
    pub outer: f64,
    pub opacity: f64,
    pub color: String,
}

impl Default for VignetteDef {
    fn default() -> Self {
        Self {
            enabled: false,
            inner: 0.55,
            outer: 1.0,
            opacity: 0.42,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GodraysDef {
    pub enabled: bool,
    pub images: Vec<String>,
    pub count: u32,
    pub tilt_deg: f64,
    pub tile_vertical: bool,
    pub scale_range: [f64; 2],
    pub sway: SwayDef,
    pub opacity: BeamOpacityDef,
    pub blend: Option<String>,
    /// Older configs name the blend mode `composite`.
    pub composite: Option<String>,
}

impl Default for GodraysDef {
    fn default() -> Self {
        Self {
            enabled: false,
            images: Vec::new(),
            count: 0,
            tilt_deg: 0.0,
            tile_vertical: false,
            scale_range: [1.0, 1.0],
            sway: SwayDef::default(),
            opacity: BeamOpacityDef::default(),
            blend: None,
            composite: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwayDef {
    pub amp_px: f64,
    pub speed_range: [f64; 2],
}

impl Default for SwayDef {
    fn default() -> Self {
        Self {
            amp_px: 20.0,
            speed_range: [0.05, 0.1],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BeamOpacityDef {
    pub min: f64,
    pub max: f64,
    pub speed_range: [f64; 2],
}

impl Default for BeamOpacityDef {
    fn default() -> Self {
        Self {
            min: 0.15,
            max: 0.35,
            speed_range: [0.05, 0.1],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
