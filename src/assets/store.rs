use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use crate::{
    assets::decode,
    foundation::core::Rgba8,
    foundation::error::{DecorError, DecorResult},
};

static NEXT_SPRITE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique sprite identity, used by backends to cache converted paints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteId(u64);

/// Decoded raster sprite in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct Sprite {
    id: SpriteId,
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl Sprite {
    /// Wrap row-major premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> DecorResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| DecorError::asset("sprite size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(DecorError::asset(format!(
                "sprite byte len {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            id: SpriteId(NEXT_SPRITE_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Sprite filled with one color.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> Self {
        let px = color.to_premul();
        let bytes = px.repeat((width as usize) * (height as usize));
        Self {
            id: SpriteId(NEXT_SPRITE_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Resolves a logical asset path to a decoded sprite.
///
/// Implementations must be thread-safe: one cache may serve several concurrent scene builds.
pub trait AssetLoader: Send + Sync {
    fn load(&self, path: &str) -> DecorResult<Sprite>;
}

/// Loads sprites from a directory on disk.
///
/// Logical paths are resolved relative to `root`; a leading `/` or `./` is ignored and parent
/// traversal is rejected. Remote (`http:`/`https:`) paths are not supported.
#[derive(Clone, Debug)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetLoader for FsAssetLoader {
    fn load(&self, path: &str) -> DecorResult<Sprite> {
        if path.starts_with("http:") || path.starts_with("https:") {
            return Err(DecorError::asset(format!(
                "remote asset '{path}' is not supported by the filesystem loader"
            )));
        }
        let rel = path.trim_start_matches("./").trim_start_matches('/');
        let norm = normalize_rel_path(rel)?;
        let p = self.root.join(Path::new(&norm));
        let bytes = std::fs::read(&p).map_err(|e| {
            DecorError::asset(format!("failed to read asset '{}': {e}", p.display()))
        })?;
        decode::decode_image(&bytes)
    }
}

/// In-memory loader, for embedding pre-decoded sprites and for tests.
#[derive(Debug, Default)]
pub struct MemoryAssetLoader {
    sprites: HashMap<String, Sprite>,
    loads: AtomicUsize,
}

impl MemoryAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sprite(mut self, path: impl Into<String>, sprite: Sprite) -> Self {
        self.insert(path, sprite);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, sprite: Sprite) {
        self.sprites.insert(path.into(), sprite);
    }

    /// Number of `load` calls served so far, hits and misses alike.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl AssetLoader for MemoryAssetLoader {
    fn load(&self, path: &str) -> DecorResult<Sprite> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.sprites
            .get(path)
            .cloned()
            .ok_or_else(|| DecorError::asset(format!("no sprite registered for '{path}'")))
    }
}

type Slot = Arc<OnceLock<Option<Arc<Sprite>>>>;

/// Memoizing front of an [`AssetLoader`].
///
/// Each path is loaded at most once for the cache's lifetime, including failures, which are
/// remembered as absent. Entries are never evicted.
pub struct AssetCache {
    loader: Arc<dyn AssetLoader>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl AssetCache {
    pub fn new(loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            loader,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `path`, loading it on first use. `None` means the asset is unavailable.
    pub fn get(&self, path: &str) -> Option<Arc<Sprite>> {
        let slot = {
            let mut slots = self
                .slots
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            slots.entry(path.to_string()).or_default().clone()
        };
        slot.get_or_init(|| match self.loader.load(path) {
            Ok(sprite) => Some(Arc::new(sprite)),
            Err(err) => {
                tracing::debug!(path, %err, "decor asset unavailable");
                None
            }
        })
        .clone()
    }

    /// Number of distinct paths requested so far.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> DecorResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(DecorError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(DecorError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(DecorError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(DecorError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
