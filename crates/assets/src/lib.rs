//! Texture loading for the landscape: PNG decode, CPU sampling fields, and
//! the one-shot background load the host awaits.
//!
//! Three bitmaps by role: the grid pattern, the displacement (height) map,
//! and the metalness map. A texture directory names the files, either
//! through an optional `manifest.json` or by the default file names.
//!
//! # Layout
//! Each decoded image is kept twice: tightly packed RGBA8 rows for GPU
//! upload, and a scalar field the CPU can sample (terrain silhouette math,
//! diagnostics) without touching the GPU.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

/// Default file names inside the texture directory.
pub const DEFAULT_GRID: &str = "grid.png";
pub const DEFAULT_DISPLACEMENT: &str = "displacement.png";
pub const DEFAULT_METALNESS: &str = "metalness.png";

/// Optional manifest file overriding the default names.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Errors from texture resolution and decoding.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// A decoded bitmap in GPU-upload form plus CPU sampling access.
///
/// Sampling reads the red channel; the height and metalness maps are
/// authored greyscale, so one channel carries the field.
#[derive(Debug, Clone)]
pub struct FieldImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl FieldImage {
    /// Wrap raw RGBA8 data. Panics if the buffer doesn't match the
    /// dimensions; that is a caller bug, not a runtime condition.
    pub fn from_rgba8(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        assert!(width > 0 && height > 0, "image must be non-empty");
        assert_eq!(
            rgba.len(),
            width as usize * height as usize * 4,
            "rgba buffer does not match {width}x{height}"
        );
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Read and decode a PNG from disk.
    pub fn decode(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
            path: path.to_owned(),
            source,
        })?;
        let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
            path: path.to_owned(),
            source,
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::from_rgba8(width, height, rgba.into_raw()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 rows, ready for `Queue::write_texture`.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Red channel of the texel at `(x, y)`, clamped to the image bounds,
    /// normalized to `[0, 1]`.
    fn texel(&self, x: i64, y: i64) -> f32 {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let idx = (y * self.width as usize + x) * 4;
        self.rgba[idx] as f32 / 255.0
    }

    /// Bilinear sample over normalized `[0, 1]^2` coordinates.
    ///
    /// Coordinates outside the unit square clamp to the edge, matching a
    /// clamp-to-edge GPU sampler. Texel centers sit on the lattice, so
    /// `sample(0.0, 0.0)` is exactly the corner texel.
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let x = u.clamp(0.0, 1.0) * (self.width - 1) as f32;
        let y = v.clamp(0.0, 1.0) * (self.height - 1) as f32;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let x0 = x0 as i64;
        let y0 = y0 as i64;

        let top = self.texel(x0, y0) * (1.0 - fx) + self.texel(x0 + 1, y0) * fx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - fx) + self.texel(x0 + 1, y0 + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

/// The three scene textures, decoded and ready.
#[derive(Debug, Clone)]
pub struct SceneTextures {
    pub grid: FieldImage,
    pub displacement: FieldImage,
    pub metalness: FieldImage,
}

/// Maps texture roles to file names inside the texture directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureManifest {
    pub grid: String,
    pub displacement: String,
    pub metalness: String,
}

impl Default for TextureManifest {
    fn default() -> Self {
        Self {
            grid: DEFAULT_GRID.into(),
            displacement: DEFAULT_DISPLACEMENT.into(),
            metalness: DEFAULT_METALNESS.into(),
        }
    }
}

impl TextureManifest {
    /// Read `manifest.json` from `dir`, falling back to the default names
    /// when no manifest exists. Fields missing from the manifest keep
    /// their defaults.
    pub fn resolve(dir: &Path) -> Result<Self, AssetError> {
        let path = dir.join(MANIFEST_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Resolve the manifest and decode all three textures.
pub fn load_scene_textures(dir: &Path) -> Result<SceneTextures, AssetError> {
    let started = Instant::now();
    let manifest = TextureManifest::resolve(dir)?;

    let grid = FieldImage::decode(&dir.join(&manifest.grid))?;
    let displacement = FieldImage::decode(&dir.join(&manifest.displacement))?;
    let metalness = FieldImage::decode(&dir.join(&manifest.metalness))?;

    tracing::info!(
        dir = %dir.display(),
        grid = format!("{}x{}", grid.width(), grid.height()),
        displacement = format!("{}x{}", displacement.width(), displacement.height()),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scene textures loaded"
    );
    Ok(SceneTextures {
        grid,
        displacement,
        metalness,
    })
}

/// Decode the textures on a background thread and deliver the result once.
///
/// The host polls the receiver from its event loop; the channel yields
/// exactly one message. If the receiver is dropped first (host shut down
/// mid-load), the worker's send fails silently and the thread exits.
pub fn spawn_load(dir: PathBuf) -> mpsc::Receiver<Result<SceneTextures, AssetError>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = load_scene_textures(&dir);
        if let Err(error) = &result {
            tracing::error!(%error, "texture load failed");
        }
        let _ = tx.send(result);
    });
    rx
}

pub fn crate_info() -> &'static str {
    "neondrift-assets v0.1.0"
}
