//! Asset provider module.
//!
//! Resolves `AssetRef`s to decoded RGBA bitmaps. The pipeline only sees the
//! `AssetProvider` trait; two implementations ship with the crate:
//!
//! - `DiskAssetCache`: read-through cache rooted at a directory. Misses are
//!   downloaded through a `RemoteFetcher`, written to a temporary file and
//!   atomically moved into place. Entries are never invalidated, and when two
//!   renders race on the same miss the first writer wins.
//! - `MemoryAssets`: a fixed in-memory table, for callers that already hold
//!   their images and for tests.

use crate::error::CardError;
use crate::snapshot::AssetRef;
use image::RgbaImage;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Resolves logical asset paths to bitmaps.
pub trait AssetProvider: Send + Sync {
    /// Load the bitmap for `asset`.
    ///
    /// # Errors
    ///
    /// `CardError::AssetUnavailable` if the asset is neither cached nor
    /// fetchable.
    fn resolve(&self, asset: &AssetRef) -> Result<RgbaImage, CardError>;

    /// Pixel size of `asset`.
    fn dimensions(&self, asset: &AssetRef) -> Result<(u32, u32), CardError> {
        self.resolve(asset).map(|image| image.dimensions())
    }
}

/// Downloads raw asset bytes.
pub trait RemoteFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;
}

/// On-disk, write-once asset cache.
pub struct DiskAssetCache {
    root: PathBuf,
    fetcher: Option<Box<dyn RemoteFetcher>>,
}

impl DiskAssetCache {
    /// Cache over bundled assets only; misses are errors.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fetcher: None,
        }
    }

    /// Cache that downloads misses with `fetcher`.
    pub fn with_fetcher(root: impl Into<PathBuf>, fetcher: Box<dyn RemoteFetcher>) -> Self {
        Self {
            root: root.into(),
            fetcher: Some(fetcher),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of `asset` under the root.
    ///
    /// Only plain relative paths are accepted; `..`, `.` and absolute
    /// components would step outside the cache.
    fn local_path(&self, asset: &AssetRef) -> Result<PathBuf, CardError> {
        let relative = Path::new(&asset.path);
        let mut components = relative.components().peekable();
        if components.peek().is_none()
            || !components.all(|part| matches!(part, Component::Normal(_)))
        {
            return Err(CardError::asset(&asset.path, "path escapes the cache root"));
        }
        Ok(self.root.join(relative))
    }

    /// Download `asset` and move it into place without overwriting.
    fn populate(&self, asset: &AssetRef, path: &Path) -> Result<(), CardError> {
        let url = asset
            .url
            .as_deref()
            .ok_or_else(|| CardError::asset(&asset.path, "not cached and no remote url"))?;
        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| CardError::asset(&asset.path, "not cached and no fetcher configured"))?;

        tracing::debug!(path = %asset.path, url, "Asset cache miss, fetching");
        let bytes = fetcher
            .fetch(url)
            .map_err(|e| CardError::asset(&asset.path, e))?;

        let parent = path
            .parent()
            .ok_or_else(|| CardError::asset(&asset.path, "invalid cache path"))?;
        std::fs::create_dir_all(parent).map_err(|e| CardError::asset(&asset.path, e))?;

        let mut staged =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| CardError::asset(&asset.path, e))?;
        staged
            .write_all(&bytes)
            .map_err(|e| CardError::asset(&asset.path, e))?;

        match staged.persist_noclobber(path) {
            Ok(_) => Ok(()),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!(path = %asset.path, "Asset cached concurrently, keeping first copy");
                Ok(())
            }
            Err(e) => Err(CardError::asset(&asset.path, e.error)),
        }
    }
}

impl AssetProvider for DiskAssetCache {
    fn resolve(&self, asset: &AssetRef) -> Result<RgbaImage, CardError> {
        let path = self.local_path(asset)?;
        if !path.exists() {
            self.populate(asset, &path)?;
        }

        let image = image::open(&path).map_err(|e| CardError::asset(&asset.path, e))?;
        Ok(image.to_rgba8())
    }

    fn dimensions(&self, asset: &AssetRef) -> Result<(u32, u32), CardError> {
        let path = self.local_path(asset)?;
        if !path.exists() {
            self.populate(asset, &path)?;
        }
        image::image_dimensions(&path).map_err(|e| CardError::asset(&asset.path, e))
    }
}

/// In-memory asset table keyed by logical path.
///
/// # Examples
///
/// ```rust
/// use buildcard::asset::{AssetProvider, MemoryAssets};
/// use buildcard::AssetRef;
/// use image::RgbaImage;
///
/// let mut assets = MemoryAssets::new();
/// assets.insert("UI/LOCKED.png", RgbaImage::new(20, 25));
///
/// let lock = AssetRef::local("UI/LOCKED.png");
/// assert_eq!(assets.dimensions(&lock).unwrap(), (20, 25));
/// assert!(assets.resolve(&AssetRef::local("missing.png")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    images: HashMap<String, RgbaImage>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, image: RgbaImage) {
        self.images.insert(path.into(), image);
    }

    pub fn remove(&mut self, path: &str) -> Option<RgbaImage> {
        self.images.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.images.contains_key(path)
    }
}

impl AssetProvider for MemoryAssets {
    fn resolve(&self, asset: &AssetRef) -> Result<RgbaImage, CardError> {
        self.images
            .get(&asset.path)
            .cloned()
            .ok_or_else(|| CardError::asset(&asset.path, "not registered"))
    }

    fn dimensions(&self, asset: &AssetRef) -> Result<(u32, u32), CardError> {
        self.images
            .get(&asset.path)
            .map(|image| image.dimensions())
            .ok_or_else(|| CardError::asset(&asset.path, "not registered"))
    }
}
