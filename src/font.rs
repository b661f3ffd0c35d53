//! Font interface.
//!
//! Font loading is not part of the card pipeline. Callers hand in a
//! `FontProvider` that returns shared `Font` handles by family and pixel
//! size. The layout engine only measures text; the compositor asks the same
//! handle for a coverage mask and tints it.

use crate::error::CardError;
use image::{GrayImage, Luma};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The single family the card uses.
pub const NORMAL: &str = "normal";

/// A font at one pixel size.
pub trait Font: Send + Sync {
    /// Pixel size the handle was created for.
    fn size(&self) -> u32;

    /// Advance width of `text` in pixels.
    fn measure(&self, text: &str) -> f32;

    /// Height of the line box.
    fn line_height(&self) -> f32;

    /// Coverage mask of `text`, one line box high. White is ink.
    fn rasterize(&self, text: &str) -> GrayImage;
}

/// Shared font handle.
pub type FontHandle = Arc<dyn Font>;

/// Resolves a family and pixel size to a font handle.
pub trait FontProvider: Send + Sync {
    fn font(&self, family: &str, size: u32) -> Result<FontHandle, CardError>;
}

/// Metric-only font that draws each glyph as a solid box.
///
/// Every character advances half the pixel size, which keeps layout
/// arithmetic easy to predict. Useful for previews and tests where real font
/// files are not available.
///
/// # Examples
///
/// ```rust
/// use buildcard::font::{BlockFont, Font};
///
/// let font = BlockFont::new(20);
/// assert_eq!(font.measure("Sword"), 50.0);
/// assert_eq!(font.line_height(), 20.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlockFont {
    size: u32,
}

impl BlockFont {
    pub fn new(size: u32) -> Self {
        Self { size }
    }

    fn advance(&self) -> f32 {
        self.size as f32 / 2.0
    }
}

impl Font for BlockFont {
    fn size(&self) -> u32 {
        self.size
    }

    fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance()
    }

    fn line_height(&self) -> f32 {
        self.size as f32
    }

    fn rasterize(&self, text: &str) -> GrayImage {
        let width = self.measure(text).ceil().max(1.0) as u32;
        let height = self.size.max(1);
        let advance = self.advance();
        let mut mask = GrayImage::new(width, height);

        for (idx, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let x0 = (idx as f32 * advance + 1.0) as u32;
            let x1 = (((idx + 1) as f32 * advance) - 1.0).max(x0 as f32) as u32;
            let y0 = height / 5;
            let y1 = height.saturating_sub(height / 10);
            for y in y0..y1.min(height) {
                for x in x0..x1.min(width) {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        mask
    }
}

/// `FontProvider` handing out cached `BlockFont`s for any family.
#[derive(Default)]
pub struct BlockFonts {
    cache: Mutex<HashMap<u32, FontHandle>>,
}

impl BlockFonts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FontProvider for BlockFonts {
    fn font(&self, _family: &str, size: u32) -> Result<FontHandle, CardError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| CardError::asset(format!("font:{size}"), "font cache poisoned"))?;
        let handle = cache
            .entry(size)
            .or_insert_with(|| Arc::new(BlockFont::new(size)) as FontHandle);
        Ok(Arc::clone(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_font_mask_size() {
        let font = BlockFont::new(22);
        let mask = font.rasterize("R5");
        assert_eq!(mask.dimensions(), (22, 22));
        assert!(mask.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn test_block_font_whitespace_has_no_ink() {
        let mask = BlockFont::new(10).rasterize("   ");
        assert!(mask.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_provider_caches_handles() {
        let fonts = BlockFonts::new();
        let a = fonts.font(NORMAL, 20).unwrap();
        let b = fonts.font(NORMAL, 20).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(fonts.font(NORMAL, 12).unwrap().size(), 12);
    }
}
