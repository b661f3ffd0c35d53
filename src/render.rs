//! Render pipeline.
//!
//! `render_card` runs the three stages in order: stat formatting, layout and
//! composition. A call either returns a complete card or an error; there is
//! no partial output.

use crate::asset::AssetProvider;
use crate::compositor::Compositor;
use crate::config::CardConfig;
use crate::error::{CardError, Diagnostic};
use crate::font::FontProvider;
use crate::formatter::StatFormatter;
use crate::layout::LayoutEngine;
use crate::snapshot::CharacterSnapshot;
use chrono::{DateTime, TimeZone};
use image::{ImageFormat, RgbaImage};
use std::fmt::Display;
use std::io::Cursor;

/// A finished card.
#[derive(Debug, Clone)]
pub struct RenderedCard {
    /// Character the card was rendered for.
    pub character: String,
    pub image: RgbaImage,
    /// Non-fatal findings, such as a stat list that did not fit.
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderedCard {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// File name stem for saving the card: `{character}_{timestamp}`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use buildcard::render::RenderedCard;
    /// use chrono::{TimeZone, Utc};
    /// use image::RgbaImage;
    ///
    /// let card = RenderedCard {
    ///     character: "Hu Tao".to_string(),
    ///     image: RgbaImage::new(1, 1),
    ///     diagnostics: Vec::new(),
    /// };
    /// let at = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 42).unwrap();
    /// assert_eq!(card.file_stem(&at), "Hu Tao_2024-03-09_17-05-42");
    /// ```
    pub fn file_stem<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format!("{}_{}", self.character, at.format("%Y-%m-%d_%H-%M-%S"))
    }

    /// Encode the card as PNG in memory.
    pub fn to_png(&self) -> Result<Vec<u8>, CardError> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| CardError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

/// Render one card.
///
/// # Errors
///
/// - `CardError::MissingStat` if HP, ATK or DEF is absent.
/// - `CardError::UnknownEquipmentSlot` or `CardError::MissingWeapon` for an
///   unusable equipment list.
/// - `CardError::AssetUnavailable` if any image cannot be resolved.
pub fn render_card(
    snapshot: &CharacterSnapshot,
    assets: &dyn AssetProvider,
    fonts: &dyn FontProvider,
    config: &CardConfig,
) -> Result<RenderedCard, CardError> {
    let stats = StatFormatter::from_config(config).format(&snapshot.stats, snapshot.element)?;
    let placements =
        LayoutEngine::new(fonts, assets, config).compute(snapshot, &snapshot.equipment, &stats)?;
    let image = Compositor::new(assets, fonts).compose(&placements)?;

    for diagnostic in &stats.diagnostics {
        tracing::warn!(character = %snapshot.name, %diagnostic, "Card rendered with diagnostic");
    }
    tracing::debug!(
        character = %snapshot.name,
        width = image.width(),
        height = image.height(),
        "Card rendered"
    );

    Ok(RenderedCard {
        character: snapshot.name.clone(),
        image,
        diagnostics: stats.diagnostics,
    })
}
