//! Layout engine.
//!
//! Maps a snapshot, its equipment and the formatted stat list onto the card
//! canvas. The output is a `PlacementList`; nothing is painted here. Icon
//! sizes come from the asset provider and text extents from the font
//! provider, so every bounding box is final when the list is returned.
//!
//! The canvas is split into fixed regions:
//!
//! - header, constellation column and skill column on the left half, over
//!   the character art;
//! - weapon panel and stat rows in the middle;
//! - five artifact panels on the right;
//! - the active set bonus banner under the stat rows.

use crate::asset::AssetProvider;
use crate::config::CardConfig;
use crate::display::FormattedStats;
use crate::equipment::{active_set_bonuses, EquipmentSlot, SlotKind, ARTIFACT_SLOTS};
use crate::error::CardError;
use crate::font::{FontProvider, NORMAL};
use crate::placement::{
    BoundingBox, IconOp, IconPaint, LinePaint, Paint, Placement, PlacementList, PolygonPaint,
    RectPaint, Rgba, TextPaint, ZLayer, WHITE,
};
use crate::snapshot::{AssetRef, CharacterSnapshot};
use crate::stat_kind::StatKind;

/// Card background; its size is the canvas size.
pub const BACKGROUND: &str = "Assets/default_enka_card.png";

pub const CONSTELLATION_STRIDE: f32 = 60.0;
pub const SKILL_STRIDE: f32 = 90.0;
pub const ARTIFACT_STRIDE: f32 = 119.0;

/// Vertical space shared by the stat rows.
pub const STAT_AREA_HEIGHT: usize = 365;

/// Weapon names at least this wide (size 22) are wrapped.
pub const WEAPON_NAME_MAX_WIDTH: f32 = 295.0;

/// Characters per line of a wrapped weapon name.
pub const WEAPON_NAME_WRAP: usize = 20;

const CHARACTER_MASK: &str = "Assets/enka_character_mask.png";
const CHARACTER_SHADE: &str = "Assets/enka_character_shade.png";
const CONSTELLATION_OVERLAY: &str = "Assets/enka_constellation_overlay.png";
const TALENT_OVERLAY: &str = "Assets/enka_talent_overlay.png";
const ARTIFACT_MASK: &str = "Assets/artifact_mask.png";
const FLOWER_OF_LIFE: &str = "Assets/flower_of_life_icon.png";
const FRIENDSHIP_ICON: &str = "UI/COMPANIONSHIP.png";
const LOCK_ICON: &str = "UI/LOCKED.png";

const GREEN: Rgba = [150, 255, 169, 255];
const BEIGE: Rgba = [245, 222, 179, 255];
const DIM_WHITE: Rgba = [255, 255, 255, 150];
const SOFT_WHITE: Rgba = [255, 255, 255, 200];
const BOOSTED_BADGE: Rgba = [79, 188, 212, 255];
const SKILL_BADGE: Rgba = [50, 50, 50, 178];
const PILL: Rgba = [235, 235, 235, 40];
const DARK_PILL: Rgba = [0, 0, 0, 100];
const BANNER_FILL: Rgba = [0, 0, 0, 50];

/// Which point of the text box the given coordinate refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    LeftTop,
    LeftMiddle,
    MiddleMiddle,
    RightTop,
}

/// Vertical distance between stat rows for `count` displayed stats.
///
/// Integer division of the stat area, so rows never overrun it.
///
/// # Examples
///
/// ```rust
/// use buildcard::layout::stat_row_stride;
///
/// assert_eq!(stat_row_stride(8), 45.0);
/// assert_eq!(stat_row_stride(3), 121.0);
/// ```
pub fn stat_row_stride(count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    (STAT_AREA_HEIGHT / count) as f32
}

/// How far the weapon's stat pills are pushed down for a name drawn on
/// `lines` lines.
///
/// # Examples
///
/// ```rust
/// use buildcard::layout::weapon_stat_offset;
///
/// assert_eq!(weapon_stat_offset(1), 5.0);
/// assert_eq!(weapon_stat_offset(3), 61.0);
/// ```
pub fn weapon_stat_offset(lines: usize) -> f32 {
    5.0 + 28.0 * lines.saturating_sub(1) as f32
}

/// Greedy word wrap at `width` characters.
///
/// Words longer than a line are split. Always returns at least one line.
///
/// # Examples
///
/// ```rust
/// use buildcard::layout::wrap_text;
///
/// assert_eq!(
///     wrap_text("Favonius Greatsword of the Far North", 20),
///     vec!["Favonius Greatsword", "of the Far North"]
/// );
/// assert_eq!(wrap_text("", 20), vec![""]);
/// ```
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                }
                current.extend(word.iter());
                current_len = needed;
                break;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Text size, color, anchor and layer.
#[derive(Debug, Clone, Copy)]
struct Style {
    size: u32,
    color: Rgba,
    anchor: TextAnchor,
    layer: ZLayer,
}

impl Style {
    fn new(size: u32) -> Self {
        Self {
            size,
            color: WHITE,
            anchor: TextAnchor::LeftTop,
            layer: ZLayer::Text,
        }
    }

    fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    fn layer(mut self, layer: ZLayer) -> Self {
        self.layer = layer;
        self
    }
}

/// Weapon and artifacts sorted into their slots.
struct Loadout<'e> {
    weapon: &'e EquipmentSlot,
    artifacts: [Option<&'e EquipmentSlot>; 5],
}

impl<'e> Loadout<'e> {
    fn from_slots(equipment: &'e [EquipmentSlot]) -> Result<Self, CardError> {
        let mut weapon = None;
        let mut artifacts: [Option<&EquipmentSlot>; 5] = [None; 5];

        for (index, piece) in equipment.iter().enumerate() {
            match piece.slot {
                SlotKind::Unknown => return Err(CardError::UnknownEquipmentSlot { index }),
                SlotKind::Weapon => {
                    if weapon.is_none() {
                        weapon = Some(piece);
                    } else {
                        tracing::warn!(index, name = %piece.name, "Second weapon ignored");
                    }
                }
                slot => {
                    let Some(row) = slot.artifact_index() else {
                        return Err(CardError::UnknownEquipmentSlot { index });
                    };
                    if artifacts[row].is_some() {
                        tracing::warn!(index, ?slot, name = %piece.name, "Duplicate artifact position ignored");
                    } else {
                        artifacts[row] = Some(piece);
                    }
                }
            }
        }

        Ok(Self {
            weapon: weapon.ok_or(CardError::MissingWeapon)?,
            artifacts,
        })
    }

    fn equipped_artifacts(&self) -> Vec<EquipmentSlot> {
        self.artifacts.iter().flatten().map(|piece| (*piece).clone()).collect()
    }
}

/// Computes placements for one card.
///
/// # Examples
///
/// ```rust,no_run
/// use buildcard::asset::DiskAssetCache;
/// use buildcard::font::BlockFonts;
/// use buildcard::layout::LayoutEngine;
/// use buildcard::{CardConfig, CharacterSnapshot, StatFormatter};
///
/// # fn snapshot() -> CharacterSnapshot { unimplemented!() }
/// let snapshot = snapshot();
/// let config = CardConfig::default();
/// let (fonts, assets) = (BlockFonts::new(), DiskAssetCache::new("attributes"));
///
/// let stats = StatFormatter::from_config(&config)
///     .format(&snapshot.stats, snapshot.element)
///     .unwrap();
/// let placements = LayoutEngine::new(&fonts, &assets, &config)
///     .compute(&snapshot, &snapshot.equipment, &stats)
///     .unwrap();
/// assert!(placements.get("weapon.name.0").is_some());
/// ```
pub struct LayoutEngine<'a> {
    fonts: &'a dyn FontProvider,
    assets: &'a dyn AssetProvider,
    config: &'a CardConfig,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(
        fonts: &'a dyn FontProvider,
        assets: &'a dyn AssetProvider,
        config: &'a CardConfig,
    ) -> Self {
        Self {
            fonts,
            assets,
            config,
        }
    }

    /// Lay out the whole card.
    ///
    /// # Errors
    ///
    /// - `CardError::UnknownEquipmentSlot` if a piece of equipment is in a
    ///   slot outside the artifact table and the weapon slot.
    /// - `CardError::MissingWeapon` if no weapon is equipped.
    /// - Any asset or font error raised while measuring.
    pub fn compute(
        &self,
        snapshot: &CharacterSnapshot,
        equipment: &[EquipmentSlot],
        stats: &FormattedStats,
    ) -> Result<PlacementList, CardError> {
        let loadout = Loadout::from_slots(equipment)?;

        let background = AssetRef::local(BACKGROUND);
        let (width, height) = self.assets.dimensions(&background)?;
        let mut list = PlacementList::new(width, height);

        self.icon(
            &mut list,
            "background",
            &background,
            (0.0, 0.0, width, height),
            vec![IconOp::Overlay(snapshot.element.tint())],
            1,
            ZLayer::Background,
        );

        self.character_art(&mut list, snapshot)?;
        self.header(&mut list, snapshot)?;
        self.constellations(&mut list, snapshot)?;
        self.skills(&mut list, snapshot)?;
        self.weapon(&mut list, loadout.weapon)?;
        self.stat_rows(&mut list, stats)?;
        for (row, piece) in loadout.artifacts.iter().enumerate() {
            self.artifact(&mut list, row, *piece)?;
        }
        self.set_banner(&mut list, &loadout.equipped_artifacts())?;

        tracing::debug!(
            character = %snapshot.name,
            placements = list.len(),
            "Card layout computed"
        );
        Ok(list)
    }

    fn measure(&self, text: &str, size: u32) -> Result<f32, CardError> {
        Ok(self.fonts.font(NORMAL, size)?.measure(text))
    }

    /// Size of `asset` scaled to `height`, keeping its aspect ratio.
    fn fit_height(&self, asset: &AssetRef, height: u32) -> Result<(u32, u32), CardError> {
        let (w, h) = self.assets.dimensions(asset)?;
        let width = (w as f32 * height as f32 / h.max(1) as f32) as u32;
        Ok((width.max(1), height))
    }

    fn text(
        &self,
        list: &mut PlacementList,
        id: impl Into<String>,
        text: impl Into<String>,
        (x, y): (f32, f32),
        style: Style,
    ) -> Result<BoundingBox, CardError> {
        let text = text.into();
        let font = self.fonts.font(NORMAL, style.size)?;
        let width = font.measure(&text);
        let height = font.line_height();
        let (left, top) = match style.anchor {
            TextAnchor::LeftTop => (x, y),
            TextAnchor::LeftMiddle => (x, y - height / 2.0),
            TextAnchor::MiddleMiddle => (x - width / 2.0, y - height / 2.0),
            TextAnchor::RightTop => (x - width, y),
        };
        let bounds = BoundingBox::new(left, top, width, height);

        list.push(Placement {
            id: id.into(),
            bounds,
            layer: style.layer,
            paint: Paint::Text(TextPaint {
                text,
                size: style.size,
                color: style.color,
            }),
        });
        Ok(bounds)
    }

    #[allow(clippy::too_many_arguments)]
    fn icon(
        &self,
        list: &mut PlacementList,
        id: impl Into<String>,
        asset: &AssetRef,
        (x, y, width, height): (f32, f32, u32, u32),
        ops: Vec<IconOp>,
        emphasis: u8,
        layer: ZLayer,
    ) {
        list.push(Placement {
            id: id.into(),
            bounds: BoundingBox::new(x, y, width as f32, height as f32),
            layer,
            paint: Paint::Icon(IconPaint {
                asset: asset.clone(),
                ops,
                emphasis,
            }),
        });
    }

    /// An icon scaled to `height` with optional brightness.
    #[allow(clippy::too_many_arguments)]
    fn scaled_icon(
        &self,
        list: &mut PlacementList,
        id: impl Into<String>,
        asset: &AssetRef,
        (x, y): (f32, f32),
        height: u32,
        extra: Option<IconOp>,
        emphasis: u8,
        layer: ZLayer,
    ) -> Result<BoundingBox, CardError> {
        let (width, height) = self.fit_height(asset, height)?;
        let mut ops = vec![IconOp::Resize { width, height }];
        ops.extend(extra);
        self.icon(list, id, asset, (x, y, width, height), ops, emphasis, layer);
        Ok(BoundingBox::new(x, y, width as f32, height as f32))
    }

    fn rect(
        &self,
        list: &mut PlacementList,
        id: impl Into<String>,
        bounds: BoundingBox,
        fill: Rgba,
        radius: f32,
        layer: ZLayer,
    ) {
        list.push(Placement {
            id: id.into(),
            bounds,
            layer,
            paint: Paint::Rect(RectPaint {
                fill,
                radius,
                outline: None,
            }),
        });
    }

    fn stat_icon(kind: StatKind) -> AssetRef {
        AssetRef::local(format!("UI/{}.png", kind.icon_name()))
    }

    fn rarity_icon(rarity: u8) -> AssetRef {
        AssetRef::local(format!("UI/RARITY_{rarity}.png"))
    }

    fn character_art(
        &self,
        list: &mut PlacementList,
        snapshot: &CharacterSnapshot,
    ) -> Result<(), CardError> {
        let (w, h) = self.assets.dimensions(&snapshot.banner)?;
        let (scaled_w, scaled_h) = ((w as f32 * 0.9) as u32, (h as f32 * 0.9) as u32);
        let (crop_w, crop_h) = (scaled_w.saturating_sub(615), scaled_h.saturating_sub(85));

        if crop_w == 0 || crop_h == 0 {
            tracing::debug!(path = %snapshot.banner.path, w, h, "Banner too small, art skipped");
        } else {
            self.icon(
                list,
                "art",
                &snapshot.banner,
                (0.0, 0.0, crop_w, crop_h),
                vec![
                    IconOp::Resize {
                        width: scaled_w,
                        height: scaled_h,
                    },
                    IconOp::Crop {
                        x: 615,
                        y: 85,
                        width: crop_w,
                        height: crop_h,
                    },
                    IconOp::Mask {
                        asset: AssetRef::local(CHARACTER_MASK),
                        invert: true,
                    },
                ],
                1,
                ZLayer::Foreground,
            );
        }

        let shade = AssetRef::local(CHARACTER_SHADE);
        let (sw, sh) = self.assets.dimensions(&shade)?;
        self.icon(list, "art.shade", &shade, (0.0, 0.0, sw, sh), Vec::new(), 1, ZLayer::Foreground);
        Ok(())
    }

    fn header(&self, list: &mut PlacementList, snapshot: &CharacterSnapshot) -> Result<(), CardError> {
        let player = &snapshot.player;

        let name = self.text(list, "header.name", &snapshot.name, (38.0, 35.0), Style::new(30))?;
        let w = name.width.floor();
        list.push(Placement {
            id: "header.pointer".to_string(),
            bounds: BoundingBox::from_corners(38.0 + w + 15.0, 48.0, 38.0 + w + 21.0, 53.0),
            layer: ZLayer::Text,
            paint: Paint::Polygon(PolygonPaint {
                points: vec![
                    (38.0 + w + 15.0, 53.0),
                    (38.0 + w + 21.0, 53.0),
                    (38.0 + w + 18.0, 48.0),
                ],
                fill: SOFT_WHITE,
            }),
        });
        self.text(
            list,
            "header.nickname",
            &player.nickname,
            (38.0 + w + 35.0, 51.0),
            Style::new(16).color(SOFT_WHITE).anchor(TextAnchor::LeftMiddle),
        )?;

        self.text(list, "header.uid", format!("UID: {}", player.uid), (38.0, 545.0), Style::new(18))?;
        let world = format!("WL{}", player.world_level);
        let rank = format!("AR{}", player.adventure_rank);
        let w = self.measure(&world, 18)?;
        let w2 = self.measure(&rank, 18)?;
        self.text(list, "header.world_level", world, (38.0, 570.0), Style::new(18))?;
        self.rect(
            list,
            "header.rank.badge",
            BoundingBox::from_corners(38.0 + w + 8.0, 568.0, 38.0 + w + 18.0 + w2, 592.0),
            [0, 0, 0, 125],
            3.0,
            ZLayer::Text,
        );
        self.text(list, "header.rank", rank, (38.0 + w + 13.0, 570.0), Style::new(18).color(BEIGE))?;

        let level = format!("Lv. {}/", snapshot.level);
        let w = self.measure(&level, 23)?.floor();
        self.text(list, "header.level", level, (38.0, 76.0), Style::new(23))?;
        self.text(
            list,
            "header.max_level",
            snapshot.max_level.to_string(),
            (38.0 + w, 76.0),
            Style::new(23).color(DIM_WHITE),
        )?;

        self.scaled_icon(
            list,
            "header.friendship.icon",
            &AssetRef::local(FRIENDSHIP_ICON),
            (34.0, 108.0),
            45,
            None,
            1,
            ZLayer::Foreground,
        )?;
        self.text(
            list,
            "header.friendship",
            snapshot.friendship_level.to_string(),
            (80.0, 130.0),
            Style::new(23).anchor(TextAnchor::LeftMiddle),
        )?;
        Ok(())
    }

    fn constellations(
        &self,
        list: &mut PlacementList,
        snapshot: &CharacterSnapshot,
    ) -> Result<(), CardError> {
        let unlocked = snapshot.unlocked_constellations();
        let overlay = AssetRef::local(CONSTELLATION_OVERLAY);
        let lock = AssetRef::local(LOCK_ICON);

        for (index, slot) in snapshot.constellations.iter().enumerate() {
            let top = 160.0 + CONSTELLATION_STRIDE * index as f32;
            let prefix = format!("constellation.{index}");

            self.scaled_icon(
                list,
                format!("{prefix}.overlay"),
                &overlay,
                (25.0, top),
                75,
                None,
                1,
                ZLayer::Foreground,
            )?;
            list.push(Placement {
                id: format!("{prefix}.ring"),
                bounds: BoundingBox::new(40.0, top + 15.0, 45.0, 45.0),
                layer: ZLayer::Foreground,
                paint: Paint::Rect(RectPaint {
                    fill: [50, 50, 50, 150],
                    radius: 22.5,
                    outline: Some((snapshot.element.tint(), 2.0)),
                }),
            });

            let (w, h) = self.fit_height(&slot.icon, 45)?;
            let x = (63.0 - w as f32 / 2.0).floor();
            let y = top + 15.0;
            let mut ops = vec![IconOp::Resize { width: w, height: h }];

            if index >= unlocked {
                ops.push(IconOp::Brightness(0.4));
                self.icon(list, format!("{prefix}.icon"), &slot.icon, (x, y, w, h), ops, 1, ZLayer::Foreground);
                self.icon(
                    list,
                    format!("{prefix}.lock"),
                    &lock,
                    (x + 13.0, y + 8.0, 20, 25),
                    vec![IconOp::Resize { width: 20, height: 25 }],
                    1,
                    ZLayer::Foreground,
                );
            } else {
                self.icon(list, format!("{prefix}.icon"), &slot.icon, (x, y, w, h), ops, 3, ZLayer::Foreground);
            }
        }
        Ok(())
    }

    fn skills(&self, list: &mut PlacementList, snapshot: &CharacterSnapshot) -> Result<(), CardError> {
        let overlay = AssetRef::local(TALENT_OVERLAY);

        for (index, skill) in snapshot.skills.iter().enumerate() {
            let dy = SKILL_STRIDE * index as f32;
            let prefix = format!("skill.{index}");

            self.scaled_icon(
                list,
                format!("{prefix}.overlay"),
                &overlay,
                (430.0, 305.0 + dy),
                80,
                None,
                4,
                ZLayer::Foreground,
            )?;
            self.icon(
                list,
                format!("{prefix}.icon"),
                &skill.icon,
                (446.0, 320.0 + dy, 50, 50),
                vec![IconOp::Resize { width: 50, height: 50 }],
                3,
                ZLayer::Foreground,
            );

            let level = skill.level.to_string();
            let w = self.measure(&level, 20)?.floor();
            let fill = if skill.boosted { BOOSTED_BADGE } else { SKILL_BADGE };
            self.rect(
                list,
                format!("{prefix}.badge"),
                BoundingBox::from_corners(471.0 - w / 2.0 - 6.0, 367.0 + dy, 471.0 + w / 2.0 + 6.0, 397.0 + dy),
                fill,
                15.0,
                ZLayer::Foreground,
            );
            self.text(
                list,
                format!("{prefix}.level"),
                level,
                (472.0, 383.0 + dy),
                Style::new(20)
                    .anchor(TextAnchor::MiddleMiddle)
                    .layer(ZLayer::Foreground),
            )?;
        }
        Ok(())
    }

    fn weapon(&self, list: &mut PlacementList, weapon: &EquipmentSlot) -> Result<(), CardError> {
        self.scaled_icon(list, "weapon.icon", &weapon.icon, (555.0, 25.0), 125, None, 1, ZLayer::Foreground)?;

        let light = AssetRef::local(format!("UI/RARITY_{}_WEAPON_LIGHT.png", weapon.rarity));
        let (lw, _) = self.fit_height(&light, 40)?;
        self.scaled_icon(
            list,
            "weapon.rarity_light",
            &light,
            ((625.0 - lw as f32 / 2.0).floor(), 130.0),
            40,
            None,
            1,
            ZLayer::Foreground,
        )?;

        let rarity = Self::rarity_icon(weapon.rarity);
        let (rw, _) = self.fit_height(&rarity, 25)?;
        let rx = (625.0 - rw as f32 / 2.0).floor();
        self.scaled_icon(
            list,
            "weapon.rarity.shadow",
            &rarity,
            (rx, 137.0),
            25,
            Some(IconOp::Brightness(0.0)),
            1,
            ZLayer::Foreground,
        )?;
        self.scaled_icon(list, "weapon.rarity", &rarity, (rx, 135.0), 25, None, 1, ZLayer::Foreground)?;

        let lines = if self.measure(&weapon.name, 22)? < WEAPON_NAME_MAX_WIDTH {
            vec![weapon.name.clone()]
        } else {
            wrap_text(&weapon.name, WEAPON_NAME_WRAP)
        };
        tracing::debug!(name = %weapon.name, lines = lines.len(), "Weapon name layout");
        for (index, line) in lines.iter().enumerate() {
            self.text(
                list,
                format!("weapon.name.{index}"),
                line.as_str(),
                (690.0, 32.0 + 25.0 * index as f32),
                Style::new(22),
            )?;
        }

        self.weapon_stats(list, weapon, weapon_stat_offset(lines.len()))
    }

    /// Stat, refinement and level pills under the weapon name.
    fn weapon_stats(&self, list: &mut PlacementList, weapon: &EquipmentSlot, offset: f32) -> Result<(), CardError> {
        let main = weapon.main_stat.stat_value().equipment_text();
        let w = self.measure(&main, 22)?.floor();
        let end = 690.0 + 55.0 + w;
        self.rect(
            list,
            "weapon.main.pill",
            BoundingBox::from_corners(690.0, 60.0 + offset, end, 95.0 + offset),
            PILL,
            4.0,
            ZLayer::Foreground,
        );
        self.scaled_icon(
            list,
            "weapon.main.icon",
            &Self::stat_icon(weapon.main_stat.kind),
            (695.0, 63.0 + offset),
            30,
            Some(IconOp::Brightness(2.0)),
            3,
            ZLayer::Text,
        )?;
        self.text(list, "weapon.main.text", main, (735.0, 65.0 + offset), Style::new(22))?;

        if let Some(bonus) = weapon.bonus_stat() {
            let text = bonus.stat_value().equipment_text();
            let w = self.measure(&text, 22)?.floor();
            self.rect(
                list,
                "weapon.bonus.pill",
                BoundingBox::from_corners(end + 10.0, 60.0 + offset, end + 65.0 + w, 95.0 + offset),
                PILL,
                4.0,
                ZLayer::Foreground,
            );
            self.scaled_icon(
                list,
                "weapon.bonus.icon",
                &Self::stat_icon(bonus.kind),
                (end + 15.0, 63.0 + offset),
                30,
                Some(IconOp::Brightness(2.0)),
                3,
                ZLayer::Text,
            )?;
            self.text(list, "weapon.bonus.text", text, (end + 55.0, 65.0 + offset), Style::new(22))?;
        }

        let refinement = weapon.refinement.unwrap_or_else(|| {
            tracing::debug!(name = %weapon.name, "No refinement for weapon, showing R1");
            1
        });
        let refinement = format!("R{refinement}");
        let end = 690.0 + 20.0 + self.measure(&refinement, 22)?.floor();
        self.rect(
            list,
            "weapon.refinement.pill",
            BoundingBox::from_corners(690.0, 105.0 + offset, end, 135.0 + offset),
            DARK_PILL,
            4.0,
            ZLayer::Foreground,
        );
        self.text(
            list,
            "weapon.refinement.text",
            refinement,
            (700.0, 107.0 + offset),
            Style::new(22).color(BEIGE),
        )?;

        let max_level = weapon.max_level.unwrap_or(weapon.level);
        let level = format!("Lv. {}/", weapon.level);
        let full = self.measure(&format!("{level}{max_level}"), 22)?.floor();
        self.rect(
            list,
            "weapon.level.pill",
            BoundingBox::from_corners(end + 10.0, 105.0 + offset, end + 30.0 + full, 135.0 + offset),
            DARK_PILL,
            4.0,
            ZLayer::Foreground,
        );
        let w = self.measure(&level, 22)?.floor();
        self.text(list, "weapon.level.text", level, (end + 20.0, 107.0 + offset), Style::new(22))?;
        self.text(
            list,
            "weapon.level.max",
            max_level.to_string(),
            (end + 20.0 + w, 107.0 + offset),
            Style::new(22).color(DIM_WHITE),
        )?;
        Ok(())
    }

    fn stat_rows(&self, list: &mut PlacementList, stats: &FormattedStats) -> Result<(), CardError> {
        let stride = stat_row_stride(stats.len());

        for (index, stat) in stats.stats.iter().enumerate() {
            let y = 180.0 + stride * index as f32;
            let prefix = format!("stat.{index}");

            self.scaled_icon(
                list,
                format!("{prefix}.icon"),
                &Self::stat_icon(stat.kind),
                (555.0, y),
                30,
                Some(IconOp::Brightness(2.0)),
                3,
                ZLayer::Foreground,
            )?;
            self.text(
                list,
                format!("{prefix}.label"),
                self.config.label(stat.kind),
                (603.0, y + 3.0),
                Style::new(20),
            )?;

            match &stat.decomposition {
                Some(parts) => {
                    let right = Style::new(20).anchor(TextAnchor::RightTop);
                    self.text(list, format!("{prefix}.value"), parts.current_text(), (967.0, y - 7.0), right)?;

                    let bonus = format!("+{}", parts.bonus_text());
                    let w = self.measure(&bonus, 12)?;
                    let small = Style::new(12).anchor(TextAnchor::RightTop);
                    self.text(list, format!("{prefix}.bonus"), bonus, (967.0, y + 15.0), small.color([150, 255, 169, 200]))?;
                    self.text(
                        list,
                        format!("{prefix}.base"),
                        parts.base_text(),
                        (967.0 - w - 5.0, y + 15.0),
                        small.color(SOFT_WHITE),
                    )?;
                }
                None => {
                    self.text(
                        list,
                        format!("{prefix}.value"),
                        stat.primary_text.as_str(),
                        (967.0, y + 3.0),
                        Style::new(20).anchor(TextAnchor::RightTop),
                    )?;
                }
            }
        }
        Ok(())
    }

    fn artifact(
        &self,
        list: &mut PlacementList,
        row: usize,
        piece: Option<&EquipmentSlot>,
    ) -> Result<(), CardError> {
        let dy = ARTIFACT_STRIDE * row as f32;
        let top = 14.0 + dy;
        let prefix = format!("artifact.{row}");

        let fill = if piece.is_some() { [0, 0, 0, 60] } else { [0, 0, 0, 25] };
        self.rect(
            list,
            format!("{prefix}.panel"),
            BoundingBox::from_corners(1009.0, top, 1449.0, top + 105.0),
            fill,
            5.0,
            ZLayer::Foreground,
        );

        let Some(piece) = piece else {
            tracing::debug!(slot = ?ARTIFACT_SLOTS[row], "Empty artifact slot");
            return Ok(());
        };

        self.icon(
            list,
            format!("{prefix}.icon"),
            &piece.icon,
            (1009.0, top, 106, 106),
            vec![
                IconOp::Resize { width: 190, height: 190 },
                IconOp::Mask {
                    asset: AssetRef::local(ARTIFACT_MASK),
                    invert: false,
                },
                IconOp::Crop {
                    x: 40,
                    y: 40,
                    width: 106,
                    height: 106,
                },
            ],
            1,
            ZLayer::Foreground,
        );

        list.push(Placement {
            id: format!("{prefix}.divider"),
            bounds: BoundingBox::from_corners(1174.0, top + 10.0, 1176.0, top + 95.0),
            layer: ZLayer::Text,
            paint: Paint::Line(LinePaint {
                from: (1175.0, top + 10.0),
                to: (1175.0, top + 95.0),
                color: [255, 255, 255, 25],
                width: 2.0,
            }),
        });

        self.scaled_icon(
            list,
            format!("{prefix}.main.icon"),
            &Self::stat_icon(piece.main_stat.kind),
            (1125.0, 25.0 + dy),
            30,
            Some(IconOp::Brightness(2.0)),
            3,
            ZLayer::Foreground,
        )?;
        self.text(
            list,
            format!("{prefix}.main.text"),
            piece.main_stat.stat_value().equipment_text(),
            (1150.0, 60.0 + dy),
            Style::new(27).anchor(TextAnchor::RightTop),
        )?;

        let level = format!("+{}", piece.level);
        let w = self.measure(&level, 12)?;
        self.rect(
            list,
            format!("{prefix}.level.badge"),
            BoundingBox::from_corners(1150.0 - w - 8.0, 90.0 + dy, 1150.0, 106.0 + dy),
            [0, 0, 0, 175],
            3.0,
            ZLayer::Foreground,
        );
        self.text(
            list,
            format!("{prefix}.level.text"),
            level,
            (1148.0, 92.0 + dy),
            Style::new(14).anchor(TextAnchor::RightTop),
        )?;

        let rarity = Self::rarity_icon(piece.rarity);
        self.scaled_icon(
            list,
            format!("{prefix}.rarity.shadow"),
            &rarity,
            (1035.0, 90.0 + dy),
            18,
            Some(IconOp::Brightness(0.0)),
            1,
            ZLayer::Text,
        )?;
        self.scaled_icon(list, format!("{prefix}.rarity"), &rarity, (1035.0, 88.0 + dy), 18, None, 1, ZLayer::Text)?;

        for (index, sub) in piece.sorted_sub_stats().iter().enumerate() {
            let (line, column) = (index % 2, index / 2);
            let x = 125.0 * column as f32;
            let y = dy + 45.0 * line as f32;

            self.scaled_icon(
                list,
                format!("{prefix}.sub.{index}.icon"),
                &Self::stat_icon(sub.kind),
                (1190.0 + x, 30.0 + y),
                30,
                Some(IconOp::Brightness(2.0)),
                1,
                ZLayer::Foreground,
            )?;
            self.text(
                list,
                format!("{prefix}.sub.{index}.text"),
                format!(" +{}", sub.stat_value().equipment_text()),
                (1220.0 + x, 32.0 + y),
                Style::new(20),
            )?;
        }
        Ok(())
    }

    fn set_banner(&self, list: &mut PlacementList, artifacts: &[EquipmentSlot]) -> Result<(), CardError> {
        self.rect(
            list,
            "sets.frame",
            BoundingBox::from_corners(555.0, 547.0, 603.0, 595.0),
            BANNER_FILL,
            5.0,
            ZLayer::Foreground,
        );
        self.icon(
            list,
            "sets.flower",
            &AssetRef::local(FLOWER_OF_LIFE),
            (562.0, 555.0, 35, 35),
            vec![IconOp::Resize { width: 35, height: 35 }],
            1,
            ZLayer::Foreground,
        );

        let active = active_set_bonuses(artifacts);
        tracing::debug!(sets = active.len(), "Set bonus banner");
        let centered = Style::new(17).anchor(TextAnchor::MiddleMiddle);

        if active.len() > 1 {
            for (index, set) in active.iter().take(2).enumerate() {
                let dy = 25.0 * index as f32;
                self.text(list, format!("sets.{index}.name"), set.name.as_str(), (770.0, 560.0 + dy), centered.color(GREEN))?;
                self.rect(
                    list,
                    format!("sets.{index}.badge"),
                    BoundingBox::from_corners(935.0, 548.0 + dy, 965.0, 569.0 + dy),
                    BANNER_FILL,
                    3.0,
                    ZLayer::Foreground,
                );
                self.text(list, format!("sets.{index}.count"), set.count.to_string(), (951.0, 560.0 + dy), centered)?;
            }
            return Ok(());
        }

        let (name, count) = match active.first() {
            Some(set) => (set.name.clone(), set.count.to_string()),
            None => (self.config.no_bonus_label.clone(), String::from("0")),
        };
        self.rect(
            list,
            "sets.0.badge",
            BoundingBox::from_corners(935.0, 560.0, 965.0, 581.0),
            BANNER_FILL,
            3.0,
            ZLayer::Foreground,
        );
        self.text(list, "sets.0.name", name, (770.0, 572.0), centered.color(GREEN))?;
        self.text(list, "sets.0.count", count, (951.0, 571.0), centered)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("Sword", 20), vec!["Sword"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap_text("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(lines, vec!["abcdefghij", "klmnopqrst", "uvwxyz"]);
    }

    #[test]
    fn test_wrap_lines_fit() {
        let name = "The Catch of the Mistsplitter Reforged Everlasting Moonglow";
        for line in wrap_text(name, 20) {
            assert!(line.chars().count() <= 20, "{line:?}");
            assert!(!line.starts_with(' '));
        }
    }

    #[test]
    fn test_weapon_offset_increments() {
        assert_eq!(weapon_stat_offset(0), 5.0);
        assert_eq!(weapon_stat_offset(2) - weapon_stat_offset(1), 28.0);
    }

    #[test]
    fn test_stat_stride_uses_integer_division() {
        assert_eq!(stat_row_stride(7), 52.0);
        assert_eq!(stat_row_stride(0), 0.0);
    }
}
