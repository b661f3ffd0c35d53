//! # buildcard - Deterministic Character Build Card Renderer
//!
//! Renders a fixed-layout card summarizing one game character: stats,
//! weapon, artifacts, talents and constellations. The crate provides:
//! - **Bounded** stat selection (HP/ATK/DEF always shown, at most 8 rows)
//! - **Deterministic** layout (same snapshot and assets → same placements)
//! - **Layered** composition (background, foreground and text layers)
//! - **Pluggable** collaborators for fonts and image assets
//!
//! ## Pipeline
//!
//! ```text
//! [CharacterSnapshot] → [StatFormatter] → [LayoutEngine] → [Compositor] → bitmap
//! ```
//!
//! 1. **StatFormatter** reduces the stat block to display rows
//! 2. **LayoutEngine** turns snapshot, equipment and rows into a `PlacementList`
//! 3. **Compositor** paints the placements with images from an `AssetProvider`
//!
//! ## Example
//!
//! ```rust
//! use buildcard::*;
//!
//! let stats = StatBlock::new()
//!     .with_base(StatKind::Hp, 15_552.0, 10_875.0)
//!     .with_base(StatKind::Atk, 2_180.0, 1_050.0)
//!     .with_base(StatKind::Def, 876.0, 683.0)
//!     .with(StatKind::CritRate, 62.1)
//!     .with(StatKind::CritDamage, 184.4)
//!     .with(StatKind::HealingBonus, 0.0);
//!
//! let formatted = StatFormatter::new().format(&stats, Element::Pyro).unwrap();
//! assert_eq!(formatted.kinds(), vec![
//!     StatKind::Hp, StatKind::Atk, StatKind::Def,
//!     StatKind::CritRate, StatKind::CritDamage,
//! ]);
//! assert_eq!(formatted.stats[0].primary_text, "15,552 (10,875 + 4,677)");
//! ```
//!
//! A full render needs a `FontProvider` and an `AssetProvider`; see
//! [`render::render_card`].
//!
//! ## Modules
//!
//! - [`stat_kind`] - Stat kinds, elements and the canonical orders
//! - [`numeric`] - Stat values and number formatting
//! - [`snapshot`] - Character snapshot input
//! - [`equipment`] - Weapon/artifact slots and set bonuses
//! - [`display`] - Formatted stat rows
//! - [`formatter`] - Stat selection and bounding
//! - [`placement`] - Layout output
//! - [`layout`] - Layout engine
//! - [`font`] - Font interface
//! - [`asset`] - Asset providers and the disk cache
//! - [`compositor`] - Layer painting
//! - [`render`] - End-to-end render call
//! - [`config`] - Render configuration
//! - [`error`] - Error and diagnostic types

pub mod asset;
pub mod compositor;
pub mod config;
pub mod display;
pub mod equipment;
pub mod error;
pub mod font;
pub mod formatter;
pub mod layout;
pub mod numeric;
pub mod placement;
pub mod render;
pub mod snapshot;
pub mod stat_kind;

// Re-export main types for convenience
pub use asset::{AssetProvider, DiskAssetCache, MemoryAssets, RemoteFetcher};
pub use config::{CardConfig, OverflowPolicy};
pub use display::{Decomposition, DisplayStat, FormattedStats};
pub use equipment::{ActiveSetBonus, EquipStat, EquipmentSlot, SlotKind};
pub use error::{CardError, Diagnostic};
pub use font::{Font, FontHandle, FontProvider};
pub use formatter::StatFormatter;
pub use layout::LayoutEngine;
pub use numeric::StatValue;
pub use placement::{Placement, PlacementKind, PlacementList, ZLayer};
pub use render::{render_card, RenderedCard};
pub use snapshot::{AssetRef, CharacterSnapshot, ConstellationSlot, PlayerInfo, SkillSlot, StatBlock};
pub use stat_kind::{Element, StatKind, StatUnit};
