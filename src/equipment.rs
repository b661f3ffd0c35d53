//! Equipment module.
//!
//! Weapons and artifacts share one `EquipmentSlot` shape. The weapon uses
//! `refinement` and at most one sub-stat (its bonus stat); artifacts use
//! `set_name` and up to four sub-stats.

use crate::numeric::StatValue;
use crate::snapshot::AssetRef;
use crate::stat_kind::{StatKind, StatUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum sub-stats an artifact can roll.
pub const MAX_SUB_STATS: usize = 4;

/// Where a piece of equipment is worn.
///
/// Unrecognized slot identifiers decode to `Unknown`; the layout engine
/// rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    #[serde(rename = "EQUIP_BRACER")]
    Flower,
    #[serde(rename = "EQUIP_NECKLACE")]
    Plume,
    #[serde(rename = "EQUIP_SHOES")]
    Sands,
    #[serde(rename = "EQUIP_RING")]
    Goblet,
    #[serde(rename = "EQUIP_DRESS")]
    Circlet,
    #[serde(rename = "EQUIP_WEAPON")]
    Weapon,
    #[serde(other)]
    Unknown,
}

/// The five artifact positions, in panel order.
pub const ARTIFACT_SLOTS: [SlotKind; 5] = [
    SlotKind::Flower,
    SlotKind::Plume,
    SlotKind::Sands,
    SlotKind::Goblet,
    SlotKind::Circlet,
];

impl SlotKind {
    /// Panel row of an artifact position, `None` for anything else.
    pub fn artifact_index(self) -> Option<usize> {
        ARTIFACT_SLOTS.iter().position(|slot| *slot == self)
    }
}

/// A stat line on a piece of equipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipStat {
    pub kind: StatKind,
    pub value: f64,
    pub unit: StatUnit,
}

impl EquipStat {
    pub fn new(kind: StatKind, value: f64, unit: StatUnit) -> Self {
        Self { kind, value, unit }
    }

    pub fn stat_value(&self) -> StatValue {
        StatValue {
            value: self.value,
            unit: self.unit,
        }
    }
}

/// One equipped weapon or artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSlot {
    pub slot: SlotKind,
    pub name: String,
    pub rarity: u8,
    pub level: u32,
    /// Level cap; only drawn for weapons.
    #[serde(default)]
    pub max_level: Option<u32>,
    pub icon: AssetRef,
    pub main_stat: EquipStat,
    #[serde(default)]
    pub sub_stats: Vec<EquipStat>,
    #[serde(default)]
    pub set_name: Option<String>,
    /// Weapon refinement rank, 1 to 5.
    #[serde(default)]
    pub refinement: Option<u8>,
}

impl EquipmentSlot {
    pub fn is_weapon(&self) -> bool {
        self.slot == SlotKind::Weapon
    }

    /// The weapon's secondary stat.
    pub fn bonus_stat(&self) -> Option<&EquipStat> {
        self.sub_stats.first()
    }

    /// Sub-stats in canonical order, at most four.
    ///
    /// The sort is stable, so kinds outside the canonical table keep their
    /// source order after the listed ones.
    pub fn sorted_sub_stats(&self) -> Vec<EquipStat> {
        let mut subs = self.sub_stats.clone();
        subs.sort_by_key(|stat| stat.kind.sub_stat_rank());
        subs.truncate(MAX_SUB_STATS);
        subs
    }
}

/// A set with at least two equipped pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSetBonus {
    pub name: String,
    pub count: usize,
}

/// Count equipped pieces per set name and keep the sets with two or more.
///
/// The result is sorted by set name. Pieces without a set name (the weapon)
/// are ignored.
///
/// # Examples
///
/// ```rust
/// use buildcard::equipment::active_set_bonuses;
///
/// assert!(active_set_bonuses(&[]).is_empty());
/// ```
pub fn active_set_bonuses(equipment: &[EquipmentSlot]) -> Vec<ActiveSetBonus> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for piece in equipment {
        if let Some(set) = piece.set_name.as_deref() {
            *counts.entry(set).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|(name, count)| ActiveSetBonus {
            name: name.to_string(),
            count,
        })
        .collect()
}
