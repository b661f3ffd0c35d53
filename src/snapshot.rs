//! Character snapshot module.
//!
//! A `CharacterSnapshot` is the read-only, point-in-time view of one
//! character that a render call consumes. It is built once by an external
//! data collaborator (usually from JSON) and never mutated by the card
//! pipeline.

use crate::equipment::EquipmentSlot;
use crate::error::CardError;
use crate::numeric::StatValue;
use crate::stat_kind::{Element, StatKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference to an image asset.
///
/// `path` is a logical path relative to the asset root; `url` is where the
/// asset can be downloaded from when it is not cached yet. Bundled UI assets
/// have no url.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef {
    pub path: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl AssetRef {
    /// A bundled asset with no remote source.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: None,
        }
    }

    /// An asset that is downloaded on first use.
    pub fn remote(path: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            url: Some(url.into()),
        }
    }
}

/// The account that owns the character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub uid: u64,
    pub nickname: String,
    pub world_level: u32,
    pub adventure_rank: u32,
}

/// One constellation node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstellationSlot {
    pub icon: AssetRef,
    pub unlocked: bool,
}

/// One talent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSlot {
    pub icon: AssetRef,
    pub level: u32,
    /// Level raised by a constellation; drawn with a highlighted badge.
    #[serde(default)]
    pub boosted: bool,
}

/// Character-sheet stats.
///
/// Maps each stat kind to its value. HP, ATK and DEF additionally record a
/// base value so the card can show `current (base + bonus)`.
///
/// # Examples
///
/// ```rust
/// use buildcard::{StatBlock, StatKind};
///
/// let stats = StatBlock::new()
///     .with_base(StatKind::Hp, 15_552.0, 10_875.0)
///     .with(StatKind::CritRate, 62.1);
///
/// assert_eq!(stats.base(StatKind::Hp), Some(10_875.0));
/// assert_eq!(stats.get(StatKind::CritRate).unwrap().to_string(), "62.1%");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(default)]
    values: BTreeMap<StatKind, StatValue>,
    #[serde(default)]
    base: BTreeMap<StatKind, f64>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a stat using the kind's default unit.
    pub fn with(mut self, kind: StatKind, value: f64) -> Self {
        self.insert(
            kind,
            StatValue {
                value,
                unit: kind.default_unit(),
            },
        );
        self
    }

    /// Set a stat together with its base value.
    pub fn with_base(mut self, kind: StatKind, current: f64, base: f64) -> Self {
        self.insert(kind, StatValue::flat(current));
        self.base.insert(kind, base);
        self
    }

    pub fn insert(&mut self, kind: StatKind, value: StatValue) {
        self.values.insert(kind, value);
    }

    pub fn get(&self, kind: StatKind) -> Option<StatValue> {
        self.values.get(&kind).copied()
    }

    pub fn base(&self, kind: StatKind) -> Option<f64> {
        self.base.get(&kind).copied()
    }

    /// Iterate over all stats in display priority order.
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, StatValue)> + '_ {
        self.values.iter().map(|(kind, value)| (*kind, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything a card shows about one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub name: String,
    pub element: Element,
    pub level: u32,
    pub max_level: u32,
    pub friendship_level: u32,
    pub player: PlayerInfo,
    /// Gacha banner art drawn behind the left half of the card.
    pub banner: AssetRef,
    #[serde(default)]
    pub constellations: Vec<ConstellationSlot>,
    #[serde(default)]
    pub skills: Vec<SkillSlot>,
    pub stats: StatBlock,
    #[serde(default)]
    pub equipment: Vec<EquipmentSlot>,
}

impl CharacterSnapshot {
    /// Decode a snapshot from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, CardError> {
        serde_json::from_str(json).map_err(|e| CardError::InvalidInput(e.to_string()))
    }

    /// Number of unlocked constellations.
    ///
    /// Slots are drawn locked when their index is at or beyond this count.
    pub fn unlocked_constellations(&self) -> usize {
        self.constellations.iter().filter(|c| c.unlocked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_kind::StatUnit;

    #[test]
    fn test_stat_block_default_units() {
        let stats = StatBlock::new()
            .with(StatKind::ElementalMastery, 120.0)
            .with(StatKind::EnergyRecharge, 140.2);

        assert_eq!(
            stats.get(StatKind::ElementalMastery).unwrap().unit,
            StatUnit::Flat
        );
        assert_eq!(
            stats.get(StatKind::EnergyRecharge).unwrap().unit,
            StatUnit::Percent
        );
        assert_eq!(stats.get(StatKind::CritRate), None);
    }

    #[test]
    fn test_stat_block_iterates_in_priority_order() {
        let stats = StatBlock::new()
            .with(StatKind::PhysicalDamageBonus, 10.0)
            .with(StatKind::CritRate, 5.0)
            .with_base(StatKind::Hp, 100.0, 90.0);

        let kinds: Vec<_> = stats.iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![StatKind::Hp, StatKind::CritRate, StatKind::PhysicalDamageBonus]
        );
    }

    #[test]
    fn test_stat_block_json_keys() {
        let stats = StatBlock::new().with(StatKind::CritRate, 5.0);
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("FIGHT_PROP_CRITICAL"));

        let back: StatBlock = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_snapshot_rejects_bad_json() {
        let err = CharacterSnapshot::from_json_str("{\"name\": 3}").unwrap_err();
        assert!(matches!(err, CardError::InvalidInput(_)));
    }
}
