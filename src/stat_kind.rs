//! Stat kind module.
//!
//! Provides the closed `StatKind` enum that names every attribute a card can
//! display, together with the canonical ordering tables used to make stat and
//! sub-stat display deterministic regardless of source order.
//!
//! Kinds serialize with the game's property identifiers (`FIGHT_PROP_*`), so
//! snapshots produced by an external fetcher can be decoded directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit a stat value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatUnit {
    /// Plain number, displayed as a grouped integer.
    Flat,
    /// Percentage points, displayed with one decimal and a `%` suffix.
    Percent,
}

/// Character element.
///
/// Unknown element names decode to `Element::Unknown`, which tints the card
/// with the translucent white default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Pyro,
    Hydro,
    Dendro,
    Electro,
    Anemo,
    Cryo,
    Geo,
    #[serde(other)]
    Unknown,
}

impl Element {
    /// The damage-bonus stat matching this element, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use buildcard::{Element, StatKind};
    ///
    /// assert_eq!(Element::Pyro.damage_bonus(), Some(StatKind::PyroDamageBonus));
    /// assert_eq!(Element::Unknown.damage_bonus(), None);
    /// ```
    pub fn damage_bonus(self) -> Option<StatKind> {
        match self {
            Element::Pyro => Some(StatKind::PyroDamageBonus),
            Element::Hydro => Some(StatKind::HydroDamageBonus),
            Element::Dendro => Some(StatKind::DendroDamageBonus),
            Element::Electro => Some(StatKind::ElectroDamageBonus),
            Element::Anemo => Some(StatKind::AnemoDamageBonus),
            Element::Cryo => Some(StatKind::CryoDamageBonus),
            Element::Geo => Some(StatKind::GeoDamageBonus),
            Element::Unknown => None,
        }
    }

    /// Background tint for this element as RGBA.
    ///
    /// Known elements are opaque; `Unknown` falls back to translucent white.
    pub fn tint(self) -> [u8; 4] {
        match self {
            Element::Pyro => [186, 140, 131, 255],
            Element::Hydro => [132, 161, 198, 255],
            Element::Dendro => [45, 142, 52, 255],
            Element::Electro => [152, 118, 173, 255],
            Element::Anemo => [82, 176, 177, 255],
            Element::Cryo => [70, 168, 186, 255],
            Element::Geo => [187, 159, 75, 255],
            Element::Unknown => [255, 255, 255, 50],
        }
    }
}

/// Every attribute a card can show.
///
/// The declaration order of the character-sheet kinds (`Hp` through
/// `PhysicalDamageBonus`) is the canonical display priority, so the derived
/// `Ord` sorts stats the way the card lists them. The three percentage
/// variants at the end only appear on equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKind {
    #[serde(rename = "FIGHT_PROP_HP", alias = "FIGHT_PROP_BASE_HP")]
    Hp,
    #[serde(rename = "FIGHT_PROP_ATTACK", alias = "FIGHT_PROP_BASE_ATTACK")]
    Atk,
    #[serde(rename = "FIGHT_PROP_DEFENSE", alias = "FIGHT_PROP_BASE_DEFENSE")]
    Def,
    #[serde(rename = "FIGHT_PROP_ELEMENT_MASTERY")]
    ElementalMastery,
    #[serde(rename = "FIGHT_PROP_CRITICAL")]
    CritRate,
    #[serde(rename = "FIGHT_PROP_CRITICAL_HURT")]
    CritDamage,
    #[serde(rename = "FIGHT_PROP_CHARGE_EFFICIENCY")]
    EnergyRecharge,
    #[serde(rename = "FIGHT_PROP_HEAL_ADD")]
    HealingBonus,
    #[serde(rename = "FIGHT_PROP_SHIELD_COST_MINUS_RATIO")]
    ShieldStrength,
    #[serde(rename = "FIGHT_PROP_FIRE_ADD_HURT")]
    PyroDamageBonus,
    #[serde(rename = "FIGHT_PROP_ELEC_ADD_HURT")]
    ElectroDamageBonus,
    #[serde(rename = "FIGHT_PROP_WATER_ADD_HURT")]
    HydroDamageBonus,
    #[serde(rename = "FIGHT_PROP_GRASS_ADD_HURT")]
    DendroDamageBonus,
    #[serde(rename = "FIGHT_PROP_WIND_ADD_HURT")]
    AnemoDamageBonus,
    #[serde(rename = "FIGHT_PROP_ROCK_ADD_HURT")]
    GeoDamageBonus,
    #[serde(rename = "FIGHT_PROP_ICE_ADD_HURT")]
    CryoDamageBonus,
    #[serde(rename = "FIGHT_PROP_PHYSICAL_ADD_HURT")]
    PhysicalDamageBonus,
    #[serde(rename = "FIGHT_PROP_HP_PERCENT")]
    HpPercent,
    #[serde(rename = "FIGHT_PROP_ATTACK_PERCENT")]
    AtkPercent,
    #[serde(rename = "FIGHT_PROP_DEFENSE_PERCENT")]
    DefPercent,
}

/// Stats that are always shown and carry a base/bonus decomposition.
pub const MANDATORY_STATS: [StatKind; 3] = [StatKind::Hp, StatKind::Atk, StatKind::Def];

/// Artifact-contributed stats considered after the mandatory ones and
/// elemental mastery, in display priority.
pub const RELIQUARY_STATS: [StatKind; 13] = [
    StatKind::CritRate,
    StatKind::CritDamage,
    StatKind::EnergyRecharge,
    StatKind::HealingBonus,
    StatKind::ShieldStrength,
    StatKind::PyroDamageBonus,
    StatKind::ElectroDamageBonus,
    StatKind::HydroDamageBonus,
    StatKind::DendroDamageBonus,
    StatKind::AnemoDamageBonus,
    StatKind::GeoDamageBonus,
    StatKind::CryoDamageBonus,
    StatKind::PhysicalDamageBonus,
];

/// Canonical artifact sub-stat order. Sub-stats are placed in the 2x2 grid
/// by their index in this table, never by roll order.
pub const SUB_STAT_ORDER: [StatKind; 10] = [
    StatKind::CritRate,
    StatKind::CritDamage,
    StatKind::AtkPercent,
    StatKind::HpPercent,
    StatKind::DefPercent,
    StatKind::EnergyRecharge,
    StatKind::ElementalMastery,
    StatKind::Atk,
    StatKind::Hp,
    StatKind::Def,
];

impl StatKind {
    /// Position in the display priority order.
    pub fn priority(self) -> usize {
        self as usize
    }

    /// Sort key for artifact sub-stats.
    ///
    /// Kinds missing from `SUB_STAT_ORDER` sort after every listed kind and
    /// keep their relative order under a stable sort.
    pub fn sub_stat_rank(self) -> usize {
        SUB_STAT_ORDER
            .iter()
            .position(|kind| *kind == self)
            .unwrap_or(SUB_STAT_ORDER.len())
    }

    /// Whether this is one of the eight damage-bonus kinds.
    pub fn is_damage_bonus(self) -> bool {
        matches!(
            self,
            StatKind::PyroDamageBonus
                | StatKind::ElectroDamageBonus
                | StatKind::HydroDamageBonus
                | StatKind::DendroDamageBonus
                | StatKind::AnemoDamageBonus
                | StatKind::GeoDamageBonus
                | StatKind::CryoDamageBonus
                | StatKind::PhysicalDamageBonus
        )
    }

    /// Unit a character-sheet value of this kind is expressed in.
    pub fn default_unit(self) -> StatUnit {
        match self {
            StatKind::Hp | StatKind::Atk | StatKind::Def | StatKind::ElementalMastery => {
                StatUnit::Flat
            }
            _ => StatUnit::Percent,
        }
    }

    /// File stem of the icon drawn next to this stat.
    pub fn icon_name(self) -> &'static str {
        match self {
            StatKind::Hp => "HP",
            StatKind::Atk => "ATTACK",
            StatKind::Def => "DEFENSE",
            StatKind::HpPercent => "HP_PERCENT",
            StatKind::AtkPercent => "ATTACK_PERCENT",
            StatKind::DefPercent => "DEFENSE_PERCENT",
            StatKind::ElementalMastery => "ELEMENT_MASTERY",
            StatKind::CritRate => "CRITICAL",
            StatKind::CritDamage => "CRITICAL_HURT",
            StatKind::EnergyRecharge => "CHARGE_EFFICIENCY",
            StatKind::HealingBonus => "HEAL_ADD",
            StatKind::ShieldStrength => "SHIELD_COST_MINUS_RATIO",
            StatKind::PyroDamageBonus => "PYRO",
            StatKind::ElectroDamageBonus => "ELECTRO",
            StatKind::HydroDamageBonus => "HYDRO",
            StatKind::DendroDamageBonus => "DENDRO",
            StatKind::AnemoDamageBonus => "ANEMO",
            StatKind::GeoDamageBonus => "GEO",
            StatKind::CryoDamageBonus => "CRYO",
            StatKind::PhysicalDamageBonus => "PHYSICAL_ADD_HURT",
        }
    }

    /// Built-in English label.
    pub fn label(self) -> &'static str {
        match self {
            StatKind::Hp | StatKind::HpPercent => "HP",
            StatKind::Atk | StatKind::AtkPercent => "ATK",
            StatKind::Def | StatKind::DefPercent => "DEF",
            StatKind::ElementalMastery => "Elemental Mastery",
            StatKind::CritRate => "CRIT Rate",
            StatKind::CritDamage => "CRIT DMG",
            StatKind::EnergyRecharge => "Energy Recharge",
            StatKind::HealingBonus => "Healing Bonus",
            StatKind::ShieldStrength => "Shield Strength",
            StatKind::PyroDamageBonus => "Pyro DMG Bonus",
            StatKind::ElectroDamageBonus => "Electro DMG Bonus",
            StatKind::HydroDamageBonus => "Hydro DMG Bonus",
            StatKind::DendroDamageBonus => "Dendro DMG Bonus",
            StatKind::AnemoDamageBonus => "Anemo DMG Bonus",
            StatKind::GeoDamageBonus => "Geo DMG Bonus",
            StatKind::CryoDamageBonus => "Cryo DMG Bonus",
            StatKind::PhysicalDamageBonus => "Physical DMG Bonus",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
