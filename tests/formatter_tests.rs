use buildcard::stat_kind::{MANDATORY_STATS, RELIQUARY_STATS};
use buildcard::*;

fn mandatory() -> StatBlock {
    StatBlock::new()
        .with_base(StatKind::Hp, 15_552.49, 10_874.51)
        .with_base(StatKind::Atk, 2_180.6, 1_050.2)
        .with_base(StatKind::Def, 876.0, 683.0)
}

/// Rebuild a stat block holding only the rows a formatter kept.
fn rebuild(original: &StatBlock, formatted: &FormattedStats) -> StatBlock {
    let mut block = StatBlock::new();
    for kind in formatted.kinds() {
        let value = original.get(kind).unwrap();
        match original.base(kind) {
            Some(base) => block = block.with_base(kind, value.value, base),
            None => block.insert(kind, value),
        }
    }
    block
}

/// Three identical damage bonuses, one of them the character's own element.
#[test]
fn test_identical_bonuses_keep_foreign_element() {
    let stats = mandatory()
        .with(StatKind::ElementalMastery, 100.0)
        .with(StatKind::CritRate, 70.2)
        .with(StatKind::CritDamage, 140.0)
        .with(StatKind::EnergyRecharge, 111.0)
        .with(StatKind::HealingBonus, 15.0)
        .with(StatKind::ShieldStrength, 35.0)
        .with(StatKind::PyroDamageBonus, 46.6)
        .with(StatKind::HydroDamageBonus, 46.6)
        .with(StatKind::CryoDamageBonus, 46.6);

    let formatted = StatFormatter::new().format(&stats, Element::Pyro).unwrap();

    let bonuses: Vec<_> = formatted
        .kinds()
        .into_iter()
        .filter(|kind| kind.is_damage_bonus())
        .collect();
    assert_eq!(bonuses, vec![StatKind::HydroDamageBonus]);
    assert!(formatted.len() <= 8);
    assert!(formatted.diagnostics.is_empty());
    assert_eq!(formatted.get(StatKind::HydroDamageBonus).unwrap().primary_text, "46.6%");
}

/// When every identical bonus is the own element, the first one stays.
#[test]
fn test_identical_bonuses_fall_back_to_first() {
    let stats = mandatory()
        .with(StatKind::ElementalMastery, 100.0)
        .with(StatKind::CritRate, 70.2)
        .with(StatKind::CritDamage, 140.0)
        .with(StatKind::EnergyRecharge, 111.0)
        .with(StatKind::PhysicalDamageBonus, 25.0)
        .with(StatKind::GeoDamageBonus, 25.0);

    // Nine rows; Geo is the character element, so Physical is kept.
    let formatted = StatFormatter::new().format(&stats, Element::Geo).unwrap();
    assert_eq!(formatted.len(), 8);
    assert!(formatted.get(StatKind::PhysicalDamageBonus).is_some());
    assert!(formatted.get(StatKind::GeoDamageBonus).is_none());

    let only_own = mandatory()
        .with(StatKind::ElementalMastery, 100.0)
        .with(StatKind::CritRate, 70.2)
        .with(StatKind::CritDamage, 140.0)
        .with(StatKind::EnergyRecharge, 111.0)
        .with(StatKind::GeoDamageBonus, 25.0)
        .with(StatKind::HealingBonus, 10.0);
    let formatted = StatFormatter::new().format(&only_own, Element::Geo).unwrap();
    assert_eq!(formatted.len(), 8);
    assert!(formatted.get(StatKind::GeoDamageBonus).is_some());
}

/// Formatting the formatter's own output changes nothing.
#[test]
fn test_reduction_is_idempotent() {
    let stats = mandatory()
        .with(StatKind::ElementalMastery, 100.0)
        .with(StatKind::CritRate, 70.2)
        .with(StatKind::CritDamage, 140.0)
        .with(StatKind::EnergyRecharge, 111.0)
        .with(StatKind::HealingBonus, 15.0)
        .with(StatKind::PyroDamageBonus, 12.0)
        .with(StatKind::ElectroDamageBonus, 46.6)
        .with(StatKind::PhysicalDamageBonus, 30.0);

    let formatter = StatFormatter::new();
    let first = formatter.format(&stats, Element::Electro).unwrap();
    let second = formatter
        .format(&rebuild(&stats, &first), Element::Electro)
        .unwrap();

    assert_eq!(first, second);
}

/// Mandatory rows always decompose exactly.
#[test]
fn test_decomposition_holds_after_rounding() {
    let formatted = StatFormatter::new().format(&mandatory(), Element::Pyro).unwrap();
    for row in &formatted.stats {
        let parts = row.decomposition.unwrap();
        assert_eq!(parts.current, parts.base + parts.bonus);
    }
    assert_eq!(formatted.stats[0].primary_text, "15,552 (10,875 + 4,677)");
    assert_eq!(formatted.stats[1].primary_text, "2,181 (1,050 + 1,131)");
}

/// Every subset of reliquary stats formats to 3..=8 rows, mandatory rows
/// first, in priority order.
#[test]
fn test_length_bounds_over_many_inputs() {
    let formatter = StatFormatter::new();
    let elements = [Element::Pyro, Element::Hydro, Element::Anemo, Element::Unknown];

    for mask in 0u32..(1 << RELIQUARY_STATS.len()) {
        let mut stats = mandatory().with(StatKind::ElementalMastery, (mask % 3) as f64 * 40.0);
        for (bit, kind) in RELIQUARY_STATS.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                let value = ((mask as usize * 7 + bit * 13) % 5) as f64 * 11.5 + 1.0;
                stats = stats.with(*kind, value);
            }
        }

        let element = elements[mask as usize % elements.len()];
        let formatted = formatter.format(&stats, element).unwrap();

        assert!((3..=8).contains(&formatted.len()), "mask {mask}: {}", formatted.len());
        assert!(formatted.diagnostics.is_empty(), "mask {mask}");
        assert_eq!(&formatted.kinds()[..3], &MANDATORY_STATS[..]);

        let priorities: Vec<_> = formatted.kinds().iter().map(|k| k.priority()).collect();
        assert!(priorities.windows(2).all(|w| w[0] < w[1]), "mask {mask}");
    }
}

/// A budget too small for the non-bonus rows is reported; the single
/// remaining bonus is kept through the collapse and then truncated away.
#[test]
fn test_overflow_reported_with_small_budget() {
    let stats = mandatory()
        .with(StatKind::ElementalMastery, 100.0)
        .with(StatKind::CritRate, 70.2)
        .with(StatKind::CritDamage, 140.0)
        .with(StatKind::EnergyRecharge, 111.0)
        .with(StatKind::AnemoDamageBonus, 46.6);

    let config = CardConfig::from_json_str(r#"{ "max_stats": 6 }"#).unwrap();
    let formatted = StatFormatter::from_config(&config)
        .format(&stats, Element::Anemo)
        .unwrap();

    assert_eq!(formatted.len(), 6);
    assert!(formatted.overflowed());
    assert_eq!(
        formatted.diagnostics[0],
        Diagnostic::LayoutOverflow {
            limit: 6,
            len: 8,
            dropped: vec![StatKind::EnergyRecharge, StatKind::AnemoDamageBonus],
        }
    );
}

/// Snapshots decode from the game's property identifiers.
#[test]
fn test_snapshot_json_feeds_formatter() {
    let json = r#"{
        "name": "Xiangling",
        "element": "Pyro",
        "level": 90,
        "max_level": 90,
        "friendship_level": 10,
        "player": { "uid": 1, "nickname": "P", "world_level": 8, "adventure_rank": 60 },
        "banner": { "path": "Genshin/Gacha/xiangling.png", "url": "https://example.invalid/x.png" },
        "stats": {
            "values": {
                "FIGHT_PROP_HP": { "value": 15000.0, "unit": "flat" },
                "FIGHT_PROP_ATTACK": { "value": 1800.0, "unit": "flat" },
                "FIGHT_PROP_DEFENSE": { "value": 700.0, "unit": "flat" },
                "FIGHT_PROP_CHARGE_EFFICIENCY": { "value": 230.1, "unit": "percent" }
            },
            "base": {
                "FIGHT_PROP_HP": 10875.0,
                "FIGHT_PROP_ATTACK": 800.0,
                "FIGHT_PROP_DEFENSE": 669.0
            }
        }
    }"#;

    let snapshot = CharacterSnapshot::from_json_str(json).unwrap();
    let formatted = StatFormatter::new()
        .format(&snapshot.stats, snapshot.element)
        .unwrap();

    assert_eq!(formatted.len(), 4);
    assert_eq!(formatted.stats[3].kind, StatKind::EnergyRecharge);
    assert_eq!(formatted.stats[3].primary_text, "230.1%");
    assert!(snapshot.equipment.is_empty());
}
