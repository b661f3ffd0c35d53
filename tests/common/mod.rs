//! Shared fixtures: a complete snapshot and an in-memory asset set that
//! covers every path the layout references.

#![allow(dead_code)]

use buildcard::equipment::ARTIFACT_SLOTS;
use buildcard::stat_kind::{MANDATORY_STATS, RELIQUARY_STATS, SUB_STAT_ORDER};
use buildcard::*;
use image::{Rgba, RgbaImage};

pub const CANVAS: (u32, u32) = (1460, 610);
pub const BACKGROUND_GRAY: [u8; 4] = [128, 128, 128, 255];

pub fn weapon(name: &str) -> EquipmentSlot {
    EquipmentSlot {
        slot: SlotKind::Weapon,
        name: name.to_string(),
        rarity: 5,
        level: 90,
        max_level: Some(90),
        icon: AssetRef::local("Genshin/Weapon/weapon.png"),
        main_stat: EquipStat::new(StatKind::Atk, 608.0, StatUnit::Flat),
        sub_stats: vec![EquipStat::new(StatKind::CritRate, 33.1, StatUnit::Percent)],
        set_name: None,
        refinement: Some(1),
    }
}

pub fn artifact(slot: SlotKind, set: &str, sub_stats: Vec<EquipStat>) -> EquipmentSlot {
    EquipmentSlot {
        slot,
        name: format!("{set} {slot:?}"),
        rarity: 5,
        level: 20,
        max_level: None,
        icon: AssetRef::local(format!("Genshin/Artifact/{slot:?}.png")),
        main_stat: EquipStat::new(StatKind::Hp, 4780.0, StatUnit::Flat),
        sub_stats,
        set_name: Some(set.to_string()),
        refinement: None,
    }
}

pub fn default_subs() -> Vec<EquipStat> {
    vec![
        EquipStat::new(StatKind::Def, 19.0, StatUnit::Flat),
        EquipStat::new(StatKind::CritDamage, 21.8, StatUnit::Percent),
        EquipStat::new(StatKind::EnergyRecharge, 11.0, StatUnit::Percent),
        EquipStat::new(StatKind::CritRate, 3.9, StatUnit::Percent),
    ]
}

pub fn stats() -> StatBlock {
    StatBlock::new()
        .with_base(StatKind::Hp, 18_234.0, 10_875.0)
        .with_base(StatKind::Atk, 2_106.0, 986.0)
        .with_base(StatKind::Def, 876.0, 683.0)
        .with(StatKind::ElementalMastery, 120.0)
        .with(StatKind::CritRate, 62.1)
        .with(StatKind::CritDamage, 184.4)
        .with(StatKind::EnergyRecharge, 130.5)
        .with(StatKind::PyroDamageBonus, 61.6)
}

pub fn equipment(weapon_name: &str, sets: [&str; 5]) -> Vec<EquipmentSlot> {
    let mut pieces: Vec<EquipmentSlot> = ARTIFACT_SLOTS
        .iter()
        .zip(sets)
        .map(|(slot, set)| artifact(*slot, set, default_subs()))
        .collect();
    pieces.push(weapon(weapon_name));
    pieces
}

pub fn snapshot(unlocked: usize) -> CharacterSnapshot {
    CharacterSnapshot {
        name: "Hu Tao".to_string(),
        element: Element::Pyro,
        level: 90,
        max_level: 90,
        friendship_level: 10,
        player: PlayerInfo {
            uid: 618_285_856,
            nickname: "Traveler".to_string(),
            world_level: 8,
            adventure_rank: 60,
        },
        banner: AssetRef::local("Genshin/Gacha/banner.png"),
        constellations: (0..6)
            .map(|i| ConstellationSlot {
                icon: AssetRef::local(format!("Genshin/UI/constellation_{i}.png")),
                unlocked: i < unlocked,
            })
            .collect(),
        skills: (0..3)
            .map(|i| SkillSlot {
                icon: AssetRef::local(format!("Genshin/UI/skill_{i}.png")),
                level: 9 + i as u32 * 2,
                boosted: i == 2,
            })
            .collect(),
        stats: stats(),
        equipment: equipment("Staff of Homa", ["Crimson Witch"; 5]),
    }
}

fn add(assets: &mut MemoryAssets, path: impl Into<String>, width: u32, height: u32, color: [u8; 4]) {
    assets.insert(path, RgbaImage::from_pixel(width, height, Rgba(color)));
}

/// Every image the fixture snapshot needs.
pub fn assets() -> MemoryAssets {
    const WHITE: [u8; 4] = [255, 255, 255, 255];
    let mut assets = MemoryAssets::new();

    add(&mut assets, layout::BACKGROUND, CANVAS.0, CANVAS.1, BACKGROUND_GRAY);
    add(&mut assets, "Genshin/Gacha/banner.png", 800, 400, [200, 100, 50, 255]);
    add(&mut assets, "Assets/enka_character_mask.png", 40, 20, [0, 0, 0, 255]);
    add(&mut assets, "Assets/enka_character_shade.png", 10, 10, [0, 0, 0, 0]);
    add(&mut assets, "Assets/enka_constellation_overlay.png", 80, 75, [20, 20, 20, 120]);
    add(&mut assets, "Assets/enka_talent_overlay.png", 80, 80, [20, 20, 20, 60]);
    add(&mut assets, "Assets/artifact_mask.png", 190, 190, WHITE);
    add(&mut assets, "Assets/flower_of_life_icon.png", 35, 35, WHITE);
    add(&mut assets, "UI/COMPANIONSHIP.png", 45, 45, WHITE);
    add(&mut assets, "UI/LOCKED.png", 20, 25, WHITE);

    for rarity in 1..=5 {
        add(&mut assets, format!("UI/RARITY_{rarity}.png"), 20 * rarity, 25, [255, 204, 50, 255]);
        add(&mut assets, format!("UI/RARITY_{rarity}_WEAPON_LIGHT.png"), 120, 40, [255, 204, 50, 90]);
    }
    for kind in MANDATORY_STATS.iter().chain(&RELIQUARY_STATS).chain(&SUB_STAT_ORDER) {
        add(&mut assets, format!("UI/{}.png", kind.icon_name()), 30, 30, WHITE);
    }

    for i in 0..6 {
        add(&mut assets, format!("Genshin/UI/constellation_{i}.png"), 64, 64, WHITE);
    }
    for i in 0..3 {
        add(&mut assets, format!("Genshin/UI/skill_{i}.png"), 64, 64, WHITE);
    }
    add(&mut assets, "Genshin/Weapon/weapon.png", 128, 128, WHITE);
    for slot in ARTIFACT_SLOTS {
        add(&mut assets, format!("Genshin/Artifact/{slot:?}.png"), 256, 256, WHITE);
    }
    assets
}
