//! Stat formatter module.
//!
//! Reduces a character's stat block to the bounded, priority-ordered list of
//! rows shown on the card:
//!
//! 1. HP, ATK and DEF, always, with their base/bonus breakdown
//! 2. Elemental mastery when non-zero
//! 3. Every non-zero reliquary stat in canonical priority order
//! 4. Bounding to the row budget (8 by default): healing and shield rows go
//!    first, then damage bonuses are collapsed or dropped lowest first
//!
//! Anything still over budget after step 4 is reported as a
//! [`Diagnostic::LayoutOverflow`] and handled per [`OverflowPolicy`].

use crate::config::{CardConfig, OverflowPolicy};
use crate::display::{Decomposition, DisplayStat, FormattedStats};
use crate::error::{CardError, Diagnostic};
use crate::snapshot::StatBlock;
use crate::stat_kind::{Element, StatKind, MANDATORY_STATS, RELIQUARY_STATS};

/// Builds the stat panel rows.
///
/// # Examples
///
/// ```rust
/// use buildcard::{Element, StatBlock, StatFormatter, StatKind};
///
/// let stats = StatBlock::new()
///     .with_base(StatKind::Hp, 18_000.0, 12_000.0)
///     .with_base(StatKind::Atk, 2_000.0, 900.0)
///     .with_base(StatKind::Def, 800.0, 700.0)
///     .with(StatKind::CritRate, 70.5);
///
/// let formatted = StatFormatter::new().format(&stats, Element::Cryo).unwrap();
/// assert_eq!(formatted.len(), 4);
/// assert_eq!(formatted.stats[0].primary_text, "18,000 (12,000 + 6,000)");
/// assert_eq!(formatted.stats[3].primary_text, "70.5%");
/// ```
#[derive(Debug, Clone)]
pub struct StatFormatter {
    max_stats: usize,
    overflow_policy: OverflowPolicy,
}

impl StatFormatter {
    /// Formatter with the default budget of 8 rows.
    pub fn new() -> Self {
        Self::from_config(&CardConfig::default())
    }

    /// The budget never drops below the three mandatory rows.
    pub fn from_config(config: &CardConfig) -> Self {
        Self {
            max_stats: config.max_stats.max(MANDATORY_STATS.len()),
            overflow_policy: config.overflow_policy,
        }
    }

    pub fn max_stats(&self) -> usize {
        self.max_stats
    }

    /// Produce the display rows for `stats`.
    ///
    /// `element` is the character's own element; it decides which damage
    /// bonus survives when several identical ones are collapsed.
    ///
    /// # Errors
    ///
    /// `CardError::MissingStat` if HP, ATK or DEF is absent.
    pub fn format(&self, stats: &StatBlock, element: Element) -> Result<FormattedStats, CardError> {
        let mut rows = Vec::with_capacity(RELIQUARY_STATS.len() + MANDATORY_STATS.len() + 1);

        for kind in MANDATORY_STATS {
            let current = stats.get(kind).ok_or(CardError::MissingStat(kind))?;
            let base = stats.base(kind).unwrap_or_else(|| {
                tracing::debug!("No base value for {kind}, showing zero bonus");
                current.value
            });
            rows.push(DisplayStat::decomposed(
                kind,
                Decomposition::from_values(current.value, base),
            ));
        }

        if let Some(mastery) = stats.get(StatKind::ElementalMastery) {
            if !mastery.is_zero() {
                rows.push(DisplayStat::simple(
                    StatKind::ElementalMastery,
                    mastery.value,
                    mastery.to_string(),
                ));
            }
        }

        for kind in RELIQUARY_STATS {
            if let Some(value) = stats.get(kind) {
                if !value.is_zero() {
                    rows.push(DisplayStat::simple(kind, value.value, value.to_string()));
                }
            }
        }

        let diagnostics = self.bound(&mut rows, element);
        rows.sort_by_key(|row| row.kind.priority());

        Ok(FormattedStats {
            stats: rows,
            diagnostics,
        })
    }

    /// Shrink `rows` to the budget, returning any diagnostics.
    fn bound(&self, rows: &mut Vec<DisplayStat>, element: Element) -> Vec<Diagnostic> {
        let limit = self.max_stats;
        if rows.len() <= limit {
            return Vec::new();
        }

        rows.retain(|row| !matches!(row.kind, StatKind::HealingBonus | StatKind::ShieldStrength));
        tracing::debug!(len = rows.len(), "Dropped healing and shield rows");

        while rows.len() > limit {
            let bonuses: Vec<usize> = rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.kind.is_damage_bonus())
                .map(|(idx, _)| idx)
                .collect();

            let Some(&first) = bonuses.first() else {
                return vec![self.overflow(rows)];
            };

            let first_shown = shown_tenths(rows[first].value);
            if bonuses.iter().all(|&idx| shown_tenths(rows[idx].value) == first_shown) {
                let own = element.damage_bonus();
                let keep = bonuses
                    .iter()
                    .copied()
                    .find(|&idx| Some(rows[idx].kind) != own)
                    .unwrap_or(first);
                tracing::debug!(
                    kept = %rows[keep].kind,
                    collapsed = bonuses.len(),
                    "Damage bonuses are identical, keeping one"
                );

                let mut idx = 0;
                rows.retain(|row| {
                    let retain = !row.kind.is_damage_bonus() || idx == keep;
                    idx += 1;
                    retain
                });

                if rows.len() > limit {
                    return vec![self.overflow(rows)];
                }
                return Vec::new();
            }

            let mut lowest = first;
            for &idx in &bonuses[1..] {
                if rows[idx].value < rows[lowest].value {
                    lowest = idx;
                }
            }
            let dropped = rows.remove(lowest);
            tracing::debug!(kind = %dropped.kind, value = dropped.value, "Dropped lowest damage bonus");
        }

        Vec::new()
    }

    /// Over budget with no damage bonus left to drop.
    fn overflow(&self, rows: &mut Vec<DisplayStat>) -> Diagnostic {
        match self.overflow_policy {
            OverflowPolicy::Truncate => self.truncate(rows),
            OverflowPolicy::Keep => {
                let diagnostic = Diagnostic::LayoutOverflow {
                    limit: self.max_stats,
                    len: rows.len(),
                    dropped: Vec::new(),
                };
                tracing::warn!("{diagnostic}");
                diagnostic
            }
        }
    }

    fn truncate(&self, rows: &mut Vec<DisplayStat>) -> Diagnostic {
        let len = rows.len();
        let dropped = rows
            .drain(self.max_stats..)
            .map(|row| row.kind)
            .collect::<Vec<_>>();
        let diagnostic = Diagnostic::LayoutOverflow {
            limit: self.max_stats,
            len,
            dropped,
        };
        tracing::warn!("{diagnostic}");
        diagnostic
    }
}

/// A percentage as it reads on the card, in tenths.
fn shown_tenths(value: f64) -> i64 {
    (value * 10.0).round() as i64
}

impl Default for StatFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_block() -> StatBlock {
        StatBlock::new()
            .with_base(StatKind::Hp, 20_000.0, 12_000.0)
            .with_base(StatKind::Atk, 2_100.0, 950.0)
            .with_base(StatKind::Def, 900.0, 760.0)
    }

    #[test]
    fn test_mandatory_only() {
        let formatted = StatFormatter::new().format(&base_block(), Element::Pyro).unwrap();
        assert_eq!(
            formatted.kinds(),
            vec![StatKind::Hp, StatKind::Atk, StatKind::Def]
        );
        assert!(formatted.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_mandatory_stat() {
        let stats = StatBlock::new()
            .with_base(StatKind::Hp, 1.0, 1.0)
            .with_base(StatKind::Def, 1.0, 1.0);
        let err = StatFormatter::new().format(&stats, Element::Pyro).unwrap_err();
        assert_eq!(err, CardError::MissingStat(StatKind::Atk));
    }

    #[test]
    fn test_zero_values_are_skipped() {
        let stats = base_block()
            .with(StatKind::ElementalMastery, 0.0)
            .with(StatKind::CritRate, 0.0)
            .with(StatKind::EnergyRecharge, 100.0);
        let formatted = StatFormatter::new().format(&stats, Element::Pyro).unwrap();
        assert_eq!(formatted.len(), 4);
        assert_eq!(formatted.stats[3].kind, StatKind::EnergyRecharge);
        assert_eq!(formatted.stats[3].primary_text, "100.0%");
    }

    #[test]
    fn test_healing_and_shield_dropped_first() {
        let stats = base_block()
            .with(StatKind::ElementalMastery, 80.0)
            .with(StatKind::CritRate, 50.0)
            .with(StatKind::CritDamage, 100.0)
            .with(StatKind::EnergyRecharge, 120.0)
            .with(StatKind::HealingBonus, 15.0)
            .with(StatKind::ShieldStrength, 20.0)
            .with(StatKind::PyroDamageBonus, 46.6);
        let formatted = StatFormatter::new().format(&stats, Element::Pyro).unwrap();

        assert_eq!(formatted.len(), 8);
        assert!(formatted.get(StatKind::HealingBonus).is_none());
        assert!(formatted.get(StatKind::ShieldStrength).is_none());
        assert!(formatted.get(StatKind::PyroDamageBonus).is_some());
    }

    #[test]
    fn test_healing_kept_when_under_budget() {
        let stats = base_block()
            .with(StatKind::HealingBonus, 15.0)
            .with(StatKind::ShieldStrength, 20.0);
        let formatted = StatFormatter::new().format(&stats, Element::Hydro).unwrap();
        assert_eq!(formatted.len(), 5);
        assert!(formatted.get(StatKind::HealingBonus).is_some());
    }

    #[test]
    fn test_lowest_bonus_dropped_one_at_a_time() {
        let stats = base_block()
            .with(StatKind::ElementalMastery, 80.0)
            .with(StatKind::CritRate, 50.0)
            .with(StatKind::CritDamage, 100.0)
            .with(StatKind::EnergyRecharge, 120.0)
            .with(StatKind::PyroDamageBonus, 20.0)
            .with(StatKind::HydroDamageBonus, 61.6)
            .with(StatKind::PhysicalDamageBonus, 10.0);
        let formatted = StatFormatter::new().format(&stats, Element::Hydro).unwrap();

        assert_eq!(formatted.len(), 8);
        assert_eq!(formatted.stats[7].kind, StatKind::HydroDamageBonus);
        assert!(formatted.diagnostics.is_empty());
    }

    #[test]
    fn test_lowest_tie_uses_encounter_order() {
        let stats = base_block()
            .with(StatKind::ElementalMastery, 80.0)
            .with(StatKind::CritRate, 50.0)
            .with(StatKind::CritDamage, 100.0)
            .with(StatKind::EnergyRecharge, 120.0)
            .with(StatKind::PyroDamageBonus, 15.0)
            .with(StatKind::CryoDamageBonus, 15.0)
            .with(StatKind::GeoDamageBonus, 40.0);
        let formatted = StatFormatter::new().format(&stats, Element::Geo).unwrap();

        // Pyro precedes Cryo in priority order, so it goes first; Cryo and
        // Geo differ so the collapse path is never taken.
        let kinds = formatted.kinds();
        assert_eq!(kinds.len(), 8);
        assert!(!kinds.contains(&StatKind::PyroDamageBonus));
        assert!(!kinds.contains(&StatKind::CryoDamageBonus));
        assert!(kinds.contains(&StatKind::GeoDamageBonus));
    }

    #[test]
    fn test_drop_then_collapse() {
        // After the 10% bonus goes the remaining two are equal and collapse
        // to the non-Pyro one, which then falls off the end of a 7-row budget.
        let stats = base_block()
            .with(StatKind::ElementalMastery, 80.0)
            .with(StatKind::CritRate, 50.0)
            .with(StatKind::CritDamage, 100.0)
            .with(StatKind::EnergyRecharge, 120.0)
            .with(StatKind::PyroDamageBonus, 30.0)
            .with(StatKind::HydroDamageBonus, 30.0)
            .with(StatKind::PhysicalDamageBonus, 10.0);
        let mut config = CardConfig::default();
        config.max_stats = 7;
        let formatted = StatFormatter::from_config(&config)
            .format(&stats, Element::Pyro)
            .unwrap();

        assert_eq!(formatted.len(), 7);
        assert!(formatted.stats.iter().all(|row| !row.kind.is_damage_bonus()));
        assert_eq!(
            formatted.diagnostics,
            vec![Diagnostic::LayoutOverflow {
                limit: 7,
                len: 8,
                dropped: vec![StatKind::HydroDamageBonus],
            }]
        );
    }

    #[test]
    fn test_overflow_without_bonuses_truncates() {
        let stats = base_block()
            .with(StatKind::ElementalMastery, 80.0)
            .with(StatKind::CritRate, 50.0)
            .with(StatKind::CritDamage, 100.0)
            .with(StatKind::EnergyRecharge, 120.0);
        let mut config = CardConfig::default();
        config.max_stats = 5;
        let formatted = StatFormatter::from_config(&config)
            .format(&stats, Element::Anemo)
            .unwrap();

        assert_eq!(formatted.len(), 5);
        assert_eq!(
            formatted.diagnostics,
            vec![Diagnostic::LayoutOverflow {
                limit: 5,
                len: 7,
                dropped: vec![StatKind::CritDamage, StatKind::EnergyRecharge],
            }]
        );
    }

    #[test]
    fn test_overflow_without_bonuses_keep_policy() {
        let stats = base_block()
            .with(StatKind::ElementalMastery, 80.0)
            .with(StatKind::CritRate, 50.0);
        let mut config = CardConfig::default();
        config.max_stats = 4;
        config.overflow_policy = OverflowPolicy::Keep;
        let formatted = StatFormatter::from_config(&config)
            .format(&stats, Element::Anemo)
            .unwrap();

        assert_eq!(formatted.len(), 5);
        assert!(formatted.overflowed());
    }

    #[test]
    fn test_budget_never_below_mandatory() {
        let mut config = CardConfig::default();
        config.max_stats = 1;
        let formatter = StatFormatter::from_config(&config);
        assert_eq!(formatter.max_stats(), 3);

        let formatted = formatter
            .format(&base_block().with(StatKind::CritRate, 5.0), Element::Geo)
            .unwrap();
        assert_eq!(formatted.len(), 3);
    }

    #[test]
    fn test_bonuses_equal_as_displayed_are_collapsed() {
        let stats = base_block()
            .with(StatKind::ElementalMastery, 80.0)
            .with(StatKind::CritRate, 60.0)
            .with(StatKind::CritDamage, 120.0)
            .with(StatKind::EnergyRecharge, 140.0)
            .with(StatKind::PyroDamageBonus, 46.6)
            .with(StatKind::HydroDamageBonus, 46.6 + 1e-9)
            .with(StatKind::CryoDamageBonus, 46.6 - 1e-9);

        // All three read "46.6%", so the first bonus that is not the
        // character's own element stays.
        let formatted = StatFormatter::new().format(&stats, Element::Hydro).unwrap();
        let bonuses: Vec<_> = formatted
            .kinds()
            .into_iter()
            .filter(|kind| kind.is_damage_bonus())
            .collect();
        assert_eq!(bonuses, vec![StatKind::PyroDamageBonus]);
        assert!(formatted.diagnostics.is_empty());
    }
}
