//! Display stat module.
//!
//! Contains `DisplayStat`, one row of the stat panel, and `FormattedStats`,
//! the formatter's output together with any diagnostics raised while
//! producing it.

use crate::error::Diagnostic;
use crate::numeric::group_thousands;
use crate::stat_kind::StatKind;
use serde::{Deserialize, Serialize};

/// Integer breakdown of a mandatory stat.
///
/// Always satisfies `current == base + bonus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decomposition {
    pub current: i64,
    pub base: i64,
    pub bonus: i64,
}

impl Decomposition {
    /// Round `current` and `base`, and derive the bonus from the rounded
    /// values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use buildcard::display::Decomposition;
    ///
    /// let d = Decomposition::from_values(15_552.4, 10_874.5);
    /// assert_eq!(d.current, 15_552);
    /// assert_eq!(d.base, 10_875);
    /// assert_eq!(d.bonus, 4_677);
    /// ```
    pub fn from_values(current: f64, base: f64) -> Self {
        let current = current.round() as i64;
        let base = base.round() as i64;
        Self {
            current,
            base,
            bonus: current - base,
        }
    }

    pub fn current_text(&self) -> String {
        group_thousands(self.current)
    }

    pub fn base_text(&self) -> String {
        group_thousands(self.base)
    }

    pub fn bonus_text(&self) -> String {
        group_thousands(self.bonus)
    }
}

/// One row of the stat panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayStat {
    pub kind: StatKind,
    /// `"{current} ({base} + {bonus})"` for HP/ATK/DEF, the formatted value
    /// otherwise.
    pub primary_text: String,
    /// Numeric value the row was built from, used when ranking damage
    /// bonuses.
    pub value: f64,
    pub decomposition: Option<Decomposition>,
}

impl DisplayStat {
    pub fn simple(kind: StatKind, value: f64, text: String) -> Self {
        Self {
            kind,
            primary_text: text,
            value,
            decomposition: None,
        }
    }

    pub fn decomposed(kind: StatKind, decomposition: Decomposition) -> Self {
        Self {
            kind,
            primary_text: format!(
                "{} ({} + {})",
                decomposition.current_text(),
                decomposition.base_text(),
                decomposition.bonus_text()
            ),
            value: decomposition.current as f64,
            decomposition: Some(decomposition),
        }
    }
}

/// The bounded stat list plus diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormattedStats {
    pub stats: Vec<DisplayStat>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FormattedStats {
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn kinds(&self) -> Vec<StatKind> {
        self.stats.iter().map(|stat| stat.kind).collect()
    }

    pub fn get(&self, kind: StatKind) -> Option<&DisplayStat> {
        self.stats.iter().find(|stat| stat.kind == kind)
    }

    /// Whether the list had to be flagged as over budget.
    pub fn overflowed(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::LayoutOverflow { .. }))
    }
}
