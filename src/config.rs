//! Card configuration.
//!
//! `CardConfig` holds the few knobs a caller may change without touching the
//! layout: the stat row budget, what to do when that budget cannot be met,
//! and display labels. Every field has a default, so a partial JSON object
//! (or none at all) is a valid configuration.

use crate::error::CardError;
use crate::stat_kind::StatKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// What the formatter does when the stat list stays over the row budget
/// after every droppable damage bonus is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the first `max_stats` entries by priority.
    #[default]
    Truncate,
    /// Keep every entry; rows get tighter.
    Keep,
}

/// Render configuration.
///
/// # Examples
///
/// ```rust
/// use buildcard::{CardConfig, StatKind};
///
/// let config = CardConfig::from_json_str(r#"{
///     "no_bonus_label": "Sin bonificaciones",
///     "stat_labels": { "FIGHT_PROP_CRITICAL": "Prob. CRIT" }
/// }"#).unwrap();
///
/// assert_eq!(config.max_stats, 8);
/// assert_eq!(config.label(StatKind::CritRate), "Prob. CRIT");
/// assert_eq!(config.label(StatKind::CritDamage), "CRIT DMG");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Maximum number of stat rows.
    pub max_stats: usize,
    pub overflow_policy: OverflowPolicy,
    /// Banner text when no set bonus is active.
    pub no_bonus_label: String,
    /// Label overrides, keyed by stat kind.
    pub stat_labels: HashMap<StatKind, String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            max_stats: 8,
            overflow_policy: OverflowPolicy::Truncate,
            no_bonus_label: String::from("No Activated Bonuses"),
            stat_labels: HashMap::new(),
        }
    }
}

impl CardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, CardError> {
        serde_json::from_str(json).map_err(|e| CardError::InvalidInput(e.to_string()))
    }

    /// Read a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CardError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CardError::InvalidInput(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    /// Display label for a stat, with overrides applied.
    pub fn label(&self, kind: StatKind) -> &str {
        self.stat_labels
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.label())
    }
}
