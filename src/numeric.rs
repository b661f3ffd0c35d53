//! Numeric values and their display formatting.
//!
//! Card values are plain `f64`s tagged with a [`StatUnit`]. Flat values are
//! rounded and thousands-grouped, percentages keep a single decimal.

use crate::stat_kind::StatUnit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric value together with the unit it is expressed in.
///
/// Percentages are stored in percentage points: `46.6` means `46.6%`.
///
/// # Examples
///
/// ```rust
/// use buildcard::StatValue;
///
/// assert_eq!(StatValue::flat(18234.6).to_string(), "18,235");
/// assert_eq!(StatValue::percent(46.6).to_string(), "46.6%");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub value: f64,
    pub unit: StatUnit,
}

impl StatValue {
    pub fn flat(value: f64) -> Self {
        Self {
            value,
            unit: StatUnit::Flat,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            value,
            unit: StatUnit::Percent,
        }
    }

    /// Whether the value contributes anything to the card.
    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// Equipment-style text: flat values keep their decimals if they have
    /// any, percentages get a `%` suffix.
    pub fn equipment_text(&self) -> String {
        let number = group_decimal(self.value);
        match self.unit {
            StatUnit::Flat => number,
            StatUnit::Percent => format!("{number}%"),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            StatUnit::Flat => write!(f, "{}", group_thousands(round_to_int(self.value))),
            StatUnit::Percent => write!(f, "{:.1}%", self.value),
        }
    }
}

/// Round half away from zero to an integer.
pub fn round_to_int(value: f64) -> i64 {
    value.round() as i64
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Group the integer part and keep one decimal when the value has one.
fn group_decimal(value: f64) -> String {
    let tenths = (value * 10.0).round() as i64;
    let whole = tenths / 10;
    let frac = (tenths % 10).abs();
    if frac == 0 {
        group_thousands(whole)
    } else if tenths < 0 && whole == 0 {
        format!("-0.{frac}")
    } else {
        format!("{}.{frac}", group_thousands(whole))
    }
}
