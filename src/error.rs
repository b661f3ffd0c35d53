//! Error types for card rendering.
//!
//! Fatal failures are represented by the `CardError` enum and abort the
//! render call. Non-fatal findings are reported as `Diagnostic`s next to
//! the rendered card.

use crate::stat_kind::StatKind;
use thiserror::Error;

/// Errors that abort a render call.
///
/// # Examples
///
/// ```rust
/// use buildcard::{CardError, StatKind};
///
/// let err = CardError::MissingStat(StatKind::Def);
/// assert_eq!(err.to_string(), "Missing mandatory stat: DEF");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CardError {
    /// HP, ATK or DEF is absent from the stat block.
    #[error("Missing mandatory stat: {0}")]
    MissingStat(StatKind),

    /// An equipment entry names a slot outside the five artifact positions
    /// and the weapon.
    #[error("Unknown equipment slot at index {index}")]
    UnknownEquipmentSlot { index: usize },

    /// The equipment list carries no weapon.
    #[error("No weapon equipped")]
    MissingWeapon,

    /// An image could be found neither in the cache nor remotely.
    ///
    /// A card with a missing image is never produced.
    #[error("Asset unavailable: {path}: {reason}")]
    AssetUnavailable { path: String, reason: String },

    /// Snapshot or configuration input could not be decoded.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The finished bitmap could not be encoded.
    #[error("Failed to encode card: {0}")]
    Encode(String),
}

impl CardError {
    pub(crate) fn asset(path: impl Into<String>, reason: impl ToString) -> Self {
        CardError::AssetUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Non-fatal findings surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// The stat list was still longer than the row budget after every
    /// damage bonus that could be dropped was dropped.
    ///
    /// `dropped` lists what the overflow policy removed; it is empty when the
    /// policy keeps the long list.
    LayoutOverflow {
        limit: usize,
        len: usize,
        dropped: Vec<StatKind>,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::LayoutOverflow {
                limit,
                len,
                dropped,
            } => {
                write!(f, "Stat list has {len} entries, limit is {limit}")?;
                if !dropped.is_empty() {
                    let names = dropped
                        .iter()
                        .map(|kind| kind.label())
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, " (dropped: {names})")?;
                }
                Ok(())
            }
        }
    }
}
