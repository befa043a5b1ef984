//! Error types for level-up resolution and application.

use crate::world::{Ability, CharacterClass};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the resolver, the applier, and the rule tables.
///
/// Every variant names the class, choice key, or field at fault so the
/// caller can surface it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    /// A class name that is not in the rule tables.
    #[error("Unknown class: {0}")]
    UnknownClass(String),

    /// The requested target level is not reachable from the current state.
    #[error("Invalid target {class} {target_level}: {reason}")]
    InvalidTarget {
        class: CharacterClass,
        target_level: u8,
        reason: String,
    },

    /// The character does not meet the multiclass ability prerequisites.
    #[error("Cannot multiclass into {class}: {}", format_unmet(.unmet))]
    IneligibleMulticlass {
        class: CharacterClass,
        unmet: Vec<UnmetPrerequisite>,
    },

    /// One or more required choices have no selection.
    #[error("Incomplete selection: missing {}", .missing.join(", "))]
    IncompleteSelection { missing: Vec<String> },

    /// A selection contradicts the options it answers.
    #[error("Conflicting selection for {key}: {reason}")]
    ConflictingSelection { key: String, reason: String },

    /// The chosen hit points are neither the fixed value nor inside the roll range.
    #[error("Hit points {value} out of range: expected {fixed} or {min}-{max}")]
    OutOfRangeHitPoints {
        value: i32,
        min: i32,
        max: i32,
        fixed: i32,
    },

    /// The character snapshot breaks one of its own invariants.
    #[error("Invalid character snapshot: {0}")]
    InvalidSnapshot(String),

    /// A rule table document could not be loaded.
    #[error("Invalid rule tables: {0}")]
    InvalidRuleTables(String),
}

impl ProgressionError {
    /// Whether the player can fix this by changing their selections.
    ///
    /// `UnknownClass`, `OutOfRangeHitPoints`, and malformed inputs point at a
    /// caller or data bug instead.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            ProgressionError::InvalidTarget { .. }
                | ProgressionError::IneligibleMulticlass { .. }
                | ProgressionError::IncompleteSelection { .. }
                | ProgressionError::ConflictingSelection { .. }
        )
    }

    pub(crate) fn conflict(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ProgressionError::ConflictingSelection {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_target(
        class: CharacterClass,
        target_level: u8,
        reason: impl Into<String>,
    ) -> Self {
        ProgressionError::InvalidTarget {
            class,
            target_level,
            reason: reason.into(),
        }
    }
}

/// An ability minimum the character falls short of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetPrerequisite {
    /// Class whose prerequisite is unmet (the target or an existing class).
    pub class: CharacterClass,
    pub ability: Ability,
    pub required: u8,
    pub actual: u8,
}

impl std::fmt::Display for UnmetPrerequisite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} requires {} {} (have {})",
            self.class,
            self.ability.abbreviation(),
            self.required,
            self.actual
        )
    }
}

fn format_unmet(unmet: &[UnmetPrerequisite]) -> String {
    unmet
        .iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience result type for progression operations.
pub type Result<T> = std::result::Result<T, ProgressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_selection_names_keys() {
        let err = ProgressionError::IncompleteSelection {
            missing: vec![
                "classFeature_level_3".to_string(),
                "abilityScoreIncrease_level_4".to_string(),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("abilityScoreIncrease_level_4"));
        assert!(message.contains("classFeature_level_3"));
        assert!(err.is_user_recoverable());
    }

    #[test]
    fn test_ineligible_message_lists_prerequisites() {
        let err = ProgressionError::IneligibleMulticlass {
            class: CharacterClass::Wizard,
            unmet: vec![UnmetPrerequisite {
                class: CharacterClass::Wizard,
                ability: Ability::Intelligence,
                required: 13,
                actual: 8,
            }],
        };
        assert_eq!(
            err.to_string(),
            "Cannot multiclass into Wizard: Wizard requires INT 13 (have 8)"
        );
    }

    #[test]
    fn test_out_of_range_is_not_user_recoverable() {
        let err = ProgressionError::OutOfRangeHitPoints {
            value: 40,
            min: 3,
            max: 12,
            fixed: 8,
        };
        assert!(!err.is_user_recoverable());
        assert!(!ProgressionError::UnknownClass("Artificer".into()).is_user_recoverable());
    }
}
