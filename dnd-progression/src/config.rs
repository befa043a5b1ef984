//! Tunable rule knobs for the resolver and applier.

use crate::error::{ProgressionError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for level-up resolution.
///
/// Every field has a default, so a partial JSON document only overrides the
/// fields it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Highest total character level.
    pub max_level: u8,

    /// Ability score cap for improvements and feat bonuses.
    pub max_ability_score: u8,

    /// Points granted by one Ability Score Improvement.
    pub asi_points: u8,

    /// Points one improvement may put into a single ability.
    pub max_points_per_ability: u8,

    /// Allow learning fewer spells than offered.
    pub allow_spell_deferral: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            max_level: 20,
            max_ability_score: 20,
            asi_points: 2,
            max_points_per_ability: 1,
            allow_spell_deferral: true,
        }
    }
}

impl ProgressionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the highest total character level.
    pub fn with_max_level(mut self, level: u8) -> Self {
        self.max_level = level;
        self
    }

    /// Set the ability score cap.
    pub fn with_max_ability_score(mut self, score: u8) -> Self {
        self.max_ability_score = score;
        self
    }

    /// Set how many points one improvement grants.
    pub fn with_asi_points(mut self, points: u8) -> Self {
        self.asi_points = points;
        self
    }

    /// Set how many points may go into one ability (2 allows +2 to a single score).
    pub fn with_max_points_per_ability(mut self, points: u8) -> Self {
        self.max_points_per_ability = points;
        self
    }

    /// Require every offered spell to be picked.
    pub fn with_spell_deferral(mut self, allow: bool) -> Self {
        self.allow_spell_deferral = allow;
        self
    }

    /// Parse a (possibly partial) JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ProgressionError::InvalidRuleTables(format!("config: {e}")))
    }
}
