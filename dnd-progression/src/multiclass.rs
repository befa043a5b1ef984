//! Multiclass eligibility.
//!
//! A character may take a level in a new class only when they meet that
//! class's ability prerequisite and the prerequisite of at least one class
//! they already have.

use crate::error::{Result, UnmetPrerequisite};
use crate::tables::RuleTables;
use crate::world::{CharacterClass, CharacterSnapshot};
use serde::{Deserialize, Serialize};

/// Outcome of an eligibility check with the reasons it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticlassEligibility {
    pub class: CharacterClass,
    pub eligible: bool,
    pub unmet: Vec<UnmetPrerequisite>,
}

pub struct MulticlassEligibilityChecker;

impl MulticlassEligibilityChecker {
    /// Whether `character` may gain a level in `target`.
    pub fn can_multiclass(
        tables: &RuleTables,
        character: &CharacterSnapshot,
        target: CharacterClass,
    ) -> Result<bool> {
        Ok(Self::eligibility(tables, character, target)?.eligible)
    }

    /// Full report for `target`, listing every unmet minimum.
    pub fn eligibility(
        tables: &RuleTables,
        character: &CharacterSnapshot,
        target: CharacterClass,
    ) -> Result<MulticlassEligibility> {
        // Unknown targets fail even when the answer would be trivially yes.
        let target_prereq = tables.multiclass_prerequisite(target)?;

        if character.classes.is_empty() || character.has_class(target) {
            return Ok(MulticlassEligibility {
                class: target,
                eligible: true,
                unmet: Vec::new(),
            });
        }

        let scores = &character.ability_scores;
        let mut unmet: Vec<UnmetPrerequisite> = target_prereq
            .unmet(scores)
            .into_iter()
            .map(|m| UnmetPrerequisite {
                class: target,
                ability: m.ability,
                required: m.minimum,
                actual: scores.get(m.ability),
            })
            .collect();

        // One satisfied existing class is enough; otherwise report them all.
        let mut existing_unmet = Vec::new();
        for entry in &character.classes {
            let prereq = tables.multiclass_prerequisite(entry.class)?;
            let missed = prereq.unmet(scores);
            if missed.is_empty() {
                existing_unmet.clear();
                break;
            }
            existing_unmet.extend(missed.into_iter().map(|m| UnmetPrerequisite {
                class: entry.class,
                ability: m.ability,
                required: m.minimum,
                actual: scores.get(m.ability),
            }));
        }
        unmet.extend(existing_unmet);

        tracing::trace!(
            class = %target,
            unmet = unmet.len(),
            "Checked multiclass prerequisites"
        );

        Ok(MulticlassEligibility {
            class: target,
            eligible: unmet.is_empty(),
            unmet,
        })
    }

    /// Every class in the tables the character could add right now.
    pub fn eligible_classes(
        tables: &RuleTables,
        character: &CharacterSnapshot,
    ) -> Result<Vec<CharacterClass>> {
        let mut eligible = Vec::new();
        for class in tables.classes() {
            if !character.has_class(class) && Self::can_multiclass(tables, character, class)? {
                eligible.push(class);
            }
        }
        Ok(eligible)
    }
}
