//! Level-up option resolution.
//!
//! Given a character and a target class level, work out everything the
//! player gains and every decision they must make across the span.

use crate::config::ProgressionConfig;
use crate::error::{ProgressionError, Result};
use crate::hit_points::{HitPointCalculator, HitPointOptions};
use crate::multiclass::MulticlassEligibilityChecker;
use crate::selection::{ChoiceKey, ChoiceType};
use crate::spells::{Spell, SpellCatalog};
use crate::tables::{proficiency_bonus, RuleTables};
use crate::world::{Ability, CharacterClass, CharacterSnapshot};
use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// The class level being advanced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpTarget {
    pub class: CharacterClass,
    pub target_level: u8,
    /// Current level in `class`; 0 for a class new to the character.
    pub current_level: u8,
    pub levels_to_gain: u8,
}

impl LevelUpTarget {
    pub fn is_new_class(&self) -> bool {
        self.current_level == 0
    }

    /// Class levels gained, in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = u8> {
        (self.current_level + 1)..=self.target_level
    }
}

/// One decision the player must make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub choice_type: ChoiceType,
    /// Class level that grants this choice.
    pub level: u8,
    pub description: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<u8>,
}

impl Choice {
    pub fn key(&self) -> ChoiceKey {
        ChoiceKey::new(self.choice_type, self.level)
    }
}

/// Features gained at one class level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFeatures {
    pub level: u8,
    pub features: Vec<String>,
}

/// Spells a level-up lets the character learn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellOptions {
    pub spells_to_learn: u8,
    pub cantrips_to_learn: u8,
    /// Highest spell level castable after the level-up.
    pub max_spell_level: u8,
    /// Leveled spells on the class list not already known.
    pub available_spells: Vec<Spell>,
    /// Cantrips on the class list not already known.
    pub cantrips_available: Vec<Spell>,
}

impl SpellOptions {
    pub fn total_to_learn(&self) -> u16 {
        self.spells_to_learn as u16 + self.cantrips_to_learn as u16
    }

    pub fn offers_spell(&self, name: &str) -> Option<&Spell> {
        self.available_spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn offers_cantrip(&self, name: &str) -> Option<&Spell> {
        self.cantrips_available
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Everything a level-up offers. Produced by [`LevelUpOptionsResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpOptions {
    pub target: LevelUpTarget,
    /// Total character level after the level-up.
    pub total_level: u8,
    pub new_features: Vec<String>,
    pub features_by_level: Vec<LevelFeatures>,
    pub available_choices: Vec<Choice>,
    pub hit_point_options: HitPointOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_options: Option<SpellOptions>,
    /// Proficiency bonus at the new total level.
    pub proficiency_bonus: u8,
    pub multiclass_eligible: bool,
}

impl LevelUpOptions {
    pub fn choice(&self, key: &ChoiceKey) -> Option<&Choice> {
        self.available_choices.iter().find(|c| c.key() == *key)
    }

    pub fn required_choices(&self) -> impl Iterator<Item = &Choice> {
        self.available_choices.iter().filter(|c| c.required)
    }

    /// Whether the player has any spells or cantrips to pick.
    pub fn has_spells_to_learn(&self) -> bool {
        self.spell_options
            .as_ref()
            .is_some_and(|s| s.total_to_learn() > 0)
    }
}

// ============================================================================
// Resolver
// ============================================================================

pub struct LevelUpOptionsResolver;

impl LevelUpOptionsResolver {
    /// Check the target against the character and produce a [`LevelUpTarget`].
    pub fn resolve_target(
        tables: &RuleTables,
        config: &ProgressionConfig,
        character: &CharacterSnapshot,
        class: CharacterClass,
        target_level: u8,
    ) -> Result<LevelUpTarget> {
        tables.class(class)?;
        character.validate(config)?;

        let current_level = character.class_level(class);
        if target_level == 0 {
            return Err(ProgressionError::invalid_target(
                class,
                target_level,
                "target level must be at least 1",
            ));
        }
        if target_level > config.max_level {
            return Err(ProgressionError::invalid_target(
                class,
                target_level,
                format!("target level exceeds the maximum of {}", config.max_level),
            ));
        }
        if current_level == 0 && target_level != 1 {
            return Err(ProgressionError::invalid_target(
                class,
                target_level,
                "a new class starts at level 1",
            ));
        }
        if target_level <= current_level {
            return Err(ProgressionError::invalid_target(
                class,
                target_level,
                format!("already level {current_level} in {class}"),
            ));
        }

        let levels_to_gain = target_level - current_level;
        let new_total = character.total_level() as u32 + levels_to_gain as u32;
        if new_total > config.max_level as u32 {
            return Err(ProgressionError::invalid_target(
                class,
                target_level,
                format!(
                    "total character level would be {new_total}, above {}",
                    config.max_level
                ),
            ));
        }

        Ok(LevelUpTarget {
            class,
            target_level,
            current_level,
            levels_to_gain,
        })
    }

    /// Compute the options for advancing `class` to `target_level`.
    pub fn level_up_options<C: SpellCatalog + ?Sized>(
        tables: &RuleTables,
        catalog: &C,
        config: &ProgressionConfig,
        character: &CharacterSnapshot,
        class: CharacterClass,
        target_level: u8,
    ) -> Result<LevelUpOptions> {
        let target = Self::resolve_target(tables, config, character, class, target_level)?;
        let has_subclass = character
            .class_entry(class)
            .is_some_and(|entry| entry.subclass.is_some());

        let mut new_features = Vec::new();
        let mut features_by_level = Vec::new();
        let mut available_choices = Vec::new();

        for level in target.levels() {
            let features = tables.features_at_level(class, level)?;
            tracing::trace!(class = %class, level, features = features.len(), "Expanding level");
            new_features.extend(features.iter().cloned());
            features_by_level.push(LevelFeatures { level, features });

            if tables.fighting_style_level(class)? == Some(level) {
                available_choices.push(Choice {
                    choice_type: ChoiceType::FightingStyle,
                    level,
                    description: format!("Choose a Fighting Style (Level {level})"),
                    required: true,
                    options: Some(tables.fighting_styles(class)?.to_vec()),
                    max_selections: Some(1),
                });
            }

            if tables.subclass_level(class)? == level && !has_subclass {
                let feature = tables.subclass_feature(class)?;
                available_choices.push(Choice {
                    choice_type: ChoiceType::ClassFeature,
                    level,
                    description: format!("Choose your {feature} (Level {level})"),
                    required: true,
                    options: Some(tables.subclasses(class)?.to_vec()),
                    max_selections: Some(1),
                });
            }

            if tables.is_asi_level(class, level)? {
                available_choices.push(Choice {
                    choice_type: ChoiceType::AbilityScoreIncrease,
                    level,
                    description: format!(
                        "Ability Score Improvement (Level {level}): increase ability scores by a total of {}, or take a feat",
                        config.asi_points
                    ),
                    required: true,
                    options: None,
                    max_selections: None,
                });
            }
        }

        let hit_point_options = HitPointCalculator::for_class(
            tables,
            class,
            target.levels_to_gain,
            character.modifier(Ability::Constitution),
        )?;

        let spell_options = Self::spell_options(tables, catalog, character, &target)?;
        let multiclass_eligible =
            MulticlassEligibilityChecker::can_multiclass(tables, character, class)?;
        let total_level = character.total_level() + target.levels_to_gain;

        tracing::debug!(
            class = %class,
            from = target.current_level,
            to = target.target_level,
            choices = available_choices.len(),
            features = new_features.len(),
            "Resolved level-up options"
        );

        Ok(LevelUpOptions {
            target,
            total_level,
            new_features,
            features_by_level,
            available_choices,
            hit_point_options,
            spell_options,
            proficiency_bonus: proficiency_bonus(total_level),
            multiclass_eligible,
        })
    }

    fn spell_options<C: SpellCatalog + ?Sized>(
        tables: &RuleTables,
        catalog: &C,
        character: &CharacterSnapshot,
        target: &LevelUpTarget,
    ) -> Result<Option<SpellOptions>> {
        let class = target.class;
        let (from, to) = (target.current_level, target.target_level);

        let spells_to_learn = if tables.spellcasting_type(class)?.learns_spells() {
            tables
                .spells_known(class, to)?
                .saturating_sub(tables.spells_known(class, from)?)
        } else {
            0
        };
        let cantrips_to_learn = tables
            .cantrips_known(class, to)?
            .saturating_sub(tables.cantrips_known(class, from)?);

        if spells_to_learn == 0 && cantrips_to_learn == 0 {
            return Ok(None);
        }

        let max_spell_level = tables.max_spell_level(class, to)?;
        let (cantrips_available, available_spells): (Vec<Spell>, Vec<Spell>) = catalog
            .class_spells(class, max_spell_level)
            .into_iter()
            .filter(|spell| !character.knows_spell(&spell.name))
            .partition(Spell::is_cantrip);

        Ok(Some(SpellOptions {
            spells_to_learn,
            cantrips_to_learn,
            max_spell_level,
            available_spells,
            cantrips_available,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::SrdSpellCatalog;
    use crate::world::{AbilityScores, ClassLevel};

    fn resolve(character: &CharacterSnapshot, class: CharacterClass, level: u8) -> Result<LevelUpOptions> {
        LevelUpOptionsResolver::level_up_options(
            &RuleTables::standard(),
            &SrdSpellCatalog,
            &ProgressionConfig::default(),
            character,
            class,
            level,
        )
    }

    fn fighter(level: u8) -> CharacterSnapshot {
        CharacterSnapshot::new(AbilityScores::new(16, 12, 14, 8, 10, 10))
            .with_class(CharacterClass::Fighter, level)
    }

    #[test]
    fn test_fighter_one_to_two() {
        let options = resolve(&fighter(1), CharacterClass::Fighter, 2).unwrap();
        assert_eq!(options.hit_point_options.fixed, 8);
        assert_eq!(options.hit_point_options.roll.min, 3);
        assert_eq!(options.hit_point_options.roll.max, 12);
        assert!(options.new_features.contains(&"Action Surge".to_string()));
        assert!(options
            .available_choices
            .iter()
            .all(|c| c.choice_type != ChoiceType::AbilityScoreIncrease));
        assert!(options.spell_options.is_none());
        assert_eq!(options.total_level, 2);
    }

    #[test]
    fn test_fighter_one_to_five_choices_in_level_order() {
        let options = resolve(&fighter(1), CharacterClass::Fighter, 5).unwrap();
        let keys: Vec<String> = options
            .available_choices
            .iter()
            .map(|c| c.key().to_string())
            .collect();
        assert_eq!(
            keys,
            vec![
                "fightingStyle_level_2",
                "classFeature_level_3",
                "abilityScoreIncrease_level_4",
            ]
        );
        assert!(options.available_choices[0].description.contains("Level 2"));
        assert_eq!(options.hit_point_options.fixed, 32);
        assert_eq!(options.proficiency_bonus, 3);
        assert_eq!(options.features_by_level.len(), 4);
    }

    #[test]
    fn test_repeated_choice_types_are_not_merged() {
        let options = resolve(&fighter(3), CharacterClass::Fighter, 8).unwrap();
        let asi_levels: Vec<u8> = options
            .available_choices
            .iter()
            .filter(|c| c.choice_type == ChoiceType::AbilityScoreIncrease)
            .map(|c| c.level)
            .collect();
        assert_eq!(asi_levels, vec![4, 6, 8]);
    }

    #[test]
    fn test_subclass_not_offered_when_already_chosen() {
        let character = CharacterSnapshot::new(AbilityScores::default())
            .with_class_level(ClassLevel::new(CharacterClass::Cleric, 1).with_subclass("Life Domain"));
        let options = resolve(&character, CharacterClass::Cleric, 2).unwrap();
        assert!(options.available_choices.is_empty());
    }

    #[test]
    fn test_invalid_targets() {
        let character = fighter(5);
        for level in [0, 3, 5, 21] {
            assert!(
                matches!(
                    resolve(&character, CharacterClass::Fighter, level),
                    Err(ProgressionError::InvalidTarget { .. })
                ),
                "level {level} should be rejected"
            );
        }
        assert!(matches!(
            resolve(&character, CharacterClass::Rogue, 2),
            Err(ProgressionError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_total_level_cap() {
        let character = CharacterSnapshot::new(AbilityScores::new(16, 14, 14, 14, 14, 14))
            .with_class(CharacterClass::Fighter, 20);
        assert!(matches!(
            resolve(&character, CharacterClass::Wizard, 1),
            Err(ProgressionError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_wizard_first_level_spells() {
        let mut character = fighter(2);
        character.ability_scores.set(Ability::Intelligence, 14);
        let options = resolve(&character, CharacterClass::Wizard, 1).unwrap();
        let spells = options.spell_options.unwrap();
        assert_eq!(spells.spells_to_learn, 6);
        assert_eq!(spells.cantrips_to_learn, 3);
        assert_eq!(spells.max_spell_level, 1);
        assert!(spells.available_spells.iter().all(|s| s.level == 1));
        assert!(spells.cantrips_available.iter().all(|s| s.level == 0));
        assert!(options.multiclass_eligible);
    }

    #[test]
    fn test_known_spells_are_excluded() {
        let character = CharacterSnapshot::new(AbilityScores::default())
            .with_class(CharacterClass::Sorcerer, 1)
            .with_spells_known(["Magic Missile", "Shield"])
            .with_cantrips_known(["Fire Bolt"]);
        let options = resolve(&character, CharacterClass::Sorcerer, 2).unwrap();
        let spells = options.spell_options.unwrap();
        assert_eq!(spells.spells_to_learn, 1);
        assert_eq!(spells.cantrips_to_learn, 0);
        assert!(spells.offers_spell("Magic Missile").is_none());
        assert!(spells.offers_spell("Sleep").is_some());
    }

    #[test]
    fn test_resolution_reports_ineligible_multiclass() {
        let options = resolve(&fighter(3), CharacterClass::Wizard, 1).unwrap();
        assert!(!options.multiclass_eligible);
    }

    #[test]
    fn test_unknown_class_in_tables() {
        let tables = RuleTables::standard().without_class(CharacterClass::Fighter);
        let err = LevelUpOptionsResolver::level_up_options(
            &tables,
            &SrdSpellCatalog,
            &ProgressionConfig::default(),
            &fighter(1),
            CharacterClass::Fighter,
            2,
        )
        .unwrap_err();
        assert_eq!(err, ProgressionError::UnknownClass("Fighter".to_string()));
    }
}
