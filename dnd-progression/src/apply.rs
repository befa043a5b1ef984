//! Applying a resolved set of selections.
//!
//! [`ProgressionApplier::process_level_up`] recomputes the options for the
//! target, checks every selection against them, and returns a
//! [`ProgressionResult`] describing the change. Nothing is mutated and no
//! partial result is ever returned.

use crate::config::ProgressionConfig;
use crate::error::{ProgressionError, Result};
use crate::multiclass::MulticlassEligibilityChecker;
use crate::options::{Choice, LevelUpOptions, LevelUpOptionsResolver};
use crate::selection::{AsiChoice, ChoiceType, Selection, SelectionMap};
use crate::spells::{Spell, SpellCatalog};
use crate::tables::{RuleTables, SpellSlots};
use crate::world::{Ability, AbilityScores, CharacterClass, CharacterSnapshot, ClassLevel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ============================================================================
// Result Types
// ============================================================================

/// What a recorded feature grant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureKind {
    ClassFeature,
    FightingStyle,
    Subclass,
    AbilityScoreIncrease,
    Feat,
    SpellSelection,
}

/// One feature or decision gained during the level-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureGrant {
    pub class: CharacterClass,
    pub class_level: u8,
    /// Total character level at which this was gained.
    pub character_level: u8,
    pub kind: FeatureKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

/// The change produced by one completed level-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionResult {
    /// The advanced (or newly created) class entry.
    pub class_level: ClassLevel,
    pub total_level: u8,
    pub hit_points_gained: i32,
    pub selected_features: Vec<String>,
    pub feature_grants: Vec<FeatureGrant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_spells: Option<Vec<Spell>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability_score_changes: Option<BTreeMap<Ability, i8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_slots: Option<SpellSlots>,
    pub proficiency_bonus: u8,
}

/// Outcome of checking the choice selections.
struct ResolvedChoices {
    labels: Vec<String>,
    grants: Vec<FeatureGrant>,
    ability_changes: BTreeMap<Ability, i8>,
    subclass: Option<String>,
}

// ============================================================================
// Applier
// ============================================================================

pub struct ProgressionApplier;

impl ProgressionApplier {
    /// Validate `selections` against the options for the target and
    /// produce the resulting change.
    #[allow(clippy::too_many_arguments)]
    pub fn process_level_up<C: SpellCatalog + ?Sized>(
        tables: &RuleTables,
        catalog: &C,
        config: &ProgressionConfig,
        character: &CharacterSnapshot,
        selections: &SelectionMap,
        chosen_hit_points: i32,
        class: CharacterClass,
        target_level: u8,
    ) -> Result<ProgressionResult> {
        let options = LevelUpOptionsResolver::level_up_options(
            tables,
            catalog,
            config,
            character,
            class,
            target_level,
        )?;

        if options.target.is_new_class() {
            let report = MulticlassEligibilityChecker::eligibility(tables, character, class)?;
            if !report.eligible {
                return Err(ProgressionError::IneligibleMulticlass {
                    class,
                    unmet: report.unmet,
                });
            }
        }

        let resolved = Self::check_choices(tables, config, character, &options, selections)?;
        options.hit_point_options.validate(chosen_hit_points)?;
        let spells = Self::check_spells(catalog, config, &options, selections)?;

        let result = Self::resolve(
            tables,
            character,
            &options,
            resolved,
            spells,
            chosen_hit_points,
        )?;

        tracing::info!(
            class = %class,
            level = result.class_level.level,
            total_level = result.total_level,
            hit_points = result.hit_points_gained,
            "Level-up applied"
        );

        Ok(result)
    }

    /// Check required choices are answered and every answer is legal.
    pub fn validate_choices(
        tables: &RuleTables,
        config: &ProgressionConfig,
        character: &CharacterSnapshot,
        options: &LevelUpOptions,
        selections: &SelectionMap,
    ) -> Result<()> {
        Self::check_choices(tables, config, character, options, selections).map(|_| ())
    }

    /// Check spell and cantrip picks against what the level-up offers.
    pub fn validate_spells<C: SpellCatalog + ?Sized>(
        catalog: &C,
        config: &ProgressionConfig,
        options: &LevelUpOptions,
        selections: &SelectionMap,
    ) -> Result<()> {
        Self::check_spells(catalog, config, options, selections).map(|_| ())
    }

    fn check_choices(
        tables: &RuleTables,
        config: &ProgressionConfig,
        character: &CharacterSnapshot,
        options: &LevelUpOptions,
        selections: &SelectionMap,
    ) -> Result<ResolvedChoices> {
        let missing: Vec<String> = options
            .required_choices()
            .filter(|choice| {
                selections
                    .get(&choice.key())
                    .map_or(true, Selection::is_empty)
            })
            .map(|choice| choice.key().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ProgressionError::IncompleteSelection { missing });
        }

        let target = &options.target;
        let class = target.class;
        let total_before = character.total_level();
        let mut scores = character.ability_scores.clone();
        let mut feats_taken: HashSet<String> = HashSet::new();
        let mut resolved = ResolvedChoices {
            labels: Vec::new(),
            grants: Vec::new(),
            ability_changes: BTreeMap::new(),
            subclass: None,
        };

        for choice in &options.available_choices {
            let Some(selection) = selections.get(&choice.key()).filter(|s| !s.is_empty()) else {
                continue;
            };
            let key = choice.key().to_string();
            let character_level = total_before + (choice.level - target.current_level);

            match choice.choice_type {
                ChoiceType::AbilityScoreIncrease => {
                    let Selection::Asi(asi) = selection else {
                        return Err(ProgressionError::conflict(
                            key,
                            "expected ability points or a feat",
                        ));
                    };
                    let grant = Self::check_asi(
                        tables,
                        config,
                        &key,
                        asi,
                        &mut scores,
                        &mut feats_taken,
                        &mut resolved.ability_changes,
                    )?;
                    let (kind, name, selection) = match grant {
                        AsiGrant::Points(summary) => (
                            FeatureKind::AbilityScoreIncrease,
                            "Ability Score Improvement".to_string(),
                            Some(summary),
                        ),
                        AsiGrant::Feat(name) => {
                            resolved.labels.push(name.clone());
                            (FeatureKind::Feat, name, None)
                        }
                    };
                    resolved.grants.push(FeatureGrant {
                        class,
                        class_level: choice.level,
                        character_level,
                        kind,
                        name,
                        selection,
                    });
                }
                ChoiceType::FightingStyle | ChoiceType::ClassFeature => {
                    let picked = Self::check_option_choice(&key, choice, selection)?;
                    let kind = if choice.choice_type == ChoiceType::FightingStyle {
                        FeatureKind::FightingStyle
                    } else {
                        resolved.subclass = picked.first().cloned();
                        FeatureKind::Subclass
                    };
                    for name in picked {
                        resolved.labels.push(name.clone());
                        resolved.grants.push(FeatureGrant {
                            class,
                            class_level: choice.level,
                            character_level,
                            kind,
                            name: name.clone(),
                            selection: Some(name),
                        });
                    }
                }
            }
        }

        Ok(resolved)
    }

    /// Validate one improvement, applying it to the running scores.
    #[allow(clippy::too_many_arguments)]
    fn check_asi(
        tables: &RuleTables,
        config: &ProgressionConfig,
        key: &str,
        asi: &AsiChoice,
        scores: &mut AbilityScores,
        feats_taken: &mut HashSet<String>,
        changes: &mut BTreeMap<Ability, i8>,
    ) -> Result<AsiGrant> {
        match asi {
            AsiChoice::AbilityPoints(points) => {
                let total: u32 = points.values().map(|&p| p as u32).sum();
                if total != config.asi_points as u32 {
                    return Err(ProgressionError::conflict(
                        key,
                        format!("assign exactly {} points, got {total}", config.asi_points),
                    ));
                }
                let mut summary = Vec::new();
                for (&ability, &amount) in points.iter().filter(|(_, &p)| p > 0) {
                    if amount > config.max_points_per_ability {
                        return Err(ProgressionError::conflict(
                            key,
                            format!(
                                "at most {} points may go into {}",
                                config.max_points_per_ability,
                                ability.name()
                            ),
                        ));
                    }
                    let new_score = scores.get(ability) as u32 + amount as u32;
                    if new_score > config.max_ability_score as u32 {
                        return Err(ProgressionError::conflict(
                            key,
                            format!(
                                "{} would be {new_score}, above {}",
                                ability.name(),
                                config.max_ability_score
                            ),
                        ));
                    }
                    scores.set(ability, new_score as u8);
                    *changes.entry(ability).or_insert(0) += amount as i8;
                    summary.push(format!("{} +{amount}", ability.abbreviation()));
                }
                Ok(AsiGrant::Points(summary.join(", ")))
            }
            AsiChoice::Feat(name) => {
                let feat = tables
                    .feat(name)
                    .ok_or_else(|| ProgressionError::conflict(key, format!("unknown feat {name}")))?;
                if !feats_taken.insert(feat.name.to_lowercase()) {
                    return Err(ProgressionError::conflict(
                        key,
                        format!("{} is already chosen in this level-up", feat.name),
                    ));
                }
                for (&ability, &bonus) in &feat.ability_bonus {
                    let current = scores.get(ability);
                    let raised = (current as u32 + bonus as u32).min(config.max_ability_score as u32) as u8;
                    let gained = raised.saturating_sub(current);
                    if gained > 0 {
                        scores.set(ability, raised);
                        *changes.entry(ability).or_insert(0) += gained as i8;
                    }
                }
                Ok(AsiGrant::Feat(feat.name.clone()))
            }
        }
    }

    /// Validate an option-list answer and return the canonical option names.
    fn check_option_choice(key: &str, choice: &Choice, selection: &Selection) -> Result<Vec<String>> {
        if let Selection::Asi(_) = selection {
            return Err(ProgressionError::conflict(key, "expected an option name"));
        }
        let values: Vec<&str> = selection
            .values()
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        if let Some(max) = choice.max_selections {
            if values.len() > max as usize {
                return Err(ProgressionError::conflict(
                    key,
                    format!("at most {max} selection(s) allowed, got {}", values.len()),
                ));
            }
        }

        let offered = choice.options.as_deref().unwrap_or_default();
        let mut picked: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            let Some(option) = offered.iter().find(|o| o.eq_ignore_ascii_case(value)) else {
                return Err(ProgressionError::conflict(
                    key,
                    format!("{value} is not one of the offered options"),
                ));
            };
            if picked.contains(option) {
                return Err(ProgressionError::conflict(key, format!("{option} selected twice")));
            }
            picked.push(option.clone());
        }
        Ok(picked)
    }

    /// Validate spell and cantrip picks, returning the spells to learn.
    fn check_spells<C: SpellCatalog + ?Sized>(
        catalog: &C,
        config: &ProgressionConfig,
        options: &LevelUpOptions,
        selections: &SelectionMap,
    ) -> Result<Vec<Spell>> {
        let Some(spell_options) = &options.spell_options else {
            if !selections.spells.is_empty() || !selections.cantrips.is_empty() {
                return Err(ProgressionError::conflict(
                    "spells",
                    "this level-up offers no spells",
                ));
            }
            return Ok(Vec::new());
        };

        let cantrips = pick_spells(
            "cantrips",
            &selections.cantrips,
            spell_options.cantrips_to_learn,
            |name| spell_options.offers_cantrip(name),
        )?;
        let spells = pick_spells(
            "spells",
            &selections.spells,
            spell_options.spells_to_learn,
            |name| spell_options.offers_spell(name),
        )?;

        if !config.allow_spell_deferral {
            let mut missing = Vec::new();
            let owed_cantrips = (spell_options.cantrips_to_learn as usize)
                .min(spell_options.cantrips_available.len());
            if cantrips.len() < owed_cantrips {
                missing.push("cantrips".to_string());
            }
            let owed_spells = (spell_options.spells_to_learn as usize)
                .min(spell_options.available_spells.len());
            if spells.len() < owed_spells {
                missing.push("spells".to_string());
            }
            if !missing.is_empty() {
                return Err(ProgressionError::IncompleteSelection { missing });
            }
        }

        Ok(cantrips
            .into_iter()
            .chain(spells)
            .map(|offered| catalog.spell(&offered.name).unwrap_or_else(|| offered.clone()))
            .collect())
    }

    fn resolve(
        tables: &RuleTables,
        character: &CharacterSnapshot,
        options: &LevelUpOptions,
        resolved: ResolvedChoices,
        spells: Vec<Spell>,
        hit_points_gained: i32,
    ) -> Result<ProgressionResult> {
        let target = &options.target;
        let class = target.class;
        let total_before = character.total_level();

        let class_level = ClassLevel {
            class,
            level: target.target_level,
            subclass: character
                .class_entry(class)
                .and_then(|entry| entry.subclass.clone())
                .or(resolved.subclass),
        };

        let mut feature_grants: Vec<FeatureGrant> = options
            .features_by_level
            .iter()
            .flat_map(|row| {
                row.features.iter().map(move |name| FeatureGrant {
                    class,
                    class_level: row.level,
                    character_level: total_before + (row.level - target.current_level),
                    kind: FeatureKind::ClassFeature,
                    name: name.clone(),
                    selection: None,
                })
            })
            .collect();
        feature_grants.extend(resolved.grants);
        if !spells.is_empty() {
            feature_grants.push(FeatureGrant {
                class,
                class_level: target.target_level,
                character_level: options.total_level,
                kind: FeatureKind::SpellSelection,
                name: "Spells Learned".to_string(),
                selection: Some(
                    spells
                        .iter()
                        .map(|s| s.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
            });
        }
        feature_grants.sort_by_key(|grant| grant.class_level);

        let mut selected_features: Vec<String> = Vec::new();
        for name in options.new_features.iter().chain(resolved.labels.iter()) {
            if !selected_features.contains(name) {
                selected_features.push(name.clone());
            }
        }

        let mut classes_after: Vec<ClassLevel> = character
            .classes
            .iter()
            .filter(|entry| entry.class != class)
            .cloned()
            .collect();
        classes_after.push(class_level.clone());
        let slots = tables.combined_spell_slots(&classes_after)?;

        Ok(ProgressionResult {
            class_level,
            total_level: options.total_level,
            hit_points_gained,
            selected_features,
            feature_grants,
            updated_spells: (!spells.is_empty()).then_some(spells),
            ability_score_changes: (!resolved.ability_changes.is_empty())
                .then_some(resolved.ability_changes),
            spell_slots: (!slots.is_empty()).then_some(slots),
            proficiency_bonus: options.proficiency_bonus,
        })
    }
}

enum AsiGrant {
    /// Summary such as "STR +1, CON +1".
    Points(String),
    Feat(String),
}

/// Match picks to offered spells, rejecting extras, strangers, and repeats.
fn pick_spells<'a>(
    key: &str,
    names: &[String],
    limit: u8,
    offered: impl Fn(&str) -> Option<&'a Spell>,
) -> Result<Vec<&'a Spell>> {
    if names.len() > limit as usize {
        return Err(ProgressionError::conflict(
            key,
            format!("picked {}, only {limit} offered", names.len()),
        ));
    }
    let mut picked: Vec<&Spell> = Vec::with_capacity(names.len());
    for name in names {
        let spell = offered(name)
            .ok_or_else(|| ProgressionError::conflict(key, format!("{name} is not available")))?;
        if picked.iter().any(|p| p.name == spell.name) {
            return Err(ProgressionError::conflict(key, format!("{} picked twice", spell.name)));
        }
        picked.push(spell);
    }
    Ok(picked)
}

// ============================================================================
// Snapshot Merge
// ============================================================================

impl CharacterSnapshot {
    /// A new snapshot with `result` merged in.
    pub fn with_progression(&self, result: &ProgressionResult) -> CharacterSnapshot {
        let mut next = self.clone();

        match next
            .classes
            .iter_mut()
            .find(|entry| entry.class == result.class_level.class)
        {
            Some(entry) => *entry = result.class_level.clone(),
            None => next.classes.push(result.class_level.clone()),
        }

        next.hit_points = next.hit_points.gain(result.hit_points_gained);

        if let Some(changes) = &result.ability_score_changes {
            for (&ability, &delta) in changes {
                let score = (next.ability_scores.get(ability) as i16 + delta as i16).clamp(1, 30);
                next.ability_scores.set(ability, score as u8);
            }
        }

        if let Some(spells) = &result.updated_spells {
            for spell in spells {
                if next.knows_spell(&spell.name) {
                    continue;
                }
                if spell.is_cantrip() {
                    next.cantrips_known.push(spell.name.clone());
                } else {
                    next.spells_known.push(spell.name.clone());
                }
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::SrdSpellCatalog;
    use crate::world::AbilityScores;

    fn apply(
        character: &CharacterSnapshot,
        selections: &SelectionMap,
        hp: i32,
        class: CharacterClass,
        level: u8,
    ) -> Result<ProgressionResult> {
        ProgressionApplier::process_level_up(
            &RuleTables::standard(),
            &SrdSpellCatalog,
            &ProgressionConfig::default(),
            character,
            selections,
            hp,
            class,
            level,
        )
    }

    fn fighter(level: u8) -> CharacterSnapshot {
        CharacterSnapshot::new(AbilityScores::new(16, 12, 14, 8, 10, 10))
            .with_class(CharacterClass::Fighter, level)
            .with_hit_points(12)
    }

    #[test]
    fn test_fighter_one_to_two() {
        let selections = SelectionMap::new().with_fighting_style(2, "Defense");
        let result = apply(&fighter(1), &selections, 8, CharacterClass::Fighter, 2).unwrap();
        assert_eq!(result.class_level.level, 2);
        assert_eq!(result.total_level, 2);
        assert_eq!(result.hit_points_gained, 8);
        assert!(result.selected_features.contains(&"Action Surge".to_string()));
        assert!(result.selected_features.contains(&"Defense".to_string()));
        assert!(result.ability_score_changes.is_none());
        assert!(result.updated_spells.is_none());
        assert!(result.spell_slots.is_none());
        assert_eq!(result.proficiency_bonus, 2);
    }

    #[test]
    fn test_missing_choices_listed_in_level_order() {
        let selections = SelectionMap::new().with_fighting_style(2, "Archery");
        let err = apply(&fighter(1), &selections, 32, CharacterClass::Fighter, 5).unwrap_err();
        assert_eq!(
            err,
            ProgressionError::IncompleteSelection {
                missing: vec![
                    "classFeature_level_3".to_string(),
                    "abilityScoreIncrease_level_4".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_full_fighter_span() {
        let selections = SelectionMap::new()
            .with_fighting_style(2, "Archery")
            .with_subclass(3, "Champion")
            .with_ability_points(4, &[(Ability::Strength, 1), (Ability::Constitution, 1)]);
        let result = apply(&fighter(1), &selections, 32, CharacterClass::Fighter, 5).unwrap();
        assert_eq!(result.class_level.subclass.as_deref(), Some("Champion"));
        let changes = result.ability_score_changes.unwrap();
        assert_eq!(changes[&Ability::Strength], 1);
        assert_eq!(changes[&Ability::Constitution], 1);
        let asi = result
            .feature_grants
            .iter()
            .find(|g| g.kind == FeatureKind::AbilityScoreIncrease)
            .unwrap();
        assert_eq!(asi.class_level, 4);
        assert_eq!(asi.character_level, 4);
        assert_eq!(asi.selection.as_deref(), Some("STR +1, CON +1"));
    }

    #[test]
    fn test_asi_rules() {
        let base = SelectionMap::new()
            .with_fighting_style(2, "Archery")
            .with_subclass(3, "Champion");

        let too_few = base.clone().with_ability_points(4, &[(Ability::Strength, 1)]);
        assert!(matches!(
            apply(&fighter(1), &too_few, 32, CharacterClass::Fighter, 5),
            Err(ProgressionError::ConflictingSelection { .. })
        ));

        let doubled = base.clone().with_ability_points(4, &[(Ability::Strength, 2)]);
        assert!(matches!(
            apply(&fighter(1), &doubled, 32, CharacterClass::Fighter, 5),
            Err(ProgressionError::ConflictingSelection { .. })
        ));

        let feat = base.clone().with_feat(4, "Sharpshooter");
        let result = apply(&fighter(1), &feat, 32, CharacterClass::Fighter, 5).unwrap();
        assert!(result.selected_features.contains(&"Sharpshooter".to_string()));
        assert!(result.ability_score_changes.is_none());

        let unknown = base.with_feat(4, "Spell Sniper");
        assert!(matches!(
            apply(&fighter(1), &unknown, 32, CharacterClass::Fighter, 5),
            Err(ProgressionError::ConflictingSelection { .. })
        ));
    }

    #[test]
    fn test_score_cap_is_cumulative_across_span() {
        let mut character = fighter(3);
        character.ability_scores.set(Ability::Strength, 19);
        let selections = SelectionMap::new()
            .with_ability_points(4, &[(Ability::Strength, 1), (Ability::Dexterity, 1)])
            .with_ability_points(6, &[(Ability::Strength, 1), (Ability::Constitution, 1)]);
        let err = apply(&character, &selections, 24, CharacterClass::Fighter, 6).unwrap_err();
        assert!(matches!(
            err,
            ProgressionError::ConflictingSelection { ref key, .. } if key == "abilityScoreIncrease_level_6"
        ));
    }

    #[test]
    fn test_feat_bonus_is_capped() {
        let mut character = fighter(3);
        character.ability_scores.set(Ability::Constitution, 20);
        let selections = SelectionMap::new().with_feat(4, "Durable");
        let result = apply(&character, &selections, 8, CharacterClass::Fighter, 4).unwrap();
        assert!(result.ability_score_changes.is_none());
    }

    #[test]
    fn test_option_must_be_offered() {
        let selections = SelectionMap::new().with_fighting_style(2, "Blind Fighting");
        let err = apply(&fighter(1), &selections, 8, CharacterClass::Fighter, 2).unwrap_err();
        assert!(matches!(
            err,
            ProgressionError::ConflictingSelection { ref key, .. } if key == "fightingStyle_level_2"
        ));

        let two = SelectionMap::new().with(
            crate::selection::ChoiceKey::fighting_style(2),
            Selection::Multiple(vec!["Archery".into(), "Defense".into()]),
        );
        assert!(apply(&fighter(1), &two, 8, CharacterClass::Fighter, 2).is_err());
    }

    #[test]
    fn test_hit_points_checked_after_choices() {
        let selections = SelectionMap::new().with_fighting_style(2, "Defense");
        assert_eq!(
            apply(&fighter(1), &selections, 13, CharacterClass::Fighter, 2).unwrap_err(),
            ProgressionError::OutOfRangeHitPoints {
                value: 13,
                min: 3,
                max: 12,
                fixed: 8
            }
        );
        assert!(apply(&fighter(1), &selections, 3, CharacterClass::Fighter, 2).is_ok());
    }

    #[test]
    fn test_ineligible_multiclass_refused() {
        let err = apply(&fighter(3), &SelectionMap::new(), 4, CharacterClass::Wizard, 1).unwrap_err();
        assert!(matches!(
            err,
            ProgressionError::IneligibleMulticlass { class: CharacterClass::Wizard, .. }
        ));
    }

    #[test]
    fn test_wizard_multiclass_learns_spells() {
        let mut character = fighter(3);
        character.ability_scores.set(Ability::Intelligence, 14);
        let selections = SelectionMap::new()
            .with_spells(["Magic Missile", "shield"])
            .with_cantrips(["Fire Bolt"]);
        let result = apply(&character, &selections, 3, CharacterClass::Wizard, 1).unwrap();
        assert_eq!(result.class_level, ClassLevel::new(CharacterClass::Wizard, 1));
        assert_eq!(result.total_level, 4);
        let names: Vec<_> = result
            .updated_spells
            .as_ref()
            .unwrap()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Fire Bolt", "Magic Missile", "Shield"]);
        assert_eq!(result.spell_slots.as_ref().unwrap().slots.get(&1), Some(&2));

        let next = character.with_progression(&result);
        assert_eq!(next.total_level(), 4);
        assert!(next.knows_spell("Shield"));
        assert_eq!(next.cantrips_known, vec!["Fire Bolt".to_string()]);
        assert_eq!(next.hit_points.maximum, 15);
    }

    #[test]
    fn test_spell_picks_rejected() {
        let character = CharacterSnapshot::new(AbilityScores::default())
            .with_class_level(ClassLevel::new(CharacterClass::Sorcerer, 1).with_subclass("Wild Magic"));

        let too_many = SelectionMap::new().with_spells(["Sleep", "Shield"]);
        assert!(matches!(
            apply(&character, &too_many, 4, CharacterClass::Sorcerer, 2),
            Err(ProgressionError::ConflictingSelection { ref key, .. }) if key == "spells"
        ));

        let wrong_list = SelectionMap::new().with_spells(["Cure Wounds"]);
        assert!(apply(&character, &wrong_list, 4, CharacterClass::Sorcerer, 2).is_err());

        let deferred = SelectionMap::new();
        assert!(apply(&character, &deferred, 4, CharacterClass::Sorcerer, 2).is_ok());

        let strict = ProgressionConfig::default().with_spell_deferral(false);
        let err = ProgressionApplier::process_level_up(
            &RuleTables::standard(),
            &SrdSpellCatalog,
            &strict,
            &character,
            &deferred,
            4,
            CharacterClass::Sorcerer,
            2,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProgressionError::IncompleteSelection {
                missing: vec!["spells".to_string()]
            }
        );
    }

    #[test]
    fn test_with_progression_merges_scores_and_class() {
        let character = fighter(3);
        let selections =
            SelectionMap::new().with_ability_points(4, &[(Ability::Strength, 1), (Ability::Dexterity, 1)]);
        let result = apply(&character, &selections, 8, CharacterClass::Fighter, 4).unwrap();
        let next = character.with_progression(&result);
        assert_eq!(next.ability_scores.strength, 17);
        assert_eq!(next.ability_scores.dexterity, 13);
        assert_eq!(next.class_level(CharacterClass::Fighter), 4);
        assert_eq!(next.classes.len(), 1);
        assert_eq!(next.hit_points.maximum, 20);
        // The input is untouched.
        assert_eq!(character.ability_scores.strength, 16);
    }
}
