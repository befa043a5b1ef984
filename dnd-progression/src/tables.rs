//! Rule tables consulted by every progression component.
//!
//! [`RuleTables`] holds per-class [`ClassData`] plus the feat and
//! fighting-style catalogs. The PHB tables come from
//! [`RuleTables::standard`]; house-rule variants load from JSON. Tables are
//! passed explicitly, so several variants can coexist in one process.

use crate::class_data::{CasterProgression, ClassData, Prerequisite, SpellcastingType};
use crate::dice::DieType;
use crate::error::{ProgressionError, Result};
use crate::feats::{standard_feats, standard_fighting_styles, Feat, FightingStyle};
use crate::world::{CharacterClass, ClassLevel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Static Tables
// ============================================================================

/// Experience needed to reach levels 1-20.
const EXPERIENCE_THRESHOLDS: [u32; 20] = [
    0, 300, 900, 2700, 6500, 14000, 23000, 34000, 48000, 64000, 85000, 100000, 120000, 140000,
    165000, 195000, 225000, 265000, 305000, 355000,
];

/// Slots per spell level (1st-9th) for full casters at levels 1-20.
const FULL_CASTER_SLOTS: [[u8; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 2, 1, 1],
];

/// Slots per spell level (1st-5th) for Paladins and Rangers at levels 1-20.
const HALF_CASTER_SLOTS: [[u8; 5]; 20] = [
    [0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0],
    [3, 0, 0, 0, 0],
    [3, 0, 0, 0, 0],
    [4, 2, 0, 0, 0],
    [4, 2, 0, 0, 0],
    [4, 3, 0, 0, 0],
    [4, 3, 0, 0, 0],
    [4, 3, 2, 0, 0],
    [4, 3, 2, 0, 0],
    [4, 3, 3, 0, 0],
    [4, 3, 3, 0, 0],
    [4, 3, 3, 1, 0],
    [4, 3, 3, 1, 0],
    [4, 3, 3, 2, 0],
    [4, 3, 3, 2, 0],
    [4, 3, 3, 3, 1],
    [4, 3, 3, 3, 1],
    [4, 3, 3, 3, 2],
    [4, 3, 3, 3, 2],
];

const PACT_SLOT_COUNT: [u8; 20] = [1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4];
const PACT_SLOT_LEVEL: [u8; 20] = [1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5, 5];

/// Proficiency bonus for a total character level.
pub fn proficiency_bonus(total_level: u8) -> u8 {
    match total_level {
        0..=4 => 2,
        5..=8 => 3,
        9..=12 => 4,
        13..=16 => 5,
        _ => 6,
    }
}

/// Experience needed to reach `level`, if it is 1-20.
pub fn experience_for_level(level: u8) -> Option<u32> {
    level
        .checked_sub(1)
        .and_then(|idx| EXPERIENCE_THRESHOLDS.get(idx as usize).copied())
}

/// Highest level reachable with `xp` experience points.
pub fn level_for_experience(xp: u32) -> u8 {
    EXPERIENCE_THRESHOLDS
        .iter()
        .take_while(|&&threshold| xp >= threshold)
        .count() as u8
}

/// Row index for a 1-based class level, clamped to the table.
fn row(level: u8) -> Option<usize> {
    match level {
        0 => None,
        l => Some((l.min(20) - 1) as usize),
    }
}

// ============================================================================
// Spell Slots
// ============================================================================

/// Warlock Pact Magic slots, tracked apart from regular slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PactSlots {
    pub count: u8,
    pub slot_level: u8,
}

/// Spell slots by spell level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlots {
    /// Spell level -> number of slots. Levels without slots are absent.
    pub slots: BTreeMap<u8, u8>,
    pub pact: Option<PactSlots>,
}

impl SpellSlots {
    fn from_row(row: &[u8]) -> Self {
        let slots = row
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(idx, &count)| (idx as u8 + 1, count))
            .collect();
        Self { slots, pact: None }
    }

    fn pact(level: u8) -> Option<PactSlots> {
        row(level).map(|idx| PactSlots {
            count: PACT_SLOT_COUNT[idx],
            slot_level: PACT_SLOT_LEVEL[idx],
        })
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.pact.is_none()
    }

    /// Highest spell level castable from any slot.
    pub fn max_spell_level(&self) -> u8 {
        let regular = self.slots.keys().next_back().copied().unwrap_or(0);
        let pact = self.pact.map(|p| p.slot_level).unwrap_or(0);
        regular.max(pact)
    }
}

// ============================================================================
// Rule Tables
// ============================================================================

/// Static reference data for progression rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTables {
    classes: BTreeMap<CharacterClass, ClassData>,
    #[serde(default = "standard_feats")]
    feats: Vec<Feat>,
    #[serde(default = "standard_fighting_styles")]
    fighting_styles: Vec<FightingStyle>,
}

impl Default for RuleTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleTables {
    /// The Player's Handbook tables for all 12 classes.
    pub fn standard() -> Self {
        Self {
            classes: CharacterClass::all()
                .iter()
                .map(|class| (*class, class.data()))
                .collect(),
            feats: standard_feats(),
            fighting_styles: standard_fighting_styles(),
        }
    }

    /// Load a house-rule variant from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: RuleTables = serde_json::from_str(json)
            .map_err(|e| ProgressionError::InvalidRuleTables(e.to_string()))?;
        tables.check()?;
        Ok(tables)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ProgressionError::InvalidRuleTables(e.to_string()))
    }

    /// Remove a class; later queries for it fail with `UnknownClass`.
    pub fn without_class(mut self, class: CharacterClass) -> Self {
        self.classes.remove(&class);
        self
    }

    /// Replace the data for one class.
    pub fn with_class_data(mut self, class: CharacterClass, data: ClassData) -> Self {
        self.classes.insert(class, data);
        self
    }

    pub fn with_feat(mut self, feat: Feat) -> Self {
        self.feats.retain(|f| !f.name.eq_ignore_ascii_case(&feat.name));
        self.feats.push(feat);
        self
    }

    fn check(&self) -> Result<()> {
        for (class, data) in &self.classes {
            if !(1..=20).contains(&data.subclass_level) {
                return Err(ProgressionError::InvalidRuleTables(format!(
                    "{class}: subclass level {} outside 1-20",
                    data.subclass_level
                )));
            }
            if data.features.keys().any(|level| !(1..=20).contains(level))
                || data.asi_levels.iter().any(|level| !(1..=20).contains(level))
            {
                return Err(ProgressionError::InvalidRuleTables(format!(
                    "{class}: level outside 1-20"
                )));
            }
            if data.spellcasting.learns_spells() && data.spells_known.len() != 20 {
                return Err(ProgressionError::InvalidRuleTables(format!(
                    "{class}: spells_known needs 20 entries"
                )));
            }
            if !data.cantrips_known.is_empty() && data.cantrips_known.len() != 20 {
                return Err(ProgressionError::InvalidRuleTables(format!(
                    "{class}: cantrips_known needs 20 entries"
                )));
            }
        }
        Ok(())
    }

    /// Data for one class.
    pub fn class(&self, class: CharacterClass) -> Result<&ClassData> {
        self.classes
            .get(&class)
            .ok_or_else(|| ProgressionError::UnknownClass(class.name().to_string()))
    }

    /// Classes these tables describe.
    pub fn classes(&self) -> impl Iterator<Item = CharacterClass> + '_ {
        self.classes.keys().copied()
    }

    pub fn hit_die(&self, class: CharacterClass) -> Result<DieType> {
        Ok(self.class(class)?.hit_die)
    }

    pub fn spellcasting_type(&self, class: CharacterClass) -> Result<SpellcastingType> {
        Ok(self.class(class)?.spellcasting)
    }

    pub fn ability_score_improvement_levels(&self, class: CharacterClass) -> Result<&BTreeSet<u8>> {
        Ok(&self.class(class)?.asi_levels)
    }

    pub fn is_asi_level(&self, class: CharacterClass, level: u8) -> Result<bool> {
        Ok(self.class(class)?.asi_levels.contains(&level))
    }

    pub fn subclass_level(&self, class: CharacterClass) -> Result<u8> {
        Ok(self.class(class)?.subclass_level)
    }

    pub fn subclass_feature(&self, class: CharacterClass) -> Result<&str> {
        Ok(&self.class(class)?.subclass_feature)
    }

    pub fn subclasses(&self, class: CharacterClass) -> Result<&[String]> {
        Ok(&self.class(class)?.subclasses)
    }

    pub fn fighting_style_level(&self, class: CharacterClass) -> Result<Option<u8>> {
        Ok(self.class(class)?.fighting_style_level)
    }

    pub fn fighting_styles(&self, class: CharacterClass) -> Result<&[String]> {
        Ok(&self.class(class)?.fighting_styles)
    }

    /// Features gained at one class level, in table order, with "Ability
    /// Score Improvement" appended at improvement levels.
    pub fn features_at_level(&self, class: CharacterClass, level: u8) -> Result<Vec<String>> {
        let data = self.class(class)?;
        let mut features = data.features.get(&level).cloned().unwrap_or_default();
        if data.asi_levels.contains(&level) {
            features.push("Ability Score Improvement".to_string());
        }
        Ok(features)
    }

    /// Spells known (or in the spellbook) at a class level. 0 for classes
    /// that do not learn spells.
    pub fn spells_known(&self, class: CharacterClass, level: u8) -> Result<u8> {
        let data = self.class(class)?;
        Ok(row(level)
            .and_then(|idx| data.spells_known.get(idx).copied())
            .unwrap_or(0))
    }

    pub fn cantrips_known(&self, class: CharacterClass, level: u8) -> Result<u8> {
        let data = self.class(class)?;
        Ok(row(level)
            .and_then(|idx| data.cantrips_known.get(idx).copied())
            .unwrap_or(0))
    }

    /// Slots a single-class character of this class and level has.
    pub fn spell_slots(&self, class: CharacterClass, level: u8) -> Result<SpellSlots> {
        let data = self.class(class)?;
        let Some(idx) = row(level) else {
            return Ok(SpellSlots::default());
        };
        Ok(match data.caster_progression {
            CasterProgression::Full => SpellSlots::from_row(&FULL_CASTER_SLOTS[idx]),
            CasterProgression::Half => SpellSlots::from_row(&HALF_CASTER_SLOTS[idx]),
            CasterProgression::Pact => SpellSlots {
                slots: BTreeMap::new(),
                pact: SpellSlots::pact(level),
            },
            CasterProgression::None => SpellSlots::default(),
        })
    }

    /// Highest spell level a class can cast at a class level. 0 for none.
    pub fn max_spell_level(&self, class: CharacterClass, level: u8) -> Result<u8> {
        Ok(self.spell_slots(class, level)?.max_spell_level())
    }

    /// Slots for a whole class list.
    ///
    /// A lone slot-granting class uses its own table. Several combine into
    /// one caster level (full levels plus half of each half-caster's levels,
    /// rounded down) read from the full-caster table. Pact slots stay separate.
    pub fn combined_spell_slots(&self, classes: &[ClassLevel]) -> Result<SpellSlots> {
        let mut casters = Vec::new();
        let mut pact = None;
        for entry in classes {
            match self.class(entry.class)?.caster_progression {
                CasterProgression::Full | CasterProgression::Half => casters.push(entry),
                CasterProgression::Pact => pact = SpellSlots::pact(entry.level),
                CasterProgression::None => {}
            }
        }

        let mut slots = match casters.as_slice() {
            [] => SpellSlots::default(),
            [only] => self.spell_slots(only.class, only.level)?,
            many => {
                let mut caster_level = 0u8;
                for entry in many {
                    caster_level += match self.class(entry.class)?.caster_progression {
                        CasterProgression::Full => entry.level,
                        _ => entry.level / 2,
                    };
                }
                row(caster_level)
                    .map(|idx| SpellSlots::from_row(&FULL_CASTER_SLOTS[idx]))
                    .unwrap_or_default()
            }
        };
        slots.pact = pact;
        Ok(slots)
    }

    pub fn multiclass_prerequisite(&self, class: CharacterClass) -> Result<&Prerequisite> {
        Ok(&self.class(class)?.prerequisite)
    }

    /// Look up a feat by name (case-insensitive).
    pub fn feat(&self, name: &str) -> Option<&Feat> {
        let name = name.trim();
        self.feats.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn feats(&self) -> &[Feat] {
        &self.feats
    }

    /// Look up a fighting style by name (case-insensitive).
    pub fn fighting_style(&self, name: &str) -> Option<&FightingStyle> {
        let name = name.trim();
        self.fighting_styles
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proficiency_bonus_steps() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(4), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(9), 4);
        assert_eq!(proficiency_bonus(13), 5);
        assert_eq!(proficiency_bonus(17), 6);
        assert_eq!(proficiency_bonus(20), 6);
    }

    #[test]
    fn test_experience_thresholds() {
        assert_eq!(level_for_experience(0), 1);
        assert_eq!(level_for_experience(299), 1);
        assert_eq!(level_for_experience(300), 2);
        assert_eq!(level_for_experience(6500), 5);
        assert_eq!(level_for_experience(1_000_000), 20);
        assert_eq!(experience_for_level(5), Some(6500));
        assert_eq!(experience_for_level(0), None);
        assert_eq!(experience_for_level(21), None);
    }

    #[test]
    fn test_fighter_level_two_features() {
        let tables = RuleTables::standard();
        let features = tables.features_at_level(CharacterClass::Fighter, 2).unwrap();
        assert_eq!(features, vec!["Fighting Style", "Action Surge"]);
        let features = tables.features_at_level(CharacterClass::Fighter, 4).unwrap();
        assert_eq!(features, vec!["Ability Score Improvement"]);
    }

    #[test]
    fn test_half_caster_has_no_slots_at_first_level() {
        let tables = RuleTables::standard();
        assert!(tables.spell_slots(CharacterClass::Paladin, 1).unwrap().is_empty());
        let slots = tables.spell_slots(CharacterClass::Paladin, 2).unwrap();
        assert_eq!(slots.slots.get(&1), Some(&2));
        assert_eq!(tables.max_spell_level(CharacterClass::Paladin, 9).unwrap(), 3);
    }

    #[test]
    fn test_warlock_pact_slots() {
        let tables = RuleTables::standard();
        let slots = tables.spell_slots(CharacterClass::Warlock, 5).unwrap();
        assert!(slots.slots.is_empty());
        assert_eq!(slots.pact, Some(PactSlots { count: 2, slot_level: 3 }));
        assert_eq!(tables.max_spell_level(CharacterClass::Warlock, 11).unwrap(), 5);
    }

    #[test]
    fn test_combined_slots_for_multiclass_caster() {
        let tables = RuleTables::standard();
        let classes = vec![
            ClassLevel::new(CharacterClass::Wizard, 3),
            ClassLevel::new(CharacterClass::Paladin, 4),
            ClassLevel::new(CharacterClass::Warlock, 2),
        ];
        let slots = tables.combined_spell_slots(&classes).unwrap();
        // caster level 3 + 2 = 5
        assert_eq!(slots.slots.get(&3), Some(&2));
        assert_eq!(slots.pact, Some(PactSlots { count: 2, slot_level: 1 }));
    }

    #[test]
    fn test_combined_slots_single_half_caster_uses_own_table() {
        let tables = RuleTables::standard();
        let classes = vec![
            ClassLevel::new(CharacterClass::Ranger, 2),
            ClassLevel::new(CharacterClass::Fighter, 3),
        ];
        let slots = tables.combined_spell_slots(&classes).unwrap();
        assert_eq!(slots.slots.get(&1), Some(&2));
    }

    #[test]
    fn test_without_class_reports_unknown() {
        let tables = RuleTables::standard().without_class(CharacterClass::Monk);
        assert_eq!(
            tables.hit_die(CharacterClass::Monk),
            Err(ProgressionError::UnknownClass("Monk".to_string()))
        );
        assert_eq!(tables.classes().count(), 11);
    }

    #[test]
    fn test_json_round_trip_preserves_tables() {
        let tables = RuleTables::standard().without_class(CharacterClass::Bard);
        let json = tables.to_json().unwrap();
        let loaded = RuleTables::from_json(&json).unwrap();
        assert_eq!(loaded, tables);
    }

    #[test]
    fn test_from_json_rejects_short_spell_table() {
        let mut data = CharacterClass::Sorcerer.data();
        data.spells_known.truncate(5);
        let tables = RuleTables::standard().with_class_data(CharacterClass::Sorcerer, data);
        let json = serde_json::to_string(&tables).unwrap();
        assert!(matches!(
            RuleTables::from_json(&json),
            Err(ProgressionError::InvalidRuleTables(_))
        ));
    }

    #[test]
    fn test_feat_lookup_is_case_insensitive() {
        let tables = RuleTables::standard();
        assert!(tables.feat("great weapon master").is_some());
        assert!(tables.feat("Spell Sniper").is_none());
        assert!(tables.fighting_style("ARCHERY").is_some());
    }
}
