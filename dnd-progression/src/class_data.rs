//! D&D 5e class progression data.
//!
//! Hit dice, feature tables, improvement levels, subclass and fighting-style
//! decisions, multiclass prerequisites, and spell counts for levels 1-20 of
//! all 12 PHB classes.

use crate::dice::DieType;
use crate::world::{Ability, AbilityScores, CharacterClass};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How a class gains spells as it levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellcastingType {
    /// Prepares from the whole class list each day; learns no spells.
    Prepared,
    /// Learns a fixed number of spells per level.
    Known,
    /// Copies spells into a spellbook as it levels.
    Spellbook,
    None,
}

impl SpellcastingType {
    /// Whether leveling up adds spells to the character's list.
    pub fn learns_spells(&self) -> bool {
        matches!(self, SpellcastingType::Known | SpellcastingType::Spellbook)
    }
}

/// Which slot table a class uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CasterProgression {
    Full,
    Half,
    Pact,
    None,
}

/// A single ability minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityMinimum {
    pub ability: Ability,
    pub minimum: u8,
}

impl AbilityMinimum {
    pub const fn new(ability: Ability, minimum: u8) -> Self {
        Self { ability, minimum }
    }

    pub fn is_met(&self, scores: &AbilityScores) -> bool {
        scores.get(self.ability) >= self.minimum
    }
}

/// Multiclass prerequisite for a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prerequisite {
    /// Every minimum must be met.
    All(Vec<AbilityMinimum>),
    /// At least one minimum must be met.
    Any(Vec<AbilityMinimum>),
}

impl Prerequisite {
    pub fn is_met(&self, scores: &AbilityScores) -> bool {
        match self {
            Prerequisite::All(mins) => mins.iter().all(|m| m.is_met(scores)),
            Prerequisite::Any(mins) => mins.iter().any(|m| m.is_met(scores)),
        }
    }

    /// Minimums the scores fall short of. Empty when the prerequisite is met.
    pub fn unmet(&self, scores: &AbilityScores) -> Vec<AbilityMinimum> {
        if self.is_met(scores) {
            return Vec::new();
        }
        match self {
            Prerequisite::All(mins) | Prerequisite::Any(mins) => {
                mins.iter().filter(|m| !m.is_met(scores)).copied().collect()
            }
        }
    }
}

/// Class-specific progression data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassData {
    pub hit_die: DieType,
    pub spellcasting: SpellcastingType,
    pub caster_progression: CasterProgression,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    /// Levels granting an Ability Score Improvement.
    pub asi_levels: BTreeSet<u8>,
    /// Class level at which the subclass is chosen.
    pub subclass_level: u8,
    /// Name of the subclass feature ("Martial Archetype", "Arcane Tradition").
    pub subclass_feature: String,
    pub subclasses: Vec<String>,
    /// Class level of the fighting-style decision, if the class has one.
    #[serde(default)]
    pub fighting_style_level: Option<u8>,
    #[serde(default)]
    pub fighting_styles: Vec<String>,
    /// Features gained at each class level, in table order. Ability Score
    /// Improvements are not listed here.
    pub features: BTreeMap<u8, Vec<String>>,
    pub prerequisite: Prerequisite,
    /// Spells known at class levels 1-20. Empty for classes that do not learn spells.
    #[serde(default)]
    pub spells_known: Vec<u8>,
    /// Cantrips known at class levels 1-20. Empty for classes without cantrips.
    #[serde(default)]
    pub cantrips_known: Vec<u8>,
}

const STANDARD_ASI: &[u8] = &[4, 8, 12, 16, 19];
const FIGHTER_ASI: &[u8] = &[4, 6, 8, 12, 14, 16, 19];
const ROGUE_ASI: &[u8] = &[4, 8, 10, 12, 16, 19];

const BARD_SPELLS: [u8; 20] = [4, 5, 6, 7, 8, 9, 10, 11, 12, 14, 15, 15, 16, 18, 19, 19, 20, 22, 22, 22];
const SORCERER_SPELLS: [u8; 20] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 12, 13, 13, 14, 14, 15, 15, 15, 15];
const WARLOCK_SPELLS: [u8; 20] = [2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15];
const RANGER_SPELLS: [u8; 20] = [0, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11];

fn levels(levels: &[u8]) -> BTreeSet<u8> {
    levels.iter().copied().collect()
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn feature_table(rows: &[(u8, &[&str])]) -> BTreeMap<u8, Vec<String>> {
    rows.iter().map(|(level, feats)| (*level, names(feats))).collect()
}

/// Cantrips known: one count for levels 1-3, one for 4-9, one for 10+.
fn cantrip_table(early: u8, mid: u8, late: u8) -> Vec<u8> {
    (1..=20u8)
        .map(|level| match level {
            1..=3 => early,
            4..=9 => mid,
            _ => late,
        })
        .collect()
}

/// Wizards add six spells to their book at 1st level and two per level after.
fn spellbook_table() -> Vec<u8> {
    (1..=20u8).map(|level| 6 + 2 * (level - 1)).collect()
}

fn single(ability: Ability) -> Prerequisite {
    Prerequisite::All(vec![AbilityMinimum::new(ability, 13)])
}

fn both(a: Ability, b: Ability) -> Prerequisite {
    Prerequisite::All(vec![AbilityMinimum::new(a, 13), AbilityMinimum::new(b, 13)])
}

impl CharacterClass {
    /// Get class progression data.
    pub fn data(&self) -> ClassData {
        match self {
            CharacterClass::Barbarian => ClassData {
                hit_die: DieType::D12,
                spellcasting: SpellcastingType::None,
                caster_progression: CasterProgression::None,
                spellcasting_ability: None,
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 3,
                subclass_feature: "Primal Path".to_string(),
                subclasses: names(&[
                    "Path of the Berserker",
                    "Path of the Totem Warrior",
                    "Path of the Wild Soul",
                ]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Rage", "Unarmored Defense"]),
                    (2, &["Reckless Attack", "Danger Sense"]),
                    (3, &["Primal Path"]),
                    (5, &["Extra Attack", "Fast Movement"]),
                    (6, &["Path Feature"]),
                    (7, &["Feral Instinct"]),
                    (9, &["Brutal Critical (1 die)"]),
                    (10, &["Path Feature"]),
                    (11, &["Relentless Rage"]),
                    (13, &["Brutal Critical (2 dice)"]),
                    (14, &["Path Feature"]),
                    (15, &["Persistent Rage"]),
                    (17, &["Brutal Critical (3 dice)"]),
                    (18, &["Indomitable Might"]),
                    (20, &["Primal Champion"]),
                ]),
                prerequisite: single(Ability::Strength),
                spells_known: Vec::new(),
                cantrips_known: Vec::new(),
            },
            CharacterClass::Bard => ClassData {
                hit_die: DieType::D8,
                spellcasting: SpellcastingType::Known,
                caster_progression: CasterProgression::Full,
                spellcasting_ability: Some(Ability::Charisma),
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 3,
                subclass_feature: "Bard College".to_string(),
                subclasses: names(&["College of Lore", "College of Valor", "College of Glamour"]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Spellcasting", "Bardic Inspiration (d6)"]),
                    (2, &["Jack of All Trades", "Song of Rest (d6)"]),
                    (3, &["Bard College", "Expertise"]),
                    (5, &["Bardic Inspiration (d8)", "Font of Inspiration"]),
                    (6, &["Countercharm", "Bard College Feature"]),
                    (9, &["Song of Rest (d8)"]),
                    (10, &["Bardic Inspiration (d10)", "Expertise", "Magical Secrets"]),
                    (13, &["Song of Rest (d10)"]),
                    (14, &["Magical Secrets", "Bard College Feature"]),
                    (15, &["Bardic Inspiration (d12)"]),
                    (17, &["Song of Rest (d12)"]),
                    (18, &["Magical Secrets"]),
                    (20, &["Superior Inspiration"]),
                ]),
                prerequisite: single(Ability::Charisma),
                spells_known: BARD_SPELLS.to_vec(),
                cantrips_known: cantrip_table(2, 3, 4),
            },
            CharacterClass::Cleric => ClassData {
                hit_die: DieType::D8,
                spellcasting: SpellcastingType::Prepared,
                caster_progression: CasterProgression::Full,
                spellcasting_ability: Some(Ability::Wisdom),
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 1,
                subclass_feature: "Divine Domain".to_string(),
                subclasses: names(&["Life Domain", "Light Domain", "War Domain", "Tempest Domain"]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Spellcasting", "Divine Domain"]),
                    (2, &["Channel Divinity (1/rest)", "Divine Domain Feature"]),
                    (5, &["Destroy Undead (CR 1/2)"]),
                    (6, &["Channel Divinity (2/rest)", "Divine Domain Feature"]),
                    (8, &["Destroy Undead (CR 1)", "Divine Domain Feature"]),
                    (10, &["Divine Intervention"]),
                    (11, &["Destroy Undead (CR 2)"]),
                    (14, &["Destroy Undead (CR 3)"]),
                    (17, &["Destroy Undead (CR 4)", "Divine Domain Feature"]),
                    (18, &["Channel Divinity (3/rest)"]),
                    (20, &["Divine Intervention Improvement"]),
                ]),
                prerequisite: single(Ability::Wisdom),
                spells_known: Vec::new(),
                cantrips_known: cantrip_table(3, 4, 5),
            },
            CharacterClass::Druid => ClassData {
                hit_die: DieType::D8,
                spellcasting: SpellcastingType::Prepared,
                caster_progression: CasterProgression::Full,
                spellcasting_ability: Some(Ability::Wisdom),
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 2,
                subclass_feature: "Druid Circle".to_string(),
                subclasses: names(&["Circle of the Land", "Circle of the Moon", "Circle of Stars"]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Druidic", "Spellcasting"]),
                    (2, &["Wild Shape", "Druid Circle"]),
                    (4, &["Wild Shape Improvement"]),
                    (6, &["Druid Circle Feature"]),
                    (8, &["Wild Shape Improvement"]),
                    (10, &["Druid Circle Feature"]),
                    (14, &["Druid Circle Feature"]),
                    (18, &["Timeless Body", "Beast Spells"]),
                    (20, &["Archdruid"]),
                ]),
                prerequisite: single(Ability::Wisdom),
                spells_known: Vec::new(),
                cantrips_known: cantrip_table(2, 3, 4),
            },
            CharacterClass::Fighter => ClassData {
                hit_die: DieType::D10,
                spellcasting: SpellcastingType::None,
                caster_progression: CasterProgression::None,
                spellcasting_ability: None,
                asi_levels: levels(FIGHTER_ASI),
                subclass_level: 3,
                subclass_feature: "Martial Archetype".to_string(),
                subclasses: names(&["Champion", "Battle Master", "Eldritch Knight"]),
                fighting_style_level: Some(2),
                fighting_styles: names(&[
                    "Archery",
                    "Defense",
                    "Dueling",
                    "Great Weapon Fighting",
                    "Protection",
                    "Two-Weapon Fighting",
                ]),
                features: feature_table(&[
                    (1, &["Second Wind"]),
                    (2, &["Fighting Style", "Action Surge"]),
                    (3, &["Martial Archetype"]),
                    (5, &["Extra Attack"]),
                    (7, &["Martial Archetype Feature"]),
                    (9, &["Indomitable (one use)"]),
                    (10, &["Martial Archetype Feature"]),
                    (11, &["Extra Attack (2)"]),
                    (13, &["Indomitable (two uses)"]),
                    (15, &["Martial Archetype Feature"]),
                    (17, &["Action Surge (two uses)", "Indomitable (three uses)"]),
                    (18, &["Martial Archetype Feature"]),
                    (20, &["Extra Attack (3)"]),
                ]),
                prerequisite: Prerequisite::Any(vec![
                    AbilityMinimum::new(Ability::Strength, 13),
                    AbilityMinimum::new(Ability::Dexterity, 13),
                ]),
                spells_known: Vec::new(),
                cantrips_known: Vec::new(),
            },
            CharacterClass::Monk => ClassData {
                hit_die: DieType::D8,
                spellcasting: SpellcastingType::None,
                caster_progression: CasterProgression::None,
                spellcasting_ability: None,
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 3,
                subclass_feature: "Monastic Tradition".to_string(),
                subclasses: names(&[
                    "Way of the Open Hand",
                    "Way of Shadow",
                    "Way of the Four Elements",
                ]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Unarmored Defense", "Martial Arts"]),
                    (2, &["Ki", "Unarmored Movement"]),
                    (3, &["Monastic Tradition", "Deflect Missiles"]),
                    (4, &["Slow Fall"]),
                    (5, &["Extra Attack", "Stunning Strike"]),
                    (6, &["Ki-Empowered Strikes", "Monastic Tradition Feature"]),
                    (7, &["Evasion", "Stillness of Mind"]),
                    (9, &["Unarmored Movement Improvement"]),
                    (10, &["Purity of Body"]),
                    (11, &["Monastic Tradition Feature"]),
                    (13, &["Tongue of the Sun and Moon"]),
                    (14, &["Diamond Soul"]),
                    (15, &["Timeless Body"]),
                    (17, &["Monastic Tradition Feature"]),
                    (18, &["Empty Body"]),
                    (20, &["Perfect Self"]),
                ]),
                prerequisite: both(Ability::Dexterity, Ability::Wisdom),
                spells_known: Vec::new(),
                cantrips_known: Vec::new(),
            },
            CharacterClass::Paladin => ClassData {
                hit_die: DieType::D10,
                spellcasting: SpellcastingType::Prepared,
                caster_progression: CasterProgression::Half,
                spellcasting_ability: Some(Ability::Charisma),
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 3,
                subclass_feature: "Sacred Oath".to_string(),
                subclasses: names(&["Oath of Devotion", "Oath of the Ancients", "Oath of Vengeance"]),
                fighting_style_level: Some(2),
                fighting_styles: names(&["Defense", "Dueling", "Great Weapon Fighting", "Protection"]),
                features: feature_table(&[
                    (1, &["Divine Sense", "Lay on Hands"]),
                    (2, &["Fighting Style", "Spellcasting", "Divine Smite"]),
                    (3, &["Divine Health", "Sacred Oath"]),
                    (5, &["Extra Attack"]),
                    (6, &["Aura of Protection"]),
                    (7, &["Sacred Oath Feature"]),
                    (10, &["Aura of Courage"]),
                    (11, &["Improved Divine Smite"]),
                    (14, &["Cleansing Touch"]),
                    (15, &["Sacred Oath Feature"]),
                    (18, &["Aura Improvements"]),
                    (20, &["Sacred Oath Feature"]),
                ]),
                prerequisite: both(Ability::Strength, Ability::Charisma),
                spells_known: Vec::new(),
                cantrips_known: Vec::new(),
            },
            CharacterClass::Ranger => ClassData {
                hit_die: DieType::D10,
                spellcasting: SpellcastingType::Known,
                caster_progression: CasterProgression::Half,
                spellcasting_ability: Some(Ability::Wisdom),
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 3,
                subclass_feature: "Ranger Archetype".to_string(),
                subclasses: names(&["Hunter", "Beast Master", "Gloom Stalker"]),
                fighting_style_level: Some(2),
                fighting_styles: names(&["Archery", "Defense", "Dueling", "Two-Weapon Fighting"]),
                features: feature_table(&[
                    (1, &["Favored Enemy", "Natural Explorer"]),
                    (2, &["Fighting Style", "Spellcasting"]),
                    (3, &["Ranger Archetype", "Primeval Awareness"]),
                    (5, &["Extra Attack"]),
                    (6, &["Favored Enemy and Natural Explorer Improvements"]),
                    (7, &["Ranger Archetype Feature"]),
                    (8, &["Land's Stride"]),
                    (10, &["Natural Explorer Improvement", "Hide in Plain Sight"]),
                    (11, &["Ranger Archetype Feature"]),
                    (14, &["Favored Enemy Improvement", "Vanish"]),
                    (15, &["Ranger Archetype Feature"]),
                    (18, &["Feral Senses"]),
                    (20, &["Foe Slayer"]),
                ]),
                prerequisite: both(Ability::Dexterity, Ability::Wisdom),
                spells_known: RANGER_SPELLS.to_vec(),
                cantrips_known: Vec::new(),
            },
            CharacterClass::Rogue => ClassData {
                hit_die: DieType::D8,
                spellcasting: SpellcastingType::None,
                caster_progression: CasterProgression::None,
                spellcasting_ability: None,
                asi_levels: levels(ROGUE_ASI),
                subclass_level: 3,
                subclass_feature: "Roguish Archetype".to_string(),
                subclasses: names(&["Thief", "Assassin", "Arcane Trickster"]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Expertise", "Sneak Attack", "Thieves' Cant"]),
                    (2, &["Cunning Action"]),
                    (3, &["Roguish Archetype"]),
                    (5, &["Uncanny Dodge"]),
                    (6, &["Expertise"]),
                    (7, &["Evasion"]),
                    (9, &["Roguish Archetype Feature"]),
                    (11, &["Reliable Talent"]),
                    (13, &["Roguish Archetype Feature"]),
                    (14, &["Blindsense"]),
                    (15, &["Slippery Mind"]),
                    (17, &["Roguish Archetype Feature"]),
                    (18, &["Elusive"]),
                    (20, &["Stroke of Luck"]),
                ]),
                prerequisite: single(Ability::Dexterity),
                spells_known: Vec::new(),
                cantrips_known: Vec::new(),
            },
            CharacterClass::Sorcerer => ClassData {
                hit_die: DieType::D6,
                spellcasting: SpellcastingType::Known,
                caster_progression: CasterProgression::Full,
                spellcasting_ability: Some(Ability::Charisma),
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 1,
                subclass_feature: "Sorcerous Origin".to_string(),
                subclasses: names(&["Draconic Bloodline", "Wild Magic", "Divine Soul"]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Spellcasting", "Sorcerous Origin"]),
                    (2, &["Font of Magic"]),
                    (3, &["Metamagic"]),
                    (6, &["Sorcerous Origin Feature"]),
                    (10, &["Metamagic"]),
                    (14, &["Sorcerous Origin Feature"]),
                    (17, &["Metamagic"]),
                    (18, &["Sorcerous Origin Feature"]),
                    (20, &["Sorcerous Restoration"]),
                ]),
                prerequisite: single(Ability::Charisma),
                spells_known: SORCERER_SPELLS.to_vec(),
                cantrips_known: cantrip_table(4, 5, 6),
            },
            CharacterClass::Warlock => ClassData {
                hit_die: DieType::D8,
                spellcasting: SpellcastingType::Known,
                caster_progression: CasterProgression::Pact,
                spellcasting_ability: Some(Ability::Charisma),
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 1,
                subclass_feature: "Otherworldly Patron".to_string(),
                subclasses: names(&["The Fiend", "The Archfey", "The Great Old One"]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Otherworldly Patron", "Pact Magic"]),
                    (2, &["Eldritch Invocations"]),
                    (3, &["Pact Boon"]),
                    (6, &["Otherworldly Patron Feature"]),
                    (10, &["Otherworldly Patron Feature"]),
                    (11, &["Mystic Arcanum (6th level)"]),
                    (13, &["Mystic Arcanum (7th level)"]),
                    (14, &["Otherworldly Patron Feature"]),
                    (15, &["Mystic Arcanum (8th level)"]),
                    (17, &["Mystic Arcanum (9th level)"]),
                    (20, &["Eldritch Master"]),
                ]),
                prerequisite: single(Ability::Charisma),
                spells_known: WARLOCK_SPELLS.to_vec(),
                cantrips_known: cantrip_table(2, 3, 4),
            },
            CharacterClass::Wizard => ClassData {
                hit_die: DieType::D6,
                spellcasting: SpellcastingType::Spellbook,
                caster_progression: CasterProgression::Full,
                spellcasting_ability: Some(Ability::Intelligence),
                asi_levels: levels(STANDARD_ASI),
                subclass_level: 2,
                subclass_feature: "Arcane Tradition".to_string(),
                subclasses: names(&[
                    "School of Evocation",
                    "School of Abjuration",
                    "School of Divination",
                    "School of Necromancy",
                ]),
                fighting_style_level: None,
                fighting_styles: Vec::new(),
                features: feature_table(&[
                    (1, &["Spellcasting", "Arcane Recovery"]),
                    (2, &["Arcane Tradition"]),
                    (6, &["Arcane Tradition Feature"]),
                    (10, &["Arcane Tradition Feature"]),
                    (14, &["Arcane Tradition Feature"]),
                    (18, &["Spell Mastery"]),
                    (20, &["Signature Spells"]),
                ]),
                prerequisite: single(Ability::Intelligence),
                spells_known: spellbook_table(),
                cantrips_known: cantrip_table(3, 4, 5),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_classes_have_complete_tables() {
        for class in CharacterClass::all() {
            let data = class.data();
            assert!(!data.subclasses.is_empty(), "{class} has no subclasses");
            assert!(
                data.features.keys().all(|level| (1..=20).contains(level)),
                "{class} has a feature outside 1-20"
            );
            if data.spellcasting.learns_spells() {
                assert_eq!(data.spells_known.len(), 20, "{class} spells known");
            }
            if !data.cantrips_known.is_empty() {
                assert_eq!(data.cantrips_known.len(), 20, "{class} cantrips known");
            }
            assert_eq!(
                data.fighting_style_level.is_some(),
                !data.fighting_styles.is_empty(),
                "{class} fighting style data mismatch"
            );
        }
    }

    #[test]
    fn test_asi_exceptions() {
        assert_eq!(
            CharacterClass::Fighter.data().asi_levels,
            levels(&[4, 6, 8, 12, 14, 16, 19])
        );
        assert_eq!(
            CharacterClass::Rogue.data().asi_levels,
            levels(&[4, 8, 10, 12, 16, 19])
        );
        assert_eq!(CharacterClass::Cleric.data().asi_levels, levels(&[4, 8, 12, 16, 19]));
    }

    #[test]
    fn test_fighter_prerequisite_is_either() {
        let prereq = CharacterClass::Fighter.data().prerequisite;
        let dex_only = AbilityScores::new(8, 14, 10, 10, 10, 10);
        let neither = AbilityScores::new(12, 12, 10, 10, 10, 10);
        assert!(prereq.is_met(&dex_only));
        assert!(!prereq.is_met(&neither));
        assert_eq!(prereq.unmet(&neither).len(), 2);
        assert!(prereq.unmet(&dex_only).is_empty());
    }

    #[test]
    fn test_monk_needs_both() {
        let prereq = CharacterClass::Monk.data().prerequisite;
        let dex_only = AbilityScores::new(10, 15, 10, 10, 12, 10);
        let unmet = prereq.unmet(&dex_only);
        assert_eq!(unmet, vec![AbilityMinimum::new(Ability::Wisdom, 13)]);
    }

    #[test]
    fn test_wizard_spellbook_growth() {
        let data = CharacterClass::Wizard.data();
        assert_eq!(data.spells_known[0], 6);
        assert_eq!(data.spells_known[1], 8);
        assert_eq!(data.spells_known[19], 44);
    }
}
