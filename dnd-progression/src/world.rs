//! Character state types the progression engine reads.
//!
//! A [`CharacterSnapshot`] is an immutable view of the parts of a D&D 5e
//! character that level-up rules care about: ability scores, hit points,
//! class levels, and spells. Identity, inventory, and narrative state live
//! with the caller.

use crate::config::ProgressionConfig;
use crate::error::{ProgressionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Ability Scores
// ============================================================================

/// Lowest score a snapshot may carry.
pub const MIN_ABILITY_SCORE: u8 = 3;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Builder-style variant of [`AbilityScores::set`].
    pub fn with(mut self, ability: Ability, value: u8) -> Self {
        self.set(ability, value);
        self
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        let score = self.get(ability) as i16;
        // Floor division: 8-9 = -1, 10-11 = 0, 12-13 = +1
        (score - 10).div_euclid(2) as i8
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

// ============================================================================
// Hit Points
// ============================================================================

/// Hit points tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
}

impl HitPoints {
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Raise both current and maximum by the same amount.
    pub fn gain(&self, amount: i32) -> Self {
        Self {
            current: self.current + amount,
            maximum: self.maximum + amount,
        }
    }
}

impl Default for HitPoints {
    fn default() -> Self {
        Self::new(1)
    }
}

// ============================================================================
// Classes
// ============================================================================

/// D&D character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Monk => "Monk",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Wizard => "Wizard",
        }
    }

    /// Get all character classes.
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Cleric,
            CharacterClass::Druid,
            CharacterClass::Fighter,
            CharacterClass::Monk,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Sorcerer,
            CharacterClass::Warlock,
            CharacterClass::Wizard,
        ]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        CharacterClass::all()
            .iter()
            .copied()
            .find(|class| class.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProgressionError::UnknownClass(wanted.to_string()))
    }
}

/// Levels taken in one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub class: CharacterClass,
    pub level: u8,
    pub subclass: Option<String>,
}

impl ClassLevel {
    pub fn new(class: CharacterClass, level: u8) -> Self {
        Self {
            class,
            level,
            subclass: None,
        }
    }

    pub fn with_subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclass = Some(subclass.into());
        self
    }
}

// ============================================================================
// Character Snapshot
// ============================================================================

/// Read-only view of a character for level-up purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub ability_scores: AbilityScores,
    pub hit_points: HitPoints,
    pub classes: Vec<ClassLevel>,
    #[serde(default)]
    pub spells_known: Vec<String>,
    #[serde(default)]
    pub cantrips_known: Vec<String>,
    #[serde(default)]
    pub spells_prepared: Vec<String>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
}

impl CharacterSnapshot {
    /// A classless character with the given scores.
    pub fn new(ability_scores: AbilityScores) -> Self {
        Self {
            ability_scores,
            hit_points: HitPoints::default(),
            classes: Vec::new(),
            spells_known: Vec::new(),
            cantrips_known: Vec::new(),
            spells_prepared: Vec::new(),
            spellcasting_ability: None,
        }
    }

    /// Add (or replace) the levels held in a class.
    pub fn with_class(mut self, class: CharacterClass, level: u8) -> Self {
        self.classes.retain(|c| c.class != class);
        self.classes.push(ClassLevel::new(class, level));
        self
    }

    /// Add a class entry that already has a subclass.
    pub fn with_class_level(mut self, class_level: ClassLevel) -> Self {
        self.classes.retain(|c| c.class != class_level.class);
        self.classes.push(class_level);
        self
    }

    pub fn with_hit_points(mut self, maximum: i32) -> Self {
        self.hit_points = HitPoints::new(maximum);
        self
    }

    pub fn with_spells_known<I, S>(mut self, spells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spells_known = spells.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cantrips_known<I, S>(mut self, cantrips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cantrips_known = cantrips.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_spellcasting_ability(mut self, ability: Ability) -> Self {
        self.spellcasting_ability = Some(ability);
        self
    }

    /// Sum of levels across all classes.
    pub fn total_level(&self) -> u8 {
        let total: u32 = self.classes.iter().map(|c| c.level as u32).sum();
        total.min(u8::MAX as u32) as u8
    }

    /// Levels held in `class`, 0 if the class has never been taken.
    pub fn class_level(&self, class: CharacterClass) -> u8 {
        self.class_entry(class).map(|c| c.level).unwrap_or(0)
    }

    pub fn class_entry(&self, class: CharacterClass) -> Option<&ClassLevel> {
        self.classes.iter().find(|c| c.class == class)
    }

    pub fn has_class(&self, class: CharacterClass) -> bool {
        self.class_entry(class).is_some()
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        self.ability_scores.modifier(ability)
    }

    /// Whether a spell or cantrip of this name is already known.
    pub fn knows_spell(&self, name: &str) -> bool {
        self.spells_known
            .iter()
            .chain(self.cantrips_known.iter())
            .any(|known| known.eq_ignore_ascii_case(name))
    }

    /// Check the snapshot's own invariants against the configured limits.
    pub fn validate(&self, config: &ProgressionConfig) -> Result<()> {
        for ability in Ability::all() {
            let score = self.ability_scores.get(ability);
            if !(MIN_ABILITY_SCORE..=config.max_ability_score).contains(&score) {
                return Err(ProgressionError::InvalidSnapshot(format!(
                    "{} {score} is outside {MIN_ABILITY_SCORE}-{}",
                    ability.name(),
                    config.max_ability_score
                )));
            }
        }

        let max_level = config.max_level;
        let mut seen = HashSet::new();
        for entry in &self.classes {
            if entry.level == 0 {
                return Err(ProgressionError::InvalidSnapshot(format!(
                    "{} has level 0",
                    entry.class
                )));
            }
            if !seen.insert(entry.class) {
                return Err(ProgressionError::InvalidSnapshot(format!(
                    "{} appears more than once",
                    entry.class
                )));
            }
        }
        let total: u32 = self.classes.iter().map(|c| c.level as u32).sum();
        if total > max_level as u32 {
            return Err(ProgressionError::InvalidSnapshot(format!(
                "total level {total} exceeds {max_level}"
            )));
        }
        Ok(())
    }
}
