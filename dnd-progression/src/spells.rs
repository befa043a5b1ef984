//! Spell catalog.
//!
//! The engine reads spells through the [`SpellCatalog`] trait. A built-in
//! SRD catalog covers the PHB class lists; callers with their own spell
//! data implement the trait or pass a `Vec<Spell>`.

use crate::world::CharacterClass;
use crate::world::CharacterClass::{
    Bard, Cleric, Druid, Paladin, Ranger, Sorcerer, Warlock, Wizard,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Schools of magic in D&D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellSchool {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl SpellSchool {
    pub fn name(&self) -> &'static str {
        match self {
            SpellSchool::Abjuration => "Abjuration",
            SpellSchool::Conjuration => "Conjuration",
            SpellSchool::Divination => "Divination",
            SpellSchool::Enchantment => "Enchantment",
            SpellSchool::Evocation => "Evocation",
            SpellSchool::Illusion => "Illusion",
            SpellSchool::Necromancy => "Necromancy",
            SpellSchool::Transmutation => "Transmutation",
        }
    }
}

/// A spell as the progression engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    /// 0 for cantrips.
    pub level: u8,
    pub school: SpellSchool,
    pub classes: Vec<CharacterClass>,
}

impl Spell {
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn available_to(&self, class: CharacterClass) -> bool {
        self.classes.contains(&class)
    }
}

/// Source of spells for a class.
pub trait SpellCatalog {
    /// Spells on `class`'s list of level 0 through `max_level`, ordered by
    /// level then name.
    fn class_spells(&self, class: CharacterClass, max_level: u8) -> Vec<Spell>;

    /// Look up one spell by name.
    fn spell(&self, name: &str) -> Option<Spell>;
}

impl SpellCatalog for Vec<Spell> {
    fn class_spells(&self, class: CharacterClass, max_level: u8) -> Vec<Spell> {
        let mut spells: Vec<Spell> = self
            .iter()
            .filter(|s| s.level <= max_level && s.available_to(class))
            .cloned()
            .collect();
        spells.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        spells
    }

    fn spell(&self, name: &str) -> Option<Spell> {
        let name = name.trim();
        self.iter().find(|s| s.name.eq_ignore_ascii_case(name)).cloned()
    }
}

// ============================================================================
// Spell Database
// ============================================================================

/// The built-in SRD catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrdSpellCatalog;

impl SpellCatalog for SrdSpellCatalog {
    fn class_spells(&self, class: CharacterClass, max_level: u8) -> Vec<Spell> {
        let mut spells: Vec<Spell> = SPELL_DATABASE
            .values()
            .filter(|s| s.level <= max_level && s.available_to(class))
            .cloned()
            .collect();
        spells.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        spells
    }

    fn spell(&self, name: &str) -> Option<Spell> {
        get_spell(name).cloned()
    }
}

lazy_static::lazy_static! {
    /// Global spell database, keyed by lowercase name.
    static ref SPELL_DATABASE: HashMap<String, Spell> = build_spell_database();
}

/// Look up a spell by name (case-insensitive).
pub fn get_spell(name: &str) -> Option<&'static Spell> {
    SPELL_DATABASE.get(&name.trim().to_lowercase())
}

/// Get all spells in the database.
pub fn all_spells() -> impl Iterator<Item = &'static Spell> {
    SPELL_DATABASE.values()
}

type SpellRow = (&'static str, u8, SpellSchool, &'static [CharacterClass]);

const SRD_SPELLS: &[SpellRow] = {
    use SpellSchool::*;
    &[
        // Cantrips
        ("Acid Splash", 0, Conjuration, &[Sorcerer, Wizard]),
        ("Chill Touch", 0, Necromancy, &[Sorcerer, Warlock, Wizard]),
        ("Dancing Lights", 0, Evocation, &[Bard, Sorcerer, Wizard]),
        ("Druidcraft", 0, Transmutation, &[Druid]),
        ("Eldritch Blast", 0, Evocation, &[Warlock]),
        ("Fire Bolt", 0, Evocation, &[Sorcerer, Wizard]),
        ("Guidance", 0, Divination, &[Cleric, Druid]),
        ("Light", 0, Evocation, &[Bard, Cleric, Sorcerer, Wizard]),
        ("Mage Hand", 0, Conjuration, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Mending", 0, Transmutation, &[Bard, Cleric, Druid, Sorcerer, Wizard]),
        ("Message", 0, Transmutation, &[Bard, Sorcerer, Wizard]),
        ("Minor Illusion", 0, Illusion, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Poison Spray", 0, Conjuration, &[Druid, Sorcerer, Warlock, Wizard]),
        ("Prestidigitation", 0, Transmutation, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Produce Flame", 0, Conjuration, &[Druid]),
        ("Ray of Frost", 0, Evocation, &[Sorcerer, Wizard]),
        ("Resistance", 0, Abjuration, &[Cleric, Druid]),
        ("Sacred Flame", 0, Evocation, &[Cleric]),
        ("Shillelagh", 0, Transmutation, &[Druid]),
        ("Shocking Grasp", 0, Evocation, &[Sorcerer, Wizard]),
        ("Spare the Dying", 0, Necromancy, &[Cleric]),
        ("Thaumaturgy", 0, Transmutation, &[Cleric]),
        ("True Strike", 0, Divination, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Vicious Mockery", 0, Enchantment, &[Bard]),
        // 1st level
        ("Armor of Agathys", 1, Abjuration, &[Warlock]),
        ("Bless", 1, Enchantment, &[Cleric, Paladin]),
        ("Burning Hands", 1, Evocation, &[Sorcerer, Wizard]),
        ("Charm Person", 1, Enchantment, &[Bard, Druid, Sorcerer, Warlock, Wizard]),
        ("Command", 1, Enchantment, &[Cleric, Paladin]),
        ("Comprehend Languages", 1, Divination, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Cure Wounds", 1, Evocation, &[Bard, Cleric, Druid, Paladin, Ranger]),
        ("Detect Magic", 1, Divination, &[Bard, Cleric, Druid, Paladin, Ranger, Sorcerer, Wizard]),
        ("Disguise Self", 1, Illusion, &[Bard, Sorcerer, Wizard]),
        ("Entangle", 1, Conjuration, &[Druid]),
        ("Faerie Fire", 1, Evocation, &[Bard, Druid]),
        ("Feather Fall", 1, Transmutation, &[Bard, Sorcerer, Wizard]),
        ("Find Familiar", 1, Conjuration, &[Wizard]),
        ("Fog Cloud", 1, Conjuration, &[Druid, Ranger, Sorcerer, Wizard]),
        ("Goodberry", 1, Transmutation, &[Druid, Ranger]),
        ("Guiding Bolt", 1, Evocation, &[Cleric]),
        ("Hail of Thorns", 1, Conjuration, &[Ranger]),
        ("Healing Word", 1, Evocation, &[Bard, Cleric, Druid]),
        ("Hellish Rebuke", 1, Evocation, &[Warlock]),
        ("Heroism", 1, Enchantment, &[Bard, Paladin]),
        ("Hex", 1, Enchantment, &[Warlock]),
        ("Hunter's Mark", 1, Divination, &[Ranger]),
        ("Identify", 1, Divination, &[Bard, Wizard]),
        ("Mage Armor", 1, Abjuration, &[Sorcerer, Wizard]),
        ("Magic Missile", 1, Evocation, &[Sorcerer, Wizard]),
        ("Protection from Evil and Good", 1, Abjuration, &[Cleric, Paladin, Warlock, Wizard]),
        ("Shield", 1, Abjuration, &[Sorcerer, Wizard]),
        ("Shield of Faith", 1, Abjuration, &[Cleric, Paladin]),
        ("Sleep", 1, Enchantment, &[Bard, Sorcerer, Wizard]),
        ("Speak with Animals", 1, Divination, &[Bard, Druid, Ranger]),
        ("Thunderwave", 1, Evocation, &[Bard, Druid, Sorcerer, Wizard]),
        // 2nd level
        ("Aid", 2, Abjuration, &[Cleric, Paladin]),
        ("Darkness", 2, Evocation, &[Sorcerer, Warlock, Wizard]),
        ("Hold Person", 2, Enchantment, &[Bard, Cleric, Druid, Sorcerer, Warlock, Wizard]),
        ("Invisibility", 2, Illusion, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Lesser Restoration", 2, Abjuration, &[Bard, Cleric, Druid, Paladin, Ranger]),
        ("Mirror Image", 2, Illusion, &[Sorcerer, Warlock, Wizard]),
        ("Misty Step", 2, Conjuration, &[Sorcerer, Warlock, Wizard]),
        ("Moonbeam", 2, Evocation, &[Druid]),
        ("Pass without Trace", 2, Abjuration, &[Druid, Ranger]),
        ("Scorching Ray", 2, Evocation, &[Sorcerer, Wizard]),
        ("Shatter", 2, Evocation, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Spike Growth", 2, Transmutation, &[Druid, Ranger]),
        ("Spiritual Weapon", 2, Evocation, &[Cleric]),
        ("Suggestion", 2, Enchantment, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Web", 2, Conjuration, &[Sorcerer, Wizard]),
        // 3rd level
        ("Call Lightning", 3, Conjuration, &[Druid]),
        ("Conjure Animals", 3, Conjuration, &[Druid, Ranger]),
        ("Counterspell", 3, Abjuration, &[Sorcerer, Warlock, Wizard]),
        ("Dispel Magic", 3, Abjuration, &[Bard, Cleric, Druid, Paladin, Sorcerer, Warlock, Wizard]),
        ("Fireball", 3, Evocation, &[Sorcerer, Wizard]),
        ("Fly", 3, Transmutation, &[Sorcerer, Warlock, Wizard]),
        ("Haste", 3, Transmutation, &[Sorcerer, Wizard]),
        ("Hunger of Hadar", 3, Conjuration, &[Warlock]),
        ("Hypnotic Pattern", 3, Illusion, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Lightning Bolt", 3, Evocation, &[Sorcerer, Wizard]),
        ("Mass Healing Word", 3, Evocation, &[Cleric]),
        ("Revivify", 3, Necromancy, &[Cleric, Paladin]),
        ("Spirit Guardians", 3, Conjuration, &[Cleric]),
        // 4th level
        ("Banishment", 4, Abjuration, &[Cleric, Paladin, Sorcerer, Warlock, Wizard]),
        ("Dimension Door", 4, Conjuration, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Freedom of Movement", 4, Abjuration, &[Bard, Cleric, Druid, Ranger]),
        ("Greater Invisibility", 4, Illusion, &[Bard, Sorcerer, Wizard]),
        ("Guardian of Faith", 4, Conjuration, &[Cleric]),
        ("Polymorph", 4, Transmutation, &[Bard, Druid, Sorcerer, Wizard]),
        ("Wall of Fire", 4, Evocation, &[Druid, Sorcerer, Wizard]),
        // 5th level
        ("Cone of Cold", 5, Evocation, &[Sorcerer, Wizard]),
        ("Greater Restoration", 5, Abjuration, &[Bard, Cleric, Druid]),
        ("Hold Monster", 5, Enchantment, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Mass Cure Wounds", 5, Evocation, &[Bard, Cleric, Druid]),
        ("Raise Dead", 5, Necromancy, &[Bard, Cleric, Paladin]),
        ("Scrying", 5, Divination, &[Bard, Cleric, Druid, Warlock, Wizard]),
        ("Tree Stride", 5, Conjuration, &[Druid, Ranger]),
        ("Wall of Force", 5, Evocation, &[Wizard]),
        // 6th level
        ("Chain Lightning", 6, Evocation, &[Sorcerer, Wizard]),
        ("Disintegrate", 6, Transmutation, &[Sorcerer, Wizard]),
        ("Heal", 6, Evocation, &[Cleric, Druid]),
        ("True Seeing", 6, Divination, &[Bard, Cleric, Sorcerer, Warlock, Wizard]),
        // 7th level
        ("Finger of Death", 7, Necromancy, &[Sorcerer, Warlock, Wizard]),
        ("Resurrection", 7, Necromancy, &[Bard, Cleric]),
        ("Teleport", 7, Conjuration, &[Bard, Sorcerer, Wizard]),
        // 8th level
        ("Earthquake", 8, Evocation, &[Cleric, Druid, Sorcerer]),
        ("Power Word Stun", 8, Enchantment, &[Bard, Sorcerer, Warlock, Wizard]),
        ("Sunburst", 8, Evocation, &[Druid, Sorcerer, Wizard]),
        // 9th level
        ("Foresight", 9, Divination, &[Bard, Druid, Warlock, Wizard]),
        ("Meteor Swarm", 9, Evocation, &[Sorcerer, Wizard]),
        ("Power Word Kill", 9, Enchantment, &[Bard, Sorcerer, Warlock, Wizard]),
        ("True Resurrection", 9, Necromancy, &[Cleric, Druid]),
        ("Wish", 9, Conjuration, &[Sorcerer, Wizard]),
    ]
};

fn build_spell_database() -> HashMap<String, Spell> {
    SRD_SPELLS
        .iter()
        .map(|(name, level, school, classes)| {
            (
                name.to_lowercase(),
                Spell {
                    name: name.to_string(),
                    level: *level,
                    school: *school,
                    classes: classes.to_vec(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_lookup() {
        let fireball = get_spell("fireball").expect("Fireball should exist");
        assert_eq!(fireball.level, 3);
        assert_eq!(fireball.school, SpellSchool::Evocation);
        assert!(get_spell("  Magic Missile ").is_some());
        assert!(get_spell("Nonexistent Spell").is_none());
    }

    #[test]
    fn test_spell_classes() {
        let cure_wounds = get_spell("cure wounds").expect("Cure Wounds should exist");
        assert!(cure_wounds.available_to(CharacterClass::Cleric));
        assert!(cure_wounds.available_to(CharacterClass::Druid));
        assert!(!cure_wounds.available_to(CharacterClass::Wizard));
    }

    #[test]
    fn test_class_spells_respects_max_level_and_order() {
        let spells = SrdSpellCatalog.class_spells(CharacterClass::Wizard, 1);
        assert!(spells.iter().all(|s| s.level <= 1));
        assert!(spells.iter().any(|s| s.name == "Fire Bolt"));
        assert!(!spells.iter().any(|s| s.name == "Eldritch Blast"));
        let keys: Vec<_> = spells.iter().map(|s| (s.level, s.name.clone())).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_every_caster_has_first_level_spells() {
        for class in [Bard, Cleric, Druid, Paladin, Ranger, Sorcerer, Warlock, Wizard] {
            let spells = SrdSpellCatalog.class_spells(class, 1);
            assert!(
                spells.iter().any(|s| s.level == 1),
                "{class} has no 1st-level spells"
            );
        }
    }

    #[test]
    fn test_vec_catalog() {
        let catalog = vec![Spell {
            name: "Homebrew Bolt".to_string(),
            level: 1,
            school: SpellSchool::Evocation,
            classes: vec![CharacterClass::Sorcerer],
        }];
        assert!(catalog.spell("homebrew bolt").is_some());
        assert_eq!(catalog.class_spells(CharacterClass::Sorcerer, 9).len(), 1);
        assert!(catalog.class_spells(CharacterClass::Wizard, 9).is_empty());
    }
}
