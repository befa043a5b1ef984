//! Feat and fighting-style catalogs.

use crate::world::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A feat that can be taken instead of an Ability Score Improvement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feat {
    pub name: String,
    pub description: String,
    /// Fixed ability increases granted on top of the feat's other effects.
    #[serde(default)]
    pub ability_bonus: BTreeMap<Ability, u8>,
}

impl Feat {
    fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            ability_bonus: BTreeMap::new(),
        }
    }

    fn with_bonus(mut self, ability: Ability, amount: u8) -> Self {
        self.ability_bonus.insert(ability, amount);
        self
    }
}

/// A fighting style offered by Fighters, Paladins, and Rangers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightingStyle {
    pub name: String,
    pub description: String,
}

/// The PHB feats the engine knows about.
pub fn standard_feats() -> Vec<Feat> {
    vec![
        Feat::new(
            "Actor",
            "Skilled at mimicry and dramatics. Advantage on Deception and Performance checks when passing yourself off as someone else, and you can mimic speech.",
        )
        .with_bonus(Ability::Charisma, 1),
        Feat::new(
            "Alert",
            "Always on the lookout for danger, you gain a +5 bonus to initiative, can't be surprised while conscious, and other creatures don't gain advantage on attack rolls against you as a result of being unseen by you.",
        ),
        Feat::new(
            "Durable",
            "Hardy and resilient. When you roll a Hit Die to regain hit points, the minimum you regain is twice your Constitution modifier.",
        )
        .with_bonus(Ability::Constitution, 1),
        Feat::new(
            "Great Weapon Master",
            "When you score a critical hit or reduce a creature to 0 hit points with a melee weapon attack, you can make one melee weapon attack as a bonus action. Before a heavy melee attack you can take a -5 penalty to attack to gain +10 damage.",
        ),
        Feat::new(
            "Heavily Armored",
            "You gain proficiency with heavy armor.",
        )
        .with_bonus(Ability::Strength, 1),
        Feat::new(
            "Keen Mind",
            "You always know which way is north, the hours until the next sunrise or sunset, and can recall anything seen or heard within the past month.",
        )
        .with_bonus(Ability::Intelligence, 1),
        Feat::new(
            "Linguist",
            "You learn three languages of your choice and can create written ciphers.",
        )
        .with_bonus(Ability::Intelligence, 1),
        Feat::new(
            "Lucky",
            "You have 3 luck points. Whenever you make an attack roll, ability check, or saving throw, you can spend one luck point to roll an additional d20.",
        ),
        Feat::new(
            "Magic Initiate",
            "Choose a class: bard, cleric, druid, sorcerer, warlock, or wizard. You learn two cantrips and one 1st-level spell from that class's spell list.",
        ),
        Feat::new(
            "Sharpshooter",
            "Attacking at long range doesn't impose disadvantage, ranged weapon attacks ignore half and three-quarters cover, and you can take a -5 penalty to attack to gain +10 damage.",
        ),
        Feat::new(
            "Tough",
            "Your hit point maximum increases by an amount equal to twice your level when you gain this feat, and by 2 each time you gain a level thereafter.",
        ),
    ]
}

/// Every fighting style in the PHB.
pub fn standard_fighting_styles() -> Vec<FightingStyle> {
    [
        ("Archery", "You gain a +2 bonus to attack rolls you make with ranged weapons."),
        ("Defense", "While you are wearing armor, you gain a +1 bonus to AC."),
        (
            "Dueling",
            "When you are wielding a melee weapon in one hand and no other weapons, you gain a +2 bonus to damage rolls with that weapon.",
        ),
        (
            "Great Weapon Fighting",
            "When you roll a 1 or 2 on a damage die for an attack you make with a melee weapon that you are wielding with two hands, you can reroll the die and must use the new roll.",
        ),
        (
            "Protection",
            "When a creature you can see attacks a target other than you that is within 5 feet of you, you can use your reaction to impose disadvantage on the attack roll. You must be wielding a shield.",
        ),
        (
            "Two-Weapon Fighting",
            "When you engage in two-weapon fighting, you can add your ability modifier to the damage of the second attack.",
        ),
    ]
    .into_iter()
    .map(|(name, description)| FightingStyle {
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect()
}
