//! Walks the level-up wizard end to end.
//!
//! Run with: `cargo test -p dnd-progression --test wizard_flow`

use dnd_progression::{
    Ability, AbilityScores, CharacterClass, CharacterSnapshot, ChoiceKey, ClassLevel,
    LevelUpEngine, ProgressionError, WizardMode, WizardStep,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sorcerer() -> CharacterSnapshot {
    CharacterSnapshot::new(AbilityScores::new(8, 14, 14, 10, 10, 16))
        .with_class_level(ClassLevel::new(CharacterClass::Sorcerer, 1).with_subclass("Wild Magic"))
        .with_spells_known(["Magic Missile", "Shield"])
        .with_cantrips_known(["Fire Bolt", "Light", "Mage Hand", "Prestidigitation"])
}

#[test]
fn test_sorcerer_level_two_flow() {
    let engine = LevelUpEngine::standard();
    let character = sorcerer();
    let mut wizard = engine.wizard(&character);

    wizard.level_up(CharacterClass::Sorcerer).unwrap();
    assert_eq!(
        wizard.steps(),
        vec![
            WizardStep::Target,
            WizardStep::Overview,
            WizardStep::HitPoints,
            WizardStep::Spells,
            WizardStep::Review,
        ]
    );

    assert_eq!(wizard.next_step().unwrap(), WizardStep::Overview);
    assert_eq!(wizard.next_step().unwrap(), WizardStep::HitPoints);

    let roll = wizard.roll_hit_points(&mut StdRng::seed_from_u64(11)).unwrap();
    assert!((3..=8).contains(&roll.total));
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Spells);

    // Two picks when only one is offered.
    wizard.toggle_spell("Sleep");
    wizard.toggle_spell("Burning Hands");
    assert!(matches!(
        wizard.next_step(),
        Err(ProgressionError::ConflictingSelection { .. })
    ));
    assert_eq!(wizard.step(), WizardStep::Spells);

    wizard.toggle_spell("Burning Hands");
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Review);

    let result = wizard.commit().unwrap();
    assert_eq!(result.hit_points_gained, roll.total);
    assert_eq!(result.class_level.level, 2);
    assert_eq!(result.class_level.subclass.as_deref(), Some("Wild Magic"));

    let leveled = character.with_progression(&result);
    assert!(leveled.knows_spell("Sleep"));
    assert_eq!(leveled.spells_known.len(), 3);
}

#[test]
fn test_back_navigation_keeps_selections() {
    let engine = LevelUpEngine::standard();
    let character = sorcerer();
    let mut wizard = engine.wizard(&character);
    wizard.level_up(CharacterClass::Sorcerer).unwrap();
    while wizard.step() != WizardStep::Spells {
        wizard.next_step().unwrap();
    }
    wizard.toggle_spell("Sleep");
    assert_eq!(wizard.prev_step(), WizardStep::HitPoints);
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Spells);
    assert_eq!(wizard.selections().spells, vec!["Sleep".to_string()]);
}

#[test]
fn test_multiclass_into_wizard() {
    let engine = LevelUpEngine::standard();
    let character = CharacterSnapshot::new(AbilityScores::new(15, 12, 14, 14, 10, 8))
        .with_class(CharacterClass::Fighter, 2);
    let mut wizard = engine.wizard(&character);
    wizard.set_mode(WizardMode::Multiclass);

    assert!(wizard.eligible_classes().unwrap().contains(&CharacterClass::Wizard));
    wizard.set_target(CharacterClass::Wizard, 1).unwrap();

    let options = wizard.options().unwrap();
    assert!(options.target.is_new_class());
    assert_eq!(options.total_level, 3);
    let spells = options.spell_options.as_ref().unwrap();
    assert_eq!(spells.spells_to_learn, 6);
    assert_eq!(spells.cantrips_to_learn, 3);

    while wizard.step() != WizardStep::Spells {
        wizard.next_step().unwrap();
    }
    wizard.toggle_cantrip("Fire Bolt");
    wizard.toggle_spell("Find Familiar");
    wizard.toggle_spell("Magic Missile");
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Review);

    let result = wizard.commit().unwrap();
    assert_eq!(result.total_level, 3);
    assert_eq!(result.hit_points_gained, 6);
    let slots = result.spell_slots.unwrap();
    assert_eq!(slots.slots.get(&1), Some(&2));
    assert_eq!(result.updated_spells.unwrap().len(), 3);
}

#[test]
fn test_asi_choice_through_wizard() {
    let engine = LevelUpEngine::standard();
    let character = CharacterSnapshot::new(AbilityScores::new(16, 12, 14, 8, 10, 10))
        .with_class_level(ClassLevel::new(CharacterClass::Fighter, 3).with_subclass("Champion"));
    let mut wizard = engine.wizard(&character);
    wizard.level_up(CharacterClass::Fighter).unwrap();
    while wizard.step() != WizardStep::Choices {
        wizard.next_step().unwrap();
    }

    wizard.allocate_ability_point(4, Ability::Strength).unwrap();
    assert!(wizard.next_step().is_err());
    wizard.allocate_ability_point(4, Ability::Dexterity).unwrap();
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Review);

    // Switching to a feat replaces the points.
    wizard.prev_step();
    wizard.choose_feat(4, "Alert").unwrap();
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Review);
    let result = wizard.commit().unwrap();
    assert!(result.selected_features.contains(&"Alert".to_string()));
    assert!(result.ability_score_changes.is_none());
}

#[test]
fn test_commit_failure_is_recorded() {
    let engine = LevelUpEngine::standard();
    let character = sorcerer();
    let mut wizard = engine.wizard(&character);
    wizard.level_up(CharacterClass::Sorcerer).unwrap();
    while wizard.step() != WizardStep::Review {
        wizard.next_step().unwrap();
    }

    wizard.toggle_cantrip("Ray of Frost");
    let err = wizard.commit().unwrap_err();
    assert!(err.is_user_recoverable());
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.last_error(), Some(&err));

    wizard.toggle_cantrip("Ray of Frost");
    assert!(wizard.commit().is_ok());
    assert!(wizard.last_error().is_none());
}

#[test]
fn test_step_names_serialize_camel_case() {
    assert_eq!(
        serde_json::to_string(&WizardStep::HitPoints).unwrap(),
        "\"hitPoints\""
    );
    assert_eq!(
        ChoiceKey::fighting_style(2).to_string(),
        "fightingStyle_level_2"
    );
}
