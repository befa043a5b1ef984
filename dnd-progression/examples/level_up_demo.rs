//! Level a fighter to 5, then multiclass into wizard.
//!
//! Run with: `RUST_LOG=dnd_progression=debug cargo run -p dnd-progression --example level_up_demo`

use dnd_progression::{
    Ability, AbilityScores, CharacterClass, CharacterSnapshot, LevelUpEngine, ProgressionError,
    SelectionMap, WizardMode, WizardStep,
};

fn main() -> Result<(), ProgressionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let engine = LevelUpEngine::standard();
    let fighter = CharacterSnapshot::new(AbilityScores::new(16, 12, 14, 13, 10, 8))
        .with_class(CharacterClass::Fighter, 1)
        .with_hit_points(12);

    println!("=== Fighter 1 -> 5 ===\n");
    let options = engine.level_up_options(&fighter, CharacterClass::Fighter, 5)?;
    for row in &options.features_by_level {
        println!("Level {}: {}", row.level, row.features.join(", "));
    }
    for choice in &options.available_choices {
        println!("Choice [{}]: {}", choice.key(), choice.description);
    }
    println!(
        "Hit points: {} fixed, or roll {}-{}",
        options.hit_point_options.fixed,
        options.hit_point_options.roll.min,
        options.hit_point_options.roll.max
    );

    let selections = SelectionMap::new()
        .with_fighting_style(2, "Defense")
        .with_subclass(3, "Eldritch Knight")
        .with_ability_points(4, &[(Ability::Strength, 1), (Ability::Intelligence, 1)]);
    let result = engine.process_level_up(
        &fighter,
        &selections,
        options.hit_point_options.fixed,
        CharacterClass::Fighter,
        5,
    )?;
    let fighter = fighter.with_progression(&result);
    println!(
        "\nNow level {} with {} HP, Str {}, Int {}",
        fighter.total_level(),
        fighter.hit_points.maximum,
        fighter.ability_scores.get(Ability::Strength),
        fighter.ability_scores.get(Ability::Intelligence)
    );

    println!("\n=== Multiclass wizard ===\n");
    let mut wizard = engine.wizard(&fighter);
    wizard.set_mode(WizardMode::Multiclass);
    let eligible: Vec<String> = wizard
        .eligible_classes()?
        .iter()
        .map(|class| class.to_string())
        .collect();
    println!("Eligible: {}", eligible.join(", "));

    wizard.set_target(CharacterClass::Wizard, 1)?;
    while wizard.step() != WizardStep::Spells {
        let step = wizard.next_step()?;
        println!("-> {step:?}");
    }
    if let Some(spells) = wizard.options().and_then(|o| o.spell_options.clone()) {
        println!(
            "Learn {} spells and {} cantrips (up to level {})",
            spells.spells_to_learn, spells.cantrips_to_learn, spells.max_spell_level
        );
        for spell in spells.cantrips_available.iter().take(spells.cantrips_to_learn as usize) {
            wizard.toggle_cantrip(&spell.name);
        }
        for spell in spells.available_spells.iter().take(spells.spells_to_learn as usize) {
            wizard.toggle_spell(&spell.name);
        }
    }
    wizard.next_step()?;

    let result = wizard.commit()?;
    let character = fighter.with_progression(&result);
    println!(
        "\nFighter {} / Wizard {}, proficiency +{}",
        character.class_level(CharacterClass::Fighter),
        character.class_level(CharacterClass::Wizard),
        result.proficiency_bonus
    );
    println!("Spells: {}", character.spells_known.join(", "));
    if let Some(slots) = &result.spell_slots {
        for (level, count) in &slots.slots {
            println!("  Level {level} slots: {count}");
        }
    }

    Ok(())
}
