//! D&D 5e level-up and multiclass progression rules engine.
//!
//! This crate provides:
//! - Class tables for the twelve PHB classes (hit dice, features, ASIs, spell growth)
//! - Level-up option resolution across one or several levels
//! - Multiclass prerequisite checks
//! - Validation and application of player selections
//! - A step-by-step level-up wizard
//!
//! # Quick Start
//!
//! ```
//! use dnd_progression::{
//!     AbilityScores, CharacterClass, CharacterSnapshot, LevelUpEngine, SelectionMap,
//! };
//!
//! let engine = LevelUpEngine::standard();
//! let fighter = CharacterSnapshot::new(AbilityScores::new(16, 12, 14, 8, 10, 10))
//!     .with_class(CharacterClass::Fighter, 1);
//!
//! let options = engine.level_up_options(&fighter, CharacterClass::Fighter, 2)?;
//! let selections = SelectionMap::new().with_fighting_style(2, "Defense");
//! let result = engine.process_level_up(
//!     &fighter,
//!     &selections,
//!     options.hit_point_options.fixed,
//!     CharacterClass::Fighter,
//!     2,
//! )?;
//!
//! let fighter = fighter.with_progression(&result);
//! assert_eq!(fighter.class_level(CharacterClass::Fighter), 2);
//! # Ok::<(), dnd_progression::ProgressionError>(())
//! ```

pub mod apply;
pub mod class_data;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod feats;
pub mod hit_points;
pub mod multiclass;
pub mod options;
pub mod selection;
pub mod spells;
pub mod tables;
pub mod wizard;
pub mod world;

// Primary public API
pub use apply::{FeatureGrant, FeatureKind, ProgressionApplier, ProgressionResult};
pub use class_data::{CasterProgression, ClassData, Prerequisite, SpellcastingType};
pub use config::ProgressionConfig;
pub use dice::{DieType, HitPointRoll};
pub use engine::LevelUpEngine;
pub use error::{ProgressionError, Result, UnmetPrerequisite};
pub use hit_points::{HitPointCalculator, HitPointOptions, RollRange};
pub use multiclass::{MulticlassEligibility, MulticlassEligibilityChecker};
pub use options::{Choice, LevelUpOptions, LevelUpOptionsResolver, LevelUpTarget, SpellOptions};
pub use selection::{AsiChoice, ChoiceKey, ChoiceType, Selection, SelectionMap};
pub use spells::{Spell, SpellCatalog, SrdSpellCatalog};
pub use tables::{RuleTables, SpellSlots};
pub use wizard::{HitPointMethod, WizardMode, WizardStateMachine, WizardStep};
pub use world::{Ability, AbilityScores, CharacterClass, CharacterSnapshot, ClassLevel};
