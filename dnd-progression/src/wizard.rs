//! Step-by-step level-up flow.
//!
//! [`WizardStateMachine`] walks a player through picking a target,
//! reviewing what they gain, taking hit points, answering choices, and
//! learning spells, then commits through the [`ProgressionApplier`] once.
//! Rendering is the caller's business; this only tracks state and gates
//! forward movement.

use crate::apply::{ProgressionApplier, ProgressionResult};
use crate::config::ProgressionConfig;
use crate::dice::{roll_hit_points, HitPointRoll};
use crate::error::{ProgressionError, Result};
use crate::multiclass::MulticlassEligibilityChecker;
use crate::options::{LevelUpOptions, LevelUpOptionsResolver};
use crate::selection::{AsiChoice, ChoiceKey, Selection, SelectionMap};
use crate::spells::{SpellCatalog, SrdSpellCatalog};
use crate::tables::RuleTables;
use crate::world::{Ability, CharacterClass, CharacterSnapshot};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Wizard screens, in master order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Target,
    Overview,
    HitPoints,
    Choices,
    Spells,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Target,
        WizardStep::Overview,
        WizardStep::HitPoints,
        WizardStep::Choices,
        WizardStep::Spells,
        WizardStep::Review,
    ];
}

/// Whether the wizard advances an existing class or adds a new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardMode {
    #[default]
    LevelUp,
    Multiclass,
}

/// How the player takes hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitPointMethod {
    Average,
    Rolled(i32),
}

/// The sequence of steps for a set of options.
pub fn step_sequence(options: &LevelUpOptions) -> Vec<WizardStep> {
    WizardStep::ALL
        .into_iter()
        .filter(|step| match step {
            WizardStep::HitPoints => options.hit_point_options.fixed != 0,
            WizardStep::Choices => !options.available_choices.is_empty(),
            WizardStep::Spells => options.has_spells_to_learn(),
            _ => true,
        })
        .collect()
}

/// In-memory state for one level-up session.
pub struct WizardStateMachine<'a, C: SpellCatalog + ?Sized = SrdSpellCatalog> {
    tables: &'a RuleTables,
    catalog: &'a C,
    config: &'a ProgressionConfig,
    character: &'a CharacterSnapshot,
    mode: WizardMode,
    options: Option<LevelUpOptions>,
    step: WizardStep,
    hit_points: HitPointMethod,
    selections: SelectionMap,
    last_error: Option<ProgressionError>,
    result: Option<ProgressionResult>,
}

impl<'a, C: SpellCatalog + ?Sized> WizardStateMachine<'a, C> {
    pub fn new(
        tables: &'a RuleTables,
        catalog: &'a C,
        config: &'a ProgressionConfig,
        character: &'a CharacterSnapshot,
    ) -> Self {
        Self {
            tables,
            catalog,
            config,
            character,
            mode: WizardMode::LevelUp,
            options: None,
            step: WizardStep::Target,
            hit_points: HitPointMethod::Average,
            selections: SelectionMap::new(),
            last_error: None,
            result: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn options(&self) -> Option<&LevelUpOptions> {
        self.options.as_ref()
    }

    pub fn selections(&self) -> &SelectionMap {
        &self.selections
    }

    pub fn hit_point_method(&self) -> HitPointMethod {
        self.hit_points
    }

    /// The error from the last failed commit, for display.
    pub fn last_error(&self) -> Option<&ProgressionError> {
        self.last_error.as_ref()
    }

    pub fn result(&self) -> Option<&ProgressionResult> {
        self.result.as_ref()
    }

    /// Steps for the current options. Only `Target` until a target is set.
    pub fn steps(&self) -> Vec<WizardStep> {
        match &self.options {
            Some(options) => step_sequence(options),
            None => vec![WizardStep::Target],
        }
    }

    /// Hit points the commit will use.
    pub fn chosen_hit_points(&self) -> Option<i32> {
        let options = self.options.as_ref()?;
        Some(match self.hit_points {
            HitPointMethod::Average => options.hit_point_options.fixed,
            HitPointMethod::Rolled(value) => value,
        })
    }

    /// Classes the character could add in multiclass mode.
    pub fn eligible_classes(&self) -> Result<Vec<CharacterClass>> {
        MulticlassEligibilityChecker::eligible_classes(self.tables, self.character)
    }

    // ========================================================================
    // Target
    // ========================================================================

    /// Switch modes. Clears any target already chosen.
    pub fn set_mode(&mut self, mode: WizardMode) {
        if mode != self.mode {
            self.mode = mode;
            self.reset_target();
        }
    }

    /// Choose the class and level to advance to, regenerating options,
    /// resetting every selection, and returning to `Target`. On error the
    /// previous state is kept.
    pub fn set_target(&mut self, class: CharacterClass, target_level: u8) -> Result<()> {
        if self.mode == WizardMode::Multiclass && self.character.has_class(class) {
            return Err(ProgressionError::invalid_target(
                class,
                target_level,
                format!("already has levels in {class}"),
            ));
        }

        let options = LevelUpOptionsResolver::level_up_options(
            self.tables,
            self.catalog,
            self.config,
            self.character,
            class,
            target_level,
        )?;

        self.options = Some(options);
        self.step = WizardStep::Target;
        self.selections = SelectionMap::new();
        self.hit_points = HitPointMethod::Average;
        self.last_error = None;
        self.result = None;
        Ok(())
    }

    /// Target the next level in `class` (level 1 for a new class).
    pub fn level_up(&mut self, class: CharacterClass) -> Result<()> {
        self.set_target(class, self.character.class_level(class) + 1)
    }

    fn reset_target(&mut self) {
        self.options = None;
        self.step = WizardStep::Target;
        self.selections = SelectionMap::new();
        self.hit_points = HitPointMethod::Average;
        self.last_error = None;
        self.result = None;
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Move forward one step if the current step is complete.
    ///
    /// A blocked move returns the reason and leaves the step unchanged.
    pub fn next_step(&mut self) -> Result<WizardStep> {
        self.check_step(self.step)?;
        let steps = self.steps();
        if let Some(pos) = steps.iter().position(|s| *s == self.step) {
            if let Some(next) = steps.get(pos + 1) {
                self.step = *next;
            }
        }
        Ok(self.step)
    }

    /// Move back one step.
    pub fn prev_step(&mut self) -> WizardStep {
        let steps = self.steps();
        if let Some(pos) = steps.iter().position(|s| *s == self.step) {
            if pos > 0 {
                self.step = steps[pos - 1];
            }
        }
        self.step
    }

    fn options_or_missing(&self) -> Result<&LevelUpOptions> {
        self.options.as_ref().ok_or_else(|| {
            let missing = match self.mode {
                WizardMode::Multiclass => "targetClass",
                WizardMode::LevelUp => "target",
            };
            ProgressionError::IncompleteSelection {
                missing: vec![missing.to_string()],
            }
        })
    }

    /// Completion predicate for a step.
    pub fn check_step(&self, step: WizardStep) -> Result<()> {
        match step {
            WizardStep::Target => self.options_or_missing().map(|_| ()),
            WizardStep::Overview | WizardStep::Review => Ok(()),
            WizardStep::HitPoints => {
                let options = self.options_or_missing()?;
                match self.hit_points {
                    HitPointMethod::Average => Ok(()),
                    HitPointMethod::Rolled(value) if options.hit_point_options.roll.contains(value) => {
                        Ok(())
                    }
                    HitPointMethod::Rolled(value) => Err(ProgressionError::OutOfRangeHitPoints {
                        value,
                        min: options.hit_point_options.roll.min,
                        max: options.hit_point_options.roll.max,
                        fixed: options.hit_point_options.fixed,
                    }),
                }
            }
            WizardStep::Choices => {
                let options = self.options_or_missing()?;
                ProgressionApplier::validate_choices(
                    self.tables,
                    self.config,
                    self.character,
                    options,
                    &self.selections,
                )
            }
            WizardStep::Spells => {
                let options = self.options_or_missing()?;
                ProgressionApplier::validate_spells(
                    self.catalog,
                    self.config,
                    options,
                    &self.selections,
                )
            }
        }
    }

    // ========================================================================
    // Hit Points
    // ========================================================================

    pub fn use_average_hit_points(&mut self) {
        self.hit_points = HitPointMethod::Average;
    }

    /// Record a roll made at the table. Must fall within the roll range.
    pub fn record_hit_point_roll(&mut self, value: i32) -> Result<()> {
        let options = self.options_or_missing()?;
        let range = options.hit_point_options.roll;
        if !range.contains(value) {
            return Err(ProgressionError::OutOfRangeHitPoints {
                value,
                min: range.min,
                max: range.max,
                fixed: options.hit_point_options.fixed,
            });
        }
        self.hit_points = HitPointMethod::Rolled(value);
        Ok(())
    }

    /// Roll hit points with `rng` and record the total.
    pub fn roll_hit_points<R: Rng>(&mut self, rng: &mut R) -> Result<HitPointRoll> {
        let options = self.options_or_missing()?;
        let die = self.tables.hit_die(options.target.class)?;
        let roll = roll_hit_points(
            die,
            options.target.levels_to_gain,
            self.character.modifier(Ability::Constitution),
            rng,
        );
        self.hit_points = HitPointMethod::Rolled(roll.total);
        Ok(roll)
    }

    // ========================================================================
    // Selections
    // ========================================================================

    /// Pick an option for a choice. Multi-select choices toggle the value.
    pub fn select_option(&mut self, key: ChoiceKey, value: &str) -> Result<()> {
        let choice = self
            .options_or_missing()?
            .choice(&key)
            .ok_or_else(|| ProgressionError::conflict(key.to_string(), "no such choice"))?;
        if choice.max_selections.unwrap_or(1) > 1 {
            self.selections.toggle_option(key, value);
        } else {
            self.selections.select(key, Selection::Single(value.to_string()));
        }
        Ok(())
    }

    /// Add one point to `ability` for the improvement at `level`, clearing a
    /// feat picked there. Refuses points beyond what the improvement grants.
    pub fn allocate_ability_point(&mut self, level: u8, ability: Ability) -> Result<()> {
        let key = ChoiceKey::ability_score_increase(level);
        self.options_or_missing()?
            .choice(&key)
            .ok_or_else(|| ProgressionError::conflict(key.to_string(), "no such choice"))?;

        if let Some(Selection::Asi(asi)) = self.selections.choices.get(&key) {
            if asi.total_points() >= self.config.asi_points {
                return Err(ProgressionError::conflict(
                    key.to_string(),
                    format!("all {} points are assigned", self.config.asi_points),
                ));
            }
            if let AsiChoice::AbilityPoints(points) = asi {
                if points.get(&ability).copied().unwrap_or(0) >= self.config.max_points_per_ability {
                    return Err(ProgressionError::conflict(
                        key.to_string(),
                        format!("{} already has the most points allowed", ability.name()),
                    ));
                }
            }
        }
        self.selections.allocate_ability_point(level, ability);
        Ok(())
    }

    pub fn remove_ability_point(&mut self, level: u8, ability: Ability) {
        self.selections.remove_ability_point(level, ability);
    }

    /// Take a feat for the improvement at `level`, clearing any points.
    pub fn choose_feat(&mut self, level: u8, feat: &str) -> Result<()> {
        let key = ChoiceKey::ability_score_increase(level);
        self.options_or_missing()?
            .choice(&key)
            .ok_or_else(|| ProgressionError::conflict(key.to_string(), "no such choice"))?;
        self.selections.choose_feat(level, feat);
        Ok(())
    }

    pub fn clear_choice(&mut self, key: &ChoiceKey) {
        self.selections.clear(key);
    }

    pub fn toggle_spell(&mut self, name: &str) {
        self.selections.toggle_spell(name);
    }

    pub fn toggle_cantrip(&mut self, name: &str) {
        self.selections.toggle_cantrip(name);
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Apply the level-up. Only available from `Review`.
    ///
    /// On failure the wizard stays on `Review` and keeps the error in
    /// [`WizardStateMachine::last_error`].
    pub fn commit(&mut self) -> Result<ProgressionResult> {
        if self.step != WizardStep::Review {
            return Err(ProgressionError::conflict(
                "step",
                "commit is only available from the review step",
            ));
        }
        let options = self.options_or_missing()?;
        let target = options.target;
        let hit_points = self.chosen_hit_points().unwrap_or(0);

        let outcome = ProgressionApplier::process_level_up(
            self.tables,
            self.catalog,
            self.config,
            self.character,
            &self.selections,
            hit_points,
            target.class,
            target.target_level,
        );

        match outcome {
            Ok(result) => {
                self.last_error = None;
                self.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(class = %target.class, error = %e, "Level-up commit rejected");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Discard everything and return to the first step.
    pub fn cancel(&mut self) {
        self.mode = WizardMode::LevelUp;
        self.reset_target();
    }
}
