//! LevelUpEngine - the primary public API for character progression.
//!
//! Bundles rule tables, a spell catalog, and configuration so callers can
//! ask what a level-up offers, check multiclassing, and apply a level-up
//! without threading the same three references through every call.

use crate::apply::{ProgressionApplier, ProgressionResult};
use crate::config::ProgressionConfig;
use crate::error::Result;
use crate::hit_points::{HitPointCalculator, HitPointOptions};
use crate::multiclass::{MulticlassEligibility, MulticlassEligibilityChecker};
use crate::options::{LevelUpOptions, LevelUpOptionsResolver};
use crate::selection::SelectionMap;
use crate::spells::{SpellCatalog, SrdSpellCatalog};
use crate::tables::RuleTables;
use crate::wizard::WizardStateMachine;
use crate::world::{Ability, CharacterClass, CharacterSnapshot};

/// Rules, spells, and settings for resolving level-ups.
#[derive(Debug, Clone)]
pub struct LevelUpEngine<C: SpellCatalog = SrdSpellCatalog> {
    tables: RuleTables,
    catalog: C,
    config: ProgressionConfig,
}

impl LevelUpEngine {
    /// Standard 5e tables with the built-in SRD spell list.
    pub fn standard() -> Self {
        Self::new(RuleTables::standard(), SrdSpellCatalog)
    }
}

impl Default for LevelUpEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl<C: SpellCatalog> LevelUpEngine<C> {
    pub fn new(tables: RuleTables, catalog: C) -> Self {
        Self {
            tables,
            catalog,
            config: ProgressionConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ProgressionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Everything gained by advancing `class` to `target_level`.
    pub fn level_up_options(
        &self,
        character: &CharacterSnapshot,
        class: CharacterClass,
        target_level: u8,
    ) -> Result<LevelUpOptions> {
        LevelUpOptionsResolver::level_up_options(
            &self.tables,
            &self.catalog,
            &self.config,
            character,
            class,
            target_level,
        )
    }

    /// Validate `selections` and produce the level-up result.
    pub fn process_level_up(
        &self,
        character: &CharacterSnapshot,
        selections: &SelectionMap,
        chosen_hit_points: i32,
        class: CharacterClass,
        target_level: u8,
    ) -> Result<ProgressionResult> {
        ProgressionApplier::process_level_up(
            &self.tables,
            &self.catalog,
            &self.config,
            character,
            selections,
            chosen_hit_points,
            class,
            target_level,
        )
    }

    pub fn can_multiclass(&self, character: &CharacterSnapshot, class: CharacterClass) -> Result<bool> {
        MulticlassEligibilityChecker::can_multiclass(&self.tables, character, class)
    }

    pub fn multiclass_eligibility(
        &self,
        character: &CharacterSnapshot,
        class: CharacterClass,
    ) -> Result<MulticlassEligibility> {
        MulticlassEligibilityChecker::eligibility(&self.tables, character, class)
    }

    /// Hit point options for gaining `levels` levels in `class`.
    pub fn hit_point_options(
        &self,
        character: &CharacterSnapshot,
        class: CharacterClass,
        levels: u8,
    ) -> Result<HitPointOptions> {
        HitPointCalculator::for_class(
            &self.tables,
            class,
            levels,
            character.modifier(Ability::Constitution),
        )
    }

    /// Start an interactive level-up for `character`.
    pub fn wizard<'a>(&'a self, character: &'a CharacterSnapshot) -> WizardStateMachine<'a, C> {
        WizardStateMachine::new(&self.tables, &self.catalog, &self.config, character)
    }
}
