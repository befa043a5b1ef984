//! Hit-point gain for a span of levels.

use crate::dice::DieType;
use crate::error::{ProgressionError, Result};
use crate::tables::RuleTables;
use crate::world::CharacterClass;
use serde::{Deserialize, Serialize};

/// Inclusive bounds of a rolled hit-point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRange {
    pub min: i32,
    pub max: i32,
}

impl RollRange {
    pub fn contains(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The two ways a player can take hit points for a level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPointOptions {
    /// Total for taking the average every level.
    pub fixed: i32,
    pub roll: RollRange,
}

impl HitPointOptions {
    /// Check a chosen total against the fixed value and the roll range.
    pub fn validate(&self, value: i32) -> Result<()> {
        if value > 0 && (value == self.fixed || self.roll.contains(value)) {
            Ok(())
        } else {
            Err(ProgressionError::OutOfRangeHitPoints {
                value,
                min: self.roll.min,
                max: self.roll.max,
                fixed: self.fixed,
            })
        }
    }
}

/// Hit-point arithmetic. Never rolls dice; see [`crate::dice::roll_hit_points`].
pub struct HitPointCalculator;

impl HitPointCalculator {
    /// `levels × max(1, ⌊die/2⌋ + 1 + con)`.
    pub fn average(hit_die: DieType, levels: u8, con_modifier: i8) -> i32 {
        let per_level = (hit_die.sides() as i32 / 2 + 1 + con_modifier as i32).max(1);
        levels as i32 * per_level
    }

    /// Smallest and largest possible rolled totals.
    pub fn roll_range(hit_die: DieType, levels: u8, con_modifier: i8) -> RollRange {
        let con = con_modifier as i32;
        RollRange {
            min: levels as i32 * (1 + con).max(1),
            max: levels as i32 * (hit_die.sides() as i32 + con).max(1),
        }
    }

    pub fn options(hit_die: DieType, levels: u8, con_modifier: i8) -> HitPointOptions {
        HitPointOptions {
            fixed: Self::average(hit_die, levels, con_modifier),
            roll: Self::roll_range(hit_die, levels, con_modifier),
        }
    }

    /// [`HitPointCalculator::options`] with the class's hit die.
    pub fn for_class(
        tables: &RuleTables,
        class: CharacterClass,
        levels: u8,
        con_modifier: i8,
    ) -> Result<HitPointOptions> {
        let die = tables.hit_die(class)?;
        Ok(Self::options(die, levels, con_modifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fighter_one_level_con_14() {
        let options = HitPointCalculator::options(DieType::D10, 1, 2);
        assert_eq!(options.fixed, 8);
        assert_eq!(options.roll, RollRange { min: 3, max: 12 });
    }

    #[test]
    fn test_multi_level_scales() {
        let options = HitPointCalculator::options(DieType::D8, 3, 1);
        assert_eq!(options.fixed, 18);
        assert_eq!(options.roll, RollRange { min: 6, max: 27 });
    }

    #[test]
    fn test_negative_con_floors_at_one_per_level() {
        let options = HitPointCalculator::options(DieType::D6, 4, -5);
        assert_eq!(options.fixed, 4);
        assert_eq!(options.roll, RollRange { min: 4, max: 4 });
    }

    #[test]
    fn test_validate() {
        let options = HitPointCalculator::options(DieType::D10, 1, 2);
        assert!(options.validate(8).is_ok());
        assert!(options.validate(3).is_ok());
        assert!(options.validate(12).is_ok());
        assert_eq!(
            options.validate(13),
            Err(ProgressionError::OutOfRangeHitPoints {
                value: 13,
                min: 3,
                max: 12,
                fixed: 8
            })
        );
        assert!(options.validate(0).is_err());
    }

    #[test]
    fn test_unknown_class_surfaces() {
        let tables = RuleTables::standard().without_class(CharacterClass::Wizard);
        assert!(matches!(
            HitPointCalculator::for_class(&tables, CharacterClass::Wizard, 1, 0),
            Err(ProgressionError::UnknownClass(_))
        ));
    }
}
