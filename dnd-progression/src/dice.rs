//! Hit dice and caller-side rolling.
//!
//! The resolver and applier never draw random numbers. A caller that wants
//! the "roll" hit-point method rolls here and passes the total back in.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Die sizes used as class hit dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DieType {
    D6,
    D8,
    D10,
    D12,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            _ => None,
        }
    }

    /// Roll this die once.
    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(1..=self.sides())
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Result of rolling hit points for a span of levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPointRoll {
    pub die_type: DieType,
    /// Raw die faces, one per level gained.
    pub rolls: Vec<u32>,
    pub con_modifier: i8,
    /// Sum of `max(1, roll + con)` over every level.
    pub total: i32,
}

impl fmt::Display for HitPointRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        write!(
            f,
            "{}{} [{}] {:+} per level = {}",
            self.rolls.len(),
            self.die_type,
            faces.join(", "),
            self.con_modifier,
            self.total
        )
    }
}

/// Roll one hit die per level, apply the Constitution modifier to each, and
/// floor each level's gain at 1.
pub fn roll_hit_points<R: Rng>(
    die_type: DieType,
    levels: u8,
    con_modifier: i8,
    rng: &mut R,
) -> HitPointRoll {
    let rolls: Vec<u32> = (0..levels).map(|_| die_type.roll_with_rng(rng)).collect();
    let total = rolls
        .iter()
        .map(|&r| (r as i32 + con_modifier as i32).max(1))
        .sum();

    HitPointRoll {
        die_type,
        rolls,
        con_modifier,
        total,
    }
}

/// [`roll_hit_points`] with the thread-local generator.
pub fn roll_hit_points_thread(die_type: DieType, levels: u8, con_modifier: i8) -> HitPointRoll {
    roll_hit_points(die_type, levels, con_modifier, &mut rand::thread_rng())
}
