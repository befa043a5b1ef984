//! Player selections answering a set of level-up choices.

use crate::error::{ProgressionError, Result};
use crate::world::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kinds of decision a level-up can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChoiceType {
    FightingStyle,
    ClassFeature,
    AbilityScoreIncrease,
}

impl ChoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceType::FightingStyle => "fightingStyle",
            ChoiceType::ClassFeature => "classFeature",
            ChoiceType::AbilityScoreIncrease => "abilityScoreIncrease",
        }
    }
}

impl fmt::Display for ChoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceType {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fightingStyle" => Ok(ChoiceType::FightingStyle),
            "classFeature" => Ok(ChoiceType::ClassFeature),
            "abilityScoreIncrease" => Ok(ChoiceType::AbilityScoreIncrease),
            other => Err(ProgressionError::conflict(other, "unknown choice type")),
        }
    }
}

/// Identifies one choice: its type and the class level that grants it.
///
/// Displays and serializes as `type_level_N`, e.g. `abilityScoreIncrease_level_4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ChoiceKey {
    pub choice_type: ChoiceType,
    pub level: u8,
}

impl ChoiceKey {
    pub fn new(choice_type: ChoiceType, level: u8) -> Self {
        Self { choice_type, level }
    }

    pub fn fighting_style(level: u8) -> Self {
        Self::new(ChoiceType::FightingStyle, level)
    }

    pub fn class_feature(level: u8) -> Self {
        Self::new(ChoiceType::ClassFeature, level)
    }

    pub fn ability_score_increase(level: u8) -> Self {
        Self::new(ChoiceType::AbilityScoreIncrease, level)
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_level_{}", self.choice_type, self.level)
    }
}

impl FromStr for ChoiceKey {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, level) = s
            .split_once("_level_")
            .ok_or_else(|| ProgressionError::conflict(s, "expected <type>_level_<n>"))?;
        let level = level
            .parse()
            .map_err(|_| ProgressionError::conflict(s, "level is not a number"))?;
        Ok(ChoiceKey::new(kind.parse()?, level))
    }
}

impl From<ChoiceKey> for String {
    fn from(key: ChoiceKey) -> String {
        key.to_string()
    }
}

impl TryFrom<String> for ChoiceKey {
    type Error = ProgressionError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// An Ability Score Improvement is either points or a feat, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsiChoice {
    AbilityPoints(BTreeMap<Ability, u8>),
    Feat(String),
}

impl AsiChoice {
    pub fn points(points: &[(Ability, u8)]) -> Self {
        AsiChoice::AbilityPoints(points.iter().copied().collect())
    }

    pub fn total_points(&self) -> u8 {
        match self {
            AsiChoice::AbilityPoints(points) => points.values().sum(),
            AsiChoice::Feat(_) => 0,
        }
    }
}

/// The answer to one choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// One option, such as a fighting style or subclass.
    Single(String),
    /// Several options for choices allowing more than one.
    Multiple(Vec<String>),
    Asi(AsiChoice),
}

impl Selection {
    /// Whether this entry carries no actual decision.
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(value) => value.trim().is_empty(),
            Selection::Multiple(values) => values.iter().all(|v| v.trim().is_empty()),
            Selection::Asi(AsiChoice::AbilityPoints(points)) => points.values().all(|&p| p == 0),
            Selection::Asi(AsiChoice::Feat(name)) => name.trim().is_empty(),
        }
    }

    /// Option names picked, for option-list choices.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Selection::Single(value) => vec![value.as_str()],
            Selection::Multiple(values) => values.iter().map(String::as_str).collect(),
            Selection::Asi(_) => Vec::new(),
        }
    }
}

/// Selections keyed by choice, plus spell and cantrip picks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionMap {
    #[serde(default)]
    pub choices: BTreeMap<ChoiceKey, Selection>,
    /// Used for a choice with no level-tagged entry.
    #[serde(default)]
    pub by_type: BTreeMap<ChoiceType, Selection>,
    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub cantrips: Vec<String>,
}

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection answering `key`, falling back to a type-only entry.
    /// Empty selections count as unanswered.
    pub fn get(&self, key: &ChoiceKey) -> Option<&Selection> {
        self.choices
            .get(key)
            .filter(|s| !s.is_empty())
            .or_else(|| self.by_type.get(&key.choice_type))
            .filter(|s| !s.is_empty())
    }

    pub fn select(&mut self, key: ChoiceKey, selection: Selection) {
        self.choices.insert(key, selection);
    }

    pub fn clear(&mut self, key: &ChoiceKey) {
        self.choices.remove(key);
    }

    pub fn with(mut self, key: ChoiceKey, selection: Selection) -> Self {
        self.select(key, selection);
        self
    }

    pub fn with_type_fallback(mut self, choice_type: ChoiceType, selection: Selection) -> Self {
        self.by_type.insert(choice_type, selection);
        self
    }

    pub fn with_fighting_style(self, level: u8, style: impl Into<String>) -> Self {
        self.with(ChoiceKey::fighting_style(level), Selection::Single(style.into()))
    }

    pub fn with_subclass(self, level: u8, subclass: impl Into<String>) -> Self {
        self.with(ChoiceKey::class_feature(level), Selection::Single(subclass.into()))
    }

    pub fn with_ability_points(self, level: u8, points: &[(Ability, u8)]) -> Self {
        self.with(
            ChoiceKey::ability_score_increase(level),
            Selection::Asi(AsiChoice::points(points)),
        )
    }

    pub fn with_feat(self, level: u8, feat: impl Into<String>) -> Self {
        self.with(
            ChoiceKey::ability_score_increase(level),
            Selection::Asi(AsiChoice::Feat(feat.into())),
        )
    }

    pub fn with_spells<I, S>(mut self, spells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spells = spells.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cantrips<I, S>(mut self, cantrips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cantrips = cantrips.into_iter().map(Into::into).collect();
        self
    }

    /// Put one more point into `ability` for the improvement at `level`.
    /// Replaces a feat picked for that level.
    pub fn allocate_ability_point(&mut self, level: u8, ability: Ability) {
        let key = ChoiceKey::ability_score_increase(level);
        let mut points = match self.choices.remove(&key) {
            Some(Selection::Asi(AsiChoice::AbilityPoints(points))) => points,
            _ => BTreeMap::new(),
        };
        *points.entry(ability).or_insert(0) += 1;
        self.select(key, Selection::Asi(AsiChoice::AbilityPoints(points)));
    }

    /// Take one point back out of `ability`.
    pub fn remove_ability_point(&mut self, level: u8, ability: Ability) {
        let key = ChoiceKey::ability_score_increase(level);
        if let Some(Selection::Asi(AsiChoice::AbilityPoints(points))) = self.choices.get_mut(&key)
        {
            if let Some(count) = points.get_mut(&ability) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    points.remove(&ability);
                }
            }
            if points.is_empty() {
                self.choices.remove(&key);
            }
        }
    }

    /// Take a feat for the improvement at `level`, clearing any points.
    pub fn choose_feat(&mut self, level: u8, feat: impl Into<String>) {
        self.select(
            ChoiceKey::ability_score_increase(level),
            Selection::Asi(AsiChoice::Feat(feat.into())),
        );
    }

    /// Add or remove `value` from a multi-select choice.
    pub fn toggle_option(&mut self, key: ChoiceKey, value: &str) {
        let mut values = match self.choices.remove(&key) {
            Some(Selection::Multiple(values)) => values,
            Some(Selection::Single(existing)) => vec![existing],
            _ => Vec::new(),
        };
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
        if !values.is_empty() {
            self.select(key, Selection::Multiple(values));
        }
    }

    /// Add or remove a spell pick.
    pub fn toggle_spell(&mut self, name: &str) {
        toggle(&mut self.spells, name);
    }

    /// Add or remove a cantrip pick.
    pub fn toggle_cantrip(&mut self, name: &str) {
        toggle(&mut self.cantrips, name);
    }
}

fn toggle(list: &mut Vec<String>, name: &str) {
    if let Some(pos) = list.iter().position(|v| v.eq_ignore_ascii_case(name)) {
        list.remove(pos);
    } else {
        list.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_key_string_form() {
        let key = ChoiceKey::ability_score_increase(4);
        assert_eq!(key.to_string(), "abilityScoreIncrease_level_4");
        assert_eq!("fightingStyle_level_2".parse::<ChoiceKey>().unwrap(), ChoiceKey::fighting_style(2));
        assert!("fightingStyle_2".parse::<ChoiceKey>().is_err());
        assert!("spellSelection_level_2".parse::<ChoiceKey>().is_err());
        assert!("classFeature_level_x".parse::<ChoiceKey>().is_err());
    }

    #[test]
    fn test_choice_key_serializes_as_string_map_key() {
        let map = SelectionMap::new().with_fighting_style(2, "Archery");
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"fightingStyle_level_2\""));
        let back: SelectionMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_type_fallback_used_when_no_level_entry() {
        let map = SelectionMap::new()
            .with_type_fallback(ChoiceType::FightingStyle, Selection::Single("Defense".into()))
            .with_fighting_style(10, "Archery");
        assert_eq!(
            map.get(&ChoiceKey::fighting_style(2)),
            Some(&Selection::Single("Defense".into()))
        );
        assert_eq!(
            map.get(&ChoiceKey::fighting_style(10)),
            Some(&Selection::Single("Archery".into()))
        );
        assert_eq!(map.get(&ChoiceKey::class_feature(3)), None);
    }

    #[test]
    fn test_empty_level_entry_falls_back_to_type() {
        let map = SelectionMap::new()
            .with_type_fallback(ChoiceType::FightingStyle, Selection::Single("Defense".into()))
            .with(ChoiceKey::fighting_style(2), Selection::Single(" ".into()));
        assert_eq!(
            map.get(&ChoiceKey::fighting_style(2)),
            Some(&Selection::Single("Defense".into()))
        );

        let bare = SelectionMap::new().with(ChoiceKey::fighting_style(2), Selection::Multiple(vec![]));
        assert_eq!(bare.get(&ChoiceKey::fighting_style(2)), None);
    }

    #[test]
    fn test_points_and_feat_are_exclusive() {
        let mut map = SelectionMap::new();
        map.allocate_ability_point(4, Ability::Strength);
        map.allocate_ability_point(4, Ability::Strength);
        let key = ChoiceKey::ability_score_increase(4);
        assert!(matches!(
            map.get(&key),
            Some(Selection::Asi(AsiChoice::AbilityPoints(p))) if p[&Ability::Strength] == 2
        ));

        map.choose_feat(4, "Alert");
        assert_eq!(
            map.get(&key),
            Some(&Selection::Asi(AsiChoice::Feat("Alert".into())))
        );

        map.allocate_ability_point(4, Ability::Dexterity);
        assert_eq!(
            map.get(&key),
            Some(&Selection::Asi(AsiChoice::points(&[(Ability::Dexterity, 1)])))
        );
    }

    #[test]
    fn test_remove_ability_point_clears_empty_entry() {
        let mut map = SelectionMap::new();
        map.allocate_ability_point(8, Ability::Wisdom);
        map.remove_ability_point(8, Ability::Wisdom);
        assert!(map.get(&ChoiceKey::ability_score_increase(8)).is_none());
    }

    #[test]
    fn test_empty_selections() {
        assert!(Selection::Single("  ".into()).is_empty());
        assert!(Selection::Multiple(vec![]).is_empty());
        assert!(Selection::Asi(AsiChoice::points(&[(Ability::Strength, 0)])).is_empty());
        assert!(!Selection::Asi(AsiChoice::Feat("Lucky".into())).is_empty());
    }

    #[test]
    fn test_toggle_spell() {
        let mut map = SelectionMap::new();
        map.toggle_spell("Shield");
        map.toggle_spell("Sleep");
        map.toggle_spell("shield");
        assert_eq!(map.spells, vec!["Sleep".to_string()]);
    }
}
