use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::Dice;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    #[error("invalid damage formula '{0}': expected NdS or NdS+B")]
    Malformed(String),
    #[error("damage formula '{0}' must roll at least 1d2")]
    Degenerate(String),
}

/// A damage expression such as `2d6+3`: dice count, die size, flat bonus.
/// Parsed when enemy templates are built, never at resolution time, so a bad
/// formula can't surface mid-combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageFormula {
    pub count: u8,
    pub sides: u8,
    pub bonus: i32,
}

impl DamageFormula {
    pub fn new(count: u8, sides: u8, bonus: i32) -> Self {
        Self {
            count,
            sides,
            bonus,
        }
    }
}

impl fmt::Display for DamageFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.bonus != 0 {
            write!(f, "{:+}", self.bonus)?;
        }
        Ok(())
    }
}

impl FromStr for DamageFormula {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, FormulaError> {
        let malformed = || FormulaError::Malformed(s.to_string());
        let (dice_part, bonus) = match s.split_once('+') {
            Some((dice, bonus)) => (dice, bonus.trim().parse::<i32>().map_err(|_| malformed())?),
            None => (s, 0),
        };
        let (count, sides) = dice_part.trim().split_once(['d', 'D']).ok_or_else(malformed)?;
        let count: u8 = count.trim().parse().map_err(|_| malformed())?;
        let sides: u8 = sides.trim().parse().map_err(|_| malformed())?;
        if count == 0 || sides < 2 {
            return Err(FormulaError::Degenerate(s.to_string()));
        }
        Ok(Self {
            count,
            sides,
            bonus,
        })
    }
}

impl Serialize for DamageFormula {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DamageFormula {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Flavor-level enemy description; stats are derived from level at roster
/// generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub name: String,
    pub creature_type: String,
    pub damage_dice: DamageFormula,
}

/// A concrete enemy in a roster. `level` is a challenge-rating proxy the
/// derived stats scale off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub creature_type: String,
    pub level: i32,
    pub max_hit_points: i32,
    pub armor_class: i32,
    pub attack_bonus: i32,
    pub damage_dice: DamageFormula,
}

impl Enemy {
    pub fn from_template(template: &EnemyTemplate, level: i32) -> Self {
        let level = level.max(1);
        Self {
            name: template.name.clone(),
            creature_type: template.creature_type.clone(),
            level,
            max_hit_points: level * 8 + 10,
            armor_class: 10 + level,
            attack_bonus: level / 2 + 2,
            damage_dice: template.damage_dice,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("no enemy templates to draw from")]
    NoTemplates,
}

/// Build an encounter roster for a character level: `min(level/2 + 1, 3)`
/// enemies, each within one level of the character and floored at level 1.
pub fn generate_roster(
    templates: &[EnemyTemplate],
    character_level: i32,
    dice: &mut Dice,
) -> Result<Vec<Enemy>, RosterError> {
    if templates.is_empty() {
        return Err(RosterError::NoTemplates);
    }
    let count = (character_level.max(1) / 2 + 1).min(3);
    let mut roster = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let template = &templates[dice.range(templates.len())];
        let variance = dice.range(3) as i32 - 1;
        roster.push(Enemy::from_template(template, character_level + variance));
    }
    Ok(roster)
}
