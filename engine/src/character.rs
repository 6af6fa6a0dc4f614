use serde::{Deserialize, Serialize};

use crate::ability_mod;
use crate::progression::xp_required;

/// Fixed proficiency constant applied to the player's attack rolls.
pub const PROFICIENCY_BONUS: i32 = 2;

/// The six ability scores, 1-20+ each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

/// The player-side combatant and its progression bookkeeping. During a battle
/// the combat engine owns a copy; HP and XP flow back in via
/// `progression::apply_battle` once the battle ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: i32,
    pub abilities: AbilityScores,
    pub hit_points: i32,
    pub max_hit_points: i32,
    #[serde(default)]
    pub current_xp: i32,
    #[serde(default)]
    pub total_xp_earned: i32,
    #[serde(default = "first_level_threshold")]
    pub xp_to_next_level: i32,
}

fn first_level_threshold() -> i32 {
    xp_required(1)
}

impl Character {
    /// Fresh level-1 character; starting HP is 10 + CON modifier.
    pub fn new(
        name: impl Into<String>,
        race: impl Into<String>,
        class: impl Into<String>,
        abilities: AbilityScores,
    ) -> Self {
        let max_hit_points = 10 + ability_mod(abilities.constitution);
        Self {
            name: name.into(),
            race: race.into(),
            class: class.into(),
            level: 1,
            abilities,
            hit_points: max_hit_points,
            max_hit_points,
            current_xp: 0,
            total_xp_earned: 0,
            xp_to_next_level: first_level_threshold(),
        }
    }

    pub fn strength_mod(&self) -> i32 {
        ability_mod(self.abilities.strength)
    }

    pub fn dexterity_mod(&self) -> i32 {
        ability_mod(self.abilities.dexterity)
    }

    /// Unarmored AC: 10 + DEX modifier.
    pub fn armor_class(&self) -> i32 {
        10 + self.dexterity_mod()
    }

    /// To-hit bonus: STR modifier plus the fixed proficiency constant.
    pub fn attack_bonus(&self) -> i32 {
        self.strength_mod() + PROFICIENCY_BONUS
    }

    /// Flat damage bonus: STR modifier, added to the first damage die only.
    pub fn damage_mod(&self) -> i32 {
        self.strength_mod()
    }
}
