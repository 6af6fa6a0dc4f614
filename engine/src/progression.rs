use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::character::Character;
use crate::combat::{BattleReport, Outcome};
use crate::{Dice, RollMode};

/// XP granted per point of damage dealt over a battle.
pub const XP_PER_DAMAGE: i32 = 10;

/// XP required to advance from `level` to the next: `floor(100 * 1.5^(L-1))`.
pub fn xp_required(level: i32) -> i32 {
    (100.0 * 1.5_f64.powi(level - 1)).floor() as i32
}

/// Total XP spent climbing from level 1 to `level`.
pub fn total_xp_for_level(level: i32) -> i32 {
    (1..level).map(xp_required).sum()
}

/// XP earned from a finished battle. Defeat earns nothing; escaping still
/// pays out for the damage dealt before running.
pub fn battle_xp(report: &BattleReport) -> i32 {
    match report.outcome {
        Outcome::Defeat => 0,
        Outcome::Victory | Outcome::Fled => report.total_damage_dealt * XP_PER_DAMAGE,
    }
}

/// What a battle did to the character record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleUpdate {
    pub xp_gained: i32,
    pub levels_gained: i32,
    pub hp_gained: i32,
}

/// Fold a finished battle back into the character record: surviving HP, XP,
/// and any level-ups (each raises max and current HP by d6+2). On defeat the
/// record is left untouched; permanent-death semantics belong to the caller.
pub fn apply_battle(
    character: &mut Character,
    report: &BattleReport,
    dice: &mut Dice,
) -> BattleUpdate {
    if report.outcome == Outcome::Defeat {
        return BattleUpdate {
            xp_gained: 0,
            levels_gained: 0,
            hp_gained: 0,
        };
    }

    character.hit_points = report.player_hp;
    let xp_gained = battle_xp(report);
    character.current_xp += xp_gained;
    character.total_xp_earned += xp_gained;

    let mut levels_gained = 0;
    let mut hp_gained = 0;
    while character.current_xp >= character.xp_to_next_level {
        character.current_xp -= character.xp_to_next_level;
        character.level += 1;
        character.xp_to_next_level = xp_required(character.level);
        let gain = dice.roll(6, 2, RollMode::Normal).total;
        character.max_hit_points += gain;
        character.hit_points += gain;
        levels_gained += 1;
        hp_gained += gain;
        debug!(level = character.level, gain, "level up");
    }

    BattleUpdate {
        xp_gained,
        levels_gained,
        hp_gained,
    }
}
