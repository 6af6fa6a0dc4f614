use serde::{Deserialize, Serialize};

use crate::RollMode;

/// Named status tags attached to a combatant.
///
/// `Dodging` and `Disengaged` are transient: they last through the enemy
/// turns they are meant to affect and wear off when the round returns to the
/// player. `Hidden` is consumed by the player's next attack roll. `Prone` and
/// `Frightened` persist until explicitly removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Hidden,
    Dodging,
    Disengaged,
    Prone,
    Frightened,
}

impl Condition {
    pub fn is_transient(self) -> bool {
        matches!(self, Condition::Dodging | Condition::Disengaged)
    }
}

/// Vantage on the player's attack roll from both sides' conditions.
/// Advantage: player hidden, or the target prone. Disadvantage: player prone
/// or frightened. Opposing sources cancel via `RollMode::combine`.
pub fn player_attack_mode(player: &[Condition], target: &[Condition]) -> RollMode {
    let mut mode = RollMode::Normal;
    if player.contains(&Condition::Hidden) || target.contains(&Condition::Prone) {
        mode = mode.combine(RollMode::Advantage);
    }
    if player.contains(&Condition::Prone) || player.contains(&Condition::Frightened) {
        mode = mode.combine(RollMode::Disadvantage);
    }
    mode
}

/// Vantage on an enemy's attack against the player: advantage if the player
/// is prone, disadvantage if the player is dodging.
pub fn enemy_attack_mode(player: &[Condition]) -> RollMode {
    let mut mode = RollMode::Normal;
    if player.contains(&Condition::Prone) {
        mode = mode.combine(RollMode::Advantage);
    }
    if player.contains(&Condition::Dodging) {
        mode = mode.combine(RollMode::Disadvantage);
    }
    mode
}

/// Drop the transient tags, returning what was removed for logging.
pub fn clear_transient(conditions: &mut Vec<Condition>) -> Vec<Condition> {
    let removed: Vec<Condition> = conditions
        .iter()
        .copied()
        .filter(|c| c.is_transient())
        .collect();
    conditions.retain(|c| !c.is_transient());
    removed
}
