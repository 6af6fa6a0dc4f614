//! Turn-based combat resolver: one character against a small enemy roster,
//! with 5e-style action economy, vantage, and critical rules.
//!
//! Resolution is synchronous and stepwise. `end_turn` hands control to the
//! enemy side and `step_enemy` resolves one enemy at a time, so a front end
//! can pace the sequence however it likes without the resolver owning timers.

mod log;

pub use log::{CombatLog, LogEntry, LogKind};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::character::Character;
use crate::conditions::{self, Condition};
use crate::enemy::Enemy;
use crate::{Dice, RollClass, RollMode};

/// Base walking speed in feet; the movement budget resets to this each round.
pub const BASE_SPEED: i32 = 30;
/// Passive perception a hide attempt must beat.
pub const HIDE_DC: i32 = 12;
/// Unmodified d20 total needed to escape combat.
pub const FLEE_DC: i32 = 12;
/// Die the player's weapon rolls for damage.
const PLAYER_DAMAGE_SIDES: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory,
    Defeat,
    Fled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PlayerTurn,
    EnemyTurn,
    Ended(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSlot {
    Action,
    Bonus,
}

/// Per-round action-economy flags plus the remaining movement budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBudget {
    pub action_used: bool,
    pub bonus_action_used: bool,
    pub reaction_used: bool,
    pub movement_remaining: i32,
}

impl ActionBudget {
    fn fresh() -> Self {
        Self {
            action_used: false,
            bonus_action_used: false,
            reaction_used: false,
            movement_remaining: BASE_SPEED,
        }
    }
}

/// Mutable per-enemy combat state over the immutable enemy template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyState {
    pub enemy: Enemy,
    pub hp: i32,
    pub conditions: Vec<Condition>,
}

impl EnemyState {
    fn new(enemy: Enemy) -> Self {
        let hp = enemy.max_hit_points;
        Self {
            enemy,
            hp,
            conditions: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    #[error("combat requires at least one enemy")]
    EmptyRoster,
}

/// Result of resolving one slice of the enemy turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyStep {
    /// One enemy acted; more remain this round.
    Acted,
    /// The last living enemy has acted; a new round has begun.
    RoundAdvanced,
    /// The battle ended during the step.
    Ended(Outcome),
    /// Called outside the enemy turn; nothing happened.
    NotEnemyTurn,
}

/// Final numbers handed back to the caller once the battle ends. The caller
/// owns what `Defeat` means for the character record; the engine only
/// guarantees `Defeat` and `Fled` can never be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    pub outcome: Outcome,
    pub rounds: u32,
    pub total_damage_dealt: i32,
    pub total_damage_taken: i32,
    pub player_hp: i32,
}

/// One battle instance: owns all combat state, mutated only through the
/// action operations, each of which appends to the combat log. Invalid
/// attempts (spent slot, dead target, wrong phase) log an `Error` entry and
/// change nothing.
#[derive(Debug)]
pub struct CombatEngine {
    dice: Dice,
    character: Character,
    player_hp: i32,
    player_conditions: Vec<Condition>,
    enemies: Vec<EnemyState>,
    next_enemy: usize,
    round: u32,
    phase: Phase,
    budget: ActionBudget,
    log: CombatLog,
    total_damage_dealt: i32,
    total_damage_taken: i32,
}

impl CombatEngine {
    pub fn new(character: Character, roster: Vec<Enemy>, dice: Dice) -> Result<Self, CombatError> {
        if roster.is_empty() {
            return Err(CombatError::EmptyRoster);
        }
        let player_hp = character.hit_points;
        let mut engine = Self {
            dice,
            player_hp,
            character,
            player_conditions: Vec::new(),
            enemies: roster.into_iter().map(EnemyState::new).collect(),
            next_enemy: 0,
            round: 1,
            phase: Phase::PlayerTurn,
            budget: ActionBudget::fresh(),
            log: CombatLog::default(),
            total_damage_dealt: 0,
            total_damage_taken: 0,
        };
        let names: Vec<&str> = engine.enemies.iter().map(|e| e.enemy.name.as_str()).collect();
        engine.log.push(
            1,
            LogKind::Info,
            format!("{} faces {}!", engine.character.name, names.join(", ")),
        );
        debug!(enemies = engine.enemies.len(), "combat started");
        Ok(engine)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player_hp(&self) -> i32 {
        self.player_hp
    }

    pub fn budget(&self) -> ActionBudget {
        self.budget
    }

    pub fn enemies(&self) -> &[EnemyState] {
        &self.enemies
    }

    pub fn player_conditions(&self) -> &[Condition] {
        &self.player_conditions
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn total_damage_dealt(&self) -> i32 {
        self.total_damage_dealt
    }

    pub fn total_damage_taken(&self) -> i32 {
        self.total_damage_taken
    }

    /// Flavor hook for the adventure layer to seed a condition on the player.
    pub fn add_player_condition(&mut self, condition: Condition) {
        if !self.player_conditions.contains(&condition) {
            self.player_conditions.push(condition);
        }
    }

    /// Flavor hook for the adventure layer to seed a condition on an enemy.
    pub fn add_enemy_condition(&mut self, target: usize, condition: Condition) {
        if let Some(state) = self.enemies.get_mut(target) {
            if !state.conditions.contains(&condition) {
                state.conditions.push(condition);
            }
        }
    }

    pub fn report(&self) -> Option<BattleReport> {
        match self.phase {
            Phase::Ended(outcome) => Some(BattleReport {
                outcome,
                rounds: self.round,
                total_damage_dealt: self.total_damage_dealt,
                total_damage_taken: self.total_damage_taken,
                player_hp: self.player_hp,
            }),
            _ => None,
        }
    }

    fn reject(&mut self, message: impl Into<String>) {
        self.log.push(self.round, LogKind::Error, message);
    }

    fn require_player_turn(&mut self) -> bool {
        match self.phase {
            Phase::PlayerTurn => true,
            Phase::EnemyTurn => {
                self.reject("It isn't your turn!");
                false
            }
            Phase::Ended(_) => {
                self.reject("The battle is already over.");
                false
            }
        }
    }

    fn slot_available(&mut self, slot: ActionSlot) -> bool {
        match slot {
            ActionSlot::Action if self.budget.action_used => {
                self.reject("You've already used your action this turn!");
                false
            }
            ActionSlot::Bonus if self.budget.bonus_action_used => {
                self.reject("You've already used your bonus action this turn!");
                false
            }
            _ => true,
        }
    }

    fn consume_slot(&mut self, slot: ActionSlot) {
        match slot {
            ActionSlot::Action => self.budget.action_used = true,
            ActionSlot::Bonus => self.budget.bonus_action_used = true,
        }
    }

    /// Attack an enemy with the action or bonus-action slot. The slot is
    /// consumed whether the attack lands or not. A natural 1 always misses, a
    /// natural 20 always hits and rolls a second damage die (bonus once).
    pub fn attack(&mut self, target: usize, slot: ActionSlot) {
        if !self.require_player_turn() || !self.slot_available(slot) {
            return;
        }
        let Some(state) = self.enemies.get(target) else {
            self.reject("There is no such enemy.");
            return;
        };
        if !state.is_alive() {
            let name = state.enemy.name.clone();
            self.reject(format!("{name} is already down!"));
            return;
        }
        let target_name = state.enemy.name.clone();
        let target_ac = state.enemy.armor_class;
        let mode = conditions::player_attack_mode(&self.player_conditions, &state.conditions);

        self.log.push(
            self.round,
            LogKind::Action,
            format!("{} attacks {}!", self.character.name, target_name),
        );
        // Hidden grants its advantage to exactly this one roll.
        if self.player_conditions.contains(&Condition::Hidden) {
            self.player_conditions.retain(|c| *c != Condition::Hidden);
            self.log.push(
                self.round,
                LogKind::Info,
                format!("{} is no longer hidden.", self.character.name),
            );
        }

        let roll = self.dice.roll(20, self.character.attack_bonus(), mode);
        debug!(face = roll.face, total = roll.total, ?mode, "player attack roll");
        self.consume_slot(slot);

        match roll.class {
            RollClass::Fumble => {
                self.log.push(
                    self.round,
                    LogKind::Fumble,
                    format!("Critical miss! {}'s attack goes wide!", self.character.name),
                );
                return;
            }
            RollClass::Normal if roll.total < target_ac => {
                self.log.push(
                    self.round,
                    LogKind::Miss,
                    format!("Miss! Roll: {} vs AC: {}", roll.total, target_ac),
                );
                return;
            }
            _ => {}
        }

        let crit = roll.class == RollClass::Critical;
        let mut damage = self
            .dice
            .roll(PLAYER_DAMAGE_SIDES, self.character.damage_mod(), RollMode::Normal)
            .total;
        if crit {
            damage += self.dice.roll(PLAYER_DAMAGE_SIDES, 0, RollMode::Normal).face;
        }
        let damage = damage.max(0);

        let state = &mut self.enemies[target];
        state.hp = (state.hp - damage).max(0);
        let defeated = state.hp == 0;
        self.total_damage_dealt += damage;

        if crit {
            self.log.push(
                self.round,
                LogKind::Critical,
                format!("Critical hit! {damage} damage to {target_name}!"),
            );
        } else {
            self.log.push(
                self.round,
                LogKind::Hit,
                format!("Hit! {damage} damage to {target_name}!"),
            );
        }
        if defeated {
            self.log.push(
                self.round,
                LogKind::Defeat,
                format!("{target_name} has been defeated!"),
            );
        }
        self.check_victory();
    }

    /// Dash: spend the action to add the base speed to remaining movement.
    pub fn dash(&mut self) {
        if !self.require_player_turn() || !self.slot_available(ActionSlot::Action) {
            return;
        }
        self.budget.movement_remaining += BASE_SPEED;
        self.consume_slot(ActionSlot::Action);
        self.log.push(
            self.round,
            LogKind::Action,
            format!("{} dashes, doubling movement speed!", self.character.name),
        );
    }

    /// Disengage: movement this round won't provoke reactive attacks. No
    /// reactive-attack mechanic exists yet, so the tag is purely a marker.
    pub fn disengage(&mut self) {
        if !self.require_player_turn() || !self.slot_available(ActionSlot::Action) {
            return;
        }
        self.add_player_condition(Condition::Disengaged);
        self.consume_slot(ActionSlot::Action);
        self.log.push(
            self.round,
            LogKind::Action,
            format!(
                "{} disengages! Movement won't provoke opportunity attacks.",
                self.character.name
            ),
        );
    }

    /// Dodge: enemy attacks against the player this round have disadvantage.
    pub fn dodge(&mut self) {
        if !self.require_player_turn() || !self.slot_available(ActionSlot::Action) {
            return;
        }
        self.add_player_condition(Condition::Dodging);
        self.consume_slot(ActionSlot::Action);
        self.log.push(
            self.round,
            LogKind::Action,
            format!(
                "{} takes the Dodge action! Attacks against them have disadvantage.",
                self.character.name
            ),
        );
    }

    /// Hide: DEX roll against the enemies' passive perception. Success tags
    /// `Hidden`; the action is spent either way.
    pub fn hide(&mut self) {
        if !self.require_player_turn() || !self.slot_available(ActionSlot::Action) {
            return;
        }
        self.log.push(
            self.round,
            LogKind::Action,
            format!("{} attempts to hide...", self.character.name),
        );
        let roll = self
            .dice
            .roll(20, self.character.dexterity_mod(), RollMode::Normal);
        self.consume_slot(ActionSlot::Action);
        if roll.total >= HIDE_DC {
            self.add_player_condition(Condition::Hidden);
            self.log.push(
                self.round,
                LogKind::Success,
                format!("Successfully hidden! (Stealth: {})", roll.total),
            );
        } else {
            self.log.push(
                self.round,
                LogKind::Miss,
                format!(
                    "Failed to hide. (Stealth: {} vs Perception: {})",
                    roll.total, HIDE_DC
                ),
            );
        }
    }

    /// Flee: allowed even with the action spent. Unmodified d20; a total of
    /// `FLEE_DC` or more ends the battle as `Fled`, anything less ends the
    /// player's turn on the spot.
    pub fn flee(&mut self) {
        if !self.require_player_turn() {
            return;
        }
        self.log.push(
            self.round,
            LogKind::Action,
            format!("{} attempts to flee!", self.character.name),
        );
        let roll = self.dice.roll(20, 0, RollMode::Normal);
        debug!(total = roll.total, "flee roll");
        if roll.total >= FLEE_DC {
            self.log.push(
                self.round,
                LogKind::Success,
                "Successfully escaped from combat!",
            );
            self.end_battle(Outcome::Fled);
        } else {
            self.log.push(
                self.round,
                LogKind::Miss,
                "Failed to escape! The enemy blocks your path!",
            );
            self.end_turn();
        }
    }

    /// End the player's turn and hand control to the enemy side.
    pub fn end_turn(&mut self) {
        if !self.require_player_turn() {
            return;
        }
        self.phase = Phase::EnemyTurn;
        self.next_enemy = 0;
        debug!(round = self.round, "enemy turn begins");
    }

    /// Resolve the next living enemy's attack. After the last living enemy
    /// has acted the round advances: counter up, fresh action budget, fresh
    /// movement, transient conditions gone, control back to the player.
    pub fn step_enemy(&mut self) -> EnemyStep {
        match self.phase {
            Phase::EnemyTurn => {}
            Phase::Ended(outcome) => return EnemyStep::Ended(outcome),
            Phase::PlayerTurn => {
                self.reject("The enemies aren't acting right now.");
                return EnemyStep::NotEnemyTurn;
            }
        }
        while self.next_enemy < self.enemies.len() && !self.enemies[self.next_enemy].is_alive() {
            self.next_enemy += 1;
        }
        if self.next_enemy >= self.enemies.len() {
            self.advance_round();
            return EnemyStep::RoundAdvanced;
        }
        let idx = self.next_enemy;
        self.next_enemy += 1;
        self.resolve_enemy_attack(idx);
        if let Phase::Ended(outcome) = self.phase {
            return EnemyStep::Ended(outcome);
        }
        let more = self.enemies[self.next_enemy..].iter().any(EnemyState::is_alive);
        if more {
            EnemyStep::Acted
        } else {
            self.advance_round();
            EnemyStep::RoundAdvanced
        }
    }

    /// Run the whole enemy side to completion (no pacing).
    pub fn resolve_enemy_turns(&mut self) {
        while self.step_enemy() == EnemyStep::Acted {}
    }

    fn resolve_enemy_attack(&mut self, idx: usize) {
        let enemy = self.enemies[idx].enemy.clone();
        self.log.push(
            self.round,
            LogKind::EnemyAction,
            format!("{} attacks {}!", enemy.name, self.character.name),
        );
        let mode = conditions::enemy_attack_mode(&self.player_conditions);
        let roll = self.dice.roll(20, enemy.attack_bonus, mode);
        debug!(
            enemy = %enemy.name,
            face = roll.face,
            total = roll.total,
            ?mode,
            "enemy attack roll"
        );
        if roll.total < self.character.armor_class() {
            self.log
                .push(self.round, LogKind::Miss, format!("{} misses!", enemy.name));
            return;
        }

        // A natural 20 doubles the dice count; the flat bonus is added once.
        let crit = roll.class == RollClass::Critical;
        let formula = enemy.damage_dice;
        let dice_count = u32::from(formula.count) * if crit { 2 } else { 1 };
        let mut damage = formula.bonus;
        for _ in 0..dice_count {
            damage += self
                .dice
                .roll(i32::from(formula.sides), 0, RollMode::Normal)
                .face;
        }
        let damage = damage.max(0);

        if crit {
            self.log.push(
                self.round,
                LogKind::Critical,
                format!("Critical hit! {} deals {} damage!", enemy.name, damage),
            );
        } else {
            self.log.push(
                self.round,
                LogKind::Hit,
                format!("{} hits for {} damage!", enemy.name, damage),
            );
        }
        self.player_hp = (self.player_hp - damage).max(0);
        self.total_damage_taken += damage;
        if self.player_hp == 0 {
            self.end_battle(Outcome::Defeat);
        }
    }

    fn advance_round(&mut self) {
        self.round += 1;
        self.budget = ActionBudget::fresh();
        let removed = conditions::clear_transient(&mut self.player_conditions);
        for condition in removed {
            debug!(?condition, "transient condition cleared");
        }
        self.phase = Phase::PlayerTurn;
        self.next_enemy = 0;
        self.log
            .push(self.round, LogKind::Info, format!("Round {} begins.", self.round));
    }

    fn check_victory(&mut self) {
        if matches!(self.phase, Phase::Ended(_)) {
            return;
        }
        if self.enemies.iter().all(|e| e.hp == 0) {
            self.log
                .push(self.round, LogKind::Success, "All enemies have been defeated!");
            self.end_battle(Outcome::Victory);
        }
    }

    fn end_battle(&mut self, outcome: Outcome) {
        if matches!(self.phase, Phase::Ended(_)) {
            return;
        }
        if outcome == Outcome::Defeat {
            self.log.push(
                self.round,
                LogKind::Defeat,
                format!("{} has fallen in battle!", self.character.name),
            );
        }
        self.phase = Phase::Ended(outcome);
        debug!(?outcome, round = self.round, "battle ended");
    }
}
