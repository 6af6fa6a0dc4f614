use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub mod adventure;
pub mod character;
pub mod combat;
pub mod conditions;
pub mod content;
pub mod enemy;
pub mod progression;

pub use character::{AbilityScores, Character, PROFICIENCY_BONUS};
pub use combat::{
    ActionBudget, ActionSlot, BattleReport, CombatEngine, CombatError, CombatLog, EnemyState,
    EnemyStep, LogEntry, LogKind, Outcome, Phase, BASE_SPEED, FLEE_DC, HIDE_DC,
};
pub use conditions::Condition;
pub use enemy::{generate_roster, DamageFormula, Enemy, EnemyTemplate, FormulaError, RosterError};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollMode {
    Normal,
    Advantage,
    Disadvantage,
}

impl RollMode {
    /// Combine two vantage sources. Opposites cancel to a single normal roll.
    pub fn combine(self, other: RollMode) -> RollMode {
        use RollMode::*;
        match (self, other) {
            (Advantage, Disadvantage) | (Disadvantage, Advantage) => Normal,
            (Normal, x) => x,
            (x, Normal) => x,
            (Advantage, Advantage) => Advantage,
            (Disadvantage, Disadvantage) => Disadvantage,
        }
    }
}

/// Classification of the kept face. Only 20-sided rolls crit or fumble.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollClass {
    Normal,
    Critical,
    Fumble,
}

/// One resolved roll: every face thrown (one, or two under vantage), the face
/// kept, the bonus, and the final total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiceRoll {
    pub raw: Vec<i32>,
    pub face: i32,
    pub bonus: i32,
    pub total: i32,
    pub class: RollClass,
}

#[derive(Debug)]
enum Source {
    Seeded(ChaCha8Rng),
    Scripted(VecDeque<i32>),
}

#[derive(Debug)]
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Fixed sequence of faces for tests; panics if the script runs dry.
    pub fn from_scripted(faces: Vec<i32>) -> Self {
        Self {
            source: Source::Scripted(faces.into()),
        }
    }

    fn face(&mut self, sides: i32) -> i32 {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=sides),
            Source::Scripted(faces) => faces.pop_front().expect("scripted dice exhausted"),
        }
    }

    /// Uniform index into `0..len`, used for roster template picks.
    pub fn range(&mut self, len: usize) -> usize {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(0..len),
            Source::Scripted(faces) => {
                faces.pop_front().expect("scripted dice exhausted") as usize % len
            }
        }
    }

    pub fn d20(&mut self, mode: RollMode) -> i32 {
        self.roll(20, 0, mode).face
    }

    /// Roll `sides` plus a flat bonus under the given vantage. Vantage throws
    /// a second die and keeps max (advantage) or min (disadvantage).
    pub fn roll(&mut self, sides: i32, bonus: i32, mode: RollMode) -> DiceRoll {
        let first = self.face(sides);
        let (raw, face) = match mode {
            RollMode::Normal => (vec![first], first),
            RollMode::Advantage => {
                let second = self.face(sides);
                (vec![first, second], first.max(second))
            }
            RollMode::Disadvantage => {
                let second = self.face(sides);
                (vec![first, second], first.min(second))
            }
        };
        let class = if sides == 20 && face == 20 {
            RollClass::Critical
        } else if sides == 20 && face == 1 {
            RollClass::Fumble
        } else {
            RollClass::Normal
        };
        DiceRoll {
            raw,
            face,
            bonus,
            total: face + bonus,
            class,
        }
    }
}

/// D&D ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division.
    (score - 10).div_euclid(2)
}
