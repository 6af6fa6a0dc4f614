//! Contract types for the external narrative generator.
//!
//! The generator is an opaque collaborator that returns one layer of the
//! branching adventure tree as structured JSON: five outcome nodes and five
//! choices pointing into them. The adventure layer validates a layer before
//! routing any choice; the combat engine only ever sees a node through
//! `roster_for_node` once the node is flagged as a combat encounter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Dice;
use crate::enemy::{Enemy, EnemyTemplate, RosterError, generate_roster};

/// Nodes and choices per generated layer.
pub const LAYER_WIDTH: usize = 5;
/// At most two choices may share an outcome node.
pub const MIN_DISTINCT_NODES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterType {
    Combat,
    Social,
    Exploration,
    Puzzle,
    Trap,
    Resolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    Safe,
    Risky,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceTheme {
    Social,
    Exploration,
    Strategy,
    Combat,
    Utility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContent {
    pub scene_description: String,
    pub encounter_type: EncounterType,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ChoiceKind,
    pub theme: ChoiceTheme,
    /// Index into the layer's `nodes` this choice leads to.
    pub child_node_index: usize,
}

/// One generated layer of the adventure tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedLayer {
    pub nodes: Vec<NodeContent>,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayerError {
    #[error("expected 5 nodes, got {0}")]
    WrongNodeCount(usize),
    #[error("expected 5 choices, got {0}")]
    WrongChoiceCount(usize),
    #[error("choice '{label}' points at node {index}, out of range")]
    ChoiceOutOfRange { label: String, index: usize },
    #[error("only {0} distinct nodes; at least 3 required")]
    TooMuchOverlap(usize),
}

impl GeneratedLayer {
    /// Enforce the generator's contract before any choice is routed: exactly
    /// five nodes and choices, every choice in range, and no more than two
    /// choices collapsing onto the same scene.
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.nodes.len() != LAYER_WIDTH {
            return Err(LayerError::WrongNodeCount(self.nodes.len()));
        }
        if self.choices.len() != LAYER_WIDTH {
            return Err(LayerError::WrongChoiceCount(self.choices.len()));
        }
        for choice in &self.choices {
            if choice.child_node_index >= self.nodes.len() {
                return Err(LayerError::ChoiceOutOfRange {
                    label: choice.label.clone(),
                    index: choice.child_node_index,
                });
            }
        }
        let mut scenes: Vec<&str> = self
            .nodes
            .iter()
            .map(|n| n.scene_description.as_str())
            .collect();
        scenes.sort_unstable();
        scenes.dedup();
        if scenes.len() < MIN_DISTINCT_NODES {
            return Err(LayerError::TooMuchOverlap(scenes.len()));
        }
        Ok(())
    }
}

/// Build an encounter roster iff the node routes into combat; non-combat
/// nodes produce no roster and never touch the combat engine.
pub fn roster_for_node(
    node: &NodeContent,
    character_level: i32,
    templates: &[EnemyTemplate],
    dice: &mut Dice,
) -> Result<Option<Vec<Enemy>>, RosterError> {
    if node.encounter_type != EncounterType::Combat {
        return Ok(None);
    }
    generate_roster(templates, character_level, dice).map(Some)
}
