use anyhow::{Context, Result};

use crate::enemy::EnemyTemplate;

/// Enemy templates bundled with the engine. Parsing here also validates every
/// bundled damage formula before any roster can be built from them.
pub fn builtin_enemy_templates() -> Result<Vec<EnemyTemplate>> {
    serde_json::from_str(include_str!("../content/enemies/basic.json"))
        .context("failed to parse bundled enemy templates")
}
