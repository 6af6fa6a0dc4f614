use serde::{Deserialize, Serialize};

/// Category tag on a combat log entry; the presentation layer styles by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Info,
    Action,
    EnemyAction,
    Hit,
    Miss,
    Critical,
    Fumble,
    Success,
    Defeat,
    Error,
}

/// One entry of the append-only combat log. Entries carry a monotonic
/// sequence number and the round they were produced in rather than a wall
/// clock, so a battle replays identically from a seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub seq: u64,
    pub round: u32,
    pub kind: LogKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLog {
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn push(&mut self, round: u32, kind: LogKind, message: impl Into<String>) {
        let seq = self.entries.len() as u64;
        self.entries.push(LogEntry {
            seq,
            round,
            kind,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last entry of a given kind, newest first.
    pub fn last_of(&self, kind: LogKind) -> Option<&LogEntry> {
        self.entries.iter().rev().find(|e| e.kind == kind)
    }
}
