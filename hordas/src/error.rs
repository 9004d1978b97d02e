//! Error types
//!
//! Action errors never abort a fight: the mission loop turns them into
//! `Rejected` narration and the turn goes on.

use thiserror::Error;

/// Why an action did not execute
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not enough mana for {ability} ({have}/{need})")]
    InsufficientMana {
        ability: String,
        have: u32,
        need: u32,
    },

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("{ability} is not usable yet: {reason}")]
    PrematureAbility { ability: String, reason: String },
}

/// A character snapshot that breaks the data model's invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("level {0} outside 1..=10")]
    LevelOutOfRange(u32),

    #[error("hp {hp} exceeds hp_max {hp_max}")]
    HpAboveMax { hp: u32, hp_max: u32 },
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    #[error("unknown class: {0}")]
    UnknownClass(String),
}
