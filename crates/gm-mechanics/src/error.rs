//! Error types for the mechanics crate.

use gm_core::StateError;

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A race is not in the race table.
    #[error("unknown race: {0}")]
    UnknownRace(String),

    /// A standing stone is not in the standing-stone table.
    #[error("unknown standing stone: {0}")]
    UnknownStone(String),

    /// A loot table name is not in the loot tables.
    #[error("unknown loot table: {0}")]
    UnknownLootTable(String),

    /// A loot table has no rollable entries.
    #[error("loot table '{0}' has no entries with positive weight")]
    EmptyLootTable(String),

    /// A dice expression could not be parsed.
    #[error("invalid dice expression: {0:?}")]
    InvalidDice(String),

    /// A character name was empty.
    #[error("character name must not be empty")]
    EmptyName,

    /// Reading or writing a document failed.
    #[error("{0}")]
    State(#[from] StateError),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
