//! Error types for session setup and persistence.
//!
//! Ordinary gameplay outcomes (wave cleared, player destroyed, unaffordable
//! purchase) are state transitions or no-ops, never errors. Only fatal
//! initialization problems and explicit save failures surface here.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the game core.
#[derive(Debug, Error)]
pub enum GameError {
    /// A session was requested for a level the player has not unlocked.
    #[error("level {requested} is locked (unlocked through {unlocked})")]
    LevelLocked {
        /// Level the caller asked for.
        requested: u32,
        /// Highest level currently unlocked.
        unlocked: u32,
    },

    /// The render surface reported unusable play-area dimensions.
    #[error("viewport must have positive dimensions, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// The save document could not be serialized for writing.
    #[error("failed to encode save document: {0}")]
    SaveEncode(#[from] serde_json::Error),
}
