//! Galaxy Strike - a wave-based arcade space shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, per-tick update, collisions)
//! - `session`: Level lifecycle state machine wiring sim into the economy
//! - `economy`: Wallets, upgrade cost curves, commissions, daily rewards
//! - `ships`: Ship catalog access, ownership and selection
//! - `save`: Versioned save document with migration
//! - `persistence`: Storage backend seam and the progression store
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input devices and menu screens are collaborators, not
//! residents: the crate exposes read-only snapshots each tick and calls a
//! fire-and-forget sound sink, but draws nothing and reads no hardware.

pub mod audio;
pub mod economy;
pub mod error;
pub mod persistence;
pub mod save;
pub mod session;
pub mod ships;
pub mod sim;
pub mod tuning;

pub use audio::{NullSink, SoundEvent, SoundSink};
pub use error::GameError;
pub use persistence::{MemoryBackend, ProgressionStore, StorageBackend};
pub use save::SaveDocument;
pub use session::{HudSnapshot, LevelSummary, Session, SessionPhase};
pub use sim::{TickInput, Viewport, World};

/// Game configuration constants
pub mod consts {
    /// Fixed logical timestep in milliseconds (60 Hz simulation)
    pub const TICK_MS: f64 = 1000.0 / 60.0;

    /// Player ship dimensions (square sprite)
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Vertical gap between the player spawn point and the bottom bound
    pub const PLAYER_BOTTOM_MARGIN: f32 = 100.0;

    /// Projectile dimensions
    pub const SHOT_WIDTH: f32 = 5.0;
    pub const SHOT_HEIGHT: f32 = 15.0;
    /// Player projectile speed (pixels per tick, upward)
    pub const PLAYER_SHOT_SPEED: f32 = 12.0;
    /// Enemy projectile speed (pixels per tick, downward)
    pub const ENEMY_SHOT_SPEED: f32 = 6.0;

    /// Particles spawned per explosion burst
    pub const BURST_PARTICLES: usize = 8;
    /// Particle lifetime in ticks
    pub const PARTICLE_LIFE: u32 = 30;
    /// Particle velocity spread (pixels per tick, centered on zero)
    pub const PARTICLE_SPREAD: f32 = 8.0;

    /// Loot item dimensions (square pickup)
    pub const LOOT_SIZE: f32 = 20.0;
    /// Loot fall speed (pixels per tick)
    pub const LOOT_FALL_SPEED: f32 = 2.0;
    /// Health restored by a health pickup
    pub const HEALTH_PICKUP_HEAL: f32 = 30.0;

    /// Flat damage dealt by an enemy ramming the player (ignores shield)
    pub const RAM_DAMAGE: f32 = 30.0;
    /// Minimum damage a bullet deals through any shield
    pub const SHIELD_DAMAGE_FLOOR: f32 = 5.0;

    /// Enemy spawn band: top offset and vertical extent
    pub const SPAWN_TOP_OFFSET: f32 = 50.0;
    pub const SPAWN_BAND_HEIGHT: f32 = 300.0;
    /// Horizontal spawn inset from the right edge
    pub const SPAWN_RIGHT_INSET: f32 = 60.0;
}
