//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed logical timestep only
//! - Seeded RNG only
//! - Stable container order (append order; removals compact, never splice)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{rects_overlap, resolve};
pub use state::{
    Enemy, EnemyKind, Faction, GameEvent, LootItem, Particle, PlayerShip, Projectile, Viewport,
    World,
};
pub use tick::{TickInput, advance, spawn_wave};
