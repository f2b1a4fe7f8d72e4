//! Entity state and world containers
//!
//! Positions are top-left corners; sizes extend right and down, matching
//! the screen-space the render surface draws in. Everything that moves
//! lives in one of the `World` vectors, updated in place each tick and
//! compacted after marking - containers are never spliced mid-iteration.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::tuning::LootKind;

/// Play-area bounds supplied by the render surface at session start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

/// Enemy archetypes. The kind is a step function of the level index; each
/// kind has a pure motion rule and (except `Basic`) a fire rule, dispatched
/// through a single match in the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Shooter,
    Elite,
    Boss,
}

impl EnemyKind {
    /// Archetype for a given level.
    pub fn for_level(level: u32) -> Self {
        if level < 5 {
            EnemyKind::Basic
        } else if level < 10 {
            EnemyKind::Shooter
        } else if level < 20 {
            EnemyKind::Elite
        } else {
            EnemyKind::Boss
        }
    }

    /// Basic enemies never shoot; everything above them does.
    pub fn fires(&self) -> bool {
        !matches!(self, EnemyKind::Basic)
    }
}

/// The player's ship, stats already folded from hull and upgrades.
#[derive(Debug, Clone)]
pub struct PlayerShip {
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick of directional movement
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub fire_rate_ms: f64,
    pub last_shot_ms: f64,
    pub shield: f32,
}

impl PlayerShip {
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// One wave enemy.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Score and coins awarded on kill
    pub value: u64,
    pub fire_rate_ms: f64,
    pub last_shot_ms: f64,
    pub bullet_damage: f32,
}

impl Enemy {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// A bullet in flight. `speed` is a magnitude; direction comes from the
/// faction (player shots travel up, enemy shots down).
#[derive(Debug, Clone)]
pub struct Projectile {
    pub faction: Faction,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub damage: f32,
    /// Marked when consumed by a hit; compacted at the end of the pass
    pub spent: bool,
}

/// A falling pickup.
#[derive(Debug, Clone)]
pub struct LootItem {
    pub kind: LootKind,
    pub value: u64,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

/// A cosmetic explosion fragment. Purely visual; never affects gameplay.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Linear fade: 1.0 at spawn, 0.0 at expiry.
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Things that happened during a tick, drained by the session layer and
/// mapped onto sounds, statistics and terminal transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ShotFired(Faction),
    EnemyKilled { value: u64 },
    PlayerDamaged { amount: f32 },
    LootCollected { kind: LootKind, value: u64 },
    PlayerDefeated,
    WaveCleared,
}

/// Complete per-level simulation state.
#[derive(Debug, Clone)]
pub struct World {
    pub viewport: Viewport,
    pub level: u32,
    pub player: PlayerShip,
    pub enemies: Vec<Enemy>,
    pub player_shots: Vec<Projectile>,
    pub enemy_shots: Vec<Projectile>,
    pub loot: Vec<LootItem>,
    pub particles: Vec<Particle>,
    /// Injected randomness for spawn jitter and loot rolls
    pub rng: Pcg32,
    /// Accumulated simulation time in milliseconds
    pub time_ms: f64,
    events: Vec<GameEvent>,
}

impl World {
    /// Fresh world for one level attempt. Call [`crate::sim::spawn_wave`]
    /// afterwards to populate the enemy wave.
    pub fn new(level: u32, viewport: Viewport, player: PlayerShip, seed: u64) -> Self {
        Self {
            viewport,
            level,
            player,
            enemies: Vec::new(),
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            loot: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            time_ms: 0.0,
            events: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this tick's events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn an explosion burst centered on `pos`.
    pub fn spawn_burst(&mut self, pos: Vec2) {
        use rand::Rng;
        for _ in 0..BURST_PARTICLES {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
                (self.rng.random::<f32>() - 0.5) * PARTICLE_SPREAD,
            );
            self.particles.push(Particle {
                pos,
                vel,
                life: PARTICLE_LIFE,
                max_life: PARTICLE_LIFE,
            });
        }
    }
}
