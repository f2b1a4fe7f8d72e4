//! Fixed timestep simulation tick
//!
//! One call advances the world by a single logical step: player intent,
//! projectile flight, enemy motion and fire, particle and loot timers, then
//! compaction of everything marked for removal. Motion constants are
//! per-tick displacements; cooldowns are milliseconds of simulation time.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, Faction, GameEvent, Projectile, World};
use crate::consts::*;
use crate::tuning::ENEMY_SCALING;

/// Input intent for a single tick. Continuous - the host sets the current
/// intent every tick rather than sending edge events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Horizontal intent in [-1, 1]
    pub move_x: f32,
    /// Vertical intent in [-1, 1]
    pub move_y: f32,
    /// Fire intent (held is fine; the cooldown gates actual shots)
    pub fire: bool,
}

/// Advance the world by one fixed logical step.
pub fn advance(world: &mut World, input: &TickInput) {
    world.time_ms += TICK_MS;

    move_player(world, input);
    if input.fire {
        try_player_fire(world);
    }

    // Projectiles fly straight; off-screen ones are marked and compacted
    for shot in &mut world.player_shots {
        shot.pos.y -= shot.speed;
        if shot.pos.y + shot.size.y < 0.0 {
            shot.spent = true;
        }
    }
    for shot in &mut world.enemy_shots {
        shot.pos.y += shot.speed;
        if shot.pos.y > world.viewport.height {
            shot.spent = true;
        }
    }

    update_enemies(world);

    for particle in &mut world.particles {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }

    for item in &mut world.loot {
        item.pos.y += LOOT_FALL_SPEED;
        // Missed loot is gone for good once it leaves the bottom
        if item.pos.y > world.viewport.height {
            item.collected = true;
        }
    }

    // Compaction passes
    world.player_shots.retain(|s| !s.spent);
    world.enemy_shots.retain(|s| !s.spent);
    world.particles.retain(|p| p.life > 0);
    world.loot.retain(|l| !l.collected);
}

fn move_player(world: &mut World, input: &TickInput) {
    let player = &mut world.player;
    let intent = Vec2::new(
        input.move_x.clamp(-1.0, 1.0),
        input.move_y.clamp(-1.0, 1.0),
    );
    player.pos += intent * player.speed;

    let max = Vec2::new(
        (world.viewport.width - player.size.x).max(0.0),
        (world.viewport.height - player.size.y).max(0.0),
    );
    player.pos = player.pos.clamp(Vec2::ZERO, max);
}

fn try_player_fire(world: &mut World) {
    let now = world.time_ms;
    let player = &mut world.player;
    if now - player.last_shot_ms < player.fire_rate_ms {
        return;
    }
    player.last_shot_ms = now;

    let pos = Vec2::new(player.center().x - SHOT_WIDTH / 2.0, player.pos.y);
    let damage = player.damage;
    world.player_shots.push(Projectile {
        faction: Faction::Player,
        pos,
        size: Vec2::new(SHOT_WIDTH, SHOT_HEIGHT),
        speed: PLAYER_SHOT_SPEED,
        damage,
        spent: false,
    });
    world.push_event(GameEvent::ShotFired(Faction::Player));
}

fn update_enemies(world: &mut World) {
    let t = world.time_ms;
    let mut fired = 0u32;

    for enemy in &mut world.enemies {
        // Per-kind motion rules, exhaustive by construction
        match enemy.kind {
            EnemyKind::Basic => {
                enemy.pos.y += enemy.speed;
            }
            EnemyKind::Shooter => {
                enemy.pos.y += enemy.speed * 0.7;
                enemy.pos.x += (t * 0.002).sin() as f32 * 2.0;
            }
            EnemyKind::Elite => {
                enemy.pos.y += enemy.speed * 0.5;
                enemy.pos.x += (t * 0.003 + enemy.pos.y as f64 * 0.01).sin() as f32 * 3.0;
            }
            EnemyKind::Boss => {
                enemy.pos.y += enemy.speed * 0.4;
                enemy.pos.x += (t * 0.001).sin() as f32 * 1.5;
            }
        }

        if enemy.kind.fires() && t - enemy.last_shot_ms >= enemy.fire_rate_ms {
            enemy.last_shot_ms = t;
            let pos = Vec2::new(
                enemy.center().x - SHOT_WIDTH / 2.0,
                enemy.pos.y + enemy.size.y,
            );
            world.enemy_shots.push(Projectile {
                faction: Faction::Enemy,
                pos,
                size: Vec2::new(SHOT_WIDTH, SHOT_HEIGHT),
                speed: ENEMY_SHOT_SPEED,
                damage: enemy.bullet_damage,
                spent: false,
            });
            fired += 1;
        }

        // Enemies never leave play: past the bottom they wrap back to a
        // random spot along the top
        if enemy.pos.y > world.viewport.height {
            enemy.pos.y = -enemy.size.y;
            let span = (world.viewport.width - enemy.size.x).max(1.0);
            enemy.pos.x = world.rng.random_range(0.0..span);
        }
    }

    for _ in 0..fired {
        world.push_event(GameEvent::ShotFired(Faction::Enemy));
    }
}

/// Populate the enemy wave for the world's level. Count, stats and
/// archetype all follow the linear scaling tables.
pub fn spawn_wave(world: &mut World) {
    let level = world.level;
    let scaling = ENEMY_SCALING;
    let jitter: u32 = world.rng.random_range(0..3);
    let count = scaling.count_base(level) + jitter;
    let kind = EnemyKind::for_level(level);

    let size = Vec2::splat(scaling.size_at(level));
    let fire_rate_ms = scaling.fire_rate_at(level);
    let span = (world.viewport.width - SPAWN_RIGHT_INSET).max(1.0);

    for _ in 0..count {
        let x = world.rng.random_range(0.0..span);
        let y = SPAWN_TOP_OFFSET + world.rng.random::<f32>() * SPAWN_BAND_HEIGHT;
        world.enemies.push(Enemy {
            kind,
            pos: Vec2::new(x, y),
            size,
            speed: scaling.speed_at(level),
            health: scaling.health_at(level),
            max_health: scaling.health_at(level),
            value: scaling.value_at(level),
            fire_rate_ms,
            // Negative so the first attempt is never gated
            last_shot_ms: -fire_rate_ms,
            bullet_damage: scaling.bullet_damage_at(level),
        });
    }

    log::info!("level {level}: spawned {count} {kind:?} enemies");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PlayerShip, Viewport};

    fn test_player() -> PlayerShip {
        PlayerShip {
            pos: Vec2::new(375.0, 500.0),
            size: Vec2::splat(PLAYER_SIZE),
            speed: 8.0,
            health: 100.0,
            max_health: 100.0,
            damage: 25.0,
            fire_rate_ms: 300.0,
            last_shot_ms: -300.0,
            shield: 0.0,
        }
    }

    fn test_world() -> World {
        World::new(1, Viewport::new(800.0, 600.0), test_player(), 42)
    }

    #[test]
    fn test_player_clamped_to_viewport() {
        let mut world = test_world();
        let input = TickInput {
            move_x: -1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            advance(&mut world, &input);
        }
        assert_eq!(world.player.pos.x, 0.0);

        let input = TickInput {
            move_x: 1.0,
            move_y: 1.0,
            ..Default::default()
        };
        for _ in 0..200 {
            advance(&mut world, &input);
        }
        assert_eq!(world.player.pos.x, 800.0 - PLAYER_SIZE);
        assert_eq!(world.player.pos.y, 600.0 - PLAYER_SIZE);
    }

    #[test]
    fn test_fire_rate_gates_shots() {
        let mut world = test_world();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut shots = 0;
        for _ in 0..60 {
            advance(&mut world, &input);
            shots += world
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::ShotFired(Faction::Player)))
                .count();
        }
        // 1000ms of sim time at a 300ms cooldown: shot at ~0, 300, 600, 900
        assert_eq!(shots, 4);
    }

    #[test]
    fn test_basic_enemy_descends_and_wraps() {
        let mut world = test_world();
        world.enemies.push(Enemy {
            kind: EnemyKind::Basic,
            pos: Vec2::new(100.0, 595.0),
            size: Vec2::splat(40.0),
            speed: 10.0,
            health: 30.0,
            max_health: 30.0,
            value: 10,
            fire_rate_ms: 1500.0,
            last_shot_ms: 0.0,
            bullet_damage: 10.0,
        });

        advance(&mut world, &TickInput::default());
        let enemy = &world.enemies[0];
        // 595 + 10 passes the bottom bound, so it wraps above the top
        assert_eq!(enemy.pos.y, -enemy.size.y);
        assert!(enemy.pos.x >= 0.0 && enemy.pos.x <= 800.0 - enemy.size.x);
    }

    #[test]
    fn test_shooter_fires_on_cooldown() {
        let mut world = test_world();
        world.enemies.push(Enemy {
            kind: EnemyKind::Shooter,
            pos: Vec2::new(100.0, 100.0),
            size: Vec2::splat(40.0),
            speed: 0.0,
            health: 30.0,
            max_health: 30.0,
            value: 10,
            fire_rate_ms: 500.0,
            last_shot_ms: -500.0,
            bullet_damage: 10.0,
        });

        // 600ms of ticks: shots at ~0ms and ~500ms
        for _ in 0..36 {
            advance(&mut world, &TickInput::default());
        }
        let enemy_shots = world
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::ShotFired(Faction::Enemy)))
            .count();
        assert_eq!(enemy_shots, 2);
    }

    #[test]
    fn test_particles_expire() {
        let mut world = test_world();
        world.spawn_burst(Vec2::new(100.0, 100.0));
        assert_eq!(world.particles.len(), BURST_PARTICLES);

        for _ in 0..PARTICLE_LIFE {
            advance(&mut world, &TickInput::default());
        }
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_missed_loot_disappears_off_screen() {
        use crate::sim::state::LootItem;
        use crate::tuning::LootKind;

        let mut world = test_world();
        world.loot.push(LootItem {
            kind: LootKind::Coin,
            value: 5,
            pos: Vec2::new(100.0, 599.0),
            size: Vec2::splat(LOOT_SIZE),
            collected: false,
        });

        advance(&mut world, &TickInput::default());
        assert!(world.loot.is_empty());
    }

    #[test]
    fn test_spawn_wave_counts_and_stats() {
        let mut world = test_world();
        world.level = 10;
        spawn_wave(&mut world);

        let base = ENEMY_SCALING.count_base(10) as usize;
        assert!(world.enemies.len() >= base && world.enemies.len() < base + 3);
        for enemy in &world.enemies {
            assert_eq!(enemy.kind, EnemyKind::Elite);
            assert_eq!(enemy.health, 110.0);
            assert_eq!(enemy.fire_rate_ms, 1000.0);
            assert!(enemy.size.x > 0.0 && enemy.size.y > 0.0);
        }
    }

    #[test]
    fn test_determinism_same_seed_same_world() {
        let mut a = test_world();
        let mut b = test_world();
        spawn_wave(&mut a);
        spawn_wave(&mut b);

        let input = TickInput {
            move_x: 0.5,
            fire: true,
            ..Default::default()
        };
        for _ in 0..120 {
            advance(&mut a, &input);
            advance(&mut b, &input);
        }

        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
        }
        assert_eq!(a.player_shots.len(), b.player_shots.len());
    }
}
