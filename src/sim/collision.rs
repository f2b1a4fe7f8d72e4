//! Collision detection and combat resolution
//!
//! Axis-aligned bounding boxes all the way down. `resolve` runs once per
//! tick after motion: every relevant pair is tested, hits are applied by
//! marking, and containers are compacted between passes. All projectile vs
//! enemy pairs settle before the victory check, so a volley that kills the
//! last enemy in the tick it lands still scores and still wins.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, LootItem, World};
use crate::consts::*;
use crate::tuning::{LOOT_TABLE, LootKind};

/// AABB overlap test. Positions are top-left corners.
pub fn rects_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x < pos_b.x + size_b.x
        && pos_a.x + size_a.x > pos_b.x
        && pos_a.y < pos_b.y + size_b.y
        && pos_a.y + size_a.y > pos_b.y
}

/// Resolve every collision pair for this tick, mutating health, loot and
/// currency-bearing events. Emits terminal events (`PlayerDefeated`,
/// `WaveCleared`) for the session to observe.
pub fn resolve(world: &mut World) {
    player_shots_vs_enemies(world);
    world.enemies.retain(|e| e.health > 0.0);

    enemy_shots_vs_player(world);
    enemies_vs_player(world);
    world.enemies.retain(|e| e.health > 0.0);
    world.enemy_shots.retain(|s| !s.spent);
    world.player_shots.retain(|s| !s.spent);

    loot_vs_player(world);
    world.loot.retain(|l| !l.collected);

    if world.enemies.is_empty() && world.player.is_alive() {
        world.push_event(GameEvent::WaveCleared);
    }
}

fn player_shots_vs_enemies(world: &mut World) {
    for si in 0..world.player_shots.len() {
        if world.player_shots[si].spent {
            continue;
        }
        for ei in 0..world.enemies.len() {
            if world.enemies[ei].health <= 0.0 {
                continue;
            }
            let shot = &world.player_shots[si];
            let (shot_pos, shot_size, damage) = (shot.pos, shot.size, shot.damage);
            let enemy = &world.enemies[ei];
            if !rects_overlap(shot_pos, shot_size, enemy.pos, enemy.size) {
                continue;
            }

            // Consumed on the first overlap, kill or not
            world.player_shots[si].spent = true;
            world.spawn_burst(shot_pos);

            let enemy = &mut world.enemies[ei];
            enemy.health = (enemy.health - damage).max(0.0);
            if enemy.health <= 0.0 {
                let value = enemy.value;
                let center = enemy.center();
                world.push_event(GameEvent::EnemyKilled { value });
                roll_loot(world, center);
            }
            break;
        }
    }
}

/// Independent Bernoulli trial per table entry; one kill may drop nothing
/// or several items.
fn roll_loot(world: &mut World, center: Vec2) {
    for entry in &LOOT_TABLE {
        if world.rng.random_bool(entry.chance) {
            world.loot.push(LootItem {
                kind: entry.kind,
                value: entry.value,
                pos: center,
                size: Vec2::splat(LOOT_SIZE),
                collected: false,
            });
        }
    }
}

fn enemy_shots_vs_player(world: &mut World) {
    for si in 0..world.enemy_shots.len() {
        if !world.player.is_alive() {
            break;
        }
        if world.enemy_shots[si].spent {
            continue;
        }
        let shot = &world.enemy_shots[si];
        let (shot_pos, shot_size, bullet_damage) = (shot.pos, shot.size, shot.damage);
        if !rects_overlap(shot_pos, shot_size, world.player.pos, world.player.size) {
            continue;
        }

        world.enemy_shots[si].spent = true;
        world.spawn_burst(shot_pos);
        // Shield soaks damage, but a hit always lands for at least the floor
        let damage = (bullet_damage - world.player.shield).max(SHIELD_DAMAGE_FLOOR);
        damage_player(world, damage);
    }
}

fn enemies_vs_player(world: &mut World) {
    for ei in 0..world.enemies.len() {
        if !world.player.is_alive() {
            break;
        }
        if world.enemies[ei].health <= 0.0 {
            continue;
        }
        let enemy = &world.enemies[ei];
        if !rects_overlap(enemy.pos, enemy.size, world.player.pos, world.player.size) {
            continue;
        }

        let center = world.enemies[ei].center();
        // Ramming destroys the enemy without awarding its value
        world.enemies[ei].health = 0.0;
        world.spawn_burst(center);
        damage_player(world, RAM_DAMAGE);
    }
}

/// Apply damage and check for defeat immediately, not at end of tick.
fn damage_player(world: &mut World, amount: f32) {
    world.player.health = (world.player.health - amount).max(0.0);
    world.push_event(GameEvent::PlayerDamaged { amount });
    if !world.player.is_alive() {
        world.push_event(GameEvent::PlayerDefeated);
    }
}

fn loot_vs_player(world: &mut World) {
    for li in 0..world.loot.len() {
        let item = &world.loot[li];
        let (kind, value) = (item.kind, item.value);
        if !rects_overlap(item.pos, item.size, world.player.pos, world.player.size) {
            continue;
        }

        world.loot[li].collected = true;
        if kind == LootKind::Health {
            let player = &mut world.player;
            player.health = (player.health + HEALTH_PICKUP_HEAL).min(player.max_health);
        }
        world.push_event(GameEvent::LootCollected { kind, value });
    }
}
