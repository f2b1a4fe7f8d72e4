//! Session controller
//!
//! One `Session` is one level attempt: Loading happens in [`Session::start`]
//! (fatal problems surface there and no session exists afterwards), then the
//! host drives `tick` once per frame until the resolver reports a terminal
//! state. Victory and defeat fold the run's tallies into the save document
//! at the boundary and persist synchronously; the simulation itself never
//! touches persisted state mid-tick.
//!
//! ```text
//! start -> Playing <-> Paused
//!             |
//!             +-> Victory | Defeat   (retry -> a fresh Playing session)
//! ```

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::audio::{SoundEvent, SoundSink};
use crate::consts::*;
use crate::error::{GameError, Result};
use crate::persistence::{ProgressionStore, StorageBackend};
use crate::save::SaveDocument;
use crate::ships;
use crate::sim::{
    EnemyKind, Faction, GameEvent, PlayerShip, TickInput, Viewport, World, advance, resolve,
    spawn_wave,
};
use crate::tuning::{
    self, LEVEL_COUNT, LEVEL_REWARD_GEM_CHANCE, LootKind, MIN_FIRE_RATE_MS,
};

/// Lifecycle phase of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Playing,
    Paused,
    Victory,
    Defeat,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Victory | SessionPhase::Defeat)
    }
}

/// Final report for a finished level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelSummary {
    pub level: u32,
    pub score: u64,
    pub victory: bool,
    pub coins_earned: u64,
    pub gems_earned: u64,
    pub stars: u8,
}

/// Read-only HUD values published each tick for the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub level: u32,
    pub score: u64,
    pub health_fraction: f32,
    pub enemies_remaining: usize,
    pub coins_collected: u64,
    pub gems_collected: u64,
}

/// One level attempt, owning its simulation world.
#[derive(Debug)]
pub struct Session {
    level: u32,
    phase: SessionPhase,
    world: World,
    score: u64,
    kills: u64,
    shots_fired: u64,
    coins_collected: u64,
    gems_collected: u64,
    play_time_ms: f64,
    summary: Option<LevelSummary>,
}

impl Session {
    /// Build a session for `level`, seeding the player from the selected
    /// ship and upgrade levels. Fails fast on a locked level or unusable
    /// viewport; on error no session exists.
    pub fn start(
        level: u32,
        viewport: Viewport,
        doc: &SaveDocument,
        seed: u64,
    ) -> Result<Self> {
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            return Err(GameError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if level == 0 || level > doc.progress.unlocked_levels {
            return Err(GameError::LevelLocked {
                requested: level,
                unlocked: doc.progress.unlocked_levels,
            });
        }

        let spec = ships::selected_spec(doc);
        let upgrades = &doc.upgrades;
        let max_health = spec.health + tuning::health_bonus(upgrades.health);
        let fire_rate_ms = (spec.fire_rate_ms
            - tuning::fire_rate_reduction_ms(upgrades.fire_rate))
        .max(MIN_FIRE_RATE_MS);

        let player = PlayerShip {
            pos: Vec2::new(
                viewport.width / 2.0 - PLAYER_SIZE / 2.0,
                viewport.height - PLAYER_BOTTOM_MARGIN,
            ),
            size: Vec2::splat(PLAYER_SIZE),
            speed: spec.speed,
            health: max_health,
            max_health,
            damage: spec.damage + tuning::weapon_damage_bonus(upgrades.weapon),
            fire_rate_ms,
            last_shot_ms: -fire_rate_ms,
            shield: spec.shield + tuning::shield_bonus(upgrades.shield),
        };

        let mut world = World::new(level, viewport, player, seed);
        spawn_wave(&mut world);
        log::info!("session started: level {level}, ship {:?}", spec.class);

        Ok(Self {
            level,
            phase: SessionPhase::Playing,
            world,
            score: 0,
            kills: 0,
            shots_fired: 0,
            coins_collected: 0,
            gems_collected: 0,
            play_time_ms: 0.0,
            summary: None,
        })
    }

    /// Fresh session for the same level, discarding this one's world.
    pub fn retry(&self, doc: &SaveDocument, seed: u64) -> Result<Self> {
        Self::start(self.level, self.world.viewport, doc, seed)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Read-only view of the simulation for the render surface.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            level: self.level,
            score: self.score,
            health_fraction: self.world.player.health_fraction(),
            enemies_remaining: self.world.enemies.len(),
            coins_collected: self.coins_collected,
            gems_collected: self.gems_collected,
        }
    }

    /// Set once a terminal state is reached.
    pub fn summary(&self) -> Option<&LevelSummary> {
        self.summary.as_ref()
    }

    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.phase = SessionPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Playing;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            SessionPhase::Playing => self.phase = SessionPhase::Paused,
            SessionPhase::Paused => self.phase = SessionPhase::Playing,
            _ => {}
        }
    }

    /// Drive one frame: advance the world, resolve combat, map events onto
    /// sounds and tallies, and fold terminal states into the store. Ticks
    /// outside `Playing` are no-ops, which is what Paused means.
    pub fn tick<B: StorageBackend>(
        &mut self,
        input: &TickInput,
        store: &mut ProgressionStore<B>,
        audio: &mut impl SoundSink,
    ) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        advance(&mut self.world, input);
        resolve(&mut self.world);
        self.play_time_ms += TICK_MS;

        // None = keep playing, Some(true) = victory, Some(false) = defeat.
        // Defeat wins over a same-tick wave clear because it is emitted
        // first by the resolver.
        let mut terminal: Option<bool> = None;

        for event in self.world.drain_events() {
            match event {
                GameEvent::ShotFired(Faction::Player) => {
                    self.shots_fired += 1;
                    audio.play(SoundEvent::Shoot);
                }
                GameEvent::ShotFired(Faction::Enemy) => {}
                GameEvent::EnemyKilled { value } => {
                    self.kills += 1;
                    self.score += value;
                    self.coins_collected += value;
                    audio.play(SoundEvent::Explosion);
                }
                GameEvent::PlayerDamaged { .. } => {
                    audio.play(SoundEvent::Hit);
                }
                GameEvent::LootCollected { kind, value } => {
                    match kind {
                        LootKind::Coin => self.coins_collected += value,
                        LootKind::Gem => self.gems_collected += value,
                        LootKind::Health => {}
                    }
                    audio.play(SoundEvent::Coin);
                }
                GameEvent::PlayerDefeated => {
                    terminal.get_or_insert(false);
                }
                GameEvent::WaveCleared => {
                    terminal.get_or_insert(true);
                }
            }
        }

        match terminal {
            Some(true) => self.finish_victory(store, audio),
            Some(false) => self.finish_defeat(store, audio),
            None => {}
        }
    }

    fn finish_victory<B: StorageBackend>(
        &mut self,
        store: &mut ProgressionStore<B>,
        audio: &mut impl SoundSink,
    ) {
        self.phase = SessionPhase::Victory;

        let clear_coins = tuning::level_clear_coins(self.level);
        let bonus_gem = if self.world.rng.random_bool(LEVEL_REWARD_GEM_CHANCE) {
            1
        } else {
            0
        };
        let coins_earned = self.coins_collected + clear_coins;
        let gems_earned = self.gems_collected + bonus_gem;
        let stars = tuning::star_rating(self.score);

        let doc = store.document_mut();
        doc.wallet.coins += coins_earned;
        doc.wallet.gems += gems_earned;
        doc.progress.record_stars(self.level, stars);
        if self.level == doc.progress.unlocked_levels && doc.progress.unlocked_levels < LEVEL_COUNT
        {
            // Frontier clear pushes the unlock boundary forward
            doc.progress.unlocked_levels += 1;
        }
        self.fold_run(doc, coins_earned, gems_earned, false);
        store.save();

        audio.play(SoundEvent::Victory);
        self.summary = Some(LevelSummary {
            level: self.level,
            score: self.score,
            victory: true,
            coins_earned,
            gems_earned,
            stars,
        });
        log::info!(
            "level {} cleared: score {}, {} coins, {} gems, {} stars",
            self.level,
            self.score,
            coins_earned,
            gems_earned,
            stars
        );
    }

    fn finish_defeat<B: StorageBackend>(
        &mut self,
        store: &mut ProgressionStore<B>,
        audio: &mut impl SoundSink,
    ) {
        self.phase = SessionPhase::Defeat;

        // Loot grabbed during the run is kept; no progress advances
        let coins_earned = self.coins_collected;
        let gems_earned = self.gems_collected;

        let doc = store.document_mut();
        doc.wallet.coins += coins_earned;
        doc.wallet.gems += gems_earned;
        self.fold_run(doc, coins_earned, gems_earned, true);
        store.save();

        audio.play(SoundEvent::GameOver);
        self.summary = Some(LevelSummary {
            level: self.level,
            score: self.score,
            victory: false,
            coins_earned,
            gems_earned,
            stars: 0,
        });
        log::info!("level {} lost: score {}", self.level, self.score);
    }

    /// Fold the run's tallies into the document and re-evaluate
    /// achievements. Called exactly once, at the terminal boundary.
    fn fold_run(&self, doc: &mut SaveDocument, coins: u64, gems: u64, death: bool) {
        doc.progress.current_level = self.level;
        doc.statistics.kills += self.kills;
        doc.statistics.shots_fired += self.shots_fired;
        doc.statistics.coins_collected += coins;
        doc.statistics.gems_collected += gems;
        doc.statistics.play_time_ms += self.play_time_ms as u64;
        if death {
            doc.statistics.deaths += 1;
        }
        doc.refresh_achievements();
    }

    /// Archetype the current level's wave is built from (HUD flavor text).
    pub fn wave_kind(&self) -> EnemyKind {
        EnemyKind::for_level(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::persistence::MemoryBackend;
    use crate::sim::state::{Enemy, Projectile};

    fn store() -> ProgressionStore<MemoryBackend> {
        ProgressionStore::load(MemoryBackend::new())
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn start_level_1(store: &ProgressionStore<MemoryBackend>) -> Session {
        Session::start(1, viewport(), store.document(), 42).unwrap()
    }

    #[test]
    fn test_start_rejects_locked_level() {
        let store = store();
        let err = Session::start(2, viewport(), store.document(), 1).unwrap_err();
        assert!(matches!(
            err,
            GameError::LevelLocked {
                requested: 2,
                unlocked: 1
            }
        ));
    }

    #[test]
    fn test_start_rejects_bad_viewport() {
        let store = store();
        let err = Session::start(1, Viewport::new(0.0, 600.0), store.document(), 1).unwrap_err();
        assert!(matches!(err, GameError::InvalidViewport { .. }));
    }

    #[test]
    fn test_player_stats_fold_ship_and_upgrades() {
        let mut store = store();
        {
            let doc = store.document_mut();
            doc.upgrades.weapon = 3; // +30 damage
            doc.upgrades.fire_rate = 2; // -13ms
            doc.upgrades.shield = 2; // +5
            doc.upgrades.health = 2; // +25
        }
        let session = start_level_1(&store);
        let player = &session.world().player;

        // Scout base: 100hp / 25dmg / 300ms / 0 shield
        assert_eq!(player.max_health, 125.0);
        assert_eq!(player.damage, 55.0);
        assert_eq!(player.fire_rate_ms, 287.0);
        assert_eq!(player.shield, 5.0);
    }

    #[test]
    fn test_pause_suspends_simulation() {
        let mut store = store();
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);

        session.pause();
        assert_eq!(session.phase(), SessionPhase::Paused);
        let time_before = session.world().time_ms;
        session.tick(&TickInput::default(), &mut store, &mut audio);
        assert_eq!(session.world().time_ms, time_before);

        session.resume();
        session.tick(&TickInput::default(), &mut store, &mut audio);
        assert!(session.world().time_ms > time_before);
    }

    #[test]
    fn test_empty_wave_wins_on_first_tick() {
        let mut store = store();
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);
        session.world.enemies.clear();

        session.tick(&TickInput::default(), &mut store, &mut audio);

        assert_eq!(session.phase(), SessionPhase::Victory);
        assert!(audio.events.contains(&SoundEvent::Victory));
        let summary = session.summary().unwrap();
        assert!(summary.victory);
        assert_eq!(summary.coins_earned, tuning::level_clear_coins(1));
    }

    #[test]
    fn test_victory_unlocks_frontier_and_persists() {
        let mut store = store();
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);
        session.world.enemies.clear();

        let coins_before = store.document().wallet.coins;
        session.tick(&TickInput::default(), &mut store, &mut audio);

        let summary = *session.summary().unwrap();
        let doc = store.document();
        assert_eq!(doc.progress.unlocked_levels, 2);
        assert_eq!(doc.progress.current_level, 1);
        assert_eq!(doc.wallet.coins, coins_before + summary.coins_earned);
        assert!(doc.progress.stars.contains_key(&1));

        // The boundary save went through the backend
        let reloaded = ProgressionStore::load(MemoryBackend::with_payload(
            store.document().to_json().unwrap(),
        ));
        assert_eq!(reloaded.document().progress.unlocked_levels, 2);
    }

    #[test]
    fn test_replay_does_not_advance_frontier() {
        let mut store = store();
        store.document_mut().progress.unlocked_levels = 5;
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);
        session.world.enemies.clear();

        session.tick(&TickInput::default(), &mut store, &mut audio);
        assert_eq!(store.document().progress.unlocked_levels, 5);
    }

    #[test]
    fn test_kill_awards_and_achievement() {
        let mut store = store();
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);

        // Replace the wave with one almost-dead enemy under the player's gun
        session.world.enemies.clear();
        session.world.enemies.push(Enemy {
            kind: EnemyKind::Basic,
            pos: Vec2::new(100.0, 100.0),
            size: Vec2::splat(40.0),
            speed: 0.0,
            health: 1.0,
            max_health: 30.0,
            value: 10,
            fire_rate_ms: 1500.0,
            last_shot_ms: 0.0,
            bullet_damage: 10.0,
        });
        session.world.player_shots.push(Projectile {
            faction: Faction::Player,
            pos: Vec2::new(110.0, 130.0),
            size: Vec2::new(SHOT_WIDTH, SHOT_HEIGHT),
            speed: 0.0,
            damage: 25.0,
            spent: false,
        });

        session.tick(&TickInput::default(), &mut store, &mut audio);

        assert_eq!(session.phase(), SessionPhase::Victory);
        assert_eq!(session.score(), 10);
        assert!(audio.events.contains(&SoundEvent::Explosion));
        let doc = store.document();
        assert_eq!(doc.statistics.kills, 1);
        assert!(doc.achievements[&tuning::AchievementId::FirstKill].unlocked);
    }

    #[test]
    fn test_defeat_keeps_loot_and_counts_death() {
        let mut store = store();
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);
        session.coins_collected = 17;
        session.world.player.health = 1.0;
        session.world.enemy_shots.push(Projectile {
            faction: Faction::Enemy,
            pos: session.world.player.pos,
            size: Vec2::new(SHOT_WIDTH, SHOT_HEIGHT),
            speed: 0.0,
            damage: 50.0,
            spent: false,
        });

        let coins_before = store.document().wallet.coins;
        session.tick(&TickInput::default(), &mut store, &mut audio);

        assert_eq!(session.phase(), SessionPhase::Defeat);
        assert!(audio.events.contains(&SoundEvent::GameOver));
        let doc = store.document();
        assert_eq!(doc.statistics.deaths, 1);
        assert_eq!(doc.progress.unlocked_levels, 1);
        assert_eq!(doc.wallet.coins, coins_before + 17);
        assert!(!session.summary().unwrap().victory);
    }

    #[test]
    fn test_terminal_session_ignores_ticks() {
        let mut store = store();
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);
        session.world.enemies.clear();
        session.tick(&TickInput::default(), &mut store, &mut audio);
        assert!(session.phase().is_terminal());

        let saved_doc = store.document().clone();
        session.tick(&TickInput::default(), &mut store, &mut audio);
        assert_eq!(*store.document(), saved_doc);
    }

    #[test]
    fn test_retry_rebuilds_same_level() {
        let mut store = store();
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);
        session.world.enemies.clear();
        session.tick(&TickInput::default(), &mut store, &mut audio);

        let fresh = session.retry(store.document(), 43).unwrap();
        assert_eq!(fresh.level(), 1);
        assert_eq!(fresh.phase(), SessionPhase::Playing);
        assert!(!fresh.world().enemies.is_empty());
        assert_eq!(fresh.score(), 0);
    }

    #[test]
    fn test_hud_snapshot_tracks_state() {
        let store = store();
        let session = start_level_1(&store);
        let hud = session.hud();
        assert_eq!(hud.level, 1);
        assert_eq!(hud.score, 0);
        assert_eq!(hud.health_fraction, 1.0);
        assert_eq!(hud.enemies_remaining, session.world().enemies.len());
    }

    #[test]
    fn test_full_run_to_victory_with_autofire() {
        let mut store = store();
        // Level 1 basics never shoot; with enough hull the handful of rams
        // a wave can land (30 each) cannot be lethal, so the run must end
        // in victory once every enemy is shot down or rammed away.
        store.document_mut().upgrades.health = 10; // 325 max health
        let mut audio = RecordingSink::default();
        let mut session = start_level_1(&store);

        for i in 0..20_000 {
            let input = TickInput {
                move_x: if (i / 120) % 2 == 0 { 1.0 } else { -1.0 },
                fire: true,
                ..Default::default()
            };
            session.tick(&input, &mut store, &mut audio);
            if session.phase().is_terminal() {
                break;
            }
        }

        assert_eq!(session.phase(), SessionPhase::Victory);
        assert!(store.document().statistics.shots_fired > 0);
        assert!(store.document().statistics.play_time_ms > 0);
        assert!(audio.events.contains(&SoundEvent::Shoot));
        assert!(audio.events.contains(&SoundEvent::Victory));
    }
}
