//! Data-driven game balance
//!
//! Every number a designer might want to touch lives here: the ship
//! catalog, upgrade cost curves and effects, enemy scaling, the loot table,
//! level-clear rewards, commissions, daily rewards and achievements.
//! Values are tuned defaults, not contracts - the rest of the crate reads
//! them through these tables rather than hard-coding.

use serde::{Deserialize, Serialize};

/// Currency kinds used by the economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Coins,
    Gems,
}

/// Starting balances for a fresh save.
pub const START_COINS: u64 = 1000;
pub const START_GEMS: u64 = 50;

/// Number of levels in the campaign.
pub const LEVEL_COUNT: u32 = 100;

// === Ship catalog ===

/// Ship hull classes, from the free starter to the gem-priced flagships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipClass {
    Scout,
    Fighter,
    Tank,
    Sniper,
    Legendary,
    Ultimate,
}

impl ShipClass {
    pub const ALL: [ShipClass; 6] = [
        ShipClass::Scout,
        ShipClass::Fighter,
        ShipClass::Tank,
        ShipClass::Sniper,
        ShipClass::Legendary,
        ShipClass::Ultimate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipClass::Scout => "scout",
            ShipClass::Fighter => "fighter",
            ShipClass::Tank => "tank",
            ShipClass::Sniper => "sniper",
            ShipClass::Legendary => "legendary",
            ShipClass::Ultimate => "ultimate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            // "basic" is the legacy id for the starter hull in v1 saves
            "scout" | "basic" => Some(ShipClass::Scout),
            "fighter" => Some(ShipClass::Fighter),
            "tank" => Some(ShipClass::Tank),
            "sniper" => Some(ShipClass::Sniper),
            "legendary" => Some(ShipClass::Legendary),
            "ultimate" => Some(ShipClass::Ultimate),
            _ => None,
        }
    }
}

/// Immutable catalog entry for one ship variant.
#[derive(Debug, Clone, Copy)]
pub struct ShipSpec {
    pub class: ShipClass,
    pub name: &'static str,
    pub price: u64,
    pub currency: Currency,
    pub health: f32,
    /// Pixels per tick of directional movement
    pub speed: f32,
    pub damage: f32,
    /// Cooldown between shots in milliseconds
    pub fire_rate_ms: f64,
    pub shield: f32,
}

/// The full catalog. The scout is free and owned from the first launch.
pub const SHIP_CATALOG: [ShipSpec; 6] = [
    ShipSpec {
        class: ShipClass::Scout,
        name: "Scout",
        price: 0,
        currency: Currency::Coins,
        health: 100.0,
        speed: 8.0,
        damage: 25.0,
        fire_rate_ms: 300.0,
        shield: 0.0,
    },
    ShipSpec {
        class: ShipClass::Fighter,
        name: "Fighter",
        price: 500,
        currency: Currency::Coins,
        health: 80.0,
        speed: 12.0,
        damage: 20.0,
        fire_rate_ms: 200.0,
        shield: 0.0,
    },
    ShipSpec {
        class: ShipClass::Tank,
        name: "Tank",
        price: 800,
        currency: Currency::Coins,
        health: 200.0,
        speed: 5.0,
        damage: 35.0,
        fire_rate_ms: 500.0,
        shield: 10.0,
    },
    ShipSpec {
        class: ShipClass::Sniper,
        name: "Sniper",
        price: 1200,
        currency: Currency::Coins,
        health: 90.0,
        speed: 7.0,
        damage: 60.0,
        fire_rate_ms: 600.0,
        shield: 5.0,
    },
    ShipSpec {
        class: ShipClass::Legendary,
        name: "Legendary",
        price: 50,
        currency: Currency::Gems,
        health: 150.0,
        speed: 10.0,
        damage: 45.0,
        fire_rate_ms: 250.0,
        shield: 15.0,
    },
    ShipSpec {
        class: ShipClass::Ultimate,
        name: "Ultimate",
        price: 100,
        currency: Currency::Gems,
        health: 180.0,
        speed: 9.0,
        damage: 55.0,
        fire_rate_ms: 180.0,
        shield: 20.0,
    },
];

/// Look up the catalog entry for a ship class.
pub fn ship_spec(class: ShipClass) -> &'static ShipSpec {
    SHIP_CATALOG
        .iter()
        .find(|s| s.class == class)
        .expect("every ShipClass has a catalog entry")
}

// === Upgrade tracks ===

/// Upgrade tracks the player can level up between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    Weapon,
    FireRate,
    Shield,
    Health,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Weapon,
        UpgradeKind::FireRate,
        UpgradeKind::Shield,
        UpgradeKind::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::Weapon => "weapon",
            UpgradeKind::FireRate => "fire_rate",
            UpgradeKind::Shield => "shield",
            UpgradeKind::Health => "health",
        }
    }
}

/// Cost curve and bounds for one upgrade track.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeTrack {
    pub kind: UpgradeKind,
    pub base_cost: u64,
    pub cost_multiplier: f64,
    pub max_level: u32,
}

pub const fn upgrade_track(kind: UpgradeKind) -> UpgradeTrack {
    match kind {
        UpgradeKind::Weapon => UpgradeTrack {
            kind,
            base_cost: 50,
            cost_multiplier: 1.5,
            max_level: 20,
        },
        UpgradeKind::FireRate => UpgradeTrack {
            kind,
            base_cost: 75,
            cost_multiplier: 1.6,
            max_level: 15,
        },
        UpgradeKind::Shield => UpgradeTrack {
            kind,
            base_cost: 100,
            cost_multiplier: 1.7,
            max_level: 10,
        },
        UpgradeKind::Health => UpgradeTrack {
            kind,
            base_cost: 150,
            cost_multiplier: 1.8,
            max_level: 10,
        },
    }
}

/// Cost to go from `level` to `level + 1`:
/// `floor(base * multiplier^(level - 1))`.
pub fn upgrade_cost(kind: UpgradeKind, level: u32) -> u64 {
    let track = upgrade_track(kind);
    let scaled = track.base_cost as f64 * track.cost_multiplier.powi(level.saturating_sub(1) as i32);
    scaled.floor() as u64
}

/// Cooldown can never drop below this, no matter the fire-rate level.
pub const MIN_FIRE_RATE_MS: f64 = 100.0;

/// Stat bonuses are relative to level 1, so a fresh save plays the raw ship.
pub fn weapon_damage_bonus(level: u32) -> f32 {
    (level.saturating_sub(1) * 15) as f32
}

pub fn fire_rate_reduction_ms(level: u32) -> f64 {
    (level.saturating_sub(1) * 13) as f64
}

pub fn shield_bonus(level: u32) -> f32 {
    (level.saturating_sub(1) * 5) as f32
}

pub fn health_bonus(level: u32) -> f32 {
    (level.saturating_sub(1) * 25) as f32
}

// === Enemy scaling ===

/// Linear per-level scaling for enemy waves.
#[derive(Debug, Clone, Copy)]
pub struct EnemyScaling {
    pub base_count: u32,
    pub base_health: f32,
    pub health_per_level: f32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub base_size: f32,
    pub size_per_level: f32,
    pub base_value: u64,
    pub value_per_level: u64,
    pub base_fire_rate_ms: f64,
    pub fire_rate_step_ms: f64,
    pub base_bullet_damage: f32,
    pub bullet_damage_per_level: f32,
}

pub const ENEMY_SCALING: EnemyScaling = EnemyScaling {
    base_count: 5,
    base_health: 30.0,
    health_per_level: 8.0,
    base_speed: 1.0,
    speed_per_level: 0.2,
    base_size: 40.0,
    size_per_level: 2.0,
    base_value: 10,
    value_per_level: 3,
    base_fire_rate_ms: 1500.0,
    fire_rate_step_ms: 50.0,
    base_bullet_damage: 10.0,
    bullet_damage_per_level: 2.0,
};

impl EnemyScaling {
    /// Wave size before the random jitter is added.
    pub fn count_base(&self, level: u32) -> u32 {
        self.base_count + level / 2
    }

    pub fn health_at(&self, level: u32) -> f32 {
        self.base_health + level as f32 * self.health_per_level
    }

    pub fn speed_at(&self, level: u32) -> f32 {
        self.base_speed + level as f32 * self.speed_per_level
    }

    pub fn size_at(&self, level: u32) -> f32 {
        self.base_size + level as f32 * self.size_per_level
    }

    pub fn value_at(&self, level: u32) -> u64 {
        self.base_value + level as u64 * self.value_per_level
    }

    /// Enemy cooldown shrinks with level; clamped so it never reaches zero.
    pub fn fire_rate_at(&self, level: u32) -> f64 {
        (self.base_fire_rate_ms - level as f64 * self.fire_rate_step_ms).max(MIN_FIRE_RATE_MS)
    }

    pub fn bullet_damage_at(&self, level: u32) -> f32 {
        self.base_bullet_damage + level as f32 * self.bullet_damage_per_level
    }
}

// === Loot ===

/// What a loot item does when collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootKind {
    Coin,
    Gem,
    Health,
}

/// One independent Bernoulli trial in the per-kill loot roll.
#[derive(Debug, Clone, Copy)]
pub struct LootTableEntry {
    pub chance: f64,
    pub kind: LootKind,
    pub value: u64,
}

/// Trials are independent: a single kill may drop nothing or several items.
pub const LOOT_TABLE: [LootTableEntry; 4] = [
    LootTableEntry {
        chance: 0.6,
        kind: LootKind::Coin,
        value: 5,
    },
    LootTableEntry {
        chance: 0.3,
        kind: LootKind::Coin,
        value: 10,
    },
    LootTableEntry {
        chance: 0.1,
        kind: LootKind::Gem,
        value: 1,
    },
    LootTableEntry {
        chance: 0.2,
        kind: LootKind::Health,
        value: 0,
    },
];

// === Level rewards ===

pub const LEVEL_REWARD_BASE_COINS: u64 = 50;
pub const LEVEL_REWARD_COINS_PER_LEVEL: u64 = 15;
/// Chance of a single bonus gem on level clear.
pub const LEVEL_REWARD_GEM_CHANCE: f64 = 0.3;
/// Score needed for 1, 2 and 3 stars.
pub const STAR_THRESHOLDS: [u64; 3] = [500, 1000, 1500];

pub fn level_clear_coins(level: u32) -> u64 {
    LEVEL_REWARD_BASE_COINS + level as u64 * LEVEL_REWARD_COINS_PER_LEVEL
}

/// Star rating for a level-clear score.
pub fn star_rating(score: u64) -> u8 {
    let mut stars = 0;
    for (i, threshold) in STAR_THRESHOLDS.iter().enumerate() {
        if score >= *threshold {
            stars = i as u8 + 1;
        }
    }
    stars
}

// === Commissions ===

/// Share of every upgrade cost paid back into the claimable coin pool.
pub const UPGRADE_COMMISSION_RATE: f64 = 0.10;
/// Share of every ship price paid back into the claimable gem pool.
pub const PURCHASE_COMMISSION_RATE: f64 = 0.05;

pub fn upgrade_commission(cost: u64) -> u64 {
    (cost as f64 * UPGRADE_COMMISSION_RATE).floor() as u64
}

pub fn purchase_commission(price: u64) -> u64 {
    (price as f64 * PURCHASE_COMMISSION_RATE).floor() as u64
}

// === Daily rewards ===

pub const DAILY_BASE_REWARD: u64 = 100;
pub const DAILY_STREAK_BONUS: u64 = 50;
pub const DAILY_MAX_STREAK: u32 = 7;

/// Coin reward for claiming at the given (already capped) streak.
pub fn daily_reward(streak: u32) -> u64 {
    DAILY_BASE_REWARD + streak as u64 * DAILY_STREAK_BONUS
}

// === Achievements ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstKill,
    CoinCollector,
    LevelMaster,
    UpgradeExpert,
}

impl AchievementId {
    pub const ALL: [AchievementId; 4] = [
        AchievementId::FirstKill,
        AchievementId::CoinCollector,
        AchievementId::LevelMaster,
        AchievementId::UpgradeExpert,
    ];
}

#[derive(Debug, Clone, Copy)]
pub struct AchievementSpec {
    pub id: AchievementId,
    pub name: &'static str,
    pub target: u64,
    pub reward_coins: u64,
    pub reward_gems: u64,
}

pub const ACHIEVEMENTS: [AchievementSpec; 4] = [
    AchievementSpec {
        id: AchievementId::FirstKill,
        name: "First Kill",
        target: 1,
        reward_coins: 50,
        reward_gems: 0,
    },
    AchievementSpec {
        id: AchievementId::CoinCollector,
        name: "Coin Collector",
        target: 1000,
        reward_coins: 100,
        reward_gems: 0,
    },
    AchievementSpec {
        id: AchievementId::LevelMaster,
        name: "Level Master",
        target: 10,
        reward_coins: 0,
        reward_gems: 5,
    },
    AchievementSpec {
        id: AchievementId::UpgradeExpert,
        name: "Upgrade Expert",
        target: 20,
        reward_coins: 200,
        reward_gems: 10,
    },
];

pub fn achievement_spec(id: AchievementId) -> &'static AchievementSpec {
    ACHIEVEMENTS
        .iter()
        .find(|a| a.id == id)
        .expect("every AchievementId has a spec entry")
}
