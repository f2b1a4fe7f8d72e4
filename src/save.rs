//! Versioned save document
//!
//! The single JSON envelope that survives between play sessions. The
//! document is owned by the progression store; the simulation reads and
//! writes it only at level boundaries, never mid-tick.
//!
//! Loading never fails: older versions are migrated field-by-field with
//! defaults filling the gaps, newer versions and unparseable payloads fall
//! back to a fresh default document. Startup is never blocked by a bad save.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tuning::{
    self, AchievementId, Currency, LEVEL_COUNT, START_COINS, START_GEMS, ShipClass, UpgradeKind,
};

/// Current save format version.
pub const SAVE_VERSION: u32 = 2;

/// Currency balances. Both are unsigned: the economy never overdraws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wallet {
    pub coins: u64,
    pub gems: u64,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            coins: START_COINS,
            gems: START_GEMS,
        }
    }
}

impl Wallet {
    pub fn balance(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Coins => self.coins,
            Currency::Gems => self.gems,
        }
    }

    pub fn credit(&mut self, currency: Currency, amount: u64) {
        match currency {
            Currency::Coins => self.coins += amount,
            Currency::Gems => self.gems += amount,
        }
    }

    /// Debit if the balance covers it. Returns false (and changes nothing)
    /// otherwise.
    pub fn try_spend(&mut self, currency: Currency, amount: u64) -> bool {
        let balance = match currency {
            Currency::Coins => &mut self.coins,
            Currency::Gems => &mut self.gems,
        };
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }
}

/// Campaign progress and lifetime statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressState {
    pub current_level: u32,
    /// Highest level reachable. Monotonic: victory may raise it, nothing
    /// lowers it.
    pub unlocked_levels: u32,
    /// Best star rating per cleared level.
    pub stars: BTreeMap<u32, u8>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            current_level: 1,
            unlocked_levels: 1,
            stars: BTreeMap::new(),
        }
    }
}

impl ProgressState {
    /// Record a star rating, keeping the best result for the level.
    pub fn record_stars(&mut self, level: u32, stars: u8) {
        let entry = self.stars.entry(level).or_insert(0);
        *entry = (*entry).max(stars.min(3));
    }

    /// Highest level ever cleared (0 if none).
    pub fn highest_cleared(&self) -> u32 {
        self.stars.keys().max().copied().unwrap_or(0)
    }
}

/// Ship ownership and selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipState {
    pub unlocked: Vec<ShipClass>,
    pub selected: ShipClass,
}

impl Default for ShipState {
    fn default() -> Self {
        Self {
            unlocked: vec![ShipClass::Scout],
            selected: ShipClass::Scout,
        }
    }
}

impl ShipState {
    pub fn is_unlocked(&self, class: ShipClass) -> bool {
        self.unlocked.contains(&class)
    }
}

/// Current level per upgrade track. Levels start at 1 (no bonus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeLevels {
    pub weapon: u32,
    pub fire_rate: u32,
    pub shield: u32,
    pub health: u32,
}

impl Default for UpgradeLevels {
    fn default() -> Self {
        Self {
            weapon: 1,
            fire_rate: 1,
            shield: 1,
            health: 1,
        }
    }
}

impl UpgradeLevels {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Weapon => self.weapon,
            UpgradeKind::FireRate => self.fire_rate,
            UpgradeKind::Shield => self.shield,
            UpgradeKind::Health => self.health,
        }
    }

    pub fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Weapon => &mut self.weapon,
            UpgradeKind::FireRate => &mut self.fire_rate,
            UpgradeKind::Shield => &mut self.shield,
            UpgradeKind::Health => &mut self.health,
        }
    }

    /// Sum across all tracks (drives the upgrade-expert achievement).
    pub fn total(&self) -> u64 {
        (self.weapon + self.fire_rate + self.shield + self.health) as u64
    }
}

/// Progress toward one achievement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementProgress {
    pub progress: u64,
    pub unlocked: bool,
}

fn default_achievements() -> BTreeMap<AchievementId, AchievementProgress> {
    AchievementId::ALL
        .into_iter()
        .map(|id| (id, AchievementProgress::default()))
        .collect()
}

/// Daily reward bookkeeping. Days are calendar-day indices supplied by the
/// caller (the core has no clock of its own).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyRewardState {
    pub last_claimed_day: Option<i64>,
    pub streak: u32,
    pub total_claims: u32,
}

/// Claimable commission pools. The upgrade pool pays out in coins, the
/// purchase pool in gems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commissions {
    pub upgrade: u64,
    pub purchase: u64,
}

/// Lifetime statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub kills: u64,
    pub shots_fired: u64,
    pub deaths: u64,
    pub coins_collected: u64,
    pub gems_collected: u64,
    pub play_time_ms: u64,
}

/// The whole persisted state, one versioned envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveDocument {
    pub version: u32,
    pub wallet: Wallet,
    pub progress: ProgressState,
    pub ships: ShipState,
    pub upgrades: UpgradeLevels,
    #[serde(default = "default_achievements")]
    pub achievements: BTreeMap<AchievementId, AchievementProgress>,
    pub daily_reward: DailyRewardState,
    pub commissions: Commissions,
    pub statistics: Statistics,
}

impl Default for SaveDocument {
    fn default() -> Self {
        Self {
            version: SAVE_VERSION,
            wallet: Wallet::default(),
            progress: ProgressState::default(),
            ships: ShipState::default(),
            upgrades: UpgradeLevels::default(),
            achievements: default_achievements(),
            daily_reward: DailyRewardState::default(),
            commissions: Commissions::default(),
            statistics: Statistics::default(),
        }
    }
}

impl SaveDocument {
    /// Serialize for the storage backend.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored payload, migrating or substituting defaults as needed.
    /// Never fails; problems are logged and startup continues.
    pub fn from_json(payload: &str) -> Self {
        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("save document unreadable ({err}), starting fresh");
                return Self::default();
            }
        };
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Self {
        let version = value
            .get("version")
            .and_then(Value::as_u64)
            .unwrap_or(1) as u32;

        let mut doc = if version > SAVE_VERSION {
            log::warn!(
                "save document is from a newer version ({version} > {SAVE_VERSION}), starting fresh"
            );
            Self::default()
        } else if version < SAVE_VERSION {
            log::info!("migrating save document from version {version}");
            Self::migrate_legacy(&value)
        } else {
            match serde_json::from_value::<SaveDocument>(value) {
                Ok(doc) => doc,
                Err(err) => {
                    log::warn!("save document malformed ({err}), starting fresh");
                    Self::default()
                }
            }
        };

        doc.sanitize();
        doc
    }

    /// Field-by-field migration from the flat version-1 layout. Anything
    /// the old document does not carry keeps its default.
    fn migrate_legacy(value: &Value) -> Self {
        let mut doc = Self::default();

        if let Some(coins) = value.get("coins").and_then(Value::as_u64) {
            doc.wallet.coins = coins;
        }
        if let Some(gems) = value.get("gems").and_then(Value::as_u64) {
            doc.wallet.gems = gems;
        }
        if let Some(level) = value.get("currentLevel").and_then(Value::as_u64) {
            doc.progress.current_level = level as u32;
        }
        if let Some(unlocked) = value.get("unlockedLevels").and_then(Value::as_u64) {
            doc.progress.unlocked_levels = unlocked as u32;
        }

        if let Some(upgrades) = value.get("upgrades") {
            let legacy = [
                (UpgradeKind::Weapon, "weapon"),
                (UpgradeKind::FireRate, "fireRate"),
                (UpgradeKind::Shield, "shield"),
                (UpgradeKind::Health, "health"),
            ];
            for (kind, key) in legacy {
                if let Some(level) = upgrades.get(key).and_then(Value::as_u64) {
                    *doc.upgrades.level_mut(kind) = level as u32;
                }
            }
        }

        if let Some(ships) = value.get("ships") {
            if let Some(unlocked) = ships.get("unlocked").and_then(Value::as_array) {
                let parsed: Vec<ShipClass> = unlocked
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(ShipClass::from_str)
                    .collect();
                if !parsed.is_empty() {
                    doc.ships.unlocked = parsed;
                }
            }
            if let Some(selected) = ships
                .get("selected")
                .and_then(Value::as_str)
                .and_then(ShipClass::from_str)
            {
                doc.ships.selected = selected;
            }
        }

        if let Some(commissions) = value.get("commissions") {
            if let Some(upgrade) = commissions.get("upgrade").and_then(Value::as_u64) {
                doc.commissions.upgrade = upgrade;
            }
            if let Some(purchase) = commissions.get("purchase").and_then(Value::as_u64) {
                doc.commissions.purchase = purchase;
            }
        }

        if let Some(achievements) = value.get("achievements").and_then(Value::as_object) {
            let legacy = [
                (AchievementId::FirstKill, "first_kill"),
                (AchievementId::CoinCollector, "coin_collector"),
                (AchievementId::LevelMaster, "level_master"),
                (AchievementId::UpgradeExpert, "upgrade_expert"),
            ];
            for (id, key) in legacy {
                if let Some(entry) = achievements.get(key) {
                    let progress = entry.get("progress").and_then(Value::as_u64).unwrap_or(0);
                    let unlocked = entry
                        .get("unlocked")
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    doc.achievements
                        .insert(id, AchievementProgress { progress, unlocked });
                }
            }
        }

        // v1 stored the daily-reward claim as a locale date string; it does
        // not map onto day indices, so the streak starts over.

        doc
    }

    /// Re-establish document invariants after any load path.
    fn sanitize(&mut self) {
        self.version = SAVE_VERSION;
        self.progress.current_level = self.progress.current_level.clamp(1, LEVEL_COUNT);
        self.progress.unlocked_levels = self.progress.unlocked_levels.clamp(1, LEVEL_COUNT);

        if !self.ships.unlocked.contains(&ShipClass::Scout) {
            self.ships.unlocked.insert(0, ShipClass::Scout);
        }
        if !self.ships.is_unlocked(self.ships.selected) {
            self.ships.selected = ShipClass::Scout;
        }

        for kind in UpgradeKind::ALL {
            let max = tuning::upgrade_track(kind).max_level;
            let level = self.upgrades.level_mut(kind);
            *level = (*level).clamp(1, max);
        }

        for id in AchievementId::ALL {
            self.achievements.entry(id).or_default();
        }
    }

    /// Recompute achievement progress from the document and unlock anything
    /// that crossed its target, paying the reward exactly once. Returns the
    /// newly unlocked achievements.
    pub fn refresh_achievements(&mut self) -> Vec<AchievementId> {
        let mut unlocked_now = Vec::new();
        for spec in &tuning::ACHIEVEMENTS {
            let progress = match spec.id {
                AchievementId::FirstKill => self.statistics.kills,
                AchievementId::CoinCollector => self.statistics.coins_collected,
                AchievementId::LevelMaster => self.progress.highest_cleared() as u64,
                AchievementId::UpgradeExpert => self.upgrades.total(),
            };

            let entry = self.achievements.entry(spec.id).or_default();
            entry.progress = progress;
            if !entry.unlocked && progress >= spec.target {
                entry.unlocked = true;
                self.wallet.coins += spec.reward_coins;
                self.wallet.gems += spec.reward_gems;
                log::info!("achievement unlocked: {}", spec.name);
                unlocked_now.push(spec.id);
            }
        }
        unlocked_now
    }
}
