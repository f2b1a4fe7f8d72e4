//! Wallets, upgrades, commissions and daily rewards
//!
//! Every operation here is atomic over the save document: the balance is
//! checked, debited and the effect applied in one call, or nothing changes
//! at all. Unaffordable or maxed-out requests are refusals, not errors -
//! the UI is expected to grey the button out, but the core re-checks
//! regardless.

use crate::save::SaveDocument;
use crate::tuning::{self, DAILY_MAX_STREAK, UpgradeKind};

/// Result of an upgrade or ship purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Debited and applied; `cost` is what was paid.
    Purchased { cost: u64 },
    /// Balance does not cover the price. Nothing changed.
    InsufficientFunds,
    /// Track is already at its configured maximum. Nothing changed.
    MaxLevel,
    /// Ship is already owned. Nothing changed.
    AlreadyOwned,
}

impl PurchaseOutcome {
    pub fn is_purchased(&self) -> bool {
        matches!(self, PurchaseOutcome::Purchased { .. })
    }
}

/// Cost of raising `kind` from its current level in `doc`.
pub fn next_upgrade_cost(doc: &SaveDocument, kind: UpgradeKind) -> u64 {
    tuning::upgrade_cost(kind, doc.upgrades.level(kind))
}

/// Buy one level of an upgrade track. Accrues the upgrade commission on
/// success.
pub fn purchase_upgrade(doc: &mut SaveDocument, kind: UpgradeKind) -> PurchaseOutcome {
    let track = tuning::upgrade_track(kind);
    let level = doc.upgrades.level(kind);
    if level >= track.max_level {
        return PurchaseOutcome::MaxLevel;
    }

    let cost = tuning::upgrade_cost(kind, level);
    if !doc.wallet.try_spend(tuning::Currency::Coins, cost) {
        return PurchaseOutcome::InsufficientFunds;
    }

    *doc.upgrades.level_mut(kind) += 1;
    doc.commissions.upgrade += tuning::upgrade_commission(cost);
    log::info!(
        "upgrade purchased: {} -> level {} ({cost} coins)",
        kind.as_str(),
        level + 1
    );
    PurchaseOutcome::Purchased { cost }
}

/// Transfer both commission pools to the main balances and zero them.
/// Returns `(coins, gems)` credited; a no-op when both pools are empty.
pub fn claim_commissions(doc: &mut SaveDocument) -> (u64, u64) {
    let coins = doc.commissions.upgrade;
    let gems = doc.commissions.purchase;
    doc.wallet.coins += coins;
    doc.wallet.gems += gems;
    doc.commissions.upgrade = 0;
    doc.commissions.purchase = 0;
    (coins, gems)
}

/// A successful daily-reward claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyClaim {
    pub reward: u64,
    pub streak: u32,
}

/// Claim the daily reward for `today` (a calendar-day index supplied by the
/// caller). At most one claim per day; the streak continues only when the
/// previous claim was exactly the prior day, and is capped.
pub fn claim_daily_reward(doc: &mut SaveDocument, today: i64) -> Option<DailyClaim> {
    if doc.daily_reward.last_claimed_day == Some(today) {
        return None;
    }

    let streak = match doc.daily_reward.last_claimed_day {
        Some(last) if last == today - 1 => (doc.daily_reward.streak + 1).min(DAILY_MAX_STREAK),
        _ => 1,
    };
    let reward = tuning::daily_reward(streak);

    doc.wallet.coins += reward;
    doc.daily_reward.last_claimed_day = Some(today);
    doc.daily_reward.streak = streak;
    doc.daily_reward.total_claims += 1;
    log::info!("daily reward claimed: {reward} coins (streak {streak})");

    Some(DailyClaim { reward, streak })
}
