//! Ship ownership and selection
//!
//! The catalog itself lives in [`tuning`]; this module applies ownership
//! rules to the save document. Buying a ship debits its price in the
//! listed currency, accrues the purchase commission and selects the new
//! hull, matching the storefront flow.

use crate::economy::PurchaseOutcome;
use crate::save::SaveDocument;
use crate::tuning::{self, ShipClass, ShipSpec};

/// Catalog entry for the currently selected ship.
pub fn selected_spec(doc: &SaveDocument) -> &'static ShipSpec {
    tuning::ship_spec(doc.ships.selected)
}

/// True if the player could afford `class` right now.
pub fn can_afford(doc: &SaveDocument, class: ShipClass) -> bool {
    let spec = tuning::ship_spec(class);
    doc.wallet.balance(spec.currency) >= spec.price
}

/// Buy a ship. Owned ships and short balances are refusals, not errors.
/// A successful purchase selects the ship immediately.
pub fn purchase_ship(doc: &mut SaveDocument, class: ShipClass) -> PurchaseOutcome {
    if doc.ships.is_unlocked(class) {
        return PurchaseOutcome::AlreadyOwned;
    }

    let spec = tuning::ship_spec(class);
    if !doc.wallet.try_spend(spec.currency, spec.price) {
        return PurchaseOutcome::InsufficientFunds;
    }

    doc.ships.unlocked.push(class);
    doc.ships.selected = class;
    doc.commissions.purchase += tuning::purchase_commission(spec.price);
    log::info!("ship purchased: {}", spec.name);
    PurchaseOutcome::Purchased { cost: spec.price }
}

/// Select an owned ship. Selecting an unowned ship is refused and leaves
/// the state unchanged.
pub fn select_ship(doc: &mut SaveDocument, class: ShipClass) -> bool {
    if !doc.ships.is_unlocked(class) {
        return false;
    }
    doc.ships.selected = class;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Currency;

    #[test]
    fn test_purchase_with_exact_balance() {
        let mut doc = SaveDocument::default();
        doc.wallet.coins = 500;

        let outcome = purchase_ship(&mut doc, ShipClass::Fighter);
        assert_eq!(outcome, PurchaseOutcome::Purchased { cost: 500 });
        assert_eq!(doc.wallet.coins, 0);
        assert!(doc.ships.is_unlocked(ShipClass::Fighter));
        assert_eq!(doc.ships.selected, ShipClass::Fighter);
        // floor(500 * 0.05) = 25 into the purchase pool
        assert_eq!(doc.commissions.purchase, 25);
    }

    #[test]
    fn test_purchase_short_balance_is_noop() {
        let mut doc = SaveDocument::default();
        doc.wallet.coins = 499;
        let before = doc.clone();

        assert_eq!(
            purchase_ship(&mut doc, ShipClass::Fighter),
            PurchaseOutcome::InsufficientFunds
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_purchase_gem_priced_ship() {
        let mut doc = SaveDocument::default();
        doc.wallet.gems = 60;

        let outcome = purchase_ship(&mut doc, ShipClass::Legendary);
        assert_eq!(outcome, PurchaseOutcome::Purchased { cost: 50 });
        assert_eq!(doc.wallet.gems, 10);
        assert_eq!(
            tuning::ship_spec(ShipClass::Legendary).currency,
            Currency::Gems
        );
        assert_eq!(doc.commissions.purchase, 2);
    }

    #[test]
    fn test_purchase_owned_ship_is_noop() {
        let mut doc = SaveDocument::default();
        let before = doc.clone();
        assert_eq!(
            purchase_ship(&mut doc, ShipClass::Scout),
            PurchaseOutcome::AlreadyOwned
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_select_requires_ownership() {
        let mut doc = SaveDocument::default();
        assert!(!select_ship(&mut doc, ShipClass::Tank));
        assert_eq!(doc.ships.selected, ShipClass::Scout);

        doc.ships.unlocked.push(ShipClass::Tank);
        assert!(select_ship(&mut doc, ShipClass::Tank));
        assert_eq!(doc.ships.selected, ShipClass::Tank);
    }
}
