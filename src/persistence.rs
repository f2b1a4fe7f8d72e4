//! Save/load persistence
//!
//! The storage backend is a seam: the host supplies whatever keyed string
//! store it has (browser LocalStorage, a file, a test buffer) and the
//! progression store funnels the versioned JSON envelope through it.
//! Loading never fails - corrupt or missing payloads fall back to the
//! default document and the game starts anyway.

use crate::audio::{SoundEvent, SoundSink};
use crate::economy::{self, DailyClaim, PurchaseOutcome};
use crate::save::SaveDocument;
use crate::ships;
use crate::tuning::{ShipClass, UpgradeKind};

/// Fixed key under which keyed backends should file the save payload.
pub const SAVE_KEY: &str = "galaxy_strike_save";

/// Interval between periodic autosaves (wall-clock milliseconds).
pub const AUTOSAVE_INTERVAL_MS: u64 = 30_000;

/// Persistence sink supplied by the host.
pub trait StorageBackend {
    /// Fetch the previously saved payload, if any.
    fn load(&self) -> Option<String>;
    /// Store the payload. Returns false on failure; the caller logs and
    /// carries on.
    fn save(&mut self, payload: &str) -> bool;
}

/// In-memory backend for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    payload: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pre-seeded with a payload, as if a previous run had saved.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> Option<String> {
        self.payload.clone()
    }

    fn save(&mut self, payload: &str) -> bool {
        self.payload = Some(payload.to_string());
        true
    }
}

/// Owner of the save document and the only writer of persisted state.
///
/// Gameplay reads the document freely; mutations go through the store's
/// operations (or through [`ProgressionStore::document_mut`] at level
/// boundaries) so that each save is a consistent full-document snapshot.
pub struct ProgressionStore<B: StorageBackend> {
    backend: B,
    doc: SaveDocument,
    last_save_ms: Option<u64>,
}

impl<B: StorageBackend> ProgressionStore<B> {
    /// Load the document from the backend, migrating or defaulting as
    /// needed. Never fails.
    pub fn load(backend: B) -> Self {
        let doc = match backend.load() {
            Some(payload) => SaveDocument::from_json(&payload),
            None => {
                log::info!("no save found, starting fresh");
                SaveDocument::default()
            }
        };
        Self {
            backend,
            doc,
            last_save_ms: None,
        }
    }

    pub fn document(&self) -> &SaveDocument {
        &self.doc
    }

    /// Direct mutable access for level-boundary writes (the session
    /// controller folding a finished run into the document).
    pub fn document_mut(&mut self) -> &mut SaveDocument {
        &mut self.doc
    }

    /// Write the current document through the backend. Failures are logged,
    /// not propagated: the in-memory state stays authoritative.
    pub fn save(&mut self) -> bool {
        let payload = match self.doc.to_json() {
            Ok(payload) => payload,
            Err(err) => {
                log::error!("could not encode save document: {err}");
                return false;
            }
        };
        let ok = self.backend.save(&payload);
        if !ok {
            log::error!("storage backend rejected save");
        }
        ok
    }

    /// Wipe all progress back to a fresh default document and persist it.
    pub fn reset(&mut self) {
        log::info!("resetting save document");
        self.doc = SaveDocument::default();
        self.save();
    }

    /// Periodic autosave driven by the host's wall clock. Saves when the
    /// interval has elapsed since the last write through this method;
    /// boundary saves may interleave and simply win by writing later.
    pub fn autosave(&mut self, now_ms: u64) -> bool {
        let due = match self.last_save_ms {
            Some(last) => now_ms.saturating_sub(last) >= AUTOSAVE_INTERVAL_MS,
            None => true,
        };
        if !due {
            return false;
        }
        self.last_save_ms = Some(now_ms);
        self.save()
    }

    // === Storefront operations ===
    //
    // Each wraps the pure document operation with persistence and the
    // purchase sound trigger.

    pub fn purchase_upgrade(
        &mut self,
        kind: UpgradeKind,
        audio: &mut impl SoundSink,
    ) -> PurchaseOutcome {
        let outcome = economy::purchase_upgrade(&mut self.doc, kind);
        if outcome.is_purchased() {
            self.doc.refresh_achievements();
            audio.play(SoundEvent::Upgrade);
            self.save();
        }
        outcome
    }

    pub fn purchase_ship(
        &mut self,
        class: ShipClass,
        audio: &mut impl SoundSink,
    ) -> PurchaseOutcome {
        let outcome = ships::purchase_ship(&mut self.doc, class);
        if outcome.is_purchased() {
            audio.play(SoundEvent::Upgrade);
            self.save();
        }
        outcome
    }

    pub fn select_ship(&mut self, class: ShipClass) -> bool {
        let selected = ships::select_ship(&mut self.doc, class);
        if selected {
            self.save();
        }
        selected
    }

    pub fn claim_commissions(&mut self, audio: &mut impl SoundSink) -> (u64, u64) {
        let (coins, gems) = economy::claim_commissions(&mut self.doc);
        if coins > 0 || gems > 0 {
            audio.play(SoundEvent::Coin);
            self.save();
        }
        (coins, gems)
    }

    pub fn claim_daily_reward(
        &mut self,
        today: i64,
        audio: &mut impl SoundSink,
    ) -> Option<DailyClaim> {
        let claim = economy::claim_daily_reward(&mut self.doc, today);
        if claim.is_some() {
            audio.play(SoundEvent::Coin);
            self.save();
        }
        claim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;

    #[test]
    fn test_load_missing_starts_fresh() {
        let store = ProgressionStore::load(MemoryBackend::new());
        assert_eq!(*store.document(), SaveDocument::default());
    }

    #[test]
    fn test_load_corrupt_starts_fresh() {
        let store = ProgressionStore::load(MemoryBackend::with_payload("%%%"));
        assert_eq!(*store.document(), SaveDocument::default());
    }

    #[test]
    fn test_save_then_reload_round_trips() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        store.document_mut().wallet.coins = 4321;
        assert!(store.save());

        let reloaded = ProgressionStore::load(store.backend.clone());
        assert_eq!(reloaded.document().wallet.coins, 4321);
    }

    #[test]
    fn test_reset_wipes_progress() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        store.document_mut().wallet.coins = 99_999;
        store.reset();
        assert_eq!(*store.document(), SaveDocument::default());

        let reloaded = ProgressionStore::load(store.backend.clone());
        assert_eq!(*reloaded.document(), SaveDocument::default());
    }

    #[test]
    fn test_autosave_respects_interval() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        assert!(store.autosave(1_000));
        assert!(!store.autosave(1_000 + AUTOSAVE_INTERVAL_MS - 1));
        assert!(store.autosave(1_000 + AUTOSAVE_INTERVAL_MS));
    }

    #[test]
    fn test_storefront_purchase_persists_and_sounds() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        let mut audio = RecordingSink::default();

        let outcome = store.purchase_upgrade(UpgradeKind::Weapon, &mut audio);
        assert!(outcome.is_purchased());
        assert_eq!(audio.events, vec![SoundEvent::Upgrade]);

        let reloaded = ProgressionStore::load(store.backend.clone());
        assert_eq!(reloaded.document().upgrades.weapon, 2);
    }

    #[test]
    fn test_storefront_refusal_is_silent() {
        let mut store = ProgressionStore::load(MemoryBackend::new());
        store.document_mut().wallet.coins = 0;
        let mut audio = RecordingSink::default();

        let outcome = store.purchase_upgrade(UpgradeKind::Weapon, &mut audio);
        assert_eq!(outcome, PurchaseOutcome::InsufficientFunds);
        assert!(audio.events.is_empty());
    }
}
