//! Sound trigger sink
//!
//! The core announces audible moments through a fire-and-forget sink; it
//! never waits on playback and never treats a silent sink as an error.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    /// Player fired a shot
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Player took damage
    Hit,
    /// Currency collected or claimed
    Coin,
    /// Upgrade or ship purchase completed
    Upgrade,
    /// Level cleared
    Victory,
    /// Player destroyed, run over
    GameOver,
}

/// Receiver for sound triggers. Implementations are expected to return
/// quickly; the simulation calls this from inside the tick.
pub trait SoundSink {
    fn play(&mut self, event: SoundEvent);
}

/// Sink that discards every event. Useful for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn play(&mut self, _event: SoundEvent) {}
}

/// Sink that records every event in order. Useful for tests and replays.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<SoundEvent>,
}

impl SoundSink for RecordingSink {
    fn play(&mut self, event: SoundEvent) {
        self.events.push(event);
    }
}
