use bevy::prelude::*;

use super::GameConfig;

/// Fixed-rate clock driving construction progress.
#[derive(Resource)]
pub struct ConstructionClock(pub Timer);

impl ConstructionClock {
    /// Repeating timer at the config's tick interval.
    pub fn new(cfg: &GameConfig) -> Self {
        Self(Timer::new(cfg.tick_interval(), TimerMode::Repeating))
    }
}

/// Whether the storage slot may be written this session.
///
/// Cleared when the slot could not be parsed at startup, so a corrupt save is
/// left on disk untouched instead of being overwritten with defaults.
#[derive(Resource, Debug)]
pub struct PersistenceState {
    /// Writes are allowed.
    pub enabled: bool,
}
