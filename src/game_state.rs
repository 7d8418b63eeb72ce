//! Persisted game-state schema and the simulation constants it carries.
//!
//! Owns the building placement lifecycle: consumes [`BuildRequest`] /
//! [`DemolishRequest`] from the build menu, advances construction records on a
//! fixed tick, and mirrors everything into the `sol3000_game_state` storage
//! slot.
//!
//! [`BuildRequest`]: crate::buildings::BuildRequest
//! [`DemolishRequest`]: crate::buildings::DemolishRequest

mod entities;
mod store;
mod systems;

pub use entities::{ConstructionClock, PersistenceState};
pub use store::{
    FileStore, GameStore, MemoryStore, SAVE_VERSION, STORAGE_KEY, SavedBuilding, SavedGame,
    Storage, StoreError,
};

use std::path::PathBuf;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Resource-richness class of a hex.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize,
)]
pub enum Richness {
    /// Above-average deposits.
    Rich,
    /// Baseline deposits.
    #[default]
    Normal,
    /// Below-average deposits.
    Poor,
}

impl Richness {
    /// All classes, richest first.
    pub const ALL: [Richness; 3] = [Richness::Rich, Richness::Normal, Richness::Poor];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Richness::Rich => "Rich",
            Richness::Normal => "Normal",
            Richness::Poor => "Poor",
        }
    }
}

/// Production multiplier per [`Richness`] class.
#[derive(Clone, Copy, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub struct RichnessMultipliers {
    /// Multiplier for [`Richness::Rich`].
    pub rich: f32,
    /// Multiplier for [`Richness::Normal`].
    pub normal: f32,
    /// Multiplier for [`Richness::Poor`].
    pub poor: f32,
}

impl Default for RichnessMultipliers {
    fn default() -> Self {
        Self {
            rich: 1.5,
            normal: 1.0,
            poor: 0.6,
        }
    }
}

impl RichnessMultipliers {
    /// Multiplier for the given class.
    pub fn for_class(&self, richness: Richness) -> f32 {
        match richness {
            Richness::Rich => self.rich,
            Richness::Normal => self.normal,
            Richness::Poor => self.poor,
        }
    }
}

/// Simulation constants stored alongside the placements.
///
/// Nothing in this crate runs an economy; these values are carried so the
/// save slot stays compatible with the simulation that consumes it.
#[derive(Resource, Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation tick length in milliseconds.
    pub tick_interval_ms: u64,
    /// Credits earned per traded unit of metal.
    pub trade_income_per_metal: f32,
    /// Production multipliers by hex richness.
    pub richness: RichnessMultipliers,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            trade_income_per_metal: 0.5,
            richness: RichnessMultipliers::default(),
        }
    }
}

impl GameConfig {
    /// Income from trading `metal` units at the configured rate.
    pub fn trade_income(&self, metal: f32) -> f32 {
        metal * self.trade_income_per_metal
    }

    /// Tick interval as a [`std::time::Duration`]; never zero.
    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

/// Plugin-level settings for persistence.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct GameStateConfig {
    /// Read the slot at startup and write it back on changes / exit.
    pub persist: bool,
    /// Restore the slot at startup; off starts fresh but still saves.
    pub load: bool,
    /// Directory holding `sol3000_game_state.json`.
    pub save_dir: PathBuf,
}

impl Default for GameStateConfig {
    fn default() -> Self {
        Self {
            persist: true,
            load: true,
            save_dir: PathBuf::from("."),
        }
    }
}

/// Game-state plugin: config, persistence, build/demolish handling, construction ticks.
pub struct GameStatePlugin(pub GameStateConfig);

impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        let game_cfg = GameConfig::default();
        app.register_type::<GameConfig>()
            .register_type::<GameStateConfig>()
            .insert_resource(self.0.clone())
            .insert_resource(ConstructionClock::new(&game_cfg))
            .insert_resource(game_cfg)
            .insert_resource(PersistenceState {
                enabled: self.0.persist,
            })
            .insert_resource(Storage(Box::new(FileStore::new(self.0.save_dir.clone()))))
            .add_systems(Startup, systems::load_game)
            .add_systems(
                Update,
                (
                    systems::handle_build_requests,
                    systems::handle_demolish_requests,
                    systems::reset_clock.run_if(resource_changed::<GameConfig>),
                    systems::advance_constructions,
                )
                    .chain(),
            )
            .add_systems(
                PostUpdate,
                systems::save_on_change.run_if(
                    resource_changed::<crate::buildings::Placements>
                        .or(resource_changed::<GameConfig>),
                ),
            )
            .add_systems(Last, systems::save_on_exit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_multipliers_match_schema() {
        let m = RichnessMultipliers::default();
        assert_eq!(m.for_class(Richness::Rich), 1.5);
        assert_eq!(m.for_class(Richness::Normal), 1.0);
        assert_eq!(m.for_class(Richness::Poor), 0.6);
    }

    #[test]
    fn default_tick_is_100ms() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.tick_interval(), std::time::Duration::from_millis(100));
    }

    #[test]
    fn zero_tick_interval_is_clamped() {
        let cfg = GameConfig {
            tick_interval_ms: 0,
            ..default()
        };
        assert_eq!(cfg.tick_interval(), std::time::Duration::from_millis(1));
    }

    #[test]
    fn trade_income_scales_with_metal() {
        let cfg = GameConfig::default();
        assert!((cfg.trade_income(10.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: GameConfig = serde_json::from_str(r#"{"tick_interval_ms": 250}"#).unwrap();
        assert_eq!(cfg.tick_interval_ms, 250);
        assert_eq!(cfg.richness, RichnessMultipliers::default());
    }
}
