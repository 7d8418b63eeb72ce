#![warn(missing_docs)]
//! SOL3000 colony map.
//!
//! A pointy-top hex map with click-to-toggle multi-selection and a merged
//! outline, block-composed buildings with a two-level build menu, timed
//! construction, and a JSON save slot.

pub mod build_menu;
pub mod buildings;
pub mod camera;
pub mod game_state;
pub mod hex_grid;
pub mod math;
pub mod selection;
pub mod showcase;

use bevy::prelude::*;

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum AppState {
    /// Normal play.
    #[default]
    Running,
    /// Debug overlay active (Tab to toggle).
    Debugging,
}
