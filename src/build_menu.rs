//! Build/demolish overlay for the selected hex.
//!
//! Category → building navigation, construction progress, and a demolish
//! confirmation. Build and demolish are only *requested* here; the
//! [`game_state`](crate::game_state) module owns the outcome.

mod entities;
mod systems;

pub use entities::{MenuFocus, MenuState, MenuView, menu_view};

use bevy::prelude::*;

/// Build menu plugin.
pub struct BuildMenuPlugin;

impl Plugin for BuildMenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MenuState>()
            .init_resource::<MenuFocus>()
            .add_systems(Update, systems::refocus_menu)
            .add_systems(bevy_egui::EguiPrimaryContextPass, systems::build_menu_ui);
    }
}
