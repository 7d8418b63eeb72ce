//! SOL3000 desktop entry point.

use std::path::PathBuf;

use bevy::app::AppExit;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use sol3000::AppState;
use sol3000::build_menu::BuildMenuPlugin;
use sol3000::buildings::{BuildingsConfig, BuildingsPlugin};
use sol3000::camera::{CameraConfig, CameraPlugin};
use sol3000::game_state::{GameStateConfig, GameStatePlugin};
use sol3000::hex_grid::{HexGridConfig, HexGridPlugin};
use sol3000::selection::SelectionPlugin;
use sol3000::showcase::ShowcasePlugin;

/// Command-line options.
#[derive(Debug)]
#[cfg_attr(feature = "native", derive(clap::Parser))]
#[cfg_attr(feature = "native", command(version, about = "SOL3000 colony map"))]
struct Args {
    /// Rings around the centre hex.
    #[cfg_attr(feature = "native", arg(long, default_value_t = 8))]
    radius: u32,
    /// Gap factor between hexes (1.0 = touching).
    #[cfg_attr(feature = "native", arg(long, default_value_t = 1.08, value_parser = positive_spacing))]
    spacing: f32,
    /// Directory holding the save slot.
    #[cfg_attr(feature = "native", arg(long, default_value = "."))]
    save_dir: PathBuf,
    /// Start fresh instead of restoring the save slot.
    #[cfg_attr(feature = "native", arg(long))]
    no_load: bool,
    /// Show every building instead of the playable map.
    #[cfg_attr(feature = "native", arg(long))]
    showcase: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            radius: 8,
            spacing: 1.08,
            save_dir: PathBuf::from("."),
            no_load: false,
            showcase: false,
        }
    }
}

/// Spacing must be finite and above zero or every hex centre collapses.
#[cfg(feature = "native")]
fn positive_spacing(value: &str) -> Result<f32, String> {
    let spacing: f32 = value.parse().map_err(|e| format!("`{value}`: {e}"))?;
    if spacing.is_finite() && spacing > 0.0 {
        Ok(spacing)
    } else {
        Err(format!("spacing must be greater than 0, got {spacing}"))
    }
}

#[cfg(feature = "native")]
fn args() -> Args {
    <Args as clap::Parser>::parse()
}

#[cfg(not(feature = "native"))]
fn args() -> Args {
    Args::default()
}

fn main() {
    let args = args();
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "SOL3000".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<AppState>()
    .init_state::<AppState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(SelectionPlugin)
    .add_plugins(HexGridPlugin(HexGridConfig {
        radius: args.radius,
        spacing: args.spacing,
        ..default()
    }))
    .add_plugins(BuildingsPlugin(BuildingsConfig::default()))
    .add_plugins(CameraPlugin(CameraConfig::default()))
    .add_plugins(GameStatePlugin(GameStateConfig {
        persist: !args.showcase,
        load: !args.no_load,
        save_dir: args.save_dir,
    }))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(AppState::Debugging)));

    if args.showcase {
        app.add_plugins(ShowcasePlugin);
    } else {
        app.add_plugins(BuildMenuPlugin);
    }

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<AppState>>,
    mut next: ResMut<NextState<AppState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        next.set(match state.get() {
            AppState::Running => AppState::Debugging,
            AppState::Debugging => AppState::Running,
        });
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
