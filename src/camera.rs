//! Orthographic map camera with drag-pan and cursor-anchored zoom.

mod entities;
mod systems;

pub use entities::{MapCamera, ViewTransform};
pub use systems::{pan_offset, wheel_scale, zoom_at_cursor};

use bevy::prelude::*;

/// Camera tuning.
#[derive(Resource, Clone, Debug, Reflect)]
#[reflect(Resource)]
pub struct CameraConfig {
    /// Scale multiplier per wheel notch.
    pub zoom_step: f32,
    /// Smallest projection scale (most zoomed in).
    pub min_zoom: f32,
    /// Largest projection scale (most zoomed out).
    pub max_zoom: f32,
    /// Pixel-unit wheel deltas per notch (touchpads).
    pub pixels_per_notch: f32,
    /// Clear colour behind the map.
    pub background: Color,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.1,
            min_zoom: 0.25,
            max_zoom: 4.0,
            pixels_per_notch: 100.0,
            background: Color::srgb(0.03, 0.03, 0.06),
        }
    }
}

/// Camera plugin.
pub struct CameraPlugin(pub CameraConfig);

impl Default for CameraPlugin {
    fn default() -> Self {
        Self(CameraConfig::default())
    }
}

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.0.clone())
            .insert_resource(ClearColor(self.0.background))
            .init_resource::<ViewTransform>()
            .register_type::<CameraConfig>()
            .register_type::<ViewTransform>()
            // Grid layout is final once Startup has run.
            .add_systems(PostStartup, systems::spawn_camera)
            .add_systems(
                Update,
                (
                    systems::pan_camera,
                    systems::zoom_camera,
                    systems::mirror_view_transform,
                )
                    .chain(),
            );
    }
}
