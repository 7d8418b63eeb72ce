use bevy::prelude::*;

/// Marker for the camera looking at the hex map.
#[derive(Component, Reflect)]
pub struct MapCamera;

/// Current pan and zoom of the map view.
///
/// Mirrors the camera each frame so UI and saves can read the view without
/// querying the camera entity.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct ViewTransform {
    /// World position at the centre of the viewport.
    pub translation: Vec2,
    /// Orthographic scale; >1 shows more of the map.
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            scale: 1.0,
        }
    }
}
