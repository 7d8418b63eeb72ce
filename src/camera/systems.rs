use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::CameraConfig;
use super::entities::{MapCamera, ViewTransform};
use crate::hex_grid::HexGrid;
use crate::math;

/// World-space camera shift for a mouse drag of `motion` screen pixels.
///
/// The map follows the cursor, so the camera moves the opposite way; screen
/// y grows downward while world y grows upward.
pub fn pan_offset(motion: Vec2, scale: f32) -> Vec2 {
    Vec2::new(-motion.x, motion.y) * scale
}

/// New projection scale after scrolling `notches` (positive = zoom in).
pub fn wheel_scale(scale: f32, notches: f32, cfg: &CameraConfig) -> f32 {
    (scale * cfg.zoom_step.powf(-notches)).clamp(cfg.min_zoom, cfg.max_zoom)
}

/// Camera position after zooming from `old_scale` to `new_scale` with the
/// cursor at `cursor` in a `viewport`-sized view. Without a cursor the view
/// zooms about its centre.
pub fn zoom_at_cursor(
    camera: Vec2,
    cursor: Option<Vec2>,
    viewport: Vec2,
    old_scale: f32,
    new_scale: f32,
) -> Vec2 {
    let anchor = cursor.map_or(camera, |c| {
        math::viewport_to_world(c, viewport, camera, old_scale)
    });
    math::zoom_about(camera, anchor, old_scale, new_scale)
}

fn ortho_scale(projection: &Projection) -> f32 {
    match projection {
        Projection::Orthographic(ortho) => ortho.scale,
        _ => 1.0,
    }
}

fn pointer_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.is_pointer_over_area() || ctx.wants_pointer_input())
}

/// Spawns the 2D camera centred on the grid.
pub fn spawn_camera(mut commands: Commands, grid: Res<HexGrid>, mut view: ResMut<ViewTransform>) {
    let center = grid.layout.bounds().center();
    view.translation = center;
    view.scale = 1.0;
    commands.spawn((
        Name::new("MapCamera"),
        MapCamera,
        Camera2d,
        Transform::from_translation(center.extend(0.0)),
    ));
}

/// Right or middle drag pans the map.
pub fn pan_camera(
    mouse: Res<ButtonInput<MouseButton>>,
    mut motion: MessageReader<MouseMotion>,
    mut contexts: EguiContexts,
    mut camera_q: Query<(&mut Transform, &Projection), With<MapCamera>>,
) {
    let delta: Vec2 = motion.read().map(|m| m.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }
    if !mouse.any_pressed([MouseButton::Right, MouseButton::Middle]) {
        return;
    }
    if pointer_over_ui(&mut contexts) {
        return;
    }
    let Ok((mut transform, projection)) = camera_q.single_mut() else {
        return;
    };
    let offset = pan_offset(delta, ortho_scale(projection));
    transform.translation += offset.extend(0.0);
}

/// Scroll zooms, keeping the world point under the cursor fixed.
///
/// The anchor is derived from this frame's `Transform` so a pan applied
/// earlier in the frame is taken into account.
pub fn zoom_camera(
    mut wheel: MessageReader<MouseWheel>,
    cfg: Res<CameraConfig>,
    mut contexts: EguiContexts,
    window_q: Query<&Window, With<PrimaryWindow>>,
    mut camera_q: Query<(&mut Transform, &mut Projection), With<MapCamera>>,
) {
    let notches: f32 = wheel
        .read()
        .map(|w| match w.unit {
            MouseScrollUnit::Line => w.y,
            MouseScrollUnit::Pixel => w.y / cfg.pixels_per_notch,
        })
        .sum();
    if notches == 0.0 || pointer_over_ui(&mut contexts) {
        return;
    }
    let Ok((mut transform, mut projection)) = camera_q.single_mut() else {
        return;
    };
    let Projection::Orthographic(ortho) = &mut *projection else {
        return;
    };

    let old_scale = ortho.scale;
    let new_scale = wheel_scale(old_scale, notches, &cfg);
    if new_scale == old_scale {
        return;
    }

    let window = window_q.single().ok();
    let cursor = window.and_then(|w| w.cursor_position());
    let viewport = window.map_or(Vec2::ZERO, |w| w.size());

    ortho.scale = new_scale;
    let moved = zoom_at_cursor(
        transform.translation.truncate(),
        cursor,
        viewport,
        old_scale,
        new_scale,
    );
    transform.translation = moved.extend(transform.translation.z);
}

/// Copies the camera's pan and zoom into [`ViewTransform`].
pub fn mirror_view_transform(
    camera_q: Query<(&Transform, &Projection), With<MapCamera>>,
    mut view: ResMut<ViewTransform>,
) {
    let Ok((transform, projection)) = camera_q.single() else {
        return;
    };
    let next = ViewTransform {
        translation: transform.translation.truncate(),
        scale: ortho_scale(projection),
    };
    if *view != next {
        *view = next;
    }
}
