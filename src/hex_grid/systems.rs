use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContexts, egui};

use super::HexGridConfig;
use super::boundary::boundary_segments;
use super::entities::{
    HexCell, HexEntities, HexGrid, HexGridRoot, HexMaterials, SelectionOutline,
};
use crate::camera::MapCamera;
use crate::game_state::Richness;
use crate::selection::{Selection, SelectionChanged};

// ── Startup ─────────────────────────────────────────────────────────

fn richness_fill(richness: Richness) -> Color {
    match richness {
        Richness::Rich => Color::srgb(0.16, 0.30, 0.22),
        Richness::Normal => Color::srgb(0.12, 0.16, 0.22),
        Richness::Poor => Color::srgb(0.20, 0.14, 0.14),
    }
}

/// Spawns one hexagon mesh per cell under a [`HexGridRoot`].
pub fn spawn_grid(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    grid: Res<HexGrid>,
    mut hex_entities: ResMut<HexEntities>,
) {
    let by_richness: HashMap<Richness, Handle<ColorMaterial>> = Richness::ALL
        .into_iter()
        .map(|r| (r, materials.add(richness_fill(r))))
        .collect();
    let hex_materials = HexMaterials {
        by_richness,
        selected: materials.add(Color::srgb(0.32, 0.36, 0.18)),
    };

    // RegularPolygon starts at +Y, which is the pointy-top orientation.
    let hex_mesh = meshes.add(RegularPolygon::new(grid.layout.hex_size(), 6));

    let root = commands
        .spawn((
            Name::new("HexGrid"),
            HexGridRoot,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    for record in grid.layout.records() {
        let center = grid.layout.world_center(record.hex);
        let entity = commands
            .spawn((
                HexCell {
                    id: record.id,
                    hex: record.hex,
                },
                Name::new(format!("Hex({},{})", record.hex.x, record.hex.y)),
                Mesh2d(hex_mesh.clone()),
                MeshMaterial2d(hex_materials.fill(record.richness, false)),
                Transform::from_translation(center.extend(0.0)),
            ))
            .id();
        commands.entity(root).add_child(entity);
        hex_entities.map.insert(record.id, entity);
    }

    commands.insert_resource(hex_materials);
}

// ── Update: picking ────────────────────────────────────────────────

/// Left click toggles the hex under the cursor; clicking off the map clears.
pub fn pick_hex(
    mouse: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    window_q: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
    grid: Res<HexGrid>,
    mut selection: ResMut<Selection>,
    mut changed: MessageWriter<SelectionChanged>,
) -> Result {
    if !mouse.just_pressed(MouseButton::Left) {
        return Ok(());
    }
    if contexts.ctx_mut().is_ok_and(|ctx| ctx.is_pointer_over_area()) {
        return Ok(());
    }
    let Ok(window) = window_q.single() else {
        return Ok(());
    };
    let Some(cursor) = window.cursor_position() else {
        return Ok(());
    };
    let (camera, cam_gt) = camera_q.single()?;
    let Ok(world) = camera.viewport_to_world_2d(cam_gt, cursor) else {
        return Ok(());
    };

    let clicked = grid.layout.hex_at_world(world);
    if let Some(message) = selection.bypass_change_detection().click(clicked) {
        selection.set_changed();
        debug!("selection now {} hexes", message.selected.len());
        changed.write(message);
    }
    Ok(())
}

// ── Update: selection visuals ──────────────────────────────────────

/// Swaps face materials to reflect the selection.
pub fn recolor_hexes(
    selection: Res<Selection>,
    grid: Res<HexGrid>,
    hex_materials: Option<Res<HexMaterials>>,
    mut cells: Query<(&HexCell, &mut MeshMaterial2d<ColorMaterial>)>,
) {
    let Some(hex_materials) = hex_materials else {
        return;
    };
    for (cell, mut material) in &mut cells {
        let Some(record) = grid.layout.record(cell.id) else {
            continue;
        };
        let fill = hex_materials.fill(record.richness, selection.contains(cell.id));
        if material.0 != fill {
            material.0 = fill;
        }
    }
}

/// Recomputes [`SelectionOutline`] from the selection.
pub fn rebuild_outline(
    selection: Res<Selection>,
    grid: Res<HexGrid>,
    mut outline: ResMut<SelectionOutline>,
) {
    outline.segments = boundary_segments(&grid.layout, selection.ids());
}

/// Draws the merged selection outline.
pub fn draw_outline(mut gizmos: Gizmos, outline: Res<SelectionOutline>, cfg: Res<HexGridConfig>) {
    for seg in &outline.segments {
        gizmos.line_2d(seg.from, seg.to, cfg.outline_color);
    }
}

// ── Debug ──────────────────────────────────────────────────────────

/// Draws each cell's id and axial coordinates as an egui label.
pub fn draw_hex_labels(
    mut contexts: EguiContexts,
    camera_q: Query<(&Camera, &GlobalTransform), With<MapCamera>>,
    hexes: Query<(&GlobalTransform, &HexCell)>,
) -> Result {
    let Ok((camera, cam_gt)) = camera_q.single() else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;
    let painter = ctx.layer_painter(egui::LayerId::background());

    for (hex_gt, cell) in &hexes {
        if let Ok(viewport) = camera.world_to_viewport(cam_gt, hex_gt.translation()) {
            painter.text(
                egui::pos2(viewport.x, viewport.y),
                egui::Align2::CENTER_CENTER,
                format!("{}\n{},{}", cell.id.0, cell.hex.x, cell.hex.y),
                egui::FontId::proportional(10.0),
                egui::Color32::WHITE,
            );
        }
    }
    Ok(())
}
