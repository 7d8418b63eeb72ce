//! Gallery mode: every catalog building on its own hex, one row per category.

use bevy::prelude::*;
use hexx::Hex;

use crate::buildings::{self, BuildingCategory, BuildingDef, Placements};
use crate::hex_grid::{self, HexGrid, HexGridConfig, HexGridLayout};

/// Replaces the generated map with the building gallery.
pub struct ShowcasePlugin;

impl Plugin for ShowcasePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_showcase.before(hex_grid::spawn_grid));
    }
}

/// Gallery slots: category rows top to bottom, buildings left to right with
/// an empty hex between neighbours.
pub fn showcase_hexes() -> Vec<(Hex, &'static BuildingDef)> {
    let mut slots = Vec::new();
    for (row, category) in BuildingCategory::ALL.into_iter().enumerate() {
        let r = 2 * row as i32;
        for (col, def) in buildings::in_category(category).enumerate() {
            // Undo the axial row skew so columns line up vertically.
            let q = 2 * col as i32 - r / 2;
            slots.push((Hex::new(q, r), def));
        }
    }
    slots
}

/// Swaps in the gallery layout, places each building finished, and labels it.
pub fn setup_showcase(
    mut commands: Commands,
    cfg: Res<HexGridConfig>,
    mut grid: ResMut<HexGrid>,
    mut placements: ResMut<Placements>,
) {
    let slots = showcase_hexes();
    grid.layout = HexGridLayout::from_hexes(slots.iter().map(|(h, _)| *h), cfg.hex_size, cfg.spacing);

    for (hex, def) in &slots {
        let Some(id) = grid.layout.id_of(*hex) else {
            continue;
        };
        if let Err(err) = placements.place(id, def.building_key()) {
            warn!("showcase: {err}");
            continue;
        }
        let below = grid.layout.world_center(*hex) - Vec2::Y * cfg.hex_size * 1.25;
        commands.spawn((
            Name::new(format!("Label({})", def.key)),
            Text2d::new(def.name),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(Color::srgb(0.85, 0.88, 0.95)),
            Transform::from_translation(below.extend(2.0)),
        ));
    }

    for (row, category) in BuildingCategory::ALL.into_iter().enumerate() {
        let r = 2 * row as i32;
        let left = grid.layout.world_center(Hex::new(-2 - r / 2, r));
        commands.spawn((
            Name::new(format!("Category({})", category.label())),
            Text2d::new(category.label()),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::srgb(1.0, 0.85, 0.2)),
            Transform::from_translation(left.extend(2.0)),
        ));
    }

    info!("showcase: {} buildings", placements.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::{BuildingsConfig, BuildingsPlugin, CATALOG};
    use crate::hex_grid::HexGridPlugin;
    use bevy::platform::collections::HashSet;

    #[test]
    fn every_building_gets_a_distinct_slot() {
        let slots = showcase_hexes();
        assert_eq!(slots.len(), CATALOG.len());
        let hexes: HashSet<Hex> = slots.iter().map(|(h, _)| *h).collect();
        assert_eq!(hexes.len(), slots.len());
    }

    #[test]
    fn slots_leave_gaps_between_buildings() {
        let slots = showcase_hexes();
        for (i, (a, _)) in slots.iter().enumerate() {
            for (b, _) in &slots[i + 1..] {
                assert!(a.unsigned_distance_to(*b) >= 2, "{a:?} touches {b:?}");
            }
        }
    }

    #[test]
    fn setup_replaces_grid_and_places_catalog() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(HexGridPlugin(HexGridConfig {
                headless: true,
                ..default()
            }))
            .add_plugins(BuildingsPlugin(BuildingsConfig {
                headless: true,
                ..default()
            }))
            .add_systems(Update, setup_showcase);
        app.update();

        let grid = app.world().resource::<HexGrid>();
        let placements = app.world().resource::<Placements>();
        assert_eq!(grid.layout.len(), CATALOG.len());
        assert_eq!(placements.len(), CATALOG.len());
        for (id, key) in placements.iter() {
            assert!(grid.layout.contains_id(*id));
            assert!(buildings::building(key.as_str()).is_some());
        }
    }
}
