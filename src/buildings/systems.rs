use bevy::prelude::*;

use super::BuildingsConfig;
use super::catalog::{self, BuildingDef};
use super::entities::{
    BuildingBlock, BuildingVisual, BuildingVisuals, Constructions, Placements,
};
use crate::hex_grid::{HexGrid, HexId};

/// Opacity of the building on `hex` given its construction state.
fn building_alpha(constructions: &Constructions, hex: HexId, cfg: &BuildingsConfig) -> f32 {
    constructions.get(hex).map_or(1.0, |c| {
        cfg.construction_min_alpha + (1.0 - cfg.construction_min_alpha) * c.fraction()
    })
}

/// Spawns, replaces and despawns building visuals to match [`Placements`].
///
/// Keys missing from the catalog draw nothing.
pub fn sync_building_visuals(
    mut commands: Commands,
    grid: Res<HexGrid>,
    cfg: Res<BuildingsConfig>,
    placements: Res<Placements>,
    constructions: Res<Constructions>,
    mut visuals: ResMut<BuildingVisuals>,
    visual_q: Query<&BuildingVisual>,
) {
    // Drop visuals whose placement vanished or changed.
    visuals.map.retain(|&hex, &mut entity| {
        let current = visual_q.get(entity).ok().map(|v| &v.building);
        let keep = current.is_some() && current == placements.get(hex);
        if !keep {
            commands.entity(entity).despawn();
        }
        keep
    });

    for (&hex, key) in placements.iter() {
        if visuals.map.contains_key(&hex) {
            continue;
        }
        let Some(def) = catalog::building(key.as_str()) else {
            debug!("no catalog entry for `{key}`, nothing drawn on {hex}");
            continue;
        };
        let Some(record) = grid.layout.record(hex) else {
            continue;
        };
        let center = grid.layout.world_center(record.hex);
        let alpha = building_alpha(&constructions, hex, &cfg);
        let side = grid.layout.hex_size() * cfg.footprint;
        let entity = spawn_building(&mut commands, def, hex, center, side, alpha, &cfg);
        visuals.map.insert(hex, entity);
    }
}

/// Spawns a building root at `center` with one sprite per block.
///
/// Blocks are stacked in catalog order, later ones drawn on top.
pub fn spawn_building(
    commands: &mut Commands,
    def: &BuildingDef,
    hex: HexId,
    center: Vec2,
    side: f32,
    alpha: f32,
    cfg: &BuildingsConfig,
) -> Entity {
    let cell = Vec2::new(
        side / def.grid.columns.max(1) as f32,
        side / def.grid.rows.max(1) as f32,
    );
    let gap = cell * cfg.block_gap;

    commands
        .spawn((
            BuildingVisual {
                hex,
                building: def.building_key(),
            },
            Name::new(format!("{}({})", def.name, hex.0)),
            Transform::from_translation(center.extend(1.0)),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for (i, block) in def.blocks.iter().enumerate() {
                let rect = block.rect(def.grid, side);
                let base = block.tone.color();
                parent.spawn((
                    BuildingBlock { base },
                    Sprite::from_color(
                        base.with_alpha(alpha),
                        (rect.size() - gap).max(Vec2::ONE),
                    ),
                    Transform::from_translation(rect.center().extend(0.01 * i as f32)),
                ));
            }
        })
        .id()
}

/// Fades building blocks with their construction progress.
pub fn fade_constructions(
    cfg: Res<BuildingsConfig>,
    constructions: Res<Constructions>,
    visual_q: Query<(&BuildingVisual, &Children)>,
    mut block_q: Query<(&BuildingBlock, &mut Sprite)>,
) {
    for (visual, children) in &visual_q {
        let alpha = building_alpha(&constructions, visual.hex, &cfg);
        for child in children.iter() {
            if let Ok((block, mut sprite)) = block_q.get_mut(child) {
                sprite.color = block.base.with_alpha(alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::{BuildingKey, BuildingsPlugin, Construction};
    use crate::hex_grid::{HexGridConfig, HexGridPlugin};

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(HexGridPlugin(HexGridConfig {
                radius: 2,
                headless: true,
                ..default()
            }))
            .add_plugins(BuildingsPlugin(BuildingsConfig {
                headless: true,
                ..default()
            }))
            .add_systems(
                Update,
                (
                    sync_building_visuals.run_if(resource_changed::<Placements>),
                    fade_constructions.run_if(resource_changed::<Constructions>),
                )
                    .chain(),
            );
        app
    }

    fn visual_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&BuildingVisual>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn placement_spawns_one_sprite_per_block() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<Placements>()
            .place(HexId(0), BuildingKey::from_static("habitat"))
            .unwrap();
        app.update();

        let def = catalog::building("habitat").unwrap();
        let blocks = app
            .world_mut()
            .query::<&BuildingBlock>()
            .iter(app.world())
            .count();
        assert_eq!(visual_count(&mut app), 1);
        assert_eq!(blocks, def.blocks.len());
    }

    #[test]
    fn removal_despawns_visual() {
        let mut app = test_app();
        app.world_mut()
            .resource_mut::<Placements>()
            .place(HexId(1), BuildingKey::from_static("refinery"))
            .unwrap();
        app.update();
        app.world_mut().resource_mut::<Placements>().remove(HexId(1));
        app.update();

        assert_eq!(visual_count(&mut app), 0);
        assert!(app.world().resource::<BuildingVisuals>().map.is_empty());
    }

    #[test]
    fn construction_fades_blocks() {
        let mut app = test_app();
        let key = BuildingKey::from_static("solar_array");
        app.world_mut()
            .resource_mut::<Placements>()
            .place(HexId(2), key.clone())
            .unwrap();
        app.world_mut()
            .resource_mut::<Constructions>()
            .insert(HexId(2), Construction::new(key));
        app.update();

        let min_alpha = BuildingsConfig::default().construction_min_alpha;
        for sprite in app
            .world_mut()
            .query::<&Sprite>()
            .iter(app.world())
        {
            assert!((sprite.color.alpha() - min_alpha).abs() < 1e-5);
        }

        app.world_mut().resource_mut::<Constructions>().remove(HexId(2));
        app.update();
        for sprite in app
            .world_mut()
            .query::<&Sprite>()
            .iter(app.world())
        {
            assert!((sprite.color.alpha() - 1.0).abs() < 1e-5);
        }
    }
}
