//! Hex map: grid generation, axial projection, click picking, and the merged
//! outline drawn around the current selection.

mod boundary;
mod entities;
mod layout;
mod systems;

pub use boundary::{BoundarySegment, NEIGHBOR_OFFSETS, boundary_segments, neighbor};
pub use entities::{
    HexCell, HexEntities, HexGrid, HexGridRoot, HexId, HexMaterials, HexRecord, SelectionOutline,
};
pub use layout::HexGridLayout;
pub use systems::spawn_grid;

use bevy::prelude::*;

use crate::AppState;
use crate::selection::Selection;

/// Grid shape, projection and look.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct HexGridConfig {
    /// Number of rings around the origin (`3N² + 3N + 1` cells).
    pub radius: u32,
    /// Hex circumradius in world units.
    pub hex_size: f32,
    /// Center-distance inflation; `1.0` draws touching hexes.
    pub spacing: f32,
    /// Seed for the richness noise field.
    pub richness_noise_seed: u32,
    /// Octaves for the richness noise field.
    pub richness_noise_octaves: usize,
    /// Spatial scale divisor for richness sampling.
    pub richness_noise_scale: f64,
    /// Normalised noise value at or above which a hex is rich.
    pub rich_threshold: f32,
    /// Normalised noise value at or below which a hex is poor.
    pub poor_threshold: f32,
    /// Colour of the selection outline.
    pub outline_color: Color,
    /// Grid data only: no meshes, picking or drawing.
    pub headless: bool,
}

impl Default for HexGridConfig {
    fn default() -> Self {
        Self {
            radius: 8,
            hex_size: 32.0,
            spacing: 1.08,
            richness_noise_seed: 3000,
            richness_noise_octaves: 3,
            richness_noise_scale: 160.0,
            rich_threshold: 0.58,
            poor_threshold: 0.42,
            outline_color: Color::srgb(1.0, 0.85, 0.2),
            headless: false,
        }
    }
}

/// Hex map plugin.
///
/// The grid resource is generated while the plugin is built so that other
/// startup systems can rely on it.
pub struct HexGridPlugin(pub HexGridConfig);

impl Plugin for HexGridPlugin {
    fn build(&self, app: &mut App) {
        let layout = HexGridLayout::from_config(&self.0);
        info!(
            "generated {} hexes (radius {})",
            layout.len(),
            self.0.radius
        );

        app.register_type::<HexGridConfig>()
            .register_type::<HexCell>()
            .register_type::<HexGridRoot>()
            .insert_resource(self.0.clone())
            .insert_resource(HexGrid { layout })
            .init_resource::<HexEntities>()
            .init_resource::<SelectionOutline>();

        if self.0.headless {
            return;
        }

        app.add_systems(Startup, systems::spawn_grid)
            .add_systems(Update, systems::pick_hex)
            .add_systems(
                Update,
                (systems::recolor_hexes, systems::rebuild_outline)
                    .after(systems::pick_hex)
                    .run_if(resource_changed::<Selection>),
            )
            .add_systems(Update, systems::draw_outline.after(systems::rebuild_outline))
            .add_systems(
                bevy_egui::EguiPrimaryContextPass,
                systems::draw_hex_labels.run_if(in_state(AppState::Debugging)),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math;

    #[test]
    fn headless_plugin_inserts_grid_from_config() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(HexGridPlugin(HexGridConfig {
            radius: 3,
            headless: true,
            ..default()
        }));
        app.update();

        assert_eq!(app.world().resource::<HexGrid>().layout.len(), math::hex_count(3));
        assert!(app.world().resource::<HexGridConfig>().headless);
        assert!(app.world().get_resource::<HexMaterials>().is_none());
    }
}
