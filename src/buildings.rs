//! Building catalog, placements, construction records, and the block-composed
//! building visuals drawn on top of hexes.

mod catalog;
mod entities;
mod systems;

pub use catalog::{
    Block, BlockTone, BuildingCategory, BuildingDef, BuildingKey, CATALOG, GridStyle, building,
    in_category,
};
pub use entities::{
    BuildRequest, BuildingBlock, BuildingVisual, BuildingVisuals, Construction, Constructions,
    DemolishRequest, PlacementError, Placements,
};

use bevy::prelude::*;

/// Visual settings for buildings.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct BuildingsConfig {
    /// Side of the block square as a fraction of the hex circumradius.
    pub footprint: f32,
    /// Gap between adjacent blocks, as a fraction of a block cell.
    pub block_gap: f32,
    /// Opacity of a construction at 0 %.
    pub construction_min_alpha: f32,
    /// Data and messages only, no visuals.
    pub headless: bool,
}

impl Default for BuildingsConfig {
    fn default() -> Self {
        Self {
            footprint: 1.15,
            block_gap: 0.08,
            construction_min_alpha: 0.25,
            headless: false,
        }
    }
}

/// Buildings plugin.
pub struct BuildingsPlugin(pub BuildingsConfig);

impl Plugin for BuildingsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BuildingsConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<Placements>()
            .init_resource::<Constructions>()
            .init_resource::<BuildingVisuals>()
            .add_message::<BuildRequest>()
            .add_message::<DemolishRequest>();

        if self.0.headless {
            return;
        }

        app.add_systems(
            PostUpdate,
            (
                systems::sync_building_visuals.run_if(resource_changed::<Placements>),
                systems::fade_constructions.run_if(resource_changed::<Constructions>),
            )
                .chain(),
        );
    }
}
