use std::fmt;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use hexx::Hex;
use serde::{Deserialize, Serialize};

use super::boundary::BoundarySegment;
use super::layout::HexGridLayout;
use crate::game_state::Richness;

/// Stable id of a generated hex, assigned in generation order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Reflect,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct HexId(pub u32);

impl fmt::Display for HexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hex#{}", self.0)
    }
}

/// One generated cell. Immutable once generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub struct HexRecord {
    /// Generated id.
    pub id: HexId,
    /// Axial coordinates.
    pub hex: Hex,
    /// Resource class sampled at generation time.
    pub richness: Richness,
}

/// The map for this session.
#[derive(Resource)]
pub struct HexGrid {
    /// Generated cells and their projection.
    pub layout: HexGridLayout,
}

/// Marker on each spawned hex face.
#[derive(Component, Reflect)]
pub struct HexCell {
    /// Record id of this cell.
    pub id: HexId,
    /// Axial coordinates, kept for the inspector.
    pub hex: Hex,
}

/// Parent of every [`HexCell`] entity.
#[derive(Component, Reflect)]
pub struct HexGridRoot;

/// Maps hex ids to their spawned [`HexCell`] entities.
#[derive(Resource, Default)]
pub struct HexEntities {
    /// Lookup from id to entity.
    pub map: HashMap<HexId, Entity>,
}

/// Face materials for hex cells.
#[derive(Resource)]
pub struct HexMaterials {
    /// Unselected fill per richness class.
    pub by_richness: HashMap<Richness, Handle<ColorMaterial>>,
    /// Fill of selected cells.
    pub selected: Handle<ColorMaterial>,
}

impl HexMaterials {
    /// Fill for a cell given its richness and selection state.
    pub fn fill(&self, richness: Richness, selected: bool) -> Handle<ColorMaterial> {
        if selected {
            return self.selected.clone();
        }
        self.by_richness
            .get(&richness)
            .cloned()
            .unwrap_or_else(|| self.selected.clone())
    }
}

/// Boundary segments of the current selection, rebuilt when it changes.
#[derive(Resource, Default)]
pub struct SelectionOutline {
    /// Segments in world space.
    pub segments: Vec<BoundarySegment>,
}
