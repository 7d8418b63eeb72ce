use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use thiserror::Error;

use super::catalog::{self, BuildingDef, BuildingKey};
use crate::hex_grid::HexId;

/// Why a building could not be placed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    /// The key is not in the catalog.
    #[error("unknown building `{0}`")]
    UnknownBuilding(BuildingKey),
    /// The hex already holds a building.
    #[error("{hex} already holds `{existing}`")]
    Occupied {
        /// Target hex.
        hex: HexId,
        /// Building already there.
        existing: BuildingKey,
    },
}

/// Which building stands on which hex.
#[derive(Resource, Default, Debug)]
pub struct Placements {
    by_hex: HashMap<HexId, BuildingKey>,
}

impl Placements {
    /// Places `key` on an empty hex.
    pub fn place(
        &mut self,
        hex: HexId,
        key: BuildingKey,
    ) -> Result<&'static BuildingDef, PlacementError> {
        let def = catalog::building(key.as_str())
            .ok_or_else(|| PlacementError::UnknownBuilding(key.clone()))?;
        if let Some(existing) = self.by_hex.get(&hex) {
            return Err(PlacementError::Occupied {
                hex,
                existing: existing.clone(),
            });
        }
        self.by_hex.insert(hex, key);
        Ok(def)
    }

    /// Removes and returns the building on `hex`.
    pub fn remove(&mut self, hex: HexId) -> Option<BuildingKey> {
        self.by_hex.remove(&hex)
    }

    /// Key of the building on `hex`.
    pub fn get(&self, hex: HexId) -> Option<&BuildingKey> {
        self.by_hex.get(&hex)
    }

    /// Catalog entry of the building on `hex`.
    pub fn definition(&self, hex: HexId) -> Option<&'static BuildingDef> {
        self.get(hex).and_then(|k| catalog::building(k.as_str()))
    }

    /// All placements, unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&HexId, &BuildingKey)> {
        self.by_hex.iter()
    }

    /// Number of placed buildings.
    pub fn len(&self) -> usize {
        self.by_hex.len()
    }

    /// True when nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.by_hex.is_empty()
    }
}

/// A building still under construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Construction {
    /// Building being constructed.
    pub building: BuildingKey,
    /// Completion percentage, `0.0..=100.0`.
    pub progress: f32,
}

impl Construction {
    /// Fresh construction at 0 %.
    pub fn new(building: BuildingKey) -> Self {
        Self {
            building,
            progress: 0.0,
        }
    }

    /// Adds `ticks` of work for a building that needs `build_ticks` in total.
    ///
    /// Returns `true` once complete.
    pub fn advance(&mut self, ticks: u32, build_ticks: u32) -> bool {
        let step = 100.0 / build_ticks.max(1) as f32;
        self.progress = (self.progress + step * ticks as f32).min(100.0);
        // absorb float drift from repeated small steps
        if self.progress > 100.0 - 1e-3 {
            self.progress = 100.0;
        }
        self.is_complete()
    }

    /// Whether the progress reached 100 %.
    pub fn is_complete(&self) -> bool {
        self.progress >= 100.0
    }

    /// Progress as a `0.0..=1.0` fraction.
    pub fn fraction(&self) -> f32 {
        (self.progress / 100.0).clamp(0.0, 1.0)
    }
}

/// Constructions in progress, keyed by hex.
#[derive(Resource, Default, Debug)]
pub struct Constructions {
    by_hex: HashMap<HexId, Construction>,
}

impl Constructions {
    /// Starts or replaces the record for `hex`.
    pub fn insert(&mut self, hex: HexId, construction: Construction) {
        self.by_hex.insert(hex, construction);
    }

    /// Drops the record for `hex`.
    pub fn remove(&mut self, hex: HexId) -> Option<Construction> {
        self.by_hex.remove(&hex)
    }

    /// Record for `hex`.
    pub fn get(&self, hex: HexId) -> Option<&Construction> {
        self.by_hex.get(&hex)
    }

    /// Mutable iteration over all records.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&HexId, &mut Construction)> {
        self.by_hex.iter_mut()
    }

    /// True when nothing is being built.
    pub fn is_empty(&self) -> bool {
        self.by_hex.is_empty()
    }
}

/// Ask the game state to start constructing `building` on `hex`.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct BuildRequest {
    /// Target hex.
    pub hex: HexId,
    /// Catalog key to build.
    pub building: BuildingKey,
}

/// Ask the game state to remove whatever stands on `hex`.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemolishRequest {
    /// Target hex.
    pub hex: HexId,
}

/// Root entity of a building's block sprites.
#[derive(Component)]
pub struct BuildingVisual {
    /// Hex the building stands on.
    pub hex: HexId,
    /// Building drawn.
    pub building: BuildingKey,
}

/// One decorative block sprite; remembers its opaque colour for fading.
#[derive(Component)]
pub struct BuildingBlock {
    /// Fully-constructed colour.
    pub base: Color,
}

/// Hex → spawned [`BuildingVisual`] entity.
#[derive(Resource, Default)]
pub struct BuildingVisuals {
    /// Lookup from hex to visual root.
    pub map: HashMap<HexId, Entity>,
}
