use std::io::ErrorKind;
use std::path::PathBuf;

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::GameConfig;
use crate::buildings::{BuildingKey, Constructions, Placements};
use crate::hex_grid::HexId;

/// Name of the single storage slot holding the game state.
pub const STORAGE_KEY: &str = "sol3000_game_state";

/// Schema version written into every save.
pub const SAVE_VERSION: u32 = 1;

/// Failures reading or writing the storage slot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("failed to access storage slot {path}: {source}")]
    Io {
        /// Path of the slot file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The slot content is not valid game-state JSON.
    #[error("malformed game state: {0}")]
    Format(#[from] serde_json::Error),
    /// The slot was written by an incompatible schema version.
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the slot.
        found: u32,
        /// Version this build understands.
        expected: u32,
    },
}

/// Key/value slot storage.
pub trait GameStore: Send + Sync + 'static {
    /// Reads a slot; `Ok(None)` when it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Replaces a slot's contents.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Active storage backend.
#[derive(Resource)]
pub struct Storage(pub Box<dyn GameStore>);

/// Stores each slot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir` (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl GameStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        // Write-then-rename so a crash mid-write never truncates the slot.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }
}

/// In-memory slots.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl GameStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// One placed building in the save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBuilding {
    /// Hex holding the building.
    pub hex: HexId,
    /// Catalog key.
    pub building: BuildingKey,
    /// Construction percentage; absent once finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
}

/// Serialized shape of the storage slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    /// Schema version, see [`SAVE_VERSION`].
    pub version: u32,
    /// Simulation constants.
    #[serde(default)]
    pub config: GameConfig,
    /// Placed buildings ordered by hex id.
    #[serde(default)]
    pub buildings: Vec<SavedBuilding>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl SavedGame {
    /// Snapshot of the live resources.
    pub fn capture(config: &GameConfig, placements: &Placements, constructions: &Constructions) -> Self {
        let mut buildings: Vec<SavedBuilding> = placements
            .iter()
            .map(|(&hex, key)| SavedBuilding {
                hex,
                building: key.clone(),
                progress: constructions.get(hex).map(|c| c.progress),
            })
            .collect();
        buildings.sort_by_key(|b| b.hex);
        Self {
            version: SAVE_VERSION,
            config: config.clone(),
            buildings,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a slot, rejecting other schema versions.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        if probe.version != SAVE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: probe.version,
                expected: SAVE_VERSION,
            });
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Reads [`STORAGE_KEY`] from `store`.
    pub fn load(store: &dyn GameStore) -> Result<Option<Self>, StoreError> {
        store
            .read(STORAGE_KEY)?
            .map(|json| Self::from_json(&json))
            .transpose()
    }

    /// Writes this snapshot to [`STORAGE_KEY`].
    pub fn save(&self, store: &mut dyn GameStore) -> Result<(), StoreError> {
        store.write(STORAGE_KEY, &self.to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::Construction;

    fn sample_state() -> (GameConfig, Placements, Constructions) {
        let mut placements = Placements::default();
        placements
            .place(HexId(4), BuildingKey::from_static("habitat"))
            .unwrap();
        placements
            .place(HexId(1), BuildingKey::from_static("metal_mine"))
            .unwrap();
        let mut constructions = Constructions::default();
        let mut c = Construction::new(BuildingKey::from_static("metal_mine"));
        c.progress = 40.0;
        constructions.insert(HexId(1), c);
        (GameConfig::default(), placements, constructions)
    }

    #[test]
    fn capture_orders_by_hex_and_keeps_progress() {
        let (cfg, placements, constructions) = sample_state();
        let saved = SavedGame::capture(&cfg, &placements, &constructions);
        assert_eq!(saved.buildings.len(), 2);
        assert_eq!(saved.buildings[0].hex, HexId(1));
        assert_eq!(saved.buildings[0].progress, Some(40.0));
        assert_eq!(saved.buildings[1].progress, None);
    }

    #[test]
    fn memory_store_roundtrip() {
        let (cfg, placements, constructions) = sample_state();
        let saved = SavedGame::capture(&cfg, &placements, &constructions);
        let mut store = MemoryStore::default();
        saved.save(&mut store).unwrap();
        let loaded = SavedGame::load(&store).unwrap();
        assert_eq!(loaded, Some(saved));
    }

    #[test]
    fn empty_store_loads_none() {
        let store = MemoryStore::default();
        assert!(SavedGame::load(&store).unwrap().is_none());
    }

    #[test]
    fn other_version_is_rejected() {
        let err = SavedGame::from_json(r#"{"version": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedVersion { found: 99, expected: SAVE_VERSION }
        ));
    }

    #[test]
    fn garbage_is_a_format_error() {
        let err = SavedGame::from_json("not json").unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));
    }

    #[test]
    fn minimal_slot_uses_defaults() {
        let saved = SavedGame::from_json(r#"{"version": 1}"#).unwrap();
        assert_eq!(saved.config, GameConfig::default());
        assert!(saved.buildings.is_empty());
    }

    #[test]
    fn file_store_writes_under_storage_key() {
        let dir = std::env::temp_dir().join(format!("sol3000-store-{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert!(store.read(STORAGE_KEY).unwrap().is_none());

        store.write(STORAGE_KEY, "{}").unwrap();
        assert!(dir.join("sol3000_game_state.json").exists());
        assert_eq!(store.read(STORAGE_KEY).unwrap().as_deref(), Some("{}"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
