use bevy::app::AppExit;
use bevy::prelude::*;

use super::entities::{ConstructionClock, PersistenceState};
use super::store::{STORAGE_KEY, SavedGame, Storage};
use super::{GameConfig, GameStateConfig};
use crate::buildings::{
    self, BuildRequest, Construction, Constructions, DemolishRequest, Placements,
};
use crate::hex_grid::HexGrid;

// ── Startup ─────────────────────────────────────────────────────────

/// Restores config and placements from the storage slot.
///
/// A missing slot keeps the defaults. An unreadable slot also keeps the
/// defaults but disables saving for the session.
pub fn load_game(
    settings: Res<GameStateConfig>,
    storage: Res<Storage>,
    grid: Res<HexGrid>,
    mut persistence: ResMut<PersistenceState>,
    mut config: ResMut<GameConfig>,
    mut placements: ResMut<Placements>,
    mut constructions: ResMut<Constructions>,
) {
    if !settings.persist || !settings.load {
        return;
    }

    let saved = match SavedGame::load(storage.0.as_ref()) {
        Ok(Some(saved)) => saved,
        Ok(None) => {
            info!("no saved game under {STORAGE_KEY}, starting fresh");
            return;
        }
        Err(err) => {
            error!("could not load {STORAGE_KEY}: {err}; saving disabled for this session");
            persistence.enabled = false;
            return;
        }
    };

    *config = saved.config;
    let mut restored = 0usize;
    for entry in saved.buildings {
        if !grid.layout.contains_id(entry.hex) {
            warn!("saved building on {} is outside the map, skipping", entry.hex);
            continue;
        }
        if let Err(err) = placements.place(entry.hex, entry.building.clone()) {
            warn!("skipping saved building: {err}");
            continue;
        }
        if let Some(progress) = entry.progress {
            constructions.insert(
                entry.hex,
                Construction {
                    building: entry.building,
                    progress: progress.clamp(0.0, 100.0),
                },
            );
        }
        restored += 1;
    }
    info!("restored {restored} buildings from {STORAGE_KEY}");
}

// ── Update: requests ────────────────────────────────────────────────

/// Starts construction for each valid [`BuildRequest`].
pub fn handle_build_requests(
    mut requests: MessageReader<BuildRequest>,
    mut placements: ResMut<Placements>,
    mut constructions: ResMut<Constructions>,
) {
    for req in requests.read() {
        match placements.place(req.hex, req.building.clone()) {
            Ok(def) => {
                info!("construction of {} started on {}", def.name, req.hex);
                constructions.insert(req.hex, Construction::new(req.building.clone()));
            }
            Err(err) => warn!("build request rejected: {err}"),
        }
    }
}

/// Removes the building (finished or not) for each [`DemolishRequest`].
pub fn handle_demolish_requests(
    mut requests: MessageReader<DemolishRequest>,
    mut placements: ResMut<Placements>,
    mut constructions: ResMut<Constructions>,
) {
    for req in requests.read() {
        constructions.remove(req.hex);
        match placements.remove(req.hex) {
            Some(key) => info!("demolished {key} on {}", req.hex),
            None => debug!("nothing to demolish on {}", req.hex),
        }
    }
}

// ── Update: construction ticks ──────────────────────────────────────

/// Rebuilds the clock after the tick interval changed (e.g. after loading).
pub fn reset_clock(config: Res<GameConfig>, mut clock: ResMut<ConstructionClock>) {
    *clock = ConstructionClock::new(&config);
}

/// Advances every construction by the ticks elapsed this frame.
pub fn advance_constructions(
    time: Res<Time>,
    mut clock: ResMut<ConstructionClock>,
    mut constructions: ResMut<Constructions>,
) {
    clock.0.tick(time.delta());
    let ticks = clock.0.times_finished_this_tick();
    if ticks == 0 || constructions.is_empty() {
        return;
    }

    let mut finished = Vec::new();
    for (&hex, construction) in constructions.iter_mut() {
        let build_ticks = buildings::building(construction.building.as_str())
            .map_or(1, |def| def.build_ticks);
        if construction.advance(ticks, build_ticks) {
            finished.push(hex);
        }
    }
    for hex in finished {
        if let Some(done) = constructions.remove(hex) {
            info!("construction of {} finished on {hex}", done.building);
        }
    }
}

// ── Persistence ─────────────────────────────────────────────────────

fn write_slot(
    storage: &mut Storage,
    config: &GameConfig,
    placements: &Placements,
    constructions: &Constructions,
) {
    let snapshot = SavedGame::capture(config, placements, constructions);
    match snapshot.save(storage.0.as_mut()) {
        Ok(()) => debug!("saved {} buildings to {STORAGE_KEY}", snapshot.buildings.len()),
        Err(err) => error!("could not save {STORAGE_KEY}: {err}"),
    }
}

/// Writes the slot whenever placements or config change.
pub fn save_on_change(
    settings: Res<GameStateConfig>,
    persistence: Res<PersistenceState>,
    mut storage: ResMut<Storage>,
    config: Res<GameConfig>,
    placements: Res<Placements>,
    constructions: Res<Constructions>,
) {
    if !settings.persist || !persistence.enabled {
        return;
    }
    write_slot(&mut storage, &config, &placements, &constructions);
}

/// Writes the slot one last time when the app is exiting, capturing
/// construction progress that does not trigger [`save_on_change`].
pub fn save_on_exit(
    mut exit: MessageReader<AppExit>,
    settings: Res<GameStateConfig>,
    persistence: Res<PersistenceState>,
    mut storage: ResMut<Storage>,
    config: Res<GameConfig>,
    placements: Res<Placements>,
    constructions: Res<Constructions>,
) {
    if exit.read().next().is_none() {
        return;
    }
    if !settings.persist || !persistence.enabled {
        return;
    }
    write_slot(&mut storage, &config, &placements, &constructions);
}
