//! Result assembly: projects the final world state and the event log
//! into the response contract. Read-only over the world.

use std::collections::BTreeMap;

use hecs::World;

use conquest_core::components::{GenerativeBuilding, Troop, Turret};
use conquest_core::enums::{TroopPhase, TurretPhase};
use conquest_core::events::EventLog;
use conquest_core::state::*;
use conquest_core::types::SimTime;

use crate::world_setup::WorldIndex;

/// Assemble the response once stepping has stopped.
#[allow(clippy::too_many_arguments)]
pub fn build_result(
    world: &World,
    index: &WorldIndex,
    events: EventLog,
    troop_info: Vec<UnitType>,
    troops_at_end: BTreeMap<u32, BTreeMap<u32, u32>>,
    mut buildings_data: BuildingsData,
    stopped_at: SimTime,
    ticks: u64,
    timed_out: bool,
) -> SimulationResult {
    update_building_health(world, index, &mut buildings_data);

    SimulationResult {
        turret_info: build_turret_info(world, index),
        troop_info,
        troops_at_end,
        buildings_data,
        outcome: build_outcome(world, index, stopped_at, ticks, timed_out),
        troop_events: events.troops,
        turret_events: events.turrets,
        generative_building_events: events.generative_buildings,
        city_events: events.cities,
    }
}

/// One entry per turret, dead or alive, in request order.
pub fn build_turret_info(world: &World, index: &WorldIndex) -> Vec<TurretInfo> {
    index
        .turrets()
        .iter()
        .filter_map(|&entity| world.get::<&Turret>(entity).ok())
        .map(|turret| TurretInfo {
            id: turret.id,
            defensive_building_id: turret.defensive_building_id,
            in_game_picture: turret.in_game_picture.clone(),
            weapon: turret.stats.weapon_kind(),
            position: turret.position,
            stats: turret.stats,
            hp: turret.health,
            max_hp: turret.max_health,
            angle: turret.facing_deg,
            state: turret.phase,
        })
        .collect()
}

/// Summarize the run from troop and turret phases.
pub fn build_outcome(
    world: &World,
    index: &WorldIndex,
    stopped_at: SimTime,
    ticks: u64,
    timed_out: bool,
) -> SimOutcome {
    let mut outcome = SimOutcome {
        ticks,
        elapsed_secs: stopped_at.elapsed_secs,
        timed_out,
        ..SimOutcome::default()
    };
    for &entity in index.troops() {
        let Ok(troop) = world.get::<&Troop>(entity) else {
            continue;
        };
        outcome.troops_total += 1;
        match troop.phase {
            TroopPhase::Destroyed => outcome.troops_destroyed += 1,
            TroopPhase::ReachedTarget => outcome.troops_reached_target += 1,
            TroopPhase::ReachedPathEnd => outcome.troops_reached_path_end += 1,
            TroopPhase::Scheduled | TroopPhase::Moving => {}
        }
    }
    outcome.turrets_destroyed = index
        .turrets()
        .iter()
        .filter_map(|&entity| world.get::<&Turret>(entity).ok())
        .filter(|turret| turret.phase == TurretPhase::Destroyed)
        .count() as u32;
    outcome
}

/// Echo economic building health back into the buildings data.
fn update_building_health(world: &World, index: &WorldIndex, data: &mut BuildingsData) {
    for (id, entity) in index.buildings() {
        let Ok(building) = world.get::<&GenerativeBuilding>(entity) else {
            continue;
        };
        if let Some(entry) = data.generative_buildings.get_mut(&id) {
            entry.hp = building.health;
        }
    }
}
