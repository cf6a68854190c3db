//! Payload delivery when a troop reaches a live target.

use std::collections::BTreeMap;

use hecs::World;
use tracing::debug;

use conquest_core::components::{GenerativeBuilding, TargetDescriptor, Troop, Turret};
use conquest_core::enums::{TargetKind, TurretPhase};
use conquest_core::events::*;

use crate::systems::turret_event;
use crate::world_setup::WorldIndex;

/// Apply an arrived troop's payload to its target.
///
/// Cities are never damaged: an arrival only bumps the per-territory,
/// per-unit-type counter and logs a city event.
pub fn deliver(
    world: &World,
    index: &WorldIndex,
    troop: &Troop,
    target: &TargetDescriptor,
    events: &mut EventLog,
    arrivals: &mut BTreeMap<u32, BTreeMap<u32, u32>>,
    clock: f64,
) {
    match target.kind {
        TargetKind::City => {
            *arrivals
                .entry(troop.territory_id)
                .or_default()
                .entry(troop.attack_unit_id)
                .or_insert(0) += 1;
            events.cities.push(CityEvent {
                timestamp: clock,
                city_id: target.target_id,
                kind: CityEventKind::Arrival {
                    troop_id: troop.id,
                    attack_unit_id: troop.attack_unit_id,
                },
            });
            debug!(troop_id = troop.id, city_id = target.target_id, "troop reached city");
        }
        TargetKind::DefensiveBuilding => {
            let Some(entity) = index.turret(target.target_id) else {
                return;
            };
            if let Ok(mut turret) = world.get::<&mut Turret>(entity) {
                damage_turret(&mut turret, troop.damage, clock, events);
            }
        }
        TargetKind::GenerativeBuilding => {
            let Some(entity) = index.building(target.target_id) else {
                return;
            };
            if let Ok(mut building) = world.get::<&mut GenerativeBuilding>(entity) {
                damage_building(&mut building, troop.damage, clock, events);
            }
        }
    }
}

/// Damage a turret; the first blow that takes it to zero destroys it.
pub fn damage_turret(turret: &mut Turret, damage: f64, clock: f64, events: &mut EventLog) {
    if !turret.is_alive() {
        return;
    }
    turret.health = (turret.health - damage).max(0.0);
    events.turrets.push(turret_event(
        turret,
        clock,
        TurretEventKind::Damage {
            damage,
            remaining_health: turret.health,
        },
    ));
    if turret.health <= 0.0 {
        turret.phase = TurretPhase::Destroyed;
        events
            .turrets
            .push(turret_event(turret, clock, TurretEventKind::Destroyed));
        debug!(turret_id = turret.id, timestamp = clock, "turret destroyed");
    }
}

pub fn damage_building(
    building: &mut GenerativeBuilding,
    damage: f64,
    clock: f64,
    events: &mut EventLog,
) {
    if building.destroyed {
        return;
    }
    building.health = (building.health - damage).max(0.0);
    events.generative_buildings.push(GenerativeBuildingEvent {
        timestamp: clock,
        building_id: building.id,
        generative_building_id: building.generative_building_id,
        kind: BuildingEventKind::Damage {
            damage,
            remaining_health: building.health,
        },
    });
    if building.health <= 0.0 {
        building.destroyed = true;
        events.generative_buildings.push(GenerativeBuildingEvent {
            timestamp: clock,
            building_id: building.id,
            generative_building_id: building.generative_building_id,
            kind: BuildingEventKind::Destroyed,
        });
        debug!(building_id = building.id, timestamp = clock, "building destroyed");
    }
}
