//! Systems that operate on the simulation world each tick.
//!
//! Systems are free functions over the world and the entity index.
//! They own no state; everything lives in components and the event log.

pub mod impact;
pub mod movement;
pub mod snapshot;
pub mod turrets;

use conquest_core::components::{Troop, Turret};
use conquest_core::events::{TroopEvent, TroopEventKind, TurretEvent, TurretEventKind};

pub(crate) fn troop_event(troop: &Troop, timestamp: f64, kind: TroopEventKind) -> TroopEvent {
    TroopEvent {
        timestamp,
        troop_id: troop.id,
        attack_unit_id: troop.attack_unit_id,
        path_id: troop.path_id,
        kind,
    }
}

pub(crate) fn turret_event(turret: &Turret, timestamp: f64, kind: TurretEventKind) -> TurretEvent {
    TurretEvent {
        timestamp,
        turret_id: turret.id,
        defensive_building_id: turret.defensive_building_id,
        kind,
    }
}
