//! Turret tracking and fire control.
//!
//! Every live turret gathers the active troops inside its range that its
//! weapon can engage, turns toward the one furthest along its path, and
//! fires when its reload has elapsed. Single-target weapons roll against
//! the aimed troop only; cone weapons roll independently against every
//! troop inside `facing ± cone/2`. Range is a plain distance check.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use conquest_core::components::{Troop, Turret};
use conquest_core::constants::FIRE_GATE_EPSILON;
use conquest_core::enums::{TroopPhase, TurretPhase, WeaponKind};
use conquest_core::events::{EventLog, TroopEventKind, TurretEventKind};
use conquest_core::types::{angle_diff_deg, Position};

use crate::systems::{troop_event, turret_event};
use crate::world_setup::WorldIndex;

/// An engageable troop as seen by one turret this tick.
#[derive(Debug, Clone, Copy)]
struct Contact {
    entity: Entity,
    position: Position,
    t: f64,
}

/// Run every live turret once, in request order.
pub fn run(
    world: &World,
    index: &WorldIndex,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
    clock: f64,
) {
    for &entity in index.turrets() {
        let Ok(mut turret) = world.get::<&mut Turret>(entity) else {
            continue;
        };
        if !turret.is_alive() {
            continue;
        }

        let contacts = contacts_in_range(world, index, &turret);
        let Some(aim) = aim_point(&contacts) else {
            turret.phase = TurretPhase::Idle;
            continue;
        };

        let angle = turret.position.bearing_deg_to(&aim.position);
        if angle != turret.facing_deg {
            turret.facing_deg = angle;
            events
                .turrets
                .push(turret_event(&turret, clock, TurretEventKind::Rotate { angle }));
        }

        if clock - turret.last_fire_time < turret.stats.reload_secs() - FIRE_GATE_EPSILON {
            turret.phase = TurretPhase::Tracking;
            continue;
        }
        turret.last_fire_time = clock;
        turret.phase = TurretPhase::Firing;
        events
            .turrets
            .push(turret_event(&turret, clock, TurretEventKind::Fire));

        let victims: Vec<Contact> = match turret.stats.weapon_kind() {
            WeaponKind::SingleTarget => vec![aim],
            WeaponKind::Cone => {
                let cone = turret.stats.cone_angle.unwrap_or_default();
                contacts
                    .iter()
                    .filter(|c| {
                        within_cone(
                            turret.facing_deg,
                            turret.position.bearing_deg_to(&c.position),
                            cone,
                        )
                    })
                    .copied()
                    .collect()
            }
        };
        trace!(
            turret_id = turret.id,
            timestamp = clock,
            contacts = contacts.len(),
            victims = victims.len(),
            "turret fired"
        );

        for victim in victims {
            if rng.gen::<f64>() < turret.stats.accuracy {
                hit_troop(world, victim.entity, turret.stats.damage, clock, events);
            }
        }
    }
}

/// Active troops the turret can engage, in troop id order.
fn contacts_in_range(world: &World, index: &WorldIndex, turret: &Turret) -> Vec<Contact> {
    index
        .troops()
        .iter()
        .filter_map(|&entity| {
            let troop = world.get::<&Troop>(entity).ok()?;
            let position = troop.position?;
            let engageable = troop.is_active()
                && turret.can_engage(troop.is_air)
                && turret.position.range_to(&position) <= turret.stats.range;
            engageable.then_some(Contact {
                entity,
                position,
                t: troop.t,
            })
        })
        .collect()
}

/// The contact furthest along its path; the earliest troop wins ties.
fn aim_point(contacts: &[Contact]) -> Option<Contact> {
    contacts.iter().copied().fold(None, |best, c| match best {
        Some(b) if b.t >= c.t => Some(b),
        _ => Some(c),
    })
}

/// Whether a bearing lies inside a cone of full width `cone_deg` around `facing_deg`.
pub fn within_cone(facing_deg: f64, bearing_deg: f64, cone_deg: f64) -> bool {
    angle_diff_deg(bearing_deg, facing_deg).abs() <= cone_deg / 2.0
}

fn hit_troop(world: &World, entity: Entity, damage: f64, clock: f64, events: &mut EventLog) {
    let Ok(mut troop) = world.get::<&mut Troop>(entity) else {
        return;
    };
    if !troop.is_active() {
        return;
    }
    troop.health = (troop.health - damage).max(0.0);
    let remaining_health = troop.health;
    events.troops.push(troop_event(
        &troop,
        clock,
        TroopEventKind::Damage {
            damage,
            remaining_health,
        },
    ));
    if troop.health <= 0.0 {
        troop.phase = TroopPhase::Destroyed;
        events
            .troops
            .push(troop_event(&troop, clock, TroopEventKind::Death));
        debug!(troop_id = troop.id, timestamp = clock, "troop destroyed");
    }
}
