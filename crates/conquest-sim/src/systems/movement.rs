//! Troop movement and arrival resolution.
//!
//! Each started troop is placed on its path from elapsed time alone:
//! `t = min((clock - start) * speed / length, 1)`, snapped to the nearest
//! path sample. A troop at or past its target's offset either arrives
//! (target alive) or draws a new target (target dead) and re-checks.

use std::collections::BTreeMap;

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use conquest_core::components::{TargetAssignment, Troop};
use conquest_core::enums::TroopPhase;
use conquest_core::events::{EventLog, TroopEventKind};
use conquest_paths::PathData;

use crate::systems::{impact, troop_event};
use crate::targeting;
use crate::world_setup::WorldIndex;

/// Move every started troop and resolve arrivals, in troop id order.
pub fn run(
    world: &World,
    index: &WorldIndex,
    paths: &BTreeMap<u32, PathData>,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
    arrivals: &mut BTreeMap<u32, BTreeMap<u32, u32>>,
    clock: f64,
) {
    for &entity in index.troops() {
        let Ok(mut troop) = world.get::<&mut Troop>(entity) else {
            continue;
        };
        if troop.phase.is_terminal() || clock < troop.start_time {
            continue;
        }
        let Some(path) = paths.get(&troop.path_id) else {
            continue;
        };

        if troop.phase == TroopPhase::Scheduled {
            troop.phase = TroopPhase::Moving;
            events
                .troops
                .push(troop_event(&troop, clock, TroopEventKind::Start));
        }

        troop.t = path_progress(&troop, path, clock);
        troop.position = Some(path.position_at(troop.t));

        resolve_arrival(world, index, &mut troop, rng, events, arrivals, clock);
    }
}

/// Fraction of the path covered at `clock`.
pub fn path_progress(troop: &Troop, path: &PathData, clock: f64) -> f64 {
    if path.length <= 0.0 {
        return 1.0;
    }
    ((clock - troop.start_time).max(0.0) * troop.speed / path.length).min(1.0)
}

fn resolve_arrival(
    world: &World,
    index: &WorldIndex,
    troop: &mut Troop,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
    arrivals: &mut BTreeMap<u32, BTreeMap<u32, u32>>,
    clock: f64,
) {
    loop {
        match troop.assignment {
            TargetAssignment::Target(target) => {
                if troop.t < target.target_length {
                    return;
                }
                if targeting::is_target_alive(world, index, &target) {
                    troop.phase = TroopPhase::ReachedTarget;
                    events
                        .troops
                        .push(troop_event(troop, clock, TroopEventKind::ReachTarget));
                    impact::deliver(world, index, troop, &target, events, arrivals, clock);
                    return;
                }

                let next = targeting::select_target(
                    &troop.targets,
                    |t| targeting::is_target_alive(world, index, t),
                    rng,
                );
                debug!(
                    troop_id = troop.id,
                    lost_kind = %target.kind,
                    lost_id = target.target_id,
                    next_id = ?next.map(|n| n.target_id),
                    "target gone, reselecting"
                );
                troop.assignment = next.map_or(TargetAssignment::NoTarget, TargetAssignment::Target);
            }
            TargetAssignment::NoTarget => {
                if troop.t >= 1.0 {
                    troop.phase = TroopPhase::ReachedPathEnd;
                    events
                        .troops
                        .push(troop_event(troop, clock, TroopEventKind::ReachedEndOfPath));
                }
                return;
            }
        }
    }
}
