//! Priority-weighted target selection.
//!
//! Weights are renormalized over the candidates that are still alive, a
//! cumulative distribution is built in candidate order, and one uniform
//! draw picks the first candidate whose cumulative weight reaches it.

use hecs::World;
use rand::Rng;

use conquest_core::components::{GenerativeBuilding, TargetDescriptor, Turret};
use conquest_core::enums::TargetKind;

use crate::world_setup::WorldIndex;

/// Pick one live target, or `None` when no candidate is alive.
///
/// Consumes exactly one draw from `rng` whenever a live candidate exists.
pub fn select_target<R, F>(
    candidates: &[TargetDescriptor],
    mut is_alive: F,
    rng: &mut R,
) -> Option<TargetDescriptor>
where
    R: Rng,
    F: FnMut(&TargetDescriptor) -> bool,
{
    let alive: Vec<&TargetDescriptor> = candidates.iter().filter(|c| is_alive(*c)).collect();
    let last = alive.last()?;
    let total: f64 = alive.iter().map(|c| c.priority).sum();

    let draw: f64 = rng.gen();
    let mut cumulative = 0.0;
    for candidate in &alive {
        cumulative += candidate.priority / total;
        if draw <= cumulative {
            return Some(**candidate);
        }
    }
    // Rounding left the sum just under the draw.
    Some(**last)
}

/// Current liveness of a target. Cities never fall.
pub fn is_target_alive(world: &World, index: &WorldIndex, target: &TargetDescriptor) -> bool {
    match target.kind {
        TargetKind::City => true,
        TargetKind::DefensiveBuilding => index
            .turret(target.target_id)
            .and_then(|e| world.get::<&Turret>(e).ok())
            .is_some_and(|turret| turret.is_alive()),
        TargetKind::GenerativeBuilding => index
            .building(target.target_id)
            .and_then(|e| world.get::<&GenerativeBuilding>(e).ok())
            .is_some_and(|building| !building.destroyed && building.health > 0.0),
    }
}
