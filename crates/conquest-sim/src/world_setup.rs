//! Entity spawn factories for setting up the simulation world.
//!
//! Turns a validated request into turret, economic building and troop
//! entities. Troops are scheduled here: each gets its start time and its
//! first target before the first tick runs.

use std::collections::{BTreeMap, HashMap};

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use conquest_core::components::*;
use conquest_core::constants::{ACCURACY_PERCENT, CITY_TARGET_LENGTH};
use conquest_core::enums::*;
use conquest_core::state::*;
use conquest_core::types::Position;
use conquest_paths::{PathData, PathError};

use crate::engine::SimConfig;
use crate::error::SimError;
use crate::targeting;

/// Entity handles in creation order, plus id lookups for targets.
#[derive(Debug, Default)]
pub struct WorldIndex {
    troops: Vec<Entity>,
    turrets: Vec<Entity>,
    turrets_by_id: HashMap<u32, Entity>,
    buildings: BTreeMap<u32, Entity>,
}

impl WorldIndex {
    /// Troops in creation (id) order.
    pub fn troops(&self) -> &[Entity] {
        &self.troops
    }

    /// Turrets in request order.
    pub fn turrets(&self) -> &[Entity] {
        &self.turrets
    }

    pub fn turret(&self, turret_id: u32) -> Option<Entity> {
        self.turrets_by_id.get(&turret_id).copied()
    }

    pub fn building(&self, building_id: u32) -> Option<Entity> {
        self.buildings.get(&building_id).copied()
    }

    /// Economic buildings keyed by id.
    pub fn buildings(&self) -> impl Iterator<Item = (u32, Entity)> + '_ {
        self.buildings.iter().map(|(id, e)| (*id, *e))
    }
}

/// Spawn every entity of the request. Troops are created last so their
/// initial target draw sees the starting health of every building.
pub fn populate_world(
    world: &mut World,
    request: &SimulationRequest,
    paths: &BTreeMap<u32, PathData>,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
) -> Result<WorldIndex, SimError> {
    let mut index = WorldIndex::default();
    spawn_turrets(world, &mut index, &request.defensive_buildings, config)?;
    spawn_generative_buildings(world, &mut index, &request.buildings_data);
    spawn_troops(world, &mut index, request, paths, config, rng)?;
    Ok(index)
}

/// Spawn one turret per placed defensive building, calibrating its range.
pub fn spawn_turrets(
    world: &mut World,
    index: &mut WorldIndex,
    specs: &[DefensiveBuildingSpec],
    config: &SimConfig,
) -> Result<(), SimError> {
    for spec in specs {
        if index.turrets_by_id.contains_key(&spec.id) {
            return Err(invalid_turret(spec.id, "duplicate turret id"));
        }
        let turret = build_turret(spec, config)?;
        let entity = world.spawn((turret,));
        index.turrets.push(entity);
        index.turrets_by_id.insert(spec.id, entity);
    }
    Ok(())
}

fn build_turret(spec: &DefensiveBuildingSpec, config: &SimConfig) -> Result<Turret, SimError> {
    if !(spec.firerate.is_finite() && spec.firerate > 0.0) {
        return Err(invalid_turret(spec.id, "fire rate must be positive"));
    }
    if !(spec.range.is_finite() && spec.range >= 0.0) {
        return Err(invalid_turret(spec.id, "range must be non-negative"));
    }
    if !(spec.damage.is_finite() && spec.damage >= 0.0) {
        return Err(invalid_turret(spec.id, "damage must be non-negative"));
    }
    if !(0.0..=ACCURACY_PERCENT).contains(&spec.accuracy) {
        return Err(invalid_turret(spec.id, "accuracy must be a percentage"));
    }
    if spec.cone_angle.is_some_and(|a| !a.is_finite()) {
        return Err(invalid_turret(spec.id, "cone angle must be finite"));
    }
    if !spec.health_points.is_finite() || !spec.location.iter().all(|c| c.is_finite()) {
        return Err(invalid_turret(spec.id, "health and location must be finite"));
    }

    let stats = WeaponStats {
        damage: spec.damage,
        range: spec.range * config.range_scale,
        firerate: spec.firerate,
        accuracy: spec.accuracy / ACCURACY_PERCENT,
        cone_angle: spec.cone_angle,
    };
    let destroyed = spec.health_points <= 0.0;

    Ok(Turret {
        id: spec.id,
        defensive_building_id: spec.defensive_building_id,
        in_game_picture: spec.in_game_picture.clone(),
        position: Position::new(spec.location[0], spec.location[1]),
        stats,
        health: spec.health_points.max(0.0),
        max_health: spec.max_health_points,
        phase: if destroyed {
            TurretPhase::Destroyed
        } else {
            TurretPhase::Idle
        },
        facing_deg: 0.0,
        // A turret may fire on the first tick it sees a troop.
        last_fire_time: -stats.reload_secs(),
        can_attack_ground: spec.can_attack_ground,
        can_attack_air: spec.can_attack_air,
    })
}

fn invalid_turret(turret_id: u32, reason: &str) -> SimError {
    SimError::InvalidTurret {
        turret_id,
        reason: reason.to_string(),
    }
}

/// Spawn the economic buildings listed in the buildings data.
pub fn spawn_generative_buildings(world: &mut World, index: &mut WorldIndex, data: &BuildingsData) {
    for (&id, building) in &data.generative_buildings {
        let entity = world.spawn((GenerativeBuilding {
            id,
            generative_building_id: building.generative_building_id,
            health: building.hp.max(0.0),
            destroyed: building.hp <= 0.0,
        },));
        index.buildings.insert(id, entity);
    }
}

/// Spawn and schedule every troop of every wave.
///
/// Within a wave a running delay accumulates each group's
/// `overall_delay`; troop `i` of a group starts at
/// `running + overall_delay + i * unit_delay`. Ids follow creation order.
pub fn spawn_troops(
    world: &mut World,
    index: &mut WorldIndex,
    request: &SimulationRequest,
    paths: &BTreeMap<u32, PathData>,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
) -> Result<(), SimError> {
    let unit_types: HashMap<u32, &UnitType> =
        request.unit_types.iter().map(|u| (u.id, u)).collect();
    let mut next_id = 0u32;

    for (wave_index, wave) in request.attack_waves.iter().enumerate() {
        if !paths.contains_key(&wave.path_id) {
            return Err(PathError::PathNotFound {
                map_id: request.map_id,
                path_id: wave.path_id,
            }
            .into());
        }
        let mut running_delay = 0.0;

        for (&unit_type_id, group) in wave.attack_units.iter() {
            let unit = unit_types
                .get(&unit_type_id)
                .ok_or(SimError::UnknownUnitType { unit_type_id })?;
            validate_unit(unit)?;
            let targets =
                resolve_targets(wave_index, wave, unit_type_id, group, &request.buildings_data)?;

            for i in 0..group.count {
                let assignment = targeting::select_target(
                    &targets,
                    |t| targeting::is_target_alive(world, index, t),
                    rng,
                )
                .map_or(TargetAssignment::NoTarget, TargetAssignment::Target);

                let troop = Troop {
                    id: next_id,
                    attack_unit_id: unit_type_id,
                    path_id: wave.path_id,
                    territory_id: wave.territory_id,
                    outpost_id: wave.outpost_id,
                    start_time: running_delay + group.overall_delay + f64::from(i) * group.unit_delay,
                    phase: TroopPhase::Scheduled,
                    health: unit.health_points,
                    max_health: unit.health_points,
                    speed: unit.speed * config.speed_scale,
                    damage: unit.damage,
                    is_air: unit.is_air,
                    t: 0.0,
                    position: None,
                    targets: targets.clone(),
                    assignment,
                };
                if assignment == TargetAssignment::NoTarget {
                    debug!(troop_id = next_id, "troop created without a live target");
                }
                index.troops.push(world.spawn((troop,)));
                next_id += 1;
            }
            running_delay += group.overall_delay;
        }
    }
    Ok(())
}

/// Reject stats that would spawn a dead or stalled troop.
fn validate_unit(unit: &UnitType) -> Result<(), SimError> {
    let invalid = |reason: &str| SimError::InvalidUnitType {
        unit_type_id: unit.id,
        reason: reason.to_string(),
    };
    if !(unit.health_points.is_finite() && unit.health_points > 0.0) {
        return Err(invalid("health must be positive"));
    }
    if !(unit.speed.is_finite() && unit.speed >= 0.0) {
        return Err(invalid("speed must be non-negative"));
    }
    if !(unit.damage.is_finite() && unit.damage >= 0.0) {
        return Err(invalid("damage must be non-negative"));
    }
    if !(0.0..=ACCURACY_PERCENT).contains(&unit.accuracy) {
        return Err(invalid("accuracy must be a percentage"));
    }
    Ok(())
}

/// Turn a group's weighted targets into descriptors with path offsets.
pub fn resolve_targets(
    wave_index: usize,
    wave: &AttackWave,
    unit_type_id: u32,
    group: &UnitGroup,
    buildings: &BuildingsData,
) -> Result<Vec<TargetDescriptor>, SimError> {
    let malformed = |reason: String| SimError::MalformedTarget {
        wave: wave_index,
        unit_type_id,
        reason,
    };

    let weighted = group
        .targets
        .to_weighted()
        .map_err(|key| malformed(format!("priority {key:?} is not a number")))?;
    if weighted.is_empty() {
        return Err(malformed("no targets".to_string()));
    }

    weighted
        .into_iter()
        .map(|target| {
            if !(target.priority.is_finite() && target.priority > 0.0) {
                return Err(malformed(format!(
                    "priority {} of {} {} must be positive",
                    target.priority, target.kind, target.id
                )));
            }
            let offset = target_length(target.kind, target.id, wave.path_id, buildings)?;
            if !(0.0..=1.0).contains(&offset) {
                return Err(malformed(format!(
                    "offset {offset} of {} {} is outside [0, 1]",
                    target.kind, target.id
                )));
            }
            Ok(TargetDescriptor {
                kind: target.kind,
                target_id: target.id,
                priority: target.priority,
                target_length: offset,
            })
        })
        .collect()
}

/// Path offset at which a troop on `path_id` reaches the target.
fn target_length(
    kind: TargetKind,
    id: u32,
    path_id: u32,
    buildings: &BuildingsData,
) -> Result<f64, SimError> {
    let offsets = match kind {
        TargetKind::City => return Ok(CITY_TARGET_LENGTH),
        TargetKind::DefensiveBuilding => buildings
            .defensive_buildings
            .get(&id)
            .map(|b| &b.targeting_path_ids),
        TargetKind::GenerativeBuilding => buildings
            .generative_buildings
            .get(&id)
            .map(|b| &b.targeting_path_ids),
    };
    offsets
        .ok_or(SimError::UnknownBuilding { kind, id })?
        .get(&path_id)
        .copied()
        .ok_or(SimError::MissingPathOffset { kind, id, path_id })
}

/// Zeroed arrival counters for every (territory, unit type) that attacks.
pub fn arrival_counters(request: &SimulationRequest) -> BTreeMap<u32, BTreeMap<u32, u32>> {
    let mut counters: BTreeMap<u32, BTreeMap<u32, u32>> = BTreeMap::new();
    for wave in &request.attack_waves {
        let territory = counters.entry(wave.territory_id).or_default();
        for (&unit_type_id, _) in wave.attack_units.iter() {
            territory.entry(unit_type_id).or_insert(0);
        }
    }
    counters
}

/// Stat records of the unit types the waves actually use, in request order.
pub fn used_unit_types(request: &SimulationRequest) -> Vec<UnitType> {
    request
        .unit_types
        .iter()
        .filter(|unit| {
            request
                .attack_waves
                .iter()
                .any(|wave| wave.attack_units.iter().any(|(&id, _)| id == unit.id))
        })
        .cloned()
        .collect()
}
