//! Scenario definitions — fixed single-turret demo runs.
//!
//! Both scenarios send 20 identical troops down the built-in demo path
//! toward a city, past one turret placed beside the S-bend. They are
//! ordinary requests for the general engine, with calibration scales of 1
//! so the listed stats are already in map units.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use conquest_core::constants::*;
use conquest_core::enums::TargetKind;
use conquest_core::state::*;
use conquest_paths::MapCatalog;

use crate::engine::{simulate, SimConfig};
use crate::error::SimError;

const TROOP_COUNT: u32 = 20;
const TROOP_HEALTH: f64 = 100.0;
const TURRET_LOCATION: [f64; 2] = [400.0, 1512.5];
const TERRITORY_ID: u32 = 1;
const CITY_ID: u32 = 1;
const UNIT_TYPE_ID: u32 = 1;

/// Built-in demo scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Cone weapon against a tight stream of troops.
    Flamethrower,
    /// Fast single-target weapon against a spaced stream.
    Gunner,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 2] = [ScenarioId::Flamethrower, ScenarioId::Gunner];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioId::Flamethrower => "flamethrower",
            ScenarioId::Gunner => "gunner",
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScenarioId::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown scenario {s:?}"))
    }
}

/// A complete, runnable simulation setup.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub id: ScenarioId,
    pub request: SimulationRequest,
    pub maps: MapCatalog,
    pub config: SimConfig,
}

impl Scenario {
    pub fn run(&self) -> Result<SimulationResult, SimError> {
        simulate(self.config.clone(), &self.request, &self.maps)
    }
}

/// Troop and weapon parameters that differ between the scenarios.
struct Setup {
    troop_speed: f64,
    unit_delay: f64,
    turret: DefensiveBuildingSpec,
}

/// Build a scenario with the given seed.
pub fn build_scenario(id: ScenarioId, seed: u64) -> Scenario {
    let setup = match id {
        ScenarioId::Flamethrower => flamethrower(),
        ScenarioId::Gunner => gunner(),
    };
    Scenario {
        id,
        request: demo_request(setup),
        maps: MapCatalog::with_demo_map(),
        config: SimConfig {
            seed,
            max_duration_secs: SCENARIO_MAX_DURATION_SECS,
            speed_scale: 1.0,
            range_scale: 1.0,
            ..SimConfig::default()
        },
    }
}

/// Flamethrower: 60 damage, range 200, 2.5 shots/s, 95% accuracy, 45° cone,
/// troops at speed 50 every 0.25 s.
fn flamethrower() -> Setup {
    Setup {
        troop_speed: 50.0,
        unit_delay: 0.25,
        turret: turret_spec(60.0, 200.0, 2.5, 95.0, Some(45.0)),
    }
}

/// Gunner: 20 damage, range 300, 6 shots/s, 80% accuracy, single target,
/// troops at speed 70 every second.
fn gunner() -> Setup {
    Setup {
        troop_speed: 70.0,
        unit_delay: 1.0,
        turret: turret_spec(20.0, 300.0, 6.0, 80.0, None),
    }
}

fn turret_spec(
    damage: f64,
    range: f64,
    firerate: f64,
    accuracy: f64,
    cone_angle: Option<f64>,
) -> DefensiveBuildingSpec {
    DefensiveBuildingSpec {
        id: 1,
        defensive_building_id: 1,
        territory_id: Some(TERRITORY_ID),
        in_game_picture: None,
        damage,
        health_points: 1000.0,
        max_health_points: 1000.0,
        range,
        firerate,
        accuracy,
        cone_angle,
        can_attack_ground: true,
        can_attack_air: true,
        location: TURRET_LOCATION,
    }
}

fn demo_request(setup: Setup) -> SimulationRequest {
    let group = UnitGroup {
        count: TROOP_COUNT,
        overall_delay: 0.0,
        unit_delay: setup.unit_delay,
        targets: TargetPriorities::Listed(vec![PrioritizedTarget {
            priority: 1.0,
            kind: TargetKind::City,
            id: CITY_ID,
        }]),
    };
    let wave = AttackWave {
        path_id: DEMO_PATH_ID,
        territory_id: TERRITORY_ID,
        outpost_id: None,
        attack_units: IndexMap::from([(UNIT_TYPE_ID, group)]),
    };
    let unit = UnitType {
        id: UNIT_TYPE_ID,
        unit_class: "infantry".to_string(),
        in_game_picture: None,
        health_points: TROOP_HEALTH,
        damage: 10.0,
        speed: setup.troop_speed,
        accuracy: 100.0,
        is_air: false,
    };

    SimulationRequest {
        map_id: DEMO_MAP_ID,
        attack_waves: vec![wave],
        defensive_buildings: vec![setup.turret],
        unit_types: vec![unit],
        buildings_data: BuildingsData::default(),
    }
}
