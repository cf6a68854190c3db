//! Simulation request and result contract exchanged with the API layer.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::components::WeaponStats;
use crate::enums::*;
use crate::events::*;
use crate::types::Position;

// ---- Request ----

/// Everything needed to simulate one attack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Selects the path-geometry dataset.
    pub map_id: u32,
    #[serde(alias = "attacks")]
    pub attack_waves: Vec<AttackWave>,
    #[serde(default, alias = "game_defensive_buildings")]
    pub defensive_buildings: Vec<DefensiveBuildingSpec>,
    #[serde(alias = "attack_unit_types")]
    pub unit_types: Vec<UnitType>,
    #[serde(default)]
    pub buildings_data: BuildingsData,
}

/// Troops launched from one outpost along one path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackWave {
    pub path_id: u32,
    pub territory_id: u32,
    #[serde(default)]
    pub outpost_id: Option<u32>,
    /// Unit groups keyed by attack unit type id, in launch order.
    /// A repeated key keeps its first position and its last value.
    pub attack_units: IndexMap<u32, UnitGroup>,
}

/// A batch of identical troops within a wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitGroup {
    pub count: u32,
    /// Delay before the first troop of this group (seconds).
    #[serde(default)]
    pub overall_delay: f64,
    /// Delay between consecutive troops of this group (seconds).
    #[serde(default)]
    pub unit_delay: f64,
    pub targets: TargetPriorities,
}

/// Reference to a target by kind and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub id: u32,
}

/// Target with an explicit priority weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedTarget {
    pub priority: f64,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub id: u32,
}

/// Weighted targets of a unit group, as a `{priority: target}` object or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetPriorities {
    Keyed(IndexMap<String, TargetRef>),
    Listed(Vec<PrioritizedTarget>),
}

impl TargetPriorities {
    /// Flatten into explicit weights, keeping document order.
    ///
    /// Fails with the offending key when a priority key is not a number.
    pub fn to_weighted(&self) -> Result<Vec<PrioritizedTarget>, String> {
        match self {
            TargetPriorities::Listed(list) => Ok(list.clone()),
            TargetPriorities::Keyed(map) => map
                .iter()
                .map(|(key, target)| {
                    key.trim()
                        .parse::<f64>()
                        .map(|priority| PrioritizedTarget {
                            priority,
                            kind: target.kind,
                            id: target.id,
                        })
                        .map_err(|_| key.clone())
                })
                .collect(),
        }
    }
}

/// A placed defensive building as supplied by the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefensiveBuildingSpec {
    pub id: u32,
    pub defensive_building_id: u32,
    #[serde(default)]
    pub territory_id: Option<u32>,
    #[serde(default)]
    pub in_game_picture: Option<String>,
    pub damage: f64,
    pub health_points: f64,
    pub max_health_points: f64,
    /// Uncalibrated range stat.
    pub range: f64,
    pub firerate: f64,
    /// Percent, 0 - 100.
    pub accuracy: f64,
    #[serde(default)]
    pub cone_angle: Option<f64>,
    #[serde(default = "default_true")]
    pub can_attack_ground: bool,
    #[serde(default = "default_true")]
    pub can_attack_air: bool,
    pub location: [f64; 2],
}

fn default_true() -> bool {
    true
}

/// Stat record of an attack unit type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub id: u32,
    #[serde(rename = "type", default)]
    pub unit_class: String,
    #[serde(default)]
    pub in_game_picture: Option<String>,
    pub health_points: f64,
    pub damage: f64,
    /// Uncalibrated speed stat.
    pub speed: f64,
    /// Percent, 0 - 100.
    pub accuracy: f64,
    #[serde(default)]
    pub is_air: bool,
}

/// Auxiliary building metadata, echoed back in the result with updated health.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingsData {
    #[serde(default)]
    pub cities: BTreeMap<u32, serde_json::Value>,
    #[serde(default)]
    pub defensive_buildings: BTreeMap<u32, DefensiveBuildingData>,
    #[serde(default)]
    pub generative_buildings: BTreeMap<u32, GenerativeBuildingData>,
}

/// Path offsets of a defensive building, keyed by path id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefensiveBuildingData {
    #[serde(default)]
    pub targeting_path_ids: BTreeMap<u32, f64>,
}

/// Economic building state and path offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeBuildingData {
    pub generative_building_id: u32,
    #[serde(deserialize_with = "lenient_f64")]
    pub hp: f64,
    #[serde(default)]
    pub targeting_path_ids: BTreeMap<u32, f64>,
}

/// Accept `12.5` as well as `"12.5"`.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

// ---- Result ----

/// Everything the client needs to replay the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    pub turret_info: Vec<TurretInfo>,
    pub troop_info: Vec<UnitType>,
    /// Arrivals at cities: territory id → unit type id → count.
    pub troops_at_end: BTreeMap<u32, BTreeMap<u32, u32>>,
    pub buildings_data: BuildingsData,
    pub troop_events: Vec<TroopEvent>,
    pub turret_events: Vec<TurretEvent>,
    pub generative_building_events: Vec<GenerativeBuildingEvent>,
    pub city_events: Vec<CityEvent>,
    pub outcome: SimOutcome,
}

/// Final snapshot of one turret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretInfo {
    pub id: u32,
    pub defensive_building_id: u32,
    pub in_game_picture: Option<String>,
    #[serde(rename = "type")]
    pub weapon: WeaponKind,
    pub position: Position,
    pub stats: WeaponStats,
    pub hp: f64,
    pub max_hp: f64,
    /// Final facing in degrees.
    pub angle: f64,
    pub state: TurretPhase,
}

/// Summary of how the run ended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimOutcome {
    pub ticks: u64,
    pub elapsed_secs: f64,
    /// The duration cap stopped the run before every troop finished.
    pub timed_out: bool,
    pub troops_total: u32,
    pub troops_destroyed: u32,
    pub troops_reached_target: u32,
    pub troops_reached_path_end: u32,
    pub turrets_destroyed: u32,
}
