//! Events emitted by the simulation for client-side replay.
//!
//! Every log is append-only. Within a tick events appear in emission order,
//! and timestamps never decrease along a log.

use serde::{Deserialize, Serialize};

/// Something that happened to a troop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TroopEvent {
    pub timestamp: f64,
    pub troop_id: u32,
    pub attack_unit_id: u32,
    pub path_id: u32,
    #[serde(flatten)]
    pub kind: TroopEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TroopEventKind {
    Start,
    Damage { damage: f64, remaining_health: f64 },
    Death,
    ReachTarget,
    ReachedEndOfPath,
}

/// Something a turret did or suffered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretEvent {
    pub timestamp: f64,
    pub turret_id: u32,
    pub defensive_building_id: u32,
    #[serde(flatten)]
    pub kind: TurretEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TurretEventKind {
    /// New facing in degrees.
    Rotate { angle: f64 },
    Fire,
    Damage { damage: f64, remaining_health: f64 },
    Destroyed,
}

/// Damage to an economic building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerativeBuildingEvent {
    pub timestamp: f64,
    pub building_id: u32,
    pub generative_building_id: u32,
    #[serde(flatten)]
    pub kind: BuildingEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BuildingEventKind {
    Damage { damage: f64, remaining_health: f64 },
    Destroyed,
}

/// Troop arrival at a city. Cities only count arrivals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEvent {
    pub timestamp: f64,
    pub city_id: u32,
    #[serde(flatten)]
    pub kind: CityEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CityEventKind {
    Arrival { troop_id: u32, attack_unit_id: u32 },
}

/// All event logs of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub troops: Vec<TroopEvent>,
    pub turrets: Vec<TurretEvent>,
    pub generative_buildings: Vec<GenerativeBuildingEvent>,
    pub cities: Vec<CityEvent>,
}
