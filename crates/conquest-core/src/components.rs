//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in the engine systems,
//! which are the only code that mutates them.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// One weighted destination a troop may be sent toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub kind: TargetKind,
    pub target_id: u32,
    /// Raw priority weight (positive). Renormalized over live targets at selection.
    pub priority: f64,
    /// Fractional path position at which the troop counts as arrived.
    pub target_length: f64,
}

/// The target a troop is currently heading for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetAssignment {
    Target(TargetDescriptor),
    /// Every candidate is dead; the troop walks to the end of its path.
    NoTarget,
}

/// Attack troop moving along a path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Troop {
    pub id: u32,
    pub attack_unit_id: u32,
    pub path_id: u32,
    pub territory_id: u32,
    pub outpost_id: Option<u32>,
    /// Simulated second at which the troop enters its path.
    pub start_time: f64,
    pub phase: TroopPhase,
    pub health: f64,
    pub max_health: f64,
    /// Map units per simulated second.
    pub speed: f64,
    /// Damage delivered to a building on arrival.
    pub damage: f64,
    pub is_air: bool,
    /// Fractional path position, 0.0 - 1.0.
    pub t: f64,
    /// Set the first tick the troop moves.
    pub position: Option<Position>,
    /// Candidate targets in request order.
    pub targets: Vec<TargetDescriptor>,
    pub assignment: TargetAssignment,
}

impl Troop {
    /// On the map and still in play.
    pub fn is_active(&self) -> bool {
        self.phase == TroopPhase::Moving
    }
}

/// Weapon characteristics of a turret, already calibrated to map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: f64,
    /// Map units.
    pub range: f64,
    /// Shots per simulated second.
    pub firerate: f64,
    /// Hit probability (0.0 - 1.0).
    pub accuracy: f64,
    /// Full cone width in degrees; `None` or non-positive means single target.
    pub cone_angle: Option<f64>,
}

impl WeaponStats {
    pub fn weapon_kind(&self) -> WeaponKind {
        match self.cone_angle {
            Some(angle) if angle > 0.0 => WeaponKind::Cone,
            _ => WeaponKind::SingleTarget,
        }
    }

    /// Seconds between shots.
    pub fn reload_secs(&self) -> f64 {
        1.0 / self.firerate
    }
}

/// Defensive structure with a weapon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub id: u32,
    pub defensive_building_id: u32,
    pub in_game_picture: Option<String>,
    pub position: Position,
    pub stats: WeaponStats,
    pub health: f64,
    pub max_health: f64,
    pub phase: TurretPhase,
    /// Current facing in degrees.
    pub facing_deg: f64,
    pub last_fire_time: f64,
    pub can_attack_ground: bool,
    pub can_attack_air: bool,
}

impl Turret {
    pub fn is_alive(&self) -> bool {
        self.phase != TurretPhase::Destroyed
    }

    /// Whether the weapon can hit a troop of the given domain.
    pub fn can_engage(&self, is_air: bool) -> bool {
        if is_air {
            self.can_attack_air
        } else {
            self.can_attack_ground
        }
    }
}

/// Economic building that can be attacked but does not fight back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeBuilding {
    pub id: u32,
    pub generative_building_id: u32,
    pub health: f64,
    pub destroyed: bool,
}
