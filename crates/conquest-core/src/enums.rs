//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a troop can be sent toward.
///
/// Serialized as the integer tag used by the game API (1 = city,
/// 2 = defensive building, 3 = generative building).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TargetKind {
    City,
    DefensiveBuilding,
    GenerativeBuilding,
}

/// Rejected integer target tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownTargetKind(pub u8);

impl fmt::Display for UnknownTargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown target type {} (expected 1, 2 or 3)", self.0)
    }
}

impl TryFrom<u8> for TargetKind {
    type Error = UnknownTargetKind;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(TargetKind::City),
            2 => Ok(TargetKind::DefensiveBuilding),
            3 => Ok(TargetKind::GenerativeBuilding),
            other => Err(UnknownTargetKind(other)),
        }
    }
}

impl From<TargetKind> for u8 {
    fn from(kind: TargetKind) -> u8 {
        match kind {
            TargetKind::City => 1,
            TargetKind::DefensiveBuilding => 2,
            TargetKind::GenerativeBuilding => 3,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::City => "city",
            TargetKind::DefensiveBuilding => "defensive building",
            TargetKind::GenerativeBuilding => "generative building",
        };
        f.write_str(name)
    }
}

/// Troop lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TroopPhase {
    /// Waiting for its start time.
    #[default]
    Scheduled,
    /// On the path.
    Moving,
    /// Arrived at a live target and delivered its payload.
    ReachedTarget,
    /// Killed by turret fire.
    Destroyed,
    /// Ran out of targets and walked off the end of the path.
    ReachedPathEnd,
}

impl TroopPhase {
    /// Terminal phases are permanent.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TroopPhase::ReachedTarget | TroopPhase::Destroyed | TroopPhase::ReachedPathEnd
        )
    }
}

/// Turret activity, re-evaluated every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurretPhase {
    /// No live troop in range.
    #[default]
    Idle,
    /// Aiming at a troop but still reloading.
    Tracking,
    /// Fired this tick.
    Firing,
    /// Health reached zero. Terminal.
    Destroyed,
}

/// Weapon delivery type of a turret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Hits the aimed troop only.
    SingleTarget,
    /// Hits every in-range troop inside the firing cone (flamethrower).
    Cone,
}
