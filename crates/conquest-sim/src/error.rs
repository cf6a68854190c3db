//! Errors that reject a simulation request before stepping begins.

use thiserror::Error;

use conquest_core::enums::TargetKind;
use conquest_paths::PathError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("attack unit type {unit_type_id} is not in the request")]
    UnknownUnitType { unit_type_id: u32 },
    #[error("{kind} {id} is not in the buildings data")]
    UnknownBuilding { kind: TargetKind, id: u32 },
    #[error("{kind} {id} has no offset for path {path_id}")]
    MissingPathOffset {
        kind: TargetKind,
        id: u32,
        path_id: u32,
    },
    #[error("malformed target for unit type {unit_type_id} in wave {wave}: {reason}")]
    MalformedTarget {
        wave: usize,
        unit_type_id: u32,
        reason: String,
    },
    #[error("attack unit type {unit_type_id}: {reason}")]
    InvalidUnitType { unit_type_id: u32, reason: String },
    #[error("turret {turret_id}: {reason}")]
    InvalidTurret { turret_id: u32, reason: String },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
