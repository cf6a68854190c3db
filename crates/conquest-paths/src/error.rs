//! Lookup and geometry errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("map {map_id} not found")]
    MapNotFound { map_id: u32 },
    #[error("path {path_id} not found on map {map_id}")]
    PathNotFound { map_id: u32, path_id: u32 },
    #[error("path {path_id} has {count} control points, need at least 2")]
    TooFewControlPoints { path_id: u32, count: usize },
    #[error("requested {0} samples, need at least 2")]
    TooFewSamples(usize),
    #[error("path {path_id} has a non-finite control point")]
    NonFiniteControlPoint { path_id: u32 },
    #[error("building slot {slot_id} targets path {path_id}, which is not in its territory")]
    SlotPathMissing { slot_id: u32, path_id: u32 },
    #[error("failed to read map file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse map file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
