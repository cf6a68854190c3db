//! Map documents and the read-only catalog the engine resolves paths from.
//!
//! A map file nests continents → territories → paths and building slots.
//! Only the geometry is interpreted here; everything else in the file is
//! ignored.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use conquest_core::constants::{DEMO_MAP_ID, DEMO_PATH_ID, DEMO_PATH_POINTS};
use conquest_core::types::Position;

use crate::error::PathError;
use crate::path::PathData;

/// Parsed map file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub continents: BTreeMap<u32, Continent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    #[serde(default)]
    pub continent_territories: BTreeMap<u32, Territory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Territory {
    #[serde(default)]
    pub paths: BTreeMap<u32, RawPath>,
    #[serde(default)]
    pub building_slots: BTreeMap<u32, BuildingSlot>,
}

/// Waypoints of one path as drawn on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPath {
    pub points: Vec<Position>,
}

/// A place a building can stand, and the paths whose troops can reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSlot {
    pub location: [f64; 2],
    #[serde(default)]
    pub targeting_path_ids: Vec<u32>,
}

impl MapDocument {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a map file.
    pub fn load(path: &Path) -> Result<Self, PathError> {
        let text = fs::read_to_string(path).map_err(|source| PathError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| PathError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Every territory on the map, keyed by territory id.
    pub fn territories(&self) -> impl Iterator<Item = (u32, &Territory)> {
        self.continents
            .values()
            .flat_map(|c| c.continent_territories.iter().map(|(id, t)| (*id, t)))
    }

    /// Raw waypoints of a path, wherever on the map it is defined.
    pub fn control_points(&self, path_id: u32) -> Option<&[Position]> {
        self.territories()
            .find_map(|(_, territory)| territory.paths.get(&path_id))
            .map(|raw| raw.points.as_slice())
    }

    /// Single-territory map containing only the built-in demo path.
    pub fn demo() -> Self {
        let raw = RawPath {
            points: DEMO_PATH_POINTS
                .iter()
                .map(|&(x, y)| Position::new(x, y))
                .collect(),
        };
        let territory = Territory {
            paths: BTreeMap::from([(DEMO_PATH_ID, raw)]),
            building_slots: BTreeMap::new(),
        };
        let continent = Continent {
            continent_territories: BTreeMap::from([(1, territory)]),
        };
        Self {
            continents: BTreeMap::from([(1, continent)]),
        }
    }
}

/// Read-only set of maps, shareable across concurrent simulation runs.
#[derive(Debug, Clone, Default)]
pub struct MapCatalog {
    maps: HashMap<u32, MapDocument>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding only the demo map under `DEMO_MAP_ID`.
    pub fn with_demo_map() -> Self {
        let mut catalog = Self::new();
        catalog.insert(DEMO_MAP_ID, MapDocument::demo());
        catalog
    }

    /// Load every `map<id>.json` file in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self, PathError> {
        let io_err = |source| PathError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut catalog = Self::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let Some(map_id) = map_id_from_file_name(&path) else {
                continue;
            };
            catalog.insert(map_id, MapDocument::load(&path)?);
            debug!(map_id, file = %path.display(), "loaded map");
        }
        info!(dir = %dir.display(), maps = catalog.maps.len(), "map catalog ready");
        Ok(catalog)
    }

    pub fn insert(&mut self, map_id: u32, map: MapDocument) {
        self.maps.insert(map_id, map);
    }

    pub fn map(&self, map_id: u32) -> Result<&MapDocument, PathError> {
        self.maps.get(&map_id).ok_or(PathError::MapNotFound { map_id })
    }

    /// Resample one path of one map.
    pub fn path_data(&self, map_id: u32, path_id: u32, samples: usize) -> Result<PathData, PathError> {
        let points = self
            .map(map_id)?
            .control_points(path_id)
            .ok_or(PathError::PathNotFound { map_id, path_id })?;
        PathData::from_control_points(path_id, points, samples)
    }

    /// Resample several paths of one map, keyed by path id.
    pub fn paths_data(
        &self,
        map_id: u32,
        path_ids: impl IntoIterator<Item = u32>,
        samples: usize,
    ) -> Result<BTreeMap<u32, PathData>, PathError> {
        path_ids
            .into_iter()
            .map(|path_id| {
                self.path_data(map_id, path_id, samples)
                    .map(|data| (path_id, data))
            })
            .collect()
    }
}

/// `map12.json` → 12.
fn map_id_from_file_name(path: &Path) -> Option<u32> {
    if path.extension()? != "json" {
        return None;
    }
    path.file_stem()?.to_str()?.strip_prefix("map")?.parse().ok()
}
