//! Simulation engine — the core of the combat simulator.
//!
//! `SimulationEngine` owns the hecs world, runs all systems at a fixed
//! timestep, and assembles the `SimulationResult`. Completely headless
//! and single-threaded; each run owns its world, RNG and logs.

use std::collections::{BTreeMap, BTreeSet};

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use conquest_core::components::Troop;
use conquest_core::constants::*;
use conquest_core::events::EventLog;
use conquest_core::state::{BuildingsData, SimOutcome, SimulationRequest, SimulationResult, UnitType};
use conquest_core::types::SimTime;
use conquest_paths::{MapCatalog, PathData};

use crate::error::SimError;
use crate::systems;
use crate::world_setup::{self, WorldIndex};

/// Configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub timestep_secs: f64,
    /// Simulated-duration cap. Reaching it is a timeout, not an error.
    pub max_duration_secs: f64,
    /// Resample resolution of every path.
    pub path_samples: usize,
    /// Unit speed stat → map units per second.
    pub speed_scale: f64,
    /// Turret range stat → map units.
    pub range_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            timestep_secs: DEFAULT_TIMESTEP_SECS,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            path_samples: DEFAULT_PATH_SAMPLES,
            speed_scale: DEFAULT_SPEED_SCALE,
            range_scale: DEFAULT_RANGE_SCALE,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.timestep_secs) {
            return Err(SimError::InvalidConfig("timestep must be positive".into()));
        }
        if !positive(self.max_duration_secs) {
            return Err(SimError::InvalidConfig("max duration must be positive".into()));
        }
        if self.path_samples < MIN_PATH_POINTS {
            return Err(SimError::InvalidConfig(format!(
                "path samples must be at least {MIN_PATH_POINTS}"
            )));
        }
        if !positive(self.speed_scale) || !positive(self.range_scale) {
            return Err(SimError::InvalidConfig("scales must be positive".into()));
        }
        Ok(())
    }

    /// Upper bound on executed ticks.
    pub fn max_ticks(&self) -> u64 {
        (self.max_duration_secs / self.timestep_secs).ceil() as u64
    }
}

/// The simulation engine. Owns the ECS world and all run state.
pub struct SimulationEngine {
    world: World,
    index: WorldIndex,
    paths: BTreeMap<u32, PathData>,
    time: SimTime,
    /// Clock of the last executed tick.
    last_tick: SimTime,
    rng: ChaCha8Rng,
    timestep_secs: f64,
    max_ticks: u64,
    events: EventLog,
    troops_at_end: BTreeMap<u32, BTreeMap<u32, u32>>,
    troop_info: Vec<UnitType>,
    buildings_data: BuildingsData,
    ticks_run: u64,
    finished: bool,
    timed_out: bool,
}

impl SimulationEngine {
    /// Validate the request, resolve its paths and build the world.
    ///
    /// Every lookup failure is reported here; no tick runs on a bad request.
    pub fn new(
        config: SimConfig,
        request: &SimulationRequest,
        maps: &MapCatalog,
    ) -> Result<Self, SimError> {
        config.validate()?;
        maps.map(request.map_id)?;

        let path_ids: BTreeSet<u32> = request.attack_waves.iter().map(|w| w.path_id).collect();
        let paths = maps.paths_data(request.map_id, path_ids, config.path_samples)?;

        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let index = world_setup::populate_world(&mut world, request, &paths, &config, &mut rng)?;

        info!(
            seed = config.seed,
            map_id = request.map_id,
            paths = paths.len(),
            troops = index.troops().len(),
            turrets = index.turrets().len(),
            "simulation ready"
        );

        Ok(Self {
            world,
            index,
            paths,
            time: SimTime::default(),
            last_tick: SimTime::default(),
            rng,
            timestep_secs: config.timestep_secs,
            max_ticks: config.max_ticks(),
            events: EventLog::default(),
            troops_at_end: world_setup::arrival_counters(request),
            troop_info: world_setup::used_unit_types(request),
            buildings_data: request.buildings_data.clone(),
            ticks_run: 0,
            finished: false,
            timed_out: false,
        })
    }

    /// Advance the simulation by one tick. Returns `false` once the run has
    /// stopped, either because every troop is done or the cap was reached.
    pub fn tick(&mut self) -> bool {
        if self.finished {
            return false;
        }

        self.run_systems();
        self.last_tick = self.time;
        self.ticks_run += 1;

        if self.all_troops_done() {
            self.finished = true;
            return false;
        }

        self.time.advance(self.timestep_secs);
        if self.time.tick >= self.max_ticks {
            self.finished = true;
            self.timed_out = true;
            warn!(
                ticks = self.ticks_run,
                elapsed_secs = self.last_tick.elapsed_secs,
                "duration cap reached before every troop finished"
            );
            return false;
        }
        true
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn index(&self) -> &WorldIndex {
        &self.index
    }

    /// Summary of the run so far.
    pub fn outcome(&self) -> SimOutcome {
        systems::snapshot::build_outcome(
            &self.world,
            &self.index,
            self.last_tick,
            self.ticks_run,
            self.timed_out,
        )
    }

    /// Stop stepping and assemble the result.
    pub fn finish(self) -> SimulationResult {
        let result = systems::snapshot::build_result(
            &self.world,
            &self.index,
            self.events,
            self.troop_info,
            self.troops_at_end,
            self.buildings_data,
            self.last_tick,
            self.ticks_run,
            self.timed_out,
        );
        let outcome = &result.outcome;
        info!(
            ticks = outcome.ticks,
            elapsed_secs = outcome.elapsed_secs,
            timed_out = outcome.timed_out,
            destroyed = outcome.troops_destroyed,
            reached_target = outcome.troops_reached_target,
            reached_path_end = outcome.troops_reached_path_end,
            turrets_destroyed = outcome.turrets_destroyed,
            "simulation finished"
        );
        result
    }

    /// Run all systems in order: troops first, then turrets.
    fn run_systems(&mut self) {
        let clock = self.time.elapsed_secs;
        // 1. Movement, arrivals and retargeting
        systems::movement::run(
            &self.world,
            &self.index,
            &self.paths,
            &mut self.rng,
            &mut self.events,
            &mut self.troops_at_end,
            clock,
        );
        // 2. Turret tracking and fire
        systems::turrets::run(
            &self.world,
            &self.index,
            &mut self.rng,
            &mut self.events,
            clock,
        );
    }

    fn all_troops_done(&self) -> bool {
        self.index.troops().iter().all(|&entity| {
            self.world
                .get::<&Troop>(entity)
                .map_or(true, |troop| troop.phase.is_terminal())
        })
    }
}

/// Run a request to completion.
pub fn simulate(
    config: SimConfig,
    request: &SimulationRequest,
    maps: &MapCatalog,
) -> Result<SimulationResult, SimError> {
    let mut engine = SimulationEngine::new(config, request, maps)?;
    while engine.tick() {}
    Ok(engine.finish())
}
