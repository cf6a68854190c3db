//! Combat outcome simulator.
//!
//! Owns the hecs world of troops, turrets and economic buildings, steps
//! it at a fixed timestep, and assembles the replay log and end state.

pub mod engine;
pub mod error;
pub mod scenario;
pub mod systems;
pub mod targeting;
pub mod world_setup;

pub use conquest_core as core;
pub use conquest_paths as paths;
pub use engine::{simulate, SimConfig, SimulationEngine};
pub use error::SimError;
