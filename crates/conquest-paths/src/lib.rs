//! Path geometry for the conquest combat simulator.
//!
//! Turns the raw waypoints stored in map files into smooth resampled
//! curves with per-sample headings and a total length, and precomputes
//! the path offsets at which troops reach each building slot.

pub mod error;
pub mod map;
pub mod offsets;
pub mod path;
pub mod spline;

pub use conquest_core as core;
pub use error::PathError;
pub use map::{MapCatalog, MapDocument};
pub use path::{PathData, PathPoint};

#[cfg(test)]
mod tests;
