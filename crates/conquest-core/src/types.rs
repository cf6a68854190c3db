//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in map coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.as_vec().distance(other.as_vec())
    }

    /// Bearing to another position in degrees, measured from the +x axis
    /// counter-clockwise, in (-180, 180].
    pub fn bearing_deg_to(&self, other: &Position) -> f64 {
        let d = other.as_vec() - self.as_vec();
        normalize_degrees(d.y.atan2(d.x).to_degrees())
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    ///
    /// Elapsed time is derived from the tick count so it never accumulates
    /// rounding drift.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * dt;
    }
}

/// Wrap an angle in degrees into (-180, 180].
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Signed smallest difference `a - b` in degrees, in (-180, 180].
pub fn angle_diff_deg(a: f64, b: f64) -> f64 {
    normalize_degrees(a - b)
}
