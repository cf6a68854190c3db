//! Simulation constants and tuning parameters.

/// Default RNG seed when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 42;

/// Fixed simulation step in simulated seconds.
pub const DEFAULT_TIMESTEP_SECS: f64 = 0.1;

/// Hard cap on simulated duration for a full attack run (seconds).
pub const DEFAULT_MAX_DURATION_SECS: f64 = 2500.0;

/// Hard cap used by the single-turret demo scenarios (seconds).
pub const SCENARIO_MAX_DURATION_SECS: f64 = 300.0;

/// Number of samples along each resampled path.
pub const DEFAULT_PATH_SAMPLES: usize = 1000;

/// Minimum number of samples (and of control points) a path can have.
pub const MIN_PATH_POINTS: usize = 2;

// --- Content calibration ---

/// Unit speed stat → map units per simulated second.
pub const DEFAULT_SPEED_SCALE: f64 = 25.0;

/// Turret range stat → map units.
pub const DEFAULT_RANGE_SCALE: f64 = 100.0;

/// Accuracy stats are supplied as percentages.
pub const ACCURACY_PERCENT: f64 = 100.0;

// --- Targeting ---

/// Path offset at which a troop targeting a city counts as arrived.
pub const CITY_TARGET_LENGTH: f64 = 1.0;

/// Slack applied to the fire-rate gate so a reload that lands exactly on a
/// tick boundary is not lost to floating-point rounding.
pub const FIRE_GATE_EPSILON: f64 = 1e-9;

// --- Demo map ---

/// Map id under which the built-in demo path is registered.
pub const DEMO_MAP_ID: u32 = 0;

/// Path id of the built-in demo path.
pub const DEMO_PATH_ID: u32 = 2;

/// Control points of the built-in demo path (an S-curve through the map center).
pub const DEMO_PATH_POINTS: [(f64, f64); 5] = [
    (500.0, 1100.0),
    (300.0, 1306.25),
    (700.0, 1512.5),
    (300.0, 1718.75),
    (500.0, 1925.0),
];
