//! Resampled path curves with headings and length.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use conquest_core::constants::MIN_PATH_POINTS;
use conquest_core::types::{normalize_degrees, Position};

use crate::error::PathError;
use crate::spline::NaturalCubicSpline;

/// One sample on a resampled path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    /// Bearing toward the next sample in degrees, (-180, 180].
    /// The last sample repeats the bearing of the one before it.
    pub angle: f64,
}

/// A smoothed, resampled path. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub path_id: u32,
    /// Sum of distances between consecutive samples.
    pub length: f64,
    pub points: Vec<PathPoint>,
}

impl PathData {
    /// Fit a natural cubic spline through `control_points` and resample it.
    pub fn from_control_points(
        path_id: u32,
        control_points: &[Position],
        samples: usize,
    ) -> Result<Self, PathError> {
        if samples < MIN_PATH_POINTS {
            return Err(PathError::TooFewSamples(samples));
        }
        if control_points.len() < MIN_PATH_POINTS {
            return Err(PathError::TooFewControlPoints {
                path_id,
                count: control_points.len(),
            });
        }
        if control_points
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(PathError::NonFiniteControlPoint { path_id });
        }

        let knots: Vec<DVec2> = control_points.iter().map(Position::as_vec).collect();
        let spline = NaturalCubicSpline::fit(&knots).ok_or(PathError::TooFewControlPoints {
            path_id,
            count: knots.len(),
        })?;
        let smooth = spline.resample(samples);

        let points = with_headings(&smooth);
        let length = polyline_length(&points);

        Ok(Self {
            path_id,
            length,
            points,
        })
    }

    /// Index of the sample nearest to fractional position `t`.
    pub fn sample_index(&self, t: f64) -> usize {
        let last = self.points.len().saturating_sub(1);
        ((t.clamp(0.0, 1.0) * last as f64).round() as usize).min(last)
    }

    /// Position of the sample nearest to `t`.
    pub fn position_at(&self, t: f64) -> Position {
        let p = self.points[self.sample_index(t)];
        Position::new(p.x, p.y)
    }

    /// Heading of the sample nearest to `t`, in degrees.
    pub fn heading_at(&self, t: f64) -> f64 {
        self.points[self.sample_index(t)].angle
    }

    pub fn start(&self) -> Position {
        self.position_at(0.0)
    }

    pub fn end(&self) -> Position {
        self.position_at(1.0)
    }
}

/// Attach headings: each sample faces the next one, the last repeats its predecessor.
fn with_headings(samples: &[DVec2]) -> Vec<PathPoint> {
    let mut points: Vec<PathPoint> = samples
        .windows(2)
        .map(|pair| {
            let d = pair[1] - pair[0];
            PathPoint {
                x: pair[0].x,
                y: pair[0].y,
                angle: normalize_degrees(d.y.atan2(d.x).to_degrees()),
            }
        })
        .collect();

    if let Some(last) = samples.last() {
        let angle = points.last().map_or(0.0, |p| p.angle);
        points.push(PathPoint {
            x: last.x,
            y: last.y,
            angle,
        });
    }
    points
}

/// Sum of Euclidean distances between consecutive points.
pub fn polyline_length(points: &[PathPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| DVec2::new(pair[1].x - pair[0].x, pair[1].y - pair[0].y).length())
        .sum()
}
