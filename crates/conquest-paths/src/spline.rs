//! Natural cubic spline through 2D control points.
//!
//! Knots are spaced uniformly over t in [0, 1]. Both axes share the same
//! tridiagonal system, so the second-derivative moments are solved once
//! with vector-valued right-hand sides.

use glam::DVec2;

/// Interpolating curve with zero curvature at both ends.
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    points: Vec<DVec2>,
    /// Second derivatives at each knot.
    moments: Vec<DVec2>,
    /// Knot spacing in t.
    h: f64,
}

impl NaturalCubicSpline {
    /// Fit a spline through `points`. Returns `None` with fewer than 2 points.
    ///
    /// Two points give a straight segment.
    pub fn fit(points: &[DVec2]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len();
        let h = 1.0 / (n - 1) as f64;

        let mut moments = vec![DVec2::ZERO; n];
        if n > 2 {
            let interior = solve_interior_moments(points, h);
            moments[1..n - 1].copy_from_slice(&interior);
        }

        Some(Self {
            points: points.to_vec(),
            moments,
            h,
        })
    }

    /// Evaluate the curve at `t` (clamped to [0, 1]).
    pub fn sample(&self, t: f64) -> DVec2 {
        let t = t.clamp(0.0, 1.0);
        let last_segment = self.points.len() - 2;
        let i = ((t / self.h).floor() as usize).min(last_segment);

        let t0 = i as f64 * self.h;
        let a = (t0 + self.h) - t;
        let b = t - t0;
        let h = self.h;
        let (y0, y1) = (self.points[i], self.points[i + 1]);
        let (m0, m1) = (self.moments[i], self.moments[i + 1]);

        m0 * (a * a * a / (6.0 * h))
            + m1 * (b * b * b / (6.0 * h))
            + (y0 / h - m0 * (h / 6.0)) * a
            + (y1 / h - m1 * (h / 6.0)) * b
    }

    /// `count` samples at evenly spaced t from 0 to 1 inclusive.
    pub fn resample(&self, count: usize) -> Vec<DVec2> {
        match count {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => {
                let step = 1.0 / (count - 1) as f64;
                (0..count).map(|i| self.sample(i as f64 * step)).collect()
            }
        }
    }
}

/// Thomas algorithm for `M[i-1] + 4 M[i] + M[i+1] = 6/h^2 (y[i+1] - 2 y[i] + y[i-1])`
/// with `M[0] = M[n-1] = 0`.
fn solve_interior_moments(points: &[DVec2], h: f64) -> Vec<DVec2> {
    let m = points.len() - 2;
    let scale = 6.0 / (h * h);
    let rhs: Vec<DVec2> = (1..=m)
        .map(|i| (points[i + 1] - points[i] * 2.0 + points[i - 1]) * scale)
        .collect();

    let mut c_prime = vec![0.0; m];
    let mut d_prime = vec![DVec2::ZERO; m];
    c_prime[0] = 1.0 / 4.0;
    d_prime[0] = rhs[0] / 4.0;
    for i in 1..m {
        let denom = 4.0 - c_prime[i - 1];
        c_prime[i] = 1.0 / denom;
        d_prime[i] = (rhs[i] - d_prime[i - 1]) / denom;
    }

    let mut x = vec![DVec2::ZERO; m];
    x[m - 1] = d_prime[m - 1];
    for i in (0..m - 1).rev() {
        x[i] = d_prime[i] - x[i + 1] * c_prime[i];
    }
    x
}
