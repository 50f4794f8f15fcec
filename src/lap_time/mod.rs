//! Lap-time objective
//!
//! A racing line is smoothed by a cubic spline, curvature gives the corner
//! radius at every sample, and the speed there is the lower of the vehicle's
//! top speed and the grip-limited cornering speed `sqrt(mu * r * g)`.

pub mod spline;

use ndarray::Array1;
use serde::Serialize;

use crate::config::VehicleConfig;
use crate::error::RacingLineResult;
use crate::geometry::Point;
use spline::{gradient, ParametricSpline};

/// Speed and position along a sampled racing line.
#[derive(Debug, Clone, Serialize)]
pub struct LapProfile {
    pub lap_time: f64,
    pub speed: Array1<f64>,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
}

/// Point-mass vehicle with a friction-limited cornering speed.
#[derive(Debug, Clone, PartialEq)]
pub struct LapTimeModel {
    pub friction: f64,
    pub gravity: f64,
    pub max_speed: f64,
    pub samples: usize,
}

impl LapTimeModel {
    pub fn new(vehicle: &VehicleConfig, samples: usize) -> Self {
        Self {
            friction: vehicle.friction,
            gravity: vehicle.gravity,
            max_speed: vehicle.max_speed,
            samples: samples.max(2),
        }
    }

    /// Cornering speed for a radius. An undefined radius (NaN) yields the
    /// top speed.
    pub fn corner_speed(&self, radius: f64) -> f64 {
        (self.friction * radius * self.gravity)
            .sqrt()
            .min(self.max_speed)
    }

    pub fn lap_time(&self, racing_line: &[Point]) -> RacingLineResult<f64> {
        self.profile(racing_line).map(|p| p.lap_time)
    }

    pub fn profile(&self, racing_line: &[Point]) -> RacingLineResult<LapProfile> {
        let spline = ParametricSpline::through(racing_line)?;
        let (x, y) = spline.sample(self.samples);

        let dx = gradient(&x);
        let dy = gradient(&y);
        let d2x = gradient(&dx);
        let d2y = gradient(&dy);

        let speed = Array1::from_shape_fn(x.len(), |i| {
            let speed_sq = dx[i] * dx[i] + dy[i] * dy[i];
            let curvature = (dx[i] * d2y[i] - d2x[i] * dy[i]).abs() / speed_sq.powf(1.5);
            self.corner_speed(1.0 / curvature)
        });

        let lap_time = (0..x.len().saturating_sub(1))
            .map(|i| (x[i + 1] - x[i]).hypot(y[i + 1] - y[i]) / speed[i])
            .sum();

        Ok(LapProfile {
            lap_time,
            speed,
            x,
            y,
        })
    }
}

impl Default for LapTimeModel {
    fn default() -> Self {
        Self::new(&VehicleConfig::default(), crate::config::DEFAULT_SPLINE_SAMPLES)
    }
}
