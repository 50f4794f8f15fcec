//! Interpolating cubic splines through racing line points

use ndarray::Array1;

use crate::error::{RacingLineError, RacingLineResult};
use crate::geometry::Point;

/// Natural cubic spline `y(t)` through strictly increasing knots.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    /// Second derivative at every knot; zero at both ends.
    moments: Vec<f64>,
}

impl CubicSpline {
    /// Caller guarantees `knots` is strictly increasing and has the same
    /// length as `values` (at least two).
    fn natural(knots: Vec<f64>, values: Vec<f64>) -> Self {
        let n = knots.len();
        let mut moments = vec![0.0; n];

        if n > 2 {
            let h: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();

            // Thomas algorithm over the interior knots 1..n-1.
            let mut c_prime = vec![0.0; n];
            let mut d_prime = vec![0.0; n];
            for i in 1..n - 1 {
                let lower = h[i - 1];
                let diag = 2.0 * (h[i - 1] + h[i]);
                let upper = h[i];
                let rhs = 6.0
                    * ((values[i + 1] - values[i]) / h[i] - (values[i] - values[i - 1]) / h[i - 1]);

                let denom = diag - lower * c_prime[i - 1];
                c_prime[i] = upper / denom;
                d_prime[i] = (rhs - lower * d_prime[i - 1]) / denom;
            }

            for i in (1..n - 1).rev() {
                moments[i] = d_prime[i] - c_prime[i] * moments[i + 1];
            }
        }

        Self {
            knots,
            values,
            moments,
        }
    }

    pub fn eval(&self, t: f64) -> f64 {
        let n = self.knots.len();
        let seg = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(n - 2);

        let h = self.knots[seg + 1] - self.knots[seg];
        let a = (self.knots[seg + 1] - t) / h;
        let b = (t - self.knots[seg]) / h;

        a * self.values[seg]
            + b * self.values[seg + 1]
            + ((a * a * a - a) * self.moments[seg] + (b * b * b - b) * self.moments[seg + 1]) * h * h
                / 6.0
    }
}

/// Planar curve through a sequence of points, parameterized by normalized
/// chord length on `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ParametricSpline {
    x: CubicSpline,
    y: CubicSpline,
}

impl ParametricSpline {
    pub fn through(points: &[Point]) -> RacingLineResult<Self> {
        if points.len() < 2 {
            return Err(RacingLineError::SplineTooFewPoints {
                min: 2,
                got: points.len(),
            });
        }

        let mut knots = Vec::with_capacity(points.len());
        knots.push(0.0);
        for (i, w) in points.windows(2).enumerate() {
            let step = w[0].distance(&w[1]);
            if step <= 0.0 || !step.is_finite() {
                return Err(RacingLineError::SplineDuplicatePoint(i, i + 1));
            }
            knots.push(knots[i] + step);
        }

        let total = knots[knots.len() - 1];
        for k in knots.iter_mut() {
            *k /= total;
        }

        let xs = points.iter().map(|p| p.x).collect();
        let ys = points.iter().map(|p| p.y).collect();

        Ok(Self {
            x: CubicSpline::natural(knots.clone(), xs),
            y: CubicSpline::natural(knots, ys),
        })
    }

    pub fn eval(&self, t: f64) -> Point {
        Point::new(self.x.eval(t), self.y.eval(t))
    }

    /// `n` samples at evenly spaced parameter values, both ends included.
    pub fn sample(&self, n: usize) -> (Array1<f64>, Array1<f64>) {
        let params = Array1::linspace(0.0, 1.0, n);
        (params.mapv(|t| self.x.eval(t)), params.mapv(|t| self.y.eval(t)))
    }
}

/// Finite differences with unit spacing: central in the interior,
/// one-sided at the ends.
pub fn gradient(f: &Array1<f64>) -> Array1<f64> {
    let n = f.len();
    if n < 2 {
        return Array1::zeros(n);
    }

    Array1::from_shape_fn(n, |i| {
        if i == 0 {
            f[1] - f[0]
        } else if i == n - 1 {
            f[n - 1] - f[n - 2]
        } else {
            (f[i + 1] - f[i - 1]) / 2.0
        }
    })
}
