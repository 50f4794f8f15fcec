use super::Point;
use crate::error::{RacingLineError, RacingLineResult};

/// Points closer than this are treated as the same vertex.
const VERTEX_EPSILON: f64 = 1e-9;

/// Mitre joins are cut at this multiple of the offset distance.
const MITRE_LIMIT: f64 = 5.0;

/// Side of a polyline relative to its direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// An ordered sequence of at least two distinct vertices.
///
/// A polyline whose first and last vertices coincide is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Builds a polyline, dropping consecutive duplicate vertices.
    pub fn new(points: Vec<Point>) -> RacingLineResult<Self> {
        let mut deduped: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(RacingLineError::DegenerateTrack(format!(
                    "non-finite vertex {}",
                    p
                )));
            }
            if deduped
                .last()
                .map_or(true, |last| last.distance(&p) > VERTEX_EPSILON)
            {
                deduped.push(p);
            }
        }

        if deduped.len() < 2 {
            return Err(RacingLineError::DegenerateTrack(
                "polyline needs at least two distinct vertices".to_string(),
            ));
        }

        Ok(Polyline { points: deduped })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        self.points.len() > 2 && first.distance(&last) <= VERTEX_EPSILON
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    /// Point at arc length `distance` from the start, clamped to the ends.
    pub fn interpolate(&self, distance: f64) -> Point {
        if distance <= 0.0 {
            return self.points[0];
        }

        let mut remaining = distance;
        for w in self.points.windows(2) {
            let seg = w[0].distance(&w[1]);
            if remaining <= seg {
                return w[0] + (w[1] - w[0]) * (remaining / seg);
            }
            remaining -= seg;
        }

        self.points[self.points.len() - 1]
    }

    /// `n` points evenly spaced along the polyline, both ends included.
    pub fn resample(&self, n: usize) -> Vec<Point> {
        match n {
            0 => Vec::new(),
            1 => vec![self.points[0]],
            _ => {
                let length = self.length();
                (0..n)
                    .map(|i| self.interpolate(length * i as f64 / (n - 1) as f64))
                    .collect()
            }
        }
    }

    /// The vertex nearest to `target`. Ties keep the earliest vertex.
    pub fn closest_point(&self, target: &Point) -> Point {
        closest_point(&self.points, target)
    }

    /// Offsets every vertex by `distance` to the given side.
    ///
    /// Inner vertices are joined with mitres limited to `MITRE_LIMIT *
    /// distance`. Closed polylines are offset as rings and stay closed.
    pub fn parallel_offset(&self, distance: f64, side: Side) -> RacingLineResult<Polyline> {
        let closed = self.is_closed();
        let ring: &[Point] = if closed {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        };
        let n = ring.len();
        let sign = match side {
            Side::Left => 1.0,
            Side::Right => -1.0,
        };

        let normal = |a: Point, b: Point| -> Option<Point> {
            (b - a).normalized().map(|d| d.perp() * sign)
        };

        let mut offset: Vec<Point> = Vec::with_capacity(self.points.len());
        for i in 0..n {
            let p = ring[i];
            let incoming = if i > 0 {
                normal(ring[i - 1], p)
            } else if closed {
                normal(ring[n - 1], p)
            } else {
                None
            };
            let outgoing = if i + 1 < n {
                normal(p, ring[i + 1])
            } else if closed {
                normal(p, ring[0])
            } else {
                None
            };

            let shift = match (incoming, outgoing) {
                (Some(n1), Some(n2)) => mitre(n1, n2, distance),
                (Some(n1), None) | (None, Some(n1)) => n1 * distance,
                (None, None) => {
                    return Err(RacingLineError::DegenerateTrack(
                        "vertex without adjacent segments".to_string(),
                    ))
                }
            };
            offset.push(p + shift);
        }

        if closed {
            offset.push(offset[0]);
        }

        Polyline::new(offset)
    }
}

/// The point of `candidates` nearest to `target`; ties keep the earliest.
pub fn closest_point(candidates: &[Point], target: &Point) -> Point {
    let mut best = candidates[0];
    let mut best_distance = target.distance(&best);

    for p in &candidates[1..] {
        let d = target.distance(p);
        if d < best_distance {
            best = *p;
            best_distance = d;
        }
    }

    best
}

fn mitre(n1: Point, n2: Point, distance: f64) -> Point {
    match (n1 + n2).normalized() {
        Some(bisector) => {
            let cos_half = bisector.dot(&n1);
            let length = if cos_half > 1.0 / MITRE_LIMIT {
                distance / cos_half
            } else {
                distance * MITRE_LIMIT
            };
            bisector * length
        }
        // The path doubles back on itself.
        None => n1 * distance,
    }
}
