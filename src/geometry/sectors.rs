use ndarray::Array1;
use serde::Serialize;

use super::polyline::closest_point;
use super::{Point, Polyline, Side};
use crate::error::{RacingLineError, RacingLineResult};
use crate::track::Track;

/// Fewest sectors a closed racing line can be built from.
pub const MIN_SECTORS: usize = 3;

/// Centerline of a track with its two borders.
#[derive(Debug, Clone)]
pub struct TrackBorders {
    pub center: Polyline,
    pub inside: Polyline,
    pub outside: Polyline,
}

impl TrackBorders {
    /// Offsets the layout by half the track width to each side.
    pub fn from_track(track: &Track) -> RacingLineResult<Self> {
        track.validate()?;

        let center = Polyline::new(track.layout.clone())?;
        let half_width = track.width / 2.0;
        let inside = center.parallel_offset(half_width, Side::Left)?;
        let outside = center.parallel_offset(half_width, Side::Right)?;

        Ok(Self {
            center,
            inside,
            outside,
        })
    }
}

/// Cross-track segments, one per search dimension.
///
/// Sector `i` runs from `inside[i]` to `outside[i]`; its width is the upper
/// boundary of dimension `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sectors {
    pub inside: Vec<Point>,
    pub outside: Vec<Point>,
}

impl Sectors {
    pub fn new(inside: Vec<Point>, outside: Vec<Point>) -> RacingLineResult<Self> {
        if inside.len() != outside.len() {
            return Err(RacingLineError::DegenerateTrack(format!(
                "{} inside points but {} outside points",
                inside.len(),
                outside.len()
            )));
        }
        Ok(Self { inside, outside })
    }

    pub fn len(&self) -> usize {
        self.inside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }

    pub fn width(&self, i: usize) -> f64 {
        self.inside[i].distance(&self.outside[i])
    }

    /// Search space upper bounds: the width of every sector.
    pub fn boundaries(&self) -> Array1<f64> {
        (0..self.len()).map(|i| self.width(i)).collect()
    }
}

/// Splits a closed track into `n_sectors` cross-track segments.
///
/// Center points are spread evenly over the centerline, with the last one
/// replaced by the first so the line closes on itself. Every center point is
/// projected onto the nearest of `border_samples` evenly spaced points of
/// each border.
pub fn define_sectors(
    center: &Polyline,
    inside: &Polyline,
    outside: &Polyline,
    n_sectors: usize,
    border_samples: usize,
) -> RacingLineResult<Sectors> {
    if n_sectors < MIN_SECTORS {
        return Err(RacingLineError::TooFewSectors {
            min: MIN_SECTORS,
            got: n_sectors,
        });
    }
    if border_samples < 2 {
        return Err(RacingLineError::InvalidConfig(format!(
            "border_samples must be at least 2, got {}",
            border_samples
        )));
    }

    let mut center_points = center.resample(n_sectors);
    center_points[n_sectors - 1] = center_points[0];

    let inside_border = inside.resample(border_samples);
    let outside_border = outside.resample(border_samples);

    let inside_points = center_points
        .iter()
        .map(|p| closest_point(&inside_border, p))
        .collect();
    let outside_points = center_points
        .iter()
        .map(|p| closest_point(&outside_border, p))
        .collect();

    Sectors::new(inside_points, outside_points)
}
