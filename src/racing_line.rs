//! Decoding of sector offsets into racing line points

use crate::geometry::Point;

/// Slack allowed when checking that a decoded point lies on its sector
/// segment.
pub const SIDE_TOLERANCE: f64 = 0.1;

/// Maps each sector offset to a point on its inside-to-outside segment.
///
/// The direction along the segment is taken from `atan` of its slope, which
/// loses the segment's orientation. When the point lands off the segment it
/// is mirrored to the other side of the inside point.
pub fn sectors_to_racing_line<'a, I>(sectors: I, inside_points: &[Point], outside_points: &[Point]) -> Vec<Point>
where
    I: IntoIterator<Item = &'a f64>,
{
    sectors
        .into_iter()
        .zip(inside_points.iter().zip(outside_points))
        .map(|(&offset, (inside, outside))| decode_offset(offset, inside, outside))
        .collect()
}

/// Decodes a single sector offset.
pub fn decode_offset(offset: f64, inside: &Point, outside: &Point) -> Point {
    let segment = inside.distance(outside);
    if segment == 0.0 {
        return *inside;
    }

    let slope = (outside.y - inside.y) / (outside.x - inside.x);
    let angle = slope.atan();
    let (a, b) = (angle.cos(), angle.sin());

    let candidate = Point::new(inside.x - offset * a, inside.y - offset * b);
    let detour = inside.distance(&candidate) + outside.distance(&candidate) - segment;

    if detour > SIDE_TOLERANCE {
        Point::new(inside.x + offset * a, inside.y + offset * b)
    } else {
        candidate
    }
}
