//! WGS84 geodesic helpers for polyline geometry.
//!
//! Distances, azimuths and destinations are computed on the ellipsoid via
//! [`Geodesic`]; point-to-segment projection uses the great-circle closest
//! point and re-measures the result geodesically.

use geo::Bearing as _;
use geo::{Closest, Destination, Distance, Geodesic, HaversineClosestPoint, Line, Point};

use crate::{Bearing, Coordinate, Length};

fn point(coordinate: Coordinate) -> Point {
    Point::new(coordinate.lon, coordinate.lat)
}

fn coordinate(point: Point) -> Coordinate {
    Coordinate {
        lon: point.x(),
        lat: point.y(),
    }
}

/// Geodesic distance between two coordinates, in meters.
pub fn distance(a: Coordinate, b: Coordinate) -> Length {
    Length::from_meters(Geodesic.distance(point(a), point(b)))
}

/// Initial geodesic azimuth from `a` to `b`, clockwise from true north.
pub fn bearing(a: Coordinate, b: Coordinate) -> Bearing {
    Bearing::from_degrees(Geodesic.bearing(point(a), point(b)))
}

/// The coordinate reached by travelling `distance` meters from `origin` in
/// the direction of `bearing`.
pub fn destination(origin: Coordinate, bearing: Bearing, distance: Length) -> Coordinate {
    coordinate(Geodesic.destination(point(origin), bearing.degrees(), distance.meters()))
}

/// Total geodesic length of a polyline.
pub fn path_length(coordinates: &[Coordinate]) -> Length {
    coordinates
        .windows(2)
        .map(|segment| distance(segment[0], segment[1]))
        .sum()
}

/// The coordinate at `offset` meters along the polyline.
///
/// Offsets are clamped: values below zero return the first coordinate and
/// values beyond the polyline length return the last one.
/// Returns `None` for an empty polyline.
pub fn interpolate(coordinates: &[Coordinate], offset: Length) -> Option<Coordinate> {
    let (&first, rest) = coordinates.split_first()?;
    let mut remaining = offset.max(Length::ZERO);
    let mut from = first;

    for &to in rest {
        let segment = distance(from, to);
        if remaining < segment {
            return Some(destination(from, bearing(from, to), remaining));
        }
        remaining -= segment;
        from = to;
    }

    Some(from)
}

/// The projection of a point onto a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointOnPath {
    /// Distance from the start of the polyline to the projected point.
    pub offset: Length,
    /// The projected point itself.
    pub coordinate: Coordinate,
    /// Perpendicular distance from the input point to the polyline.
    pub distance: Length,
}

/// Projects `target` onto the polyline, returning the nearest point together
/// with its meter offset from the polyline start and its distance to the
/// input. Returns `None` if the polyline has fewer than two coordinates.
pub fn project(coordinates: &[Coordinate], target: Coordinate) -> Option<PointOnPath> {
    if coordinates.len() < 2 {
        return None;
    }

    let target_point = point(target);
    let mut best: Option<PointOnPath> = None;
    let mut walked = Length::ZERO;

    for segment in coordinates.windows(2) {
        let [from, to] = [segment[0], segment[1]];
        let line = Line::new(point(from), point(to));

        let closest = match line.haversine_closest_point(&target_point) {
            Closest::SinglePoint(p) | Closest::Intersection(p) => coordinate(p),
            Closest::Indeterminate => from,
        };

        let distance_to_target = distance(target, closest);
        if best.is_none_or(|best| distance_to_target < best.distance) {
            let segment_length = distance(from, to);
            let offset = walked + distance(from, closest).min(segment_length);
            best = Some(PointOnPath {
                offset,
                coordinate: closest,
                distance: distance_to_target,
            });
        }

        walked += distance(from, to);
    }

    best
}

/// Splits a polyline at `offset` meters from its start. Both halves contain
/// the split coordinate, so either side can be measured or interpolated on
/// its own.
pub fn split(coordinates: &[Coordinate], offset: Length) -> (Vec<Coordinate>, Vec<Coordinate>) {
    let Some((&first, rest)) = coordinates.split_first() else {
        return (vec![], vec![]);
    };

    let mut remaining = offset.max(Length::ZERO);
    let mut head = vec![first];
    let mut from = first;

    for (i, &to) in rest.iter().enumerate() {
        let segment = distance(from, to);
        if remaining < segment {
            let cut = destination(from, bearing(from, to), remaining);
            head.push(cut);
            let mut tail = vec![cut];
            tail.extend_from_slice(&rest[i..]);
            return (head, tail);
        }
        remaining -= segment;
        head.push(to);
        from = to;
    }

    // offset at or past the end of the polyline
    (head, vec![from])
}

/// Bearing of the first `dist` meters of a polyline: the azimuth from its
/// first coordinate to the point `dist` meters in (clamped to the polyline
/// end). Returns `None` when the polyline carries no direction.
pub fn prefix_bearing(coordinates: &[Coordinate], dist: Length) -> Option<Bearing> {
    let &start = coordinates.first()?;
    let target = interpolate(coordinates, dist.max(Length::ZERO))?;
    if distance(start, target) == Length::ZERO {
        return None;
    }
    Some(bearing(start, target))
}
