use tracing::debug;

use crate::decoder::route::Route;
use crate::{Coordinate, DecodeError, Length, MapReader, Offsets, Orientation, SideOfRoad, geo};

/// A decoded line location: a connected path through the map, trimmed by the
/// positive and negative offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLocation<LineId> {
    /// Complete ordered list of lines covering the location.
    pub path: Vec<LineId>,
    /// Distance from the start of the first line to the start of the
    /// location.
    pub pos_offset: Length,
    /// Distance from the end of the last line back to the end of the
    /// location.
    pub neg_offset: Length,
}

impl<LineId: Copy> LineLocation<LineId> {
    /// Total length of the path lines, ignoring the offsets.
    pub fn path_length<R>(&self, reader: &R) -> Length
    where
        R: MapReader<LineId = LineId>,
    {
        self.path
            .iter()
            .filter_map(|&line| reader.line_length(line))
            .sum()
    }
}

/// A decoded point along line location.
#[derive(Debug, Clone, PartialEq)]
pub struct PointAlongLine<LineId> {
    /// The line holding the point.
    pub line: LineId,
    /// Distance from the line's start node to the point.
    pub offset: Length,
    /// Geo position of the point.
    pub coordinate: Coordinate,
    pub side: SideOfRoad,
    pub orientation: Orientation,
}

/// A decoded POI with access point location.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiWithAccessPoint<LineId> {
    /// The access point on the road network.
    pub point: PointAlongLine<LineId>,
    /// The point of interest itself, off the network.
    pub poi: Coordinate,
}

/// Concatenates per-pair routes into a single line sequence, collapsing the
/// repeated line where two routes join on the shared candidate line.
fn concatenate<LineId: Copy + PartialEq>(routes: &[Route<LineId>]) -> Vec<LineId> {
    let mut path: Vec<LineId> = Vec::new();
    for route in routes {
        for &line in &route.lines {
            if path.last() != Some(&line) {
                path.push(line);
            }
        }
    }
    path
}

/// Builds the final line location from the resolved routes and the reference
/// offsets.
///
/// The offsets of the decoded location are the reference offsets plus the
/// projection remainders of the outermost candidates: the start candidate's
/// offset into the first line and the end candidate's distance to the end of
/// the last line.
pub(crate) fn build_line_location<R: MapReader>(
    routes: &[Route<R::LineId>],
    offsets: Offsets,
    reader: &R,
) -> Result<LineLocation<R::LineId>, DecodeError> {
    let (first, last) = match (routes.first(), routes.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(DecodeError::InvalidReference("empty location path")),
    };

    let end_line_length = reader.line_length(last.end.line).ok_or_else(|| {
        DecodeError::map_reader(format!("no length for line {:?}", last.end.line))
    })?;

    let path = concatenate(routes);
    let pos_offset = offsets.pos + first.start.offset;
    let neg_offset = offsets.neg + (end_line_length - last.end.offset);

    trim(path, pos_offset, neg_offset, reader)
}

/// Applies the offsets to the path, dropping boundary lines that the offsets
/// consume entirely.
fn trim<R: MapReader>(
    mut path: Vec<R::LineId>,
    mut pos_offset: Length,
    mut neg_offset: Length,
    reader: &R,
) -> Result<LineLocation<R::LineId>, DecodeError> {
    let total: Length = path
        .iter()
        .filter_map(|&line| reader.line_length(line))
        .sum();

    if pos_offset + neg_offset >= total {
        return Err(DecodeError::InvalidOffsets {
            pos: pos_offset,
            neg: neg_offset,
        });
    }

    while let Some(&line) = path.first() {
        let length = reader
            .line_length(line)
            .ok_or_else(|| DecodeError::map_reader(format!("no length for line {line:?}")))?;
        if pos_offset < length {
            break;
        }
        debug!(?line, "positive offset consumes the leading line");
        pos_offset -= length;
        path.remove(0);
    }

    while let Some(&line) = path.last() {
        let length = reader
            .line_length(line)
            .ok_or_else(|| DecodeError::map_reader(format!("no length for line {line:?}")))?;
        if neg_offset < length {
            break;
        }
        debug!(?line, "negative offset consumes the trailing line");
        neg_offset -= length;
        path.pop();
    }

    debug_assert!(!path.is_empty());

    Ok(LineLocation {
        path,
        pos_offset,
        neg_offset,
    })
}

/// Walks `fraction` of the untrimmed path length into the path and returns
/// the holding line, the offset on it, and the interpolated coordinate.
pub(crate) fn point_along_path<R: MapReader>(
    routes: &[Route<R::LineId>],
    fraction: f64,
    reader: &R,
) -> Result<(R::LineId, Length, Coordinate), DecodeError> {
    let path = concatenate(routes);
    let total: Length = path
        .iter()
        .filter_map(|&line| reader.line_length(line))
        .sum();

    let mut leftover = total * fraction;
    let mut held = None;

    for &line in &path {
        let length = reader
            .line_length(line)
            .ok_or_else(|| DecodeError::map_reader(format!("no length for line {line:?}")))?;
        if leftover > length {
            leftover -= length;
            held = Some((line, length));
            continue;
        }
        held = Some((line, leftover));
        break;
    }

    // fraction is at most 1, so the walk can only run past the last line by
    // floating point drift; clamp onto its end in that case
    let (line, offset) = held.ok_or(DecodeError::InvalidReference("empty location path"))?;

    let coordinates: Vec<Coordinate> = reader.line_coordinates(line).collect();
    let coordinate = geo::interpolate(&coordinates, offset)
        .ok_or_else(|| DecodeError::map_reader(format!("no geometry for line {line:?}")))?;

    Ok((line, offset, coordinate))
}
