use tracing::{debug, trace};

use crate::decoder::{DecoderConfig, scoring};
use crate::{Bearing, Coordinate, DecodeError, Length, LocationReferencePoint, MapReader, geo};

/// A scored projection of a location reference point onto a line of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<LineId> {
    /// The candidate line.
    pub line: LineId,
    /// Distance from the line's start node to the projected point, in
    /// [0, line length].
    pub offset: Length,
    /// The projected point on the line.
    pub coordinate: Coordinate,
    /// Total rating in [0, 1], higher is better.
    pub score: f64,
}

/// Generates the ranked candidate list for one location reference point.
///
/// Every line within the search radius is projected against the LRP
/// coordinate. A projection that lands on the line's terminal node is
/// replaced by start-of-line candidates on each outgoing line of that node,
/// except for the last LRP whose route terminates there. Candidates are
/// rated, filtered by the score floor, deduplicated per line keeping the
/// better rating, and returned sorted by descending score.
pub fn nominate_candidates<R: MapReader>(
    lrp: &LocationReferencePoint,
    reader: &R,
    config: &DecoderConfig,
    is_last: bool,
) -> Result<Vec<Candidate<R::LineId>>, DecodeError> {
    debug!(
        lon = lrp.coordinate.lon,
        lat = lrp.coordinate.lat,
        radius = config.search_radius.meters(),
        is_last,
        "nominating candidates"
    );

    let mut candidates: Vec<Candidate<R::LineId>> = Vec::new();

    for line in reader.find_lines_close_to(lrp.coordinate, config.search_radius) {
        for candidate in line_candidates(lrp, line, reader, config, is_last)? {
            match candidates.iter_mut().find(|c| c.line == candidate.line) {
                Some(existing) if existing.score < candidate.score => *existing = candidate,
                Some(_) => trace!(?candidate, "duplicate candidate with worse rating"),
                None => candidates.push(candidate),
            }
        }
    }

    // stable sort keeps the reader's deterministic order among equal scores
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    debug!(count = candidates.len(), "candidates nominated");

    Ok(candidates)
}

/// Yields zero or more candidates based on the given line.
fn line_candidates<R: MapReader>(
    lrp: &LocationReferencePoint,
    line: R::LineId,
    reader: &R,
    config: &DecoderConfig,
    is_last: bool,
) -> Result<Vec<Candidate<R::LineId>>, DecodeError> {
    let coordinates: Vec<Coordinate> = reader.line_coordinates(line).collect();
    if coordinates.len() < 2 {
        // degenerate geometry carries no direction; adjacent lines are
        // nominated on their own
        trace!(?line, "skipping line with degenerate geometry");
        return Ok(vec![]);
    }

    let length = reader
        .line_length(line)
        .ok_or_else(|| DecodeError::map_reader(format!("no length for line {line:?}")))?;
    if length == Length::ZERO {
        return Ok(vec![]);
    }

    let Some(projection) = geo::project(&coordinates, lrp.coordinate) else {
        return Ok(vec![]);
    };

    if projection.distance > config.search_radius {
        trace!(?line, "projection outside the search radius");
        return Ok(vec![]);
    }

    if !is_last && projection.offset >= length {
        // the projection sits on the terminal node; the candidate would be a
        // zero-length fragment, so nominate the start of each outgoing line
        let node = reader
            .line_end_node(line)
            .ok_or_else(|| DecodeError::map_reader(format!("no end node for line {line:?}")))?;

        let mut promoted = vec![];
        for (outgoing, _) in reader.outgoing_lines(node) {
            let outgoing_coordinates: Vec<Coordinate> =
                reader.line_coordinates(outgoing).collect();
            if outgoing_coordinates.len() < 2 {
                continue;
            }
            promoted.extend(rate_candidate(
                lrp,
                outgoing,
                &outgoing_coordinates,
                Length::ZERO,
                projection.coordinate,
                projection.distance,
                reader,
                config,
                false,
            )?);
        }
        return Ok(promoted);
    }

    if is_last && projection.offset <= Length::ZERO {
        // no partial line is left behind the projection; the end of an
        // adjacent incoming line covers this position instead
        trace!(?line, "last LRP projects onto the start node");
        return Ok(vec![]);
    }

    Ok(rate_candidate(
        lrp,
        line,
        &coordinates,
        projection.offset,
        projection.coordinate,
        projection.distance,
        reader,
        config,
        is_last,
    )?
    .into_iter()
    .collect())
}

/// Rates a single candidate position, returning `None` when a pre-filter or
/// the score floor discards it.
#[allow(clippy::too_many_arguments)]
fn rate_candidate<R: MapReader>(
    lrp: &LocationReferencePoint,
    line: R::LineId,
    coordinates: &[Coordinate],
    offset: Length,
    coordinate: Coordinate,
    distance_to_lrp: Length,
    reader: &R,
    config: &DecoderConfig,
    is_last: bool,
) -> Result<Option<Candidate<R::LineId>>, DecodeError> {
    let Some(line_bearing) = candidate_bearing(coordinates, offset, config.bear_dist, is_last)
    else {
        trace!(?line, "candidate segment carries no bearing");
        return Ok(None);
    };

    let bearing_difference = line_bearing.difference(&lrp.line.bearing);
    if bearing_difference > config.max_bear_deviation {
        trace!(
            ?line,
            bearing_difference,
            "candidate discarded by the bearing pre-filter"
        );
        return Ok(None);
    }

    let frc = reader
        .line_frc(line)
        .ok_or_else(|| DecodeError::map_reader(format!("no FRC for line {line:?}")))?;
    let fow = reader
        .line_fow(line)
        .ok_or_else(|| DecodeError::map_reader(format!("no FOW for line {line:?}")))?;

    let geo_score = scoring::score_geolocation(distance_to_lrp, config.search_radius);
    let frc_score = scoring::score_frc(lrp.line.frc, frc);
    let fow_score = scoring::score_fow(lrp.line.fow, fow, &config.fow_standin_score);
    let bear_score = scoring::score_bearing(lrp.line.bearing, line_bearing);
    let score = scoring::combine(config, geo_score, frc_score, fow_score, bear_score);

    if score < config.min_score {
        trace!(?line, score, "candidate rating below the floor");
        return Ok(None);
    }

    trace!(?line, offset = offset.meters(), score, "candidate accepted");
    Ok(Some(Candidate {
        line,
        offset,
        coordinate,
        score,
    }))
}

/// The bearing of the candidate's partial line: the first meters beyond the
/// projection for a regular LRP, the last meters before it reversed for the
/// final LRP.
fn candidate_bearing(
    coordinates: &[Coordinate],
    offset: Length,
    bear_dist: Length,
    is_last: bool,
) -> Option<Bearing> {
    let (head, tail) = geo::split(coordinates, offset);
    if is_last {
        let mut reversed = head;
        reversed.reverse();
        geo::prefix_bearing(&reversed, bear_dist)
    } else {
        geo::prefix_bearing(&tail, bear_dist)
    }
}
