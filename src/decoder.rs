//! The decoder resolves a location reference against its own map, which may
//! differ from the map the reference was created on.
//!
//! 1. Generate and rate candidate lines for every location reference point.
//! 2. Determine a shortest path between the candidates of each pair of
//!    subsequent location reference points.
//! 3. Check the path length against the distance encoded in the reference,
//!    backtracking over ranked candidate combinations on failure.
//! 4. Concatenate the per-pair paths and trim the result by the offsets.

pub mod candidates;
pub mod route;
pub mod scoring;
pub mod sequence;
pub(crate) mod shortest_path;

use tracing::info;

use crate::location::{build_line_location, point_along_path};
use crate::{
    DecodeError, DecoderObserver, Frc, Length, LineLocation, LineReference, MapReader,
    PoiReference, PoiWithAccessPoint, PointAlongLine, PointAlongLineReference,
};

/// Settings that influence the decoder's behaviour. The configuration is
/// immutable for the duration of a decode call.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Radius around an LRP coordinate to search for candidate lines.
    pub search_radius: Length,
    /// Weight of the geographic proximity sub-score.
    pub geo_weight: f64,
    /// Weight of the functional road class sub-score.
    pub frc_weight: f64,
    /// Weight of the form of way sub-score.
    pub fow_weight: f64,
    /// Weight of the bearing alignment sub-score.
    pub bear_weight: f64,
    /// Candidates whose total score falls below this floor are discarded.
    pub min_score: f64,
    /// Permitted route length deviation from the DNP, relative to the DNP.
    pub max_dnp_deviation_rel: f64,
    /// Permitted absolute route length deviation from the DNP.
    pub max_dnp_deviation_abs: Length,
    /// Distance over which a line's bearing is measured.
    pub bear_dist: Length,
    /// Candidates whose bearing differs from the LRP bearing by more than
    /// this many degrees are discarded before scoring.
    pub max_bear_deviation: f64,
    /// Per-FRC slack added to the LFRCNP ceiling during routing, indexed by
    /// the LFRCNP value.
    pub tolerated_lfrc: [u8; 8],
    /// Stand-in scores for form of way pairs, indexed as
    /// `[expected][actual]`.
    pub fow_standin_score: [[f64; 8]; 8],
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            search_radius: Length::from_meters(100.0),
            geo_weight: 0.25,
            frc_weight: 0.25,
            fow_weight: 0.25,
            bear_weight: 0.25,
            min_score: 0.3,
            max_dnp_deviation_rel: 0.1,
            max_dnp_deviation_abs: Length::from_meters(20.0),
            bear_dist: Length::from_meters(20.0),
            max_bear_deviation: 45.0,
            tolerated_lfrc: [0; 8],
            fow_standin_score: scoring::DEFAULT_FOW_STAND_IN_SCORE,
        }
    }
}

impl DecoderConfig {
    pub(crate) fn weight_total(&self) -> f64 {
        self.geo_weight + self.frc_weight + self.fow_weight + self.bear_weight
    }

    /// Tolerated deviation of a route length from the given DNP.
    pub(crate) fn dnp_tolerance(&self, dnp: Length) -> Length {
        self.max_dnp_deviation_abs.max(dnp * self.max_dnp_deviation_rel)
    }

    /// The FRC ceiling for interior route lines between a pair of LRPs.
    pub(crate) fn lfrc_ceiling(&self, lfrcnp: Frc) -> Frc {
        lfrcnp.relaxed_by(self.tolerated_lfrc[lfrcnp as usize])
    }

    fn validate(&self) -> Result<(), DecodeError> {
        let weights = [
            self.geo_weight,
            self.frc_weight,
            self.fow_weight,
            self.bear_weight,
        ];
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(DecodeError::InvalidReference("negative score weight"));
        }
        if self.weight_total() <= 0.0 {
            return Err(DecodeError::InvalidReference("score weights sum to zero"));
        }
        if self.search_radius <= Length::ZERO {
            return Err(DecodeError::InvalidReference("non-positive search radius"));
        }
        Ok(())
    }
}

/// Decodes a line location reference into a connected path through the map,
/// trimmed by the reference offsets.
pub fn decode_line<R: MapReader>(
    reference: &LineReference,
    reader: &R,
    config: &DecoderConfig,
    mut observer: Option<&mut dyn DecoderObserver<R::LineId>>,
) -> Result<LineLocation<R::LineId>, DecodeError> {
    let result = decode_line_inner(reference, reader, config, observer.as_deref_mut());
    if let Some(observer) = observer {
        observer.on_decode_finished(result.is_ok());
    }
    result
}

fn decode_line_inner<R: MapReader>(
    reference: &LineReference,
    reader: &R,
    config: &DecoderConfig,
    observer: Option<&mut (dyn DecoderObserver<R::LineId> + '_)>,
) -> Result<LineLocation<R::LineId>, DecodeError> {
    info!(points = reference.points.len(), "decoding line reference");
    config.validate()?;
    validate_points(&reference.points)?;

    let routes = sequence::dereference_path(&reference.points, reader, config, observer)?;
    build_line_location(&routes, reference.offsets, reader)
}

/// Decodes a point along line reference, projecting the referenced fraction
/// onto the decoded two-point path.
pub fn decode_point_along_line<R: MapReader>(
    reference: &PointAlongLineReference,
    reader: &R,
    config: &DecoderConfig,
    mut observer: Option<&mut dyn DecoderObserver<R::LineId>>,
) -> Result<PointAlongLine<R::LineId>, DecodeError> {
    let result = decode_point_inner(reference, reader, config, observer.as_deref_mut());
    if let Some(observer) = observer {
        observer.on_decode_finished(result.is_ok());
    }
    result
}

fn decode_point_inner<R: MapReader>(
    reference: &PointAlongLineReference,
    reader: &R,
    config: &DecoderConfig,
    observer: Option<&mut (dyn DecoderObserver<R::LineId> + '_)>,
) -> Result<PointAlongLine<R::LineId>, DecodeError> {
    info!(offset = reference.offset, "decoding point along line reference");
    config.validate()?;
    validate_points(&reference.points)?;
    if !(0.0..=1.0).contains(&reference.offset) {
        return Err(DecodeError::InvalidReference(
            "point offset fraction outside [0, 1]",
        ));
    }

    // the underlying path is decoded untrimmed; a point reference has no
    // offsets of its own
    let routes = sequence::dereference_path(&reference.points, reader, config, observer)?;
    let (line, offset, coordinate) = point_along_path(&routes, reference.offset, reader)?;

    Ok(PointAlongLine {
        line,
        offset,
        coordinate,
        side: reference.side,
        orientation: reference.orientation,
    })
}

/// Decodes a POI with access point reference. The access point is resolved
/// like a point along line; the POI coordinates pass through unchanged.
pub fn decode_poi_with_access_point<R: MapReader>(
    reference: &PoiReference,
    reader: &R,
    config: &DecoderConfig,
    observer: Option<&mut dyn DecoderObserver<R::LineId>>,
) -> Result<PoiWithAccessPoint<R::LineId>, DecodeError> {
    let point = decode_point_along_line(&reference.point, reader, config, observer)?;
    Ok(PoiWithAccessPoint {
        point,
        poi: reference.poi,
    })
}

fn validate_points(points: &[crate::LocationReferencePoint]) -> Result<(), DecodeError> {
    if points.len() < 2 {
        return Err(DecodeError::InvalidReference(
            "a line reference needs at least two points",
        ));
    }
    if points[..points.len() - 1].iter().any(|point| point.path.is_none()) {
        return Err(DecodeError::InvalidReference(
            "intermediate point without path attributes",
        ));
    }
    Ok(())
}
