//! Rating of candidate lines against LRP attributes.
//!
//! Each sub-score lies in [0, 1] with 1.0 an exact match. The total is the
//! weighted sum of the four sub-scores, normalized by the weight total.

use crate::decoder::DecoderConfig;
use crate::{Bearing, Fow, Frc, Length};

/// How well a candidate's form of way stands in for the expected one.
///
/// Indexed as `DEFAULT_FOW_STAND_IN_SCORE[expected][actual]`. The values are
/// adopted from the openlr Java implementation.
pub const DEFAULT_FOW_STAND_IN_SCORE: [[f64; 8]; 8] = [
    [0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50], // Undefined
    [0.50, 1.00, 0.75, 0.00, 0.00, 0.00, 0.00, 0.00], // Motorway
    [0.50, 0.75, 1.00, 0.75, 0.50, 0.00, 0.00, 0.00], // Multiple carriageway
    [0.50, 0.00, 0.75, 1.00, 0.50, 0.50, 0.00, 0.00], // Single carriageway
    [0.50, 0.00, 0.50, 0.50, 1.00, 0.50, 0.00, 0.00], // Roundabout
    [0.50, 0.00, 0.00, 0.50, 0.50, 1.00, 0.00, 0.00], // Traffic square
    [0.50, 0.00, 0.00, 0.00, 0.00, 0.00, 1.00, 0.00], // Slip road
    [0.50, 0.00, 0.00, 0.00, 0.00, 0.00, 0.00, 1.00], // Other
];

/// Scores the straight-line distance between the LRP and its projection.
/// A distance of `radius` or more scores 0.0.
pub fn score_geolocation(distance: Length, radius: Length) -> f64 {
    1.0 - distance.min(radius).meters() / radius.meters()
}

/// Scores the functional road class difference.
pub fn score_frc(wanted: Frc, actual: Frc) -> f64 {
    let difference = wanted.value().abs_diff(actual.value());
    (1.0 - f64::from(difference) / 8.0).max(0.0)
}

/// Scores the form of way via the stand-in table of the configuration.
pub fn score_fow(wanted: Fow, actual: Fow, standin: &[[f64; 8]; 8]) -> f64 {
    standin[wanted as usize][actual as usize]
}

/// Scores the bearing alignment, from 0.0 (opposite directions) to 1.0
/// (identical directions).
pub fn score_bearing(wanted: Bearing, actual: Bearing) -> f64 {
    1.0 - wanted.difference(&actual) / 180.0
}

/// Combines the four sub-scores with the configured weights.
pub fn combine(config: &DecoderConfig, geo: f64, frc: f64, fow: f64, bearing: f64) -> f64 {
    let total = config.weight_total();
    (config.geo_weight * geo
        + config.frc_weight * frc
        + config.fow_weight * fow
        + config.bear_weight * bearing)
        / total
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn fow_stand_in_table_matches_the_reference_values() {
        let table = &DEFAULT_FOW_STAND_IN_SCORE;

        // identical forms always score 1.0
        for fow in 0..8 {
            assert_eq!(table[fow][fow], 1.0);
        }

        // undefined stands in for anything at 0.5, in both directions
        for fow in 0..8 {
            assert_eq!(table[0][fow], 0.5);
            assert_eq!(table[fow][0], 0.5);
        }

        // the table is symmetric
        for wanted in 0..8 {
            for actual in 0..8 {
                assert_eq!(table[wanted][actual], table[actual][wanted]);
            }
        }

        assert_eq!(
            score_fow(Fow::Motorway, Fow::MultipleCarriageway, table),
            0.75
        );
        assert_eq!(
            score_fow(Fow::Motorway, Fow::SingleCarriageway, table),
            0.0
        );
        assert_eq!(
            score_fow(Fow::Roundabout, Fow::TrafficSquare, table),
            0.5
        );
    }

    #[test]
    fn geolocation_score_decays_linearly_to_the_radius() {
        let radius = Length::from_meters(100.0);
        assert_eq!(score_geolocation(Length::ZERO, radius), 1.0);
        assert_eq!(score_geolocation(Length::from_meters(50.0), radius), 0.5);
        assert_eq!(score_geolocation(Length::from_meters(100.0), radius), 0.0);
        assert_eq!(score_geolocation(Length::from_meters(250.0), radius), 0.0);
    }

    #[test]
    fn frc_score_spans_the_class_range() {
        assert_eq!(score_frc(Frc::Frc3, Frc::Frc3), 1.0);
        assert_eq!(score_frc(Frc::Frc0, Frc::Frc4), 0.5);
        assert_eq!(score_frc(Frc::Frc7, Frc::Frc0), 1.0 - 7.0 / 8.0);
        assert_eq!(score_frc(Frc::Frc0, Frc::Frc7), score_frc(Frc::Frc7, Frc::Frc0));
    }

    #[test]
    fn bearing_score_from_aligned_to_opposite() {
        let wanted = Bearing::from_degrees(45.0);
        assert_eq!(score_bearing(wanted, Bearing::from_degrees(45.0)), 1.0);
        assert_eq!(score_bearing(wanted, Bearing::from_degrees(225.0)), 0.0);
        assert_abs_diff_eq!(
            score_bearing(wanted, Bearing::from_degrees(135.0)),
            0.5,
            epsilon = 1e-12
        );
        // wrap-around: 350 vs 10 degrees differ by 20
        assert_abs_diff_eq!(
            score_bearing(Bearing::from_degrees(350.0), Bearing::from_degrees(10.0)),
            1.0 - 20.0 / 180.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn combined_score_is_the_normalized_weighted_sum() {
        let config = DecoderConfig::default();
        let score = combine(&config, 1.0, 0.5, 0.75, 0.25);
        assert_abs_diff_eq!(score, (1.0 + 0.5 + 0.75 + 0.25) / 4.0, epsilon = 1e-12);

        let lopsided = DecoderConfig {
            geo_weight: 3.0,
            frc_weight: 0.0,
            fow_weight: 0.0,
            bear_weight: 1.0,
            ..Default::default()
        };
        let score = combine(&lopsided, 1.0, 0.0, 0.0, 0.5);
        assert_abs_diff_eq!(score, (3.0 + 0.5) / 4.0, epsilon = 1e-12);
    }
}
