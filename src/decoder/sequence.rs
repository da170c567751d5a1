//! Resolves the full LRP sequence into per-pair routes.
//!
//! Candidates are generated for every point up front. The search over
//! candidate combinations is depth-first on the pair index with explicit
//! cursors, so arbitrarily long references decode without recursion: for the
//! pair `(i, i+1)` all candidates of the right point are tried before the
//! decoder backtracks into the left one.

use tracing::{debug, trace};

use crate::decoder::candidates::{Candidate, nominate_candidates};
use crate::decoder::route::Route;
use crate::decoder::{DecoderConfig, shortest_path};
use crate::observer::DecoderObserver;
use crate::{DecodeError, LocationReferencePoint, MapReader};

/// Decodes the location reference path, without considering any offsets.
/// Returns one route per pair of subsequent location reference points.
pub fn dereference_path<R: MapReader>(
    points: &[LocationReferencePoint],
    reader: &R,
    config: &DecoderConfig,
    mut observer: Option<&mut (dyn DecoderObserver<R::LineId> + '_)>,
) -> Result<Vec<Route<R::LineId>>, DecodeError> {
    let last = points.len() - 1;

    let mut candidates: Vec<Vec<Candidate<R::LineId>>> = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let nominated = nominate_candidates(point, reader, config, index == last)?;
        if let Some(observer) = observer.as_deref_mut() {
            observer.on_candidates_found(index, &nominated);
        }
        if nominated.is_empty() {
            return Err(DecodeError::NoCandidates(index));
        }
        candidates.push(nominated);
    }

    let mut cursors = vec![0usize; points.len()];
    let mut routes: Vec<Route<R::LineId>> = Vec::with_capacity(last);
    let mut pair = 0usize;

    loop {
        let from = &candidates[pair][cursors[pair]];
        let to = &candidates[pair + 1][cursors[pair + 1]];

        let point = &points[pair];
        let dnp = point.dnp();
        let tolerance = config.dnp_tolerance(dnp);
        let lfrc = config.lfrc_ceiling(point.lfrcnp());
        let max_length = dnp + tolerance;

        trace!(
            pair,
            from = ?from.line,
            to = ?to.line,
            dnp = dnp.meters(),
            ?lfrc,
            "routing candidate pair"
        );

        let route = shortest_path::candidate_route(reader, from, to, lfrc, max_length)?;

        let accepted = match route {
            None => {
                debug!(pair, from = ?from.line, to = ?to.line, "no route for candidate pair");
                if let Some(observer) = observer.as_deref_mut() {
                    observer.on_route_not_found(pair, from, to);
                }
                None
            }
            Some(route) if route.length.abs_diff(dnp) <= tolerance => Some(route),
            Some(route) => {
                debug!(
                    pair,
                    expected = dnp.meters(),
                    actual = route.length.meters(),
                    "route length deviates too far from the DNP"
                );
                if let Some(observer) = observer.as_deref_mut() {
                    observer.on_length_mismatch(pair, dnp, route.length);
                }
                None
            }
        };

        match accepted {
            Some(route) => {
                if let Some(observer) = observer.as_deref_mut() {
                    observer.on_candidate_pair_chosen(pair, from, to);
                    observer.on_route_found(pair, &route);
                }
                routes.push(route);
                pair += 1;
                if pair == last {
                    return Ok(routes);
                }
            }
            None => {
                // try the next candidate for the right point; once those are
                // exhausted move left, discarding the committed route
                cursors[pair + 1] += 1;
                loop {
                    if cursors[pair + 1] < candidates[pair + 1].len() {
                        break;
                    }
                    cursors[pair + 1] = 0;
                    if pair == 0 {
                        if let Some(observer) = observer.as_deref_mut() {
                            observer.on_backtrack(0);
                        }
                        cursors[0] += 1;
                        if cursors[0] >= candidates[0].len() {
                            return Err(DecodeError::NoMatch);
                        }
                        break;
                    }
                    routes.pop();
                    pair -= 1;
                    if let Some(observer) = observer.as_deref_mut() {
                        observer.on_backtrack(pair);
                    }
                    cursors[pair + 1] += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::map::tests::{LineId, NETWORK_MAP, NetworkMap, last_lrp, lrp, lrp_between};
    use crate::observer::ObservedEvent;
    use crate::{
        DecodeError, DecoderConfig, Fow, Frc, Length, LineReference, MapReader, Offsets,
        PathAttributes, SimpleObserver, decode_line,
    };

    fn path_attributes(lfrcnp: Frc, dnp: Length) -> Option<PathAttributes> {
        Some(PathAttributes { lfrcnp, dnp })
    }

    #[test]
    fn decode_trivial_two_point_reference() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        let dnp = map.length(LineId(101));
        let reference = LineReference {
            points: vec![
                lrp_between(map, LineId(101), 0.0, Frc::Frc3, Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, dnp)),
                last_lrp(map, LineId(101), 1.0, Frc::Frc3, Fow::SingleCarriageway),
            ],
            offsets: Offsets::default(),
        };

        let location = decode_line(&reference, map, &config, None).unwrap();

        assert_eq!(location.path, vec![LineId(101)]);
        assert_eq!(location.pos_offset, Length::ZERO);
        assert_eq!(location.neg_offset, Length::ZERO);
    }

    #[test]
    fn decode_falls_back_after_a_disconnected_best_candidate() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        // an LRP right next to the dead-end spur 108: the spur outranks the
        // main street geographically but cannot reach the second point
        let main_street_bearing = lrp_between(
            map, LineId(101), 0.0, Frc::Frc3, Fow::SingleCarriageway, None,
        )
        .line
        .bearing;

        let dnp = map.length(LineId(101));
        let reference = LineReference {
            points: vec![
                lrp(
                    13.4100,
                    52.5232,
                    main_street_bearing.degrees(),
                    Frc::Frc3,
                    Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, dnp),
                ),
                last_lrp(map, LineId(101), 1.0, Frc::Frc3, Fow::SingleCarriageway),
            ],
            offsets: Offsets::default(),
        };

        let mut observer = SimpleObserver::default();
        let location = decode_line(&reference, map, &config, Some(&mut observer)).unwrap();

        assert_eq!(location.path, vec![LineId(101)]);
        assert_eq!(observer.backtracks(), 1);
        assert_eq!(
            observer
                .events
                .iter()
                .filter(|event| matches!(event, ObservedEvent::RouteNotFound { .. }))
                .count(),
            1
        );
        assert!(observer.events.contains(&ObservedEvent::DecodeFinished { success: true }));
    }

    #[test]
    fn decode_detours_around_lines_above_the_frc_ceiling() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        // the geometrically shortest connection runs over the frc5 shortcut
        // 104; with an LFRCNP of frc3 the decoder must take the detour
        let dnp = map.length(LineId(103))
            + map.length(LineId(105))
            + map.length(LineId(106))
            + map.length(LineId(107));

        let reference = LineReference {
            points: vec![
                lrp_between(map, LineId(103), 0.0, Frc::Frc3, Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, dnp)),
                last_lrp(map, LineId(107), 1.0, Frc::Frc3, Fow::SingleCarriageway),
            ],
            offsets: Offsets::default(),
        };

        let location = decode_line(&reference, map, &config, None).unwrap();

        assert_eq!(
            location.path,
            vec![LineId(103), LineId(105), LineId(106), LineId(107)]
        );
        assert!(
            location
                .path
                .iter()
                .all(|&line| map.line_frc(line).unwrap() <= Frc::Frc3)
        );
    }

    #[test]
    fn decode_joins_routes_on_a_shared_line() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        let reference = LineReference {
            points: vec![
                lrp_between(map, LineId(102), 0.0, Frc::Frc3, Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, map.length(LineId(102)))),
                lrp_between(map, LineId(103), 0.0, Frc::Frc3, Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, map.length(LineId(103)))),
                last_lrp(map, LineId(103), 1.0, Frc::Frc3, Fow::SingleCarriageway),
            ],
            offsets: Offsets::default(),
        };

        let location = decode_line(&reference, map, &config, None).unwrap();

        // the middle point closes pair 0 on line 103 and opens pair 1 on the
        // same line; the concatenated path must not repeat it
        assert_eq!(location.path, vec![LineId(102), LineId(103)]);
    }

    #[test]
    fn decode_reports_missing_candidates_with_the_lrp_index() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        // 10km east of the network
        let reference = LineReference {
            points: vec![
                lrp(13.55, 52.523, 90.0, Frc::Frc3, Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, Length::from_meters(300.0))),
                last_lrp(map, LineId(101), 1.0, Frc::Frc3, Fow::SingleCarriageway),
            ],
            offsets: Offsets::default(),
        };

        assert_eq!(
            decode_line(&reference, map, &config, None),
            Err(DecodeError::NoCandidates(0))
        );
    }

    #[test]
    fn decode_fails_with_no_match_when_every_pair_misses_the_dnp() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        // the only viable route is ~4x longer than the claimed DNP
        let reference = LineReference {
            points: vec![
                lrp_between(map, LineId(101), 0.0, Frc::Frc3, Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, Length::from_meters(100.0))),
                last_lrp(map, LineId(101), 1.0, Frc::Frc3, Fow::SingleCarriageway),
            ],
            offsets: Offsets::default(),
        };

        let mut observer = SimpleObserver::default();
        let result = decode_line(&reference, map, &config, Some(&mut observer));

        assert_eq!(result, Err(DecodeError::NoMatch));
        assert!(observer.events.contains(&ObservedEvent::DecodeFinished { success: false }));
    }

    #[test]
    fn decode_rejects_references_with_a_single_point() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        let reference = LineReference {
            points: vec![last_lrp(map, LineId(101), 1.0, Frc::Frc3, Fow::SingleCarriageway)],
            offsets: Offsets::default(),
        };

        assert!(matches!(
            decode_line(&reference, map, &config, None),
            Err(DecodeError::InvalidReference(_))
        ));
    }

    #[test]
    fn decode_is_deterministic_across_calls() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        let dnp = map.length(LineId(103))
            + map.length(LineId(105))
            + map.length(LineId(106))
            + map.length(LineId(107));

        let reference = LineReference {
            points: vec![
                lrp_between(map, LineId(103), 0.0, Frc::Frc3, Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, dnp)),
                last_lrp(map, LineId(107), 1.0, Frc::Frc3, Fow::SingleCarriageway),
            ],
            offsets: Offsets::default(),
        };

        let first = decode_line(&reference, map, &config, None).unwrap();
        let second = decode_line(&reference, map, &config, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn decode_emits_the_expected_event_sequence() {
        let map: &NetworkMap = &NETWORK_MAP;
        let config = DecoderConfig::default();

        let dnp = map.length(LineId(101));
        let reference = LineReference {
            points: vec![
                lrp_between(map, LineId(101), 0.0, Frc::Frc3, Fow::SingleCarriageway,
                    path_attributes(Frc::Frc3, dnp)),
                last_lrp(map, LineId(101), 1.0, Frc::Frc3, Fow::SingleCarriageway),
            ],
            offsets: Offsets::default(),
        };

        let mut observer = SimpleObserver::default();
        decode_line(&reference, map, &config, Some(&mut observer)).unwrap();

        let kinds: Vec<_> = observer.events.iter().collect();
        assert!(matches!(kinds[0], ObservedEvent::CandidatesFound { lrp_index: 0, .. }));
        assert!(matches!(kinds[1], ObservedEvent::CandidatesFound { lrp_index: 1, .. }));
        assert!(kinds.contains(&&ObservedEvent::CandidatePairChosen { pair_index: 0 }));
        assert!(kinds.contains(&&ObservedEvent::RouteFound { pair_index: 0 }));
        assert_eq!(kinds.last(), Some(&&ObservedEvent::DecodeFinished { success: true }));
    }
}
