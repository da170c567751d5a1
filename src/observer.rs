use crate::decoder::candidates::Candidate;
use crate::decoder::route::Route;
use crate::Length;

/// Observes the progress of a decode call.
///
/// All notifications are purely observational; the decoder's behaviour does
/// not depend on them. Every method has an empty default body so observers
/// implement only the events they care about.
pub trait DecoderObserver<LineId> {
    /// Candidates were generated and ranked for the LRP at `lrp_index`.
    fn on_candidates_found(&mut self, lrp_index: usize, candidates: &[Candidate<LineId>]) {
        let _ = (lrp_index, candidates);
    }

    /// A candidate pair was committed for the LRP pair at `pair_index`.
    fn on_candidate_pair_chosen(
        &mut self,
        pair_index: usize,
        from: &Candidate<LineId>,
        to: &Candidate<LineId>,
    ) {
        let _ = (pair_index, from, to);
    }

    /// The router found a route for the pair which also passed the DNP check.
    fn on_route_found(&mut self, pair_index: usize, route: &Route<LineId>) {
        let _ = (pair_index, route);
    }

    /// The router could not connect the two candidates of the pair.
    fn on_route_not_found(
        &mut self,
        pair_index: usize,
        from: &Candidate<LineId>,
        to: &Candidate<LineId>,
    ) {
        let _ = (pair_index, from, to);
    }

    /// A route was found but its length deviates too far from the DNP.
    fn on_length_mismatch(&mut self, pair_index: usize, expected: Length, actual: Length) {
        let _ = (pair_index, expected, actual);
    }

    /// The decoder moved back to an earlier candidate choice.
    fn on_backtrack(&mut self, pair_index: usize) {
        let _ = pair_index;
    }

    /// The decode call is about to return.
    fn on_decode_finished(&mut self, success: bool) {
        let _ = success;
    }
}

/// Kinds of events a [`SimpleObserver`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedEvent {
    CandidatesFound { lrp_index: usize, count: usize },
    CandidatePairChosen { pair_index: usize },
    RouteFound { pair_index: usize },
    RouteNotFound { pair_index: usize },
    LengthMismatch { pair_index: usize },
    Backtrack { pair_index: usize },
    DecodeFinished { success: bool },
}

/// An observer that records every event it sees, mostly useful for tests and
/// for diagnosing why a reference did not decode.
#[derive(Debug, Default)]
pub struct SimpleObserver {
    pub events: Vec<ObservedEvent>,
}

impl SimpleObserver {
    pub fn backtracks(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ObservedEvent::Backtrack { .. }))
            .count()
    }
}

impl<LineId> DecoderObserver<LineId> for SimpleObserver {
    fn on_candidates_found(&mut self, lrp_index: usize, candidates: &[Candidate<LineId>]) {
        self.events.push(ObservedEvent::CandidatesFound {
            lrp_index,
            count: candidates.len(),
        });
    }

    fn on_candidate_pair_chosen(
        &mut self,
        pair_index: usize,
        _from: &Candidate<LineId>,
        _to: &Candidate<LineId>,
    ) {
        self.events
            .push(ObservedEvent::CandidatePairChosen { pair_index });
    }

    fn on_route_found(&mut self, pair_index: usize, _route: &Route<LineId>) {
        self.events.push(ObservedEvent::RouteFound { pair_index });
    }

    fn on_route_not_found(
        &mut self,
        pair_index: usize,
        _from: &Candidate<LineId>,
        _to: &Candidate<LineId>,
    ) {
        self.events.push(ObservedEvent::RouteNotFound { pair_index });
    }

    fn on_length_mismatch(&mut self, pair_index: usize, _expected: Length, _actual: Length) {
        self.events.push(ObservedEvent::LengthMismatch { pair_index });
    }

    fn on_backtrack(&mut self, pair_index: usize) {
        self.events.push(ObservedEvent::Backtrack { pair_index });
    }

    fn on_decode_finished(&mut self, success: bool) {
        self.events.push(ObservedEvent::DecodeFinished { success });
    }
}
