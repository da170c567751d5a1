use crate::decoder::candidates::Candidate;
use crate::Length;

/// The resolved path between the candidates of two subsequent location
/// reference points.
///
/// `lines` always contains the candidate lines themselves, so the first and
/// last line may only be partially covered. `length` is the net distance
/// travelled between the two candidate positions: the remainder of the start
/// line past the start offset, the interior lines in full, and the end line
/// up to the end offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<LineId> {
    pub lines: Vec<LineId>,
    pub length: Length,
    pub start: Candidate<LineId>,
    pub end: Candidate<LineId>,
}
