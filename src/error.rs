use thiserror::Error;

use crate::Length;

/// Errors surfaced by a decode call.
///
/// Routing failures and DNP mismatches on a single candidate pair are not
/// errors; they make the decoder backtrack and are reported through the
/// observer instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The reference itself is unusable (fewer than two points, bad weights,
    /// an offset fraction outside [0, 1], ...).
    #[error("invalid location reference: {0}")]
    InvalidReference(&'static str),

    /// Candidate generation yielded nothing for the location reference point
    /// at this index.
    #[error("no candidate lines found for LRP {0}")]
    NoCandidates(usize),

    /// Backtracking exhausted every ranked candidate combination without
    /// satisfying the distances encoded in the reference.
    #[error("no combination of candidates matched the location reference")]
    NoMatch,

    /// The offsets consume the entire decoded path.
    #[error("offsets ({}m, {}m) exceed the decoded path length", pos.meters(), neg.meters())]
    InvalidOffsets { pos: Length, neg: Length },

    /// The map reader returned inconsistent data, e.g. no attributes for a
    /// line it previously reported. Fatal for the decode, never retried.
    #[error("map reader error: {0}")]
    MapReader(String),
}

impl DecodeError {
    pub(crate) fn map_reader(what: impl Into<String>) -> Self {
        Self::MapReader(what.into())
    }
}
