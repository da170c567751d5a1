use std::fmt::Debug;
use std::hash::Hash;

use crate::{Coordinate, Fow, Frc, Length};


/// Read-only view of the target road map.
///
/// The decoder consumes the map exclusively through this capability set: a
/// spatial lookup of lines near a coordinate, topology traversal, and
/// per-line attribute accessors. Any provider satisfying these operations can
/// be substituted; the decoder holds the reader only for the duration of a
/// call and performs no writes.
///
/// Lines are directed; a two-way road is expected to appear as two opposing
/// lines. Accessors return `None` for ids the map does not know, which the
/// decoder surfaces as a map reader error when it concerns a line the reader
/// itself reported.
pub trait MapReader {
    /// Uniquely identifies a directed line of the map.
    type LineId: Debug + Copy + Eq + Ord + Hash;
    /// Uniquely identifies a node of the map.
    type NodeId: Debug + Copy + Eq + Ord + Hash;

    /// The node this line starts at.
    fn line_start_node(&self, line: Self::LineId) -> Option<Self::NodeId>;

    /// The node this line ends at.
    fn line_end_node(&self, line: Self::LineId) -> Option<Self::NodeId>;

    /// Geodesic length of the line.
    fn line_length(&self, line: Self::LineId) -> Option<Length>;

    /// Functional road class of the line.
    fn line_frc(&self, line: Self::LineId) -> Option<Frc>;

    /// Form of way of the line.
    fn line_fow(&self, line: Self::LineId) -> Option<Fow>;

    /// The polyline geometry of the line, ordered from start node to end
    /// node. Empty for unknown ids.
    fn line_coordinates(&self, line: Self::LineId) -> impl Iterator<Item = Coordinate>;

    /// Position of a node.
    fn node_coordinate(&self, node: Self::NodeId) -> Option<Coordinate>;

    /// All lines leaving the node, with their end nodes, in a deterministic
    /// order.
    fn outgoing_lines(
        &self,
        node: Self::NodeId,
    ) -> impl Iterator<Item = (Self::LineId, Self::NodeId)>;

    /// All lines entering the node, with their start nodes, in a
    /// deterministic order.
    fn incoming_lines(
        &self,
        node: Self::NodeId,
    ) -> impl Iterator<Item = (Self::LineId, Self::NodeId)>;

    /// All lines with any point within `radius` of `coordinate`, in a
    /// deterministic order. The lookup may be approximate (e.g. an envelope
    /// query); the decoder re-checks exact distances.
    fn find_lines_close_to(
        &self,
        coordinate: Coordinate,
        radius: Length,
    ) -> impl Iterator<Item = Self::LineId>;
}
