use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::decoder::candidates::Candidate;
use crate::decoder::route::Route;
use crate::{DecodeError, Frc, Length, MapReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapElement<NodeId> {
    /// Current shortest distance from the origin to this node.
    distance: Length,
    node: NodeId,
}

// The priority queue depends on the implementation of the Ord trait.
// By default std::BinaryHeap is a max heap.
// Explicitly implement the trait so the queue becomes a min heap.
impl<NodeId: Ord> Ord for HeapElement<NodeId> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .cmp(&self.distance)
            // breaking ties in a deterministic way
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl<NodeId: Ord> PartialOrd for HeapElement<NodeId> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Resolves the route between two candidates.
///
/// Interior lines are found with a Dijkstra search from the end node of the
/// start candidate's line to the start node of the end candidate's line,
/// restricted to lines with `frc <= lfrc` and to paths no longer than
/// `max_length`. The candidate lines themselves are exempt from the FRC
/// ceiling. Returns `Ok(None)` when the candidates cannot be connected,
/// including the wrong-direction pairing of two candidates on one line.
pub(crate) fn candidate_route<R: MapReader>(
    reader: &R,
    start: &Candidate<R::LineId>,
    end: &Candidate<R::LineId>,
    lfrc: Frc,
    max_length: Length,
) -> Result<Option<Route<R::LineId>>, DecodeError> {
    if start.line == end.line {
        if end.offset < start.offset {
            debug!(line = ?start.line, "same-line candidates paired against the direction of travel");
            return Ok(None);
        }
        return Ok(Some(Route {
            lines: vec![start.line],
            length: end.offset - start.offset,
            start: *start,
            end: *end,
        }));
    }

    let origin = reader
        .line_end_node(start.line)
        .ok_or_else(|| DecodeError::map_reader(format!("no end node for line {:?}", start.line)))?;
    let destination = reader
        .line_start_node(end.line)
        .ok_or_else(|| DecodeError::map_reader(format!("no start node for line {:?}", end.line)))?;

    let Some((interior, interior_length)) =
        shortest_path(reader, origin, destination, lfrc, max_length)?
    else {
        debug!(from = ?start.line, to = ?end.line, "no path between the candidate lines");
        return Ok(None);
    };

    let start_length = reader
        .line_length(start.line)
        .ok_or_else(|| DecodeError::map_reader(format!("no length for line {:?}", start.line)))?;

    let mut lines = Vec::with_capacity(interior.len() + 2);
    lines.push(start.line);
    for line in interior {
        if lines.last() != Some(&line) {
            lines.push(line);
        }
    }
    if lines.last() != Some(&end.line) {
        lines.push(end.line);
    }

    let length = (start_length - start.offset) + interior_length + end.offset;

    Ok(Some(Route {
        lines,
        length,
        start: *start,
        end: *end,
    }))
}

/// Node-based Dijkstra over the directed line graph.
///
/// Returns the lines of the shortest path from `origin` to `destination`
/// together with its length, or `None` when the destination is unreachable
/// within `max_length`. Length ties are resolved towards the
/// lexicographically smallest line ids so decodes stay deterministic.
fn shortest_path<R: MapReader>(
    reader: &R,
    origin: R::NodeId,
    destination: R::NodeId,
    lfrc: Frc,
    max_length: Length,
) -> Result<Option<(Vec<R::LineId>, Length)>, DecodeError> {
    debug!(?origin, ?destination, ?lfrc, "computing shortest path");

    // (current) shortest distance from the origin to each node
    let mut shortest_distances = FxHashMap::default();
    shortest_distances.insert(origin, Length::ZERO);

    // incoming line and previous node on the best known path to each node
    let mut previous: FxHashMap<R::NodeId, (R::LineId, R::NodeId)> = FxHashMap::default();

    // priority queue of discovered nodes that may need to be visited
    let mut frontier = BinaryHeap::from([HeapElement {
        distance: Length::ZERO,
        node: origin,
    }]);

    while let Some(element) = frontier.pop() {
        if element.node == destination {
            // unpack the path from the destination back to the origin
            let mut lines = vec![];
            let mut next = destination;
            while let Some(&(line, previous_node)) = previous.get(&next) {
                next = previous_node;
                lines.push(line);
            }
            lines.reverse();

            return Ok(Some((lines, element.distance)));
        }

        // a cheaper way to this node may have been found in the meantime
        let shortest = *shortest_distances.get(&element.node).unwrap_or(&Length::MAX);
        if element.distance > shortest {
            continue;
        }

        for (line, node_to) in reader.outgoing_lines(element.node) {
            let frc = reader
                .line_frc(line)
                .ok_or_else(|| DecodeError::map_reader(format!("no FRC for line {line:?}")))?;
            if frc > lfrc {
                continue;
            }

            let line_length = reader
                .line_length(line)
                .ok_or_else(|| DecodeError::map_reader(format!("no length for line {line:?}")))?;
            let distance = element.distance + line_length;
            if distance > max_length {
                continue;
            }

            let shortest = *shortest_distances.get(&node_to).unwrap_or(&Length::MAX);
            if distance < shortest {
                shortest_distances.insert(node_to, distance);
                previous.insert(node_to, (line, element.node));
                frontier.push(HeapElement {
                    distance,
                    node: node_to,
                });
            } else if distance == shortest
                && previous.get(&node_to).is_some_and(|&(other, _)| line < other)
            {
                // equal-length alternative through a smaller line id wins
                previous.insert(node_to, (line, element.node));
            }
        }
    }

    Ok(None)
}
