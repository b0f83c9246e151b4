//! Slow structural plasticity: one edge mutation per macro-step.
//!
//! A uniformly drawn node looks at its activity memory:
//! - silent (`A < epsilon`): gains an excitatory in-link from a random non-neighbor,
//! - saturated (`A > 1 - epsilon`): gains an inhibitory in-link,
//! - otherwise: loses one random existing in-link.
//!
//! Candidates are enumerated in ascending column order and the self index is
//! never a candidate, so the zero diagonal is preserved and the total edge
//! count changes by at most one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::connectivity::{Connectivity, Link, LinkCounts, NodeId};
use crate::memory::ActivityMemory;
use crate::prng::Prng;

/// What a single rewiring step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
pub enum RewireOutcome {
    /// `C[node, target]` went from 0 to `+1`.
    AddedPositive { node: NodeId, target: NodeId },
    /// `C[node, target]` went from 0 to `-1`.
    AddedNegative { node: NodeId, target: NodeId },
    /// `C[node, target]` went from `previous` to 0.
    Removed {
        node: NodeId,
        target: NodeId,
        previous: Link,
    },
    /// The selected branch had no candidate (row full, or row empty).
    Unchanged { node: NodeId },
}

impl RewireOutcome {
    /// Change in total edge count: -1, 0 or +1.
    pub fn edge_delta(&self) -> i8 {
        match self {
            RewireOutcome::AddedPositive { .. } | RewireOutcome::AddedNegative { .. } => 1,
            RewireOutcome::Removed { .. } => -1,
            RewireOutcome::Unchanged { .. } => 0,
        }
    }

    pub fn node(&self) -> NodeId {
        match *self {
            RewireOutcome::AddedPositive { node, .. }
            | RewireOutcome::AddedNegative { node, .. }
            | RewireOutcome::Removed { node, .. }
            | RewireOutcome::Unchanged { node } => node,
        }
    }
}

/// Run one rewiring step on a uniformly drawn node.
///
/// The caller guarantees `matrix.size() >= 1`.
pub fn rewire<M: Connectivity>(
    matrix: &mut M,
    counts: &mut LinkCounts,
    memory: &ActivityMemory,
    epsilon: f64,
    rng: &mut Prng,
) -> RewireOutcome {
    let node = rng.gen_range_usize(0, matrix.size());
    rewire_node(matrix, counts, memory.value(node), node, epsilon, rng)
}

/// Apply the rewiring rule to a given `node` with memory value `activity`.
pub fn rewire_node<M: Connectivity>(
    matrix: &mut M,
    counts: &mut LinkCounts,
    activity: f64,
    node: NodeId,
    epsilon: f64,
    rng: &mut Prng,
) -> RewireOutcome {
    if activity < epsilon {
        match add_random_link(matrix, counts, node, 1, rng) {
            Some(target) => RewireOutcome::AddedPositive { node, target },
            None => RewireOutcome::Unchanged { node },
        }
    } else if activity > 1.0 - epsilon {
        match add_random_link(matrix, counts, node, -1, rng) {
            Some(target) => RewireOutcome::AddedNegative { node, target },
            None => RewireOutcome::Unchanged { node },
        }
    } else {
        match remove_random_link(matrix, counts, node, rng) {
            Some((target, previous)) => RewireOutcome::Removed {
                node,
                target,
                previous,
            },
            None => RewireOutcome::Unchanged { node },
        }
    }
}

fn add_random_link<M: Connectivity>(
    matrix: &mut M,
    counts: &mut LinkCounts,
    node: NodeId,
    value: Link,
    rng: &mut Prng,
) -> Option<NodeId> {
    let candidates = matrix.row_zeros(node);
    if candidates == 0 {
        return None;
    }
    let k = rng.gen_range_usize(0, candidates);
    let target = matrix.nth_zero_in_row(node, k)?;
    matrix.set(node, target, value);
    counts.record_added(value);
    Some(target)
}

fn remove_random_link<M: Connectivity>(
    matrix: &mut M,
    counts: &mut LinkCounts,
    node: NodeId,
    rng: &mut Prng,
) -> Option<(NodeId, Link)> {
    let candidates = matrix.row_nonzeros(node);
    if candidates == 0 {
        return None;
    }
    let k = rng.gen_range_usize(0, candidates);
    let (target, _) = matrix.nth_nonzero_in_row(node, k)?;
    let previous = matrix.set(node, target, 0);
    counts.record_removed(previous);
    Some((target, previous))
}
